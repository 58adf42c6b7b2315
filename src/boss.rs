/// Boss behavior state machine.
///
/// Two timer layers drive the boss:
///
/// * a cycle timer: `behavior_timer` counts the ticks the current behavior
///   has acted, and once it reaches `behavior_duration` the boss commits to
///   the pre-sampled `next_behavior` and samples a new one from the other
///   three;
/// * per-behavior triggers inside [`Boss::act`]: the idle volley, the buster
///   snap-and-fire, the floating patrol and the sword charge.  Each sees
///   `behavior_timer == 0` on the first tick of its behavior, however the
///   behavior was entered.
///
/// The cycle runs on top of the triggers, so a burst or a charge can be cut
/// short by a transition.

use rand::Rng;
use tracing::{debug, info};

use crate::entities::{
    Body, Boss, BossBehavior, Bullet, BulletOwner, Burst, Facing, FightEvent, Player,
    SwordCharge, Vec2,
};
use crate::rules::Rules;

impl Boss {
    pub fn spawn(rules: &Rules, rng: &mut impl Rng) -> Boss {
        let opening = rules.opening_behavior;
        Boss {
            body: Body::from_rect(rules.boss_spawn),
            max_health: rules.boss_max_health,
            health: rules.boss_max_health,
            alive: true,
            behavior: opening,
            next_behavior: pick_other(opening, rng),
            behavior_timer: 0,
            behavior_duration: rules.behavior_duration,
            burst: Burst {
                fired: 0,
                max_per_behavior: rules.bursts_per_behavior,
                cooldown_timer: 0,
                cooldown: rules.burst_cooldown,
            },
            charge: SwordCharge {
                timer: 0,
                cooldown: rules.sword_charge_cooldown,
                speed: rules.charge_speed,
            },
            patrol: Facing::Right,
        }
    }

    pub fn is_defeated(&self) -> bool {
        !self.alive
    }

    /// Damage this boss deals to the player right now.
    pub fn hit_damage(&self, rules: &Rules) -> i32 {
        match self.behavior {
            BossBehavior::SwordCharge => rules.charge_damage,
            _ => rules.contact_damage,
        }
    }

    /// Subtract `amount`; the boss is defeated the first time health drops
    /// to zero or below.  Returns true only for that defeating call.
    pub fn reduce_health(&mut self, amount: i32) -> bool {
        if !self.alive {
            return false;
        }
        self.health -= amount;
        debug!(amount, health = self.health, "boss hit");
        if self.health <= 0 {
            self.alive = false;
            info!("boss vanquished");
            return true;
        }
        false
    }

    /// Commit to `behavior`, restarting the cycle timer and the burst budget.
    pub fn enter(
        &mut self,
        behavior: BossBehavior,
        rules: &Rules,
        rng: &mut impl Rng,
        events: &mut Vec<FightEvent>,
    ) {
        let from = self.behavior;
        self.behavior = behavior;
        self.behavior_timer = 0;
        self.behavior_duration = rules.behavior_duration;
        self.burst.fired = 0;
        self.next_behavior = pick_other(behavior, rng);
        if behavior == BossBehavior::SwordCharge {
            self.charge.timer = 0;
        }
        debug!(%from, to = %behavior, next = %self.next_behavior, "boss behavior change");
        events.push(FightEvent::BehaviorChanged { from, to: behavior });
    }

    /// Physics half of the tick: apply velocity, bounce off the arena edges,
    /// face the player, run down the burst cooldown and switch behavior once
    /// the current one has acted for `behavior_duration` ticks.
    pub fn advance(
        &mut self,
        player: &Player,
        rules: &Rules,
        rng: &mut impl Rng,
        events: &mut Vec<FightEvent>,
    ) {
        self.body.integrate();
        let hb = self.body.hitbox();
        if hb.x < 0.0 || hb.right() > rules.width {
            self.body.vel.x = -self.body.vel.x;
            self.patrol = self.patrol.flipped();
        }
        self.clamp(rules);
        self.face(player.body.hitbox().center_x());

        self.burst.cooldown_timer = self.burst.cooldown_timer.saturating_sub(1);

        if self.behavior_timer >= self.behavior_duration {
            self.enter(self.next_behavior, rules, rng, events);
        }
    }

    /// Behavior half of the tick: run the current behavior's movement and
    /// attack trigger, then count the tick.  Returns any bullets fired.
    pub fn act(
        &mut self,
        player: &mut Player,
        rules: &Rules,
        rng: &mut impl Rng,
        events: &mut Vec<FightEvent>,
    ) -> Vec<Bullet> {
        // A finished charge hands over to idle within the same tick.
        if self.behavior == BossBehavior::SwordCharge && self.charge.is_spent() {
            self.enter(BossBehavior::Idle, rules, rng, events);
        }

        let volley = match self.behavior {
            BossBehavior::Idle => self.idle(player, rules),
            BossBehavior::Floating => {
                self.float(rules);
                Vec::new()
            }
            BossBehavior::Buster => self.buster(player, rules),
            BossBehavior::SwordCharge => {
                self.sword_charge(player, rules, events);
                Vec::new()
            }
        };
        self.behavior_timer += 1;

        if !volley.is_empty() {
            events.push(FightEvent::BurstFired { bullets: volley.len() });
        }
        volley
    }

    fn idle(&mut self, player: &Player, rules: &Rules) -> Vec<Bullet> {
        self.body.vel = Vec2::ZERO;
        if self.behavior_timer % rules.idle_fire_interval != 0 {
            return Vec::new();
        }
        self.fire_burst(player, rules)
    }

    fn float(&mut self, rules: &Rules) {
        let hb = self.body.hitbox();
        if hb.x <= 0.0 {
            self.patrol = Facing::Right;
        } else if hb.right() >= rules.width {
            self.patrol = Facing::Left;
        }
        self.body.vel = Vec2::new(rules.patrol_speed * self.patrol.sign(), 0.0);
    }

    fn buster(&mut self, player: &Player, rules: &Rules) -> Vec<Bullet> {
        self.body.vel = Vec2::ZERO;
        if self.behavior_timer % rules.buster_snap_interval == 0 {
            self.body.pos.y = player.body.pos.y;
            self.clamp(rules);
        }
        self.face(player.body.hitbox().center_x());
        // Sustained fire: the burst gate limits this to a few bursts per cycle.
        self.fire_burst(player, rules)
    }

    fn sword_charge(&mut self, player: &mut Player, rules: &Rules, events: &mut Vec<FightEvent>) {
        self.body.vel = Vec2::ZERO;
        if player.alive && self.body.hitbox().intersects(&player.body.hitbox()) {
            if let Some(damage) = player.take_hit(self, rules) {
                events.push(FightEvent::PlayerHurt { damage });
            }
            self.charge.timer = self.charge.cooldown;
            return;
        }

        let step = if player.body.hitbox().center_x() > self.body.hitbox().center_x() {
            self.charge.speed
        } else {
            -self.charge.speed
        };
        self.body.pos.x += step;
        self.clamp(rules);
        self.charge.timer += 1;
    }

    /// Fire one burst at the player's current height if the per-behavior
    /// budget allows it and the cooldown has run out.
    pub fn fire_burst(&mut self, player: &Player, rules: &Rules) -> Vec<Bullet> {
        if self.burst.fired >= self.burst.max_per_behavior || self.burst.cooldown_timer > 0 {
            return Vec::new();
        }

        let target = player.body.hitbox();
        let direction = if self.body.pos.x < player.body.pos.x {
            Facing::Right
        } else {
            Facing::Left
        };
        let aim_y = target.center_y() - rules.bullet_size.y / 2.0;

        let volley: Vec<Bullet> = (0..rules.bullets_per_burst)
            .map(|i| {
                let mut bullet =
                    Bullet::fired_by(BulletOwner::Boss, &self.body, direction, aim_y, rules);
                // Trail each bullet behind the previous one.
                bullet.body.pos.x -= direction.sign() * rules.volley_spacing * i as f32;
                bullet
            })
            .collect();

        self.burst.fired += 1;
        self.burst.cooldown_timer = self.burst.cooldown;
        debug!(behavior = %self.behavior, burst = self.burst.fired, ?direction, "boss burst");
        volley
    }

    /// Face the sprite toward `target_x`.
    fn face(&mut self, target_x: f32) {
        self.body.facing = if target_x < self.body.hitbox().center_x() {
            Facing::Left
        } else {
            Facing::Right
        };
    }

    fn clamp(&mut self, rules: &Rules) {
        self.body.clamp_to(rules.width, rules.height);
    }
}

/// Uniform pick among the three behaviors other than `current`.
fn pick_other(current: BossBehavior, rng: &mut impl Rng) -> BossBehavior {
    let others = current.others();
    others[rng.gen_range(0..others.len())]
}

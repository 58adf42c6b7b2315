/// Player movement, shooting, animation selection and damage.

use tracing::{debug, info};

use crate::entities::{
    Body, Boss, Bullet, BulletOwner, Facing, InputIntent, Platform, Player, PlayerAnimation, Rect,
    Vec2,
};
use crate::rules::Rules;

/// Float slack when comparing a resting player's feet with a surface.
const SURFACE_EPSILON: f32 = 0.01;

impl PlayerAnimation {
    pub fn frame_count(self) -> usize {
        match self {
            PlayerAnimation::Standing => 2,
            PlayerAnimation::Jumping => 2,
            PlayerAnimation::Running => 4,
            PlayerAnimation::Shooting => 2,
            PlayerAnimation::Hurt => 1,
        }
    }

    /// Frames advanced per tick, given the frame currently shown.
    fn speed(self, frame: usize) -> f32 {
        match self {
            PlayerAnimation::Standing => 0.02,
            // Quick take-off frame, then hang on the airborne frame.
            PlayerAnimation::Jumping => [0.5, 0.01][frame.min(1)],
            PlayerAnimation::Running => 0.08,
            PlayerAnimation::Shooting => 0.1,
            PlayerAnimation::Hurt => 0.0,
        }
    }
}

impl Player {
    pub fn spawn(rules: &Rules) -> Player {
        Player {
            body: Body::from_rect(rules.player_spawn),
            max_health: rules.player_max_health,
            health: rules.player_max_health,
            alive: true,
            invincible: false,
            invincibility_timer: 0,
            is_shooting: false,
            animation: PlayerAnimation::Standing,
            animation_cursor: 0.0,
            bullets_landed: 0,
        }
    }

    pub fn is_defeated(&self) -> bool {
        !self.alive
    }

    /// Apply this tick's movement and shoot intents.
    ///
    /// Jumping needs ground contact and is handled by [`Player::settle`].
    /// Returns the bullet fired, if any.
    pub fn handle_input(&mut self, intent: &InputIntent, rules: &Rules) -> Option<Bullet> {
        if intent.move_left {
            self.body.vel.x = -rules.run_speed;
            self.body.facing = Facing::Left;
        } else if intent.move_right {
            self.body.vel.x = rules.run_speed;
            self.body.facing = Facing::Right;
        } else {
            self.body.vel.x = 0.0;
        }

        if !intent.shoot || self.is_shooting {
            return None;
        }
        self.is_shooting = true;
        let direction = self.body.facing;
        Some(Bullet::fired_by(
            BulletOwner::Player,
            &self.body,
            direction,
            self.body.pos.y,
            rules,
        ))
    }

    /// Land on platforms and the floor, then jump if asked to.
    ///
    /// Platforms are one-way: a rising player passes through them, a falling
    /// one is caught if its feet crossed the top edge during the last move.
    /// Returns whether the player is standing on something.
    pub fn settle(&mut self, platforms: &[Platform], jump: bool, rules: &Rules) -> bool {
        let support = if self.body.vel.y >= 0.0 {
            platforms.iter().find(|p| self.lands_on(&p.rect())).copied()
        } else {
            None
        };
        if let Some(platform) = support {
            self.body.pos.y = platform.y - self.body.size.y;
            self.body.vel.y = 0.0;
        }
        let landed = support.is_some();

        let on_floor = self.body.hitbox().bottom() >= rules.height - SURFACE_EPSILON;
        let on_ground = landed || on_floor;
        if on_ground {
            self.body.vel.y = 0.0;
            if jump {
                self.body.vel.y = rules.jump_velocity;
            }
        }
        on_ground
    }

    fn lands_on(&self, top: &Rect) -> bool {
        let hb = self.body.hitbox();
        let over = hb.x < top.right() && hb.right() > top.x;
        let feet = hb.bottom();
        over
            && feet >= top.y - SURFACE_EPSILON
            && feet <= top.y + self.body.vel.y.max(0.0) + SURFACE_EPSILON
    }

    /// Advance one tick: move, fall, stay on screen, animate, count down
    /// invincibility.
    pub fn update(&mut self, rules: &Rules) {
        self.body.integrate();
        self.body.vel.y += rules.gravity;
        self.body.clamp_to(rules.width, rules.height);

        self.animate(rules);

        if self.invincible {
            self.invincibility_timer = self.invincibility_timer.saturating_sub(1);
            if self.invincibility_timer == 0 {
                self.invincible = false;
            }
        }
    }

    /// Hurt flash > shooting > airborne > moving > standing.
    fn pick_animation(&self, rules: &Rules) -> PlayerAnimation {
        if self.is_flashing(rules) {
            PlayerAnimation::Hurt
        } else if self.is_shooting {
            PlayerAnimation::Shooting
        } else if self.body.vel.y < 0.0 {
            PlayerAnimation::Jumping
        } else if self.body.vel.x != 0.0 {
            PlayerAnimation::Running
        } else {
            PlayerAnimation::Standing
        }
    }

    fn animate(&mut self, rules: &Rules) {
        let next = self.pick_animation(rules);
        if next != self.animation {
            self.animation = next;
            self.animation_cursor = 0.0;
        }

        let frames = self.animation.frame_count();
        self.animation_cursor += self.animation.speed(self.animation_frame());
        if self.animation_cursor >= frames as f32 {
            self.animation_cursor = 0.0;
            if self.animation == PlayerAnimation::Shooting {
                self.is_shooting = false;
            }
        }
    }

    /// Sprite frame to draw for the current animation.
    pub fn animation_frame(&self) -> usize {
        (self.animation_cursor as usize).min(self.animation.frame_count() - 1)
    }

    /// Subtract `amount` unless an invincibility window is open.
    ///
    /// A successful hit opens a new window and stops the player.  Returns
    /// whether damage was applied.
    pub fn apply_damage(&mut self, amount: i32, rules: &Rules) -> bool {
        if self.invincible || !self.alive {
            return false;
        }

        self.health -= amount;
        debug!(amount, health = self.health, "player hit");
        if self.health <= 0 {
            self.alive = false;
            info!(health = self.health, "player defeated");
        }

        self.invincible = true;
        self.invincibility_timer = rules.invincibility_ticks;
        self.body.vel = Vec2::ZERO;
        true
    }

    /// Take a hit from the boss (contact or one of its bullets).
    ///
    /// The damage depends on what the boss is doing at the moment of the hit.
    /// Returns the damage dealt, or `None` while invincible.
    pub fn take_hit(&mut self, attacker: &Boss, rules: &Rules) -> Option<i32> {
        let amount = attacker.hit_damage(rules);
        self.apply_damage(amount, rules).then_some(amount)
    }

    /// True during the leading part of an invincibility window.
    pub fn is_flashing(&self, rules: &Rules) -> bool {
        self.invincible
            && self.invincibility_timer + rules.flash_ticks > rules.invincibility_ticks
    }

    /// Whether the renderer should draw the player this tick.
    pub fn is_visible(&self, rules: &Rules) -> bool {
        if !self.alive {
            return false;
        }
        if !self.is_flashing(rules) {
            return true;
        }
        let elapsed = rules.invincibility_ticks - self.invincibility_timer;
        (elapsed / rules.flash_period) % 2 == 0
    }
}

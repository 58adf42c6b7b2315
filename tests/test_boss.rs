use std::collections::HashMap;

use boss_fight::entities::*;
use boss_fight::rules::Rules;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn setup(rules: &Rules) -> (Boss, Player, StdRng) {
    let mut rng = rng();
    let boss = Boss::spawn(rules, &mut rng);
    let player = Player::spawn(rules);
    (boss, player, rng)
}

// ── spawn and health ──────────────────────────────────────────────────────────

#[test]
fn spawn_opens_idle_with_a_different_next_behavior() {
    let rules = Rules::default();
    let (boss, _, _) = setup(&rules);
    assert_eq!(boss.body.pos, Vec2::new(400.0, 375.0));
    assert_eq!(boss.health, 150);
    assert_eq!(boss.behavior, BossBehavior::Idle);
    assert_ne!(boss.next_behavior, BossBehavior::Idle);
    assert_eq!(boss.behavior_duration, 120);
}

#[test]
fn reduce_health_defeats_exactly_once() {
    let rules = Rules::default();
    let (mut boss, _, _) = setup(&rules);
    boss.health = 7;

    assert!(!boss.reduce_health(5));
    assert_eq!(boss.health, 2);
    assert!(boss.reduce_health(5));
    assert_eq!(boss.health, -3);
    assert!(boss.is_defeated());

    assert!(!boss.reduce_health(5));
    assert_eq!(boss.health, -3);
}

// ── behavior cycle ────────────────────────────────────────────────────────────

/// Advance and act, the order `tick` runs them in.
fn step(
    boss: &mut Boss,
    player: &mut Player,
    rules: &Rules,
    rng: &mut StdRng,
    events: &mut Vec<FightEvent>,
) -> Vec<Bullet> {
    boss.advance(player, rules, rng, events);
    boss.act(player, rules, rng, events)
}

#[test]
fn behavior_changes_after_duration() {
    let rules = Rules::default();
    let (mut boss, mut player, mut rng) = setup(&rules);
    let mut events = Vec::new();
    let planned = boss.next_behavior;
    boss.burst.fired = boss.burst.max_per_behavior;

    for _ in 0..120 {
        step(&mut boss, &mut player, &rules, &mut rng, &mut events);
    }
    assert_eq!(boss.behavior, BossBehavior::Idle);
    assert_eq!(boss.behavior_timer, 120);
    assert!(events.is_empty());

    boss.advance(&player, &rules, &mut rng, &mut events);
    assert_eq!(boss.behavior, planned);
    assert_eq!(boss.behavior_timer, 0);
    assert_eq!(
        events,
        vec![FightEvent::BehaviorChanged {
            from: BossBehavior::Idle,
            to: planned
        }]
    );
}

#[test]
fn transitions_are_uniform_over_other_behaviors() {
    let rules = Rules::default();
    let (mut boss, player, mut rng) = setup(&rules);
    let mut events = Vec::new();
    let mut counts: HashMap<BossBehavior, u32> = HashMap::new();

    for _ in 0..3000 {
        boss.enter(BossBehavior::Idle, &rules, &mut rng, &mut events);
        boss.behavior_timer = rules.behavior_duration;
        boss.advance(&player, &rules, &mut rng, &mut events);
        assert_ne!(boss.behavior, BossBehavior::Idle);
        *counts.entry(boss.behavior).or_default() += 1;
    }

    assert_eq!(counts.len(), 3);
    for (behavior, n) in counts {
        assert!((850..=1150).contains(&n), "{behavior} picked {n} times");
    }
}

#[test]
fn enter_resets_burst_budget() {
    let rules = Rules::default();
    let (mut boss, _, mut rng) = setup(&rules);
    let mut events = Vec::new();
    boss.burst.fired = 3;
    boss.behavior_timer = 77;

    boss.enter(BossBehavior::Buster, &rules, &mut rng, &mut events);
    assert_eq!(boss.burst.fired, 0);
    assert_eq!(boss.behavior_timer, 0);
    assert_ne!(boss.next_behavior, BossBehavior::Buster);
}

// ── idle ──────────────────────────────────────────────────────────────────────

#[test]
fn idle_fires_on_entry_then_waits() {
    let rules = Rules::default();
    let (mut boss, mut player, mut rng) = setup(&rules);
    let mut events = Vec::new();
    boss.enter(BossBehavior::Idle, &rules, &mut rng, &mut events);
    events.clear();

    let volley = boss.act(&mut player, &rules, &mut rng, &mut events);
    assert_eq!(volley.len(), 3);
    assert_eq!(events, vec![FightEvent::BurstFired { bullets: 3 }]);

    boss.advance(&player, &rules, &mut rng, &mut events);
    assert!(boss.act(&mut player, &rules, &mut rng, &mut events).is_empty());
}

#[test]
fn opening_idle_fires_on_first_tick() {
    let rules = Rules::default();
    let (mut boss, mut player, mut rng) = setup(&rules);
    let mut events = Vec::new();

    let volley = step(&mut boss, &mut player, &rules, &mut rng, &mut events);
    assert_eq!(boss.behavior, BossBehavior::Idle);
    assert_eq!(volley.len(), 3);
    assert_eq!(boss.behavior_timer, 1);
}

#[test]
fn burst_aims_at_player() {
    let rules = Rules::default();
    let (mut boss, player, _) = setup(&rules);

    let volley = boss.fire_burst(&player, &rules);
    assert_eq!(volley.len(), 3);
    for bullet in &volley {
        assert_eq!(bullet.owner, BulletOwner::Boss);
        assert_eq!(bullet.direction, Facing::Left);
        assert_eq!(bullet.body.pos, Vec2::new(384.0, 320.0));
    }
}

#[test]
fn volley_spacing_trails_bullets() {
    let rules = Rules {
        volley_spacing: 24.0,
        ..Rules::default()
    };
    let (mut boss, player, _) = setup(&rules);

    let volley = boss.fire_burst(&player, &rules);
    for (i, bullet) in volley.iter().enumerate() {
        assert_eq!(bullet.body.pos.x, 384.0 + 24.0 * i as f32);
    }
}

#[test]
fn burst_respects_cooldown_and_budget() {
    let rules = Rules::default();
    let (mut boss, player, _) = setup(&rules);

    assert_eq!(boss.fire_burst(&player, &rules).len(), 3);
    assert!(boss.fire_burst(&player, &rules).is_empty());

    boss.burst.cooldown_timer = 0;
    assert_eq!(boss.fire_burst(&player, &rules).len(), 3);
    boss.burst.cooldown_timer = 0;
    assert_eq!(boss.fire_burst(&player, &rules).len(), 3);
    boss.burst.cooldown_timer = 0;
    assert!(boss.fire_burst(&player, &rules).is_empty());
    assert_eq!(boss.burst.fired, 3);
}

// ── buster ────────────────────────────────────────────────────────────────────

#[test]
fn buster_snaps_to_player_height_and_fires_three_bursts() {
    let rules = Rules::default();
    let (mut boss, mut player, mut rng) = setup(&rules);
    let mut events = Vec::new();
    boss.enter(BossBehavior::Buster, &rules, &mut rng, &mut events);

    let mut fired = boss.act(&mut player, &rules, &mut rng, &mut events).len();
    assert_eq!(boss.body.pos.y, player.body.pos.y);

    for _ in 1..rules.behavior_duration {
        fired += step(&mut boss, &mut player, &rules, &mut rng, &mut events).len();
    }
    assert_eq!(boss.behavior, BossBehavior::Buster);
    assert_eq!(fired, 9);
}

#[test]
fn buster_snap_stays_inside_arena() {
    let rules = Rules::default();
    let (mut boss, mut player, mut rng) = setup(&rules);
    let mut events = Vec::new();
    boss.enter(BossBehavior::Buster, &rules, &mut rng, &mut events);
    player.body.pos.y = 432.0;

    boss.act(&mut player, &rules, &mut rng, &mut events);
    assert_eq!(boss.body.pos.y, 480.0 - 80.0);
}

// ── floating ──────────────────────────────────────────────────────────────────

#[test]
fn floating_reverses_at_right_edge() {
    let rules = Rules::default();
    let (mut boss, mut player, mut rng) = setup(&rules);
    let mut events = Vec::new();
    boss.enter(BossBehavior::Floating, &rules, &mut rng, &mut events);
    boss.body.pos.x = 640.0 - 64.0 - 0.5;

    boss.act(&mut player, &rules, &mut rng, &mut events);
    assert_eq!(boss.body.vel.x, 1.0);
    boss.advance(&player, &rules, &mut rng, &mut events);
    assert_eq!(boss.patrol, Facing::Left);
    assert_eq!(boss.body.pos.x, 576.0);

    let before = boss.body.pos.x;
    for _ in 0..5 {
        boss.act(&mut player, &rules, &mut rng, &mut events);
        boss.advance(&player, &rules, &mut rng, &mut events);
    }
    assert_eq!(boss.body.pos.x, before - 5.0);
}

#[test]
fn floating_turns_around_at_left_edge() {
    let rules = Rules::default();
    let (mut boss, mut player, mut rng) = setup(&rules);
    let mut events = Vec::new();
    boss.enter(BossBehavior::Floating, &rules, &mut rng, &mut events);
    boss.body.pos.x = 0.0;
    boss.patrol = Facing::Left;

    boss.act(&mut player, &rules, &mut rng, &mut events);
    assert_eq!(boss.patrol, Facing::Right);
    assert_eq!(boss.body.vel.x, 1.0);
}

// ── sword charge ──────────────────────────────────────────────────────────────

#[test]
fn sword_charge_moves_toward_player() {
    let rules = Rules::default();
    let (mut boss, mut player, mut rng) = setup(&rules);
    let mut events = Vec::new();
    boss.enter(BossBehavior::SwordCharge, &rules, &mut rng, &mut events);

    boss.act(&mut player, &rules, &mut rng, &mut events);
    assert_eq!(boss.body.pos.x, 396.0);
    assert_eq!(boss.charge.timer, 1);
}

#[test]
fn sword_charge_always_ends_in_idle() {
    let rules = Rules {
        behavior_duration: 100_000,
        charge_speed: 0.0,
        ..Rules::default()
    };
    let (mut boss, mut player, mut rng) = setup(&rules);
    let mut events = Vec::new();
    boss.enter(BossBehavior::SwordCharge, &rules, &mut rng, &mut events);

    for _ in 0..rules.sword_charge_cooldown {
        step(&mut boss, &mut player, &rules, &mut rng, &mut events);
        assert_eq!(boss.behavior, BossBehavior::SwordCharge);
    }
    events.clear();

    // The idle taken over from the charge fires on its first tick
    let volley = step(&mut boss, &mut player, &rules, &mut rng, &mut events);
    assert_eq!(boss.behavior, BossBehavior::Idle);
    assert_eq!(boss.behavior_timer, 1);
    assert_eq!(volley.len(), 3);
    assert_eq!(
        events,
        vec![
            FightEvent::BehaviorChanged {
                from: BossBehavior::SwordCharge,
                to: BossBehavior::Idle
            },
            FightEvent::BurstFired { bullets: 3 },
        ]
    );
}

#[test]
fn sword_charge_contact_hurts_and_ends_charge() {
    let rules = Rules::default();
    let (mut boss, mut player, mut rng) = setup(&rules);
    let mut events = Vec::new();
    boss.enter(BossBehavior::SwordCharge, &rules, &mut rng, &mut events);
    boss.body.pos = Vec2::new(110.0, 290.0);
    events.clear();

    boss.act(&mut player, &rules, &mut rng, &mut events);
    assert_eq!(player.health, 45);
    assert!(boss.charge.is_spent());
    assert_eq!(events, vec![FightEvent::PlayerHurt { damage: 5 }]);

    boss.act(&mut player, &rules, &mut rng, &mut events);
    assert_eq!(boss.behavior, BossBehavior::Idle);
    assert_eq!(player.health, 45);
}

#[test]
fn boss_faces_the_player() {
    let rules = Rules::default();
    let (mut boss, mut player, mut rng) = setup(&rules);
    let mut events = Vec::new();

    boss.advance(&player, &rules, &mut rng, &mut events);
    assert_eq!(boss.body.facing, Facing::Left);

    player.body.pos.x = 600.0;
    boss.advance(&player, &rules, &mut rng, &mut events);
    assert_eq!(boss.body.facing, Facing::Right);
}

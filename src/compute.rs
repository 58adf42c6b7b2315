/// The per-frame combat simulation.
///
/// `tick` takes an immutable reference to the current `FightState` plus this
/// frame's input, clock reading and RNG, and returns a brand-new state.
/// Side effects are limited to the injected RNG.

use rand::Rng;
use tracing::info;

use crate::config::FightConfig;
use crate::entities::{
    Boss, Bullet, BulletOwner, FightEvent, FightState, GamePhase, InputIntent, MatchState, Player,
};
use crate::rules::Rules;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the opening state of the fight.  `started_at_ms` is the monotonic
/// clock reading the final score is measured from.
pub fn init_state(config: &FightConfig, started_at_ms: u64, rng: &mut impl Rng) -> FightState {
    let rules = Rules::from_config(config);
    FightState {
        player: Player::spawn(&rules),
        boss: Boss::spawn(&rules, rng),
        bullets: Vec::new(),
        platforms: config.platforms.clone(),
        rules,
        match_state: MatchState {
            phase: GamePhase::InProgress,
            ticks: 0,
            started_at_ms,
            elapsed_ms: 0,
            score: None,
            bullets_landed: 0,
            boss_bullets_missed: 0,
        },
        events: Vec::new(),
    }
}

// ── Scoring ──────────────────────────────────────────────────────────────────

/// `floor(10000 / seconds) + landed * 10 - missed * 5`.
///
/// The fight is never shorter than one tick, which also keeps the division
/// finite for a clock that has not moved.
pub fn final_score(elapsed_ms: u64, bullets_landed: u32, boss_bullets_missed: u32, fps: u32) -> i64 {
    let min_ms = 1000.0 / fps.max(1) as f64;
    let seconds = (elapsed_ms as f64).max(min_ms) / 1000.0;
    (10_000.0 / seconds).floor() as i64 + i64::from(bullets_landed) * 10
        - i64::from(boss_bullets_missed) * 5
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the fight by one frame.  All randomness comes through `rng` and
/// all wall-clock time through `now_ms`, so a seeded RNG and a scripted
/// clock replay a fight exactly.
///
/// Once the fight is over the state is frozen: only the event list is
/// cleared.
pub fn tick(
    state: &FightState,
    input: &InputIntent,
    now_ms: u64,
    rng: &mut impl Rng,
) -> FightState {
    let mut next = state.clone();
    next.events.clear();
    if next.match_state.phase != GamePhase::InProgress {
        return next;
    }

    let rules = next.rules;
    let FightState {
        player,
        boss,
        bullets,
        platforms,
        match_state,
        events,
        ..
    } = &mut next;

    match_state.ticks += 1;
    match_state.elapsed_ms = now_ms.saturating_sub(match_state.started_at_ms);

    // ── 1. Input ─────────────────────────────────────────────────────────────
    if let Some(bullet) = player.handle_input(input, &rules) {
        bullets.push(bullet);
        events.push(FightEvent::ShotFired);
    }

    // ── 2. Platforms, floor and jumping ──────────────────────────────────────
    player.settle(platforms, input.jump, &rules);

    // ── 3. Advance player, bullets and boss ──────────────────────────────────
    player.update(&rules);
    for bullet in bullets.iter_mut() {
        bullet.advance();
    }
    if boss.alive {
        boss.advance(player, &rules, rng, events);
    }

    // ── 4. Boss behavior ─────────────────────────────────────────────────────
    if boss.alive {
        let volley = boss.act(player, &rules, rng, events);
        bullets.extend(volley);
    }

    // ── 5. Collisions ────────────────────────────────────────────────────────
    resolve_bullets(bullets, player, boss, match_state, events, &rules);
    resolve_contact(player, boss, events, &rules);

    // ── 6-7. Terminal conditions and score ───────────────────────────────────
    if boss.is_defeated() {
        let score = final_score(
            match_state.elapsed_ms,
            match_state.bullets_landed,
            match_state.boss_bullets_missed,
            rules.fps,
        );
        match_state.phase = GamePhase::BossDefeated;
        match_state.score = Some(score);
        info!(
            score,
            elapsed_ms = match_state.elapsed_ms,
            landed = match_state.bullets_landed,
            missed = match_state.boss_bullets_missed,
            "boss defeated"
        );
        events.push(FightEvent::BossDefeated { score });
    } else if player.is_defeated() {
        match_state.phase = GamePhase::PlayerDefeated;
        info!(ticks = match_state.ticks, "player defeated");
        events.push(FightEvent::PlayerDefeated);
    }

    next
}

/// Move every bullet through its hit and cleanup checks.
///
/// A bullet may only hit the side opposing its owner, is consumed by its
/// first hit, and is discarded once it leaves the arena or its target is
/// gone.  Boss bullets that leave the arena count as dodged.
fn resolve_bullets(
    bullets: &mut Vec<Bullet>,
    player: &mut Player,
    boss: &mut Boss,
    match_state: &mut MatchState,
    events: &mut Vec<FightEvent>,
    rules: &Rules,
) {
    bullets.retain(|bullet| match bullet.target() {
        BulletOwner::Boss => {
            if !boss.alive {
                return false;
            }
            if bullet.strikes(&boss.body.hitbox()) {
                boss.reduce_health(rules.bullet_damage);
                player.bullets_landed += 1;
                match_state.bullets_landed += 1;
                events.push(FightEvent::BossHit {
                    damage: rules.bullet_damage,
                });
                return false;
            }
            !bullet.is_off_screen(rules.width)
        }
        BulletOwner::Player => {
            if !player.alive {
                return false;
            }
            if bullet.strikes(&player.body.hitbox()) {
                if let Some(damage) = player.take_hit(&*boss, rules) {
                    events.push(FightEvent::PlayerHurt { damage });
                }
                return false;
            }
            if bullet.is_off_screen(rules.width) {
                match_state.boss_bullets_missed += 1;
                return false;
            }
            true
        }
    });
}

/// Touching the boss hurts unless an invincibility window is open.
fn resolve_contact(player: &mut Player, boss: &Boss, events: &mut Vec<FightEvent>, rules: &Rules) {
    if !player.alive || !boss.alive || player.invincible {
        return;
    }
    if player.body.hitbox().intersects(&boss.body.hitbox()) {
        if let Some(damage) = player.take_hit(boss, rules) {
            events.push(FightEvent::PlayerHurt { damage });
        }
    }
}

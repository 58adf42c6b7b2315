/// Fight tuning resolved into simulation units.
///
/// `FightConfig` speaks in seconds; every timer in the simulation counts
/// ticks, so the conversion happens once here.

use crate::config::FightConfig;
use crate::entities::{BossBehavior, Rect, Vec2};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rules {
    pub width: f32,
    pub height: f32,
    pub fps: u32,

    // ── Player ────────────────────────────────────────────────────────────────
    pub player_spawn: Rect,
    pub player_max_health: i32,
    pub run_speed: f32,
    pub jump_velocity: f32,
    pub gravity: f32,
    pub invincibility_ticks: u32,
    pub flash_ticks: u32,
    pub flash_period: u32,

    // ── Boss ──────────────────────────────────────────────────────────────────
    pub boss_spawn: Rect,
    pub boss_max_health: i32,
    pub opening_behavior: BossBehavior,
    pub behavior_duration: u32,
    pub idle_fire_interval: u32,
    pub buster_snap_interval: u32,
    pub patrol_speed: f32,
    pub charge_speed: f32,
    pub sword_charge_cooldown: u32,
    pub contact_damage: i32,
    pub charge_damage: i32,
    pub bursts_per_behavior: u32,
    pub bullets_per_burst: u32,
    pub burst_cooldown: u32,
    pub volley_spacing: f32,

    // ── Bullets ───────────────────────────────────────────────────────────────
    pub bullet_speed: f32,
    pub bullet_damage: i32,
    pub bullet_size: Vec2,
}

/// Whole ticks in `secs` seconds at `fps`.
pub fn ticks(secs: f32, fps: u32) -> u32 {
    (secs * fps as f32).round().max(0.0) as u32
}

impl Rules {
    pub fn from_config(config: &FightConfig) -> Self {
        let fps = config.arena.fps.max(1);
        let p = &config.player;
        let b = &config.boss;
        Rules {
            width: config.arena.width,
            height: config.arena.height,
            fps,

            player_spawn: Rect::new(p.x, p.y, p.width, p.height),
            player_max_health: p.max_health,
            run_speed: p.run_speed,
            jump_velocity: p.jump_velocity,
            gravity: p.gravity,
            invincibility_ticks: ticks(p.invincibility_secs, fps),
            flash_ticks: ticks(p.flash_secs, fps),
            flash_period: p.flash_period_ticks.max(1),

            boss_spawn: Rect::new(b.x, b.y, b.width, b.height),
            boss_max_health: b.max_health,
            opening_behavior: b.opening_behavior,
            behavior_duration: ticks(b.behavior_duration_secs, fps).max(1),
            idle_fire_interval: ticks(b.idle_fire_interval_secs, fps).max(1),
            buster_snap_interval: ticks(b.buster_snap_interval_secs, fps).max(1),
            patrol_speed: b.patrol_speed,
            charge_speed: b.charge_speed,
            sword_charge_cooldown: ticks(b.sword_charge_cooldown_secs, fps),
            contact_damage: b.contact_damage,
            charge_damage: b.charge_damage,
            bursts_per_behavior: b.bursts_per_behavior,
            bullets_per_burst: b.bullets_per_burst,
            burst_cooldown: ticks(b.burst_cooldown_secs, fps),
            volley_spacing: b.volley_spacing,

            bullet_speed: config.bullet.speed,
            bullet_damage: config.bullet.damage,
            bullet_size: Vec2::new(config.bullet.width, config.bullet.height),
        }
    }
}

impl Default for Rules {
    fn default() -> Self {
        Rules::from_config(&FightConfig::default())
    }
}

/// Fight tuning loaded from TOML.
///
/// Every field defaults to the stock encounter, so a file only needs the
/// values it changes:
///
/// ```toml
/// [boss]
/// max_health = 300
/// opening_behavior = "buster"
/// ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::entities::{BossBehavior, Platform};
use crate::error::{FightError, FightResult};

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub width: f32,
    pub height: f32,
    /// Simulation ticks per second.
    pub fps: u32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        ArenaConfig {
            width: 640.0,
            height: 480.0,
            fps: 60,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub max_health: i32,
    pub run_speed: f32,
    pub jump_velocity: f32,
    pub gravity: f32,
    pub invincibility_secs: f32,
    /// Leading part of the invincibility window drawn as a hurt flash.
    pub flash_secs: f32,
    /// Ticks per visible/hidden phase of the flash.
    pub flash_period_ticks: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            x: 100.0,
            y: 300.0,
            width: 32.0,
            height: 48.0,
            max_health: 50,
            run_speed: 5.0,
            jump_velocity: -12.0,
            gravity: 0.5,
            invincibility_secs: 3.0,
            flash_secs: 0.5,
            flash_period_ticks: 10,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BossConfig {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub max_health: i32,
    pub opening_behavior: BossBehavior,
    pub behavior_duration_secs: f32,
    pub idle_fire_interval_secs: f32,
    pub buster_snap_interval_secs: f32,
    pub patrol_speed: f32,
    pub charge_speed: f32,
    pub sword_charge_cooldown_secs: f32,
    /// Damage dealt to the player by contact or a boss bullet.
    pub contact_damage: i32,
    /// Damage dealt instead while the boss is mid sword-charge.
    pub charge_damage: i32,
    pub bursts_per_behavior: u32,
    pub bullets_per_burst: u32,
    pub burst_cooldown_secs: f32,
    /// Gap between consecutive bullets of one burst; 0 stacks them.
    pub volley_spacing: f32,
}

impl Default for BossConfig {
    fn default() -> Self {
        BossConfig {
            x: 400.0,
            y: 375.0,
            width: 64.0,
            height: 80.0,
            max_health: 150,
            opening_behavior: BossBehavior::Idle,
            behavior_duration_secs: 2.0,
            idle_fire_interval_secs: 3.0,
            buster_snap_interval_secs: 120.0,
            patrol_speed: 1.0,
            charge_speed: 4.0,
            sword_charge_cooldown_secs: 4.0,
            contact_damage: 2,
            charge_damage: 5,
            bursts_per_behavior: 3,
            bullets_per_burst: 3,
            burst_cooldown_secs: 0.5,
            volley_spacing: 0.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BulletConfig {
    pub speed: f32,
    pub damage: i32,
    pub width: f32,
    pub height: f32,
}

impl Default for BulletConfig {
    fn default() -> Self {
        BulletConfig {
            speed: 7.0,
            damage: 5,
            width: 16.0,
            height: 8.0,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Draw hitbox outlines over every entity.
    pub hitboxes: bool,
    pub mute: bool,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FightConfig {
    pub arena: ArenaConfig,
    pub player: PlayerConfig,
    pub boss: BossConfig,
    pub bullet: BulletConfig,
    pub display: DisplayConfig,
    pub platforms: Vec<Platform>,
}

impl Default for FightConfig {
    fn default() -> Self {
        let arena = ArenaConfig::default();
        let span = arena.width / 5.0;
        FightConfig {
            platforms: vec![
                Platform { x: 160.0, y: 400.0, width: span, height: 20.0 },
                Platform { x: 50.0, y: 300.0, width: span, height: 20.0 },
                Platform { x: arena.width - 50.0 - span, y: 350.0, width: span, height: 20.0 },
                Platform { x: arena.width - 170.0 - span, y: 250.0, width: span, height: 20.0 },
            ],
            arena,
            player: PlayerConfig::default(),
            boss: BossConfig::default(),
            bullet: BulletConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl FightConfig {
    pub fn load(path: impl AsRef<Path>) -> FightResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| FightError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = FightConfig::parse(&content)?;
        Ok(config)
    }

    pub fn parse(content: &str) -> FightResult<Self> {
        let config: FightConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> String {
        // Only plain numbers, bools and enums: serialization cannot fail.
        toml::to_string(self).unwrap_or_default()
    }

    pub fn validate(&self) -> FightResult<()> {
        let invalid = |msg: &str| Err(FightError::InvalidConfig(msg.to_string()));

        if self.arena.fps == 0 {
            return invalid("arena.fps must be at least 1");
        }
        if self.arena.width <= 0.0 || self.arena.height <= 0.0 {
            return invalid("arena size must be positive");
        }
        if self.player.width <= 0.0 || self.player.height <= 0.0 {
            return invalid("player size must be positive");
        }
        if self.boss.width <= 0.0 || self.boss.height <= 0.0 {
            return invalid("boss size must be positive");
        }
        if self.bullet.width <= 0.0 || self.bullet.height <= 0.0 {
            return invalid("bullet size must be positive");
        }
        if self.player.max_health <= 0 || self.boss.max_health <= 0 {
            return invalid("max_health must be positive");
        }
        if self.boss.bullets_per_burst == 0 {
            return invalid("boss.bullets_per_burst must be at least 1");
        }
        if self.boss.behavior_duration_secs <= 0.0 {
            return invalid("boss.behavior_duration_secs must be positive");
        }
        if self.platforms.iter().any(|p| p.width <= 0.0 || p.height <= 0.0) {
            return invalid("platform size must be positive");
        }
        Ok(())
    }
}

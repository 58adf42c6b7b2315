/// All fight entity types: pure data plus geometry helpers.
///
/// Behavior lives in `player`, `boss`, `projectile` and `compute`; this module
/// only describes what a frame of the fight looks like.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FightError;
use crate::rules::Rules;

// ── Geometry ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }
}

/// Axis-aligned rectangle in arena units (origin top-left, y grows downward).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.h / 2.0
    }

    /// Strict overlap: rectangles that only share an edge do not collide.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    /// -1 for left, +1 for right.
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    pub fn flipped(self) -> Facing {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }
}

// ── Shared entity body ────────────────────────────────────────────────────────

/// Position, velocity, size and facing shared by every moving entity.
///
/// The hitbox is derived from the position instead of being stored, so its
/// top-left corner can never drift away from the entity.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub facing: Facing,
}

impl Body {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Body {
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            size: Vec2::new(w, h),
            facing: Facing::Right,
        }
    }

    pub fn from_rect(rect: Rect) -> Self {
        Body::new(rect.x, rect.y, rect.w, rect.h)
    }

    pub fn hitbox(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    /// Move by one tick of velocity.  Never clamps.
    pub fn integrate(&mut self) {
        self.pos.x += self.vel.x;
        self.pos.y += self.vel.y;
    }

    /// Keep the whole hitbox inside a `width` x `height` arena.
    pub fn clamp_to(&mut self, width: f32, height: f32) {
        self.pos.x = self.pos.x.clamp(0.0, (width - self.size.x).max(0.0));
        self.pos.y = self.pos.y.clamp(0.0, (height - self.size.y).max(0.0));
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayerAnimation {
    Standing,
    Jumping,
    Running,
    Shooting,
    Hurt,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub body: Body,
    pub max_health: i32,
    /// Signed: a heavy hit on low health overshoots below zero.
    pub health: i32,
    pub alive: bool,
    pub invincible: bool,
    /// Ticks left in the current invincibility window.
    pub invincibility_timer: u32,
    /// Gate for firing: cleared when the shooting animation completes a cycle.
    pub is_shooting: bool,
    pub animation: PlayerAnimation,
    /// Fractional frame index inside the current animation.
    pub animation_cursor: f32,
    pub bullets_landed: u32,
}

// ── Boss ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BossBehavior {
    Idle,
    Floating,
    Buster,
    SwordCharge,
}

impl BossBehavior {
    pub const ALL: [BossBehavior; 4] = [
        BossBehavior::Idle,
        BossBehavior::Floating,
        BossBehavior::Buster,
        BossBehavior::SwordCharge,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BossBehavior::Idle => "idle",
            BossBehavior::Floating => "floating",
            BossBehavior::Buster => "buster",
            BossBehavior::SwordCharge => "sword_charge",
        }
    }

    /// The three behaviors a transition out of `self` may pick.
    pub fn others(self) -> [BossBehavior; 3] {
        let mut out = [BossBehavior::Idle; 3];
        let mut n = 0;
        for b in BossBehavior::ALL {
            if b != self {
                out[n] = b;
                n += 1;
            }
        }
        out
    }
}

impl fmt::Display for BossBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BossBehavior {
    type Err = FightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BossBehavior::ALL
            .into_iter()
            .find(|b| b.label() == s)
            .ok_or_else(|| FightError::InvalidBehavior(s.to_string()))
    }
}

/// Burst bookkeeping, reset on every behavior transition.
#[derive(Clone, Debug, PartialEq)]
pub struct Burst {
    /// Bursts fired since the current behavior was entered.
    pub fired: u32,
    pub max_per_behavior: u32,
    /// Ticks until the next burst may fire.
    pub cooldown_timer: u32,
    pub cooldown: u32,
}

/// Sword-charge bookkeeping, reset whenever the charge is entered.
#[derive(Clone, Debug, PartialEq)]
pub struct SwordCharge {
    pub timer: u32,
    pub cooldown: u32,
    pub speed: f32,
}

impl SwordCharge {
    pub fn is_spent(&self) -> bool {
        self.timer >= self.cooldown
    }
}

#[derive(Clone, Debug)]
pub struct Boss {
    pub body: Body,
    pub max_health: i32,
    pub health: i32,
    pub alive: bool,
    pub behavior: BossBehavior,
    pub next_behavior: BossBehavior,
    /// Ticks spent in the current behavior.
    pub behavior_timer: u32,
    pub behavior_duration: u32,
    pub burst: Burst,
    pub charge: SwordCharge,
    /// Patrol direction while floating.
    pub patrol: Facing,
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BulletOwner {
    Player,
    Boss,
}

#[derive(Clone, Debug)]
pub struct Bullet {
    pub body: Body,
    pub direction: Facing,
    pub speed: f32,
    /// Decides which side the bullet may damage; never changes.
    pub owner: BulletOwner,
}

// ── Static geometry ───────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Platform {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

// ── Match bookkeeping ─────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GamePhase {
    InProgress,
    PlayerDefeated,
    BossDefeated,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MatchState {
    pub phase: GamePhase,
    /// Simulation ticks since the fight started.
    pub ticks: u64,
    /// Monotonic clock reading taken when the fight started.
    pub started_at_ms: u64,
    /// Wall-clock time since the fight started, as of the last tick.
    pub elapsed_ms: u64,
    /// Set exactly once, on the tick the boss falls.
    pub score: Option<i64>,
    pub bullets_landed: u32,
    pub boss_bullets_missed: u32,
}

// ── Per-tick input and output ─────────────────────────────────────────────────

/// What the player wants to do this tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputIntent {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
    pub shoot: bool,
}

/// Something that happened during a tick, for sound and logging.
#[derive(Clone, Debug, PartialEq)]
pub enum FightEvent {
    ShotFired,
    BurstFired { bullets: usize },
    PlayerHurt { damage: i32 },
    BossHit { damage: i32 },
    BehaviorChanged { from: BossBehavior, to: BossBehavior },
    PlayerDefeated,
    BossDefeated { score: i64 },
}

// ── Master fight state ────────────────────────────────────────────────────────

/// The entire fight.  Cloneable so `compute::tick` can return a new copy
/// without mutating the original.
#[derive(Clone, Debug)]
pub struct FightState {
    pub player: Player,
    pub boss: Boss,
    pub bullets: Vec<Bullet>,
    pub platforms: Vec<Platform>,
    pub rules: Rules,
    pub match_state: MatchState,
    /// Events produced by the most recent tick only.
    pub events: Vec<FightEvent>,
}

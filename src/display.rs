/// Rendering layer: all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// fight.  No game logic is performed; this module only translates state
/// into terminal commands, scaling the arena onto whatever terminal size is
/// available.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use boss_fight::assets::{AssetProvider, ImageHandle, Sprite, TerminalAssets};
use boss_fight::entities::{
    Boss, BossBehavior, Bullet, BulletOwner, Facing, FightState, GamePhase, Player,
    PlayerAnimation, Rect,
};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_HEALTH: Color = Color::Green;
const C_HUD_BOSS: Color = Color::Red;
const C_HUD_TIME: Color = Color::Yellow;
const C_PLATFORM: Color = Color::DarkYellow;
const C_PLAYER: Color = Color::Cyan;
const C_PLAYER_HURT: Color = Color::White;
const C_BOSS: Color = Color::Magenta;
const C_BOSS_CHARGE: Color = Color::Red;
const C_BULLET_PLAYER: Color = Color::Cyan;
const C_BULLET_BOSS: Color = Color::Magenta;
const C_HITBOX: Color = Color::Red;
const C_HINT: Color = Color::DarkGrey;

// ── Sprite sheet ──────────────────────────────────────────────────────────────

/// Every image the fight draws, resolved once through the asset provider.
pub struct SpriteSheet {
    standing: Vec<ImageHandle>,
    jumping: Vec<ImageHandle>,
    running: Vec<ImageHandle>,
    shooting: Vec<ImageHandle>,
    hurt: ImageHandle,
    boss_idle: Vec<ImageHandle>,
    boss_floating: ImageHandle,
    boss_buster: Vec<ImageHandle>,
    boss_charge: ImageHandle,
    bullet: ImageHandle,
}

impl SpriteSheet {
    pub fn load(assets: &mut impl AssetProvider) -> Self {
        SpriteSheet {
            standing: assets.load_frames("player_standing", PlayerAnimation::Standing.frame_count()),
            jumping: assets.load_frames("player_jumping", PlayerAnimation::Jumping.frame_count()),
            running: assets.load_frames("player_walking", PlayerAnimation::Running.frame_count()),
            shooting: assets.load_frames("player_shooting", PlayerAnimation::Shooting.frame_count()),
            hurt: assets.load_image_or_placeholder("player_hurt"),
            boss_idle: assets.load_frames("boss_enemy_idle", 2),
            boss_floating: assets.load_image_or_placeholder("boss_enemy_floating"),
            boss_buster: assets.load_frames("boss_enemy_buster", 2),
            boss_charge: assets.load_image_or_placeholder("boss_enemy_sword_charge"),
            bullet: assets.load_image_or_placeholder("bullet"),
        }
    }

    fn player(&self, player: &Player) -> ImageHandle {
        let frames = match player.animation {
            PlayerAnimation::Standing => &self.standing,
            PlayerAnimation::Jumping => &self.jumping,
            PlayerAnimation::Running => &self.running,
            PlayerAnimation::Shooting => &self.shooting,
            PlayerAnimation::Hurt => return self.hurt,
        };
        frames[player.animation_frame() % frames.len()]
    }

    fn boss(&self, boss: &Boss) -> ImageHandle {
        // Two-frame loops advance every 15 ticks.
        let frame = (boss.behavior_timer / 15) as usize;
        match boss.behavior {
            BossBehavior::Idle => self.boss_idle[frame % self.boss_idle.len()],
            BossBehavior::Floating => self.boss_floating,
            BossBehavior::Buster => self.boss_buster[frame % self.boss_buster.len()],
            BossBehavior::SwordCharge => self.boss_charge,
        }
    }
}

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Terminal size in cells.  Row 0 is the HUD, row 1 and row `rows - 2` are
/// the border, the last row holds the controls hint.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
}

/// A rectangle in terminal cells.
#[derive(Clone, Copy, Debug)]
struct Cells {
    col: u16,
    row: u16,
    w: u16,
    h: u16,
}

impl Viewport {
    pub fn current() -> std::io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        Ok(Viewport { cols, rows })
    }

    fn inner_cols(&self) -> u16 {
        self.cols.saturating_sub(2).max(1)
    }

    fn inner_rows(&self) -> u16 {
        self.rows.saturating_sub(4).max(1)
    }

    /// Map an arena rectangle onto terminal cells, at least one cell large
    /// and never outside the border.
    fn cells(&self, rect: &Rect, state: &FightState) -> Cells {
        let sx = self.inner_cols() as f32 / state.rules.width;
        let sy = self.inner_rows() as f32 / state.rules.height;
        let max_c = self.inner_cols() as f32;
        let max_r = self.inner_rows() as f32;

        let c0 = (rect.x * sx).floor().clamp(0.0, max_c - 1.0);
        let r0 = (rect.y * sy).floor().clamp(0.0, max_r - 1.0);
        let c1 = (rect.right() * sx).ceil().clamp(c0 + 1.0, max_c);
        let r1 = (rect.bottom() * sy).ceil().clamp(r0 + 1.0, max_r);

        Cells {
            col: 1 + c0 as u16,
            row: 2 + r0 as u16,
            w: (c1 - c0) as u16,
            h: (r1 - r0) as u16,
        }
    }
}

/// Everything besides the fight itself that changes what is drawn.
#[derive(Clone, Copy, Debug)]
pub struct RenderOptions {
    pub hitboxes: bool,
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    state: &FightState,
    sheet: &SpriteSheet,
    assets: &TerminalAssets,
    view: Viewport,
    opts: RenderOptions,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, view)?;
    draw_hud(out, state, view)?;

    out.queue(style::SetForegroundColor(C_PLATFORM))?;
    for platform in &state.platforms {
        let cells = view.cells(&platform.rect(), state);
        fill(out, cells, '=')?;
    }

    if state.boss.alive {
        draw_boss(out, state, sheet, assets, view)?;
    }
    if state.player.is_visible(&state.rules) {
        draw_player(out, state, sheet, assets, view)?;
    }
    for bullet in &state.bullets {
        draw_bullet(out, bullet, state, sheet, assets, view)?;
    }

    if opts.hitboxes {
        draw_hitboxes(out, state, view)?;
    }

    draw_controls_hint(out, view)?;

    if state.match_state.phase != GamePhase::InProgress {
        draw_end_screen(out, state, view)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: Viewport) -> std::io::Result<()> {
    let w = view.cols as usize;
    let h = view.rows;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    // Row 1: top bar
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    // Row h-2: bottom bar
    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    // Side walls
    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &FightState, view: Viewport) -> std::io::Result<()> {
    let p = &state.player;
    let b = &state.boss;

    // Player health, left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_HEALTH))?;
    out.queue(Print(format!("Health: {:>3}/{}", p.health.max(0), p.max_health)))?;

    // Boss health and behavior, centre
    let boss_str = format!(
        "BOSS {:>3}/{} [{}]",
        b.health.max(0),
        b.max_health,
        b.behavior
    );
    let bx = (view.cols / 2).saturating_sub(boss_str.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(bx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_BOSS))?;
    out.queue(Print(&boss_str))?;

    // Fight clock, right
    let time_str = format!("Time {:>6.1}s", state.match_state.elapsed_ms as f64 / 1000.0);
    let tx = view
        .cols
        .saturating_sub(time_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(tx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_TIME))?;
    out.queue(Print(&time_str))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(
    out: &mut W,
    state: &FightState,
    sheet: &SpriteSheet,
    assets: &TerminalAssets,
    view: Viewport,
) -> std::io::Result<()> {
    let p = &state.player;
    let color = if p.animation == PlayerAnimation::Hurt {
        C_PLAYER_HURT
    } else {
        C_PLAYER
    };
    out.queue(style::SetForegroundColor(color))?;
    let cells = view.cells(&p.body.hitbox(), state);
    draw_sprite(out, assets.sprite(sheet.player(p)), cells, p.body.facing == Facing::Left)
}

fn draw_boss<W: Write>(
    out: &mut W,
    state: &FightState,
    sheet: &SpriteSheet,
    assets: &TerminalAssets,
    view: Viewport,
) -> std::io::Result<()> {
    let b = &state.boss;
    let color = if b.behavior == BossBehavior::SwordCharge {
        C_BOSS_CHARGE
    } else {
        C_BOSS
    };
    out.queue(style::SetForegroundColor(color))?;
    let cells = view.cells(&b.body.hitbox(), state);
    draw_sprite(out, assets.sprite(sheet.boss(b)), cells, b.body.facing == Facing::Left)
}

fn draw_bullet<W: Write>(
    out: &mut W,
    bullet: &Bullet,
    state: &FightState,
    sheet: &SpriteSheet,
    assets: &TerminalAssets,
    view: Viewport,
) -> std::io::Result<()> {
    let color = match bullet.owner {
        BulletOwner::Player => C_BULLET_PLAYER,
        BulletOwner::Boss => C_BULLET_BOSS,
    };
    out.queue(style::SetForegroundColor(color))?;
    let cells = view.cells(&bullet.body.hitbox(), state);
    draw_sprite(
        out,
        assets.sprite(sheet.bullet),
        cells,
        bullet.direction == Facing::Left,
    )
}

/// Stretch `sprite` over `cells`; a missing sprite draws a solid block.
fn draw_sprite<W: Write>(
    out: &mut W,
    sprite: Option<&Sprite>,
    cells: Cells,
    flip: bool,
) -> std::io::Result<()> {
    let Some(sprite) = sprite else {
        return fill(out, cells, '█');
    };
    for r in 0..cells.h {
        let v = (r as f32 + 0.5) / cells.h as f32;
        for c in 0..cells.w {
            let u = (c as f32 + 0.5) / cells.w as f32;
            if let Some(glyph) = sprite.glyph_at(u, v, flip) {
                out.queue(cursor::MoveTo(cells.col + c, cells.row + r))?;
                out.queue(Print(glyph))?;
            }
        }
    }
    Ok(())
}

fn fill<W: Write>(out: &mut W, cells: Cells, glyph: char) -> std::io::Result<()> {
    let line: String = std::iter::repeat(glyph).take(cells.w as usize).collect();
    for r in 0..cells.h {
        out.queue(cursor::MoveTo(cells.col, cells.row + r))?;
        out.queue(Print(&line))?;
    }
    Ok(())
}

// ── Debug overlay ─────────────────────────────────────────────────────────────

fn draw_hitboxes<W: Write>(out: &mut W, state: &FightState, view: Viewport) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_HITBOX))?;
    let mut boxes = vec![state.player.body.hitbox()];
    if state.boss.alive {
        boxes.push(state.boss.body.hitbox());
    }
    boxes.extend(state.bullets.iter().map(|b| b.body.hitbox()));

    for rect in boxes {
        let cells = view.cells(&rect, state);
        let right = cells.col + cells.w - 1;
        let bottom = cells.row + cells.h - 1;
        for c in cells.col..=right {
            out.queue(cursor::MoveTo(c, cells.row))?;
            out.queue(Print('·'))?;
            out.queue(cursor::MoveTo(c, bottom))?;
            out.queue(Print('·'))?;
        }
        for r in cells.row..=bottom {
            out.queue(cursor::MoveTo(cells.col, r))?;
            out.queue(Print('·'))?;
            out.queue(cursor::MoveTo(right, r))?;
            out.queue(Print('·'))?;
        }
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, view: Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "A D / ← → : Move   W / ↑ : Jump   SPACE : Shoot   H : Hitboxes   Q : Quit",
    ))?;
    Ok(())
}

// ── End-of-fight overlay ──────────────────────────────────────────────────────

fn draw_end_screen<W: Write>(out: &mut W, state: &FightState, view: Viewport) -> std::io::Result<()> {
    let m = &state.match_state;
    let (banner, color) = match m.phase {
        GamePhase::BossDefeated => (
            &[
                "╔════════════════════╗",
                "║   BOSS  DEFEATED   ║",
                "╚════════════════════╝",
            ],
            Color::Yellow,
        ),
        _ => (
            &[
                "╔════════════════════╗",
                "║     GAME  OVER     ║",
                "╚════════════════════╝",
            ],
            Color::Red,
        ),
    };

    let mut details = Vec::new();
    if let Some(score) = m.score {
        details.push(format!("Score: {score}"));
    }
    details.push(format!(
        "Time {:.1}s   Hits {}   Dodged {}",
        m.elapsed_ms as f64 / 1000.0,
        m.bullets_landed,
        m.boss_bullets_missed
    ));
    details.push("R - Fight Again  Q - Quit".to_string());

    let cx = view.cols / 2;
    let total_rows = banner.len() + details.len();
    let start_row = (view.rows / 2).saturating_sub(total_rows as u16 / 2);

    out.queue(style::SetForegroundColor(color))?;
    for (i, line) in banner.iter().enumerate() {
        let col = cx.saturating_sub(line.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(Print(*line))?;
    }

    out.queue(style::SetForegroundColor(Color::White))?;
    for (i, line) in details.iter().enumerate() {
        let row = start_row + (banner.len() + i) as u16;
        let col = cx.saturating_sub(line.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(Print(line))?;
    }

    Ok(())
}

mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use boss_fight::assets::{AssetProvider, SoundHandle, TerminalAssets};
use boss_fight::clock::{Clock, FrameLimiter, MonotonicClock};
use boss_fight::compute::{init_state, tick};
use boss_fight::config::FightConfig;
use boss_fight::entities::{FightEvent, FightState, GamePhase, InputIntent};
use display::{RenderOptions, SpriteSheet, Viewport};

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// at 60 FPS a window of 8 frames (≈133 ms) outlasts the OS key-repeat
/// interval, so the key stays live while it is actively generating repeats.
const HOLD_WINDOW: u64 = 8;

#[derive(Parser, Debug)]
#[command(version, about = "Single-screen boss fight in the terminal")]
struct Args {
    /// TOML file overriding the default fight tuning.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the boss's behavior picks (random when omitted).
    #[arg(long)]
    seed: Option<u64>,

    /// Draw hitbox outlines over every entity.
    #[arg(long)]
    hitboxes: bool,

    /// Never ring the terminal bell.
    #[arg(long)]
    mute: bool,

    /// Directory of `<sprite>.txt` files replacing the built-in sprites.
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Write logs to this file (the terminal is taken by the game).
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print the effective configuration as TOML and exit.
    #[arg(long)]
    print_config: bool,
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

fn intent(key_frame: &HashMap<KeyCode, u64>, frame: u64) -> InputIntent {
    InputIntent {
        move_left: any_held(
            key_frame,
            &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')],
            frame,
        ),
        move_right: any_held(
            key_frame,
            &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')],
            frame,
        ),
        jump: any_held(
            key_frame,
            &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')],
            frame,
        ),
        shoot: any_held(key_frame, &[KeyCode::Char(' '), KeyCode::Backspace], frame),
    }
}

// ── Title screen ──────────────────────────────────────────────────────────────

enum TitleResult {
    Fight,
    Quit,
}

fn show_title<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> Result<TitleResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let view = Viewport::current()?;
    let cx = view.cols / 2;
    let cy = view.rows / 2;

    let lines: &[(&str, Color)] = &[
        ("★  BOSS  FIGHT  ★", Color::Cyan),
        ("", Color::White),
        ("Dodge the volleys, survive the sword charge,", Color::DarkGrey),
        ("and bring the boss down as fast as you can.", Color::DarkGrey),
        ("", Color::White),
        ("ENTER / SPACE : Fight      Q : Quit", Color::White),
    ];
    for (i, (line, color)) in lines.iter().enumerate() {
        let row = cy.saturating_sub(3) + i as u16;
        out.queue(cursor::MoveTo(
            cx.saturating_sub(line.chars().count() as u16 / 2),
            row,
        ))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*line))?;
    }
    out.queue(style::ResetColor)?;
    out.flush()?;

    // Block until the user makes a choice
    loop {
        if let Ok(Event::Key(KeyEvent { code, kind, .. })) = rx.recv() {
            if kind == KeyEventKind::Release {
                continue;
            }
            match code {
                KeyCode::Enter | KeyCode::Char(' ') => return Ok(TitleResult::Fight),
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(TitleResult::Quit);
                }
                _ => {}
            }
        }
    }
}

// ── Fight loop ────────────────────────────────────────────────────────────────

struct Session<'a> {
    config: &'a FightConfig,
    rng: StdRng,
    clock: MonotonicClock,
    assets: TerminalAssets,
    sheet: SpriteSheet,
    laser: Option<SoundHandle>,
    hitboxes: bool,
}

/// Returns `true` → quit program,  `false` → back to the title screen.
///
/// Input model: a `key_frame` map records the frame number of the last
/// press/repeat event for every key.  Each frame the keys still "fresh"
/// (within `HOLD_WINDOW` frames) become one `InputIntent`, so moving,
/// jumping and shooting can all be held at once.
fn fight_loop<W: Write>(
    out: &mut W,
    session: &mut Session,
    rx: &mpsc::Receiver<Event>,
) -> Result<bool> {
    let mut state: FightState = init_state(session.config, session.clock.now_ms(), &mut session.rng);
    let mut limiter = FrameLimiter::new(state.rules.fps);
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;
    info!("fight started");

    loop {
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            return Ok(true);
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(true);
                        }
                        KeyCode::Char('h') | KeyCode::Char('H') => {
                            session.hitboxes = !session.hitboxes;
                        }
                        KeyCode::Char('r') | KeyCode::Char('R')
                            if state.match_state.phase != GamePhase::InProgress =>
                        {
                            return Ok(false);
                        }
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        let input = intent(&key_frame, frame);
        state = tick(&state, &input, session.clock.now_ms(), &mut session.rng);
        play_events(session, &state.events);

        let view = Viewport::current()?;
        let opts = RenderOptions {
            hitboxes: session.hitboxes,
        };
        display::render(out, &state, &session.sheet, &session.assets, view, opts)?;
        if session.assets.take_bells() > 0 {
            out.queue(Print('\x07'))?;
            out.flush()?;
        }

        limiter.wait();
    }
}

fn play_events(session: &mut Session, events: &[FightEvent]) {
    for event in events {
        debug!(?event, "fight event");
        if let (FightEvent::ShotFired | FightEvent::BurstFired { .. }, Some(laser)) =
            (event, session.laser)
        {
            session.assets.play_sound(laser);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn load_config(args: &Args) -> Result<FightConfig> {
    let mut config = match &args.config {
        Some(path) => FightConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => FightConfig::default(),
    };
    config.display.hitboxes |= args.hitboxes;
    config.display.mute |= args.mute;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let config = load_config(&args)?;
    if args.print_config {
        print!("{}", config.to_toml());
        return Ok(());
    }

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut assets = TerminalAssets::new(args.assets.clone(), config.display.mute);
    let sheet = SpriteSheet::load(&mut assets);
    let laser = assets.load_sound("laser_sound").ok();
    let mut session = Session {
        config: &config,
        rng,
        clock: MonotonicClock::new(),
        assets,
        sheet,
        laser,
        hitboxes: config.display.hitboxes,
    };

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the fight loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = run(&mut out, &mut session, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(out: &mut W, session: &mut Session, rx: &mpsc::Receiver<Event>) -> Result<()> {
    loop {
        match show_title(out, rx)? {
            TitleResult::Quit => break,
            TitleResult::Fight => {
                if fight_loop(out, session, rx)? {
                    break;
                }
            }
        }
    }
    info!("quit");
    Ok(())
}

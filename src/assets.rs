/// Sprites and sounds behind the [`AssetProvider`] boundary.
///
/// The fight never stops for a missing asset: [`AssetProvider::load_frames`]
/// falls back from `name_N` to `name` and finally to a placeholder sprite.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use tracing::warn;

use crate::error::{FightError, FightResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageHandle(usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SoundHandle(usize);

pub trait AssetProvider {
    fn load_image(&mut self, name: &str) -> FightResult<ImageHandle>;

    fn load_sound(&mut self, name: &str) -> FightResult<SoundHandle>;

    /// Fire and forget.
    fn play_sound(&mut self, sound: SoundHandle);

    /// An image that always exists.
    fn placeholder(&mut self) -> ImageHandle;

    fn load_image_or_placeholder(&mut self, name: &str) -> ImageHandle {
        match self.load_image(name) {
            Ok(handle) => handle,
            Err(err) => {
                warn!(%err, "using placeholder sprite");
                self.placeholder()
            }
        }
    }

    /// Load `prefix_1 ..= prefix_count`.  A missing numbered frame falls
    /// back to the unnumbered `prefix`, then to the placeholder.
    fn load_frames(&mut self, prefix: &str, count: usize) -> Vec<ImageHandle> {
        (1..=count)
            .map(|i| match self.load_image(&format!("{prefix}_{i}")) {
                Ok(handle) => handle,
                Err(_) => self.load_image_or_placeholder(prefix),
            })
            .collect()
    }
}

// ── Text sprites ──────────────────────────────────────────────────────────────

/// A sprite drawn with characters.  Spaces are transparent.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    pub rows: Vec<String>,
}

impl Sprite {
    pub fn parse(text: &str) -> Sprite {
        let mut rows: Vec<String> = text.lines().map(|l| l.trim_end().to_string()).collect();
        while rows.last().is_some_and(|r| r.is_empty()) {
            rows.pop();
        }
        Sprite { rows }
    }

    pub fn width(&self) -> usize {
        self.rows.iter().map(|r| r.chars().count()).max().unwrap_or(0)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Sample the glyph at fractional coordinates `u`, `v` in `[0, 1)`,
    /// mirrored horizontally when `flip` is set.
    pub fn glyph_at(&self, u: f32, v: f32, flip: bool) -> Option<char> {
        let (w, h) = (self.width(), self.height());
        if w == 0 || h == 0 {
            return None;
        }
        let u = u.clamp(0.0, 0.999);
        let v = v.clamp(0.0, 0.999);
        let mut col = (u * w as f32) as usize;
        if flip {
            col = w - 1 - col;
        }
        let row = (v * h as f32) as usize;
        let c = self.rows[row].chars().nth(col).unwrap_or(' ');
        match c {
            ' ' => None,
            c if flip => Some(mirror(c)),
            c => Some(c),
        }
    }
}

fn mirror(c: char) -> char {
    match c {
        '(' => ')',
        ')' => '(',
        '<' => '>',
        '>' => '<',
        '/' => '\\',
        '\\' => '/',
        '[' => ']',
        ']' => '[',
        '{' => '}',
        '}' => '{',
        '«' => '»',
        '»' => '«',
        c => c,
    }
}

/// Built-in sprites, named the way the image files of the encounter are.
fn builtin_sprite(name: &str) -> Option<&'static str> {
    let art = match name {
        "player_standing_1" => " (o) \n /|\\ \n / \\ ",
        "player_standing_2" => " (o) \n /|\\ \n | | ",
        "player_walking_1" => " (o) \n /|\\ \n /|  ",
        "player_walking_2" => " (o) \n  |\\ \n / \\ ",
        "player_walking_3" => " (o) \n /|  \n  |\\ ",
        "player_walking_4" => " (o) \n /|\\ \n  / \\",
        "player_jumping_1" => "\\(o)/\n  |  \n / \\ ",
        "player_jumping_2" => " (o) \n\\/|\\/\n  ^  ",
        "player_shooting_1" => " (o) \n /|==\n / \\ ",
        "player_shooting_2" => " (o) \n /|=>\n / \\ ",
        "player_hurt" => " (x) \n \\|/ \n / \\ ",
        "boss_enemy_idle_1" => " [##] \n<(@@)>\n /||\\ \n/ || \\",
        "boss_enemy_idle_2" => " [##] \n<(oo)>\n /||\\ \n/ || \\",
        "boss_enemy_floating" => " [##] \n<(@@)>\n \\||/ \n ~~~~ ",
        "boss_enemy_buster_1" => " [##] \n((@@)=\n /||\\ \n/ || \\",
        "boss_enemy_buster_2" => " [##] \n((@@)>\n /||\\ \n/ || \\",
        "boss_enemy_sword_charge" => " [##] \n<(@@)-\n-||---\n/ || \\",
        "bullet" => "==",
        "placeholder" => "??\n??",
        _ => return None,
    };
    Some(art)
}

const BUILTIN_SOUNDS: &[&str] = &["laser_sound"];

// ── Terminal provider ─────────────────────────────────────────────────────────

/// Text sprites (optionally overridden by `<dir>/<name>.txt` files) and the
/// terminal bell as the only sound.
pub struct TerminalAssets {
    dir: Option<PathBuf>,
    sprites: Vec<Sprite>,
    by_name: HashMap<String, ImageHandle>,
    sounds: Vec<String>,
    muted: bool,
    pending_bells: u32,
}

impl TerminalAssets {
    pub fn new(dir: Option<PathBuf>, muted: bool) -> Self {
        TerminalAssets {
            dir,
            sprites: Vec::new(),
            by_name: HashMap::new(),
            sounds: Vec::new(),
            muted,
            pending_bells: 0,
        }
    }

    pub fn sprite(&self, handle: ImageHandle) -> Option<&Sprite> {
        self.sprites.get(handle.0)
    }

    pub fn sound_name(&self, handle: SoundHandle) -> Option<&str> {
        self.sounds.get(handle.0).map(String::as_str)
    }

    /// Bells requested since the last call.
    pub fn take_bells(&mut self) -> u32 {
        std::mem::take(&mut self.pending_bells)
    }

    fn read_override(&self, name: &str) -> Option<Sprite> {
        let path = self.dir.as_ref()?.join(format!("{name}.txt"));
        let text = fs::read_to_string(path).ok()?;
        Some(Sprite::parse(&text))
    }

    fn insert(&mut self, name: &str, sprite: Sprite) -> ImageHandle {
        let handle = ImageHandle(self.sprites.len());
        self.sprites.push(sprite);
        self.by_name.insert(name.to_string(), handle);
        handle
    }
}

impl AssetProvider for TerminalAssets {
    fn load_image(&mut self, name: &str) -> FightResult<ImageHandle> {
        if let Some(&handle) = self.by_name.get(name) {
            return Ok(handle);
        }
        let sprite = self
            .read_override(name)
            .or_else(|| builtin_sprite(name).map(Sprite::parse))
            .ok_or_else(|| FightError::AssetMissing(name.to_string()))?;
        Ok(self.insert(name, sprite))
    }

    fn load_sound(&mut self, name: &str) -> FightResult<SoundHandle> {
        if !BUILTIN_SOUNDS.contains(&name) {
            return Err(FightError::AssetMissing(name.to_string()));
        }
        let index = match self.sounds.iter().position(|s| s == name) {
            Some(index) => index,
            None => {
                self.sounds.push(name.to_string());
                self.sounds.len() - 1
            }
        };
        Ok(SoundHandle(index))
    }

    fn play_sound(&mut self, _sound: SoundHandle) {
        if !self.muted {
            self.pending_bells += 1;
        }
    }

    fn placeholder(&mut self) -> ImageHandle {
        match self.by_name.get("placeholder") {
            Some(&handle) => handle,
            None => self.insert("placeholder", Sprite::parse("??\n??")),
        }
    }
}

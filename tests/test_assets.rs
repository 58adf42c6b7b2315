use std::fs;

use boss_fight::assets::{AssetProvider, Sprite, TerminalAssets};
use boss_fight::error::FightError;

// ── Sprites ───────────────────────────────────────────────────────────────────

#[test]
fn parse_keeps_inner_blank_rows() {
    let s = Sprite::parse("ab\n\ncd\n\n");
    assert_eq!(s.rows, vec!["ab", "", "cd"]);
    assert_eq!(s.height(), 3);
    assert_eq!(s.width(), 2);
}

#[test]
fn spaces_are_transparent() {
    let s = Sprite::parse("a b");
    assert_eq!(s.glyph_at(0.0, 0.0, false), Some('a'));
    assert_eq!(s.glyph_at(0.5, 0.0, false), None);
}

#[test]
fn flipped_sprites_mirror_glyphs() {
    let s = Sprite::parse("(>");
    assert_eq!(s.glyph_at(0.0, 0.0, false), Some('('));
    assert_eq!(s.glyph_at(0.0, 0.0, true), Some('<'));
    assert_eq!(s.glyph_at(0.9, 0.0, true), Some(')'));
}

#[test]
fn empty_sprite_draws_nothing() {
    assert_eq!(Sprite::parse("").glyph_at(0.5, 0.5, false), None);
}

// ── TerminalAssets ────────────────────────────────────────────────────────────

#[test]
fn builtin_images_load_once() {
    let mut assets = TerminalAssets::new(None, false);
    let a = assets.load_image("bullet").unwrap();
    let b = assets.load_image("bullet").unwrap();
    assert_eq!(a, b);
    assert_eq!(assets.sprite(a).unwrap().rows, vec!["=="]);
}

#[test]
fn missing_image_is_an_error() {
    let mut assets = TerminalAssets::new(None, false);
    let err = assets.load_image("dragon").unwrap_err();
    assert!(matches!(err, FightError::AssetMissing(name) if name == "dragon"));
}

#[test]
fn missing_image_falls_back_to_placeholder() {
    let mut assets = TerminalAssets::new(None, false);
    let handle = assets.load_image_or_placeholder("dragon");
    assert_eq!(handle, assets.placeholder());
}

#[test]
fn frames_fall_back_to_unnumbered_name() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("ghost.txt"), "oo\n~~\n").unwrap();
    fs::write(dir.path().join("ghost_2.txt"), "OO\n~~\n").unwrap();
    let mut assets = TerminalAssets::new(Some(dir.path().to_path_buf()), false);

    let frames = assets.load_frames("ghost", 3);
    let plain = assets.load_image("ghost").unwrap();
    assert_eq!(frames.len(), 3);
    assert_eq!(frames[0], plain);
    assert_ne!(frames[1], plain);
    assert_eq!(frames[2], plain);
}

#[test]
fn frames_without_any_art_use_placeholder() {
    let mut assets = TerminalAssets::new(None, false);
    let placeholder = assets.placeholder();
    assert_eq!(assets.load_frames("dragon", 2), vec![placeholder, placeholder]);
}

#[test]
fn builtin_player_frames_are_distinct() {
    let mut assets = TerminalAssets::new(None, false);
    let walking = assets.load_frames("player_walking", 4);
    let placeholder = assets.placeholder();
    assert!(walking.iter().all(|h| *h != placeholder));
    assert_ne!(walking[0], walking[1]);
}

#[test]
fn override_file_replaces_builtin() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("bullet.txt"), "->\n").unwrap();
    let mut assets = TerminalAssets::new(Some(dir.path().to_path_buf()), false);

    let handle = assets.load_image("bullet").unwrap();
    assert_eq!(assets.sprite(handle).unwrap().rows, vec!["->"]);
}

#[test]
fn sounds_ring_the_bell_unless_muted() {
    let mut assets = TerminalAssets::new(None, false);
    let laser = assets.load_sound("laser_sound").unwrap();
    assert_eq!(assets.sound_name(laser), Some("laser_sound"));
    assets.play_sound(laser);
    assets.play_sound(laser);
    assert_eq!(assets.take_bells(), 2);
    assert_eq!(assets.take_bells(), 0);

    let mut muted = TerminalAssets::new(None, true);
    let laser = muted.load_sound("laser_sound").unwrap();
    muted.play_sound(laser);
    assert_eq!(muted.take_bells(), 0);
}

#[test]
fn unknown_sound_is_an_error() {
    let mut assets = TerminalAssets::new(None, false);
    assert!(matches!(
        assets.load_sound("explosion"),
        Err(FightError::AssetMissing(_))
    ));
}

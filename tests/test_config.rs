use std::fs;

use boss_fight::config::FightConfig;
use boss_fight::entities::BossBehavior;
use boss_fight::error::FightError;
use boss_fight::rules::{ticks, Rules};

#[test]
fn defaults_match_the_stock_encounter() {
    let c = FightConfig::default();
    assert_eq!((c.arena.width, c.arena.height, c.arena.fps), (640.0, 480.0, 60));
    assert_eq!(c.player.max_health, 50);
    assert_eq!(c.boss.max_health, 150);
    assert_eq!(c.boss.opening_behavior, BossBehavior::Idle);
    assert_eq!(c.bullet.speed, 7.0);
    assert_eq!(c.platforms.len(), 4);
    assert_eq!(c.platforms[2].x, 640.0 - 50.0 - 128.0);
    assert!(c.validate().is_ok());
}

#[test]
fn partial_file_keeps_other_defaults() {
    let c = FightConfig::parse(
        r#"
        [boss]
        max_health = 300
        opening_behavior = "buster"

        [display]
        hitboxes = true
        "#,
    )
    .unwrap();
    assert_eq!(c.boss.max_health, 300);
    assert_eq!(c.boss.opening_behavior, BossBehavior::Buster);
    assert_eq!(c.boss.charge_speed, 4.0);
    assert!(c.display.hitboxes);
    assert_eq!(c.player, FightConfig::default().player);
    assert_eq!(c.platforms.len(), 4);
}

#[test]
fn platforms_can_be_replaced() {
    let c = FightConfig::parse(
        r#"
        [[platforms]]
        x = 10.0
        y = 20.0
        width = 30.0
        height = 5.0
        "#,
    )
    .unwrap();
    assert_eq!(c.platforms.len(), 1);
    assert_eq!(c.platforms[0].width, 30.0);
}

#[test]
fn unknown_behavior_name_fails_to_parse() {
    let err = FightConfig::parse("[boss]\nopening_behavior = \"dance\"\n").unwrap_err();
    assert!(matches!(err, FightError::ConfigParse(_)));
}

#[test]
fn validation_rejects_broken_values() {
    for bad in [
        "[arena]\nfps = 0\n",
        "[player]\nmax_health = 0\n",
        "[boss]\nwidth = -1.0\n",
        "[boss]\nbullets_per_burst = 0\n",
        "[boss]\nbehavior_duration_secs = 0.0\n",
        "[[platforms]]\nx = 0.0\ny = 0.0\nwidth = 0.0\nheight = 5.0\n",
    ] {
        let err = FightConfig::parse(bad).unwrap_err();
        assert!(matches!(err, FightError::InvalidConfig(_)), "{bad:?} gave {err}");
    }
}

#[test]
fn load_reads_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fight.toml");
    fs::write(&path, "[bullet]\ndamage = 10\n").unwrap();

    let c = FightConfig::load(&path).unwrap();
    assert_eq!(c.bullet.damage, 10);
}

#[test]
fn load_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    let err = FightConfig::load(&path).unwrap_err();
    match err {
        FightError::ConfigRead { path: p, .. } => assert_eq!(p, path),
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn printed_config_parses_back() {
    let c = FightConfig::default();
    assert_eq!(FightConfig::parse(&c.to_toml()).unwrap(), c);
}

// ── Rules ─────────────────────────────────────────────────────────────────────

#[test]
fn seconds_become_ticks() {
    assert_eq!(ticks(3.0, 60), 180);
    assert_eq!(ticks(0.5, 60), 30);
    assert_eq!(ticks(0.5, 30), 15);
    assert_eq!(ticks(-1.0, 60), 0);
}

#[test]
fn rules_from_default_config() {
    let r = Rules::default();
    assert_eq!(r.invincibility_ticks, 180);
    assert_eq!(r.flash_ticks, 30);
    assert_eq!(r.behavior_duration, 120);
    assert_eq!(r.idle_fire_interval, 180);
    assert_eq!(r.buster_snap_interval, 7_200);
    assert_eq!(r.sword_charge_cooldown, 240);
    assert_eq!(r.burst_cooldown, 30);
    assert_eq!(r.bullet_size.x, 16.0);
    assert_eq!(r.bullet_size.y, 8.0);
}

#[test]
fn rules_follow_custom_frame_rate() {
    let c = FightConfig::parse("[arena]\nfps = 30\n").unwrap();
    let r = Rules::from_config(&c);
    assert_eq!(r.fps, 30);
    assert_eq!(r.invincibility_ticks, 90);
    assert_eq!(r.behavior_duration, 60);
}

mod common;

use std::rc::Rc;

use common::*;
use platform_shooter::compute::input::InputState;
use platform_shooter::compute::*;
use platform_shooter::entities::*;
use platform_shooter::error::GameError;
use platform_shooter::levels::{EntityRecord, LevelRecord};
use platform_shooter::map::MapData;

fn entity_record(name: &str, kind: Option<&str>, weapon: &str) -> EntityRecord {
    EntityRecord {
        name: name.to_string(),
        lives: 3,
        weapon: weapon.to_string(),
        kind: kind.map(str::to_string),
        shoots: true,
    }
}

fn record(player_weapon: &str, enemies: Vec<EntityRecord>) -> LevelRecord {
    LevelRecord {
        id: 4,
        name: "Test Level".to_string(),
        map: "test.json".to_string(),
        player: entity_record("Player", None, player_weapon),
        enemies,
        unlocked: true,
        extra: Default::default(),
    }
}

/// Reference-size field, so scaled physics equal the defaults.
fn big_map() -> Rc<MapData> {
    Rc::new(field(10, 10, 2560.0, 1600.0, &[]))
}

fn no_input() -> InputState {
    InputState::default()
}

// ── init_level ────────────────────────────────────────────────────────────────

#[test]
fn init_level_builds_player() {
    let level = record("normal", vec![]);
    let s = init_level(&level, big_map(), &mut seeded_rng()).expect("valid level");

    assert_eq!(s.level_id, 4);
    assert_eq!(s.level_name, "Test Level");
    assert_eq!(s.frame, 0);
    assert!(s.result.is_none());
    assert!(s.player_bullets.is_empty() && s.enemy_bullets.is_empty());

    let p = s.player().expect("player");
    assert_eq!((p.width, p.height), (128.0, 160.0));
    assert_eq!(p.rect, Rect::new(319.0, 240.0, 128.0, 160.0));
    assert_eq!(p.lives, 3);
    assert_eq!(p.kind, EntityKind::Player);
    assert_eq!(p.weapon.kind, WeaponKind::Single);
    assert_eq!((p.weapon.bullet_width, p.weapon.bullet_height), (80.0, 40.0));
    assert_eq!(s.player_view, PlayerView { center_x: 383.0, platform: 0.0 });
}

#[test]
fn init_level_builds_enemies() {
    let level = record(
        "triple",
        vec![
            entity_record("Grunt", Some("default"), "normal"),
            entity_record("Pip", Some("shrinker"), "Triple"),
            entity_record("Shade", Some("invisible"), "normal"),
        ],
    );
    let s = init_level(&level, big_map(), &mut seeded_rng()).expect("valid level");
    assert_eq!(s.player().map(|p| p.weapon.kind), Some(WeaponKind::TripleShotter));
    assert_eq!(s.enemies.len(), 3);

    let grunt = &s.enemies[0];
    assert_eq!((grunt.width, grunt.height), (128.0, 160.0));
    let brain = grunt.brain().expect("enemy");
    assert_eq!(brain.variant, EnemyVariant::Default);
    // |15 * -22| - 64
    assert_eq!(brain.vision_range, 266.0);

    let pip = &s.enemies[1];
    assert_eq!((pip.width, pip.height), (64.0, 80.0));
    assert_eq!(pip.weapon.kind, WeaponKind::TripleShotter);
    // bullets sized from the full body
    assert_eq!((pip.weapon.bullet_width, pip.weapon.bullet_height), (80.0, 40.0));
    assert_eq!(pip.brain().map(|b| b.vision_range), Some(298.0));

    assert_eq!(s.enemies[2].brain().map(|b| b.variant), Some(EnemyVariant::Invisible));
    assert!(!s.enemies[2].is_visible());

    for enemy in &s.enemies {
        assert_eq!(enemy.rect.y, 0.0);
        let spawn_center = ((2560.0 - enemy.width) / 2.0).floor();
        assert!(enemy.rect.x >= (spawn_center * 0.25).floor());
        assert!(enemy.rect.x <= (spawn_center * 1.75).floor());
        assert!(!enemy.on_ground);
    }
}

#[test]
fn init_level_scales_physics_to_field() {
    let map = Rc::new(field(10, 10, 1280.0, 800.0, &[]));
    let s = init_level(&record("normal", vec![]), map, &mut seeded_rng()).expect("valid level");
    let p = s.player().expect("player");
    assert_eq!(p.physics.gravity, 0.5);
    assert_eq!(p.physics.move_speed, 5.0);
    assert_eq!(p.weapon.bullet_speed, 7.5);
}

#[test]
fn init_level_rejects_enemy_without_type() {
    let level = record("normal", vec![entity_record("Ghost", None, "normal")]);
    let err = init_level(&level, big_map(), &mut seeded_rng()).unwrap_err();
    assert!(matches!(err, GameError::MissingEnemyType(name) if name == "Ghost"));
}

#[test]
fn init_level_rejects_unknown_enemy_type() {
    let level = record("normal", vec![entity_record("Drake", Some("dragon"), "normal")]);
    let err = init_level(&level, big_map(), &mut seeded_rng()).unwrap_err();
    assert!(matches!(err, GameError::UnknownEnemyType(kind) if kind == "dragon"));
}

#[test]
fn init_level_rejects_unknown_weapon() {
    let level = record("laser", vec![]);
    let err = init_level(&level, big_map(), &mut seeded_rng()).unwrap_err();
    assert!(matches!(err, GameError::UnknownWeapon(_)));
}

// ── tick ──────────────────────────────────────────────────────────────────────

fn standing_player(map_tile: Rect) -> Entity {
    let mut p = player_at(0.0, 0.0);
    stand_on(&mut p, map_tile, 200.0);
    p
}

#[test]
fn tick_is_pure() {
    let s0 = level_state(map_with(&[(5, 5)]), vec![standing_player(tile(5, 5))], vec![]);
    let before = s0.players.clone();
    let s1 = tick(&s0, &no_input(), &mut seeded_rng());
    assert_eq!(s0.frame, 0);
    assert_eq!(s0.players, before);
    assert!(s0.result.is_none());
    assert_eq!(s1.frame, 1);
    assert!(Rc::ptr_eq(&s0.map, &s1.map));
}

#[test]
fn player_losing_last_life_loses_the_round() {
    let mut p = player_at(200.0, 195.0);
    p.lives = 1;
    p.vy = 10.0;
    let mut enemy = enemy_at(0.0, 0.0);
    stand_on(&mut enemy, tile(2, 5), 90.0);
    let s0 = level_state(map_with(&[(2, 5)]), vec![p], vec![enemy]);

    let s1 = tick(&s0, &no_input(), &mut seeded_rng());
    assert!(s1.player().is_none());
    assert_eq!(s1.enemies.len(), 1);
    assert_eq!(s1.phase(), RoundPhase::PlayerLost);
    assert_eq!(s1.result, Some(LevelResult { player_won: false, finish_tick: 1 }));
    assert_eq!(newly_decided(&s0, &s1), s1.result);
}

#[test]
fn clearing_enemies_wins_the_round() {
    let mut enemy = enemy_at(200.0, 195.0);
    enemy.lives = 1;
    enemy.vy = 10.0;
    let s0 = level_state(
        map_with(&[(5, 5)]),
        vec![standing_player(tile(5, 5))],
        vec![enemy],
    );

    let s1 = tick(&s0, &no_input(), &mut seeded_rng());
    assert!(s1.enemies.is_empty());
    assert_eq!(s1.phase(), RoundPhase::PlayerWon);
    assert_eq!(newly_decided(&s0, &s1), Some(LevelResult { player_won: true, finish_tick: 1 }));

    // decided once; later ticks keep the first result
    let s2 = tick(&s1, &no_input(), &mut seeded_rng());
    assert_eq!(s2.result, s1.result);
    assert_eq!(newly_decided(&s1, &s2), None);
}

#[test]
fn returns_to_menu_after_delay() {
    let mut rng = seeded_rng();
    let mut s = level_state(map_with(&[(5, 5)]), vec![standing_player(tile(5, 5))], vec![]);

    s = tick(&s, &no_input(), &mut rng);
    assert_eq!(s.result.map(|r| r.finish_tick), Some(1));

    while s.frame < 1 + SWITCH_TO_MENU_DELAY {
        assert!(!should_return_to_menu(&s), "frame {}", s.frame);
        s = tick(&s, &no_input(), &mut rng);
    }
    assert!(!should_return_to_menu(&s));
    s = tick(&s, &no_input(), &mut rng);
    assert!(should_return_to_menu(&s));
}

#[test]
fn running_round_never_returns_to_menu() {
    let s = level_state(map_with(&[]), vec![player_at(0.0, 0.0)], vec![enemy_at(0.0, 0.0)]);
    let s = LevelState { frame: 500, ..s };
    assert!(!should_return_to_menu(&s));
}

#[test]
fn new_shot_moves_from_next_tick() {
    let mut rng = seeded_rng();
    let s0 = level_state(map_with(&[(5, 5)]), vec![standing_player(tile(5, 5))], vec![]);
    let shoot = InputState { shoot: true, ..InputState::default() };

    let s1 = tick(&s0, &shoot, &mut rng);
    assert_eq!(s1.player_bullets.len(), 1);
    // centered on the muzzle at (220, 85)
    assert_eq!(s1.player_bullets[0].rect.x, 215.0);
    assert!(s1.players[0].shooting);

    let s2 = tick(&s1, &no_input(), &mut rng);
    assert_eq!(s2.player_bullets[0].rect.x, 230.0);
}

#[test]
fn enemy_bullets_stack_knockback() {
    let mut rng = seeded_rng();
    let mut s0 = level_state(map_with(&[(5, 5), (6, 5)]), vec![standing_player(tile(5, 5))], vec![]);
    for y in [85.0, 90.0] {
        s0.enemy_bullets.push(Bullet {
            rect: Rect::new(205.0, y, 10.0, 5.0),
            speed: 0.0,
            damage: 6.0,
            facing_right: true,
        });
    }

    let s1 = tick(&s0, &no_input(), &mut rng);
    assert_eq!(s1.players[0].knockback_x, 12.0);
    assert!(s1.enemy_bullets.is_empty());

    let s2 = tick(&s1, &no_input(), &mut rng);
    assert_eq!(s2.players[0].rect.x, 212.0);
}

fn ledge() -> MapData {
    map_with(&[(2, 5), (3, 5), (4, 5), (5, 5), (6, 5), (7, 5)])
}

#[test]
fn player_bullet_knocks_enemy_back() {
    let mut enemy = enemy_at(0.0, 0.0);
    stand_on(&mut enemy, tile(7, 5), 280.0);
    let mut s0 = level_state(ledge(), vec![standing_player(tile(5, 5))], vec![enemy]);
    s0.player_bullets.push(Bullet {
        rect: Rect::new(260.0, 85.0, 10.0, 5.0),
        speed: 15.0,
        damage: 50.0,
        facing_right: true,
    });

    let s1 = tick(&s0, &no_input(), &mut seeded_rng());
    assert!(s1.player_bullets.is_empty());
    assert_eq!(s1.enemies[0].knockback_x, 50.0);
    assert!(s1.result.is_none());
}

#[test]
fn enemy_shot_joins_enemy_side() {
    let mut enemy = enemy_at(0.0, 0.0);
    stand_on(&mut enemy, tile(7, 5), 280.0);
    if let EntityKind::Enemy(brain) = &mut enemy.kind {
        brain.shoots = true;
    }
    let s0 = level_state(ledge(), vec![standing_player(tile(5, 5))], vec![enemy]);

    let mut rng = seeded_rng();
    let s1 = tick(&s0, &no_input(), &mut rng);
    assert!(s1.player_bullets.is_empty());
    assert_eq!(s1.enemy_bullets.len(), 1);
    // fired leftward from the enemy's left edge, not moved yet
    assert_eq!(s1.enemy_bullets[0].rect.x, 275.0);
    assert!(s1.enemy_bullets[0].speed < 0.0);

    let s2 = tick(&s1, &no_input(), &mut rng);
    assert_eq!(s2.enemy_bullets[0].rect.x, 260.0);
}

#[test]
fn player_view_tracks_player() {
    let s0 = level_state(map_with(&[(5, 5)]), vec![standing_player(tile(5, 5))], vec![]);
    let right = InputState { right: true, ..InputState::default() };
    let s1 = tick(&s0, &right, &mut seeded_rng());
    assert_eq!(s1.player_view, PlayerView { center_x: 220.0, platform: 100.0 });
}

#[test]
fn seeded_runs_are_deterministic() {
    let level = record(
        "normal",
        vec![
            entity_record("Grunt", Some("default"), "normal"),
            entity_record("Pip", Some("shrinker"), "triple"),
        ],
    );
    let map = Rc::new(field(
        10,
        10,
        2560.0,
        1600.0,
        &(0..10).map(|c| Rect::new(c as f32 * 256.0, 1200.0, 256.0, 160.0)).collect::<Vec<_>>(),
    ));

    let run = || {
        let mut rng = seeded_rng();
        let mut s = init_level(&level, Rc::clone(&map), &mut rng).expect("valid level");
        for _ in 0..300 {
            s = tick(&s, &InputState { shoot: true, ..InputState::default() }, &mut rng);
        }
        s
    };
    let (a, b) = (run(), run());
    assert_eq!(a.frame, 300);
    assert_eq!(a.players, b.players);
    assert_eq!(a.enemies, b.enemies);
    assert_eq!(a.player_bullets, b.player_bullets);
    assert_eq!(a.enemy_bullets, b.enemy_bullets);
}

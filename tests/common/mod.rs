//! Fixtures shared by the integration tests.
//!
//! The reference field is 400x200 pixels split into a 10x10 grid, so every
//! tile is 40 wide and 20 tall and a tile in row `r` has its top at `20 * r`.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use platform_shooter::entities::{
    EnemyBrain, EnemyVariant, Entity, EntityKind, EntityState, LevelState, PlayerView, Rect,
    Weapon, WeaponKind,
};
use platform_shooter::map::MapData;
use platform_shooter::physics::Physics;

pub const MAP_W: f32 = 400.0;
pub const MAP_H: f32 = 200.0;
pub const TILE_W: f32 = 40.0;
pub const TILE_H: f32 = 20.0;

pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

pub fn tile(col: usize, row: usize) -> Rect {
    Rect::new(col as f32 * TILE_W, row as f32 * TILE_H, TILE_W, TILE_H)
}

/// Tiles given as (col, row); list them top to bottom within a column.
pub fn map_with(tiles: &[(usize, usize)]) -> MapData {
    let rects: Vec<Rect> = tiles.iter().map(|&(c, r)| tile(c, r)).collect();
    field(10, 10, MAP_W, MAP_H, &rects)
}

/// A map with explicit tiles, each filed under the grid column it occupies,
/// the same bucketing the loader uses.
pub fn field(rows: usize, cols: usize, width: f32, height: f32, tiles: &[Rect]) -> MapData {
    let mut map = MapData { rows, cols, width, height, platforms: BTreeMap::new() };
    for tile in tiles {
        let col = map.column_of(tile.x + tile.w / 2.0).unwrap_or(0);
        map.platforms.entry(col).or_default().push(*tile);
    }
    map
}

pub fn weapon() -> Weapon {
    Weapon {
        kind: WeaponKind::Single,
        bullet_speed: 15.0,
        bullet_damage: 50.0,
        bullet_width: 10.0,
        bullet_height: 5.0,
    }
}

/// 20x20 player with its top-left corner at (x, y), airborne and idle.
pub fn player_at(x: f32, y: f32) -> Entity {
    Entity {
        name: "Player".to_string(),
        lives: 3,
        kind: EntityKind::Player,
        width: 20.0,
        height: 20.0,
        rect: Rect::new(x, y, 20.0, 20.0),
        vx: 0.0,
        vy: 0.0,
        knockback_x: 0.0,
        platform: 0.0,
        on_ground: false,
        skip_platform: false,
        facing_right: true,
        shooting: false,
        frame_index: 0.0,
        state: EntityState::Idle,
        weapon: weapon(),
        physics: Physics::default(),
    }
}

/// Same body as `player_at`, driven by the enemy policy. Does not shoot.
pub fn enemy_at(x: f32, y: f32) -> Entity {
    let mut enemy = player_at(x, y);
    enemy.name = "Grunt".to_string();
    enemy.kind = EntityKind::Enemy(EnemyBrain {
        variant: EnemyVariant::Default,
        vision_range: 100.0,
        shoots: false,
    });
    enemy
}

/// Put `entity` at rest on top of `tile`, horizontally at `x`.
pub fn stand_on(entity: &mut Entity, tile: Rect, x: f32) {
    entity.rect.x = x;
    entity.rect.y = tile.top() - entity.height;
    entity.vy = 0.0;
    entity.on_ground = true;
    entity.platform = tile.top();
}

pub fn level_state(map: MapData, players: Vec<Entity>, enemies: Vec<Entity>) -> LevelState {
    let player_view = players
        .first()
        .map(|p| PlayerView { center_x: p.rect.center_x(), platform: p.platform })
        .unwrap_or_default();
    LevelState {
        level_id: 0,
        level_name: "Test".to_string(),
        map: Rc::new(map),
        players,
        enemies,
        player_bullets: Vec::new(),
        enemy_bullets: Vec::new(),
        player_view,
        result: None,
        frame: 0,
    }
}

/// Fresh, empty scratch directory unique to this test process.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("platform_shooter_{}_{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

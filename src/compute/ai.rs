//! Enemy decision policy, evaluated once per tick before the entity update.
//!
//! Off the player's platform the enemy works its way toward it by dropping
//! through platforms or jumping up. On the same platform it faces the
//! player, shoots, dodges incoming bullets and drifts toward the middle of
//! the map.

use crate::compute::movement::{is_jumpable_platform_above, is_platform_before, is_platform_below};
use crate::compute::weapon::shoot;
use crate::entities::{Bullet, Entity, EntityKind, PlayerView, Rect};
use crate::map::MapData;

pub fn think(
    enemy: &mut Entity,
    player: &PlayerView,
    player_bullets: &[Bullet],
    map: &MapData,
    sink: impl FnMut(Bullet),
) {
    let EntityKind::Enemy(brain) = &enemy.kind else {
        return;
    };
    let shoots = brain.shoots;

    if enemy.platform != player.platform {
        navigate_to_platform(enemy, player.platform, map);
    } else {
        face_player(enemy, player.center_x);
        if shoots {
            shoot(enemy, sink);
        }
        dodge_bullets(enemy, player_bullets);
        move_to_map_center(enemy, map);
    }
}

// ── Same platform ─────────────────────────────────────────────────────────────

/// Facing is locked while a shot is animating.
fn face_player(enemy: &mut Entity, player_center_x: f32) {
    if !enemy.shooting {
        enemy.facing_right = player_center_x >= enemy.rect.center_x();
    }
}

/// Body-sized look-ahead box `vision_range` pixels away in the facing direction.
pub fn vision_probe(enemy: &Entity) -> Rect {
    let range = enemy.brain().map_or(0.0, |b| b.vision_range);
    let offset = if enemy.facing_right { range } else { -range };
    Rect::new(enemy.rect.x + offset, enemy.rect.y, enemy.width, enemy.height)
}

/// Jump when a hostile bullet enters the probe.
fn dodge_bullets(enemy: &mut Entity, player_bullets: &[Bullet]) {
    let probe = vision_probe(enemy);
    if player_bullets.iter().any(|b| b.rect.intersects(&probe)) && enemy.on_ground {
        enemy.on_ground = false;
        enemy.vy = enemy.physics.jump_speed;
    }
}

/// Walk toward the map center while the platform continues ahead, the enemy
/// is more than half a body away, and walking that way does not mean
/// turning around.
fn move_to_map_center(enemy: &mut Entity, map: &MapData) {
    enemy.vx = 0.0;
    if !is_platform_before(enemy, map) {
        return;
    }

    let distance = enemy.rect.center_x() - map.center_x();
    let tolerance = (enemy.width / 2.0).floor();
    if distance.abs() <= tolerance {
        return;
    }

    if distance < 0.0 && enemy.facing_right {
        enemy.vx = enemy.physics.move_speed;
    } else if distance > 0.0 && !enemy.facing_right {
        enemy.vx = -enemy.physics.move_speed;
    }
}

// ── Navigation ────────────────────────────────────────────────────────────────

/// Platforms are identified by their top; a larger top is lower on screen.
fn navigate_to_platform(enemy: &mut Entity, target_platform: f32, map: &MapData) {
    if !enemy.on_ground {
        return;
    }
    if enemy.platform < target_platform {
        move_down(enemy, map);
    } else {
        move_up(enemy, map);
    }
}

fn move_down(enemy: &mut Entity, map: &MapData) {
    if is_platform_below(enemy, map) {
        enemy.vx = 0.0;
        enemy.on_ground = false;
        enemy.skip_platform = true;
    } else {
        move_if_idle(enemy, map);
    }
}

fn move_up(enemy: &mut Entity, map: &MapData) {
    if is_jumpable_platform_above(enemy, map) {
        enemy.vx = 0.0;
        enemy.on_ground = false;
        enemy.vy = enemy.physics.jump_speed;
    } else {
        move_if_idle(enemy, map);
    }
}

/// Start walking toward the map center; keep going if already walking.
fn move_if_idle(enemy: &mut Entity, map: &MapData) {
    if enemy.vx == 0.0 {
        enemy.facing_right = enemy.rect.center_x() <= map.center_x();
        let speed = enemy.physics.move_speed;
        enemy.vx = if enemy.facing_right { speed } else { -speed };
    }
}

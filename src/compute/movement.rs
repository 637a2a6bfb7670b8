//! Shared entity kinematics for the player and every enemy variant.
//!
//! Order within one entity update is fixed: gravity, position integration
//! with landing and fall-off checks, knockback relaxation, then state and
//! animation selection.

use log::debug;
use rand::Rng;

use crate::entities::{Entity, EntityState, Rect};
use crate::map::MapData;

// ── Animation frame counts ───────────────────────────────────────────────────

pub const IDLE_FRAMES: usize = 4;
pub const RUNNING_FRAMES: usize = 6;
pub const JUMPING_FRAMES: usize = 2;
pub const SHOOTING_FRAMES: usize = 4;

fn frames_for(state: EntityState) -> usize {
    match state {
        EntityState::Idle => IDLE_FRAMES,
        EntityState::Running => RUNNING_FRAMES,
        EntityState::Jumping => JUMPING_FRAMES,
    }
}

/// Whether an entity survives its update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fate {
    Alive,
    /// Last life lost; drop the entity from its collection.
    Removed,
}

// ── Spawn / respawn ──────────────────────────────────────────────────────────

/// Movement and animation state for a fresh spawn or a respawn.
pub fn reset_movement(entity: &mut Entity, rng: &mut impl Rng) {
    entity.facing_right = rng.gen_bool(0.5);
    entity.vx = 0.0;
    entity.vy = 0.0;
    entity.knockback_x = 0.0;
    entity.frame_index = 0.0;
    entity.shooting = false;
    entity.on_ground = false;
    entity.skip_platform = false;
    entity.platform = 0.0;
    entity.state = EntityState::Idle;
}

/// Drop the entity in from the top edge, somewhere between 25% and 175% of
/// the horizontal spawn center.
pub fn reset_position(entity: &mut Entity, map: &MapData, rng: &mut impl Rng) {
    let spawn_center = ((map.width - entity.width) / 2.0).floor();
    let multiplier: f32 = rng.gen_range(0.25..=1.75);
    let spawn_x = (spawn_center * multiplier).floor();
    entity.rect = Rect::new(spawn_x, 0.0, entity.width, entity.height);
}

// ── Per-tick steps ───────────────────────────────────────────────────────────

pub fn apply_gravity(entity: &mut Entity) {
    entity.vy += entity.physics.gravity;
}

/// Bottom edge within the upper half of the tile. Anything deeper is treated
/// as a miss, which keeps entities from snapping up onto a platform from
/// far below.
pub fn lands_on(tile: &Rect, rect: &Rect) -> bool {
    tile.top() <= rect.bottom() && rect.bottom() <= tile.center_y()
}

fn can_land(entity: &Entity, tile: &Rect) -> bool {
    if !lands_on(tile, &entity.rect) {
        return false;
    }
    !(entity.skip_platform && tile.top() == entity.platform)
}

fn check_landing(entity: &mut Entity, map: &MapData) {
    let tiles = map.tiles_at(entity.rect.center_x());
    if let Some(tile) = tiles.iter().find(|tile| can_land(entity, tile)) {
        entity.rect.y = tile.top() - entity.height;
        entity.vy = 0.0;
        entity.on_ground = true;
        entity.platform = tile.top();
        entity.skip_platform = false;
    }
}

fn check_fall_off_map(entity: &mut Entity, map: &MapData, rng: &mut impl Rng) -> Fate {
    if entity.rect.y <= map.height {
        return Fate::Alive;
    }

    reset_movement(entity, rng);
    reset_position(entity, map, rng);
    entity.lives = entity.lives.saturating_sub(1);

    if entity.lives == 0 {
        debug!("{} fell off the map and is out", entity.name);
        Fate::Removed
    } else {
        debug!("{} fell off the map, {} lives left", entity.name, entity.lives);
        Fate::Alive
    }
}

/// Integrate velocity plus knockback, then resolve landing while falling.
pub fn move_and_collide(entity: &mut Entity, map: &MapData, rng: &mut impl Rng) -> Fate {
    entity.rect.x += entity.vx + entity.knockback_x;
    entity.rect.y += entity.vy;

    if entity.vy > 0.0 {
        entity.on_ground = false;
        check_landing(entity, map);
        return check_fall_off_map(entity, map, rng);
    }
    Fate::Alive
}

/// Geometric decay. The decay factor doubles as the snap-to-zero threshold.
pub fn relax_knockback(entity: &mut Entity) {
    let decay = entity.physics.knockback_decay;
    entity.knockback_x *= decay;
    if entity.knockback_x.abs() < decay {
        entity.knockback_x = 0.0;
    }
}

fn set_state(entity: &mut Entity, state: EntityState) {
    if entity.state != state {
        entity.state = state;
        entity.frame_index = 0.0;
    }
}

/// Pick the animation state from velocity. Shooting owns the frame index,
/// so nothing changes while it runs.
pub fn update_state(entity: &mut Entity) {
    if entity.shooting {
        return;
    }

    if entity.vy < 0.0 {
        set_state(entity, EntityState::Jumping);
    } else if entity.vx == 0.0 {
        set_state(entity, EntityState::Idle);
    } else {
        set_state(entity, EntityState::Running);
    }
}

/// Step the frame index. A shot ends once its animation has played through.
pub fn advance_animation(entity: &mut Entity) {
    entity.frame_index += entity.physics.animation_speed;

    if entity.shooting {
        if entity.frame_index as usize >= SHOOTING_FRAMES {
            entity.shooting = false;
            entity.frame_index = 0.0;
        }
    } else {
        entity.frame_index %= frames_for(entity.state) as f32;
    }
}

/// Full per-tick update shared by every entity kind.
pub fn update_entity(entity: &mut Entity, map: &MapData, rng: &mut impl Rng) -> Fate {
    apply_gravity(entity);
    let fate = move_and_collide(entity, map, rng);
    if fate == Fate::Removed {
        return fate;
    }
    relax_knockback(entity);
    update_state(entity);
    advance_animation(entity);
    Fate::Alive
}

// ── Platform queries ─────────────────────────────────────────────────────────

/// Standing on a platform that continues half a body width ahead.
pub fn is_platform_before(entity: &Entity, map: &MapData) -> bool {
    if !entity.on_ground {
        return false;
    }

    let direction = if entity.facing_right { 1.0 } else { -1.0 };
    let next_x = entity.rect.center_x() + direction * entity.rect.w / 2.0;
    map.tiles_at(next_x)
        .iter()
        .any(|tile| tile.top() == entity.platform)
}

/// The lowest tile in the column lies below the entity's feet.
pub fn is_platform_below(entity: &Entity, map: &MapData) -> bool {
    map.tiles_at(entity.rect.center_x())
        .last()
        .map_or(false, |tile| tile.top() > entity.rect.bottom())
}

/// The tile stacked directly above the current platform is within jump reach.
pub fn is_jumpable_platform_above(entity: &Entity, map: &MapData) -> bool {
    let tiles = map.tiles_at(entity.rect.center_x());
    let jump_height = entity.physics.jump_height();

    tiles
        .iter()
        .position(|tile| tile.top() == entity.platform)
        .filter(|&i| i >= 1)
        .map_or(false, |i| tiles[i - 1].top() >= entity.rect.bottom() + jump_height)
}

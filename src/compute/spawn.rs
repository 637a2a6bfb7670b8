//! Building entities from level records.

use rand::Rng;

use crate::compute::movement::{reset_movement, reset_position};
use crate::compute::weapon::{make_weapon, parse_weapon_kind};
use crate::entities::{EnemyBrain, EnemyVariant, Entity, EntityKind, EntityState, Rect};
use crate::error::GameError;
use crate::levels::EntityRecord;
use crate::map::MapData;
use crate::physics::Physics;

/// Player start, as a fraction of the play field (the center of the first
/// platform on the reference layout).
pub const PLAYER_SPAWN: (f32, f32) = (383.0 / 2560.0, 320.0 / 1600.0);

pub fn parse_enemy_variant(record: &EntityRecord) -> Result<EnemyVariant, GameError> {
    match record.kind.as_deref() {
        Some("default") => Ok(EnemyVariant::Default),
        Some("shrinker") => Ok(EnemyVariant::Shrinker),
        Some("invisible") => Ok(EnemyVariant::Invisible),
        Some(other) => Err(GameError::UnknownEnemyType(other.to_string())),
        None => Err(GameError::MissingEnemyType(record.name.clone())),
    }
}

/// Body is a twentieth of the map wide and a tenth tall; the weapon's
/// bullets are sized from that full body even for a shrinker.
fn build(
    record: &EntityRecord,
    variant: Option<EnemyVariant>,
    map: &MapData,
    physics: Physics,
    rng: &mut impl Rng,
) -> Result<Entity, GameError> {
    let weapon_kind = parse_weapon_kind(&record.weapon)?;
    let mut width = (map.width / 20.0).floor();
    let mut height = (map.height / 10.0).floor();
    let weapon = make_weapon(weapon_kind, &physics, height);

    if variant == Some(EnemyVariant::Shrinker) {
        width = (width / 2.0).floor();
        height = (height / 2.0).floor();
    }

    let kind = match variant {
        None => EntityKind::Player,
        Some(variant) => EntityKind::Enemy(EnemyBrain {
            variant,
            vision_range: (physics.bullet_speed * physics.jump_speed).abs() - (width / 2.0).floor(),
            shoots: record.shoots,
        }),
    };

    let mut entity = Entity {
        name: record.name.clone(),
        lives: record.lives,
        kind,
        width,
        height,
        rect: Rect::new(0.0, 0.0, width, height),
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
        weapon,
        physics,
    };
    reset_movement(&mut entity, rng);
    reset_position(&mut entity, map, rng);
    Ok(entity)
}

pub fn spawn_player(
    record: &EntityRecord,
    map: &MapData,
    physics: Physics,
    rng: &mut impl Rng,
) -> Result<Entity, GameError> {
    let mut player = build(record, None, map, physics, rng)?;
    let (cx, cy) = (PLAYER_SPAWN.0 * map.width, PLAYER_SPAWN.1 * map.height);
    player.rect = Rect::from_center(cx.floor(), cy.floor(), player.width, player.height);
    Ok(player)
}

pub fn spawn_enemy(
    record: &EntityRecord,
    map: &MapData,
    physics: Physics,
    rng: &mut impl Rng,
) -> Result<Entity, GameError> {
    let variant = parse_enemy_variant(record)?;
    build(record, Some(variant), map, physics, rng)
}

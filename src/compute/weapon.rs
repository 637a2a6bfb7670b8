//! Weapons and bullet motion.
//!
//! A weapon never knows which collection its bullets end up in: `fire`
//! hands each new bullet to a caller-supplied sink, and the level routes
//! the sink to the player-side or enemy-side collection.

use crate::entities::{Bullet, Entity, Rect, Weapon, WeaponKind};
use crate::error::GameError;
use crate::physics::Physics;

/// Map a level-file weapon key (case-insensitive) to its variant.
pub fn parse_weapon_kind(name: &str) -> Result<WeaponKind, GameError> {
    match name.to_ascii_lowercase().as_str() {
        "normal" => Ok(WeaponKind::Single),
        "triple" => Ok(WeaponKind::TripleShotter),
        _ => Err(GameError::UnknownWeapon(name.to_string())),
    }
}

/// Bullets are half the entity height wide and a quarter of it tall.
pub fn make_weapon(kind: WeaponKind, physics: &Physics, entity_height: f32) -> Weapon {
    Weapon {
        kind,
        bullet_speed: physics.bullet_speed,
        bullet_damage: physics.bullet_damage,
        bullet_width: (2.0 * entity_height / 4.0).floor(),
        bullet_height: (entity_height / 4.0).floor(),
    }
}

fn single_bullet(weapon: &Weapon, position: (f32, f32), facing_right: bool) -> Bullet {
    let sign = if facing_right { 1.0 } else { -1.0 };
    Bullet {
        rect: Rect::from_center(position.0, position.1, weapon.bullet_width, weapon.bullet_height),
        speed: sign * weapon.bullet_speed,
        damage: sign * weapon.bullet_damage,
        facing_right,
    }
}

/// Emit every bullet of one shot centered on `position`.
pub fn fire(weapon: &Weapon, position: (f32, f32), facing_right: bool, mut sink: impl FnMut(Bullet)) {
    match weapon.kind {
        WeaponKind::Single => sink(single_bullet(weapon, position, facing_right)),
        WeaponKind::TripleShotter => {
            let spacing = 2.0 * weapon.bullet_height;
            for offset in [-spacing, 0.0, spacing] {
                let pos = (position.0, position.1 + offset);
                sink(single_bullet(weapon, pos, facing_right));
            }
        }
    }
}

/// Muzzle: leading edge of the body, halfway between its top and center.
pub fn muzzle_position(entity: &Entity) -> (f32, f32) {
    let x = if entity.facing_right {
        entity.rect.right()
    } else {
        entity.rect.left()
    };
    let y = ((entity.rect.top() + entity.rect.center_y()) / 2.0).floor();
    (x, y)
}

/// Start a shot unless one is already animating. Returns whether it fired.
pub fn shoot(entity: &mut Entity, sink: impl FnMut(Bullet)) -> bool {
    if entity.shooting {
        return false;
    }
    entity.shooting = true;
    entity.frame_index = 0.0;
    let position = muzzle_position(entity);
    fire(&entity.weapon, position, entity.facing_right, sink);
    true
}

// ── Bullet motion ─────────────────────────────────────────────────────────────

/// Fully past either horizontal edge.
pub fn is_off_map(bullet: &Bullet, map_width: f32) -> bool {
    bullet.rect.right() < 0.0 || bullet.rect.left() > map_width
}

/// Advance every bullet and drop the ones that left the map this tick.
pub fn move_bullets(bullets: Vec<Bullet>, map_width: f32) -> Vec<Bullet> {
    bullets
        .into_iter()
        .filter_map(|mut b| {
            b.rect.x += b.speed;
            if is_off_map(&b, map_width) {
                None
            } else {
                Some(b)
            }
        })
        .collect()
}

//! Bullet-vs-entity hits. Runs after every entity and bullet has moved.
//!
//! A hit consumes the bullet and adds its damage to the target's knockback.
//! Bullets only ever meet entities of the opposite side.

use crate::entities::{Bullet, Entity};

/// Apply every bullet overlapping `target` and return the ones that missed.
pub fn hit_entity(target: &mut Entity, bullets: Vec<Bullet>) -> Vec<Bullet> {
    bullets
        .into_iter()
        .filter(|b| {
            if b.rect.intersects(&target.rect) {
                target.knockback_x += b.damage;
                false
            } else {
                true
            }
        })
        .collect()
}

/// Each target in turn takes every bullet still in flight that overlaps it,
/// so a bullet spanning two targets is spent on the first.
pub fn hit_entities(targets: &mut [Entity], bullets: Vec<Bullet>) -> Vec<Bullet> {
    targets
        .iter_mut()
        .fold(bullets, |remaining, target| hit_entity(target, remaining))
}

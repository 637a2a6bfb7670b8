//! Player controls. Only the player reads input; enemies run `ai::think`.

use crate::compute::movement::is_platform_below;
use crate::compute::weapon::shoot;
use crate::entities::{Bullet, Entity};
use crate::map::MapData;

/// Keys held during the current tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub shoot: bool,
}

/// Horizontal speed is rebuilt from scratch every tick. While a shot is
/// animating the player may only move the way it is facing.
fn process_horizontal(player: &mut Entity, input: &InputState) {
    player.vx = 0.0;
    let speed = player.physics.move_speed;

    if input.left {
        if !(player.shooting && player.facing_right) {
            player.vx = -speed;
            player.facing_right = false;
        }
    } else if input.right && !(player.shooting && !player.facing_right) {
        player.vx = speed;
        player.facing_right = true;
    }
}

/// Jumping and dropping are only possible from the ground.
fn process_vertical(player: &mut Entity, input: &InputState, map: &MapData) {
    if !player.on_ground {
        return;
    }

    if input.down && is_platform_below(player, map) {
        player.on_ground = false;
        player.skip_platform = true;
    }

    if input.up {
        player.on_ground = false;
        player.vy = player.physics.jump_speed;
    }
}

pub fn handle_input(player: &mut Entity, input: &InputState, map: &MapData, sink: impl FnMut(Bullet)) {
    process_horizontal(player, input);
    process_vertical(player, input, map);
    if input.shoot {
        shoot(player, sink);
    }
}

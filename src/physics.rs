//! Tunable physical constants.
//!
//! Defaults are tuned for a 2560x1600 play field. `apply_scaling` adapts them
//! to the real field size before copies are handed out to entities; every
//! entity then owns its copy and may diverge from the others.

/// Reference width the defaults were tuned for.
pub const BASE_WIDTH: f32 = 2560.0;
/// Reference height the defaults were tuned for.
pub const BASE_HEIGHT: f32 = 1600.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Physics {
    pub gravity: f32,
    pub move_speed: f32,
    /// Negative: jumping moves up.
    pub jump_speed: f32,
    pub bullet_speed: f32,
    pub bullet_damage: f32,
    /// Animation frames advanced per tick.
    pub animation_speed: f32,
    /// Knockback multiplier applied every tick. Also the snap-to-zero threshold.
    pub knockback_decay: f32,
}

impl Default for Physics {
    fn default() -> Self {
        Physics {
            gravity: 1.0,
            move_speed: 10.0,
            jump_speed: -22.0,
            bullet_speed: 15.0,
            bullet_damage: 50.0,
            animation_speed: 0.2,
            knockback_decay: 0.9,
        }
    }
}

impl Physics {
    /// Default physics already scaled to a `width` x `height` field.
    pub fn scaled(width: f32, height: f32) -> Self {
        let mut physics = Physics::default();
        physics.apply_scaling(width, height);
        physics
    }

    /// Vertical quantities follow the height ratio, horizontal ones the width ratio.
    pub fn apply_scaling(&mut self, screen_width: f32, screen_height: f32) {
        let scale_x = screen_width / BASE_WIDTH;
        let scale_y = screen_height / BASE_HEIGHT;

        self.gravity *= scale_y;
        self.jump_speed *= scale_y;
        self.move_speed *= scale_x;
        self.bullet_speed *= scale_x;
        self.bullet_damage *= scale_x;
    }

    /// Peak rise of a jump in pixels (negative, jumping goes up).
    ///
    /// Sums the per-tick displacement while the velocity is still negative,
    /// adding gravity after each step. Not cached.
    pub fn jump_height(&self) -> f32 {
        if self.jump_speed >= 0.0 {
            return 0.0;
        }
        if self.gravity <= 0.0 {
            // The entity would never come back down.
            return f32::NEG_INFINITY;
        }

        let mut height = 0.0;
        let mut v = self.jump_speed;
        while v < 0.0 {
            height += v;
            v += self.gravity;
        }
        height
    }
}

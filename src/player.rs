//! Player movement
//!
//! The player is a position, a yaw, and a vertical velocity driven by
//! per-frame input samples. Integration is a plain Euler step: turn
//! first, then translate along the new facing, then fall. Yaw 0 looks
//! down negative z.

use std::f32::consts::PI;

use crate::config::GameConfig;
use crate::math::Vec3;

/// One frame of input, already mapped from whatever device produced it.
/// Axes are in [-1, 1]; the buttons are edges, not levels: true only on
/// the frame the key went down.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSample {
    /// Forward positive.
    pub move_axis: f32,
    /// Right positive.
    pub strafe_axis: f32,
    /// Counterclockwise positive.
    pub turn_axis: f32,
    pub jump: bool,
    /// Talk button went down this frame.
    pub talk: bool,
    pub pause: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    pub position: Vec3,
    /// Radians, wrapped to (-PI, PI].
    pub yaw: f32,
    /// Vertical velocity, units per second. Negative is downward.
    pub vertical_velocity: f32,
    pub grounded: bool,
}

impl Player {
    pub fn new(at: Vec3) -> Self {
        Self {
            position: at,
            yaw: 0.0,
            vertical_velocity: 0.0,
            grounded: true,
        }
    }

    /// Put the player somewhere else and settle them on the ground.
    pub fn teleport(&mut self, to: Vec3) {
        self.position = to;
        self.vertical_velocity = 0.0;
        self.grounded = to.y <= 0.0;
        if self.grounded {
            self.position.y = 0.0;
        }
    }

    /// Advance one frame. Diagonal input is normalized so walking at an
    /// angle is no faster than walking straight. The floor is the y = 0
    /// plane everywhere; there is nothing to fall off of.
    pub fn integrate(&mut self, input: &InputSample, dt: f32, config: &GameConfig) {
        self.yaw = wrap_angle(self.yaw + input.turn_axis.clamp(-1.0, 1.0) * config.turn_speed * dt);

        let mut forward_amount = input.move_axis.clamp(-1.0, 1.0);
        let mut strafe_amount = input.strafe_axis.clamp(-1.0, 1.0);
        let magnitude = (forward_amount * forward_amount + strafe_amount * strafe_amount).sqrt();
        if magnitude > 1.0 {
            forward_amount /= magnitude;
            strafe_amount /= magnitude;
        }

        let (sin, cos) = self.yaw.sin_cos();
        let forward = Vec3::new(-sin, 0.0, -cos);
        let right = Vec3::new(cos, 0.0, -sin);
        let step = config.move_speed * dt;
        self.position.x += (forward.x * forward_amount + right.x * strafe_amount) * step;
        self.position.z += (forward.z * forward_amount + right.z * strafe_amount) * step;

        if input.jump && self.grounded {
            self.vertical_velocity = config.jump_speed;
            self.grounded = false;
        }
        if !self.grounded {
            self.vertical_velocity -= config.gravity * dt;
            self.position.y += self.vertical_velocity * dt;
            if self.position.y <= 0.0 {
                self.position.y = 0.0;
                self.vertical_velocity = 0.0;
                self.grounded = true;
            }
        }
    }
}

fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped == -PI {
        PI
    } else {
        wrapped
    }
}

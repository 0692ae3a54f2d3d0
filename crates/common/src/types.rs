use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Rest orientation of every wheel around its axle, before spin is added.
pub const WHEEL_NEUTRAL_ROLL: f32 = FRAC_PI_2;

/// Full rendered state of a kart at one tick.
///
/// Written only by the kart controller; renderers and the camera read it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KartPose {
    pub position: Vec3,
    /// Heading around +Y, kept in `[-π, π)`.
    pub yaw: f32,
    /// Cosmetic forward/back lean.
    pub pitch_tilt: f32,
    /// Cosmetic side lean.
    pub roll_tilt: f32,
    /// Front wheel steering angle.
    pub wheel_steer: f32,
    /// Rolling offset shared by all four wheels.
    pub wheel_spin: f32,
}

impl Default for KartPose {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}

impl KartPose {
    /// A resting pose at `position`, facing -Z.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            yaw: 0.0,
            pitch_tilt: 0.0,
            roll_tilt: 0.0,
            wheel_steer: 0.0,
            wheel_spin: 0.0,
        }
    }

    /// Unit vector the kart moves along when driving backward.
    ///
    /// Forward motion subtracts this vector.
    pub fn heading(&self) -> Vec3 {
        Vec3::new(self.yaw.sin(), 0.0, self.yaw.cos())
    }

    /// Body rotation: yaw, then pitch-tilt, then roll-tilt.
    pub fn body_rotation(&self) -> Quat {
        Quat::from_euler(glam::EulerRot::YXZ, self.yaw, self.pitch_tilt, self.roll_tilt)
    }

    /// Wheel orientation around the axle including the spin offset.
    pub fn wheel_roll(&self) -> f32 {
        WHEEL_NEUTRAL_ROLL + self.wheel_spin
    }

    /// Whether every component is a finite number.
    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self.yaw.is_finite()
            && self.pitch_tilt.is_finite()
            && self.roll_tilt.is_finite()
            && self.wheel_steer.is_finite()
            && self.wheel_spin.is_finite()
    }
}

/// Wrap an angle into `[-π, π)`. Angles already in range come back unchanged.
pub fn wrap_angle(angle: f32) -> f32 {
    if (-PI..PI).contains(&angle) {
        return angle;
    }
    (angle + PI).rem_euclid(TAU) - PI
}

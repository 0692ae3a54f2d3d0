use std::f32::consts::FRAC_PI_2;

use kartway_common::{KartPose, KartTuning, wrap_angle};
use kartway_input::{AnalogStick, DirectionFlags, InputState};

/// Forward/back body lean while driving.
pub const PITCH_TILT: f32 = 0.1;
/// Side lean while turning.
pub const ROLL_TILT: f32 = 0.1;
/// Front wheel angle while turning.
pub const WHEEL_STEER: f32 = 0.5;
/// Wheel roll offset while driving.
pub const WHEEL_SPIN: f32 = 0.2;

/// Applies one fixed step of kart kinematics.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KartController {
    tuning: KartTuning,
}

impl KartController {
    pub fn new(tuning: KartTuning) -> Self {
        Self { tuning }
    }

    pub fn tuning(&self) -> &KartTuning {
        &self.tuning
    }

    /// Next pose after one tick of `input`.
    pub fn tick(&self, pose: &KartPose, input: &InputState) -> KartPose {
        let t = &self.tuning;
        let next = match *input {
            InputState::Digital(flags) => {
                self.digital(pose, flags, t.move_speed, t.rotation_speed)
            }
            InputState::Hybrid(flags) => self.digital(
                pose,
                flags,
                t.move_speed * t.analog_speed_damping,
                t.rotation_speed * t.analog_rotation_damping,
            ),
            InputState::Analog(stick) => self.analog(pose, stick.clamped()),
        };
        tracing::trace!(mode = input.mode_name(), yaw = next.yaw, "kart tick");
        next
    }

    fn digital(
        &self,
        pose: &KartPose,
        flags: DirectionFlags,
        move_speed: f32,
        rotation_speed: f32,
    ) -> KartPose {
        let mut next = *pose;
        let moving = flags.is_moving();
        let turning_left = moving && flags.left;
        let turning_right = moving && flags.right;

        next.wheel_steer = 0.0;
        if turning_left {
            next.yaw += rotation_speed;
            next.wheel_steer = -WHEEL_STEER;
        }
        if turning_right {
            next.yaw -= rotation_speed;
            next.wheel_steer = WHEEL_STEER;
        }
        next.yaw = wrap_angle(next.yaw);

        let heading = next.heading();
        let (pitch, spin) = if flags.forward {
            next.position -= heading * move_speed;
            (-PITCH_TILT, WHEEL_SPIN)
        } else if flags.backward {
            next.position += heading * move_speed;
            (PITCH_TILT, -WHEEL_SPIN)
        } else {
            (0.0, 0.0)
        };
        next.pitch_tilt = pitch;
        next.wheel_spin = spin;

        next.roll_tilt = if turning_left {
            ROLL_TILT
        } else if turning_right {
            -ROLL_TILT
        } else {
            0.0
        };
        next
    }

    fn analog(&self, pose: &KartPose, stick: AnalogStick) -> KartPose {
        let t = &self.tuning;
        let mut next = *pose;

        // Stick angle relative to the kart's current facing.
        let relative = stick.angle - pose.yaw - FRAC_PI_2;
        let forward = -relative.cos() * stick.force;
        let right = -relative.sin() * stick.force;

        next.position -= pose.heading() * (t.move_speed * forward);
        if right.abs() > t.dead_zone {
            next.yaw = wrap_angle(pose.yaw - t.rotation_speed * right);
            next.wheel_steer = WHEEL_STEER * right;
        }
        next.pitch_tilt = -PITCH_TILT * forward;
        next.roll_tilt = ROLL_TILT * right;
        next.wheel_spin = WHEEL_SPIN * forward;
        next
    }
}

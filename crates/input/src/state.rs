use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

/// Keyboard-style direction flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionFlags {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl DirectionFlags {
    pub const NONE: Self = Self {
        forward: false,
        backward: false,
        left: false,
        right: false,
    };

    /// Build flags from a 4-bit mask: forward, backward, left, right from the low bit up.
    pub fn from_bits(bits: u8) -> Self {
        Self {
            forward: bits & 0b0001 != 0,
            backward: bits & 0b0010 != 0,
            left: bits & 0b0100 != 0,
            right: bits & 0b1000 != 0,
        }
    }

    /// Forward or backward is held.
    pub fn is_moving(&self) -> bool {
        self.forward || self.backward
    }

    pub fn any(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }
}

/// A continuous stick reading.
///
/// `angle` is in radians, measured clockwise from screen-right because screen
/// y grows downward: pushing the stick up reads `3π/2`. `force` is the
/// deflection in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalogStick {
    pub angle: f32,
    pub force: f32,
}

impl AnalogStick {
    pub fn new(angle: f32, force: f32) -> Self {
        Self { angle, force }
    }

    /// Force clamped into `[0, 1]`; a non-finite angle or force reads as neutral.
    pub fn clamped(self) -> Self {
        if !self.angle.is_finite() || !self.force.is_finite() {
            return Self::default();
        }
        Self {
            angle: self.angle,
            force: self.force.clamp(0.0, 1.0),
        }
    }

    /// Angle in degrees counter-clockwise from screen-right, in `[0, 360)`.
    pub fn compass_degrees(&self) -> f32 {
        (TAU - self.angle).rem_euclid(TAU).to_degrees()
    }

    /// The stick points into the upper half of its range.
    pub fn points_up(&self) -> bool {
        self.angle.sin() < -f32::EPSILON
    }

    /// The stick points into the lower half of its range.
    pub fn points_down(&self) -> bool {
        self.angle.sin() > f32::EPSILON
    }
}

/// The one input reading the kart controller consumes per tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputState {
    /// Keyboard flags.
    Digital(DirectionFlags),
    /// Continuous stick vector.
    Analog(AnalogStick),
    /// Flags derived from a stick; driven with the analog damping multipliers.
    Hybrid(DirectionFlags),
}

impl Default for InputState {
    fn default() -> Self {
        Self::Digital(DirectionFlags::NONE)
    }
}

impl InputState {
    /// Shorthand for a digital reading.
    pub fn digital(forward: bool, backward: bool, left: bool, right: bool) -> Self {
        Self::Digital(DirectionFlags {
            forward,
            backward,
            left,
            right,
        })
    }

    /// Shorthand for an analog reading.
    pub fn analog(angle: f32, force: f32) -> Self {
        Self::Analog(AnalogStick::new(angle, force))
    }

    pub fn is_analog(&self) -> bool {
        matches!(self, Self::Analog(_))
    }

    /// Short label for logs and debug output.
    pub fn mode_name(&self) -> &'static str {
        match self {
            Self::Digital(_) => "digital",
            Self::Analog(_) => "analog",
            Self::Hybrid(_) => "hybrid",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn default_input_is_neutral_digital() {
        assert_eq!(InputState::default(), InputState::Digital(DirectionFlags::NONE));
    }

    #[test]
    fn from_bits_covers_all_flags() {
        let all = DirectionFlags::from_bits(0b1111);
        assert!(all.forward && all.backward && all.left && all.right);
        assert_eq!(DirectionFlags::from_bits(0), DirectionFlags::NONE);
        let fl = DirectionFlags::from_bits(0b0101);
        assert!(fl.forward && fl.left && !fl.backward && !fl.right);
    }

    #[test]
    fn clamped_limits_force() {
        assert_eq!(AnalogStick::new(1.0, 3.0).clamped().force, 1.0);
        assert_eq!(AnalogStick::new(1.0, -0.5).clamped().force, 0.0);
        assert_eq!(AnalogStick::new(f32::NAN, 0.5).clamped(), AnalogStick::default());
        assert_eq!(AnalogStick::new(0.0, f32::INFINITY).clamped(), AnalogStick::default());
    }

    #[test]
    fn compass_degrees_of_screen_directions() {
        let up = AnalogStick::new(3.0 * FRAC_PI_2, 1.0);
        assert!((up.compass_degrees() - 90.0).abs() < 1e-3);
        assert!(up.points_up());

        let down = AnalogStick::new(FRAC_PI_2, 1.0);
        assert!((down.compass_degrees() - 270.0).abs() < 1e-3);
        assert!(down.points_down());

        let left = AnalogStick::new(PI, 1.0);
        assert!((left.compass_degrees() - 180.0).abs() < 1e-3);
    }

    #[test]
    fn input_state_serializes_with_mode_tag() {
        let json = serde_json::to_string(&InputState::digital(true, false, true, false)).unwrap();
        assert!(json.contains("digital"));
        let back: InputState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, InputState::digital(true, false, true, false));
    }
}

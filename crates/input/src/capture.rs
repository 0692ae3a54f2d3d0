use crate::state::{AnalogStick, DirectionFlags, InputState};

/// Keys the demo listens to. Codes follow DOM `KeyboardEvent.code` names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    KeyW,
    KeyA,
    KeyS,
    KeyD,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
}

/// One of the four driving directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
    Left,
    Right,
}

impl Key {
    /// Parse a key code such as `"KeyW"` or `"ArrowLeft"`. Unbound codes yield `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        Some(match code {
            "KeyW" => Self::KeyW,
            "KeyA" => Self::KeyA,
            "KeyS" => Self::KeyS,
            "KeyD" => Self::KeyD,
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            _ => return None,
        })
    }

    pub fn direction(self) -> Direction {
        match self {
            Self::KeyW | Self::ArrowUp => Direction::Forward,
            Self::KeyS | Self::ArrowDown => Direction::Backward,
            Self::KeyA | Self::ArrowLeft => Direction::Left,
            Self::KeyD | Self::ArrowRight => Direction::Right,
        }
    }
}

/// How an engaged stick is reported to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum StickMode {
    /// Report the raw vector as [`InputState::Analog`].
    #[default]
    Continuous,
    /// Translate the vector into flags and report [`InputState::Hybrid`].
    Flags {
        /// Degrees away from vertical before a left/right flag is set.
        turn_threshold_degrees: f32,
    },
}

impl StickMode {
    pub const DEFAULT_TURN_THRESHOLD: f32 = 30.0;

    pub fn flags() -> Self {
        Self::Flags {
            turn_threshold_degrees: Self::DEFAULT_TURN_THRESHOLD,
        }
    }
}

/// Collects keyboard and stick events into the single [`InputState`] read each tick.
///
/// While the stick is engaged it owns the input and key events are ignored.
/// Engaging or releasing the stick clears the flags so no stale direction
/// survives a mode switch.
#[derive(Debug, Clone, Default)]
pub struct InputCapture {
    flags: DirectionFlags,
    stick: Option<AnalogStick>,
    mode: StickMode,
}

impl InputCapture {
    pub fn new(mode: StickMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn mode(&self) -> StickMode {
        self.mode
    }

    pub fn stick_engaged(&self) -> bool {
        self.stick.is_some()
    }

    pub fn key_down(&mut self, key: Key) {
        self.set_key(key, true);
    }

    pub fn key_up(&mut self, key: Key) {
        self.set_key(key, false);
    }

    fn set_key(&mut self, key: Key, held: bool) {
        if self.stick.is_some() {
            tracing::trace!(?key, held, "key ignored while stick engaged");
            return;
        }
        let flag = match key.direction() {
            Direction::Forward => &mut self.flags.forward,
            Direction::Backward => &mut self.flags.backward,
            Direction::Left => &mut self.flags.left,
            Direction::Right => &mut self.flags.right,
        };
        *flag = held;
    }

    /// The stick was touched.
    pub fn stick_start(&mut self) {
        if self.stick.is_none() {
            tracing::debug!("stick engaged, clearing key flags");
            self.flags = DirectionFlags::NONE;
            self.stick = Some(AnalogStick::default());
        }
    }

    /// The stick moved. Engages the stick if it was not already.
    pub fn stick_move(&mut self, angle: f32, force: f32) {
        self.stick_start();
        self.stick = Some(AnalogStick::new(angle, force).clamped());
    }

    /// The stick was released: force drops to zero and every flag clears.
    pub fn stick_end(&mut self) {
        if self.stick.take().is_some() {
            tracing::debug!("stick released");
        }
        self.flags = DirectionFlags::NONE;
    }

    /// Reading for the next tick.
    pub fn state(&self) -> InputState {
        match (self.stick, self.mode) {
            (None, _) => InputState::Digital(self.flags),
            (Some(stick), StickMode::Continuous) => InputState::Analog(stick),
            (
                Some(stick),
                StickMode::Flags {
                    turn_threshold_degrees,
                },
            ) => InputState::Hybrid(stick_to_flags(stick, turn_threshold_degrees)),
        }
    }
}

/// Translate a stick reading into direction flags.
///
/// The vertical half picks forward or backward. Turning is only reported while
/// moving, once the stick leans more than `threshold` degrees off vertical.
pub fn stick_to_flags(stick: AnalogStick, threshold: f32) -> DirectionFlags {
    let stick = stick.clamped();
    let mut flags = DirectionFlags::NONE;
    if stick.force <= 0.0 {
        return flags;
    }

    if stick.points_up() {
        flags.forward = true;
    } else if stick.points_down() {
        flags.backward = true;
    }

    if flags.is_moving() {
        let degree = stick.compass_degrees();
        if degree > 270.0 + threshold || degree < 90.0 - threshold {
            flags.right = true;
        } else if degree > 90.0 + threshold && degree < 270.0 - threshold {
            flags.left = true;
        }
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    /// Screen-space angle for a compass bearing in degrees.
    fn screen_angle(compass_degrees: f32) -> f32 {
        -compass_degrees.to_radians()
    }

    #[test]
    fn key_codes_map_to_directions() {
        assert_eq!(Key::from_code("KeyW").map(Key::direction), Some(Direction::Forward));
        assert_eq!(Key::from_code("ArrowDown").map(Key::direction), Some(Direction::Backward));
        assert_eq!(Key::from_code("KeyA").map(Key::direction), Some(Direction::Left));
        assert_eq!(Key::from_code("ArrowRight").map(Key::direction), Some(Direction::Right));
        assert_eq!(Key::from_code("Space"), None);
    }

    #[test]
    fn keys_set_and_clear_flags() {
        let mut capture = InputCapture::default();
        capture.key_down(Key::KeyW);
        capture.key_down(Key::ArrowLeft);
        assert_eq!(capture.state(), InputState::digital(true, false, true, false));

        capture.key_up(Key::ArrowUp);
        assert_eq!(capture.state(), InputState::digital(false, false, true, false));
    }

    #[test]
    fn continuous_stick_reports_analog() {
        let mut capture = InputCapture::new(StickMode::Continuous);
        capture.stick_move(3.0 * FRAC_PI_2, 2.0);
        match capture.state() {
            InputState::Analog(stick) => assert_eq!(stick.force, 1.0),
            other => panic!("expected analog, got {other:?}"),
        }
    }

    #[test]
    fn stick_start_clears_held_keys() {
        let mut capture = InputCapture::default();
        capture.key_down(Key::KeyW);
        capture.stick_start();
        capture.stick_end();
        assert_eq!(capture.state(), InputState::Digital(DirectionFlags::NONE));
    }

    #[test]
    fn stick_end_resets_everything() {
        let mut capture = InputCapture::new(StickMode::flags());
        capture.stick_move(screen_angle(90.0), 1.0);
        assert!(capture.stick_engaged());
        capture.stick_end();
        assert!(!capture.stick_engaged());
        assert_eq!(capture.state(), InputState::Digital(DirectionFlags::NONE));
    }

    #[test]
    fn keys_ignored_while_stick_engaged() {
        let mut capture = InputCapture::new(StickMode::Continuous);
        capture.stick_start();
        capture.key_down(Key::KeyD);
        capture.stick_end();
        assert_eq!(capture.state(), InputState::Digital(DirectionFlags::NONE));
    }

    #[test]
    fn flags_mode_translates_straight_up() {
        let flags = stick_to_flags(AnalogStick::new(screen_angle(90.0), 1.0), 30.0);
        assert_eq!(
            flags,
            DirectionFlags {
                forward: true,
                ..DirectionFlags::NONE
            }
        );
    }

    #[test]
    fn flags_mode_turns_past_threshold() {
        let up_right = stick_to_flags(AnalogStick::new(screen_angle(45.0), 1.0), 30.0);
        assert!(up_right.forward && up_right.right && !up_right.left);

        let up_left = stick_to_flags(AnalogStick::new(screen_angle(135.0), 1.0), 30.0);
        assert!(up_left.forward && up_left.left && !up_left.right);

        let down_left = stick_to_flags(AnalogStick::new(screen_angle(225.0), 1.0), 30.0);
        assert!(down_left.backward && down_left.left);
    }

    #[test]
    fn flags_mode_within_threshold_does_not_turn() {
        let flags = stick_to_flags(AnalogStick::new(screen_angle(75.0), 1.0), 30.0);
        assert!(flags.forward);
        assert!(!flags.left && !flags.right);
    }

    #[test]
    fn flags_mode_horizontal_stick_neither_moves_nor_turns() {
        let flags = stick_to_flags(AnalogStick::new(PI, 1.0), 30.0);
        assert_eq!(flags, DirectionFlags::NONE);
    }

    #[test]
    fn flags_mode_reports_hybrid() {
        let mut capture = InputCapture::new(StickMode::flags());
        capture.stick_move(screen_angle(90.0), 0.7);
        assert!(matches!(capture.state(), InputState::Hybrid(f) if f.forward));
    }

    #[test]
    fn zero_force_stick_yields_no_flags() {
        let flags = stick_to_flags(AnalogStick::new(screen_angle(90.0), 0.0), 30.0);
        assert_eq!(flags, DirectionFlags::NONE);
    }
}

//! Input model: keyboard flags and stick vectors reduced to one `InputState` per tick.
//!
//! # Invariants
//! - Exactly one input mode is active per tick.
//! - Switching modes clears the state of the mode being left.
//! - The controller never listens to devices; it receives an `InputState`.

pub mod capture;
pub mod state;

pub use capture::{Direction, InputCapture, Key, StickMode, stick_to_flags};
pub use state::{AnalogStick, DirectionFlags, InputState};

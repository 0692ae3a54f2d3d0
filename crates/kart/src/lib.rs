//! Kart Controller: turns one input reading into the next kart pose.
//!
//! # Invariants
//! - `tick` is pure: the same pose and input always produce the same result.
//! - `tick` never fails; inputs are clamped before use.
//! - Motion is a direct position delta per tick, with no velocity carried over.

mod controller;

pub use controller::{KartController, PITCH_TILT, ROLL_TILT, WHEEL_SPIN, WHEEL_STEER};

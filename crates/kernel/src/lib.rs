//! Session Kernel: owns the track and kart pose, steps the simulation, replays input logs.
//!
//! # Invariants
//! - The track is built once at startup and never mutated.
//! - The pose changes only through `Session::step`.
//! - Replaying a recorded input log reproduces the same state hash.

pub mod session;

pub use session::{Session, SessionError, SessionSnapshot};

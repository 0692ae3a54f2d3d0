//! Shared types: kart pose, angle helpers, and the JSON configuration layer.
//!
//! # Invariants
//! - Configuration is validated on every load; downstream crates may assume
//!   finite, positive geometry values.

pub mod config;
pub mod types;

pub use config::{
    CameraSettings, ConfigError, DemoConfig, KartTuning, SampleSpacing, TrackLayout,
    TrackSettings,
};
pub use types::{KartPose, WHEEL_NEUTRAL_ROLL, wrap_angle};

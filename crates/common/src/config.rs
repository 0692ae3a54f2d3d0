//! Demo configuration loaded from JSON.
//!
//! Every field has a default, so a config file only needs the values it
//! changes. `DemoConfig::validate` runs after every load.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Errors from loading or validating a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Which builder produces the track surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackLayout {
    /// Closed spline ribbon through the waypoints.
    #[default]
    Ribbon,
    /// Hand-authored circuit of straight pieces and Bézier curves.
    Segments,
}

/// How ribbon samples are distributed along the curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleSpacing {
    /// Evenly spaced in curve parameter; denser where waypoints are close.
    #[default]
    Parametric,
    /// Evenly spaced in arc length.
    ArcLength,
}

/// Track geometry settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackSettings {
    pub layout: TrackLayout,
    pub waypoints: Vec<Vec3>,
    pub width: f32,
    pub sample_count: usize,
    pub spacing: SampleSpacing,
    pub surface_height: f32,
    pub road_thickness: f32,
    pub borders: bool,
    pub border_width: f32,
    pub border_height: f32,
    pub curve_radius: f32,
    pub curve_segments: usize,
}

impl Default for TrackSettings {
    fn default() -> Self {
        Self {
            layout: TrackLayout::Ribbon,
            waypoints: default_waypoints(),
            width: 8.0,
            sample_count: 200,
            spacing: SampleSpacing::Parametric,
            surface_height: 0.1,
            road_thickness: 0.2,
            borders: true,
            border_width: 0.3,
            border_height: 0.3,
            curve_radius: 12.0,
            curve_segments: 32,
        }
    }
}

/// Corner points of the stock circuit, in driving order.
pub fn default_waypoints() -> Vec<Vec3> {
    vec![
        Vec3::new(0.0, 0.0, -20.0),
        Vec3::new(0.0, 0.0, 20.0),
        Vec3::new(20.0, 0.0, 20.0),
        Vec3::new(20.0, 0.0, -10.0),
        Vec3::new(40.0, 0.0, -10.0),
        Vec3::new(40.0, 0.0, -30.0),
        Vec3::new(20.0, 0.0, -30.0),
        Vec3::new(20.0, 0.0, -20.0),
    ]
}

/// Kart motion tuning. Speeds are per tick, not per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KartTuning {
    pub move_speed: f32,
    pub rotation_speed: f32,
    /// Speed multiplier while stick-derived flags drive the kart.
    pub analog_speed_damping: f32,
    /// Rotation multiplier while stick-derived flags drive the kart.
    pub analog_rotation_damping: f32,
    /// Lateral stick amount at or below which steering is ignored.
    pub dead_zone: f32,
}

impl Default for KartTuning {
    fn default() -> Self {
        Self {
            move_speed: 0.2,
            rotation_speed: 0.1,
            analog_speed_damping: 0.8,
            analog_rotation_damping: 0.5,
            dead_zone: 0.1,
        }
    }
}

/// Chase camera settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Offset from the kart before rotating by its yaw.
    pub offset: Vec3,
    /// Fraction of the remaining distance covered each tick.
    pub lerp_factor: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            offset: Vec3::new(0.0, 5.0, 10.0),
            lerp_factor: 0.1,
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Top-level demo configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub track: TrackSettings,
    pub kart: KartTuning,
    pub camera: CameraSettings,
    /// Where the kart starts.
    pub spawn: Vec3,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            track: TrackSettings::default(),
            kart: KartTuning::default(),
            camera: CameraSettings::default(),
            spawn: Vec3::new(0.0, 0.5, 0.0),
        }
    }
}

impl DemoConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse and validate a JSON config.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize as pretty JSON.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values no component can work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.track;
        positive("track.width", t.width)?;
        if t.sample_count == 0 {
            return Err(invalid("track.sample_count", "must be at least 1"));
        }
        if t.layout == TrackLayout::Ribbon && t.waypoints.len() < 3 {
            return Err(invalid(
                "track.waypoints",
                format!("need at least 3 waypoints, got {}", t.waypoints.len()),
            ));
        }
        if t.waypoints.iter().any(|w| !w.is_finite()) {
            return Err(invalid("track.waypoints", "waypoints must be finite"));
        }
        finite("track.surface_height", t.surface_height)?;
        positive("track.road_thickness", t.road_thickness)?;
        positive("track.border_width", t.border_width)?;
        positive("track.border_height", t.border_height)?;
        positive("track.curve_radius", t.curve_radius)?;
        if t.curve_segments == 0 {
            return Err(invalid("track.curve_segments", "must be at least 1"));
        }

        let k = &self.kart;
        non_negative("kart.move_speed", k.move_speed)?;
        non_negative("kart.rotation_speed", k.rotation_speed)?;
        non_negative("kart.analog_speed_damping", k.analog_speed_damping)?;
        non_negative("kart.analog_rotation_damping", k.analog_rotation_damping)?;
        if !(0.0..1.0).contains(&k.dead_zone) {
            return Err(invalid("kart.dead_zone", "must be in [0, 1)"));
        }

        let c = &self.camera;
        if !(c.lerp_factor > 0.0 && c.lerp_factor <= 1.0) {
            return Err(invalid("camera.lerp_factor", "must be in (0, 1]"));
        }
        if !(c.fov_degrees > 0.0 && c.fov_degrees < 180.0) {
            return Err(invalid("camera.fov_degrees", "must be in (0, 180)"));
        }
        positive("camera.near", c.near)?;
        if !(c.far.is_finite() && c.far > c.near) {
            return Err(invalid(
                "camera.far",
                format!("must be finite and beyond near ({}), got {}", c.near, c.far),
            ));
        }
        if !c.offset.is_finite() {
            return Err(invalid("camera.offset", "must be finite"));
        }
        if !self.spawn.is_finite() {
            return Err(invalid("spawn", "must be finite"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be positive, got {value}")))
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, format!("must be finite, got {value}")))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be non-negative, got {value}")))
    }
}

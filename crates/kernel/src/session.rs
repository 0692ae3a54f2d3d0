use kartway_common::{ConfigError, DemoConfig, KartPose};
use kartway_input::InputState;
use kartway_kart::KartController;
use kartway_track::{Track, TrackError, TrackGenerator};
use serde::{Deserialize, Serialize};

/// Errors raised while starting a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("track generation failed: {0}")]
    Track(#[from] TrackError),
}

/// Kart state at one tick, for persistence and comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub tick: u64,
    pub pose: KartPose,
}

/// One running demo: an immutable track and a single kart driven tick by tick.
///
/// The pose only changes through [`Session::step`]. Every input is appended to
/// the input log, so a session can be rebuilt exactly with [`Session::replay`].
/// Long-running sessions drain the log with [`Session::drain_inputs`].
#[derive(Debug, Clone)]
pub struct Session {
    config: DemoConfig,
    track: Track,
    controller: KartController,
    pose: KartPose,
    tick: u64,
    input_log: Vec<InputState>,
}

impl Session {
    /// Validate `config`, build the track, and place the kart at the spawn point.
    pub fn new(config: DemoConfig) -> Result<Self, SessionError> {
        config.validate()?;
        let track = TrackGenerator::new(config.track.clone()).build()?;
        tracing::debug!(spawn = ?config.spawn, "session started");
        Ok(Self {
            controller: KartController::new(config.kart),
            pose: KartPose::at(config.spawn),
            track,
            config,
            tick: 0,
            input_log: Vec::new(),
        })
    }

    pub fn config(&self) -> &DemoConfig {
        &self.config
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn pose(&self) -> &KartPose {
        &self.pose
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Inputs applied since the last drain, oldest first.
    pub fn inputs(&self) -> &[InputState] {
        &self.input_log
    }

    /// Take the recorded inputs, leaving the log empty.
    ///
    /// Replaying a drained batch only reproduces the session if it started
    /// from a fresh session; callers keeping a full history append batches in order.
    pub fn drain_inputs(&mut self) -> Vec<InputState> {
        std::mem::take(&mut self.input_log)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            tick: self.tick,
            pose: self.pose,
        }
    }

    /// Advance one tick with `input`.
    pub fn step(&mut self, input: &InputState) {
        let _span = tracing::trace_span!("step", tick = self.tick + 1).entered();
        if let Some(previous) = self.input_log.last() {
            if previous.mode_name() != input.mode_name() {
                tracing::debug!(
                    from = previous.mode_name(),
                    to = input.mode_name(),
                    "input mode switched"
                );
            }
        }
        self.pose = self.controller.tick(&self.pose, input);
        self.tick += 1;
        self.input_log.push(*input);
    }

    /// Rebuild a session by applying `inputs` to a fresh one.
    pub fn replay(config: DemoConfig, inputs: &[InputState]) -> Result<Self, SessionError> {
        let mut session = Self::new(config)?;
        for input in inputs {
            session.step(input);
        }
        Ok(session)
    }

    /// Deterministic FNV-1a hash of the tick and pose.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        let p = &self.pose;
        mix(&mut h, &self.tick.to_le_bytes());
        for v in [
            p.position.x,
            p.position.y,
            p.position.z,
            p.yaw,
            p.pitch_tilt,
            p.roll_tilt,
            p.wheel_steer,
            p.wheel_spin,
        ] {
            mix(&mut h, &v.to_le_bytes());
        }
        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use kartway_common::TrackSettings;

    fn config() -> DemoConfig {
        DemoConfig {
            track: TrackSettings {
                sample_count: 48,
                ..TrackSettings::default()
            },
            ..DemoConfig::default()
        }
    }

    fn lap_inputs() -> Vec<InputState> {
        let mut inputs = Vec::new();
        inputs.extend(std::iter::repeat_n(InputState::digital(true, false, false, false), 30));
        inputs.extend(std::iter::repeat_n(InputState::digital(true, false, false, true), 15));
        inputs.extend(std::iter::repeat_n(InputState::analog(4.0, 0.8), 20));
        inputs.extend(std::iter::repeat_n(InputState::default(), 5));
        inputs
    }

    #[test]
    fn session_starts_at_spawn() {
        let s = Session::new(config()).unwrap();
        assert_eq!(s.tick(), 0);
        assert_eq!(s.pose().position, Vec3::new(0.0, 0.5, 0.0));
        assert!(s.inputs().is_empty());
        assert!(s.track().ribbon().is_some());
    }

    #[test]
    fn step_advances_and_records() {
        let mut s = Session::new(config()).unwrap();
        s.step(&InputState::digital(true, false, false, false));
        s.step(&InputState::default());
        assert_eq!(s.tick(), 2);
        assert_eq!(s.inputs().len(), 2);
        assert!((s.pose().position.z + 0.2).abs() < 1e-6);
    }

    #[test]
    fn bad_track_fails_at_startup() {
        let mut cfg = config();
        cfg.track.waypoints.truncate(2);
        let err = Session::new(cfg).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Config(_) | SessionError::Track(TrackError::InvalidTrackParameters(_))
        ));
    }

    #[test]
    fn invalid_tuning_is_rejected() {
        let mut cfg = config();
        cfg.kart.move_speed = f32::NAN;
        assert!(matches!(Session::new(cfg), Err(SessionError::Config(_))));
    }

    #[test]
    fn replay_reproduces_state_hash() {
        let mut live = Session::new(config()).unwrap();
        for input in lap_inputs() {
            live.step(&input);
        }
        let replayed = Session::replay(config(), live.inputs()).unwrap();
        assert_eq!(replayed.tick(), live.tick());
        assert_eq!(replayed.snapshot(), live.snapshot());
        assert_eq!(replayed.state_hash(), live.state_hash());
    }

    #[test]
    fn drain_inputs_clears_log() {
        let mut s = Session::new(config()).unwrap();
        for input in lap_inputs() {
            s.step(&input);
        }
        let drained = s.drain_inputs();
        assert_eq!(drained.len(), lap_inputs().len());
        assert!(s.inputs().is_empty());
        assert_eq!(s.tick(), drained.len() as u64);

        s.step(&InputState::default());
        assert_eq!(s.inputs().len(), 1);
    }

    #[test]
    fn replay_from_drained_batches() {
        let mut live = Session::new(config()).unwrap();
        let mut history = Vec::new();
        for (i, input) in lap_inputs().into_iter().enumerate() {
            live.step(&input);
            if i % 16 == 15 {
                history.extend(live.drain_inputs());
            }
        }
        history.extend(live.drain_inputs());
        assert!(live.inputs().is_empty());

        let replayed = Session::replay(config(), &history).unwrap();
        assert_eq!(replayed.tick(), live.tick());
        assert_eq!(replayed.state_hash(), live.state_hash());
    }

    #[test]
    fn state_hash_tracks_changes() {
        let mut a = Session::new(config()).unwrap();
        let mut b = Session::new(config()).unwrap();
        assert_eq!(a.state_hash(), b.state_hash());
        a.step(&InputState::default());
        assert_ne!(a.state_hash(), b.state_hash());
        b.step(&InputState::digital(true, false, false, false));
        assert_ne!(a.state_hash(), b.state_hash());
    }

    #[test]
    fn snapshot_serializes() {
        let mut s = Session::new(config()).unwrap();
        s.step(&InputState::digital(false, true, false, false));
        let json = serde_json::to_string(&s.snapshot()).unwrap();
        let back: SessionSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s.snapshot());
    }
}

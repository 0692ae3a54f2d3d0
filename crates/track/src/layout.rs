use std::f32::consts::FRAC_PI_2;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::segments::{BoxPlacement, curved_segment_pairs};

/// One piece of a hand-authored circuit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CircuitPiece {
    Straight { start: Vec3, end: Vec3 },
    Curve { start: Vec3, end: Vec3, right_turn: bool },
}

impl CircuitPiece {
    pub fn start(&self) -> Vec3 {
        match *self {
            Self::Straight { start, .. } | Self::Curve { start, .. } => start,
        }
    }

    pub fn end(&self) -> Vec3 {
        match *self {
            Self::Straight { end, .. } | Self::Curve { end, .. } => end,
        }
    }
}

/// The stock circuit: four straights joined by four right-hand curves.
pub fn stock_circuit() -> Vec<CircuitPiece> {
    let v = |x: f32, z: f32| Vec3::new(x, 0.0, z);
    vec![
        CircuitPiece::Straight {
            start: v(0.0, -20.0),
            end: v(0.0, 20.0),
        },
        CircuitPiece::Curve {
            start: v(0.0, 20.0),
            end: v(20.0, 20.0),
            right_turn: true,
        },
        CircuitPiece::Straight {
            start: v(20.0, 20.0),
            end: v(20.0, -10.0),
        },
        CircuitPiece::Curve {
            start: v(20.0, -10.0),
            end: v(40.0, -10.0),
            right_turn: true,
        },
        CircuitPiece::Straight {
            start: v(40.0, -10.0),
            end: v(40.0, -30.0),
        },
        CircuitPiece::Curve {
            start: v(40.0, -30.0),
            end: v(20.0, -30.0),
            right_turn: true,
        },
        CircuitPiece::Straight {
            start: v(20.0, -30.0),
            end: v(20.0, -20.0),
        },
        CircuitPiece::Curve {
            start: v(20.0, -20.0),
            end: v(0.0, -20.0),
            right_turn: true,
        },
    ]
}

/// Start/finish line marker of the stock circuit.
pub fn start_line() -> BoxPlacement {
    BoxPlacement {
        center: Vec3::new(0.0, 0.11, -19.0),
        size: Vec3::new(8.0, 0.01, 1.0),
        yaw: FRAC_PI_2,
    }
}

/// Flatten circuit pieces into straight pairs; curves become `curve_segments` pairs each.
pub fn expand_pieces(
    pieces: &[CircuitPiece],
    curve_radius: f32,
    curve_segments: usize,
) -> Vec<(Vec3, Vec3)> {
    let mut pairs = Vec::new();
    for piece in pieces {
        match *piece {
            CircuitPiece::Straight { start, end } => pairs.push((start, end)),
            CircuitPiece::Curve {
                start,
                end,
                right_turn,
            } => pairs.extend(curved_segment_pairs(
                start,
                end,
                right_turn,
                curve_radius,
                curve_segments,
            )),
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_circuit_is_closed_and_connected() {
        let pieces = stock_circuit();
        assert_eq!(pieces.len(), 8);
        for w in pieces.windows(2) {
            assert_eq!(w[0].end(), w[1].start());
        }
        assert_eq!(pieces[pieces.len() - 1].end(), pieces[0].start());
    }

    #[test]
    fn stock_circuit_corners_match_default_waypoints() {
        let starts: Vec<Vec3> = stock_circuit().iter().map(CircuitPiece::start).collect();
        assert_eq!(starts, kartway_common::config::default_waypoints());
    }

    #[test]
    fn expansion_counts_curve_segments() {
        let pairs = expand_pieces(&stock_circuit(), 12.0, 32);
        assert_eq!(pairs.len(), 4 + 4 * 32);
    }

    #[test]
    fn start_line_crosses_first_straight() {
        let line = start_line();
        assert_eq!(line.center.x, 0.0);
        assert!(line.center.z > -20.0 && line.center.z < 20.0);
        assert_eq!(line.size.x, 8.0);
    }
}

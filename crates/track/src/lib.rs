//! Track Generator: closed-loop road geometry from waypoints.
//!
//! # Invariants
//! - A ribbon has exactly `2 * (sample_count + 1)` vertices and `6 * (sample_count + 1)` indices.
//! - Every index is in range and every surface triangle faces +Y.
//! - Geometry is immutable once built; invalid parameters fail before any mesh exists.

pub mod error;
pub mod layout;
pub mod ribbon;
pub mod segments;
pub mod spline;
pub mod track;

pub use error::TrackError;
pub use layout::{CircuitPiece, expand_pieces, start_line, stock_circuit};
pub use ribbon::{CurveSample, RibbonBuilder, RibbonMesh, build_ribbon, vertex_normals};
pub use segments::{
    BoxPlacement, QuadMesh, SegmentBuilder, StraightSegment, build_straight_segments,
    curved_segment_pairs, polyline_pairs,
};
pub use spline::{ArcLengthTable, ClosedCatmullRom};
pub use track::{BorderRails, Track, TrackGenerator, TrackStats};

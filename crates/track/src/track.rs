use glam::Vec3;
use kartway_common::{TrackLayout, TrackSettings};
use serde::{Deserialize, Serialize};

use crate::error::TrackError;
use crate::layout::{expand_pieces, start_line, stock_circuit};
use crate::ribbon::{CurveSample, RibbonBuilder, RibbonMesh};
use crate::segments::{BoxPlacement, SegmentBuilder, StraightSegment};

/// Border marker polylines running alongside a ribbon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorderRails {
    pub left: Vec<Vec3>,
    pub right: Vec<Vec3>,
}

/// Finished track geometry. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum Track {
    Ribbon {
        mesh: RibbonMesh,
        borders: Option<BorderRails>,
    },
    Segments {
        segments: Vec<StraightSegment>,
        start_line: BoxPlacement,
    },
}

/// Size summary of a built track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackStats {
    pub layout: TrackLayout,
    pub vertices: usize,
    pub triangles: usize,
    /// Ribbon samples or straight segments.
    pub pieces: usize,
    pub border_markers: usize,
}

impl std::fmt::Display for TrackStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let layout = match self.layout {
            TrackLayout::Ribbon => "ribbon",
            TrackLayout::Segments => "segments",
        };
        write!(
            f,
            "Track: layout={} vertices={} triangles={} pieces={} border_markers={}",
            layout, self.vertices, self.triangles, self.pieces, self.border_markers
        )
    }
}

impl Track {
    pub fn layout(&self) -> TrackLayout {
        match self {
            Self::Ribbon { .. } => TrackLayout::Ribbon,
            Self::Segments { .. } => TrackLayout::Segments,
        }
    }

    pub fn stats(&self) -> TrackStats {
        match self {
            Self::Ribbon { mesh, borders } => TrackStats {
                layout: TrackLayout::Ribbon,
                vertices: mesh.vertex_count(),
                triangles: mesh.triangle_count(),
                pieces: mesh.sample_count(),
                border_markers: borders
                    .as_ref()
                    .map_or(0, |b| b.left.len() + b.right.len()),
            },
            Self::Segments { segments, .. } => TrackStats {
                layout: TrackLayout::Segments,
                vertices: segments.len() * 4,
                triangles: segments.len() * 2,
                pieces: segments.len(),
                border_markers: segments.len() * 2,
            },
        }
    }

    pub fn ribbon(&self) -> Option<&RibbonMesh> {
        match self {
            Self::Ribbon { mesh, .. } => Some(mesh),
            Self::Segments { .. } => None,
        }
    }
}

/// Turns track settings into geometry.
#[derive(Debug, Clone)]
pub struct TrackGenerator {
    settings: TrackSettings,
}

impl TrackGenerator {
    pub fn new(settings: TrackSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &TrackSettings {
        &self.settings
    }

    /// Build the configured layout.
    pub fn build(&self) -> Result<Track, TrackError> {
        let _span = tracing::debug_span!("track_build").entered();
        let s = &self.settings;
        let track = match s.layout {
            TrackLayout::Ribbon => {
                let mesh = self.build_ribbon(&s.waypoints, s.width, s.sample_count)?;
                let borders = if s.borders {
                    let samples = self.ribbon_builder().sample(&s.waypoints, s.sample_count)?;
                    Some(self.border_rails(&samples))
                } else {
                    None
                };
                Track::Ribbon { mesh, borders }
            }
            TrackLayout::Segments => {
                let pairs = expand_pieces(&stock_circuit(), s.curve_radius, s.curve_segments);
                let segments = self.build_straight_segments(&pairs, s.width)?;
                Track::Segments {
                    segments,
                    start_line: start_line(),
                }
            }
        };
        tracing::info!("{}", track.stats());
        Ok(track)
    }

    /// Ribbon through `waypoints` at the configured surface height and spacing.
    pub fn build_ribbon(
        &self,
        waypoints: &[Vec3],
        width: f32,
        sample_count: usize,
    ) -> Result<RibbonMesh, TrackError> {
        self.ribbon_builder().build(waypoints, width, sample_count)
    }

    /// Independent straight segments using the configured road and border dimensions.
    pub fn build_straight_segments(
        &self,
        pairs: &[(Vec3, Vec3)],
        width: f32,
    ) -> Result<Vec<StraightSegment>, TrackError> {
        self.segment_builder().build(pairs, width)
    }

    /// Marker points just outside each ribbon edge, one per sample.
    pub fn border_rails(&self, samples: &[CurveSample]) -> BorderRails {
        let s = &self.settings;
        let offset = s.width * 0.5 + s.border_width * 0.5;
        let height = s.border_height * 0.5;
        let place = |p: Vec3| Vec3::new(p.x, height, p.z);
        BorderRails {
            left: samples
                .iter()
                .map(|c| place(c.point + c.normal * offset))
                .collect(),
            right: samples
                .iter()
                .map(|c| place(c.point - c.normal * offset))
                .collect(),
        }
    }

    fn ribbon_builder(&self) -> RibbonBuilder {
        RibbonBuilder {
            surface_height: self.settings.surface_height,
            spacing: self.settings.spacing,
        }
    }

    fn segment_builder(&self) -> SegmentBuilder {
        let s = &self.settings;
        SegmentBuilder {
            road_height: s.surface_height,
            road_thickness: s.road_thickness,
            border_center_height: s.border_height * 0.5,
            border_width: s.border_width,
            border_height: s.border_height,
        }
    }
}

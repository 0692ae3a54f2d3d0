use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::TrackError;

/// An axis-aligned box of `size`, rotated by `yaw` around +Y and centered at `center`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxPlacement {
    pub center: Vec3,
    pub size: Vec3,
    pub yaw: f32,
}

/// Flat quad: four corners and two upward triangles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuadMesh {
    pub positions: [Vec3; 4],
    pub uvs: [Vec2; 4],
    pub indices: [u32; 6],
}

impl QuadMesh {
    pub const INDICES: [u32; 6] = [0, 2, 1, 1, 2, 3];

    /// Face normals of both triangles.
    pub fn face_normals(&self) -> [Vec3; 2] {
        let tri = |a: u32, b: u32, c: u32| {
            let [a, b, c] = [a, b, c].map(|i| self.positions[i as usize]);
            (b - a).cross(c - a)
        };
        let i = self.indices;
        [tri(i[0], i[1], i[2]), tri(i[3], i[4], i[5])]
    }
}

/// One straight piece of legacy track: road slab, two border rails, and the drivable surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StraightSegment {
    pub start: Vec3,
    pub end: Vec3,
    pub length: f32,
    /// `atan2(dx, dz)` of the segment direction.
    pub heading: f32,
    pub road: BoxPlacement,
    pub left_border: BoxPlacement,
    pub right_border: BoxPlacement,
    pub surface: QuadMesh,
}

/// Dimensions used by the legacy segment builder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentBuilder {
    /// Centre height of the road slab.
    pub road_height: f32,
    pub road_thickness: f32,
    /// Centre height of the border rails.
    pub border_center_height: f32,
    pub border_width: f32,
    pub border_height: f32,
}

impl Default for SegmentBuilder {
    fn default() -> Self {
        Self {
            road_height: 0.1,
            road_thickness: 0.2,
            border_center_height: 0.15,
            border_width: 0.3,
            border_height: 0.3,
        }
    }
}

impl SegmentBuilder {
    /// One independent segment per `(start, end)` pair.
    ///
    /// Zero-length pairs produce no geometry and are skipped.
    pub fn build(
        &self,
        pairs: &[(Vec3, Vec3)],
        width: f32,
    ) -> Result<Vec<StraightSegment>, TrackError> {
        if !(width.is_finite() && width > 0.0) {
            return Err(TrackError::invalid(format!(
                "width must be positive, got {width}"
            )));
        }

        let mut segments = Vec::with_capacity(pairs.len());
        for (i, &(start, end)) in pairs.iter().enumerate() {
            if !start.is_finite() || !end.is_finite() {
                return Err(TrackError::invalid(format!(
                    "segment {i} has a non-finite endpoint"
                )));
            }
            match self.segment(start, end, width) {
                Some(segment) => segments.push(segment),
                None => tracing::warn!(index = i, ?start, "skipping zero-length segment"),
            }
        }
        tracing::debug!(segments = segments.len(), "built straight segments");
        Ok(segments)
    }

    fn segment(&self, start: Vec3, end: Vec3, width: f32) -> Option<StraightSegment> {
        let direction = end - start;
        let length = direction.length();
        if length <= f32::EPSILON {
            return None;
        }
        let center = (start + end) * 0.5;
        let heading = direction.x.atan2(direction.z);
        let perpendicular = Vec3::new(-direction.z, 0.0, direction.x).normalize_or_zero();
        let half = width * 0.5;

        let road = BoxPlacement {
            center: Vec3::new(center.x, self.road_height, center.z),
            size: Vec3::new(width, self.road_thickness, length),
            yaw: heading,
        };
        let border = |side: f32| {
            let c = center + perpendicular * (half * side);
            BoxPlacement {
                center: Vec3::new(c.x, self.border_center_height, c.z),
                size: Vec3::new(self.border_width, self.border_height, length),
                yaw: heading,
            }
        };

        let top = self.road_height + self.road_thickness * 0.5;
        let corner = |p: Vec3, side: f32| {
            let c = p + perpendicular * (half * side);
            Vec3::new(c.x, top, c.z)
        };
        let surface = QuadMesh {
            positions: [
                corner(start, 1.0),
                corner(start, -1.0),
                corner(end, 1.0),
                corner(end, -1.0),
            ],
            uvs: [
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(0.0, 1.0),
                Vec2::new(1.0, 1.0),
            ],
            indices: QuadMesh::INDICES,
        };

        Some(StraightSegment {
            start,
            end,
            length,
            heading,
            road,
            left_border: border(1.0),
            right_border: border(-1.0),
            surface,
        })
    }
}

/// Build independent straight segments with the default dimensions.
pub fn build_straight_segments(
    pairs: &[(Vec3, Vec3)],
    width: f32,
) -> Result<Vec<StraightSegment>, TrackError> {
    SegmentBuilder::default().build(pairs, width)
}

/// Consecutive pairs along a polyline.
pub fn polyline_pairs(points: &[Vec3]) -> Vec<(Vec3, Vec3)> {
    points.windows(2).map(|w| (w[0], w[1])).collect()
}

/// Approximate a turn from `start` to `end` with `segments` straight pairs.
///
/// The turn is a quadratic Bézier whose control point sits `radius` from the
/// chord midpoint along the chord's horizontal perpendicular, negated for a
/// left turn.
pub fn curved_segment_pairs(
    start: Vec3,
    end: Vec3,
    right_turn: bool,
    radius: f32,
    segments: usize,
) -> Vec<(Vec3, Vec3)> {
    let segments = segments.max(1);
    let direction = end - start;
    let midpoint = (start + end) * 0.5;
    let perpendicular = Vec3::new(-direction.z, 0.0, direction.x).normalize_or_zero();
    let control = midpoint + perpendicular * if right_turn { radius } else { -radius };

    let points: Vec<Vec3> = (0..=segments)
        .map(|k| quadratic_bezier(start, control, end, k as f32 / segments as f32))
        .collect();
    polyline_pairs(&points)
}

fn quadratic_bezier(a: Vec3, control: Vec3, b: Vec3, s: f32) -> Vec3 {
    let inv = 1.0 - s;
    a * (inv * inv) + control * (2.0 * inv * s) + b * (s * s)
}

use glam::{Vec2, Vec3};
use kartway_common::SampleSpacing;
use serde::{Deserialize, Serialize};

use crate::error::TrackError;
use crate::spline::ClosedCatmullRom;

/// Closed strip mesh following a curve.
///
/// Two vertices per sample (left, then right), one UV per vertex, and two
/// triangles per quad including the quad that closes the loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RibbonMesh {
    pub positions: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl RibbonMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of samples along the curve.
    pub fn sample_count(&self) -> usize {
        self.positions.len() / 2
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|c| [c[0], c[1], c[2]])
    }

    /// Geometric normal of one triangle (unnormalized, length = 2 × area).
    pub fn face_normal(&self, tri: [u32; 3]) -> Vec3 {
        let [a, b, c] = tri.map(|i| self.positions[i as usize]);
        (b - a).cross(c - a)
    }
}

/// One sample of the centre line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSample {
    /// Normalized position along the loop; becomes the V texture coordinate.
    pub u: f32,
    pub point: Vec3,
    pub tangent: Vec3,
    /// Tangent turned 90° in the horizontal plane.
    pub normal: Vec3,
}

/// Builds ribbon meshes from waypoint loops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RibbonBuilder {
    /// Height every ribbon vertex is placed at.
    pub surface_height: f32,
    pub spacing: SampleSpacing,
}

impl Default for RibbonBuilder {
    fn default() -> Self {
        Self {
            surface_height: 0.1,
            spacing: SampleSpacing::Parametric,
        }
    }
}

impl RibbonBuilder {
    /// Sample the closed curve through `waypoints` at `sample_count + 1` evenly spaced positions.
    ///
    /// The last sample coincides with the first.
    pub fn sample(
        &self,
        waypoints: &[Vec3],
        sample_count: usize,
    ) -> Result<Vec<CurveSample>, TrackError> {
        let curve = ClosedCatmullRom::new(waypoints)?;
        if sample_count == 0 {
            return Err(TrackError::invalid("sample count must be at least 1"));
        }
        if sample_count < waypoints.len() {
            return Err(TrackError::invalid(format!(
                "sample count {sample_count} is below the waypoint count {}",
                waypoints.len()
            )));
        }

        let arc = match self.spacing {
            SampleSpacing::Parametric => None,
            SampleSpacing::ArcLength => Some(curve.arc_lengths(sample_count * 8)),
        };

        let samples = (0..=sample_count)
            .map(|i| {
                let u = i as f32 / sample_count as f32;
                let t = arc.as_ref().map_or(u, |table| table.param_at(u));
                let point = curve.point(t);
                let tangent = curve.tangent(t);
                let normal = Vec3::new(-tangent.z, 0.0, tangent.x).normalize_or_zero();
                CurveSample {
                    u,
                    point,
                    tangent,
                    normal,
                }
            })
            .collect();
        Ok(samples)
    }

    /// Build the ribbon mesh for a closed loop through `waypoints`.
    pub fn build(
        &self,
        waypoints: &[Vec3],
        width: f32,
        sample_count: usize,
    ) -> Result<RibbonMesh, TrackError> {
        if waypoints.len() < ClosedCatmullRom::MIN_POINTS {
            return Err(TrackError::invalid(format!(
                "need at least {} waypoints, got {}",
                ClosedCatmullRom::MIN_POINTS,
                waypoints.len()
            )));
        }
        if !(width.is_finite() && width > 0.0) {
            return Err(TrackError::invalid(format!(
                "width must be positive, got {width}"
            )));
        }
        let samples = self.sample(waypoints, sample_count)?;
        let mesh = self.mesh_from_samples(&samples, width);
        tracing::debug!(
            waypoints = waypoints.len(),
            samples = samples.len(),
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            "built ribbon"
        );
        Ok(mesh)
    }

    fn mesh_from_samples(&self, samples: &[CurveSample], width: f32) -> RibbonMesh {
        let half = width * 0.5;
        let mut positions = Vec::with_capacity(samples.len() * 2);
        let mut uvs = Vec::with_capacity(samples.len() * 2);

        for s in samples {
            let mut left = s.point + s.normal * half;
            let mut right = s.point - s.normal * half;
            left.y = self.surface_height;
            right.y = self.surface_height;
            positions.push(left);
            positions.push(right);
            uvs.push(Vec2::new(0.0, s.u));
            uvs.push(Vec2::new(1.0, s.u));
        }

        let pairs = samples.len() as u32;
        let mut indices = Vec::with_capacity(samples.len() * 6);
        for i in 0..pairs - 1 {
            push_quad(&mut indices, i, i + 1);
        }
        // Close the loop back onto the first pair.
        push_quad(&mut indices, pairs - 1, 0);

        let normals = vertex_normals(&positions, &indices);
        RibbonMesh {
            positions,
            uvs,
            normals,
            indices,
        }
    }
}

/// Build a ribbon with the default surface height and parametric spacing.
pub fn build_ribbon(
    waypoints: &[Vec3],
    width: f32,
    sample_count: usize,
) -> Result<RibbonMesh, TrackError> {
    RibbonBuilder::default().build(waypoints, width, sample_count)
}

/// Two upward-facing triangles between sample pair `a` and sample pair `b`.
fn push_quad(indices: &mut Vec<u32>, a: u32, b: u32) {
    let (l0, r0) = (a * 2, a * 2 + 1);
    let (l1, r1) = (b * 2, b * 2 + 1);
    indices.extend_from_slice(&[l0, l1, r0, r0, l1, r1]);
}

/// Area-weighted vertex normals. Vertices touched only by degenerate faces get +Y.
pub fn vertex_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut acc = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let n = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        acc[a] += n;
        acc[b] += n;
        acc[c] += n;
    }
    acc.into_iter()
        .map(|n| {
            let n = n.normalize_or_zero();
            if n == Vec3::ZERO { Vec3::Y } else { n }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loop_points() -> Vec<Vec3> {
        kartway_common::config::default_waypoints()
    }

    /// Points on a circle at the given angles in degrees.
    fn ring(radius: f32, degrees: &[f32]) -> Vec<Vec3> {
        degrees
            .iter()
            .map(|d| {
                let a = d.to_radians();
                Vec3::new(radius * a.cos(), 0.0, radius * a.sin())
            })
            .collect()
    }

    fn even_ring() -> Vec<Vec3> {
        ring(30.0, &[0.0, 45.0, 90.0, 135.0, 180.0, 225.0, 270.0, 315.0])
    }

    fn triangle_points() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(30.0, 0.0, 0.0),
            Vec3::new(15.0, 0.0, 25.0),
        ]
    }

    #[test]
    fn counts_match_sample_count() {
        for (points, samples) in [
            (triangle_points(), 3),
            (triangle_points(), 17),
            (loop_points(), 200),
        ] {
            let mesh = build_ribbon(&points, 8.0, samples).unwrap();
            assert_eq!(mesh.vertex_count(), 2 * (samples + 1));
            assert_eq!(mesh.uvs.len(), 2 * (samples + 1));
            assert_eq!(mesh.normals.len(), 2 * (samples + 1));
            assert_eq!(mesh.indices.len(), 6 * (samples + 1));
            assert_eq!(mesh.triangle_count(), 2 * (samples + 1));
        }
    }

    #[test]
    fn closing_quad_wraps_to_first_pair() {
        let samples = 12;
        let mesh = build_ribbon(&triangle_points(), 4.0, samples).unwrap();
        let n = mesh.vertex_count() as u32;
        assert!(mesh.indices.iter().all(|&i| i < n));

        let last = 2 * samples as u32;
        let closing = &mesh.indices[mesh.indices.len() - 6..];
        assert_eq!(closing, &[last, 0, last + 1, last + 1, 0, 1]);
    }

    #[test]
    fn rejects_invalid_parameters() {
        let pts = triangle_points();
        assert!(matches!(
            build_ribbon(&pts[..2], 4.0, 10),
            Err(TrackError::InvalidTrackParameters(_))
        ));
        assert!(matches!(
            build_ribbon(&pts, 0.0, 10),
            Err(TrackError::InvalidTrackParameters(_))
        ));
        assert!(matches!(
            build_ribbon(&pts, -2.0, 10),
            Err(TrackError::InvalidTrackParameters(_))
        ));
        assert!(matches!(
            build_ribbon(&pts, f32::NAN, 10),
            Err(TrackError::InvalidTrackParameters(_))
        ));
        assert!(matches!(
            build_ribbon(&pts, 4.0, 0),
            Err(TrackError::InvalidTrackParameters(_))
        ));
    }

    #[test]
    fn rejects_undersampling() {
        let err = build_ribbon(&loop_points(), 8.0, 4).unwrap_err();
        assert!(err.to_string().contains("below the waypoint count"));
    }

    #[test]
    fn edges_sit_half_width_from_centre_line() {
        let width = 6.0;
        let pts = loop_points();
        let builder = RibbonBuilder::default();
        let samples = builder.sample(&pts, 64).unwrap();
        let mesh = builder.build(&pts, width, 64).unwrap();
        for (i, s) in samples.iter().enumerate() {
            let centre = Vec3::new(s.point.x, builder.surface_height, s.point.z);
            let left = mesh.positions[2 * i];
            let right = mesh.positions[2 * i + 1];
            assert!((left.distance(centre) - width / 2.0).abs() < 1e-3);
            assert!((right.distance(centre) - width / 2.0).abs() < 1e-3);
            assert!((left.distance(right) - width).abs() < 1e-3);
        }
    }

    #[test]
    fn vertices_use_fixed_surface_height() {
        let builder = RibbonBuilder {
            surface_height: 0.25,
            ..RibbonBuilder::default()
        };
        let mut pts = triangle_points();
        pts[1].y = 3.0;
        let mesh = builder.build(&pts, 4.0, 30).unwrap();
        assert!(mesh.positions.iter().all(|p| p.y == 0.25));
    }

    #[test]
    fn uvs_run_along_the_loop() {
        let mesh = build_ribbon(&triangle_points(), 4.0, 10).unwrap();
        assert_eq!(mesh.uvs[0], Vec2::new(0.0, 0.0));
        assert_eq!(mesh.uvs[1], Vec2::new(1.0, 0.0));
        assert_eq!(mesh.uvs[20], Vec2::new(0.0, 1.0));
        assert_eq!(mesh.uvs[21], Vec2::new(1.0, 1.0));
        assert!((mesh.uvs[10].y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn faces_point_up_for_both_loop_directions() {
        let forward = even_ring();
        let mut reversed = forward.clone();
        reversed.reverse();
        for pts in [forward, reversed] {
            let mesh = build_ribbon(&pts, 8.0, 120).unwrap();
            for tri in mesh.triangles() {
                let n = mesh.face_normal(tri);
                // Closing quad is degenerate; every other face must face up.
                assert!(n.y >= -1e-3, "downward face {tri:?}");
            }
        }
    }

    #[test]
    fn recomputed_normals_are_close_to_up() {
        let mesh = build_ribbon(&even_ring(), 8.0, 150).unwrap();
        for n in &mesh.normals {
            assert!((n.length() - 1.0).abs() < 1e-3);
            assert!(n.y > 0.99, "normal {n:?}");
        }
    }

    #[test]
    fn arc_length_spacing_evens_out_sample_gaps() {
        // Uneven spans: parametric sampling bunches samples on the short ones.
        let pts = ring(20.0, &[0.0, 20.0, 40.0, 180.0, 270.0]);
        let gap_ratio = |spacing| {
            let builder = RibbonBuilder {
                spacing,
                ..RibbonBuilder::default()
            };
            let samples = builder.sample(&pts, 80).unwrap();
            let gaps: Vec<f32> = samples
                .windows(2)
                .map(|w| w[0].point.distance(w[1].point))
                .collect();
            let max = gaps.iter().copied().fold(f32::MIN, f32::max);
            let min = gaps.iter().copied().fold(f32::MAX, f32::min);
            max / min
        };
        assert!(gap_ratio(SampleSpacing::ArcLength) < gap_ratio(SampleSpacing::Parametric));
        assert!(gap_ratio(SampleSpacing::ArcLength) < 1.2);
    }

    #[test]
    fn vertex_normals_fall_back_to_up_for_degenerate_faces() {
        let positions = vec![Vec3::ZERO, Vec3::ZERO, Vec3::ZERO];
        let normals = vertex_normals(&positions, &[0, 1, 2]);
        assert!(normals.iter().all(|n| *n == Vec3::Y));
    }
}

use glam::Vec3;

use crate::error::TrackError;

/// Closed uniform Catmull-Rom curve through a loop of control points.
///
/// The curve parameter `t` runs over `[0, 1]`, each control span taking an
/// equal share. `t = 1` lands back on the first control point, and the tangent
/// is continuous across the wrap.
#[derive(Debug, Clone)]
pub struct ClosedCatmullRom {
    points: Vec<Vec3>,
}

impl ClosedCatmullRom {
    pub const MIN_POINTS: usize = 3;

    pub fn new(points: &[Vec3]) -> Result<Self, TrackError> {
        if points.len() < Self::MIN_POINTS {
            return Err(TrackError::invalid(format!(
                "a closed curve needs at least {} waypoints, got {}",
                Self::MIN_POINTS,
                points.len()
            )));
        }
        if points.iter().any(|p| !p.is_finite()) {
            return Err(TrackError::invalid("waypoints must be finite"));
        }
        Ok(Self {
            points: points.to_vec(),
        })
    }

    pub fn control_points(&self) -> &[Vec3] {
        &self.points
    }

    /// Point on the curve at `t`.
    pub fn point(&self, t: f32) -> Vec3 {
        let (i, local) = self.span(t);
        let [p0, p1, p2, p3] = self.window(i);
        catmull_rom(p0, p1, p2, p3, local)
    }

    /// Derivative with respect to `t` (not normalized).
    pub fn derivative(&self, t: f32) -> Vec3 {
        let (i, local) = self.span(t);
        let [p0, p1, p2, p3] = self.window(i);
        catmull_rom_derivative(p0, p1, p2, p3, local) * self.points.len() as f32
    }

    /// Unit tangent at `t`, or zero where the curve stalls.
    pub fn tangent(&self, t: f32) -> Vec3 {
        self.derivative(t).normalize_or_zero()
    }

    /// Cumulative chord lengths over `divisions` equal parameter steps.
    pub fn arc_lengths(&self, divisions: usize) -> ArcLengthTable {
        let divisions = divisions.max(1);
        let mut lengths = Vec::with_capacity(divisions + 1);
        let mut total = 0.0;
        let mut last = self.point(0.0);
        lengths.push(0.0);
        for d in 1..=divisions {
            let p = self.point(d as f32 / divisions as f32);
            total += p.distance(last);
            lengths.push(total);
            last = p;
        }
        ArcLengthTable { lengths }
    }

    /// Span index and local parameter for a global `t`.
    fn span(&self, t: f32) -> (usize, f32) {
        let n = self.points.len();
        let scaled = t.rem_euclid(1.0) * n as f32;
        let i = (scaled.floor() as usize).min(n - 1);
        (i, scaled - i as f32)
    }

    fn window(&self, i: usize) -> [Vec3; 4] {
        let n = self.points.len();
        [
            self.points[(i + n - 1) % n],
            self.points[i],
            self.points[(i + 1) % n],
            self.points[(i + 2) % n],
        ]
    }
}

/// Cumulative arc length sampled at evenly spaced curve parameters.
#[derive(Debug, Clone)]
pub struct ArcLengthTable {
    lengths: Vec<f32>,
}

impl ArcLengthTable {
    pub fn total(&self) -> f32 {
        self.lengths.last().copied().unwrap_or(0.0)
    }

    /// Curve parameter at which the arc length reaches `u · total`.
    pub fn param_at(&self, u: f32) -> f32 {
        let divisions = self.lengths.len() - 1;
        let total = self.total();
        if total <= 0.0 || divisions == 0 {
            return u.clamp(0.0, 1.0);
        }
        let target = u.clamp(0.0, 1.0) * total;

        // First entry whose cumulative length exceeds the target.
        let hi = self.lengths.partition_point(|&l| l <= target).min(divisions);
        let lo = hi.saturating_sub(1);
        let before = self.lengths[lo];
        let span = self.lengths[hi] - before;
        let frac = if span > 0.0 {
            (target - before) / span
        } else {
            0.0
        };
        (lo as f32 + frac) / divisions as f32
    }
}

fn catmull_rom(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let t2 = t * t;
    let t3 = t2 * t;

    let v0 = (p2 - p0) * 0.5;
    let v1 = (p3 - p1) * 0.5;

    let a = 2.0 * p1 - 2.0 * p2 + v0 + v1;
    let b = -3.0 * p1 + 3.0 * p2 - 2.0 * v0 - v1;

    a * t3 + b * t2 + v0 * t + p1
}

fn catmull_rom_derivative(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let t2 = t * t;

    let v0 = (p2 - p0) * 0.5;
    let v1 = (p3 - p1) * 0.5;

    let a = 2.0 * p1 - 2.0 * p2 + v0 + v1;
    let b = -3.0 * p1 + 3.0 * p2 - 2.0 * v0 - v1;

    a * (3.0 * t2) + b * (2.0 * t) + v0
}

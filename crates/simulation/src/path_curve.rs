//! Road path geometry.
//!
//! A [`PathCurve`] is the single curve vehicles follow. It is stored as a
//! dense polyline with a cumulative arc-length table, built either from raw
//! points or by sampling cubic Bezier segments, so distance queries are a
//! binary search plus a lerp.

use bevy::prelude::*;

/// Samples per cubic Bezier segment when building the arc-length table.
const BEZIER_LUT_STEPS: usize = 128;

/// Points closer than this are merged when building a polyline.
const MIN_POINT_SPACING: f32 = 1e-4;

#[derive(Component, Debug, Clone)]
pub struct PathCurve {
    points: Vec<Vec3>,
    /// `cumulative[i]` is the arc length from `points[0]` to `points[i]`.
    cumulative: Vec<f32>,
}

impl PathCurve {
    /// Build a curve that runs through `points` in order. Consecutive
    /// duplicates are dropped.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut kept: Vec<Vec3> = Vec::new();
        for p in points {
            match kept.last() {
                Some(last) if last.distance(p) < MIN_POINT_SPACING => {}
                _ => kept.push(p),
            }
        }

        let mut cumulative = Vec::with_capacity(kept.len());
        let mut total = 0.0_f32;
        for (i, p) in kept.iter().enumerate() {
            if i > 0 {
                total += kept[i - 1].distance(*p);
            }
            cumulative.push(total);
        }

        Self {
            points: kept,
            cumulative,
        }
    }

    /// Straight line from `start` to `end`.
    pub fn straight(start: Vec3, end: Vec3) -> Self {
        Self::from_points([start, end])
    }

    /// A single cubic Bezier segment.
    pub fn bezier(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3) -> Self {
        Self::bezier_chain(&[[p0, p1, p2, p3]])
    }

    /// Consecutive cubic Bezier segments; each segment should start where
    /// the previous one ended.
    pub fn bezier_chain(segments: &[[Vec3; 4]]) -> Self {
        let mut samples = Vec::with_capacity(segments.len() * BEZIER_LUT_STEPS + 1);
        for (i, seg) in segments.iter().enumerate() {
            let first = if i == 0 { 0 } else { 1 };
            for step in first..=BEZIER_LUT_STEPS {
                let t = step as f32 / BEZIER_LUT_STEPS as f32;
                samples.push(evaluate_cubic(seg, t));
            }
        }
        Self::from_points(samples)
    }

    /// Total arc length.
    pub fn length(&self) -> f32 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    pub fn start(&self) -> Vec3 {
        self.points.first().copied().unwrap_or(Vec3::ZERO)
    }

    pub fn end(&self) -> Vec3 {
        self.points.last().copied().unwrap_or(Vec3::ZERO)
    }

    /// World location and rotation at `distance` along the curve. The
    /// rotation's forward (local -Z) follows the tangent with +Y up.
    pub fn pose(&self, distance: f32) -> (Vec3, Quat) {
        let location = self.location_at(distance);
        let rotation = Transform::IDENTITY
            .looking_to(self.tangent_at(distance), Vec3::Y)
            .rotation;
        (location, rotation)
    }

    pub fn location_at(&self, distance: f32) -> Vec3 {
        match self.segment_at(distance) {
            Some((i, frac)) => self.points[i - 1].lerp(self.points[i], frac),
            None => self.start(),
        }
    }

    /// Unit tangent at `distance`, or zero for a degenerate curve.
    pub fn tangent_at(&self, distance: f32) -> Vec3 {
        match self.segment_at(distance) {
            Some((i, _)) => (self.points[i] - self.points[i - 1]).normalize_or_zero(),
            None => Vec3::ZERO,
        }
    }

    /// Distance along the curve of the point closest to `location`.
    pub fn project_to_distance(&self, location: Vec3) -> f32 {
        let mut best_dist_sq = f32::INFINITY;
        let mut best_distance = 0.0;
        for i in 1..self.points.len() {
            let a = self.points[i - 1];
            let b = self.points[i];
            let ab = b - a;
            let len_sq = ab.length_squared();
            let t = if len_sq > 0.0 {
                ((location - a).dot(ab) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let closest = a + ab * t;
            let d_sq = closest.distance_squared(location);
            if d_sq < best_dist_sq {
                best_dist_sq = d_sq;
                let start = self.cumulative[i - 1];
                best_distance = start + (self.cumulative[i] - start) * t;
            }
        }
        best_distance
    }

    /// Index of the polyline point ending the segment that contains
    /// `distance`, plus the fraction along that segment. Clamps to the curve.
    fn segment_at(&self, distance: f32) -> Option<(usize, f32)> {
        if self.points.len() < 2 {
            return None;
        }
        let d = distance.clamp(0.0, self.length());
        let idx = self
            .cumulative
            .partition_point(|&c| c < d)
            .clamp(1, self.points.len() - 1);
        let d0 = self.cumulative[idx - 1];
        let d1 = self.cumulative[idx];
        let frac = if (d1 - d0).abs() < 1e-6 {
            0.0
        } else {
            (d - d0) / (d1 - d0)
        };
        Some((idx, frac))
    }
}

fn evaluate_cubic(seg: &[Vec3; 4], t: f32) -> Vec3 {
    let t = t.clamp(0.0, 1.0);
    let u = 1.0 - t;
    let uu = u * u;
    let tt = t * t;
    u * uu * seg[0] + 3.0 * uu * t * seg[1] + 3.0 * u * tt * seg[2] + t * tt * seg[3]
}

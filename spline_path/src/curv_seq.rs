//! # Curvature sequences
//!
//! Waypoint sequences described as a chain of constant curvature segments.
//! These are used to build reference tracks for testing and benchmarking.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::f64::consts::PI;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use util::maths;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A sequence of constant curvature segments which describes a path.
///
/// The first element of each pair is the curvature in 1/meters (positive turns
/// left), the second the distance in meters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CurvSequence {
    pub seq: Vec<(f64, f64)>,

    /// Separation of the generated waypoints
    pub point_sep_m: f64,

    /// Start position
    pub start_m: Vector2<f64>,

    /// Start heading from the +ve x axis
    pub start_heading_rad: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl CurvSequence {
    /// Create a sequence starting at the origin heading along +ve x.
    pub fn new(seq: Vec<(f64, f64)>, point_sep_m: f64) -> Self {
        Self {
            seq,
            point_sep_m,
            start_m: Vector2::zeros(),
            start_heading_rad: 0.0,
        }
    }

    /// A closed, anticlockwise stadium shaped track: two straights joined by
    /// two semicircles.
    pub fn stadium(straight_m: f64, radius_m: f64, point_sep_m: f64) -> Self {
        let curv_m = 1.0 / radius_m;
        let arc_m = PI * radius_m;

        Self::new(
            vec![
                (0.0, straight_m),
                (curv_m, arc_m),
                (0.0, straight_m),
                (curv_m, arc_m),
            ],
            point_sep_m,
        )
    }

    /// Convert this sequence into waypoints.
    ///
    /// Each segment is sampled every `point_sep_m` from its start, and the end
    /// of the final segment is always included.
    pub fn into_waypoints(self) -> Vec<Vector2<f64>> {
        let mut points = Vec::new();
        let mut start = self.start_m;
        let mut head_rad = self.start_heading_rad;

        for (curv_m, dist_m) in self.seq.iter().copied() {
            for s_m in maths::arange(0.0, dist_m, self.point_sep_m) {
                points.push(Self::point_along(start, head_rad, curv_m, s_m));
            }

            start = Self::point_along(start, head_rad, curv_m, dist_m);
            head_rad += curv_m * dist_m;
        }

        points.push(start);
        points
    }

    /// Position after travelling `s_m` along a constant curvature arc.
    fn point_along(start: Vector2<f64>, head_rad: f64, curv_m: f64, s_m: f64) -> Vector2<f64> {
        // If the curvature is approximately zero we should move in a straight
        // line, 1/curv_m would blow up
        if curv_m.abs() <= std::f64::EPSILON {
            start + s_m * Vector2::new(head_rad.cos(), head_rad.sin())
        } else {
            // Rotate about the centre of the turn, which is 1/curv along the
            // left normal (a -ve curv puts it on the right)
            let radius_m = 1.0 / curv_m;
            let centre = start + radius_m * Vector2::new(-head_rad.sin(), head_rad.cos());
            let angle_rad = head_rad + curv_m * s_m;

            centre + radius_m * Vector2::new(angle_rad.sin(), -angle_rad.cos())
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_quarter_turn() {
        let points = CurvSequence::new(vec![(0.5, PI)], 0.1).into_waypoints();

        // Radius 2 left turn through 90 degrees
        let end = points[points.len() - 1];
        assert!((end - Vector2::new(2.0, 2.0)).norm() < 1e-9);
        for p in points.iter() {
            assert!(((p - Vector2::new(0.0, 2.0)).norm() - 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_stadium_closes() {
        let points = CurvSequence::stadium(10.0, 3.0, 0.5).into_waypoints();

        assert!((points[0] - points[points.len() - 1]).norm() < 1e-9);

        // Every point is within the bounding box of the track
        for p in points.iter() {
            assert!(p[0] > -3.0 - 1e-9 && p[0] < 13.0 + 1e-9);
            assert!(p[1] > -1e-9 && p[1] < 6.0 + 1e-9);
        }
    }
}

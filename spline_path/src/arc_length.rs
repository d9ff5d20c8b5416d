//! # Arc length indexing
//!
//! Converts a raw waypoint sequence into knots indexed by cumulative chord
//! length, optionally thinned out to a minimum grid spacing.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::trace;
use nalgebra::Vector2;

use crate::path::PathError;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Consecutive waypoints closer than this are treated as the same point.
pub const MIN_CHORD_M: f64 = 1e-9;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Knot points with their arc length along the path.
#[derive(Clone, Debug)]
pub struct ArcLengthIndex {
    /// The knot points
    pub points_m: Vec<Vector2<f64>>,

    /// Cumulative chord length at each knot, starting at 0 and strictly
    /// increasing.
    pub s_m: Vec<f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ArcLengthIndex {
    /// Index the given waypoints.
    ///
    /// Consecutive duplicate points are dropped. If `min_grid_m` is given the
    /// knots are greedily thinned so that consecutive knots are at least
    /// `min_grid_m` apart, always keeping the first and last point even when
    /// the final gap is shorter.
    pub fn new(waypoints: &[Vector2<f64>], min_grid_m: Option<f64>) -> Result<Self, PathError> {
        if let Some(g) = min_grid_m {
            if !(g > 0.0) || !g.is_finite() {
                return Err(PathError::InvalidMinGrid(g));
            }
        }

        if let Some(i) = waypoints
            .iter()
            .position(|p| !p[0].is_finite() || !p[1].is_finite())
        {
            return Err(PathError::NonFinitePoint(i));
        }

        if waypoints.len() < 2 {
            return Err(PathError::TooFewPoints(waypoints.len()));
        }

        // Cumulative chord length, skipping zero length chords
        let mut points_m: Vec<Vector2<f64>> = Vec::with_capacity(waypoints.len());
        let mut s_m: Vec<f64> = Vec::with_capacity(waypoints.len());

        for p in waypoints {
            match points_m.last().copied() {
                None => {
                    points_m.push(*p);
                    s_m.push(0.0);
                }
                Some(prev) => {
                    let chord_m = (p - prev).norm();
                    if chord_m >= MIN_CHORD_M {
                        let s = s_m[s_m.len() - 1] + chord_m;
                        points_m.push(*p);
                        s_m.push(s);
                    }
                }
            }
        }

        if points_m.len() < 2 {
            return Err(PathError::CoincidentPoints);
        }

        let index = Self { points_m, s_m };

        match min_grid_m {
            Some(g) => Ok(index.resample(g)),
            None => Ok(index),
        }
    }

    /// Length of the indexed polyline.
    pub fn length_m(&self) -> f64 {
        self.s_m[self.s_m.len() - 1]
    }

    /// Greedily keep knots at least `min_grid_m` from the last kept knot.
    fn resample(self, min_grid_m: f64) -> Self {
        let last = self.s_m.len() - 1;
        let mut keep = vec![0usize];

        for (k, s) in self.s_m.iter().enumerate() {
            if s - self.s_m[keep[keep.len() - 1]] >= min_grid_m {
                keep.push(k);
            }
        }

        if keep[keep.len() - 1] != last {
            keep.push(last);
        }

        trace!(
            "Resampled {} knots down to {} with minimum grid {} m",
            self.s_m.len(),
            keep.len(),
            min_grid_m
        );

        Self {
            points_m: keep.iter().map(|&k| self.points_m[k]).collect(),
            s_m: keep.iter().map(|&k| self.s_m[k]).collect(),
        }
    }
}

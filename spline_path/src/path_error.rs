//! # Path error
//!
//! Lateral error along a whole trajectory. Each point is projected using the
//! previous point's projection as the seed, so the trajectory is assumed to
//! move forwards along the path. Nothing guards against it doubling back.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Vector2;

use crate::{
    path::Path,
    project::{ProjectParams, Projection},
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Caller-side holder for the projection seed.
///
/// A control loop keeps one of these alongside its path and calls
/// [`SeedTracker::update`] once per cycle. The path itself holds no state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SeedTracker {
    seed_m: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SeedTracker {
    /// Start tracking from the given arc length.
    pub fn new(seed_m: f64) -> Self {
        Self { seed_m }
    }

    /// The arc length the next projection will start from.
    pub fn seed(&self) -> f64 {
        self.seed_m
    }

    /// Restart tracking from a new arc length, for instance after switching to
    /// a new path.
    pub fn reset(&mut self, seed_m: f64) {
        self.seed_m = seed_m;
    }

    /// Project the point and carry the result forward as the next seed.
    pub fn update(
        &mut self,
        path: &Path,
        point: &Vector2<f64>,
        params: &ProjectParams,
    ) -> Projection {
        let proj = path.project(point, self.seed_m, params);
        self.seed_m = proj.s_m;
        proj
    }
}

impl Path {
    /// Project every point of the trajectory, seeding each projection with the
    /// previous result and the first one with the start of the path.
    pub fn project_trajectory(
        &self,
        trajectory: &[Vector2<f64>],
        params: &ProjectParams,
    ) -> Vec<Projection> {
        let mut tracker = SeedTracker::default();

        trajectory
            .iter()
            .map(|p| tracker.update(self, p, params))
            .collect()
    }

    /// Signed lateral offset of each trajectory point from the path.
    pub fn path_error(&self, trajectory: &[Vector2<f64>], params: &ProjectParams) -> Vec<f64> {
        self.project_trajectory(trajectory, params)
            .iter()
            .map(|proj| proj.offset_m)
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::curv_seq::CurvSequence;

    #[test]
    fn test_path_error_straight() {
        let path = Path::new(&[Vector2::new(0.0, 0.0), Vector2::new(10.0, 0.0)], None).unwrap();

        let traj: Vec<Vector2<f64>> = (0..10)
            .map(|i| Vector2::new(i as f64 + 0.5, 0.1 * i as f64 - 0.45))
            .collect();
        let errors = path.path_error(&traj, &ProjectParams::default());

        assert_eq!(errors.len(), traj.len());
        for (e, p) in errors.iter().zip(traj.iter()) {
            assert!((e - p[1]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_path_error_follows_stadium() {
        // A closed track starts and ends at the same point, so only the seed
        // tells the start and the end apart
        let path = Path::new(&CurvSequence::stadium(20.0, 6.0, 1.0).into_waypoints(), None)
            .unwrap();
        let params = ProjectParams::default();

        // Weave along the path with a known offset
        let s: Vec<f64> = (0..400).map(|i| path.length() * i as f64 / 400.0).collect();
        let expected: Vec<f64> = s.iter().map(|s| 0.5 * (s / 5.0).sin()).collect();
        let traj: Vec<Vector2<f64>> = s
            .iter()
            .zip(expected.iter())
            .map(|(s, d)| path.p(*s).unwrap() + *d * path.heading(*s).unwrap().normal)
            .collect();

        let projs = path.project_trajectory(&traj, &params);

        for ((proj, s), d) in projs.iter().zip(s.iter()).zip(expected.iter()) {
            assert!(!proj.boundary_fallback);
            assert!((proj.s_m - s).abs() < 1e-6, "s = {} projected to {}", s, proj.s_m);
            assert!((proj.offset_m - d).abs() < 1e-6);
        }

        assert_eq!(path.path_error(&traj, &params).len(), traj.len());
    }

    #[test]
    fn test_seed_tracker() {
        let path = Path::new(&[Vector2::new(0.0, 0.0), Vector2::new(10.0, 0.0)], None).unwrap();
        let params = ProjectParams::default();
        let mut tracker = SeedTracker::new(1.0);

        let proj = tracker.update(&path, &Vector2::new(3.0, 1.0), &params);
        assert!((proj.s_m - 3.0).abs() < 1e-9);
        assert_eq!(tracker.seed(), proj.s_m);

        tracker.reset(0.0);
        assert_eq!(tracker.seed(), 0.0);
    }
}

//! # Path
//!
//! This module defines the smooth, arc length parameterised reference path
//! built from a sequence of waypoints.
//!
//! A `Path` is immutable once built. To follow a different set of waypoints
//! build a new one.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::debug;
use nalgebra::Vector2;
use serde::Serialize;

use crate::{
    arc_length::ArcLengthIndex,
    curvature::{CurvatureSpline, Heading},
    params::Params,
    spline::{DomainError, OutOfBounds, QuadraticSpline, SplineError},
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A smooth path through a set of knot points.
#[derive(Clone, Debug, Serialize)]
pub struct Path {
    /// Knot points the path passes through
    points_m: Vec<Vector2<f64>>,

    /// Arc length of each knot
    knots_s_m: Vec<f64>,

    /// Total length of the path
    length_m: f64,

    fx: QuadraticSpline,
    fy: QuadraticSpline,
    curv: CurvatureSpline,

    /// Policy for position and tangent queries outside `[0, length]`
    bounds: OutOfBounds,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum PathError {
    #[error("Attempted to create a path from {0} point(s), at least 2 are required")]
    TooFewPoints(usize),

    #[error("Attempted to create a path from coincident points")]
    CoincidentPoints,

    #[error("Waypoint {0} has a non-finite coordinate")]
    NonFinitePoint(usize),

    #[error("The minimum grid spacing must be positive and finite, found {0}")]
    InvalidMinGrid(f64),

    #[error("Could not fit the path splines: {0}")]
    SplineError(#[from] SplineError),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Path {
    /// Build a path through the given waypoints.
    ///
    /// If `min_grid_m` is given the waypoints are first thinned so that knots
    /// are at least that far apart (apart from the final one).
    pub fn new(waypoints: &[Vector2<f64>], min_grid_m: Option<f64>) -> Result<Self, PathError> {
        let index = ArcLengthIndex::new(waypoints, min_grid_m)?;

        let xs: Vec<f64> = index.points_m.iter().map(|p| p[0]).collect();
        let ys: Vec<f64> = index.points_m.iter().map(|p| p[1]).collect();

        let fx = QuadraticSpline::new(&index.s_m, &xs)?;
        let fy = QuadraticSpline::new(&index.s_m, &ys)?;
        let curv = CurvatureSpline::new(&fx, &fy, &index.s_m)?;

        let length_m = index.length_m();

        debug!(
            "Built path with {} knots from {} waypoints, length {:.3} m",
            index.points_m.len(),
            waypoints.len(),
            length_m
        );

        Ok(Self {
            points_m: index.points_m,
            knots_s_m: index.s_m,
            length_m,
            fx,
            fy,
            curv,
            bounds: OutOfBounds::default(),
        })
    }

    /// Build a path using the grid spacing and bounds policy from the
    /// parameters.
    pub fn from_params(waypoints: &[Vector2<f64>], params: &Params) -> Result<Self, PathError> {
        Ok(Self::new(waypoints, params.min_grid_m)?.with_bounds(params.out_of_bounds))
    }

    /// Set the policy for position and tangent queries outside the path.
    pub fn with_bounds(mut self, bounds: OutOfBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// The policy for position and tangent queries outside the path.
    pub fn bounds(&self) -> OutOfBounds {
        self.bounds
    }

    /// Return the length of the path in meters.
    pub fn length(&self) -> f64 {
        self.length_m
    }

    /// The knot points of the path, after any resampling.
    pub fn points(&self) -> &[Vector2<f64>] {
        &self.points_m
    }

    /// Arc length of each knot point.
    pub fn knots_s(&self) -> &[f64] {
        &self.knots_s_m
    }

    /// Get the number of knot points in the path
    pub fn num_knots(&self) -> usize {
        self.points_m.len()
    }

    /// X coordinate at `s_m`.
    pub fn x(&self, s_m: f64) -> Result<f64, DomainError> {
        self.fx.eval(s_m, self.bounds)
    }

    /// Y coordinate at `s_m`.
    pub fn y(&self, s_m: f64) -> Result<f64, DomainError> {
        self.fy.eval(s_m, self.bounds)
    }

    /// Position at `s_m`.
    pub fn p(&self, s_m: f64) -> Result<Vector2<f64>, DomainError> {
        let s_m = self.resolve(s_m)?;
        Ok(self.p_in_domain(s_m))
    }

    /// Positions at each of `s_m`.
    pub fn p_many(&self, s_m: &[f64]) -> Result<Vec<Vector2<f64>>, DomainError> {
        self.eval_many(s_m, Self::p)
    }

    /// Derivative of position with respect to arc length, `(dx/ds, dy/ds)`.
    pub fn dp(&self, s_m: f64) -> Result<Vector2<f64>, DomainError> {
        let s_m = self.resolve(s_m)?;
        Ok(Vector2::new(self.fx.derivative(s_m), self.fy.derivative(s_m)))
    }

    /// Curvature at `s_m` in 1/m, positive when the path turns left.
    ///
    /// Outside the path this is clamped to the value at the nearest end.
    pub fn c(&self, s_m: f64) -> f64 {
        self.curv.at(s_m)
    }

    /// Curvature at each of `s_m`.
    pub fn c_many(&self, s_m: &[f64]) -> Vec<f64> {
        s_m.iter().map(|&s| self.c(s)).collect()
    }

    /// Derivative of curvature with respect to arc length at `s_m`.
    pub fn der_c(&self, s_m: f64) -> f64 {
        self.curv.derivative_at(s_m)
    }

    /// Unit tangent and normal at `s_m`.
    pub fn heading(&self, s_m: f64) -> Result<Heading, DomainError> {
        let s_m = self.resolve(s_m)?;
        Ok(self.heading_in_domain(s_m))
    }

    /// Unit tangent and normal at each of `s_m`, each normalised on its own.
    pub fn heading_many(&self, s_m: &[f64]) -> Result<Vec<Heading>, DomainError> {
        self.eval_many(s_m, Self::heading)
    }

    /// Position at an arc length already mapped by the bounds policy.
    pub(crate) fn p_in_domain(&self, s_m: f64) -> Vector2<f64> {
        Vector2::new(self.fx.value(s_m), self.fy.value(s_m))
    }

    /// Heading at an arc length already mapped by the bounds policy.
    ///
    /// Where the spline derivative vanishes the direction of the knot chord
    /// containing `s_m` is used instead.
    pub(crate) fn heading_in_domain(&self, s_m: f64) -> Heading {
        let dp = Vector2::new(self.fx.derivative(s_m), self.fy.derivative(s_m));

        match Heading::from_tangent(dp) {
            Some(h) => h,
            None => {
                let i = self.knot_interval(s_m);
                // Consecutive knots are always distinct so the chord has a direction
                Heading::from_tangent(self.points_m[i + 1] - self.points_m[i]).unwrap_or(
                    Heading {
                        tangent: Vector2::x(),
                        normal: Vector2::y(),
                    },
                )
            }
        }
    }

    /// Clamp `s_m` into the path, for internal queries which must stay on it.
    pub(crate) fn clamp_s(&self, s_m: f64) -> f64 {
        // max/min rather than clamp so that NaN maps to the start
        s_m.max(0.0).min(self.length_m)
    }

    /// Index of the knot interval `[s_i, s_i+1]` containing `s_m`.
    fn knot_interval(&self, s_m: f64) -> usize {
        let last = self.knots_s_m.len() - 2;
        self.knots_s_m[1..=last]
            .partition_point(|&s| s <= s_m)
            .min(last)
    }

    fn resolve(&self, s_m: f64) -> Result<f64, DomainError> {
        self.bounds.apply(s_m, 0.0, self.length_m)
    }

    /// Evaluate a scalar query over a sequence of arc lengths.
    fn eval_many<T, F>(&self, s_m: &[f64], query: F) -> Result<Vec<T>, DomainError>
    where
        F: Fn(&Self, f64) -> Result<T, DomainError>,
    {
        s_m.iter().map(|&s| query(self, s)).collect()
    }
}

//! # Curvature
//!
//! Curvature of the path and the tangent/normal frame along it.
//!
//! Curvature is computed at each knot from the analytic derivatives of the
//! position splines, `c = x' y'' - y' x''`, and then itself interpolated with a
//! quadratic spline. Since the position splines are quadratic their second
//! derivatives are constant over each piece, so `c` is only as smooth as that
//! allows and overshoots near sharp turns.
//!
//! Unlike position, curvature is always clamped outside the path: before the
//! start it equals the curvature at the first knot, past the end the curvature
//! at the last knot, and its derivative is zero in both regions.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::spline::{OutOfBounds, QuadraticSpline, SplineError};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Continuous curvature along the path.
#[derive(Clone, Debug, Serialize)]
pub struct CurvatureSpline {
    spline: QuadraticSpline,
}

/// Unit tangent and left-hand normal of the path at some point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    /// Unit vector in the direction of travel
    pub tangent: Vector2<f64>,

    /// Unit vector pointing to the left of the direction of travel
    pub normal: Vector2<f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl CurvatureSpline {
    /// Build the curvature spline from the position splines, sampling
    /// curvature at the knots `s_m`.
    pub fn new(
        fx: &QuadraticSpline,
        fy: &QuadraticSpline,
        s_m: &[f64],
    ) -> Result<Self, SplineError> {
        let curv_m: Vec<f64> = s_m
            .iter()
            .map(|&s| {
                fx.derivative(s) * fy.second_derivative(s)
                    - fy.derivative(s) * fx.second_derivative(s)
            })
            .collect();

        Ok(Self {
            spline: QuadraticSpline::new(s_m, &curv_m)?,
        })
    }

    /// Curvature at `s_m` in 1/m, positive when turning left.
    pub fn at(&self, s_m: f64) -> f64 {
        // Clamp never errors on a finite value
        match self.spline.eval(s_m, OutOfBounds::Clamp) {
            Ok(c) => c,
            Err(_) => std::f64::NAN,
        }
    }

    /// Derivative of curvature with respect to arc length at `s_m`.
    pub fn derivative_at(&self, s_m: f64) -> f64 {
        let (min_m, max_m) = self.spline.domain();

        if s_m.is_nan() {
            std::f64::NAN
        } else if s_m < min_m || s_m > max_m {
            0.0
        } else {
            self.spline.derivative(s_m)
        }
    }
}

impl Heading {
    /// Build the frame from a (not necessarily unit) tangent vector.
    ///
    /// Returns `None` if the vector has no usable direction.
    pub fn from_tangent(tangent: Vector2<f64>) -> Option<Self> {
        let norm = tangent.norm();

        if !(norm > std::f64::EPSILON) || !norm.is_finite() {
            return None;
        }

        let tangent = tangent / norm;

        Some(Self {
            tangent,
            normal: Vector2::new(-tangent[1], tangent[0]),
        })
    }

    /// Heading angle of the tangent from the +ve x axis, in radians.
    pub fn angle_rad(&self) -> f64 {
        self.tangent[1].atan2(self.tangent[0])
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_heading_frame() {
        let h = Heading::from_tangent(Vector2::new(3.0, 4.0)).unwrap();

        assert!((h.tangent.norm() - 1.0).abs() < 1e-12);
        assert!((h.normal.norm() - 1.0).abs() < 1e-12);
        assert!(h.tangent.dot(&h.normal).abs() < 1e-12);

        // Normal is to the left
        assert!((h.normal - Vector2::new(-0.8, 0.6)).norm() < 1e-12);
        assert!((h.angle_rad() - (4f64).atan2(3.0)).abs() < 1e-12);

        assert!(Heading::from_tangent(Vector2::new(0.0, 0.0)).is_none());
        assert!(Heading::from_tangent(Vector2::new(std::f64::NAN, 1.0)).is_none());
    }

    #[test]
    fn test_curvature_of_parabola() {
        // y = x^2 / 2 parameterised by x has x' = 1, y' = x, y'' = 1, so the
        // (non unit speed) curvature expression is 1 everywhere.
        let s: Vec<f64> = (0..6).map(|i| i as f64).collect();
        let x: Vec<f64> = s.clone();
        let y: Vec<f64> = s.iter().map(|s| 0.5 * s * s).collect();
        let fx = QuadraticSpline::new(&s, &x).unwrap();
        let fy = QuadraticSpline::new(&s, &y).unwrap();

        let c = CurvatureSpline::new(&fx, &fy, &s).unwrap();
        for i in 0..=50 {
            assert!((c.at(0.1 * i as f64) - 1.0).abs() < 1e-9);
            assert!(c.derivative_at(0.1 * i as f64).abs() < 1e-9);
        }
    }

    #[test]
    fn test_clamped_outside() {
        // Curvature changing along the knots so the boundary values differ
        let s: Vec<f64> = (0..5).map(|i| i as f64).collect();
        let x: Vec<f64> = s.clone();
        let y: Vec<f64> = s.iter().map(|s| s * s * s / 6.0).collect();
        let fx = QuadraticSpline::new(&s, &x).unwrap();
        let fy = QuadraticSpline::new(&s, &y).unwrap();
        let c = CurvatureSpline::new(&fx, &fy, &s).unwrap();

        assert_eq!(c.at(-3.0), c.at(0.0));
        assert_eq!(c.at(10.0), c.at(4.0));
        assert_eq!(c.derivative_at(-3.0), 0.0);
        assert_eq!(c.derivative_at(10.0), 0.0);
        assert!(c.at(std::f64::NAN).is_nan());
    }

    #[test]
    fn test_curvature_derivative() {
        // y = x^3 / 6 has curvature varying along x
        let s: Vec<f64> = (0..5).map(|i| i as f64).collect();
        let x: Vec<f64> = s.clone();
        let y: Vec<f64> = s.iter().map(|s| s * s * s / 6.0).collect();
        let fx = QuadraticSpline::new(&s, &x).unwrap();
        let fy = QuadraticSpline::new(&s, &y).unwrap();
        let c = CurvatureSpline::new(&fx, &fy, &s).unwrap();

        // Central differences of the curvature match its analytic derivative
        let h = 1e-6;
        let mut max_der = 0f64;
        for i in 1..40 {
            let si = 0.1 * i as f64;
            let fd = (c.at(si + h) - c.at(si - h)) / (2.0 * h);
            let der = c.derivative_at(si);

            assert!((der - fd).abs() < 1e-5, "c'({}) = {}, fd = {}", si, der, fd);
            max_der = max_der.max(der.abs());
        }

        assert!(max_der > 1e-3);
    }
}

//! # Quadratic spline
//!
//! Piecewise quadratic interpolation of a scalar function over strictly
//! increasing knots.
//!
//! For three or more knots the interpolant is the unique C1 quadratic spline
//! through every knot whose breakpoints lie halfway between consecutive knots,
//! with the first and last midpoint left out. Each piece therefore contains
//! exactly one knot in its interior, except for the two end pieces which also
//! touch the first and last knot. With only two knots the interpolant is the
//! straight line through them.
//!
//! Values at the interior breakpoints are the unknowns of a tridiagonal system
//! expressing continuity of the first derivative.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use util::maths::{self, SolveError};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A piecewise quadratic function of arc length.
#[derive(Clone, Debug, Serialize)]
pub struct QuadraticSpline {
    /// Breakpoints, piece `i` covers `[breaks[i], breaks[i + 1]]`.
    breaks: Vec<f64>,

    /// Coefficients `[c0, c1, c2]` of each piece in powers of `s - breaks[i]`.
    coeffs: Vec<[f64; 3]>,
}

/// Returned when an evaluation falls outside the spline's domain under
/// [`OutOfBounds::Error`].
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("Arc length {s_m} is outside the domain [{min_m}, {max_m}]")]
pub struct DomainError {
    pub s_m: f64,
    pub min_m: f64,
    pub max_m: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// What to do with an evaluation outside the domain of a spline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutOfBounds {
    /// Evaluate at the nearest end of the domain.
    Clamp,

    /// Continue the first or last polynomial piece.
    Extrapolate,

    /// Return a [`DomainError`].
    Error,
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum SplineError {
    #[error("A spline needs at least 2 knots, found {0}")]
    TooFewKnots(usize),

    #[error("Got {0} knots but {1} values")]
    LengthMismatch(usize, usize),

    #[error("Knots must be finite and strictly increasing (at index {0})")]
    NotIncreasing(usize),

    #[error("Could not solve for the spline coefficients: {0}")]
    SolveFailed(#[from] SolveError),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for OutOfBounds {
    fn default() -> Self {
        OutOfBounds::Clamp
    }
}

impl OutOfBounds {
    /// Map an evaluation point onto the point the spline should actually be
    /// evaluated at.
    pub fn apply(self, s_m: f64, min_m: f64, max_m: f64) -> Result<f64, DomainError> {
        if s_m >= min_m && s_m <= max_m {
            return Ok(s_m);
        }

        match self {
            OutOfBounds::Clamp if !s_m.is_nan() => Ok(maths::clamp(&s_m, &min_m, &max_m)),
            OutOfBounds::Extrapolate if !s_m.is_nan() => Ok(s_m),
            _ => Err(DomainError {
                s_m,
                min_m,
                max_m,
            }),
        }
    }
}

impl QuadraticSpline {
    /// Fit the spline through the points `(s[i], v[i])`.
    pub fn new(s: &[f64], v: &[f64]) -> Result<Self, SplineError> {
        let n = s.len();

        if n < 2 {
            return Err(SplineError::TooFewKnots(n));
        }
        if v.len() != n {
            return Err(SplineError::LengthMismatch(n, v.len()));
        }
        for i in 0..n {
            if !s[i].is_finite() || !v[i].is_finite() || (i > 0 && s[i] <= s[i - 1]) {
                return Err(SplineError::NotIncreasing(i));
            }
        }

        // Two knots is just a line
        if n == 2 {
            return Ok(Self {
                breaks: vec![s[0], s[1]],
                coeffs: vec![[v[0], (v[1] - v[0]) / (s[1] - s[0]), 0.0]],
            });
        }

        // Breakpoints: the two ends plus the midpoints between knots 1..n-2
        let mut breaks = Vec::with_capacity(n - 1);
        breaks.push(s[0]);
        for j in 1..n - 2 {
            breaks.push(0.5 * (s[j] + s[j + 1]));
        }
        breaks.push(s[n - 1]);

        // Piece j spans breaks[j]..breaks[j + 1] and passes through knot j + 1
        let slopes: Vec<EndSlopes> = (0..n - 2)
            .map(|j| EndSlopes::new(breaks[j], s[j + 1], breaks[j + 1]))
            .collect();

        // Unknowns are the values at interior breakpoints 1..=m. The first and
        // last breakpoints are knots so their values are known.
        let m = n - 3;
        let mut values = Vec::with_capacity(n - 1);
        values.push(v[0]);

        if m > 0 {
            let mut sub = vec![0f64; m - 1];
            let mut diag = vec![0f64; m];
            let mut sup = vec![0f64; m - 1];
            let mut rhs = vec![0f64; m];

            // Row k - 1 equates the slope at the right of piece k - 1 with the
            // slope at the left of piece k
            for k in 1..=m {
                let row = k - 1;
                let rgt = &slopes[k - 1].right;
                let lft = &slopes[k].left;

                diag[row] = rgt[2] - lft[0];
                rhs[row] = lft[1] * v[k + 1] - rgt[1] * v[k];

                if k == 1 {
                    rhs[row] -= rgt[0] * v[0];
                } else {
                    sub[row - 1] = rgt[0];
                }

                if k == m {
                    rhs[row] += lft[2] * v[n - 1];
                } else {
                    sup[row] = -lft[2];
                }
            }

            values.extend(maths::solve_tridiagonal(&sub, &diag, &sup, &rhs)?);
        }

        values.push(v[n - 1]);

        let coeffs = (0..n - 2)
            .map(|j| {
                let h = breaks[j + 1] - breaks[j];
                let c0 = values[j];
                let c1 = slopes[j].left[0] * values[j]
                    + slopes[j].left[1] * v[j + 1]
                    + slopes[j].left[2] * values[j + 1];
                let c2 = (values[j + 1] - c0 - c1 * h) / (h * h);
                [c0, c1, c2]
            })
            .collect();

        Ok(Self { breaks, coeffs })
    }

    /// The interval over which the spline interpolates.
    pub fn domain(&self) -> (f64, f64) {
        (self.breaks[0], self.breaks[self.breaks.len() - 1])
    }

    /// Number of polynomial pieces.
    pub fn num_pieces(&self) -> usize {
        self.coeffs.len()
    }

    /// Value at `s_m`, handling out of domain points with `bounds`.
    pub fn eval(&self, s_m: f64, bounds: OutOfBounds) -> Result<f64, DomainError> {
        let s_m = self.resolve(s_m, bounds)?;
        Ok(self.value(s_m))
    }

    /// First derivative at `s_m`, handling out of domain points with `bounds`.
    pub fn eval_derivative(&self, s_m: f64, bounds: OutOfBounds) -> Result<f64, DomainError> {
        let s_m = self.resolve(s_m, bounds)?;
        Ok(self.derivative(s_m))
    }

    /// Value at `s_m`. Outside the domain the end pieces are extrapolated.
    pub fn value(&self, s_m: f64) -> f64 {
        let (c, u) = self.locate(s_m);
        c[0] + u * (c[1] + u * c[2])
    }

    /// First derivative at `s_m`.
    pub fn derivative(&self, s_m: f64) -> f64 {
        let (c, u) = self.locate(s_m);
        c[1] + 2.0 * c[2] * u
    }

    /// Second derivative at `s_m`, constant over each piece.
    pub fn second_derivative(&self, s_m: f64) -> f64 {
        let (c, _) = self.locate(s_m);
        2.0 * c[2]
    }

    fn resolve(&self, s_m: f64, bounds: OutOfBounds) -> Result<f64, DomainError> {
        let (min_m, max_m) = self.domain();
        bounds.apply(s_m, min_m, max_m)
    }

    /// Find the coefficients of the piece containing `s_m` and the local
    /// coordinate within it.
    fn locate(&self, s_m: f64) -> (&[f64; 3], f64) {
        let last = self.coeffs.len() - 1;
        let idx = self.breaks[1..=last].partition_point(|&b| b <= s_m);
        (&self.coeffs[idx], s_m - self.breaks[idx])
    }
}

/// Weights giving the slope at each end of a quadratic piece as a linear
/// combination of `[value at left end, value at interior knot, value at right
/// end]`.
struct EndSlopes {
    left: [f64; 3],
    right: [f64; 3],
}

impl EndSlopes {
    fn new(left_m: f64, knot_m: f64, right_m: f64) -> Self {
        let h1 = knot_m - left_m;
        let h2 = right_m - knot_m;
        let h = right_m - left_m;

        Self {
            left: [-(h1 + h) / (h1 * h), h / (h1 * h2), -h1 / (h * h2)],
            right: [h2 / (h1 * h), -h / (h1 * h2), (h + h2) / (h * h2)],
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const TOL: f64 = 1e-9;

    #[test]
    fn test_interpolates_knots() {
        let s = [0.0, 0.7, 1.5, 3.0, 3.2, 4.9, 6.0];
        let v = [1.0, -2.0, 0.5, 4.0, 3.5, -1.0, 0.0];
        let spline = QuadraticSpline::new(&s, &v).unwrap();

        assert_eq!(spline.num_pieces(), s.len() - 2);
        assert_eq!(spline.domain(), (0.0, 6.0));
        for (si, vi) in s.iter().zip(v.iter()) {
            assert!((spline.value(*si) - vi).abs() < TOL);
        }
    }

    #[test]
    fn test_continuity() {
        let s = [0.0, 1.0, 2.5, 3.0, 5.0];
        let v = [0.0, 1.0, -1.0, 2.0, 0.0];
        let spline = QuadraticSpline::new(&s, &v).unwrap();

        // Value and slope must match either side of every interior breakpoint
        for b in spline.breaks[1..spline.breaks.len() - 1].iter() {
            let eps = 1e-9;
            assert!((spline.value(b - eps) - spline.value(b + eps)).abs() < 1e-6);
            assert!((spline.derivative(b - eps) - spline.derivative(b + eps)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_reproduces_quadratics() {
        // A quadratic is its own quadratic spline
        let f = |s: f64| 0.5 * s * s - 2.0 * s + 1.0;
        let s = [0.0, 0.3, 1.1, 2.0, 2.2, 4.0];
        let v: Vec<f64> = s.iter().map(|s| f(*s)).collect();
        let spline = QuadraticSpline::new(&s, &v).unwrap();

        for i in 0..=40 {
            let x = i as f64 * 0.1;
            assert!((spline.value(x) - f(x)).abs() < 1e-9);
            assert!((spline.derivative(x) - (x - 2.0)).abs() < 1e-9);
            assert!((spline.second_derivative(x) - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_two_and_three_knots() {
        let line = QuadraticSpline::new(&[0.0, 10.0], &[2.0, 7.0]).unwrap();
        assert_eq!(line.num_pieces(), 1);
        assert!((line.value(4.0) - 4.0).abs() < TOL);
        assert!((line.derivative(9.0) - 0.5).abs() < TOL);
        assert_eq!(line.second_derivative(1.0), 0.0);

        let para = QuadraticSpline::new(&[0.0, 1.0, 2.0], &[0.0, 1.0, 4.0]).unwrap();
        assert_eq!(para.num_pieces(), 1);
        assert!((para.value(1.5) - 2.25).abs() < TOL);
    }

    #[test]
    fn test_out_of_bounds() {
        let spline = QuadraticSpline::new(&[0.0, 10.0], &[0.0, 10.0]).unwrap();

        assert_eq!(spline.eval(12.0, OutOfBounds::Clamp), Ok(10.0));
        assert_eq!(spline.eval(-1.0, OutOfBounds::Clamp), Ok(0.0));
        assert!((spline.eval(12.0, OutOfBounds::Extrapolate).unwrap() - 12.0).abs() < TOL);
        assert_eq!(
            spline.eval(12.0, OutOfBounds::Error),
            Err(DomainError {
                s_m: 12.0,
                min_m: 0.0,
                max_m: 10.0
            })
        );
        assert!(spline.eval(std::f64::NAN, OutOfBounds::Clamp).is_err());
        assert_eq!(spline.eval(10.0, OutOfBounds::Error), Ok(10.0));
        assert_eq!(spline.eval_derivative(11.0, OutOfBounds::Clamp), Ok(1.0));
    }

    #[test]
    fn test_invalid_knots() {
        assert_eq!(
            QuadraticSpline::new(&[0.0], &[0.0]).unwrap_err(),
            SplineError::TooFewKnots(1)
        );
        assert_eq!(
            QuadraticSpline::new(&[0.0, 1.0], &[0.0]).unwrap_err(),
            SplineError::LengthMismatch(2, 1)
        );
        assert_eq!(
            QuadraticSpline::new(&[0.0, 1.0, 1.0], &[0.0, 1.0, 2.0]).unwrap_err(),
            SplineError::NotIncreasing(2)
        );
    }
}

//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Vector2;
use num_traits::Float;
use thiserror::Error;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors from the linear system solvers.
#[derive(Debug, Error, PartialEq)]
pub enum SolveError {
    #[error("Band lengths don't match the system size {0}")]
    DimensionMismatch(usize),

    #[error("The system is singular (zero pivot in row {0})")]
    Singular(usize),
}

/// Errors from the bracketed root finder.
#[derive(Debug, Error, PartialEq)]
pub enum RootError {
    #[error("The interval does not bracket a root (f(a) = {fa}, f(b) = {fb})")]
    NotBracketed { fa: f64, fb: f64 },

    #[error("Root finding did not converge, best estimate {best}")]
    MaxIterations { best: f64 },
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Map a value from one range into another.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where
    T: Float,
{
    target_range.0
        + ((value - source_range.0) * (target_range.1 - target_range.0)
            / (source_range.1 - source_range.0))
}

pub fn clamp<T>(value: &T, min: &T, max: &T) -> T
where
    T: Float,
{
    let mut ret = *value;

    if ret > *max {
        ret = *max
    }
    if ret < *min {
        ret = *min
    }

    ret
}

/// Return `num` evenly spaced values over `[start, end]`.
///
/// The last value is exactly `end`. A single value gives `[start]`.
pub fn linspace(start: f64, end: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let last = (num - 1) as f64;
            let mut values: Vec<f64> = (0..num)
                .map(|i| lin_map((0.0, last), (start, end), i as f64))
                .collect();
            values[num - 1] = end;
            values
        }
    }
}

/// Return values `start, start + step, ...` strictly less than `end`.
///
/// `step` must be positive, otherwise an empty vector is returned.
pub fn arange(start: f64, end: f64, step: f64) -> Vec<f64> {
    if !(step > 0.0) || !(end > start) {
        return Vec::new();
    }

    let num = ((end - start) / step).ceil() as usize;

    (0..num)
        .map(|i| start + i as f64 * step)
        .filter(|v| *v < end)
        .collect()
}

/// The z component of the cross product of two vectors on the XY plane.
///
/// Positive when `b` points to the left of `a`.
pub fn cross2(a: &Vector2<f64>, b: &Vector2<f64>) -> f64 {
    a[0] * b[1] - a[1] * b[0]
}

/// Solve a tridiagonal linear system using Gaussian elimination with partial
/// pivoting.
///
/// - `sub` is the sub-diagonal, `sub[i]` being the element at `(i + 1, i)`.
/// - `diag` is the main diagonal.
/// - `sup` is the super-diagonal, `sup[i]` being the element at `(i, i + 1)`.
///
/// Row interchanges fill in a second super-diagonal, so the solve stays O(n)
/// without requiring the system to be diagonally dominant.
pub fn solve_tridiagonal(
    sub: &[f64],
    diag: &[f64],
    sup: &[f64],
    rhs: &[f64],
) -> Result<Vec<f64>, SolveError> {
    let n = diag.len();

    if n == 0 {
        return Ok(Vec::new());
    }
    if sub.len() != n - 1 || sup.len() != n - 1 || rhs.len() != n {
        return Err(SolveError::DimensionMismatch(n));
    }

    let mut d = diag.to_vec();
    let mut dl = sub.to_vec();
    let mut du = sup.to_vec();
    let mut du2 = vec![0f64; n.saturating_sub(2)];
    let mut b = rhs.to_vec();

    // Forward elimination
    for i in 0..n - 1 {
        if d[i].abs() >= dl[i].abs() {
            if d[i] == 0.0 {
                return Err(SolveError::Singular(i));
            }

            let fact = dl[i] / d[i];
            d[i + 1] -= fact * du[i];
            b[i + 1] -= fact * b[i];
            dl[i] = 0.0;
        } else {
            // Swap rows i and i + 1, the old row i + 1 becomes the pivot row
            let fact = d[i] / dl[i];
            d[i] = dl[i];
            let tmp = d[i + 1];
            d[i + 1] = du[i] - fact * tmp;
            du[i] = tmp;
            if i + 2 < n {
                du2[i] = du[i + 1];
                du[i + 1] = -fact * du2[i];
            }
            let tmp = b[i];
            b[i] = b[i + 1];
            b[i + 1] = tmp - fact * b[i + 1];
        }
    }

    if d[n - 1] == 0.0 {
        return Err(SolveError::Singular(n - 1));
    }

    // Back substitution
    b[n - 1] /= d[n - 1];
    if n > 1 {
        b[n - 2] = (b[n - 2] - du[n - 2] * b[n - 1]) / d[n - 2];
    }
    for i in (0..n.saturating_sub(2)).rev() {
        b[i] = (b[i] - du[i] * b[i + 1] - du2[i] * b[i + 2]) / d[i];
    }

    Ok(b)
}

/// Find a root of `f` in `[a, b]` using Brent's method.
///
/// `f(a)` and `f(b)` must have opposite signs (or one of them be zero). The
/// search stops once the bracket is narrower than
/// `xtol + 4 * EPSILON * |x|`, or after `max_iter` function evaluations.
pub fn brent<F>(mut f: F, a: f64, b: f64, xtol: f64, max_iter: usize) -> Result<f64, RootError>
where
    F: FnMut(f64) -> f64,
{
    let rtol = 4.0 * std::f64::EPSILON;

    let mut x_pre = a;
    let mut x_cur = b;
    let mut f_pre = f(x_pre);
    let mut f_cur = f(x_cur);

    if f_pre == 0.0 {
        return Ok(x_pre);
    }
    if f_cur == 0.0 {
        return Ok(x_cur);
    }
    if f_pre.signum() == f_cur.signum() || f_pre.is_nan() || f_cur.is_nan() {
        return Err(RootError::NotBracketed {
            fa: f_pre,
            fb: f_cur,
        });
    }

    // The "block" point is the other end of the current bracket
    let mut x_blk = 0f64;
    let mut f_blk = 0f64;
    let mut s_pre = 0f64;
    let mut s_cur = 0f64;

    for _ in 0..max_iter {
        if f_pre != 0.0 && f_cur != 0.0 && f_pre.signum() != f_cur.signum() {
            x_blk = x_pre;
            f_blk = f_pre;
            s_pre = x_cur - x_pre;
            s_cur = s_pre;
        }

        // Keep the best estimate in x_cur
        if f_blk.abs() < f_cur.abs() {
            x_pre = x_cur;
            x_cur = x_blk;
            x_blk = x_pre;

            f_pre = f_cur;
            f_cur = f_blk;
            f_blk = f_pre;
        }

        let delta = 0.5 * (xtol + rtol * x_cur.abs());
        let s_bis = 0.5 * (x_blk - x_cur);

        if f_cur == 0.0 || s_bis.abs() < delta {
            return Ok(x_cur);
        }

        if s_pre.abs() > delta && f_cur.abs() < f_pre.abs() {
            let s_try = if x_pre == x_blk {
                // Secant
                -f_cur * (x_cur - x_pre) / (f_cur - f_pre)
            } else {
                // Inverse quadratic
                let d_pre = (f_pre - f_cur) / (x_pre - x_cur);
                let d_blk = (f_blk - f_cur) / (x_blk - x_cur);
                -f_cur * (f_blk * d_blk - f_pre * d_pre) / (d_blk * d_pre * (f_blk - f_pre))
            };

            if 2.0 * s_try.abs() < s_pre.abs().min(3.0 * s_bis.abs() - delta) {
                s_pre = s_cur;
                s_cur = s_try;
            } else {
                // Interpolation stepped too far, bisect instead
                s_pre = s_bis;
                s_cur = s_bis;
            }
        } else {
            s_pre = s_bis;
            s_cur = s_bis;
        }

        x_pre = x_cur;
        f_pre = f_cur;

        if s_cur.abs() > delta {
            x_cur += s_cur;
        } else {
            x_cur += if s_bis > 0.0 { delta } else { -delta };
        }

        f_cur = f(x_cur);
    }

    Err(RootError::MaxIterations { best: x_cur })
}

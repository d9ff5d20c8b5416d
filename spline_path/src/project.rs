//! # Orthogonal projection
//!
//! Finds where a point lies along the path and how far off it is laterally.
//!
//! The projection of a point `p` is an arc length `s` at which the vector from
//! the path to `p` is perpendicular to the path's tangent, i.e. a root of
//!
//! ```text
//! f(s) = h(s) . (p - path(s))
//! ```
//!
//! where `h` is the unit tangent. A bracket around the seed arc length is grown
//! in steps of `ds_m` until `f` changes sign across it, then Brent's method
//! finds the root inside. This is a local search: on paths which double back
//! on themselves it finds the root nearest the seed, not necessarily the
//! closest point overall, so callers tracking a vehicle should seed each query
//! with the previous result.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{debug, trace, warn};
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::path::Path;
use util::maths::{self, RootError};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Tuning of the projection search.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectParams {
    /// Step by which each end of the search bracket is moved on every
    /// expansion. This is not the accuracy of the result.
    pub ds_m: f64,

    /// Distance the bracket may grow by before giving up, so at most
    /// `ceil(s_lim_m / ds_m)` expansions are made.
    pub s_lim_m: f64,

    /// Absolute tolerance on the projected arc length.
    pub xtol_m: f64,

    /// Iteration limit for the root finder.
    pub max_iter: usize,
}

/// Result of projecting a point onto the path.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    /// Arc length of the projected point, within `[0, length]`.
    pub s_m: f64,

    /// Signed lateral offset of the point from the path, positive to the left
    /// of the direction of travel.
    pub offset_m: f64,

    /// True if no perpendicular foot was found within the search limits and the
    /// nearer end of the search bracket was used instead.
    pub boundary_fallback: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for ProjectParams {
    fn default() -> Self {
        Self {
            ds_m: 1.0,
            s_lim_m: 20.0,
            xtol_m: 2e-12,
            max_iter: 100,
        }
    }
}

impl Path {
    /// Project `point` onto the path, starting the search at `s0_m`.
    ///
    /// A seed outside the path is clamped onto it. Too small a `ds_m` combined
    /// with too small a `s_lim_m` may miss the projection near the ends of the
    /// path, in which case the result is flagged as a boundary fallback.
    pub fn project(&self, point: &Vector2<f64>, s0_m: f64, params: &ProjectParams) -> Projection {
        let ds_m = params.ds_m;
        let length_m = self.length();

        let f = |s: f64| {
            let h = self.heading_in_domain(s);
            h.tangent.dot(&(point - self.p_in_domain(s)))
        };

        // A non-positive or non-finite step can't grow the bracket
        let max_expansions = if ds_m > 0.0 && ds_m.is_finite() {
            (params.s_lim_m / ds_m).ceil().max(0.0) as usize
        } else {
            0
        };

        let mut s_min = self.clamp_s(s0_m);
        let mut s_max = s_min;
        let mut f_min = f(s_min);
        let mut f_max = f_min;
        let mut expansions = 0usize;

        loop {
            // Exact roots on the bracket don't need a search
            if f_min == 0.0 {
                return self.projection_at(point, s_min, false);
            }
            if f_max == 0.0 {
                return self.projection_at(point, s_max, false);
            }

            if sign_change(f_min, f_max) {
                break;
            }

            if expansions >= max_expansions || (s_min <= 0.0 && s_max >= length_m) {
                return self.boundary_fallback(point, s_min, s_max);
            }

            s_min = (s_min - ds_m).max(0.0);
            s_max = (s_max + ds_m).min(length_m);
            f_min = f(s_min);
            f_max = f(s_max);
            expansions += 1;
        }

        let s_m = match maths::brent(f, s_min, s_max, params.xtol_m, params.max_iter) {
            Ok(s) => s,
            Err(RootError::MaxIterations { best }) => {
                warn!(
                    "Projection root finding hit the iteration limit ({}), using s = {:.6} m",
                    params.max_iter, best
                );
                best
            }
            Err(e) => {
                debug!("Projection root finding failed ({}), falling back", e);
                return self.boundary_fallback(point, s_min, s_max);
            }
        };

        let proj = self.projection_at(point, self.clamp_s(s_m), false);

        trace!(
            "Projected ({:.3}, {:.3}) from seed {:.3} m to s = {:.3} m, offset {:.3} m after {} \
             expansions",
            point[0],
            point[1],
            s0_m,
            proj.s_m,
            proj.offset_m,
            expansions
        );

        proj
    }

    /// Choose whichever end of the bracket is closer to the point.
    fn boundary_fallback(&self, point: &Vector2<f64>, s_min: f64, s_max: f64) -> Projection {
        let d_min = (point - self.p_in_domain(s_min)).norm_squared();
        let d_max = (point - self.p_in_domain(s_max)).norm_squared();

        let s_m = if d_min < d_max { s_min } else { s_max };

        debug!(
            "No projection of ({:.3}, {:.3}) found in [{:.3}, {:.3}] m, using the bracket end at \
             {:.3} m",
            point[0], point[1], s_min, s_max, s_m
        );

        self.projection_at(point, s_m, true)
    }

    fn projection_at(&self, point: &Vector2<f64>, s_m: f64, boundary_fallback: bool) -> Projection {
        let h = self.heading_in_domain(s_m);

        Projection {
            s_m,
            offset_m: maths::cross2(&h.tangent, &(point - self.p_in_domain(s_m))),
            boundary_fallback,
        }
    }
}

/// True if `a` and `b` are nonzero with opposite signs.
fn sign_change(a: f64, b: f64) -> bool {
    (a < 0.0 && b > 0.0) || (a > 0.0 && b < 0.0)
}

//! Spline path parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// Internal
use crate::{project::ProjectParams, spline::OutOfBounds};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for building and querying paths
#[derive(Deserialize, Debug, Clone, Default)]
pub struct Params {
    /// Minimum arc length between knots. If not set every waypoint is kept.
    #[serde(default)]
    pub min_grid_m: Option<f64>,

    /// What position and heading queries do outside the path.
    ///
    /// One of `"clamp"`, `"extrapolate"` or `"error"`. Curvature is always
    /// clamped regardless of this setting.
    #[serde(default)]
    pub out_of_bounds: OutOfBounds,

    /// Projection search tuning
    #[serde(default)]
    pub project: ProjectParams,
}

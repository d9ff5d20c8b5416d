//! # Spline path library
//!
//! Smooth reference paths for trajectory control. A [`Path`] is built once from
//! a sequence of waypoints and then queried every control cycle for position,
//! heading and curvature at a given arc length, and for the projection of the
//! vehicle's position onto it.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Arc length indexing of raw waypoints
pub mod arc_length;

/// Constant curvature segment chains, used to generate test tracks
pub mod curv_seq;

/// Curvature and tangent frames
pub mod curvature;

/// Parameters loaded from `params/spline_path.toml`
pub mod params;

/// The path itself
pub mod path;

/// Lateral error along whole trajectories
pub mod path_error;

/// Orthogonal projection of points onto the path
pub mod project;

/// Evenly spaced sampling
pub mod sample;

/// Quadratic spline interpolation
pub mod spline;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use curv_seq::CurvSequence;
pub use curvature::Heading;
pub use params::Params;
pub use path::{Path, PathError};
pub use path_error::SeedTracker;
pub use project::{ProjectParams, Projection};
pub use sample::{SampleError, Sampling};
pub use spline::{DomainError, OutOfBounds};

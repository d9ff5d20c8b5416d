//! # Path sampling
//!
//! Evenly spaced points along the path, either a fixed number of them spread
//! over the whole length or one every fixed step of arc length.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Vector2;

use crate::path::Path;
use util::maths;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Largest number of samples a single request may produce.
pub const MAX_SAMPLES: usize = 10_000_000;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// How to sample a path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Sampling {
    /// This many points from the start to the end of the path, inclusive.
    Count(usize),

    /// A point every `step` meters from the start, stopping before the end.
    Step(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum SampleError {
    #[error("Either a sample count or a sample step must be given")]
    MissingArgument,

    #[error("Only one of a sample count or a sample step may be given")]
    ConflictingArguments,

    #[error("The sample count must be positive")]
    InvalidCount,

    #[error("The sample step must be positive and finite, found {0}")]
    InvalidStep(f64),

    #[error("Sampling would produce {0} points, more than the sample limit")]
    TooManySamples(usize),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Sampling {
    /// Build a sampling from a pair of optional arguments, exactly one of which
    /// must be given.
    pub fn from_args(count: Option<usize>, step_m: Option<f64>) -> Result<Self, SampleError> {
        match (count, step_m) {
            (Some(n), None) => Sampling::Count(n).validate(),
            (None, Some(step)) => Sampling::Step(step).validate(),
            (None, None) => Err(SampleError::MissingArgument),
            (Some(_), Some(_)) => Err(SampleError::ConflictingArguments),
        }
    }

    fn validate(self) -> Result<Self, SampleError> {
        match self {
            Sampling::Count(0) => Err(SampleError::InvalidCount),
            Sampling::Step(step) if !(step > 0.0) || !step.is_finite() => {
                Err(SampleError::InvalidStep(step))
            }
            _ => Ok(self),
        }
    }
}

impl Path {
    /// Arc lengths at which the path would be sampled.
    pub fn sample_s(&self, sampling: Sampling) -> Result<Vec<f64>, SampleError> {
        let sampling = sampling.validate()?;

        // Count before allocating, a tiny step would otherwise never finish
        let num = match sampling {
            Sampling::Count(n) => n,
            // Saturates for counts which don't fit
            Sampling::Step(step) => (self.length() / step).ceil() as usize,
        };
        if num > MAX_SAMPLES {
            return Err(SampleError::TooManySamples(num));
        }

        match sampling {
            Sampling::Count(n) => Ok(maths::linspace(0.0, self.length(), n)),
            Sampling::Step(step) => Ok(maths::arange(0.0, self.length(), step)),
        }
    }

    /// Points sampled along the path.
    pub fn sample(&self, sampling: Sampling) -> Result<Vec<Vector2<f64>>, SampleError> {
        Ok(self
            .sample_s(sampling)?
            .into_iter()
            .map(|s| self.p_in_domain(s))
            .collect())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn straight() -> Path {
        Path::new(&[Vector2::new(0.0, 0.0), Vector2::new(10.0, 0.0)], None).unwrap()
    }

    #[test]
    fn test_sample_count() {
        let path = straight();

        let points = path.sample(Sampling::Count(5)).unwrap();
        assert_eq!(points.len(), 5);
        for (i, p) in points.iter().enumerate() {
            assert!((p - Vector2::new(2.5 * i as f64, 0.0)).norm() < 1e-9);
        }

        assert_eq!(path.sample_s(Sampling::Count(1)).unwrap(), vec![0.0]);
    }

    #[test]
    fn test_sample_step() {
        let path = straight();

        let s = path.sample_s(Sampling::Step(3.0)).unwrap();
        assert_eq!(s, vec![0.0, 3.0, 6.0, 9.0]);

        // The end of the path is not included
        let s = path.sample_s(Sampling::Step(2.5)).unwrap();
        assert_eq!(s, vec![0.0, 2.5, 5.0, 7.5]);

        let points = path.sample(Sampling::Step(2.5)).unwrap();
        assert!((points[3] - Vector2::new(7.5, 0.0)).norm() < 1e-9);
    }

    #[test]
    fn test_sample_arguments() {
        assert_eq!(Sampling::from_args(Some(4), None), Ok(Sampling::Count(4)));
        assert_eq!(Sampling::from_args(None, Some(0.5)), Ok(Sampling::Step(0.5)));
        assert_eq!(
            Sampling::from_args(None, None),
            Err(SampleError::MissingArgument)
        );
        assert_eq!(
            Sampling::from_args(Some(4), Some(0.5)),
            Err(SampleError::ConflictingArguments)
        );
        assert_eq!(
            Sampling::from_args(Some(0), None),
            Err(SampleError::InvalidCount)
        );
        assert_eq!(
            Sampling::from_args(None, Some(-1.0)),
            Err(SampleError::InvalidStep(-1.0))
        );

        // Invalid values are caught however the sampling was built
        let path = straight();
        assert_eq!(
            path.sample(Sampling::Step(0.0)),
            Err(SampleError::InvalidStep(0.0))
        );
        assert_eq!(path.sample(Sampling::Count(0)), Err(SampleError::InvalidCount));
    }

    #[test]
    fn test_too_many_samples() {
        let path = straight();

        // Positive steps are valid but must not allocate without bound
        assert_eq!(
            path.sample_s(Sampling::Step(1e-300)),
            Err(SampleError::TooManySamples(usize::MAX))
        );
        assert_eq!(
            path.sample(Sampling::Count(MAX_SAMPLES + 1)),
            Err(SampleError::TooManySamples(MAX_SAMPLES + 1))
        );

        // Fine steps well inside the limit still work
        assert_eq!(path.sample_s(Sampling::Step(1e-3)).unwrap().len(), 10_000);
    }
}

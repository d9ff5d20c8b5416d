//! General time utility functions
//!
//! Holds the process epoch used to timestamp log messages.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use chrono::{DateTime, Duration, Utc};
use conquer_once::OnceCell;

// ---------------------------------------------------------------------------
// STATICS
// ---------------------------------------------------------------------------

static EPOCH: OnceCell<DateTime<Utc>> = OnceCell::uninit();

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Number of nanoseconds in a second
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Set the epoch to the current time.
///
/// Only the first call has any effect, later calls keep the original epoch.
pub fn init_epoch() -> &'static DateTime<Utc> {
    // Err only means the epoch was already set, which is fine
    EPOCH.try_init_once(Utc::now).ok();
    get_epoch()
}

/// Return a reference to the epoch, initialising it if this is the first use.
pub fn get_epoch() -> &'static DateTime<Utc> {
    EPOCH.get_or_init(Utc::now)
}

/// Get the number of seconds elapsed since the epoch.
pub fn get_elapsed_seconds() -> f64 {
    let elapsed = Utc::now() - *get_epoch();
    duration_to_seconds(elapsed).unwrap_or(std::f64::NAN)
}

/// Convert a duration into a number of seconds, or `None` if overflow
pub fn duration_to_seconds(duration: Duration) -> Option<f64> {
    duration
        .num_nanoseconds()
        .map(|ns| ns as f64 / NANOS_PER_SECOND as f64)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_elapsed_is_monotonic() {
        let epoch = *init_epoch();

        // A second init must not move the epoch
        assert_eq!(*init_epoch(), epoch);

        let t0 = get_elapsed_seconds();
        let t1 = get_elapsed_seconds();
        assert!(t0 >= 0.0);
        assert!(t1 >= t0);
    }

    #[test]
    fn test_duration_to_seconds() {
        assert_eq!(
            duration_to_seconds(Duration::milliseconds(1500)),
            Some(1.5)
        );
    }
}

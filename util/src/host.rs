//! Host environment utility functions

use std::{env, path::PathBuf};

/// Environment variable pointing at the root of the software workspace.
pub const SW_ROOT_ENV_VAR: &str = "SPLINE_PATH_ROOT";

/// Get the root directory of the software workspace.
///
/// The root is read from the `SPLINE_PATH_ROOT` environment variable.
pub fn get_sw_root() -> Result<PathBuf, env::VarError> {
    env::var(SW_ROOT_ENV_VAR).map(PathBuf::from)
}

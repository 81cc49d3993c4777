//! Project-wide constants.

use std::path::PathBuf;

pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
pub const HOMEPAGE: &str = env!("CARGO_PKG_HOMEPAGE");

/// Interpreter service address used when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000";

/// Path of the interpret operation, relative to the endpoint.
pub const INTERPRET_PATH: &str = "/interpret";

/// Path that hands out the session cookie.
pub const SESSION_PATH: &str = "/";

/// Status text shown while a request is in flight.
pub const WORKING_STATUS: &str = "Loading...";

/// Extension required for script files.
pub const SCRIPT_EXTENSION: &str = "petl";

/// Config key holding the persisted endpoint.
pub const ENDPOINT_KEY: &str = "endpoint";

/// Default database path: `~/.petl/petl.db`.
/// Falls back to the current directory when there is no home directory.
pub fn default_db_path() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".petl"))
        .unwrap_or_else(|| PathBuf::from(".petl"))
        .join("petl.db")
}

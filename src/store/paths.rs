// Local storage path utilities.
// Resolves platform directories for the agency database and the log file.

use std::path::PathBuf;

use directories::ProjectDirs;

/// Database file name, shared with earlier builds of the app.
pub const DATABASE_FILE: &str = "transport.db";

/// Log file name.
pub const LOG_FILE: &str = "kickstart.log";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "franklinharper", "kickstart")
}

/// Get the base data directory (~/.local/share/kickstart on Linux).
pub fn data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

/// Get the base cache directory (~/.cache/kickstart on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Default path to the agency database.
pub fn database_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join(DATABASE_FILE))
}

/// Default path to the log file.
pub fn log_path() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join(LOG_FILE))
}

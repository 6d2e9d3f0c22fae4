//! Error types for the launcher

use std::path::PathBuf;
use thiserror::Error;

/// Result type for launcher operations
pub type Result<T> = std::result::Result<T, LaunchError>;

/// Errors that can occur while preparing or starting a framework run
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Failed to read a launcher input file
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Configuration file exists but cannot be parsed
    #[error("Failed to parse {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// No libraries were registered, so there is nothing to run
    #[error("No libraries registered; the test framework needs at least one")]
    EmptyProject,

    /// A registered source file is missing on disk
    #[error("Source file does not exist: {0}")]
    MissingSource(PathBuf),

    /// The same file was registered twice in one library
    #[error("Source file {file} already registered in library '{library}'")]
    DuplicateSource { library: String, file: PathBuf },

    /// The framework runner executable could not be located
    #[error("Runner '{0}' not found on PATH; set `runner` in tbrun.toml or pass --runner")]
    RunnerNotFound(String),

    /// Failed to write the generated project file
    #[error("Failed to write project file {path}: {source}")]
    ProjectWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to spawn an external tool
    #[error("Failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
}

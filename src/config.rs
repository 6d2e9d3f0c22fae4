//! Launcher configuration
//!
//! An optional `tbrun.toml` next to the project supplies defaults for
//! the external tool commands and project paths, so day-to-day runs need
//! no flags at all:
//!
//! ```toml
//! runner = "vunit"
//! viewer = "gtkwave"
//! viewer-args = ["--saveonexit"]
//! sources = "sources.conf"
//! testbench-dir = "test_lib"
//! output-path = "tbrun_out"
//! ```
//!
//! Command-line flags win over the file; the file wins over built-in
//! defaults.

use crate::error::{LaunchError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default name of the config file, looked up in the working directory.
pub const CONFIG_FILE: &str = "tbrun.toml";

/// Contents of `tbrun.toml`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LauncherConfig {
    /// Test framework runner executable.
    pub runner: Option<String>,

    /// Waveform viewer executable.
    pub viewer: Option<String>,

    /// Extra arguments inserted before the save file in every viewer
    /// invocation.
    #[serde(default)]
    pub viewer_args: Vec<String>,

    /// Sources file path.
    pub sources: Option<PathBuf>,

    /// Directory searched for testbenches and save files.
    pub testbench_dir: Option<PathBuf>,

    /// Directory for generated files.
    pub output_path: Option<PathBuf>,
}

impl LauncherConfig {
    /// Read and parse a config file from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| LaunchError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&contents).map_err(|e| LaunchError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Parse config file contents.
    pub fn parse(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Load the effective config file.
    ///
    /// An explicitly given path must exist and parse. Without one, the
    /// default file is used when present, and pure defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::load_in(explicit, Path::new("."))
    }

    /// [`load`](Self::load), with the default file looked up under `dir`
    /// instead of the working directory.
    pub fn load_in(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_path(path),
            None => {
                let default = dir.join(CONFIG_FILE);
                if default.exists() {
                    Self::from_path(&default)
                } else {
                    debug!("no {} present, using built-in defaults", CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }
}

/// Effective launcher settings after merging the command line, the
/// optional config file, and built-in defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Runner executable; `None` means probe the default on PATH.
    pub runner: Option<String>,
    pub viewer: String,
    pub viewer_args: Vec<String>,
    /// Sources file; `None` means the default file when present,
    /// otherwise layout discovery.
    pub sources: Option<PathBuf>,
    pub testbench_dir: PathBuf,
    pub output_path: PathBuf,
}

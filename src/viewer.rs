//! Waveform viewer invocation
//!
//! After a fully passing run the launcher opens each collected save file
//! in the waveform viewer. The viewer is cosmetic: a missing or failing
//! viewer is reported and skipped, the test results already stand.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// Default viewer executable, expected on PATH.
pub const DEFAULT_VIEWER: &str = "gtkwave";

/// How to start the waveform viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerOptions {
    /// Viewer executable.
    pub command: String,
    /// Extra arguments inserted before the save file.
    pub extra_args: Vec<String>,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        ViewerOptions {
            command: DEFAULT_VIEWER.to_string(),
            extra_args: Vec::new(),
        }
    }
}

/// Argument vector for one save file, kept separate from the spawn so
/// the invocation shape stays testable.
pub fn viewer_args(opts: &ViewerOptions, save: &Path) -> Vec<String> {
    let mut args = opts.extra_args.clone();
    args.push(save.to_string_lossy().to_string());
    args
}

/// Open each save file in the viewer, one after the other.
///
/// Each invocation blocks until the viewer window is closed. The
/// viewer's own output is suppressed; only the launcher reports what is
/// being opened. If the viewer cannot be started at all the remaining
/// save files are skipped.
pub fn open_saved_waves(opts: &ViewerOptions, saves: &[PathBuf]) {
    if saves.is_empty() {
        return;
    }

    println!("\n==== Opening saved waveform views ====");
    for save in saves {
        let args = viewer_args(opts, save);
        println!("Running \"{} {}\".", opts.command, args.join(" "));
        debug!("spawning viewer {} {:?}", opts.command, args);

        let status = Command::new(&opts.command)
            .args(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        match status {
            Ok(status) => println!("{} finished with {}.", opts.command, status),
            Err(e) => {
                warn!("could not start viewer '{}': {}", opts.command, e);
                println!(
                    "Viewer '{}' could not be started, skipping the remaining save files.",
                    opts.command
                );
                break;
            }
        }
    }
}

//! Command-line interface
//!
//! The launcher keeps a deliberately small surface: a handful of its own
//! flags, then everything else is raw tokens handed to [`crate::translate`]
//! and ultimately to the framework runner. Framework-only flags are best
//! given after the first testbench fragment or after `--`.

use crate::config::{LauncherConfig, Settings};
use crate::runner::DEFAULT_OUTPUT_PATH;
use crate::translate::DEFAULT_TESTBENCH_DIR;
use crate::viewer::DEFAULT_VIEWER;
use clap::Parser;
use std::path::PathBuf;

/// Run HDL testbenches through the test framework, with wildcard
/// selection by name fragment and one-flag waveform viewing.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Show waveforms after the run: open saved viewer sessions when
    /// they exist, the framework GUI otherwise
    #[arg(short = 'g', long)]
    pub gui: bool,

    /// Ask the simulator to print delta-cycle timestamps
    #[arg(long = "dt")]
    pub display_time: bool,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Sources file (defaults to sources.conf when present)
    #[arg(long, value_name = "FILE")]
    pub sources: Option<PathBuf>,

    /// Directory searched for testbenches and save files
    #[arg(long, value_name = "DIR")]
    pub testbench_dir: Option<PathBuf>,

    /// Test framework runner executable
    #[arg(long, env = "TBRUN_RUNNER", value_name = "CMD")]
    pub runner: Option<String>,

    /// Waveform viewer executable
    #[arg(long, env = "TBRUN_VIEWER", value_name = "CMD")]
    pub viewer: Option<String>,

    /// Directory for generated files
    #[arg(long, value_name = "DIR")]
    pub output_path: Option<PathBuf>,

    /// Launcher configuration file (defaults to tbrun.toml when present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Testbench name fragments and framework arguments, passed through
    /// after translation
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
    pub args: Vec<String>,
}

impl Cli {
    /// Merge the command line over the config file over built-in
    /// defaults.
    pub fn settings(&self, file: LauncherConfig) -> Settings {
        Settings {
            runner: self.runner.clone().or(file.runner),
            viewer: self
                .viewer
                .clone()
                .or(file.viewer)
                .unwrap_or_else(|| DEFAULT_VIEWER.to_string()),
            viewer_args: file.viewer_args,
            sources: self.sources.clone().or(file.sources),
            testbench_dir: self
                .testbench_dir
                .clone()
                .or(file.testbench_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TESTBENCH_DIR)),
            output_path: self
                .output_path
                .clone()
                .or(file.output_path)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH)),
        }
    }
}

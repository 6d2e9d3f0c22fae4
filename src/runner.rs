//! External test framework invocation
//!
//! The launcher never compiles or simulates anything itself. It
//! accumulates the project registration (libraries, source files,
//! simulator options), materializes it into a project file under the
//! output path, and hands control to the framework's runner process
//! together with the translated argument vector. The runner owns test
//! discovery, execution and reporting from that point on.

use crate::error::{LaunchError, Result};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

/// Default runner executable, expected on PATH.
pub const DEFAULT_RUNNER: &str = "vunit";

/// Runner executables probed on PATH when none is configured.
const RUNNER_CANDIDATES: &[&str] = &["vunit", "vunit-runner"];

/// Default directory for generated files.
pub const DEFAULT_OUTPUT_PATH: &str = "tbrun_out";

/// Name of the generated project file inside the output path.
pub const PROJECT_FILE: &str = "project.lst";

/// How to start the test framework runner.
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerOptions {
    /// Runner executable; when unset the default is looked up on PATH.
    pub command: Option<String>,
    /// Directory for generated files. The project file lives here and
    /// the runner is told to keep its own artifacts here as well.
    pub output_path: PathBuf,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        RunnerOptions {
            command: None,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}

/// One named HDL library and the source files registered into it.
#[derive(Debug, Clone, PartialEq)]
pub struct Library {
    name: String,
    files: Vec<PathBuf>,
}

impl Library {
    fn new(name: &str) -> Self {
        Library {
            name: name.to_string(),
            files: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Register one source file.
    ///
    /// The file must exist on disk and must not already be registered in
    /// this library; a stale sources file should fail loudly here rather
    /// than deep inside the framework.
    pub fn add_source_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LaunchError::MissingSource(path.to_path_buf()));
        }
        if self.files.iter().any(|f| f == path) {
            return Err(LaunchError::DuplicateSource {
                library: self.name.clone(),
                file: path.to_path_buf(),
            });
        }
        debug!("library {}: adding {}", self.name, path.display());
        self.files.push(path.to_path_buf());
        Ok(())
    }
}

/// Accumulated project registration plus the argument vector to pass on.
#[derive(Debug, Clone)]
pub struct Runner {
    argv: Vec<String>,
    options: RunnerOptions,
    libraries: IndexMap<String, Library>,
    sim_options: IndexMap<String, Vec<String>>,
    location_preprocessing: bool,
}

impl Runner {
    /// Build a runner around an already translated argument vector.
    pub fn from_argv(argv: Vec<String>, options: RunnerOptions) -> Self {
        Runner {
            argv,
            options,
            libraries: IndexMap::new(),
            sim_options: IndexMap::new(),
            location_preprocessing: false,
        }
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    pub fn libraries(&self) -> impl Iterator<Item = &Library> {
        self.libraries.values()
    }

    /// Get or create the library with the given name.
    pub fn add_library(&mut self, name: &str) -> &mut Library {
        self.libraries
            .entry(name.to_string())
            .or_insert_with(|| Library::new(name))
    }

    /// Ask the framework to preprocess sources with file/line location
    /// information, so check failures report where they happened.
    pub fn enable_location_preprocessing(&mut self) {
        self.location_preprocessing = true;
    }

    /// Set a simulator option, replacing any previous value for the key.
    pub fn set_sim_option(&mut self, key: &str, values: &[&str]) {
        self.sim_options.insert(
            key.to_string(),
            values.iter().map(|v| v.to_string()).collect(),
        );
    }

    /// Lines of the generated project file, in registration order.
    ///
    /// The format is line oriented: `preprocess location`, one
    /// `option <key> <values..>` per simulator option, then one
    /// `library <name> <path>` per registered file.
    pub fn project_lines(&self) -> Vec<String> {
        let mut lines =
            vec!["# Generated by tbrun; consumed by the test framework runner.".to_string()];
        if self.location_preprocessing {
            lines.push("preprocess location".to_string());
        }
        for (key, values) in &self.sim_options {
            lines.push(format!("option {} {}", key, values.join(" ")));
        }
        for library in self.libraries.values() {
            for file in &library.files {
                lines.push(format!("library {} {}", library.name, file.display()));
            }
        }
        lines
    }

    /// Write the project file into the output path and return its path.
    pub fn write_project_file(&self) -> Result<PathBuf> {
        let dir = &self.options.output_path;
        std::fs::create_dir_all(dir).map_err(|e| LaunchError::ProjectWrite {
            path: dir.clone(),
            source: e,
        })?;
        let path = dir.join(PROJECT_FILE);
        let mut contents = self.project_lines().join("\n");
        contents.push('\n');
        std::fs::write(&path, contents).map_err(|e| LaunchError::ProjectWrite {
            path: path.clone(),
            source: e,
        })?;
        debug!("wrote project file {}", path.display());
        Ok(path)
    }

    /// Full argument vector for the runner process.
    pub fn invocation_args(&self, project: &Path) -> Vec<String> {
        let mut args = vec!["--project".to_string(), project.to_string_lossy().to_string()];
        args.extend(self.argv.iter().cloned());
        args
    }

    /// Executable to spawn: the configured command, or the first
    /// candidate found on PATH.
    fn resolve_command(&self) -> Result<String> {
        if let Some(command) = &self.options.command {
            return Ok(command.clone());
        }
        for candidate in RUNNER_CANDIDATES {
            if let Ok(output) = Command::new("which").arg(candidate).output() {
                if output.status.success() {
                    debug!("found runner '{}' on PATH", candidate);
                    return Ok(candidate.to_string());
                }
            }
        }
        Err(LaunchError::RunnerNotFound(DEFAULT_RUNNER.to_string()))
    }

    /// Hand control to the test framework.
    ///
    /// Blocks until the runner exits, with its output going straight to
    /// the terminal. `post_run` is invoked only after a fully passing
    /// run. Returns the runner's exit code so the launcher can exit with
    /// the same one.
    pub fn run<F: FnOnce()>(self, post_run: F) -> Result<i32> {
        if self.libraries.is_empty() {
            return Err(LaunchError::EmptyProject);
        }

        let project = self.write_project_file()?;
        let program = self.resolve_command()?;
        let args = self.invocation_args(&project);
        info!("executing {} {}", program, args.join(" "));

        let status = Command::new(&program)
            .args(&args)
            .status()
            .map_err(|e| LaunchError::Spawn {
                program: program.clone(),
                source: e,
            })?;

        if status.success() {
            post_run();
            return Ok(0);
        }
        let code = status.code().unwrap_or_else(|| {
            warn!("runner terminated by a signal");
            1
        });
        Ok(code)
    }
}

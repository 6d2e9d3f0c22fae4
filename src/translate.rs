//! Argument translation for the test framework
//!
//! The launcher accepts testbench name fragments mixed with ordinary
//! framework arguments. A fragment that matches a testbench file on disk
//! becomes the wildcard filter pattern `*<fragment>*`, which makes the
//! framework run every test case of that testbench; anything else is
//! passed through untouched. The same fragments select precomputed
//! GTKWave save files when a GUI run was requested.

use std::path::{Path, PathBuf};
use tracing::debug;

/// Tokens the launcher consumes itself; never forwarded to the framework.
const LAUNCHER_TOKENS: &[&str] = &["-g", "--gui", "--dt"];

/// Waveform format the framework is always asked to produce, so saved
/// views stay usable even for runs started without the GUI.
pub const WAVE_FORMAT: &str = "ghw";

const HDL_EXTENSION: &str = "vhd";
const SAVE_EXTENSION: &str = "gtkw";

/// Default directory searched for testbenches and save files.
pub const DEFAULT_TESTBENCH_DIR: &str = "test_lib";

/// How to interpret the raw token list.
#[derive(Debug, Clone)]
pub struct TranslateOptions {
    /// Directory holding the testbench sources and save files.
    pub testbench_dir: PathBuf,
    /// GUI already requested via a parsed launcher flag.
    pub force_gui: bool,
    /// Delta-cycle timestamps already requested via a parsed flag.
    pub force_display_time: bool,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        TranslateOptions {
            testbench_dir: PathBuf::from(DEFAULT_TESTBENCH_DIR),
            force_gui: false,
            force_display_time: false,
        }
    }
}

/// Outcome of translating the raw tokens.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Translation {
    /// Argument vector to hand to the framework runner.
    pub argv: Vec<String>,
    /// Save files to open in the waveform viewer after a passing run.
    pub saves: Vec<PathBuf>,
    /// A GUI was requested.
    pub gui: bool,
    /// Delta-cycle timestamps were requested (`ghdl.sim_flags`).
    pub display_time: bool,
}

/// Translate raw CLI tokens into framework invocation arguments.
///
/// Token handling, in order:
/// - a token matching `<testbench_dir>/*<token>*.vhd` becomes the filter
///   pattern `*<token>*` (the file-match check wins over everything,
///   including flag-shaped tokens); an empty token matches every
///   testbench and its pattern degenerates to the run-everything `**`,
/// - the launcher's own tokens (`-g`, `--gui`, `--dt`) are dropped,
/// - every other token is forwarded verbatim.
///
/// When a GUI is requested, every token is also probed for
/// `<testbench_dir>/*<token>*.gtkw` save files; if none exist at all,
/// `-g` is forwarded so the framework opens its own viewer instead.
/// `--gtkwave-fmt ghw` is always appended.
pub fn translate(tokens: &[String], opts: &TranslateOptions) -> Translation {
    let gui = opts.force_gui || tokens.iter().any(|t| t == "-g" || t == "--gui");
    let display_time = opts.force_display_time || tokens.iter().any(|t| t == "--dt");

    let mut translation = Translation {
        gui,
        display_time,
        ..Default::default()
    };

    for token in tokens {
        let testbenches = probe(&opts.testbench_dir, token, HDL_EXTENSION);
        if testbenches.is_empty() {
            if !LAUNCHER_TOKENS.contains(&token.as_str()) {
                translation.argv.push(token.clone());
            }
        } else {
            debug!("'{}' matches {} testbench file(s)", token, testbenches.len());
            translation.argv.push(format!("*{}*", token));
        }

        if gui {
            for save in probe(&opts.testbench_dir, token, SAVE_EXTENSION) {
                if !translation.saves.contains(&save) {
                    translation.saves.push(save);
                }
            }
        }
    }

    if gui && translation.saves.is_empty() {
        // No saved views; fall back to the framework's own GUI.
        translation.argv.push("-g".to_string());
    }

    translation.argv.push("--gtkwave-fmt".to_string());
    translation.argv.push(WAVE_FORMAT.to_string());

    translation
}

/// Files in `dir` matching `*<fragment>*.<ext>`.
///
/// The fragment is escaped, so glob metacharacters in a token match
/// literally instead of erroring out. An empty fragment matches every
/// file with the extension.
fn probe(dir: &Path, fragment: &str, ext: &str) -> Vec<PathBuf> {
    let dir = glob::Pattern::escape(&dir.to_string_lossy());
    let pattern = if fragment.is_empty() {
        format!("{}/*.{}", dir, ext)
    } else {
        format!("{}/*{}*.{}", dir, glob::Pattern::escape(fragment), ext)
    };
    match glob::glob(&pattern) {
        Ok(paths) => paths.filter_map(|p| p.ok()).collect(),
        Err(_) => Vec::new(),
    }
}

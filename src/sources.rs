//! Library manifest: which source files belong to which HDL library
//!
//! The launcher registers a static project structure with the external
//! test framework. The mapping normally comes from a flat `sources.conf`
//! file with one `<library> <file>` pair per line; when no such file is
//! present, the conventional `src_lib`/`test_lib` directory layout is
//! picked up instead.

use crate::error::{LaunchError, Result};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default name of the sources file, looked up in the working directory.
pub const SOURCES_FILE: &str = "sources.conf";

/// Library directories probed by [`SourceManifest::discover`] when no
/// sources file is in play.
pub const DEFAULT_LIBRARY_DIRS: &[&str] = &["src_lib", "test_lib"];

const HDL_EXTENSION: &str = "vhd";

/// Insertion-ordered mapping of library name to source file paths.
///
/// Libraries keep first-mention order and each library keeps its files in
/// first-mention order, so the framework sees the project exactly as the
/// sources file states it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceManifest {
    libraries: IndexMap<String, Vec<PathBuf>>,
}

impl SourceManifest {
    /// Parse a sources file from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| LaunchError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self::parse(&contents))
    }

    /// Parse the flat sources format.
    ///
    /// Everything after a `#` is a comment. A data line is
    /// `<library> <file>`, where the file is registered as
    /// `<library>/<file>` (sources live in a directory named after their
    /// library). Lines with fewer than two tokens are skipped, extra
    /// tokens are ignored, and a file mentioned twice for the same
    /// library is only registered once.
    pub fn parse(contents: &str) -> Self {
        let mut manifest = Self::default();
        for line in contents.lines() {
            let line = match line.split_once('#') {
                Some((data, _comment)) => data,
                None => line,
            }
            .trim();
            if line.is_empty() {
                continue;
            }

            let mut tokens = line.split_whitespace();
            if let (Some(library), Some(file)) = (tokens.next(), tokens.next()) {
                manifest.insert(library, Path::new(library).join(file));
            }
        }
        manifest
    }

    /// Build a manifest from the conventional directory layout.
    ///
    /// Each of the default library directories that exists under `root`
    /// becomes a library holding its HDL files, sorted by name so the
    /// registration order is stable.
    pub fn discover(root: &Path) -> Self {
        let mut manifest = Self::default();
        for dir in DEFAULT_LIBRARY_DIRS {
            let dir_path = root.join(dir);
            if !dir_path.is_dir() {
                debug!("library directory {} not present, skipping", dir_path.display());
                continue;
            }
            let mut files = hdl_files(&dir_path);
            files.sort();
            for file in files {
                manifest.insert(dir, file);
            }
        }
        manifest
    }

    /// Register a file in a library, creating the library on first use.
    /// Re-registering the same path is a no-op.
    pub fn insert(&mut self, library: &str, file: PathBuf) {
        let files = self.libraries.entry(library.to_string()).or_default();
        if !files.contains(&file) {
            files.push(file);
        }
    }

    /// Iterate libraries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PathBuf])> {
        self.libraries
            .iter()
            .map(|(name, files)| (name.as_str(), files.as_slice()))
    }

    /// Files registered for a library, if it exists.
    pub fn files(&self, library: &str) -> Option<&[PathBuf]> {
        self.libraries.get(library).map(|files| files.as_slice())
    }

    /// Number of libraries.
    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }

    /// Total number of registered files across all libraries.
    pub fn file_count(&self) -> usize {
        self.libraries.values().map(Vec::len).sum()
    }
}

/// Non-recursive listing of the HDL files in a directory.
fn hdl_files(dir: &Path) -> Vec<PathBuf> {
    let pattern = format!(
        "{}/*.{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        HDL_EXTENSION
    );
    match glob::glob(&pattern) {
        Ok(paths) => paths.filter_map(|p| p.ok()).collect(),
        Err(_) => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_parse() {
        let manifest = SourceManifest::parse(
            "src_lib uart.vhd\n\
             src_lib fifo.vhd\n\
             test_lib tb_uart.vhd\n",
        );

        assert_eq!(manifest.len(), 2);
        assert_eq!(
            manifest.files("src_lib").unwrap(),
            &[
                PathBuf::from("src_lib/uart.vhd"),
                PathBuf::from("src_lib/fifo.vhd")
            ]
        );
        assert_eq!(
            manifest.files("test_lib").unwrap(),
            &[PathBuf::from("test_lib/tb_uart.vhd")]
        );
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let manifest = SourceManifest::parse(
            "# project sources\n\
             \n\
             src_lib uart.vhd # the DUT\n\
                \n\
             # test_lib tb_old.vhd\n\
             test_lib tb_uart.vhd\n",
        );

        assert_eq!(manifest.file_count(), 2);
        assert!(manifest.files("test_lib").unwrap()[0].ends_with("tb_uart.vhd"));
    }

    #[test]
    fn test_duplicate_files_suppressed() {
        let manifest = SourceManifest::parse(
            "src_lib uart.vhd\n\
             src_lib uart.vhd\n\
             src_lib fifo.vhd\n\
             src_lib uart.vhd\n",
        );

        assert_eq!(
            manifest.files("src_lib").unwrap(),
            &[
                PathBuf::from("src_lib/uart.vhd"),
                PathBuf::from("src_lib/fifo.vhd")
            ]
        );
    }

    #[test]
    fn test_short_lines_ignored() {
        let manifest = SourceManifest::parse("src_lib\nlonely\n\nsrc_lib uart.vhd\n");

        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest.file_count(), 1);
    }

    #[test]
    fn test_extra_tokens_ignored() {
        let manifest = SourceManifest::parse("src_lib uart.vhd vhdl-2008 whatever\n");

        assert_eq!(
            manifest.files("src_lib").unwrap(),
            &[PathBuf::from("src_lib/uart.vhd")]
        );
    }

    #[test]
    fn test_library_order_is_first_mention() {
        let manifest = SourceManifest::parse(
            "zeta z.vhd\n\
             alpha a.vhd\n\
             zeta z2.vhd\n",
        );

        let order: Vec<&str> = manifest.iter().map(|(name, _)| name).collect();
        assert_eq!(order, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_comment_only_file_is_empty() {
        let manifest = SourceManifest::parse("# nothing here\n# at all\n");
        assert!(manifest.is_empty());
    }

    #[test]
    fn test_discover_conventional_layout() {
        let temp = tempfile::TempDir::new().unwrap();
        let src = temp.path().join("src_lib");
        let test = temp.path().join("test_lib");
        std::fs::create_dir_all(&src).unwrap();
        std::fs::create_dir_all(&test).unwrap();
        std::fs::write(src.join("uart.vhd"), "").unwrap();
        std::fs::write(src.join("fifo.vhd"), "").unwrap();
        std::fs::write(src.join("notes.txt"), "").unwrap();
        std::fs::write(test.join("tb_uart.vhd"), "").unwrap();

        let manifest = SourceManifest::discover(temp.path());

        assert_eq!(manifest.len(), 2);
        // Sorted within a library, .txt not picked up
        assert_eq!(
            manifest.files("src_lib").unwrap(),
            &[src.join("fifo.vhd"), src.join("uart.vhd")]
        );
        assert_eq!(manifest.files("test_lib").unwrap(), &[test.join("tb_uart.vhd")]);
    }

    #[test]
    fn test_discover_missing_dirs() {
        let temp = tempfile::TempDir::new().unwrap();
        let manifest = SourceManifest::discover(temp.path());
        assert!(manifest.is_empty());
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = SourceManifest::from_path("/nonexistent/sources.conf").unwrap_err();
        assert!(matches!(err, LaunchError::Read { .. }));
    }
}

//! Path normalization utilities
//!
//! Match paths are emitted relative to their repository root with '/' as separator.

use std::path::Path;

/// Normalize a path to use '/' as separator (for cross-platform consistency)
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Make a path relative to the root directory
pub fn make_relative(path: &Path, root: &Path) -> Option<String> {
    path.strip_prefix(root).ok().map(normalize_path)
}

/// Relative form of an rg-reported path, or the path unchanged if it is not under root
pub fn relative_or_raw(path: &str, root: &Path) -> String {
    make_relative(Path::new(path), root).unwrap_or_else(|| path.to_string())
}

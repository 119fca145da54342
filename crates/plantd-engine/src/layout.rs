//! Resolved GraphViz layout tool location.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Resolved location of the GraphViz `dot` executable.
///
/// Carries both the full executable path and its parent bin directory:
/// the engine reads the former from `GRAPHVIZ_DOT`, while some engine
/// builds resolve helper tools relative to the latter via `PATH`.
///
/// Built once at startup by the locator and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutTool {
    dot_path: PathBuf,
    bin_dir: PathBuf,
}

impl LayoutTool {
    /// Wrap a resolved `dot` executable path.
    ///
    /// The bin directory is derived from the path's parent; a bare file
    /// name falls back to the current directory.
    #[must_use]
    pub fn new(dot_path: PathBuf) -> Self {
        let bin_dir = dot_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        Self { dot_path, bin_dir }
    }

    /// Full path to the `dot` executable.
    #[must_use]
    pub fn dot_path(&self) -> &Path {
        &self.dot_path
    }

    /// Directory containing the `dot` executable.
    #[must_use]
    pub fn bin_dir(&self) -> &Path {
        &self.bin_dir
    }

    /// `PATH` value for an engine child process: the bin directory
    /// prepended to the existing search path.
    #[must_use]
    pub(crate) fn child_path(&self, existing: Option<&OsString>) -> OsString {
        let mut entries = vec![self.bin_dir.clone()];
        if let Some(existing) = existing {
            entries.extend(std::env::split_paths(existing));
        }
        // join_paths only fails on entries containing the separator; fall
        // back to the bin directory alone rather than dropping the handoff.
        std::env::join_paths(entries)
            .unwrap_or_else(|_| self.bin_dir.clone().into_os_string())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use std::path::Path;

    use super::*;

    #[test]
    fn bin_dir_is_parent_of_dot_path() {
        let tool = LayoutTool::new(PathBuf::from("/usr/local/bin/dot"));
        assert_eq!(tool.dot_path(), Path::new("/usr/local/bin/dot"));
        assert_eq!(tool.bin_dir(), Path::new("/usr/local/bin"));
    }

    #[test]
    fn bare_file_name_falls_back_to_current_dir() {
        let tool = LayoutTool::new(PathBuf::from("dot"));
        assert_eq!(tool.bin_dir(), Path::new("."));
    }

    #[test]
    fn child_path_prepends_bin_dir() {
        let tool = LayoutTool::new(PathBuf::from("/opt/graphviz/bin/dot"));
        let joined = tool.child_path(Some(&OsString::from("/usr/bin")));
        let entries: Vec<_> = std::env::split_paths(&joined).collect();
        assert_eq!(entries[0], Path::new("/opt/graphviz/bin"));
        assert!(entries.contains(&PathBuf::from("/usr/bin")));
    }

    #[test]
    fn child_path_without_existing_is_bin_dir() {
        let tool = LayoutTool::new(PathBuf::from("/opt/graphviz/bin/dot"));
        let joined = tool.child_path(None);
        let entries: Vec<_> = std::env::split_paths(&joined).collect();
        assert_eq!(entries, vec![PathBuf::from("/opt/graphviz/bin")]);
    }
}

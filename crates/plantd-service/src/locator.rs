//! GraphViz layout tool discovery.
//!
//! Probes an ordered list of candidate paths for the `dot` executable: the
//! explicitly configured path first, then conventional locations for the
//! host platform. The first existing candidate wins. Absence is not an
//! error — diagrams that do not need automatic layout keep working.

use std::path::{Path, PathBuf};

use plantd_engine::LayoutTool;

/// Conventional `dot` locations probed after the configured path.
#[cfg(unix)]
const DEFAULT_CANDIDATES: &[&str] = &[
    "./graphviz/bin/dot",
    "../graphviz/bin/dot",
    "graphviz/bin/dot",
    "/usr/bin/dot",
    "/usr/local/bin/dot",
    "/opt/homebrew/bin/dot",
];

/// Conventional `dot` locations probed after the configured path.
#[cfg(windows)]
const DEFAULT_CANDIDATES: &[&str] = &[
    ".\\graphviz\\bin\\dot.exe",
    "..\\graphviz\\bin\\dot.exe",
    "graphviz\\bin\\dot.exe",
    "C:\\graphviz\\bin\\dot.exe",
    "C:\\Program Files\\Graphviz\\bin\\dot.exe",
];

/// Locate the GraphViz `dot` executable.
///
/// The configured path, when present and non-blank, is probed before the
/// built-in candidate list. Returns `None` when no candidate exists on
/// disk; callers treat that as "layout tool absent", not as an error.
#[must_use]
pub fn locate(configured: Option<&Path>) -> Option<LayoutTool> {
    let defaults: Vec<PathBuf> = DEFAULT_CANDIDATES.iter().map(PathBuf::from).collect();
    locate_among(configured, &defaults)
}

/// Probe the configured path and the given default candidates in order.
fn locate_among(configured: Option<&Path>, defaults: &[PathBuf]) -> Option<LayoutTool> {
    let configured = configured
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf);

    for candidate in configured.iter().chain(defaults) {
        if candidate.as_os_str().is_empty() {
            continue;
        }
        if !candidate.exists() {
            tracing::debug!(path = %candidate.display(), "layout tool candidate does not exist");
            continue;
        }
        if !is_executable(candidate) {
            // Published anyway: the engine reports the real failure if the
            // file truly cannot run.
            tracing::warn!(
                path = %candidate.display(),
                "graphviz dot found but may not be executable"
            );
        }

        let tool = LayoutTool::new(candidate.clone());
        tracing::info!(
            path = %tool.dot_path().display(),
            bin_dir = %tool.bin_dir().display(),
            "graphviz configured"
        );
        return Some(tool);
    }

    tracing::warn!("graphviz not found; diagrams requiring automatic layout will fail to render");
    tracing::info!(
        "install graphviz (https://graphviz.org/download/) or set graphviz.dot_path in plantd.toml"
    );
    None
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path).is_ok_and(|meta| meta.permissions().mode() & 0o111 != 0)
}

#[cfg(windows)]
fn is_executable(_path: &Path) -> bool {
    true
}

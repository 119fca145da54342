//! Single-shot engine invocation.

use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::error::EngineError;
use crate::layout::LayoutTool;

/// Output format for a rendered diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// SVG text output.
    Svg,
    /// PNG binary output.
    Png,
}

impl OutputFormat {
    /// Engine command-line flag selecting this format.
    #[must_use]
    pub(crate) fn flag(self) -> &'static str {
        match self {
            Self::Svg => "-tsvg",
            Self::Png => "-tpng",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Svg => f.write_str("SVG"),
            Self::Png => f.write_str("PNG"),
        }
    }
}

/// Output of one engine invocation.
#[derive(Debug, Clone)]
pub struct Rendered {
    /// Image bytes: SVG text or PNG binary, depending on the format.
    pub bytes: Vec<u8>,
    /// Engine-reported description, when the engine emitted one.
    pub description: Option<String>,
}

/// Adapter around the external PlantUML executable.
///
/// Stateless beyond the command configuration; each [`render`](Self::render)
/// call spawns a fresh engine process and is safe to run concurrently with
/// other calls.
#[derive(Debug, Clone)]
pub struct Engine {
    command: PathBuf,
}

impl Engine {
    /// Create an adapter invoking the given engine command.
    #[must_use]
    pub fn new(command: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// The configured engine command.
    #[must_use]
    pub fn command(&self) -> &PathBuf {
        &self.command
    }

    /// Render diagram source into image bytes.
    ///
    /// Runs `<command> -pipe -t<format> -charset UTF-8` with the source on
    /// stdin. When a layout tool is supplied, the child process receives
    /// `GRAPHVIZ_DOT` and a `PATH` with the tool's bin directory prepended.
    ///
    /// A non-zero exit status becomes [`EngineError::Failed`] carrying the
    /// engine's stderr output. On success, non-empty stderr is kept as the
    /// engine's description of the diagram.
    pub fn render(
        &self,
        source: &str,
        format: OutputFormat,
        layout: Option<&LayoutTool>,
    ) -> Result<Rendered, EngineError> {
        let mut cmd = Command::new(&self.command);
        cmd.arg("-pipe")
            .arg(format.flag())
            .args(["-charset", "UTF-8"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(tool) = layout {
            cmd.env("GRAPHVIZ_DOT", tool.dot_path());
            cmd.env("PATH", tool.child_path(std::env::var_os("PATH").as_ref()));
        }

        tracing::debug!(
            command = %self.command.display(),
            format = %format,
            source_len = source.len(),
            "invoking engine"
        );

        let mut child = cmd.spawn().map_err(|source| EngineError::Spawn {
            command: self.command.display().to_string(),
            source,
        })?;

        let payload = source.as_bytes().to_vec();
        let mut stdin = child.stdin.take();
        let writer = std::thread::spawn(move || {
            if let Some(stdin) = stdin.as_mut() {
                // The engine may exit before draining stdin; its exit
                // status carries the real outcome then.
                let _ = stdin.write_all(&payload);
            }
        });

        let output = child.wait_with_output()?;
        let _ = writer.join();

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_owned();
        if !output.status.success() {
            return Err(EngineError::Failed {
                status: output.status,
                message: if stderr.is_empty() {
                    "engine reported no details".to_owned()
                } else {
                    stderr
                },
            });
        }

        Ok(Rendered {
            bytes: output.stdout,
            description: if stderr.is_empty() { None } else { Some(stderr) },
        })
    }

    /// Query the engine version string (`<command> -version`, first line).
    pub fn version(&self) -> Result<String, EngineError> {
        let output = Command::new(&self.command)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| EngineError::Spawn {
                command: self.command.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(EngineError::Failed {
                status: output.status,
                message: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.lines().next().unwrap_or_default().trim().to_owned())
    }
}

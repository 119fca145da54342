//! `plantd render` command implementation.

use std::io::{Read, Write};
use std::path::PathBuf;

use clap::{Args, ValueEnum};
use plantd_config::{CliSettings, Config};
use plantd_engine::Engine;
use plantd_service::{RenderService, locator};

use crate::error::CliError;
use crate::output::Output;

/// Output format for the render command.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Svg,
    Png,
}

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Diagram file to render, or '-' for stdin.
    input: PathBuf,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Svg)]
    format: Format,

    /// Output file (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover plantd.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Engine command to invoke (overrides config).
    #[arg(long)]
    engine: Option<String>,

    /// Path to the GraphViz dot executable (overrides config).
    #[arg(long, env = "GRAPHVIZ_DOT")]
    graphviz_dot: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, reading the input, or rendering
    /// fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: None,
            port: None,
            engine_command: self.engine,
            graphviz_dot: self.graphviz_dot,
        };
        let config = Config::load(self.config.as_deref(), &cli_settings)?;

        let source = if self.input.as_os_str() == "-" {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            text
        } else {
            std::fs::read_to_string(&self.input)?
        };

        let layout = locator::locate(config.graphviz_dot().as_deref());
        let service = RenderService::with_layout_tool(Engine::new(config.engine_command()), layout);

        let bytes = match self.format {
            Format::Svg => service.render_svg(&source)?.into_bytes(),
            Format::Png => service.render_png(&source)?,
        };

        match &self.output {
            Some(path) => {
                std::fs::write(path, &bytes)?;
                output.info(&format!("Wrote {} bytes to {}", bytes.len(), path.display()));
            }
            None => std::io::stdout().write_all(&bytes)?,
        }

        Ok(())
    }
}

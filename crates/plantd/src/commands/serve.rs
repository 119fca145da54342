//! `plantd serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use plantd_config::{CliSettings, Config};
use plantd_server::{ServerConfig, run_server};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover plantd.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Engine command to invoke (overrides config).
    #[arg(long)]
    engine: Option<String>,

    /// Path to the GraphViz dot executable (overrides config).
    #[arg(long, env = "GRAPHVIZ_DOT")]
    graphviz_dot: Option<String>,

    /// Enable verbose output (show render timing logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        // Build CLI settings from args
        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            engine_command: self.engine,
            graphviz_dot: self.graphviz_dot,
        };

        // Load config
        let config = Config::load(self.config.as_deref(), &cli_settings)?;

        // Print startup info
        output.info(&format!(
            "Starting server on {}:{}",
            config.server.host, config.server.port
        ));
        output.info(&format!("Engine command: {}", config.engine.command));

        if let Some(dot_path) = config.graphviz_dot() {
            output.info(&format!("GraphViz dot path: {}", dot_path.display()));
        } else {
            output.info("GraphViz dot path: auto-discover");
        }

        // Build server config and run
        let server_config = ServerConfig {
            host: config.server.host.clone(),
            port: config.server.port,
            engine_command: config.engine_command(),
            graphviz_dot: config.graphviz_dot(),
            version: version.to_owned(),
        };
        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}

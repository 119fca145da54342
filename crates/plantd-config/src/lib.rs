//! Configuration management for PlantD.
//!
//! Parses `plantd.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `engine.command`
//! - `graphviz.dot_path`

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "plantd.toml";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override engine command.
    pub engine_command: Option<String>,
    /// Override GraphViz dot executable path.
    pub graphviz_dot: Option<String>,
}

/// Application configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Engine configuration.
    pub engine: EngineConfig,
    /// GraphViz configuration.
    pub graphviz: GraphvizConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
        }
    }
}

/// Engine configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Engine command to invoke (name on `PATH` or full path).
    pub command: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            command: "plantuml".to_owned(),
        }
    }
}

/// GraphViz configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct GraphvizConfig {
    /// Explicit path to the `dot` executable. When absent, the layout tool
    /// locator falls back to its built-in candidate list.
    pub dot_path: Option<String>,
}

/// Configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Config file could not be parsed.
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// Path that was parsed.
        path: PathBuf,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// Environment variable expansion failed.
    #[error("failed to expand '{field}': {source}")]
    Expand {
        /// Config field being expanded.
        field: &'static str,
        /// Underlying lookup error.
        #[source]
        source: shellexpand::LookupError<std::env::VarError>,
    },
}

impl Config {
    /// Load configuration.
    ///
    /// Reads the explicit `config_path` when given, otherwise searches the
    /// current directory and its ancestors for `plantd.toml`. Falls back to
    /// defaults when no file is found. Environment variables in string
    /// values are expanded, then CLI settings are applied on top.
    pub fn load(config_path: Option<&Path>, settings: &CliSettings) -> Result<Self, ConfigError> {
        let path = match config_path {
            Some(path) => Some(path.to_path_buf()),
            None => std::env::current_dir().ok().and_then(|dir| discover(&dir)),
        };

        let mut config = match path {
            Some(path) => Self::load_file(&path)?,
            None => Self::default(),
        };

        config.expand()?;
        config.apply(settings);
        Ok(config)
    }

    /// Load and parse a specific config file.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Engine command as a path.
    #[must_use]
    pub fn engine_command(&self) -> PathBuf {
        PathBuf::from(&self.engine.command)
    }

    /// Configured GraphViz dot path, when set and non-empty.
    #[must_use]
    pub fn graphviz_dot(&self) -> Option<PathBuf> {
        self.graphviz
            .dot_path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
    }

    /// Expand environment variables in string fields.
    fn expand(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand_field(&self.server.host, "server.host")?;
        self.engine.command = expand_field(&self.engine.command, "engine.command")?;
        if let Some(dot_path) = &self.graphviz.dot_path {
            self.graphviz.dot_path = Some(expand_field(dot_path, "graphviz.dot_path")?);
        }
        Ok(())
    }

    /// Apply CLI overrides on top of loaded values.
    fn apply(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(command) = &settings.engine_command {
            self.engine.command.clone_from(command);
        }
        if let Some(dot) = &settings.graphviz_dot {
            self.graphviz.dot_path = Some(dot.clone());
        }
    }
}

/// Expand environment variables in one field value.
fn expand_field(value: &str, field: &'static str) -> Result<String, ConfigError> {
    shellexpand::env(value)
        .map(|expanded| expanded.into_owned())
        .map_err(|source| ConfigError::Expand { field, source })
}

/// Search `start` and its ancestors for a `plantd.toml` file.
#[must_use]
pub fn discover(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILENAME))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.engine.command, "plantuml");
        assert_eq!(config.graphviz_dot(), None);
    }

    #[test]
    fn parses_full_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            r#"
[server]
host = "0.0.0.0"
port = 9090

[engine]
command = "/opt/plantuml/plantuml"

[graphviz]
dot_path = "/usr/bin/dot"
"#,
        )
        .unwrap();

        let config = Config::load_file(&path).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.engine_command(), PathBuf::from("/opt/plantuml/plantuml"));
        assert_eq!(config.graphviz_dot(), Some(PathBuf::from("/usr/bin/dot")));
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn missing_sections_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[server]\nport = 7000\n").unwrap();

        let config = Config::load_file(&path).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7000);
        assert_eq!(config.engine.command, "plantuml");
    }

    #[test]
    fn cli_settings_override_file_values() {
        let mut config = Config::default();
        config.apply(&CliSettings {
            host: Some("::1".to_owned()),
            port: Some(8888),
            engine_command: Some("plantuml-beta".to_owned()),
            graphviz_dot: Some("/opt/dot".to_owned()),
        });

        assert_eq!(config.server.host, "::1");
        assert_eq!(config.server.port, 8888);
        assert_eq!(config.engine.command, "plantuml-beta");
        assert_eq!(config.graphviz_dot(), Some(PathBuf::from("/opt/dot")));
    }

    #[test]
    fn expands_env_default_fallback() {
        let mut config = Config::default();
        config.engine.command = "${PLANTD_TEST_UNSET_ENGINE:-plantuml}".to_owned();
        config.expand().unwrap();
        assert_eq!(config.engine.command, "plantuml");
    }

    #[test]
    fn expand_fails_on_unset_variable_without_default() {
        let mut config = Config::default();
        config.engine.command = "${PLANTD_TEST_UNSET_ENGINE}".to_owned();
        let err = config.expand().unwrap_err();
        assert!(matches!(err, ConfigError::Expand { field: "engine.command", .. }));
    }

    #[test]
    fn blank_dot_path_is_treated_as_absent() {
        let mut config = Config::default();
        config.graphviz.dot_path = Some("   ".to_owned());
        assert_eq!(config.graphviz_dot(), None);
    }

    #[test]
    fn discover_finds_config_in_ancestor() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/c");
        std::fs::create_dir_all(&nested).unwrap();
        let config_file = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&config_file, "").unwrap();

        assert_eq!(discover(&nested), Some(config_file));
    }

    #[test]
    fn discover_returns_none_without_config() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(discover(dir.path()), None);
    }

    #[test]
    fn parse_error_carries_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[server\n").unwrap();

        let err = Config::load_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(CONFIG_FILENAME));
    }
}

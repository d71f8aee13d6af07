// config.rs — Server configuration: config.toml in the data dir, overlaid
// by CLI flags / environment variables.

use anyhow::{Context as _, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_PORT: u16 = 4310;
pub const DEFAULT_LOG: &str = "info";

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

/// Service configuration (`config.toml` in the data directory).
///
/// Every field has a default, so a missing config file is not an error.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// TCP port for the REST API.
    pub port: u16,
    /// Bind address (default: 127.0.0.1; use 0.0.0.0 for LAN access).
    pub bind_address: String,
    /// Log level filter (trace, debug, info, warn, error).
    pub log: String,
    /// Directory holding config.toml and the SQLite database.
    /// Set from the CLI, never from the file itself.
    #[serde(skip)]
    pub data_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind_address: default_bind_address(),
            log: DEFAULT_LOG.to_string(),
            data_dir: PathBuf::from("data"),
        }
    }
}

impl ServerConfig {
    /// Load `config.toml` from `data_dir` if present, falling back to
    /// defaults when the file is absent.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join("config.toml");
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?
        } else {
            Self::default()
        };
        config.data_dir = data_dir.to_path_buf();
        Ok(config)
    }

    /// CLI flags and env vars win over the config file.
    pub fn apply_overrides(
        &mut self,
        port: Option<u16>,
        bind_address: Option<String>,
        log: Option<String>,
    ) {
        if let Some(port) = port {
            self.port = port;
        }
        if let Some(bind) = bind_address {
            self.bind_address = bind;
        }
        if let Some(log) = log {
            self.log = log;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ServerConfig::load(dir.path()).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.log, "info");
        assert_eq!(config.data_dir, dir.path());
    }

    #[test]
    fn file_values_and_overrides_are_layered() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.toml"), "port = 9000\nlog = \"debug\"\n")
            .unwrap();

        let mut config = ServerConfig::load(dir.path()).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.log, "debug");

        config.apply_overrides(Some(9001), None, None);
        assert_eq!(config.port, 9001);
        assert_eq!(config.log, "debug");
    }
}

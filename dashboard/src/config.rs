use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_CONFIG_PATH: &str = "config.json";

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    pub port: u16,
    pub namespace: String,
    pub label_selector: String,
    /// GPU memory of the serving node, in GiB.
    pub total_vram_gib: f64,
    pub command: Vec<String>,
    pub node_label: String,
    pub edit_url: Option<String>,
    pub exec_timeout_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            port: 8080,
            namespace: "ollama".to_string(),
            label_selector: "app=ollama-serve".to_string(),
            total_vram_gib: 24.0,
            command: vec!["ollama".to_string(), "ps".to_string()],
            node_label: "g5.2xlarge".to_string(),
            edit_url: Some(
                "https://github.com/redhat-ai-dev/rosa-gitops/edit/main/ollama/ollama-models-config.yaml"
                    .to_string(),
            ),
            exec_timeout_secs: 30,
        }
    }
}

impl DashboardConfig {
    pub fn load(path: &str) -> Self {
        let default_config = DashboardConfig::default();

        if Path::new(path).exists() {
            match fs::read_to_string(path) {
                Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                    warn!(%path, error = %e, "config file is malformed, using defaults");
                    default_config
                }),
                Err(e) => {
                    warn!(%path, error = %e, "could not read config file, using defaults");
                    default_config
                }
            }
        } else {
            // Only the default path gets a generated file; a missing custom
            // path is left alone.
            if path == DEFAULT_CONFIG_PATH {
                info!("no config found, creating default '{}'", DEFAULT_CONFIG_PATH);
                if let Err(e) = write_default(path, &default_config) {
                    warn!(%path, error = %e, "could not write default config");
                }
            } else {
                info!(%path, "config file not found, using defaults in memory");
            }
            default_config
        }
    }

    pub fn exec_timeout(&self) -> Duration {
        Duration::from_secs(self.exec_timeout_secs)
    }

    pub fn command_line(&self) -> String {
        self.command.join(" ")
    }
}

fn write_default(path: &str, config: &DashboardConfig) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_custom_path_uses_defaults_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let config = DashboardConfig::load(path.to_str().unwrap());

        assert_eq!(config, DashboardConfig::default());
        assert!(!path.exists());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"port": 9000, "total_vram_gib": 48.0, "exec_timeout_secs": 5}}"#).unwrap();

        let config = DashboardConfig::load(file.path().to_str().unwrap());
        assert_eq!(config.port, 9000);
        assert_eq!(config.total_vram_gib, 48.0);
        assert_eq!(config.exec_timeout(), Duration::from_secs(5));
        assert_eq!(config.namespace, "ollama");
        assert_eq!(config.command_line(), "ollama ps");
    }

    #[test]
    fn written_default_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let path = path.to_str().unwrap();

        write_default(path, &DashboardConfig::default()).unwrap();
        assert_eq!(DashboardConfig::load(path), DashboardConfig::default());
    }

    #[test]
    fn unwritable_default_path_reports_the_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("config.json");

        let err = write_default(path.to_str().unwrap(), &DashboardConfig::default()).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "port = 9000").unwrap();

        let config = DashboardConfig::load(file.path().to_str().unwrap());
        assert_eq!(config, DashboardConfig::default());
    }
}

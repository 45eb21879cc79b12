//! Runtime configuration for engine-rul.
//!
//! Configuration is loaded from a JSON file or constructed programmatically.
//! Command-line flags override the file for the few knobs an operator touches
//! most often (listen address, model path).

use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};

/// Command-line arguments.
#[derive(Parser, Debug, Clone)]
#[command(name = "engine-rul", about = "Aircraft engine RUL prediction server")]
pub struct Cli {
    /// Path to configuration file (JSON).
    #[arg(short, long, default_value = "config.json")]
    pub config: PathBuf,

    /// HTTP listen address (overrides the config file).
    #[arg(long)]
    pub listen: Option<String>,

    /// Path to the model artifact (overrides the config file).
    #[arg(short, long)]
    pub model: Option<PathBuf>,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines.
    #[arg(long)]
    pub log_json: bool,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,

    /// Model configuration.
    pub model: ModelConfig,

    /// Status band thresholds.
    pub thresholds: ThresholdConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address (e.g. "0.0.0.0:8000").
    pub listen: String,

    /// Allow any origin, method and header.
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8000".to_string(),
            cors_permissive: true,
        }
    }
}

/// Model-related settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Path to the JSON model artifact.
    pub model_path: PathBuf,

    /// Version label reported by the liveness endpoint.
    pub version_label: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("best_engine_model.json"),
            version_label: "XGBoost v1.0".to_string(),
        }
    }
}

/// Upper bounds (inclusive) of the urgent and warning bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// RUL at or below this many cycles is urgent.
    pub urgent_max: f64,

    /// RUL at or below this many cycles (and above `urgent_max`) is a warning.
    pub warning_max: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            urgent_max: 30.0,
            warning_max: 50.0,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file, falling back to defaults for missing fields.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let config = if path.exists() {
            let data = std::fs::read_to_string(path)?;
            serde_json::from_str(&data)?
        } else {
            tracing::warn!("Config file not found at {:?}, using defaults", path);
            Config::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Apply command-line overrides on top of the file configuration.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(listen) = &cli.listen {
            self.server.listen = listen.clone();
        }
        if let Some(model) = &cli.model {
            self.model.model_path = model.clone();
        }
    }

    /// Reject threshold settings that would make a band unreachable or undefined.
    pub fn validate(&self) -> anyhow::Result<()> {
        let t = &self.thresholds;
        if !t.urgent_max.is_finite() || !t.warning_max.is_finite() {
            anyhow::bail!("thresholds must be finite numbers");
        }
        if t.urgent_max > t.warning_max {
            anyhow::bail!(
                "thresholds.urgent_max ({}) must not exceed thresholds.warning_max ({})",
                t.urgent_max,
                t.warning_max
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = Config::default();
        assert_eq!(cfg.server.listen, "0.0.0.0:8000");
        assert_eq!(cfg.model.version_label, "XGBoost v1.0");
        assert_eq!(cfg.thresholds.urgent_max, 30.0);
        assert_eq!(cfg.thresholds.warning_max, 50.0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let cfg: Config = serde_json::from_str(r#"{"thresholds": {"urgent_max": 20.0}}"#).unwrap();
        assert_eq!(cfg.thresholds.urgent_max, 20.0);
        assert_eq!(cfg.thresholds.warning_max, 50.0);
        assert_eq!(cfg.model.model_path, PathBuf::from("best_engine_model.json"));
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let mut cfg = Config::default();
        cfg.thresholds.urgent_max = 60.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(cfg.server.listen, "0.0.0.0:8000");
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from(["engine-rul", "--listen", "127.0.0.1:9000", "-m", "m.json"]);
        let mut cfg = Config::default();
        cfg.apply_cli(&cli);
        assert_eq!(cfg.server.listen, "127.0.0.1:9000");
        assert_eq!(cfg.model.model_path, PathBuf::from("m.json"));
    }
}

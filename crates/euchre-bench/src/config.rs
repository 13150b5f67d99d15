use euchre_bot::StrategyParams;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";
const MAX_THREADS: usize = 256;
const FEATURES_FILE: &str = "features.jsonl";

/// Root simulation configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SimulationConfig {
    pub run_id: String,
    pub games: GamesConfig,
    #[serde(default)]
    pub strategy: StrategyParams,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: SimulationConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        self.games.validate()?;
        validate_strategy(&self.strategy)?;
        self.outputs.validate(&self.run_id)?;
        self.logging.normalize();
        Ok(())
    }

    /// Resolve `{run_id}` placeholders into concrete paths.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        ResolvedOutputs {
            hands_jsonl: resolve_template(&self.run_id, &self.outputs.hands_jsonl),
            summary_md: resolve_template(&self.run_id, &self.outputs.summary_md),
            features_jsonl: self
                .outputs
                .features_jsonl
                .as_deref()
                .map(|template| resolve_template(&self.run_id, template)),
        }
    }
}

/// How many games to play and how to seed them.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GamesConfig {
    pub count: usize,
    pub seed: Option<u64>,
    /// Worker threads; 0 sizes the pool to the available cores.
    #[serde(default)]
    pub threads: usize,
}

impl GamesConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.count == 0 {
            return Err(ValidationError::InvalidField {
                field: "games.count".to_string(),
                message: "number of games must be greater than zero".to_string(),
            });
        }

        if self.threads > MAX_THREADS {
            return Err(ValidationError::InvalidField {
                field: "games.threads".to_string(),
                message: format!("at most {MAX_THREADS} worker threads are supported"),
            });
        }

        Ok(())
    }
}

/// Output artifact configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub hands_jsonl: String,
    pub summary_md: String,
    #[serde(default)]
    pub features_jsonl: Option<String>,
}

impl OutputsConfig {
    /// Turn on per-decision feature rows, placed next to the hand log
    /// unless a path is already configured.
    pub fn enable_features(&mut self) {
        if self.features_jsonl.is_none() {
            let sibling = Path::new(&self.hands_jsonl).with_file_name(FEATURES_FILE);
            self.features_jsonl = Some(sibling.to_string_lossy().into_owned());
        }
    }

    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        let mut entries = vec![
            ("outputs.hands_jsonl", self.hands_jsonl.as_str()),
            ("outputs.summary_md", self.summary_md.as_str()),
        ];
        if let Some(features) = self.features_jsonl.as_deref() {
            entries.push(("outputs.features_jsonl", features));
        }

        for (label, value) in entries {
            if value.trim().is_empty() {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "path must not be empty".to_string(),
                });
            }

            let resolved = resolve_template(run_id, value);
            if resolved.file_name().is_none() {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "resolved path does not name a file".to_string(),
                });
            }
        }

        if self.hands_jsonl == self.summary_md
            || self.features_jsonl.as_deref() == Some(self.hands_jsonl.as_str())
        {
            return Err(ValidationError::InvalidField {
                field: "outputs".to_string(),
                message: "output files must be distinct".to_string(),
            });
        }

        Ok(())
    }
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id must not be empty".to_string(),
        });
    }

    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id may only contain alphanumeric characters, '.', '_' or '-'".to_string(),
        });
    }

    Ok(())
}

fn validate_strategy(params: &StrategyParams) -> Result<(), ValidationError> {
    for (label, value) in [
        ("strategy.trump_norm", params.trump_norm),
        ("strategy.ace_norm", params.ace_norm),
        ("strategy.void_norm", params.void_norm),
    ] {
        if !(value.is_finite() && value > 0.0) {
            return Err(ValidationError::InvalidField {
                field: label.to_string(),
                message: format!("normaliser must be positive, got {value}"),
            });
        }
    }

    for (label, value) in [
        ("strategy.trump_weight", params.trump_weight),
        ("strategy.ace_weight", params.ace_weight),
        ("strategy.void_weight", params.void_weight),
    ] {
        if !(value.is_finite() && value >= 0.0) {
            return Err(ValidationError::InvalidField {
                field: label.to_string(),
                message: format!("weight must be non-negative, got {value}"),
            });
        }
    }

    let thresholds = [
        ("strategy.order_up", params.order_up.values()),
        ("strategy.call_next", params.call_next.values()),
        ("strategy.call_reverse", params.call_reverse.values()),
        ("strategy.alone_threshold", [params.alone_threshold; 4]),
    ];
    for (label, values) in thresholds {
        if let Some(bad) = values.iter().find(|v| !(0.0..=1.0).contains(*v)) {
            return Err(ValidationError::InvalidField {
                field: label.to_string(),
                message: format!("threshold {bad} is outside [0, 1]"),
            });
        }
    }

    Ok(())
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    PathBuf::from(template.replace("{run_id}", run_id))
}

/// Fully resolved output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub hands_jsonl: PathBuf,
    pub summary_md: PathBuf,
    pub features_jsonl: Option<PathBuf>,
}

impl ResolvedOutputs {
    /// Directory holding the summary; telemetry lands here too.
    pub fn summary_dir(&self) -> PathBuf {
        self.summary_md
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}

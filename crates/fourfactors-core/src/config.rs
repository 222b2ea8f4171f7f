// Configuration loading and parsing (config/ingest.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::loader::DEFAULT_MAX_AGE_DAYS;
use crate::normalize::{CoercionPolicy, NormalizeConfig};

/// Config file location relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/ingest.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub max_age_days: i64,
    pub normalize: NormalizeConfig,
    pub source: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            max_age_days: DEFAULT_MAX_AGE_DAYS,
            normalize: NormalizeConfig::default(),
            source: "CraftedNBA".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// ingest.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for ingest.toml. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct IngestFile {
    #[serde(default)]
    paths: PathsSection,
    #[serde(default)]
    freshness: FreshnessSection,
    #[serde(default)]
    normalize: NormalizeSection,
    #[serde(default)]
    import: ImportSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct PathsSection {
    data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct FreshnessSection {
    max_age_days: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct NormalizeSection {
    fraction_threshold: Option<f64>,
    policy: Option<CoercionPolicy>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ImportSection {
    source: Option<String>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Parse and validate config from TOML text. `path` is only used for error
/// reporting.
pub fn parse_config(text: &str, path: &Path) -> Result<Config, ConfigError> {
    let file: IngestFile = toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let defaults = Config::default();
    let config = Config {
        data_dir: file.paths.data_dir.unwrap_or(defaults.data_dir),
        max_age_days: file.freshness.max_age_days.unwrap_or(defaults.max_age_days),
        normalize: NormalizeConfig {
            fraction_threshold: file
                .normalize
                .fraction_threshold
                .unwrap_or(defaults.normalize.fraction_threshold),
            policy: file.normalize.policy.unwrap_or(defaults.normalize.policy),
        },
        source: file.import.source.unwrap_or(defaults.source),
    };

    validate(&config)?;
    Ok(config)
}

/// Load config from an explicit path. The file must exist.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })?;
    parse_config(&text, path)
}

/// Load config from `path` if given, otherwise from `config/ingest.toml`
/// when it exists, otherwise fall back to defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(p) => load_config_from(p),
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                load_config_from(default_path)
            } else {
                Ok(Config::default())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let threshold = config.normalize.fraction_threshold;
    if !threshold.is_finite() || threshold <= 0.0 {
        return Err(ConfigError::ValidationError {
            field: "normalize.fraction_threshold".into(),
            message: format!("must be a finite value > 0, got {threshold}"),
        });
    }

    if config.max_age_days < 0 {
        return Err(ConfigError::ValidationError {
            field: "freshness.max_age_days".into(),
            message: format!("must be >= 0, got {}", config.max_age_days),
        });
    }

    if config.source.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "import.source".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

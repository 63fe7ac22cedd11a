//! # Configuration
//!
//! Startup configuration loaded once from TOML.
//!
//! ```toml
//! [playback]
//! max_pending = 30
//!
//! [pool]
//! default_preallocate = 3
//!
//! [[pool.items]]
//! id = "cube"
//! preallocate = 8
//! template = { scale = 1.0 }
//!
//! [tick]
//! target_hz = 60
//! budget_ms = 33
//!
//! [logging]
//! level = "info"
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use foundations_core::{PoolDescriptor, DEFAULT_PREALLOCATE};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not valid TOML for this schema.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A pool item template does not match the host's template type.
    #[error("invalid template for pool item '{id}': {source}")]
    Template {
        /// Pool item whose template failed.
        id: String,
        /// Deserialization error.
        source: toml::de::Error,
    },

    /// Values parsed but violate a constraint.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoundationsConfig {
    /// Bounded playback queues.
    pub playback: PlaybackConfig,
    /// Resource pool descriptors.
    pub pool: PoolConfig,
    /// Tick driver pacing.
    pub tick: TickConfig,
    /// Log output.
    pub logging: LoggingConfig,
}

/// Configuration for a bounded playback queue.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Maximum queued items. The oldest is overwritten when full.
    pub max_pending: usize,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self { max_pending: 30 }
    }
}

/// Configuration for the resource pool.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Pre-allocation used by items that do not set their own.
    pub default_preallocate: usize,
    /// One entry per pooled prefab.
    pub items: Vec<PoolItemConfig>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            default_preallocate: DEFAULT_PREALLOCATE,
            items: Vec::new(),
        }
    }
}

/// One pooled prefab.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoolItemConfig {
    /// Pool identifier.
    pub id: String,
    /// Instances created at startup. Falls back to `default_preallocate`.
    #[serde(default)]
    pub preallocate: Option<usize>,
    /// Host-defined template fields.
    #[serde(default)]
    pub template: toml::Table,
}

/// Tick driver pacing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickConfig {
    /// Ticks per second.
    pub target_hz: u32,
    /// Tick duration above which a warning is logged.
    pub budget_ms: u64,
    /// Sleep away the remainder of each tick.
    pub paced: bool,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            target_hz: 60,
            budget_ms: 33,
            paced: true,
        }
    }
}

/// Log output settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level when `RUST_LOG` is unset.
    pub level: String,
    /// Extra `target=level` directives, comma separated.
    pub filters: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            filters: None,
        }
    }
}

impl FoundationsConfig {
    /// Parses and validates configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] or [`ConfigError::Invalid`].
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), items = config.pool.items.len(), "configuration loaded");
        Ok(config)
    }

    /// Checks constraints serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first violation.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.playback.max_pending == 0 {
            return Err(ConfigError::Invalid("playback.max_pending must be positive".into()));
        }
        if self.tick.target_hz == 0 {
            return Err(ConfigError::Invalid("tick.target_hz must be positive".into()));
        }

        let mut seen = HashSet::new();
        for item in &self.pool.items {
            if item.id.is_empty() {
                return Err(ConfigError::Invalid("pool item with empty id".into()));
            }
            if !seen.insert(item.id.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate pool item '{}'", item.id)));
            }
        }
        Ok(())
    }

    /// Builds pool descriptors, deserializing each template into `Tpl`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Template`] for the first template that does
    /// not fit `Tpl`.
    pub fn pool_descriptors<Tpl: DeserializeOwned>(&self) -> ConfigResult<Vec<PoolDescriptor<Tpl>>> {
        self.pool
            .items
            .iter()
            .map(|item| {
                let template = toml::Value::Table(item.template.clone())
                    .try_into()
                    .map_err(|source| ConfigError::Template {
                        id: item.id.clone(),
                        source,
                    })?;
                Ok(PoolDescriptor {
                    id: item.id.clone(),
                    template,
                    preallocate: item.preallocate.unwrap_or(self.pool.default_preallocate),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct ShapeTemplate {
        scale: f32,
    }

    const SAMPLE: &str = r#"
        [playback]
        max_pending = 12

        [pool]
        default_preallocate = 4

        [[pool.items]]
        id = "cube"
        preallocate = 2
        template = { scale = 1.0 }

        [[pool.items]]
        id = "sphere"
        template = { scale = 0.5 }
    "#;

    #[test]
    fn test_defaults() {
        let config = FoundationsConfig::from_toml_str("").unwrap();
        assert_eq!(config.playback.max_pending, 30);
        assert_eq!(config.pool.default_preallocate, DEFAULT_PREALLOCATE);
        assert_eq!(config.tick.target_hz, 60);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_sample_descriptors() {
        let config = FoundationsConfig::from_toml_str(SAMPLE).unwrap();
        let descriptors = config.pool_descriptors::<ShapeTemplate>().unwrap();

        assert_eq!(config.playback.max_pending, 12);
        assert_eq!(descriptors.len(), 2);
        assert_eq!(descriptors[0].preallocate, 2);
        assert!((descriptors[0].template.scale - 1.0).abs() < f32::EPSILON);
        assert_eq!(descriptors[1].id, "sphere");
        assert_eq!(descriptors[1].preallocate, 4);
        assert_eq!(descriptors[1].template, ShapeTemplate { scale: 0.5 });
    }

    #[test]
    fn test_rejects_zero_pending() {
        let result = FoundationsConfig::from_toml_str("[playback]\nmax_pending = 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_duplicate_items() {
        let source = r#"
            [[pool.items]]
            id = "cube"
            [[pool.items]]
            id = "cube"
        "#;
        let result = FoundationsConfig::from_toml_str(source);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_template_mismatch() {
        let source = r#"
            [[pool.items]]
            id = "cube"
            template = { scale = "huge" }
        "#;
        let config = FoundationsConfig::from_toml_str(source).unwrap();
        let result = config.pool_descriptors::<ShapeTemplate>();
        assert!(matches!(result, Err(ConfigError::Template { ref id, .. }) if id == "cube"));
    }

    #[test]
    fn test_missing_file() {
        let result = FoundationsConfig::load("/nonexistent/foundations.toml");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_malformed_toml() {
        let result = FoundationsConfig::from_toml_str("[playback\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}

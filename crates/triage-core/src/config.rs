//! Configuration loading and typed config for the triage policy.
//!
//! Every field has a default matching the tuned policy, so an empty YAML
//! document (or [`TriageConfig::default`]) yields the standard behavior.
//! Hosts override individual thresholds with a partial YAML file:
//!
//! ```yaml
//! bleeding_threshold: 0.15
//! life_critical_checkpoints: [0.1, 0.25]
//! advisory_terminal: true
//! physiology:
//!   moving_appendage_weight: 0.5
//! ```

use std::path::Path;

use serde::Deserialize;
use triage_body::{PhysiologyConfig, ReferencePhysiology};
use triage_types::Capacity;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but holds unusable values.
    #[error("invalid config field `{field}`: {reason}")]
    Invalid {
        /// Name of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Thresholds and switches of the tiered triage policy.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TriageConfig {
    /// Total bleed rate at which bleeding wounds take priority (default: 0.1).
    #[serde(default = "default_bleeding_threshold")]
    pub bleeding_threshold: f32,

    /// Damage checkpoints swept by the graduated life-critical tiers
    /// (default: 0.1, 0.2, 0.3). Must be ascending and within (0, 1].
    #[serde(default = "default_life_critical_checkpoints")]
    pub life_critical_checkpoints: Vec<f32>,

    /// Moving level below which walking is restored next (default: 0.16).
    #[serde(default = "default_moving_floor")]
    pub moving_floor: f32,

    /// Manipulation level below which hands are restored next (default: 0.01).
    #[serde(default = "default_manipulation_floor")]
    pub manipulation_floor: f32,

    /// Life-critical checkpoints swept after the functional tiers
    /// (default: 0.4).
    #[serde(default = "default_late_checkpoints")]
    pub late_checkpoints: Vec<f32>,

    /// Target level of the maximal-restoration tier (default: 1.0).
    #[serde(default = "default_restoration_level")]
    pub restoration_level: f32,

    /// Non-critical capacities checked last, in priority order
    /// (default: Manipulation, Sight, Hearing, Talking).
    #[serde(default = "default_advisory_capacities")]
    pub advisory_capacities: Vec<Capacity>,

    /// Whether an advisory result ends the selection (default: false).
    ///
    /// When false, advisory results are only logged and the pass falls
    /// through to the random pick.
    #[serde(default)]
    pub advisory_terminal: bool,

    /// Tunables of the tag-weight factors, used when the physiology model
    /// carries none of its own.
    #[serde(default)]
    pub physiology: PhysiologyConfig,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            bleeding_threshold: default_bleeding_threshold(),
            life_critical_checkpoints: default_life_critical_checkpoints(),
            moving_floor: default_moving_floor(),
            manipulation_floor: default_manipulation_floor(),
            late_checkpoints: default_late_checkpoints(),
            restoration_level: default_restoration_level(),
            advisory_capacities: default_advisory_capacities(),
            advisory_terminal: false,
            physiology: PhysiologyConfig::default(),
        }
    }
}

impl TriageConfig {
    /// A reference physiology built from the `physiology` section, so
    /// capacity levels and tag weights share one set of tunables.
    pub fn reference_physiology(&self) -> ReferencePhysiology {
        ReferencePhysiology::new(self.physiology.clone())
    }

    /// Load and validate configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a threshold is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a threshold is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that every threshold is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.bleeding_threshold.is_finite() || self.bleeding_threshold < 0.0 {
            return Err(invalid(
                "bleeding_threshold",
                format!("must be a non-negative number, got {}", self.bleeding_threshold),
            ));
        }
        validate_checkpoints("life_critical_checkpoints", &self.life_critical_checkpoints)?;
        validate_checkpoints("late_checkpoints", &self.late_checkpoints)?;
        validate_level("moving_floor", self.moving_floor)?;
        validate_level("manipulation_floor", self.manipulation_floor)?;
        validate_level("restoration_level", self.restoration_level)?;
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

fn validate_level(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, format!("must be within [0, 1], got {value}")))
    }
}

fn validate_checkpoints(field: &'static str, checkpoints: &[f32]) -> Result<(), ConfigError> {
    for &checkpoint in checkpoints {
        if checkpoint <= 0.0 || !(0.0..=1.0).contains(&checkpoint) {
            return Err(invalid(
                field,
                format!("checkpoint {checkpoint} is outside (0, 1]"),
            ));
        }
    }
    if checkpoints.windows(2).any(|pair| match pair {
        [low, high] => low >= high,
        _ => false,
    }) {
        return Err(invalid(field, "checkpoints must be strictly ascending".to_owned()));
    }
    Ok(())
}

const fn default_bleeding_threshold() -> f32 {
    0.1
}

fn default_life_critical_checkpoints() -> Vec<f32> {
    vec![0.1, 0.2, 0.3]
}

const fn default_moving_floor() -> f32 {
    0.16
}

const fn default_manipulation_floor() -> f32 {
    0.01
}

fn default_late_checkpoints() -> Vec<f32> {
    vec![0.4]
}

const fn default_restoration_level() -> f32 {
    1.0
}

fn default_advisory_capacities() -> Vec<Capacity> {
    vec![
        Capacity::Manipulation,
        Capacity::Sight,
        Capacity::Hearing,
        Capacity::Talking,
    ]
}

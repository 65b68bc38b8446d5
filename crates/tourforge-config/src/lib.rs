//! Configuration system for TourForge.
//!
//! Load solver configuration from TOML or YAML to choose the formulation,
//! the time budget and the search strategy without code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use tourforge_config::{FormulationType, SolverConfig};
//! use std::time::Duration;
//!
//! let config = SolverConfig::from_toml_str(r#"
//!     formulation = "circuit"
//!
//!     [termination]
//!     seconds_spent_limit = 30
//!
//!     [search]
//!     exploration_type = "best_bound_first"
//! "#).unwrap();
//!
//! assert_eq!(config.formulation, FormulationType::Circuit);
//! assert_eq!(config.time_limit(), Some(Duration::from_secs(30)));
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use tourforge_config::SolverConfig;
//!
//! let config = SolverConfig::load("tourforge.toml").unwrap_or_default();
//! // Proceeds with defaults if file doesn't exist
//! ```

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main solver configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SolverConfig {
    /// Which TSP formulation to build.
    #[serde(default)]
    pub formulation: FormulationType,

    /// Termination configuration.
    #[serde(default)]
    pub termination: Option<TerminationConfig>,

    /// Search configuration.
    #[serde(default)]
    pub search: SearchConfig,
}

impl SolverConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(termination) = &self.termination {
            if termination.node_count_limit == Some(0) {
                return Err(ConfigError::Invalid(
                    "node_count_limit must be positive".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Selects the formulation.
    pub fn with_formulation(mut self, formulation: FormulationType) -> Self {
        self.formulation = formulation;
        self
    }

    /// Sets the termination time limit in whole seconds.
    pub fn with_termination_seconds(mut self, seconds: u64) -> Self {
        self.termination = Some(TerminationConfig {
            seconds_spent_limit: Some(seconds),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    /// Sets the termination time limit in milliseconds.
    pub fn with_termination_millis(mut self, millis: u64) -> Self {
        self.termination = Some(TerminationConfig {
            millis_spent_limit: Some(millis),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    /// Sets the termination node limit.
    pub fn with_node_count_limit(mut self, limit: u64) -> Self {
        self.termination = Some(TerminationConfig {
            node_count_limit: Some(limit),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    /// Sets the exploration order of the branch-and-bound search.
    pub fn with_exploration_type(mut self, exploration_type: ExplorationType) -> Self {
        self.search.exploration_type = exploration_type;
        self
    }

    /// Enables or disables lazy subtour elimination.
    pub fn with_lazy_constraints(mut self, enabled: bool) -> Self {
        self.search.lazy_constraints = enabled;
        self
    }

    /// Enables or disables per-node search logging.
    pub fn with_log_search_progress(mut self, enabled: bool) -> Self {
        self.search.log_search_progress = enabled;
        self
    }

    /// Returns the termination time limit, if configured.
    ///
    /// Convenience method that delegates to `termination.time_limit()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tourforge_config::SolverConfig;
    /// use std::time::Duration;
    ///
    /// let config = SolverConfig::from_toml_str(r#"
    ///     [termination]
    ///     seconds_spent_limit = 2
    ///     millis_spent_limit = 500
    /// "#).unwrap();
    ///
    /// assert_eq!(config.time_limit(), Some(Duration::from_millis(2_500)));
    /// ```
    pub fn time_limit(&self) -> Option<Duration> {
        self.termination.as_ref().and_then(|t| t.time_limit())
    }

    /// Returns the node limit, if configured.
    pub fn node_count_limit(&self) -> Option<u64> {
        self.termination.as_ref().and_then(|t| t.node_count_limit)
    }
}

/// TSP formulation selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormulationType {
    /// Degree constraints plus lazy subtour elimination cuts.
    #[default]
    LazyCuts,

    /// Directed arcs under one global circuit constraint.
    Circuit,
}

impl fmt::Display for FormulationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormulationType::LazyCuts => write!(f, "LazyCuts"),
            FormulationType::Circuit => write!(f, "Circuit"),
        }
    }
}

/// Termination configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TerminationConfig {
    /// Maximum seconds to spend solving.
    pub seconds_spent_limit: Option<u64>,

    /// Additional milliseconds to spend solving.
    pub millis_spent_limit: Option<u64>,

    /// Maximum number of search nodes to explore.
    pub node_count_limit: Option<u64>,
}

impl TerminationConfig {
    /// Returns the combined time limit as a Duration, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        let millis =
            self.seconds_spent_limit.unwrap_or(0) * 1_000 + self.millis_spent_limit.unwrap_or(0);
        if millis > 0 {
            Some(Duration::from_millis(millis))
        } else {
            None
        }
    }
}

/// Search configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SearchConfig {
    /// Order in which open search nodes are explored.
    pub exploration_type: ExplorationType,

    /// Whether subtour elimination cuts are injected during search.
    pub lazy_constraints: bool,

    /// Emits one DEBUG event per explored node when enabled.
    pub log_search_progress: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            exploration_type: ExplorationType::DepthFirst,
            lazy_constraints: true,
            log_search_progress: false,
        }
    }
}

/// Type of exploration strategy for branch-and-bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplorationType {
    /// Deepest node first. Memory efficient, finds incumbents early.
    #[default]
    DepthFirst,

    /// Node with the smallest lower bound first. Raises the global bound fastest.
    BestBoundFirst,
}

impl fmt::Display for ExplorationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExplorationType::DepthFirst => write!(f, "DepthFirst"),
            ExplorationType::BestBoundFirst => write!(f, "BestBoundFirst"),
        }
    }
}

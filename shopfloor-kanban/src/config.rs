//! Board configuration loaded with figment
//!
//! Sources are merged in precedence order (later sources override earlier ones):
//! 1. Built-in defaults
//! 2. `config.toml`, `config.yaml`, `config.json` in the board directory
//! 3. Environment variables prefixed with `SHOPFLOOR_`

use crate::error::{KanbanError, Result};
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Default spacing between adjacent priorities
pub const DEFAULT_PRIORITY_INCREMENT: i64 = 1000;

/// Default number of jobs shown in the archived column
pub const DEFAULT_ARCHIVED_PAGE_SIZE: usize = 50;

/// Default time to wait for the database write lock
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "SHOPFLOOR_";

/// Deployment-wide settings for a job board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KanbanConfig {
    /// Spacing used when appending to a column end or rebalancing
    pub priority_increment: i64,
    /// Maximum number of jobs returned for the archived column
    pub archived_page_size: usize,
    /// How long a writer waits for another writer before giving up
    pub busy_timeout_ms: u64,
    /// Job number given to the first job on an empty board
    pub first_job_number: i64,
}

impl Default for KanbanConfig {
    fn default() -> Self {
        Self {
            priority_increment: DEFAULT_PRIORITY_INCREMENT,
            archived_page_size: DEFAULT_ARCHIVED_PAGE_SIZE,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            first_job_number: 1,
        }
    }
}

impl KanbanConfig {
    /// Load configuration for the board rooted at `root`
    pub fn load(root: &Path) -> Result<Self> {
        let config: KanbanConfig = Self::figment(root).extract()?;
        config.validate()?;
        debug!(?config, root = %root.display(), "loaded board configuration");
        Ok(config)
    }

    /// Build the figment with all sources in precedence order
    fn figment(root: &Path) -> Figment {
        Figment::from(Serialized::defaults(KanbanConfig::default()))
            .merge(Toml::file(root.join("config.toml")))
            .merge(Yaml::file(root.join("config.yaml")))
            .merge(Json::file(root.join("config.json")))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    /// Set the priority increment
    pub fn with_priority_increment(mut self, increment: i64) -> Self {
        self.priority_increment = increment;
        self
    }

    /// Set the archived column page size
    pub fn with_archived_page_size(mut self, size: usize) -> Self {
        self.archived_page_size = size;
        self
    }

    /// Reject settings the ordering engine cannot work with
    pub fn validate(&self) -> Result<()> {
        // An increment of 1 leaves no room for a midpoint after a rebalance
        if self.priority_increment < 2 {
            return Err(KanbanError::config(format!(
                "priority_increment must be at least 2, got {}",
                self.priority_increment
            )));
        }
        if self.archived_page_size == 0 {
            return Err(KanbanError::config("archived_page_size must be at least 1"));
        }
        Ok(())
    }
}

//! Server settings shared by the binary and the handler

use crate::calendar::DEFAULT_MAX_WALK_DAYS;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max_walk_days must be at least 1")]
    ZeroWalkBound,
    #[error("Schedule file path is empty")]
    EmptyPath,
}

/// Settings for one server instance
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// TOML file holding orders and holiday rules
    pub storage_path: PathBuf,
    /// Commit (and push, when a remote exists) after every save
    pub sync_git: bool,
    /// Upper bound on calendar days a working-day walk may visit
    pub max_walk_days: u32,
}

impl ServerConfig {
    pub fn new(storage_path: impl Into<PathBuf>) -> Self {
        Self {
            storage_path: storage_path.into(),
            sync_git: false,
            max_walk_days: DEFAULT_MAX_WALK_DAYS,
        }
    }

    pub fn with_sync_git(mut self, sync_git: bool) -> Self {
        self.sync_git = sync_git;
        self
    }

    pub fn with_max_walk_days(mut self, max_walk_days: u32) -> Self {
        self.max_walk_days = max_walk_days;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath);
        }
        if self.max_walk_days == 0 {
            return Err(ConfigError::ZeroWalkBound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::new("schedule.toml");
        assert!(!config.sync_git);
        assert_eq!(config.max_walk_days, DEFAULT_MAX_WALK_DAYS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero = ServerConfig::new("schedule.toml").with_max_walk_days(0);
        assert_eq!(zero.validate(), Err(ConfigError::ZeroWalkBound));
        assert_eq!(ServerConfig::new("").validate(), Err(ConfigError::EmptyPath));
    }
}

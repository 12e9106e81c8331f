//! Service configuration.
//!
//! Loaded from a TOML file or built programmatically; all fields have
//! defaults so partial files are accepted.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoordinationError, Result};

/// Heartbeat deadline applied when the configured value is zero.
pub const DEFAULT_HEARTBEAT_TIMEOUT_MS: u64 = 10_000;

/// One job in the declared cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobSpec {
    pub name: String,
    pub num_tasks: u32,
}

impl JobSpec {
    pub fn new(name: impl Into<String>, num_tasks: u32) -> Self {
        Self {
            name: name.into(),
            num_tasks,
        }
    }
}

// Coordination service configuration options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Heartbeat deadline in milliseconds; 0 selects the 10 s default. Also
    /// used as the grace period after a graceful disconnect.
    pub heartbeat_timeout_ms: u64,
    /// If greater than zero, task shutdown goes through the shutdown barrier
    /// with this timeout; otherwise tasks disconnect individually.
    pub shutdown_barrier_timeout_ms: u64,
    /// Allows a task in an unavailable error state to reconnect with a new
    /// incarnation without an explicit reset.
    pub allow_new_incarnation_to_reconnect: bool,
    /// The declared cluster: one task record is created per job index.
    pub coordinated_jobs: Vec<JobSpec>,
    /// Jobs whose task errors are not propagated to the rest of the cluster.
    pub recoverable_jobs: Vec<String>,
}

impl ServiceConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            CoordinationError::invalid_argument(format!(
                "failed to read config file {}: {e}",
                path.display()
            ))
        })?;
        let config: Self = toml::from_str(&contents).map_err(|e| {
            CoordinationError::invalid_argument(format!(
                "failed to parse config file {}: {e}",
                path.display()
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for job in &self.coordinated_jobs {
            if job.name.is_empty() {
                return Err(CoordinationError::invalid_argument(
                    "coordinated job with empty name",
                ));
            }
            if !seen.insert(job.name.as_str()) {
                return Err(CoordinationError::invalid_argument(format!(
                    "duplicate coordinated job: {}",
                    job.name
                )));
            }
        }
        Ok(())
    }

    /// The heartbeat deadline with the zero default applied.
    pub fn effective_heartbeat_timeout_ms(&self) -> u64 {
        if self.heartbeat_timeout_ms > 0 {
            self.heartbeat_timeout_ms
        } else {
            DEFAULT_HEARTBEAT_TIMEOUT_MS
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_heartbeat_timeout_selects_default() {
        let config = ServiceConfig::default();
        assert_eq!(config.effective_heartbeat_timeout_ms(), 10_000);

        let config = ServiceConfig {
            heartbeat_timeout_ms: 2_500,
            ..Default::default()
        };
        assert_eq!(config.effective_heartbeat_timeout_ms(), 2_500);
    }

    #[test]
    fn parses_partial_toml() {
        let config: ServiceConfig = toml::from_str(
            r#"
            heartbeat_timeout_ms = 5000

            [[coordinated_jobs]]
            name = "worker"
            num_tasks = 4
        "#,
        )
        .unwrap();
        assert_eq!(config.heartbeat_timeout_ms, 5_000);
        assert_eq!(config.shutdown_barrier_timeout_ms, 0);
        assert_eq!(config.coordinated_jobs, vec![JobSpec::new("worker", 4)]);
        assert!(config.recoverable_jobs.is_empty());
    }

    #[test]
    fn validate_rejects_duplicate_jobs() {
        let config = ServiceConfig {
            coordinated_jobs: vec![JobSpec::new("worker", 2), JobSpec::new("worker", 1)],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}

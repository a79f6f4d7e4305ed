//! Configuration for the payout scheduler

use serde::{Deserialize, Serialize};

/// Scheduler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Maximum payments claimed per batch
    pub batch_size: usize,

    /// Processing window for an individual planned payout, seconds
    pub plan_window_seconds: u64,

    /// Processing window for a batch, seconds
    pub batch_window_seconds: u64,

    /// Execution attempts before a payment is marked failed
    pub max_retries: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            plan_window_seconds: 60,      // 1 minute
            batch_window_seconds: 3_600,  // 1 hour
            max_retries: 3,
        }
    }
}

impl SchedulerConfig {
    /// Load from a TOML file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SchedulerConfig = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load defaults with environment overrides
    pub fn from_env() -> crate::Result<Self> {
        let mut config = SchedulerConfig::default();

        if let Ok(size) = std::env::var("SCHEDULER_BATCH_SIZE") {
            config.batch_size = size
                .parse()
                .map_err(|e| crate::Error::Config(format!("SCHEDULER_BATCH_SIZE: {}", e)))?;
        }

        if let Ok(retries) = std::env::var("SCHEDULER_MAX_RETRIES") {
            config.max_retries = retries
                .parse()
                .map_err(|e| crate::Error::Config(format!("SCHEDULER_MAX_RETRIES: {}", e)))?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SchedulerConfig::default();
        assert_eq!(config.batch_size, 10);
        assert_eq!(config.plan_window_seconds, 60);
        assert_eq!(config.batch_window_seconds, 3_600);
        assert_eq!(config.max_retries, 3);
    }
}

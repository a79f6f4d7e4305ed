//! Configuration for the token issuer

use crate::types::{ExpirationPolicy, Purpose};
use serde::{Deserialize, Serialize};

/// Issuer configuration: TTLs behind the per-purpose default policies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuerConfig {
    /// TTL for deposit tokens (hybrid policy), seconds
    pub deposit_ttl_seconds: u64,

    /// TTL for internal tokens (time-based policy), seconds
    pub internal_ttl_seconds: u64,
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self {
            deposit_ttl_seconds: 3_600,
            internal_ttl_seconds: 86_400,
        }
    }
}

impl IssuerConfig {
    /// Default policy for a purpose: deposit is hybrid (TTL and one use),
    /// withdrawal is usage-based (one use, no TTL), internal is time-based.
    pub fn default_policy(&self, purpose: Purpose) -> ExpirationPolicy {
        match purpose {
            Purpose::Deposit => ExpirationPolicy::hybrid(self.deposit_ttl_seconds, 1),
            Purpose::Withdrawal => ExpirationPolicy::usage_based(1),
            Purpose::Internal => ExpirationPolicy::time_based(self.internal_ttl_seconds),
        }
    }

    /// Load from a TOML file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: IssuerConfig = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load defaults with environment overrides
    pub fn from_env() -> crate::Result<Self> {
        let mut config = IssuerConfig::default();

        if let Ok(ttl) = std::env::var("TOKEN_DEPOSIT_TTL_SECONDS") {
            config.deposit_ttl_seconds = ttl
                .parse()
                .map_err(|e| crate::Error::Config(format!("TOKEN_DEPOSIT_TTL_SECONDS: {}", e)))?;
        }

        if let Ok(ttl) = std::env::var("TOKEN_INTERNAL_TTL_SECONDS") {
            config.internal_ttl_seconds = ttl
                .parse()
                .map_err(|e| crate::Error::Config(format!("TOKEN_INTERNAL_TTL_SECONDS: {}", e)))?;
        }

        Ok(config)
    }
}

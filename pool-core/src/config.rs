//! Configuration for the pool ledger

use crate::types::{Currency, Reserve};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Ledger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Opening pool balance
    pub initial_reserve: Decimal,

    /// Pool currency
    pub currency: Currency,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            initial_reserve: Decimal::from(100),
            currency: Currency::Btc,
        }
    }
}

impl LedgerConfig {
    /// Load from a TOML file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: LedgerConfig = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load defaults with environment overrides
    pub fn from_env() -> crate::Result<Self> {
        let mut config = LedgerConfig::default();

        if let Ok(amount) = std::env::var("POOL_INITIAL_RESERVE") {
            config.initial_reserve = amount
                .parse()
                .map_err(|e| crate::Error::Config(format!("POOL_INITIAL_RESERVE: {}", e)))?;
        }

        Ok(config)
    }

    /// Build the opening reserve this configuration describes
    pub fn opening_reserve(&self) -> Reserve {
        Reserve::opening(self.initial_reserve, self.currency)
    }
}

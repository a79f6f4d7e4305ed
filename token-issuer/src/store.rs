//! In-memory reference token store
//!
//! Backed by a concurrent map; per-entry locking makes `mark_expired` the
//! compare-and-set the issuer's single-redemption guarantee rests on.

use crate::{
    issuer::TokenStore,
    types::{AddressToken, ExpiryReason},
    Result,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

/// In-memory token store
#[derive(Default)]
pub struct InMemoryTokenStore {
    tokens: DashMap<Uuid, AddressToken>,
}

impl InMemoryTokenStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tokens held (any state)
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the store holds no tokens
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn save(&self, token: AddressToken) -> Result<()> {
        self.tokens.insert(token.id, token);
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<AddressToken>> {
        Ok(self.tokens.get(&id).map(|t| t.clone()))
    }

    async fn mark_expired(&self, id: Uuid, reason: ExpiryReason) -> Result<bool> {
        match self.tokens.get_mut(&id) {
            Some(mut token) if !token.is_expired => {
                token.is_expired = true;
                token.expired_reason = Some(reason);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn ttl_expired(&self, now: DateTime<Utc>) -> Result<Vec<AddressToken>> {
        Ok(self
            .tokens
            .iter()
            .filter(|t| !t.is_expired && t.expires_at < now)
            .map(|t| t.clone())
            .collect())
    }
}

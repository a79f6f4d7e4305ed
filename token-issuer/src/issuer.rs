//! Token issuance, resolution, and TTL sweep
//!
//! Resolution of a usage-limited token is an atomic check-and-mark through
//! the store's compare-and-set: of two concurrent resolutions exactly one
//! returns the token, the other gets nothing. The TTL sweep is idempotent;
//! re-running it over already-expired tokens produces no event.

use crate::{
    config::IssuerConfig,
    events::{AddressTokenEmitted, AddressTokenExpired, AddressTokenResolved},
    types::{AddressToken, ExpirationPolicy, ExpiryReason, Namespace, Purpose},
    Result,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use event_router::{Event, EventKind, EventPublisher};
use pool_core::{Clock, IdSource};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Repository port for address tokens.
///
/// `mark_expired` is a compare-and-set: it transitions the token to expired
/// and reports whether *this* call made the transition. A missing or
/// already-expired token yields false.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Persist a freshly issued token
    async fn save(&self, token: AddressToken) -> Result<()>;

    /// Find a token by id
    async fn find(&self, id: Uuid) -> Result<Option<AddressToken>>;

    /// Atomically mark a token expired; true when this call won the transition
    async fn mark_expired(&self, id: Uuid, reason: ExpiryReason) -> Result<bool>;

    /// Active tokens whose TTL elapsed before `now`
    async fn ttl_expired(&self, now: DateTime<Utc>) -> Result<Vec<AddressToken>>;
}

/// Address token issuer
pub struct TokenIssuer {
    config: IssuerConfig,
    store: Arc<dyn TokenStore>,
    publisher: Arc<dyn EventPublisher>,
    ids: Arc<dyn IdSource>,
    clock: Arc<dyn Clock>,
}

impl TokenIssuer {
    /// Create an issuer over the given store and capabilities
    pub fn new(
        config: IssuerConfig,
        store: Arc<dyn TokenStore>,
        publisher: Arc<dyn EventPublisher>,
        ids: Arc<dyn IdSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            store,
            publisher,
            ids,
            clock,
        }
    }

    /// Emit a fresh token for `purpose`, under the purpose's default policy
    /// unless a custom one is supplied.
    pub async fn emit(
        &self,
        purpose: Purpose,
        policy: Option<ExpirationPolicy>,
    ) -> Result<AddressToken> {
        let now = self.clock.now();
        let policy = policy.unwrap_or_else(|| self.config.default_policy(purpose));

        let namespace = Namespace {
            value: self.ids.next_id().simple().to_string(),
            purpose,
        };
        let token = AddressToken::issue(self.ids.next_id(), namespace, policy, now);

        self.store.save(token.clone()).await?;

        self.publisher
            .publish(Event::new(
                EventKind::AddressTokenEmitted,
                &AddressTokenEmitted {
                    token_id: token.id,
                    namespace: token.namespace.value.clone(),
                    expires_at: token.expires_at,
                },
                now,
            )?)
            .await?;

        info!(token_id = %token.id, %purpose, expires_at = %token.expires_at, "token emitted");
        Ok(token)
    }

    /// Resolve a token.
    ///
    /// Returns `None` when the token is missing or expired — the expiry
    /// check takes priority over consumption. A successful resolution of a
    /// usage-based or hybrid token consumes it, regardless of remaining TTL.
    pub async fn resolve(&self, token_id: Uuid) -> Result<Option<AddressToken>> {
        let now = self.clock.now();

        let Some(mut token) = self.store.find(token_id).await? else {
            return Ok(None);
        };
        if token.is_expired || token.expires_at <= now {
            debug!(%token_id, "resolve refused: token expired");
            return Ok(None);
        }

        if token.policy.consumes_on_resolve() {
            if !self
                .store
                .mark_expired(token_id, ExpiryReason::Usage)
                .await?
            {
                // Lost the race against a concurrent resolution or a sweep.
                return Ok(None);
            }
            token.is_expired = true;
            token.expired_reason = Some(ExpiryReason::Usage);
        }

        self.publisher
            .publish(Event::new(
                EventKind::AddressTokenResolved,
                &AddressTokenResolved { token_id },
                now,
            )?)
            .await?;

        info!(%token_id, "token resolved");
        Ok(Some(token))
    }

    /// Expire every active token whose TTL elapsed; returns the count
    /// processed. Idempotent: already-expired tokens are not revisited.
    pub async fn sweep_expired(&self) -> Result<usize> {
        let now = self.clock.now();
        let mut count = 0;

        for token in self.store.ttl_expired(now).await? {
            if !self.store.mark_expired(token.id, ExpiryReason::Ttl).await? {
                continue;
            }

            self.publisher
                .publish(Event::new(
                    EventKind::AddressTokenExpired,
                    &AddressTokenExpired {
                        token_id: token.id,
                        reason: ExpiryReason::Ttl,
                    },
                    now,
                )?)
                .await?;
            count += 1;
        }

        if count > 0 {
            info!(count, "ttl sweep expired tokens");
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryTokenStore;
    use crate::types::PolicyKind;
    use event_router::InMemoryPublisher;
    use pool_core::{ManualClock, SequentialIdSource};

    struct Fixture {
        issuer: TokenIssuer,
        publisher: Arc<InMemoryPublisher>,
        clock: Arc<ManualClock>,
    }

    fn fixture() -> Fixture {
        let publisher = Arc::new(InMemoryPublisher::new());
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let issuer = TokenIssuer::new(
            IssuerConfig::default(),
            Arc::new(InMemoryTokenStore::new()),
            publisher.clone(),
            Arc::new(SequentialIdSource::new()),
            clock.clone(),
        );

        Fixture {
            issuer,
            publisher,
            clock,
        }
    }

    #[tokio::test]
    async fn test_withdrawal_token_single_redemption() {
        // Scenario C
        let f = fixture();

        let token = f.issuer.emit(Purpose::Withdrawal, None).await.unwrap();
        assert_eq!(token.policy.kind, PolicyKind::UsageBased);
        assert!(!token.is_expired);

        let resolved = f.issuer.resolve(token.id).await.unwrap().unwrap();
        assert!(resolved.is_expired);
        assert_eq!(resolved.expired_reason, Some(ExpiryReason::Usage));

        // Second resolution finds a consumed token.
        assert!(f.issuer.resolve(token.id).await.unwrap().is_none());

        assert_eq!(
            f.publisher.events_of(EventKind::AddressTokenResolved).len(),
            1
        );
    }

    #[tokio::test]
    async fn test_emit_publishes_with_namespace() {
        let f = fixture();
        let token = f.issuer.emit(Purpose::Deposit, None).await.unwrap();

        let emitted = f.publisher.events_of(EventKind::AddressTokenEmitted);
        assert_eq!(emitted.len(), 1);
        let payload: crate::events::AddressTokenEmitted = emitted[0].payload_as().unwrap();
        assert_eq!(payload.token_id, token.id);
        assert_eq!(payload.namespace, token.namespace.value);
        assert_eq!(payload.expires_at, token.expires_at);
    }

    #[tokio::test]
    async fn test_internal_token_survives_resolution() {
        let f = fixture();
        let token = f.issuer.emit(Purpose::Internal, None).await.unwrap();

        // Time-based tokens are not consumed by use.
        assert!(f.issuer.resolve(token.id).await.unwrap().is_some());
        assert!(f.issuer.resolve(token.id).await.unwrap().is_some());
        assert_eq!(
            f.publisher.events_of(EventKind::AddressTokenResolved).len(),
            2
        );
    }

    #[tokio::test]
    async fn test_resolve_missing_token() {
        let f = fixture();
        assert!(f.issuer.resolve(Uuid::new_v4()).await.unwrap().is_none());
        assert!(f.publisher.events().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_refused_after_ttl() {
        let f = fixture();
        let token = f.issuer.emit(Purpose::Deposit, None).await.unwrap();

        // Deposit hybrid TTL is 3600s; at the boundary the token is expired.
        f.clock.advance_seconds(3600);
        assert!(f.issuer.resolve(token.id).await.unwrap().is_none());
        assert!(f
            .publisher
            .events_of(EventKind::AddressTokenResolved)
            .is_empty());
    }

    #[tokio::test]
    async fn test_custom_policy_is_honored_at_resolve() {
        let f = fixture();

        // Deposit token issued under a custom time-based policy must not be
        // consumed, even though the deposit default is hybrid.
        let token = f
            .issuer
            .emit(Purpose::Deposit, Some(ExpirationPolicy::time_based(600)))
            .await
            .unwrap();

        assert!(f.issuer.resolve(token.id).await.unwrap().is_some());
        assert!(f.issuer.resolve(token.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_sweep_is_idempotent() {
        let f = fixture();

        let short = f.issuer.emit(Purpose::Deposit, None).await.unwrap();
        let long = f.issuer.emit(Purpose::Internal, None).await.unwrap();

        // Past the deposit TTL, before the internal one.
        f.clock.advance_seconds(3_601);

        assert_eq!(f.issuer.sweep_expired().await.unwrap(), 1);
        let expired = f.publisher.events_of(EventKind::AddressTokenExpired);
        assert_eq!(expired.len(), 1);
        let payload: crate::events::AddressTokenExpired = expired[0].payload_as().unwrap();
        assert_eq!(payload.token_id, short.id);
        assert_eq!(payload.reason, ExpiryReason::Ttl);

        // Second sweep: nothing left to do, no new event.
        assert_eq!(f.issuer.sweep_expired().await.unwrap(), 0);
        assert_eq!(
            f.publisher.events_of(EventKind::AddressTokenExpired).len(),
            1
        );

        // The long-lived token is untouched.
        assert!(f.issuer.resolve(long.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_concurrent_resolution_has_one_winner() {
        let f = fixture();
        let issuer = Arc::new(f.issuer);
        let token = issuer.emit(Purpose::Withdrawal, None).await.unwrap();

        let a = {
            let issuer = issuer.clone();
            let id = token.id;
            tokio::spawn(async move { issuer.resolve(id).await.unwrap() })
        };
        let b = {
            let issuer = issuer.clone();
            let id = token.id;
            tokio::spawn(async move { issuer.resolve(id).await.unwrap() })
        };

        let (a, b) = (a.await.unwrap(), b.await.unwrap());
        assert!(a.is_some() ^ b.is_some(), "exactly one resolution must win");
        assert_eq!(
            f.publisher.events_of(EventKind::AddressTokenResolved).len(),
            1
        );
    }
}

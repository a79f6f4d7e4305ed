// Demo Orchestrator - runs one full custody cycle end to end:
// deposit token, liquidity reservation, payout planning, batching,
// fulfillment, and a TTL sweep, with every event fanned out live.

use anyhow::Result;
use chain_feed::{ChainFeed, FeeEstimates, MockDataSource, TxId};
use event_router::{EventRouter, RecordingSink, TracingSink};
use payout_scheduler::{PayoutScheduler, SchedulePolicy, SchedulerConfig};
use pool_core::{
    InMemoryLedgerStore, LedgerConfig, LiquidityLedger, OsJitter, ReserveOutcome, SecureIdSource,
    SystemClock,
};
use rust_decimal_macros::dec;
use std::sync::Arc;
use token_issuer::{InMemoryTokenStore, IssuerConfig, Purpose, TokenIssuer};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    println!("\n=================================================");
    println!("  Cascade Rail - Custody Cycle Demo");
    println!("=================================================\n");

    // Shared capabilities and the event fabric.
    let clock = Arc::new(SystemClock);
    let ids = Arc::new(SecureIdSource);
    let router = Arc::new(EventRouter::new());
    let audit = Arc::new(RecordingSink::new());
    router.subscribe_all(Arc::new(TracingSink::new())).await;
    router.subscribe_all(audit.clone()).await;

    // Core services over in-memory reference stores.
    let ledger_config = LedgerConfig::default();
    let ledger = LiquidityLedger::new(
        Arc::new(InMemoryLedgerStore::new(ledger_config.opening_reserve())),
        router.clone(),
        ids.clone(),
        clock.clone(),
    );
    let issuer = TokenIssuer::new(
        IssuerConfig::default(),
        Arc::new(InMemoryTokenStore::new()),
        router.clone(),
        ids.clone(),
        clock.clone(),
    );
    let scheduler = PayoutScheduler::new(
        SchedulerConfig::default(),
        Arc::new(payout_scheduler::InMemoryPaymentStore::new()),
        router.clone(),
        ids.clone(),
        clock.clone(),
        Arc::new(OsJitter),
    );

    let chain_source = Arc::new(MockDataSource::new());
    chain_source.set_height(840_000);
    chain_source.set_fees(FeeEstimates {
        low: 2.0,
        medium: 6.0,
        high: 15.0,
    });
    let feed = ChainFeed::new(chain_source.clone(), router.clone(), clock.clone());

    // 1. Deposit arrives: emit a single-use deposit token and resolve it
    //    once the funding transaction confirms.
    let token = issuer.emit(Purpose::Deposit, None).await?;
    info!(token_id = %token.id, "deposit token handed to sender");

    let funding_tx = TxId::new("f3a9c4d1");
    chain_source.set_confirmations(&funding_tx, 6);
    chain_source.set_height(840_001);
    let height = feed.current_height().await?;
    info!(height, "chain tip");
    feed.observe_block(height, 2_450).await?;
    let confirmation = feed
        .check_confirmation(&funding_tx)
        .await?
        .expect("mock source knows the funding tx");
    info!(confirmations = confirmation.count, "funding confirmed");

    let resolved = issuer.resolve(token.id).await?;
    info!(
        consumed = resolved.map(|t| t.is_expired).unwrap_or(false),
        "deposit token resolved"
    );

    // 2. Reserve liquidity for the outbound obligation.
    let outcome = ledger.reserve(dec!(30)).await?;
    let obligation = match &outcome {
        ReserveOutcome::Reserved(obligation) => obligation.clone(),
        ReserveOutcome::InsufficientLiquidity { .. } => {
            anyhow::bail!("demo pool should have funds")
        }
    };
    let health = ledger.health().await?;
    info!(status = %health.status, utilization = health.utilization_rate, "pool health");

    // 3. Plan payouts under randomized timing and batch them.
    feed.refresh_fee_estimates().await?;
    for amount in [dec!(12), dec!(10), dec!(8)] {
        scheduler
            .plan_payment(amount, SchedulePolicy::random_window())
            .await?;
    }
    let batch = scheduler
        .create_batch()
        .await?
        .expect("three payouts queued");
    scheduler.begin_batch(batch.id).await?;
    for payment_id in &batch.payment_ids {
        scheduler
            .record_execution(*payment_id, Some(batch.id), true)
            .await?;
    }
    scheduler.finish_batch(batch.id, true).await?;

    // 4. Fulfill the obligation (funds leave the pool) and sweep tokens.
    ledger.fulfill(obligation.id).await?;
    let swept = issuer.sweep_expired().await?;

    let health = ledger.health().await?;
    println!("\n------------------- summary ---------------------");
    println!("  obligation fulfilled : {}", obligation.id);
    println!("  batch executed       : {} payments", batch.payment_count());
    println!("  tokens swept         : {}", swept);
    println!("  pool status          : {}", health.status);
    println!("  events fanned out    : {}", audit.events().len());
    println!("-------------------------------------------------\n");

    Ok(())
}

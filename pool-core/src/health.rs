//! Pure pool health evaluation
//!
//! Maps a reserve snapshot to a health classification. Thresholds are
//! evaluated independently; a reserve may breach several at once. Status
//! resolution, in priority order: any `pause` breach means critical, any
//! `alert`/`rebalance` breach means warning, otherwise healthy.

use crate::types::{
    HealthStatus, PoolHealth, Reserve, Threshold, ThresholdAction, ThresholdKind,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Default threshold table: 10% minimum reserve, 20% warning level,
/// 90% maximum utilization.
pub fn default_thresholds() -> Vec<Threshold> {
    vec![
        Threshold {
            kind: ThresholdKind::Minimum,
            value: Decimal::new(10, 2),
            action: ThresholdAction::Pause,
        },
        Threshold {
            kind: ThresholdKind::Warning,
            value: Decimal::new(20, 2),
            action: ThresholdAction::Alert,
        },
        Threshold {
            kind: ThresholdKind::Maximum,
            value: Decimal::new(90, 2),
            action: ThresholdAction::Rebalance,
        },
    ]
}

/// Evaluate pool health against the default thresholds.
///
/// `pending_obligations` is left at zero; the ledger fills it in.
pub fn evaluate(reserve: &Reserve) -> PoolHealth {
    evaluate_with(reserve, &default_thresholds())
}

/// Evaluate pool health against an explicit threshold table
pub fn evaluate_with(reserve: &Reserve, thresholds: &[Threshold]) -> PoolHealth {
    // An empty pool has no meaningful rates and breaches nothing.
    if reserve.total_amount <= Decimal::ZERO {
        return PoolHealth {
            status: HealthStatus::Healthy,
            utilization_rate: 0.0,
            pending_obligations: 0,
            threshold_breaches: Vec::new(),
        };
    }

    let utilization_rate = reserve.reserved_amount / reserve.total_amount;
    let available_rate = reserve.available_amount / reserve.total_amount;

    let threshold_breaches: Vec<Threshold> = thresholds
        .iter()
        .filter(|t| match t.kind {
            ThresholdKind::Minimum | ThresholdKind::Warning => available_rate < t.value,
            ThresholdKind::Maximum => utilization_rate > t.value,
        })
        .cloned()
        .collect();

    let status = if threshold_breaches
        .iter()
        .any(|b| b.action == ThresholdAction::Pause)
    {
        HealthStatus::Critical
    } else if threshold_breaches.iter().any(|b| {
        matches!(
            b.action,
            ThresholdAction::Alert | ThresholdAction::Rebalance
        )
    }) {
        HealthStatus::Warning
    } else {
        HealthStatus::Healthy
    };

    PoolHealth {
        status,
        utilization_rate: utilization_rate.to_f64().unwrap_or(0.0),
        pending_obligations: 0,
        threshold_breaches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Currency;
    use rust_decimal_macros::dec;

    fn reserve(total: Decimal, available: Decimal, reserved: Decimal) -> Reserve {
        Reserve {
            total_amount: total,
            available_amount: available,
            reserved_amount: reserved,
            currency: Currency::Btc,
        }
    }

    #[test]
    fn test_healthy_pool() {
        // Scenario A rates: available .70, utilization .30
        let health = evaluate(&reserve(dec!(100), dec!(70), dec!(30)));
        assert_eq!(health.status, HealthStatus::Healthy);
        assert!((health.utilization_rate - 0.30).abs() < 1e-9);
        assert!(health.threshold_breaches.is_empty());
    }

    #[test]
    fn test_critical_below_minimum() {
        // Scenario B rates: available .05 < .10
        let health = evaluate(&reserve(dec!(100), dec!(5), dec!(95)));
        assert_eq!(health.status, HealthStatus::Critical);
        assert!((health.utilization_rate - 0.95).abs() < 1e-9);
    }

    #[test]
    fn test_warning_below_warning_level() {
        // available .15: warning threshold breached, minimum not
        let health = evaluate(&reserve(dec!(100), dec!(15), dec!(85)));
        assert_eq!(health.status, HealthStatus::Warning);
        assert_eq!(health.threshold_breaches.len(), 1);
        assert_eq!(health.threshold_breaches[0].kind, ThresholdKind::Warning);
    }

    #[test]
    fn test_warning_on_high_utilization() {
        // utilization .92 > .90 while available .08 < .10: both breached,
        // pause wins the priority resolution
        let health = evaluate(&reserve(dec!(100), dec!(8), dec!(92)));
        assert_eq!(health.status, HealthStatus::Critical);
        assert_eq!(health.threshold_breaches.len(), 3);
    }

    #[test]
    fn test_boundaries_are_strict() {
        // available exactly .10 and utilization exactly .90: no breach
        let health = evaluate(&reserve(dec!(100), dec!(10), dec!(90)));
        assert_eq!(health.status, HealthStatus::Warning); // .10 < .20 warning only
        assert_eq!(health.threshold_breaches.len(), 1);
        assert_eq!(health.threshold_breaches[0].kind, ThresholdKind::Warning);
    }

    #[test]
    fn test_empty_pool_is_healthy() {
        let health = evaluate(&reserve(Decimal::ZERO, Decimal::ZERO, Decimal::ZERO));
        assert_eq!(health.status, HealthStatus::Healthy);
        assert_eq!(health.utilization_rate, 0.0);
        assert!(health.threshold_breaches.is_empty());
    }
}

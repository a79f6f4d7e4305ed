//! Randomness capabilities: identifiers and delay jitter
//!
//! Both are injected so tests run deterministically. Production sources draw
//! from OS entropy; identifiers carry 128 bits, and delay sampling is
//! uniform (no modulo bias) so payout timing resists correlation analysis.

use rand::{rngs::OsRng, Rng};
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Identifier source
pub trait IdSource: Send + Sync {
    /// Draw a fresh identifier
    fn next_id(&self) -> Uuid;
}

/// Identifiers from OS entropy (UUIDv4)
#[derive(Debug, Default, Clone, Copy)]
pub struct SecureIdSource;

impl IdSource for SecureIdSource {
    fn next_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Deterministic identifiers for tests
#[derive(Debug, Default)]
pub struct SequentialIdSource {
    counter: AtomicU64,
}

impl SequentialIdSource {
    /// Create a source counting from 1
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdSource for SequentialIdSource {
    fn next_id(&self) -> Uuid {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        Uuid::from_u128(n as u128)
    }
}

/// Uniform delay sampling over `[min, max)` seconds
pub trait Jitter: Send + Sync {
    /// Sample a delay; when the range is empty, returns `min`
    fn delay_seconds(&self, min: u64, max: u64) -> u64;
}

/// Jitter drawn from OS entropy
#[derive(Debug, Default, Clone, Copy)]
pub struct OsJitter;

impl Jitter for OsJitter {
    fn delay_seconds(&self, min: u64, max: u64) -> u64 {
        if max <= min {
            return min;
        }
        OsRng.gen_range(min..max)
    }
}

/// Fixed jitter for tests, clamped into the requested range
#[derive(Debug, Clone, Copy)]
pub struct FixedJitter(pub u64);

impl Jitter for FixedJitter {
    fn delay_seconds(&self, min: u64, max: u64) -> u64 {
        if max <= min {
            return min;
        }
        self.0.clamp(min, max - 1)
    }
}

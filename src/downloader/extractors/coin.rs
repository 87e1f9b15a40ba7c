// Randomness source for the mock resolver
//
// Injected so tests can pin the carousel/image branch.

use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::warn;

/// Uniform draw in `[0, 1)`
pub trait Coin: Send + Sync {
    fn draw(&self) -> f64;
}

/// OS entropy
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCoin;

impl Coin for SystemCoin {
    fn draw(&self) -> f64 {
        let mut buf = [0u8; 8];
        if let Err(e) = getrandom::fill(&mut buf) {
            warn!(error = %e, "entropy source unavailable, using 0.0");
            return 0.0;
        }
        // 53 high bits -> exact f64 mantissa
        (u64::from_le_bytes(buf) >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Always returns the same value
#[derive(Debug, Clone, Copy)]
pub struct FixedCoin(pub f64);

impl Coin for FixedCoin {
    fn draw(&self) -> f64 {
        self.0
    }
}

/// Cycles through a fixed list of draws
#[derive(Debug)]
pub struct SequenceCoin {
    values: Vec<f64>,
    next: AtomicUsize,
}

impl SequenceCoin {
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            next: AtomicUsize::new(0),
        }
    }
}

impl Coin for SequenceCoin {
    fn draw(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let i = self.next.fetch_add(1, Ordering::Relaxed);
        self.values[i % self.values.len()]
    }
}

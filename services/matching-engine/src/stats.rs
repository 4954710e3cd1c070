//! Engine activity counters
//!
//! Atomic counters so readers can sample statistics without touching the
//! engine's write path.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

use types::numeric::Quantity;

/// Running totals for one engine instance.
#[derive(Debug, Default)]
pub struct EngineStats {
    orders_added: AtomicU64,
    orders_cancelled: AtomicU64,
    orders_replaced: AtomicU64,
    trades: AtomicU64,
    volume: AtomicU64,
    rejected: AtomicU64,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub orders_added: u64,
    pub orders_cancelled: u64,
    pub orders_replaced: u64,
    pub trades: u64,
    pub volume: u64,
    pub rejected: u64,
}

impl EngineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_added(&self) {
        self.orders_added.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cancelled(&self) {
        self.orders_cancelled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_replaced(&self) {
        self.orders_replaced.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_trade(&self, quantity: Quantity) {
        self.trades.fetch_add(1, Ordering::Relaxed);
        self.volume.fetch_add(quantity.value(), Ordering::Relaxed);
    }

    pub fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn orders_added(&self) -> u64 {
        self.orders_added.load(Ordering::Relaxed)
    }

    pub fn orders_cancelled(&self) -> u64 {
        self.orders_cancelled.load(Ordering::Relaxed)
    }

    pub fn orders_replaced(&self) -> u64 {
        self.orders_replaced.load(Ordering::Relaxed)
    }

    pub fn trades(&self) -> u64 {
        self.trades.load(Ordering::Relaxed)
    }

    pub fn volume(&self) -> u64 {
        self.volume.load(Ordering::Relaxed)
    }

    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            orders_added: self.orders_added(),
            orders_cancelled: self.orders_cancelled(),
            orders_replaced: self.orders_replaced(),
            trades: self.trades(),
            volume: self.volume(),
            rejected: self.rejected(),
        }
    }

    pub fn reset(&self) {
        self.orders_added.store(0, Ordering::Relaxed);
        self.orders_cancelled.store(0, Ordering::Relaxed);
        self.orders_replaced.store(0, Ordering::Relaxed);
        self.trades.store(0, Ordering::Relaxed);
        self.volume.store(0, Ordering::Relaxed);
        self.rejected.store(0, Ordering::Relaxed);
    }
}

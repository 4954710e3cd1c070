//! Aggregated market depth
//!
//! Snapshots the top N price levels of each side and diffs consecutive
//! snapshots slot by slot, producing the change records depth listeners
//! consume. Slot k always holds the k-th best price at capture time;
//! unused tail slots stay zeroed.

use serde::{Deserialize, Serialize};

use types::numeric::{Price, Quantity};

use crate::book::SideBook;

/// Number of levels tracked per side unless parameterised otherwise.
pub const DEFAULT_DEPTH: usize = 10;

/// One aggregated level of market depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthLevel {
    pub price: Price,
    pub quantity: Quantity,
    pub order_count: usize,
}

impl DepthLevel {
    pub const EMPTY: DepthLevel = DepthLevel {
        price: Price::MARKET,
        quantity: Quantity::ZERO,
        order_count: 0,
    };

    pub fn is_empty(&self) -> bool {
        self.quantity.is_zero()
    }
}

impl Default for DepthLevel {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// A slot that differed between two consecutive snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthChange {
    pub is_bid: bool,
    /// Slot index, 0 = best
    pub index: usize,
    /// Price of the occupied snapshot; a vacated slot keeps its old price
    pub price: Price,
    pub old_quantity: Quantity,
    pub new_quantity: Quantity,
    pub old_count: usize,
    pub new_count: usize,
}

impl DepthChange {
    /// Signed quantity movement at this slot.
    pub fn delta(&self) -> i64 {
        self.new_quantity.value() as i64 - self.old_quantity.value() as i64
    }
}

/// Top-N depth aggregator with previous-snapshot diffing.
#[derive(Debug, Clone)]
pub struct DepthTracker<const N: usize = DEFAULT_DEPTH> {
    bids: [DepthLevel; N],
    asks: [DepthLevel; N],
    prev_bids: [DepthLevel; N],
    prev_asks: [DepthLevel; N],
    changes: Vec<DepthChange>,
}

impl<const N: usize> DepthTracker<N> {
    pub fn new() -> Self {
        Self {
            bids: [DepthLevel::EMPTY; N],
            asks: [DepthLevel::EMPTY; N],
            prev_bids: [DepthLevel::EMPTY; N],
            prev_asks: [DepthLevel::EMPTY; N],
            changes: Vec::new(),
        }
    }

    /// Capture both sides and diff against the previous capture.
    ///
    /// Applied twice without an intervening book mutation, the second call
    /// yields no changes.
    pub fn update_from(&mut self, bids: &SideBook, asks: &SideBook) -> &[DepthChange] {
        self.prev_bids = self.bids;
        self.prev_asks = self.asks;
        self.bids = [DepthLevel::EMPTY; N];
        self.asks = [DepthLevel::EMPTY; N];

        capture(&mut self.bids, bids);
        capture(&mut self.asks, asks);

        self.changes.clear();
        diff(true, &self.prev_bids, &self.bids, &mut self.changes);
        diff(false, &self.prev_asks, &self.asks, &mut self.changes);
        &self.changes
    }

    /// Changes produced by the last capture.
    pub fn changes(&self) -> &[DepthChange] {
        &self.changes
    }

    pub fn bid_levels(&self) -> &[DepthLevel] {
        &self.bids
    }

    pub fn ask_levels(&self) -> &[DepthLevel] {
        &self.asks
    }

    pub fn best_bid(&self) -> Option<DepthLevel> {
        (!self.bids[0].is_empty()).then_some(self.bids[0])
    }

    pub fn best_ask(&self) -> Option<DepthLevel> {
        (!self.asks[0].is_empty()).then_some(self.asks[0])
    }

    /// Best ask minus best bid; undefined unless both sides are populated.
    pub fn spread(&self) -> Option<Price> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask.price - bid.price),
            _ => None,
        }
    }

    /// Integer midpoint of the best prices. A one-sided book yields that
    /// side's best; an empty book yields zero.
    pub fn mid_price(&self) -> Price {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Price::from_ticks((bid.price.ticks() + ask.price.ticks()) / 2),
            (Some(bid), None) => bid.price,
            (None, Some(ask)) => ask.price,
            (None, None) => Price::MARKET,
        }
    }

    /// Depth-weighted liquidity: quantity at slot k contributes 1/(k+1).
    pub fn liquidity_score(&self) -> f64 {
        let side_score = |levels: &[DepthLevel]| -> f64 {
            levels
                .iter()
                .enumerate()
                .map(|(i, level)| level.quantity.value() as f64 / (i + 1) as f64)
                .sum()
        };
        side_score(&self.bids) + side_score(&self.asks)
    }

    /// Spread as a percentage of the best bid; zero unless two-sided.
    pub fn spread_percentage(&self) -> f64 {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => {
                100.0 * (ask.price.ticks() - bid.price.ticks()) as f64 / bid.price.ticks() as f64
            }
            _ => 0.0,
        }
    }
}

impl<const N: usize> Default for DepthTracker<N> {
    fn default() -> Self {
        Self::new()
    }
}

fn capture<const N: usize>(slots: &mut [DepthLevel; N], book: &SideBook) {
    for (slot, level) in slots.iter_mut().zip(book.levels_best_first()) {
        *slot = DepthLevel {
            price: level.price(),
            quantity: level.total_quantity(),
            order_count: level.order_count(),
        };
    }
}

fn diff<const N: usize>(
    is_bid: bool,
    previous: &[DepthLevel; N],
    current: &[DepthLevel; N],
    changes: &mut Vec<DepthChange>,
) {
    for index in 0..N {
        let old = previous[index];
        let new = current[index];
        if old == new {
            continue;
        }
        let price = if new.is_empty() { old.price } else { new.price };
        changes.push(DepthChange {
            is_bid,
            index,
            price,
            old_quantity: old.quantity,
            new_quantity: new.quantity,
            old_count: old.order_count,
            new_count: new.order_count,
        });
    }
}

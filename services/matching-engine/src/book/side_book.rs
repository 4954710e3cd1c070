//! One side of the order book
//!
//! A side book keeps its price levels in a `BTreeMap` for deterministic,
//! price-ordered iteration, plus an id-to-price index so a cancel or amend
//! reaches its level without walking the book. The buy side treats the
//! highest price as best, the sell side the lowest.

use std::collections::{BTreeMap, HashMap};

use types::errors::EngineError;
use types::ids::OrderId;
use types::numeric::{Price, Quantity};
use types::order::{Order, Side};

use super::price_level::{LevelFill, PriceLevel};
use crate::matching::crossing;
use crate::matching::plan::{MatchCandidate, MatchPlan};

/// Price-ordered levels for one side plus the cancel index.
///
/// Index invariant: every entry of `locations` names a level that exists
/// and contains the order, and the order's price equals the stored key.
#[derive(Debug, Clone)]
pub struct SideBook {
    side: Side,
    levels: BTreeMap<Price, PriceLevel>,
    locations: HashMap<OrderId, Price>,
}

/// Outcome of an in-place quantity amendment.
#[derive(Debug, Clone)]
pub enum AmendResult {
    /// Quantity changed in place, priority kept
    Amended { order: Order, previous: Quantity },
    /// Amendment to zero removed the order
    Removed { order: Order },
}

impl SideBook {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
            locations: HashMap::new(),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn order_count(&self) -> usize {
        self.locations.len()
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn contains(&self, order_id: &OrderId) -> bool {
        self.locations.contains_key(order_id)
    }

    /// Look up a resting order.
    pub fn get(&self, order_id: &OrderId) -> Option<&Order> {
        let price = self.locations.get(order_id)?;
        self.levels
            .get(price)
            .and_then(|level| level.orders().find(|o| &o.id == order_id))
    }

    /// Insert an order at its limit price, creating the level if absent.
    pub fn add(&mut self, order: Order) -> Result<(), EngineError> {
        if self.locations.contains_key(&order.id) {
            return Err(EngineError::DuplicateOrder(order.id));
        }

        self.locations.insert(order.id, order.price);
        self.levels
            .entry(order.price)
            .or_insert_with(|| PriceLevel::new(order.price))
            .add(order);
        Ok(())
    }

    /// Remove an order, erasing its level if that leaves it empty.
    pub fn remove(&mut self, order_id: &OrderId) -> Option<Order> {
        let price = self.locations.remove(order_id)?;

        let Some(level) = self.levels.get_mut(&price) else {
            report_integrity(order_id, price, "indexed level is missing");
            return None;
        };
        let Some(order) = level.remove(order_id) else {
            report_integrity(order_id, price, "indexed order not in its level");
            return None;
        };

        if level.is_empty() {
            self.levels.remove(&price);
        }
        Some(order)
    }

    /// Change an order's open quantity in place. Zero is a removal.
    pub fn amend_quantity(&mut self, order_id: &OrderId, new_qty: Quantity) -> Option<AmendResult> {
        if new_qty.is_zero() {
            return self
                .remove(order_id)
                .map(|order| AmendResult::Removed { order });
        }

        let price = *self.locations.get(order_id)?;
        let Some(level) = self.levels.get_mut(&price) else {
            report_integrity(order_id, price, "indexed level is missing");
            return None;
        };
        let previous = level.update_quantity(order_id, new_qty)?;
        let order = level.orders().find(|o| &o.id == order_id)?.clone();
        Some(AmendResult::Amended { order, previous })
    }

    /// Best price: highest bid or lowest ask.
    pub fn best_price(&self) -> Option<Price> {
        match self.side {
            Side::Buy => self.levels.keys().next_back().copied(),
            Side::Sell => self.levels.keys().next().copied(),
        }
    }

    /// Level at the best price.
    pub fn best_level(&self) -> Option<&PriceLevel> {
        match self.side {
            Side::Buy => self.levels.values().next_back(),
            Side::Sell => self.levels.values().next(),
        }
    }

    /// Levels from best to worst.
    pub fn levels_best_first(&self) -> Box<dyn Iterator<Item = &PriceLevel> + '_> {
        match self.side {
            Side::Buy => Box::new(self.levels.values().rev()),
            Side::Sell => Box::new(self.levels.values()),
        }
    }

    /// Plan candidate fills against this side without mutating anything.
    ///
    /// Walks levels best-first and orders FIFO within each level, capping
    /// each candidate at the quantity still wanted. `limit` of `None` means
    /// no price constraint (a market order). The caller commits fills
    /// separately, after any feasibility checks.
    pub fn match_quantity(&self, limit: Option<Price>, max_quantity: Quantity) -> MatchPlan {
        let mut candidates = Vec::new();
        let mut remaining = max_quantity;

        for level in self.levels_best_first() {
            if remaining.is_zero() {
                break;
            }
            // prices only get worse from here, so the walk can stop
            if !crossing::level_eligible(self.side, level.price(), limit) {
                break;
            }

            for order in level.orders() {
                if remaining.is_zero() {
                    break;
                }
                let quantity = order.open_quantity.min(remaining);
                candidates.push(MatchCandidate {
                    order_id: order.id,
                    price: level.price(),
                    available: order.open_quantity,
                    quantity,
                });
                remaining -= quantity;
            }
        }

        MatchPlan::new(candidates)
    }

    /// Consume up to `quantity` from the level at `price` in FIFO order.
    pub fn fill_at(&mut self, price: Price, quantity: Quantity) -> Vec<LevelFill> {
        let Some(level) = self.levels.get_mut(&price) else {
            return Vec::new();
        };

        let (_, fills) = level.fill(quantity);
        for fill in &fills {
            if fill.completed {
                self.locations.remove(&fill.order.id);
            }
        }
        if level.is_empty() {
            self.levels.remove(&price);
        }
        fills
    }

    /// Charge one specific resting order.
    pub fn fill_order(&mut self, order_id: &OrderId, quantity: Quantity) -> Option<LevelFill> {
        let price = *self.locations.get(order_id)?;
        let level = self.levels.get_mut(&price)?;

        let fill = level.fill_order(order_id, quantity)?;
        if fill.completed {
            self.locations.remove(order_id);
        }
        if level.is_empty() {
            self.levels.remove(&price);
        }
        Some(fill)
    }

    /// Remove every order matching the predicate, returning them.
    pub fn remove_where(&mut self, predicate: impl Fn(&Order) -> bool) -> Vec<Order> {
        let ids: Vec<OrderId> = self
            .levels
            .values()
            .flat_map(|level| level.orders())
            .filter(|order| predicate(order))
            .map(|order| order.id)
            .collect();

        ids.iter().filter_map(|id| self.remove(id)).collect()
    }

    /// Recompute every aggregate and index relation from scratch.
    ///
    /// Meant for debug assertions and tests; the hot path maintains these
    /// incrementally.
    pub fn check_integrity(&self) -> Result<(), EngineError> {
        let mut indexed = 0usize;

        for (price, level) in &self.levels {
            if level.is_empty() {
                return Err(EngineError::IntegrityViolation(format!(
                    "empty level persisted at {price}"
                )));
            }
            if level.price() != *price {
                return Err(EngineError::IntegrityViolation(format!(
                    "level keyed at {price} reports price {}",
                    level.price()
                )));
            }

            let total: Quantity = level.orders().map(|o| o.open_quantity).sum();
            if total != level.total_quantity() {
                return Err(EngineError::IntegrityViolation(format!(
                    "level {price} caches {} but holds {total}",
                    level.total_quantity()
                )));
            }

            for order in level.orders() {
                indexed += 1;
                if order.price != *price {
                    return Err(EngineError::IntegrityViolation(format!(
                        "order {} at level {price} carries price {}",
                        order.id, order.price
                    )));
                }
                if self.locations.get(&order.id) != Some(price) {
                    return Err(EngineError::IntegrityViolation(format!(
                        "order {} not indexed at its level {price}",
                        order.id
                    )));
                }
                if order.open_quantity.is_zero() {
                    return Err(EngineError::IntegrityViolation(format!(
                        "order {} rests with zero open quantity",
                        order.id
                    )));
                }
            }
        }

        if indexed != self.locations.len() {
            return Err(EngineError::IntegrityViolation(format!(
                "{} orders in levels but {} indexed",
                indexed,
                self.locations.len()
            )));
        }
        Ok(())
    }

}

fn report_integrity(order_id: &OrderId, price: Price, detail: &str) {
    tracing::warn!(%order_id, %price, detail, "side book integrity violation");
    debug_assert!(false, "side book integrity violation: {detail}");
}

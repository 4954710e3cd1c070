//! Resting place for untriggered stop orders
//!
//! Stop orders are keyed by trigger price rather than limit price, so they
//! live in their own container. A stop-buy triggers when the market price
//! rises to its stop price; a stop-sell when the market price falls to it.
//! Draining returns orders in trigger order: ascending stop prices for
//! buys, descending for sells, FIFO within a price.

use std::collections::{BTreeMap, HashMap, VecDeque};

use types::ids::OrderId;
use types::numeric::Price;
use types::order::{Order, Side};

#[derive(Debug, Clone)]
pub struct StopBook {
    side: Side,
    /// Trigger price to waiting orders, FIFO within each price
    levels: BTreeMap<Price, VecDeque<Order>>,
    locations: HashMap<OrderId, Price>,
}

impl StopBook {
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

    pub fn contains(&self, order_id: &OrderId) -> bool {
        self.locations.contains_key(order_id)
    }

    pub fn get(&self, order_id: &OrderId) -> Option<&Order> {
        let price = self.locations.get(order_id)?;
        self.levels
            .get(price)
            .and_then(|queue| queue.iter().find(|o| &o.id == order_id))
    }

    pub fn add(&mut self, order: Order) {
        debug_assert!(order.is_stop(), "stop book only holds stop orders");
        self.locations.insert(order.id, order.stop_price);
        self.levels
            .entry(order.stop_price)
            .or_default()
            .push_back(order);
    }

    pub fn remove(&mut self, order_id: &OrderId) -> Option<Order> {
        let price = self.locations.remove(order_id)?;
        let queue = self.levels.get_mut(&price)?;
        let position = queue.iter().position(|o| &o.id == order_id)?;
        let order = queue.remove(position)?;
        if queue.is_empty() {
            self.levels.remove(&price);
        }
        Some(order)
    }

    /// Drain every stop whose trigger is crossed at `market_price`,
    /// in trigger order.
    pub fn take_triggered(&mut self, market_price: Price) -> Vec<Order> {
        let triggered_prices: Vec<Price> = match self.side {
            // stop-buys fire once the market rises to the stop price
            Side::Buy => self
                .levels
                .range(..=market_price)
                .map(|(price, _)| *price)
                .collect(),
            // stop-sells fire once the market falls to the stop price
            Side::Sell => self
                .levels
                .range(market_price..)
                .rev()
                .map(|(price, _)| *price)
                .collect(),
        };

        let mut triggered = Vec::new();
        for price in triggered_prices {
            if let Some(queue) = self.levels.remove(&price) {
                for order in &queue {
                    self.locations.remove(&order.id);
                }
                triggered.extend(queue);
            }
        }
        triggered
    }

    /// Remove every order matching the predicate, returning them.
    pub fn remove_where(&mut self, predicate: impl Fn(&Order) -> bool) -> Vec<Order> {
        let ids: Vec<OrderId> = self
            .levels
            .values()
            .flat_map(|queue| queue.iter())
            .filter(|order| predicate(order))
            .map(|order| order.id)
            .collect();

        ids.iter().filter_map(|id| self.remove(id)).collect()
    }
}

//! Price level with a FIFO order queue
//!
//! A price level holds every resting order at one price, in arrival order.
//! The aggregate quantity is maintained incrementally: every mutation
//! adjusts it in lockstep with the orders it describes, never by a rescan.

use std::collections::VecDeque;
use types::ids::OrderId;
use types::numeric::{Price, Quantity};
use types::order::{Order, OrderStatus};

/// All resting orders at a single price, first-in-first-out.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    price: Price,
    /// Orders in time priority (front matches first)
    orders: VecDeque<Order>,
    /// Cached sum of open quantities across the queue
    total_quantity: Quantity,
}

/// Outcome of charging one resting order during a fill.
#[derive(Debug, Clone)]
pub struct LevelFill {
    /// Snapshot of the resting order after the charge
    pub order: Order,
    /// Quantity taken from it
    pub quantity: Quantity,
    /// True when the order was completely consumed and left the level
    pub completed: bool,
}

impl PriceLevel {
    pub fn new(price: Price) -> Self {
        Self {
            price,
            orders: VecDeque::new(),
            total_quantity: Quantity::ZERO,
        }
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn total_quantity(&self) -> Quantity {
        self.total_quantity
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Orders in time priority.
    pub fn orders(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    /// First order in time priority.
    pub fn front(&self) -> Option<&Order> {
        self.orders.front()
    }

    /// Append an order at the back of the queue.
    pub fn add(&mut self, order: Order) {
        debug_assert_eq!(order.price, self.price, "order price must match its level");
        self.total_quantity += order.open_quantity;
        self.orders.push_back(order);
    }

    /// Remove an order by id, returning it.
    pub fn remove(&mut self, order_id: &OrderId) -> Option<Order> {
        let position = self.orders.iter().position(|o| &o.id == order_id)?;
        let order = self.orders.remove(position)?;
        self.total_quantity -= order.open_quantity;
        Some(order)
    }

    /// Change an order's open quantity in place, returning the previous
    /// value. The new quantity must be positive; a zero amendment goes
    /// through `remove` instead.
    pub fn update_quantity(&mut self, order_id: &OrderId, new_qty: Quantity) -> Option<Quantity> {
        debug_assert!(!new_qty.is_zero(), "zero amendment must route to remove");
        let order = self.orders.iter_mut().find(|o| &o.id == order_id)?;
        let old_qty = order.open_quantity;
        order.open_quantity = new_qty;
        self.total_quantity = self.total_quantity - old_qty + new_qty;
        Some(old_qty)
    }

    /// Consume up to `max_quantity` walking the queue in time priority.
    ///
    /// Each order is charged `min(open, remaining)`. An order reaching zero
    /// becomes `Filled` and leaves the level; anything else becomes
    /// `PartiallyFilled`. Ties break strictly by arrival order.
    pub fn fill(&mut self, max_quantity: Quantity) -> (Quantity, Vec<LevelFill>) {
        let mut filled = Quantity::ZERO;
        let mut fills = Vec::new();

        while filled < max_quantity {
            let Some(order) = self.orders.front_mut() else {
                break;
            };

            let fill_qty = order.open_quantity.min(max_quantity - filled);
            order.open_quantity -= fill_qty;
            filled += fill_qty;
            self.total_quantity -= fill_qty;

            if order.open_quantity.is_zero() {
                order.status = OrderStatus::Filled;
                let order = self.orders.pop_front().expect("front exists");
                fills.push(LevelFill {
                    order,
                    quantity: fill_qty,
                    completed: true,
                });
            } else {
                order.status = OrderStatus::PartiallyFilled;
                fills.push(LevelFill {
                    order: order.clone(),
                    quantity: fill_qty,
                    completed: false,
                });
                // the front still has open quantity, so max_quantity is spent
                break;
            }
        }

        (filled, fills)
    }

    /// Charge one specific order, regardless of queue position.
    pub fn fill_order(&mut self, order_id: &OrderId, quantity: Quantity) -> Option<LevelFill> {
        let position = self.orders.iter().position(|o| &o.id == order_id)?;
        let order = &mut self.orders[position];

        let fill_qty = order.open_quantity.min(quantity);
        order.open_quantity -= fill_qty;
        self.total_quantity -= fill_qty;

        if order.open_quantity.is_zero() {
            order.status = OrderStatus::Filled;
            let order = self.orders.remove(position).expect("position exists");
            Some(LevelFill {
                order,
                quantity: fill_qty,
                completed: true,
            })
        } else {
            order.status = OrderStatus::PartiallyFilled;
            Some(LevelFill {
                order: order.clone(),
                quantity: fill_qty,
                completed: false,
            })
        }
    }
}

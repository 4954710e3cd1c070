//! Order lifecycle types
//!
//! An order is a value record: identity, static parameters, and the mutable
//! state the engine drives through the lifecycle. All validation and state
//! transitions are the engine's responsibility; the order itself carries no
//! business logic beyond derived predicates.

use crate::ids::{OrderId, Symbol};
use crate::numeric::{Price, Quantity};
use crate::timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use std::ops::BitOr;
use thiserror::Error;

/// Order side (buyer or seller).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order (bid)
    Buy,
    /// Sell order (ask)
    Sell,
}

impl Side {
    /// Get the opposite side.
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// Supported order types.
///
/// Stop and stop-limit orders rest in a trigger book and convert to market
/// and limit orders respectively when the market price crosses their stop
/// price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// Executes at a specified price or better
    Limit,
    /// Executes immediately at the best available price
    Market,
    /// Converts to a market order once the trigger price is hit
    Stop,
    /// Converts to a limit order once the trigger price is hit
    StopLimit,
}

/// Time-in-force policy governing an order's resting lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeInForce {
    /// Good-till-cancel: rests until filled or explicitly cancelled
    Gtc,
    /// Immediate-or-cancel: match immediately, cancel the remainder
    Ioc,
    /// Fill-or-kill: complete fill or nothing at all
    Fok,
    /// Rests for the trading day; eviction is driven by the embedding
    Day,
}

/// Order lifecycle states. Filled, Cancelled, Rejected, and Replaced are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Received, not yet validated
    Pending,
    /// Passed validation, live in the engine
    Accepted,
    /// Some quantity executed, remainder still open
    PartiallyFilled,
    /// Completely executed
    Filled,
    /// Cancelled before completion
    Cancelled,
    /// Failed validation
    Rejected,
    /// Retired by a replace; a successor order carries a fresh id
    Replaced,
}

impl OrderStatus {
    /// Check if the status permits no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Filled
                | OrderStatus::Cancelled
                | OrderStatus::Rejected
                | OrderStatus::Replaced
        )
    }
}

/// Special execution conditions, combinable as a bitmask.
///
/// `ALL_OR_NONE` skips resting orders too small to satisfy the aggressor in
/// one shot; combined with `IMMEDIATE_OR_CANCEL` it composes into
/// fill-or-kill behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderConditions(u32);

impl OrderConditions {
    pub const NONE: OrderConditions = OrderConditions(0);
    pub const ALL_OR_NONE: OrderConditions = OrderConditions(1);
    pub const IMMEDIATE_OR_CANCEL: OrderConditions = OrderConditions(1 << 1);
    pub const FILL_OR_KILL: OrderConditions =
        OrderConditions(Self::ALL_OR_NONE.0 | Self::IMMEDIATE_OR_CANCEL.0);

    /// True when every bit of `flag` is set.
    pub const fn contains(self, flag: OrderConditions) -> bool {
        self.0 & flag.0 == flag.0 && flag.0 != 0
    }

    pub const fn bits(self) -> u32 {
        self.0
    }
}

impl BitOr for OrderConditions {
    type Output = OrderConditions;

    fn bitor(self, rhs: Self) -> Self::Output {
        OrderConditions(self.0 | rhs.0)
    }
}

/// Why an order failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectReason {
    #[error("order symbol does not match the engine instrument")]
    UnknownSymbol,

    #[error("order quantity must be positive")]
    InvalidQuantity,

    #[error("open quantity exceeds original quantity")]
    InvalidOpenQuantity,

    #[error("limit price must be positive")]
    InvalidPrice,

    #[error("stop price must be positive")]
    InvalidStopPrice,

    #[error("an order with this id is already live")]
    DuplicateOrderId,

    #[error("insufficient liquidity to fill or kill")]
    FillOrKillUnfillable,
}

/// A single order: identity, static parameters, and engine-driven state.
///
/// `quantity` is the original size and never changes; `open_quantity` only
/// decreases once the order is live. The containing price level mirrors
/// every open-quantity change in its cached aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub symbol: Symbol,
    pub side: Side,
    pub order_type: OrderType,
    pub time_in_force: TimeInForce,
    /// Original quantity
    pub quantity: Quantity,
    /// Currently unfilled quantity
    pub open_quantity: Quantity,
    /// Limit price; `Price::MARKET` for orders without one
    pub price: Price,
    /// Trigger price; meaningful for stop and stop-limit orders only
    pub stop_price: Price,
    pub status: OrderStatus,
    pub created_at: Timestamp,
}

impl Order {
    fn new(
        id: OrderId,
        symbol: Symbol,
        side: Side,
        order_type: OrderType,
        quantity: Quantity,
        price: Price,
        stop_price: Price,
    ) -> Self {
        Self {
            id,
            symbol,
            side,
            order_type,
            time_in_force: TimeInForce::Gtc,
            quantity,
            open_quantity: quantity,
            price,
            stop_price,
            status: OrderStatus::Pending,
            created_at: Timestamp::now(),
        }
    }

    /// Limit order at `price`.
    pub fn limit(id: OrderId, symbol: Symbol, side: Side, quantity: Quantity, price: Price) -> Self {
        Self::new(id, symbol, side, OrderType::Limit, quantity, price, Price::MARKET)
    }

    /// Market order; executes at the best available prices.
    pub fn market(id: OrderId, symbol: Symbol, side: Side, quantity: Quantity) -> Self {
        Self::new(
            id,
            symbol,
            side,
            OrderType::Market,
            quantity,
            Price::MARKET,
            Price::MARKET,
        )
    }

    /// Stop order; becomes a market order when `stop_price` triggers.
    pub fn stop(
        id: OrderId,
        symbol: Symbol,
        side: Side,
        quantity: Quantity,
        stop_price: Price,
    ) -> Self {
        Self::new(
            id,
            symbol,
            side,
            OrderType::Stop,
            quantity,
            Price::MARKET,
            stop_price,
        )
    }

    /// Stop-limit order; becomes a limit order at `price` when
    /// `stop_price` triggers.
    pub fn stop_limit(
        id: OrderId,
        symbol: Symbol,
        side: Side,
        quantity: Quantity,
        price: Price,
        stop_price: Price,
    ) -> Self {
        Self::new(id, symbol, side, OrderType::StopLimit, quantity, price, stop_price)
    }

    /// Override the default good-till-cancel policy.
    pub fn with_time_in_force(mut self, tif: TimeInForce) -> Self {
        self.time_in_force = tif;
        self
    }

    pub fn is_buy(&self) -> bool {
        self.side == Side::Buy
    }

    pub fn is_sell(&self) -> bool {
        self.side == Side::Sell
    }

    pub fn is_market(&self) -> bool {
        self.order_type == OrderType::Market
    }

    pub fn is_limit(&self) -> bool {
        self.order_type == OrderType::Limit
    }

    pub fn is_stop(&self) -> bool {
        matches!(self.order_type, OrderType::Stop | OrderType::StopLimit)
    }

    pub fn is_ioc(&self) -> bool {
        self.time_in_force == TimeInForce::Ioc
    }

    pub fn is_fok(&self) -> bool {
        self.time_in_force == TimeInForce::Fok
    }

    /// Quantity executed so far.
    pub fn filled_quantity(&self) -> Quantity {
        self.quantity - self.open_quantity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbol() -> Symbol {
        Symbol::new("AAPL")
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        assert_eq!(Side::Sell.opposite(), Side::Buy);
    }

    #[test]
    fn test_limit_order_creation() {
        let order = Order::limit(
            OrderId::new(1),
            symbol(),
            Side::Buy,
            Quantity::new(100),
            Price::from_ticks(15000),
        );

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.open_quantity, order.quantity);
        assert_eq!(order.time_in_force, TimeInForce::Gtc);
        assert!(order.is_buy());
        assert!(order.is_limit());
        assert!(!order.is_stop());
        assert!(order.filled_quantity().is_zero());
    }

    #[test]
    fn test_market_order_has_no_limit_price() {
        let order = Order::market(OrderId::new(2), symbol(), Side::Sell, Quantity::new(40));
        assert!(order.is_market());
        assert!(order.price.is_market());
    }

    #[test]
    fn test_stop_orders() {
        let stop = Order::stop(
            OrderId::new(3),
            symbol(),
            Side::Buy,
            Quantity::new(10),
            Price::from_ticks(14100),
        );
        assert!(stop.is_stop());
        assert!(stop.price.is_market());

        let stop_limit = Order::stop_limit(
            OrderId::new(4),
            symbol(),
            Side::Sell,
            Quantity::new(10),
            Price::from_ticks(14000),
            Price::from_ticks(14050),
        );
        assert!(stop_limit.is_stop());
        assert_eq!(stop_limit.price, Price::from_ticks(14000));
        assert_eq!(stop_limit.stop_price, Price::from_ticks(14050));
    }

    #[test]
    fn test_time_in_force_builder() {
        let order = Order::limit(
            OrderId::new(5),
            symbol(),
            Side::Buy,
            Quantity::new(50),
            Price::from_ticks(15000),
        )
        .with_time_in_force(TimeInForce::Ioc);

        assert!(order.is_ioc());
        assert!(!order.is_fok());
    }

    #[test]
    fn test_status_terminality() {
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::Accepted.is_terminal());
        assert!(!OrderStatus::PartiallyFilled.is_terminal());
        assert!(OrderStatus::Filled.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(OrderStatus::Rejected.is_terminal());
        assert!(OrderStatus::Replaced.is_terminal());
    }

    #[test]
    fn test_conditions_bitmask() {
        let fok = OrderConditions::ALL_OR_NONE | OrderConditions::IMMEDIATE_OR_CANCEL;
        assert_eq!(fok, OrderConditions::FILL_OR_KILL);
        assert!(fok.contains(OrderConditions::ALL_OR_NONE));
        assert!(fok.contains(OrderConditions::IMMEDIATE_OR_CANCEL));

        // the second bit must test positive on its own
        let ioc = OrderConditions::IMMEDIATE_OR_CANCEL;
        assert!(ioc.contains(OrderConditions::IMMEDIATE_OR_CANCEL));
        assert!(!ioc.contains(OrderConditions::ALL_OR_NONE));
        assert!(!OrderConditions::NONE.contains(OrderConditions::ALL_OR_NONE));
    }

    #[test]
    fn test_reject_reason_display() {
        assert_eq!(
            RejectReason::InvalidQuantity.to_string(),
            "order quantity must be positive"
        );
        assert_eq!(
            RejectReason::FillOrKillUnfillable.to_string(),
            "insufficient liquidity to fill or kill"
        );
    }

    #[test]
    fn test_order_serialization() {
        let order = Order::limit(
            OrderId::new(9),
            symbol(),
            Side::Sell,
            Quantity::new(25),
            Price::from_ticks(15100),
        );

        let json = serde_json::to_string(&order).unwrap();
        let back: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(back, order);
    }
}

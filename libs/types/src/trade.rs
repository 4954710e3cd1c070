//! Trade execution records
//!
//! A trade is the record of one fill between an aggressing (taker) order
//! and a resting (maker) order. The engine assigns a monotonic sequence
//! number per instance; the id is time-sortable on its own.

use crate::ids::{OrderId, Symbol, TradeId};
use crate::numeric::{Price, Quantity};
use crate::order::Side;
use crate::timestamp::Timestamp;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: TradeId,
    /// Monotonic per-engine sequence
    pub sequence: u64,
    pub symbol: Symbol,
    /// The aggressing order that initiated the cross
    pub taker_order_id: OrderId,
    /// The resting order that was hit or lifted
    pub maker_order_id: OrderId,
    /// Side of the taker
    pub taker_side: Side,
    /// Execution price, always the maker's price
    pub price: Price,
    pub quantity: Quantity,
    pub executed_at: Timestamp,
}

impl Trade {
    pub fn new(
        sequence: u64,
        symbol: Symbol,
        taker_order_id: OrderId,
        maker_order_id: OrderId,
        taker_side: Side,
        price: Price,
        quantity: Quantity,
    ) -> Self {
        Self {
            trade_id: TradeId::new(),
            sequence,
            symbol,
            taker_order_id,
            maker_order_id,
            taker_side,
            price,
            quantity,
            executed_at: Timestamp::now(),
        }
    }

    /// Notional value in ticks (price x quantity).
    pub fn value(&self) -> i128 {
        self.price.ticks() as i128 * self.quantity.value() as i128
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trade_creation() {
        let trade = Trade::new(
            7,
            Symbol::new("AAPL"),
            OrderId::new(2),
            OrderId::new(1),
            Side::Buy,
            Price::from_ticks(15000),
            Quantity::new(40),
        );

        assert_eq!(trade.sequence, 7);
        assert_eq!(trade.taker_order_id, OrderId::new(2));
        assert_eq!(trade.maker_order_id, OrderId::new(1));
        assert_eq!(trade.value(), 600_000);
    }

    #[test]
    fn test_trade_serialization() {
        let trade = Trade::new(
            1,
            Symbol::new("AAPL"),
            OrderId::new(5),
            OrderId::new(4),
            Side::Sell,
            Price::from_ticks(14900),
            Quantity::new(10),
        );

        let json = serde_json::to_string(&trade).unwrap();
        let back: Trade = serde_json::from_str(&json).unwrap();
        assert_eq!(back, trade);
    }
}

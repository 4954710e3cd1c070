//! Trade execution records with monotonic sequencing

use types::ids::Symbol;
use types::numeric::{Price, Quantity};
use types::order::Order;
use types::trade::Trade;

/// Builds trade records, stamping each with the next sequence number.
#[derive(Debug)]
pub struct TradeExecutor {
    sequence: u64,
}

impl TradeExecutor {
    pub fn new(starting_sequence: u64) -> Self {
        Self {
            sequence: starting_sequence,
        }
    }

    fn next_sequence(&mut self) -> u64 {
        let sequence = self.sequence;
        self.sequence += 1;
        sequence
    }

    /// Record a fill between the aggressor and a resting order.
    ///
    /// The execution price is the resting order's level price, so price
    /// improvement always favours the aggressor.
    pub fn execute(
        &mut self,
        symbol: &Symbol,
        taker: &Order,
        maker: &Order,
        quantity: Quantity,
        price: Price,
    ) -> Trade {
        let sequence = self.next_sequence();
        Trade::new(
            sequence,
            symbol.clone(),
            taker.id,
            maker.id,
            taker.side,
            price,
            quantity,
        )
    }
}

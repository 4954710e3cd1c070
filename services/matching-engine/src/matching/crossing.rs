//! Crossing detection
//!
//! Price-compatibility predicates between an aggressing order and resting
//! liquidity. The resting side's price ordering decides the comparison
//! direction; `None` stands for a market order with no limit.

use types::numeric::Price;
use types::order::Side;

/// Check whether a bid and an ask can trade: the bid must reach the ask.
pub fn can_match(bid_price: Price, ask_price: Price) -> bool {
    bid_price >= ask_price
}

/// Check whether a resting level is reachable under the aggressor's limit.
///
/// `book_side` is the side the level rests on. A sell limited to `l` takes
/// bid levels priced at or above `l`; a buy limited to `l` takes ask levels
/// priced at or below `l`. No limit reaches every level.
pub fn level_eligible(book_side: Side, level_price: Price, limit: Option<Price>) -> bool {
    match limit {
        None => true,
        Some(limit) => match book_side {
            Side::Buy => level_price >= limit,
            Side::Sell => level_price <= limit,
        },
    }
}

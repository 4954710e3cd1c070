//! Event listeners and staged notifications
//!
//! Observers register against the engine and are called back synchronously
//! once a mutating operation has settled. Callbacks receive a shared
//! reference to the engine, so read-only queries from inside a callback
//! are always safe; mutating re-entry is impossible by construction.

use types::numeric::{Price, Quantity};
use types::order::{Order, RejectReason};
use types::trade::Trade;

use crate::depth::DepthChange;
use crate::engine::MatchingEngine;

/// Order lifecycle events.
pub trait OrderListener: Send + Sync {
    fn on_accept(&self, _order: &Order) {}

    fn on_reject(&self, _order: &Order, _reason: RejectReason) {}

    /// One notification per side per fill.
    fn on_fill(&self, _order: &Order, _counterparty: &Order, _quantity: Quantity, _price: Price) {}

    fn on_cancel(&self, _order: &Order, _cancelled_quantity: Quantity) {}

    fn on_replace(&self, _old_order: &Order, _new_order: &Order) {}

    fn on_replace_reject(&self, _order: &Order, _reason: RejectReason) {}
}

/// Trade events; a subscriber must handle every fill.
pub trait TradeListener: Send + Sync {
    #[allow(clippy::too_many_arguments)]
    fn on_trade(
        &self,
        trade: &Trade,
        inbound: &Order,
        resting: &Order,
        quantity: Quantity,
        price: Price,
        inbound_filled: bool,
        resting_filled: bool,
    );
}

/// Book-level events.
pub trait OrderBookListener: Send + Sync {
    fn on_order_book_change(&self, _book: &MatchingEngine) {}

    /// Fired only when either best price moved.
    fn on_bbo_change(&self, _book: &MatchingEngine, _bid: Option<Price>, _ask: Option<Price>) {}
}

/// Aggregated depth events, one call per changed slot.
pub trait DepthListener: Send + Sync {
    fn on_depth_change(
        &self,
        book: &MatchingEngine,
        is_bid: bool,
        price: Price,
        new_quantity: Quantity,
        delta: i64,
    );
}

/// Event staged during a mutation, dispatched after it settles.
///
/// Staging keeps the emission order stable: accept, fills in execution
/// order, cancel of any remainder, then book, BBO, and depth changes.
#[derive(Debug, Clone)]
pub(crate) enum Notification {
    Accepted(Order),
    Rejected(Order, RejectReason),
    Traded {
        trade: Trade,
        inbound: Order,
        resting: Order,
        inbound_filled: bool,
        resting_filled: bool,
    },
    Cancelled(Order, Quantity),
    Replaced {
        old_order: Order,
        new_order: Order,
    },
    ReplaceRejected(Order, RejectReason),
    BookChanged,
    BboChanged {
        bid: Option<Price>,
        ask: Option<Price>,
    },
    DepthChanged(Vec<DepthChange>),
}

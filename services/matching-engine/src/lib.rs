//! Matching engine for a single tradable instrument
//!
//! Implements a price-time priority limit order book: two opposing sides
//! of resting orders, a crossing algorithm for aggressive orders, stop
//! order activation, top-N depth aggregation, and synchronous event
//! fan-out to registered listeners.
//!
//! **Key invariants:**
//! - Price-time priority strictly enforced
//! - Deterministic matching (same inputs produce same outputs)
//! - Conservation of quantity across fills
//! - Level aggregates maintained incrementally, never rescanned
//! - The settled book never crosses itself

pub mod book;
pub mod depth;
pub mod engine;
pub mod events;
pub mod matching;
pub mod stats;

pub use book::{AmendResult, LevelFill, PriceLevel, SideBook, StopBook};
pub use depth::{DepthChange, DepthLevel, DepthTracker, DEFAULT_DEPTH};
pub use engine::MatchingEngine;
pub use events::{DepthListener, OrderBookListener, OrderListener, TradeListener};
pub use matching::{MatchCandidate, MatchPlan, TradeExecutor};
pub use stats::{EngineStats, StatsSnapshot};

//! Matching logic
//!
//! Crossing predicates, read-only match planning, and trade sequencing for
//! the price-time priority algorithm.

pub mod crossing;
pub mod executor;
pub mod plan;

pub use crossing::can_match;
pub use executor::TradeExecutor;
pub use plan::{MatchCandidate, MatchPlan};

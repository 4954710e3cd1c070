//! Core value types for the matchbook order engine
//!
//! Shared by the matching engine and any embedding that submits orders or
//! consumes its events.
//!
//! # Modules
//! - `ids`: identifiers (OrderId, TradeId, Symbol)
//! - `numeric`: fixed-point tick types (Price, Quantity)
//! - `timestamp`: nanosecond timestamps
//! - `order`: order lifecycle types and reject reasons
//! - `trade`: trade execution records
//! - `errors`: error taxonomy

pub mod errors;
pub mod ids;
pub mod numeric;
pub mod order;
pub mod timestamp;
pub mod trade;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::errors::*;
    pub use crate::ids::*;
    pub use crate::numeric::*;
    pub use crate::order::*;
    pub use crate::timestamp::*;
    pub use crate::trade::*;
}

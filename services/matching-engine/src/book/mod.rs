//! Order book containers
//!
//! Price levels, the two limit-order sides, and the stop-order books.

pub mod price_level;
pub mod side_book;
pub mod stop_book;

pub use price_level::{LevelFill, PriceLevel};
pub use side_book::{AmendResult, SideBook};
pub use stop_book::StopBook;

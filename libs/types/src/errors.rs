//! Error taxonomy for book and engine operations

use crate::ids::OrderId;
use thiserror::Error;

/// Failures surfaced by book containers and the engine.
///
/// `IntegrityViolation` is an in-process bug: the location index and the
/// level contents disagree. Debug builds assert on it; release builds log
/// and surface the error rather than continuing silently.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("order {0} is already indexed in the book")]
    DuplicateOrder(OrderId),

    #[error("order {0} is not in the book")]
    UnknownOrder(OrderId),

    #[error("book integrity violated: {0}")]
    IntegrityViolation(String),
}

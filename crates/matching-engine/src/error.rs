//! Matching engine error types

use thiserror::Error;

/// Errors that can occur while operating the matching engine.
///
/// These are distinct from [`common::Error`]: they cover the narrow set of
/// ways the core itself can refuse work or detect a broken invariant.
/// Malformed wire input is expected to be rejected by the HTTP adapter
/// before it ever reaches the engine; `InvalidOrder` exists for callers
/// that talk to the engine directly (tests, other in-process code).
#[derive(Error, Debug)]
pub enum MatchingError {
    /// The order failed a basic sanity check (non-finite/non-positive price,
    /// zero or negative amount) before it could be queued.
    #[error("invalid order: {0}")]
    InvalidOrder(String),

    /// A defensive invariant check failed. This should never happen if the
    /// `PriorityBook` implementation is correct; callers that see this
    /// should treat it as a bug, not a recoverable condition.
    #[error("internal matching engine error: {0}")]
    Internal(String),
}

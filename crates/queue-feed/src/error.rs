//! Error types for queue-feed

use thiserror::Error;

/// Result type alias for feed operations
pub type Result<T> = std::result::Result<T, FeedError>;

#[derive(Debug, Error)]
pub enum FeedError {
    /// The update failed validation and was not published
    #[error("Rejected queue update: {0}")]
    Rejected(#[from] dash_core::Error),

    /// Published while nothing is consuming the feed
    #[error("No subscriber is consuming the queue feed")]
    NoSubscribers,

    /// Every sender has been dropped
    #[error("Queue feed closed")]
    Closed,
}

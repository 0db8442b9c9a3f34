//! Queue Feed - live queue updates for the waiting indicator
//!
//! Producers publish immutable [`QueueUpdate`] messages on a broadcast
//! channel. A renderer task consumes them and keeps the latest
//! [`QueueDisplay`] per queued task on a [`DisplayBoard`].
//!
//! [`QueueUpdate`]: dash_core::queue::QueueUpdate
//! [`QueueDisplay`]: dash_core::queue::QueueDisplay

mod board;
mod error;
mod feed;

pub use board::{spawn_renderer, DisplayBoard};
pub use error::{FeedError, Result};
pub use feed::{FeedSubscription, QueueFeed, DEFAULT_FEED_CAPACITY};

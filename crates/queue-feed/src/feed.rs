//! Broadcast channel for queue updates

use std::sync::Arc;

use dash_core::queue::QueueUpdate;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::error::{FeedError, Result};

/// Updates buffered per subscriber before it starts lagging
pub const DEFAULT_FEED_CAPACITY: usize = 256;

/// Publishing side of the queue feed
#[derive(Debug, Clone)]
pub struct QueueFeed {
    tx: broadcast::Sender<Arc<QueueUpdate>>,
}

impl Default for QueueFeed {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_CAPACITY)
    }
}

impl QueueFeed {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Validate and broadcast an update.
    ///
    /// Returns how many subscribers received it; having none is not an error.
    pub fn publish(&self, update: QueueUpdate) -> Result<usize> {
        if let QueueUpdate::Snapshot(snapshot) = &update {
            snapshot.validate()?;
        }

        let task_id = update.task_id();
        match self.tx.send(Arc::new(update)) {
            Ok(receivers) => {
                debug!(%task_id, receivers, "Published queue update");
                Ok(receivers)
            }
            Err(_) => {
                debug!(%task_id, "Queue update dropped, no subscribers");
                Ok(0)
            }
        }
    }

    pub fn subscribe(&self) -> FeedSubscription {
        FeedSubscription {
            rx: self.tx.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// Receiving side of the queue feed
#[derive(Debug)]
pub struct FeedSubscription {
    rx: broadcast::Receiver<Arc<QueueUpdate>>,
}

impl FeedSubscription {
    /// Next update, skipping any this subscriber fell too far behind on
    pub async fn recv(&mut self) -> Result<Arc<QueueUpdate>> {
        loop {
            match self.rx.recv().await {
                Ok(update) => return Ok(update),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Queue subscriber lagged, skipping missed updates");
                }
                Err(broadcast::error::RecvError::Closed) => return Err(FeedError::Closed),
            }
        }
    }
}

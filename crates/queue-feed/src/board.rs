//! Rendered queue displays, one per waiting task

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dash_core::queue::{QueueDisplay, QueueUpdate};
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{FeedError, Result};
use crate::feed::FeedSubscription;

/// Latest display per queued task.
///
/// Written only by the renderer; readers get cloned values.
#[derive(Clone)]
pub struct DisplayBoard {
    displays: Arc<RwLock<HashMap<Uuid, QueueDisplay>>>,
    version: Arc<watch::Sender<u64>>,
}

impl Default for DisplayBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayBoard {
    pub fn new() -> Self {
        let (version, _) = watch::channel(0);
        Self {
            displays: Arc::new(RwLock::new(HashMap::new())),
            version: Arc::new(version),
        }
    }

    pub async fn get(&self, task_id: Uuid) -> Option<QueueDisplay> {
        let displays = self.displays.read().await;
        displays.get(&task_id).cloned()
    }

    /// All displays ordered by queue position
    pub async fn list(&self) -> Vec<QueueDisplay> {
        let displays = self.displays.read().await;
        let mut list: Vec<QueueDisplay> = displays.values().cloned().collect();
        list.sort_by_key(|display| display.position);
        list
    }

    pub async fn len(&self) -> usize {
        self.displays.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.displays.read().await.is_empty()
    }

    /// Bumped after every applied update
    pub fn subscribe_changes(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    /// Render `update` against `now` and store the result
    pub async fn apply(&self, update: &QueueUpdate, now: DateTime<Utc>) -> Result<()> {
        match update {
            QueueUpdate::Snapshot(snapshot) => {
                let rendered = QueueDisplay::render(snapshot, now).map_err(FeedError::Rejected)?;
                debug!(
                    task_id = %rendered.task_id,
                    position = rendered.position,
                    queue_length = rendered.queue_length,
                    "Rendered queue display"
                );
                let mut displays = self.displays.write().await;
                displays.insert(rendered.task_id, rendered);
            }
            QueueUpdate::Removed { task_id, reason } => {
                let mut displays = self.displays.write().await;
                if displays.remove(task_id).is_some() {
                    info!(%task_id, reason = reason.as_str(), "Task left the queue");
                }
            }
        }

        self.version.send_modify(|version| *version += 1);
        Ok(())
    }
}

/// Spawn the task that feeds `board` from `subscription`.
///
/// Runs until the feed closes.
pub fn spawn_renderer(board: DisplayBoard, mut subscription: FeedSubscription) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Queue renderer started");
        while let Ok(update) = subscription.recv().await {
            if let Err(e) = board.apply(&update, Utc::now()).await {
                warn!(task_id = %update.task_id(), "Failed to render queue update: {}", e);
            }
        }
        info!("Queue feed closed, renderer stopped");
    })
}

//! Application state

use std::sync::Arc;

use dash_core::retry::RetryComposerConfig;
use git_probe::{GitProbe, PathProbe};
use queue_feed::{spawn_renderer, DisplayBoard, QueueFeed};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::config::ServerConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    feed: QueueFeed,
    board: DisplayBoard,
    probe: Arc<dyn PathProbe>,
    retry: RetryComposerConfig,
    renderer: Mutex<Option<JoinHandle<()>>>,
}

impl AppState {
    /// Build state from config and start the queue renderer.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn new(config: &ServerConfig) -> Self {
        Self::with_probe(config, Arc::new(GitProbe::new()))
    }

    /// Same as [`AppState::new`] with a custom path probe
    pub fn with_probe(config: &ServerConfig, probe: Arc<dyn PathProbe>) -> Self {
        let feed = QueueFeed::new(config.feed_capacity);
        let board = DisplayBoard::new();
        let renderer = spawn_renderer(board.clone(), feed.subscribe());

        Self {
            inner: Arc::new(AppStateInner {
                feed,
                board,
                probe,
                retry: config.retry,
                renderer: Mutex::new(Some(renderer)),
            }),
        }
    }

    pub fn feed(&self) -> &QueueFeed {
        &self.inner.feed
    }

    pub fn board(&self) -> &DisplayBoard {
        &self.inner.board
    }

    pub fn probe(&self) -> &dyn PathProbe {
        self.inner.probe.as_ref()
    }

    pub fn retry_config(&self) -> RetryComposerConfig {
        self.inner.retry
    }

    /// Whether the queue renderer task is still consuming the feed
    pub async fn renderer_running(&self) -> bool {
        let renderer = self.inner.renderer.lock().await;
        renderer.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Abort the renderer and wait until its subscription is dropped
    #[cfg(test)]
    pub async fn stop_renderer(&self) {
        let handle = self.inner.renderer.lock().await.take();
        if let Some(handle) = handle {
            handle.abort();
            let _ = handle.await;
        }
    }
}

//! Per-session progress channels
//!
//! Each browser session subscribes to its own broadcast channel. An upload names its
//! session and reports into that channel only, so concurrent uploads never see each
//! other's progress. Progress for a session nobody listens to is dropped.

use std::sync::Arc;

use dashmap::DashMap;
use fanout_core::{NoopProgress, ProgressEvent, ProgressSink};
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 64;

#[derive(Default)]
pub struct ProgressRegistry {
    channels: DashMap<String, broadcast::Sender<ProgressEvent>>,
}

impl ProgressRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to the progress of `session`, creating its channel on first use.
    pub fn subscribe(&self, session: &str) -> broadcast::Receiver<ProgressEvent> {
        self.prune();
        self.channels
            .entry(session.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Sink reporting into `session`, or a no-op sink when nobody subscribed.
    pub fn sink(&self, session: Option<&str>) -> Arc<dyn ProgressSink> {
        let sender = session.and_then(|s| self.channels.get(s).map(|tx| tx.value().clone()));
        match sender {
            Some(sender) => Arc::new(SessionProgress { sender }),
            None => Arc::new(NoopProgress),
        }
    }

    /// Drop channels whose subscribers all disconnected.
    fn prune(&self) {
        self.channels.retain(|_, tx| tx.receiver_count() > 0);
    }
}

struct SessionProgress {
    sender: broadcast::Sender<ProgressEvent>,
}

impl ProgressSink for SessionProgress {
    fn report(&self, event: ProgressEvent) {
        // No receiver left is not an error
        let _ = self.sender.send(event);
    }
}

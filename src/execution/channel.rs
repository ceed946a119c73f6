//! Event channel shared by executors and the plugin dispatcher

use crate::execution::Event;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

/// Unbounded, multi-producer event queue
///
/// Every event is popped exactly once. Handles are cheap to clone and all
/// clones feed and drain the same queue.
#[derive(Debug, Clone)]
pub struct EventChannel {
    sender: mpsc::UnboundedSender<Event>,
    receiver: Arc<Mutex<mpsc::UnboundedReceiver<Event>>>,
}

impl EventChannel {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender,
            receiver: Arc::new(Mutex::new(receiver)),
        }
    }

    /// Queue an event; never blocks
    pub fn publish(&self, event: Event) {
        // The channel owns its receiver, so the send cannot fail.
        let _ = self.sender.send(event);
    }

    /// Wait for the next event and pop it
    pub async fn take(&self) -> Event {
        let mut receiver = self.receiver.lock().await;
        match receiver.recv().await {
            Some(event) => event,
            // Unreachable while `self.sender` is alive.
            None => std::future::pending().await,
        }
    }

    /// Pop an event if one is queued and no other reader is waiting
    pub fn try_take(&self) -> Option<Event> {
        let mut receiver = self.receiver.try_lock().ok()?;
        receiver.try_recv().ok()
    }

    /// Pop everything currently queued
    pub fn drain(&self) -> Vec<Event> {
        std::iter::from_fn(|| self.try_take()).collect()
    }
}

impl Default for EventChannel {
    fn default() -> Self {
        Self::new()
    }
}

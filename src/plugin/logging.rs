//! Log plugin - forwards events to `tracing`

use crate::execution::Event;
use crate::plugin::Plugin;
use async_trait::async_trait;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct LogPlugin;

#[async_trait]
impl Plugin for LogPlugin {
    fn name(&self) -> &str {
        "log"
    }

    async fn on_event(&self, event: &Event) {
        match event.error() {
            Some(error) => warn!(event = event.kind(), subject = event.name(), error, "lifecycle event"),
            None => info!(event = event.kind(), subject = event.name(), "lifecycle event"),
        }
    }
}

//! Console plugin - prints every event to stdout

use crate::cli::output::{format_event, separator};
use crate::execution::Event;
use crate::plugin::Plugin;
use async_trait::async_trait;
use chrono::Local;
use console::style;
use tracing::warn;

/// How events are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Styled, human-readable lines
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

/// Prints events as they are dispatched
#[derive(Debug, Clone, Default)]
pub struct ConsolePlugin {
    format: OutputFormat,
}

impl ConsolePlugin {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Render one event according to the configured format
    pub fn render(&self, event: &Event) -> Option<String> {
        match self.format {
            OutputFormat::Pretty => Some(format!(
                "{} {}",
                style(Local::now().format("%H:%M:%S")).dim(),
                format_event(event)
            )),
            OutputFormat::Json => match serde_json::to_string(event) {
                Ok(line) => Some(line),
                Err(e) => {
                    warn!("Failed to serialize event {}: {}", event.kind(), e);
                    None
                }
            },
        }
    }
}

#[async_trait]
impl Plugin for ConsolePlugin {
    fn name(&self) -> &str {
        "console"
    }

    async fn on_event(&self, event: &Event) {
        if self.format == OutputFormat::Pretty && matches!(event, Event::ClusterCompleted { .. }) {
            println!("{}", separator());
        }
        if let Some(line) = self.render(event) {
            println!("{}", line);
        }
    }
}

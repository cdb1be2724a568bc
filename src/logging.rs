//! Logging utilities for structured tracing

use crate::slack::ChannelId;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "slack_funbot=debug,slack_morphism=info";

/// Install the global tracing subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .with_target(true)
        .with_line_number(true)
        .init();
}

/// Track operation timing and log on drop
pub struct Timer {
    start: Instant,
    operation: String,
    channel_id: Option<String>,
}

impl Timer {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            operation: operation.into(),
            channel_id: None,
        }
    }

    /// Attach the channel the operation runs for
    pub fn with_channel(mut self, channel: &ChannelId) -> Self {
        self.channel_id = Some(channel.as_str().to_string());
        self
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        tracing::debug!(
            operation = %self.operation,
            channel_id = self.channel_id.as_deref().unwrap_or("-"),
            duration_ms = self.elapsed_ms(),
            "Operation completed"
        );
    }
}

/// Log an error with structured context
pub fn log_error(operation: &str, error: &impl std::error::Error) {
    tracing::error!(
        operation = %operation,
        error = %error,
        error_kind = std::any::type_name_of_val(error),
        "Operation failed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_timer_tracks_duration() {
        let timer = Timer::new("transcode").with_channel(&ChannelId::new("C1"));
        thread::sleep(Duration::from_millis(10));
        assert!(timer.elapsed_ms() >= 10);
        assert_eq!(timer.channel_id.as_deref(), Some("C1"));
    }
}

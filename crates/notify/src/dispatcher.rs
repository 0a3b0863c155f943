//! Fans notifications out to configured channels.
//!
//! The dispatcher delivers a notification to every channel in order and
//! reports one [`DispatchResult`] per channel. Individual channel failures
//! don't block other channels.

use crate::traits::{DispatchResult, Notification, Notifier};

/// Dispatches notifications to a fixed list of channels.
pub struct Dispatcher {
    channels: Vec<Box<dyn Notifier>>,
}

impl Dispatcher {
    /// Create a dispatcher over the given channels, tried in order.
    pub fn new(channels: Vec<Box<dyn Notifier>>) -> Self {
        Self { channels }
    }

    /// Create an empty dispatcher.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Names of the configured channels, in dispatch order.
    pub fn channel_names(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.channel_name()).collect()
    }

    /// Dispatch a notification to all channels.
    ///
    /// Returns results for each channel delivery. Individual failures
    /// don't block other channels.
    pub async fn dispatch(&self, notification: &Notification) -> Vec<DispatchResult> {
        if self.channels.is_empty() {
            tracing::debug!("No notification channels configured");
            return Vec::new();
        }

        let mut results = Vec::with_capacity(self.channels.len());
        for channel in &self.channels {
            let start = std::time::Instant::now();
            let result = channel.send(notification).await;
            results.push(Self::record(channel.as_ref(), result, start));
        }
        results
    }

    /// Send the built-in test notification through every channel.
    pub async fn test_all(&self) -> Vec<DispatchResult> {
        let mut results = Vec::with_capacity(self.channels.len());
        for channel in &self.channels {
            let start = std::time::Instant::now();
            let result = channel.test().await;
            results.push(Self::record(channel.as_ref(), result, start));
        }
        results
    }

    fn record(
        channel: &dyn Notifier,
        result: Result<(), crate::traits::NotifyError>,
        start: std::time::Instant,
    ) -> DispatchResult {
        let duration_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(
            channel = channel.channel_name(),
            success = result.is_ok(),
            duration_ms,
            "channel attempt finished"
        );
        DispatchResult {
            channel: channel.channel_name().to_string(),
            success: result.is_ok(),
            error: result.err().map(|e| e.to_string()),
            duration_ms,
        }
    }
}

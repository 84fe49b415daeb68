//! Progress line sinks
//!
//! The teardown pipeline and the batch runner report each step as one
//! renderable line. Lines are delivered in order and awaited in place.

use async_trait::async_trait;
use std::sync::Mutex;
use tokio::sync::mpsc;
use tracing::debug;

/// Receives progress lines.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    async fn emit(&self, line: String);
}

#[async_trait]
impl<F> ProgressSink for F
where
    F: Fn(String) + Send + Sync,
{
    async fn emit(&self, line: String) {
        self(line)
    }
}

/// Forwards lines over a bounded channel to a UI running elsewhere.
///
/// A full channel applies backpressure to the producer. A closed receiver
/// is not an error; lines are dropped.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::Sender<String>,
}

impl ChannelSink {
    pub fn new(sender: mpsc::Sender<String>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl ProgressSink for ChannelSink {
    async fn emit(&self, line: String) {
        if self.sender.send(line).await.is_err() {
            debug!("Progress receiver closed, dropping line");
        }
    }
}

/// Keeps every line in memory.
#[derive(Debug, Default)]
pub struct ProgressLog {
    lines: Mutex<Vec<String>>,
}

impl ProgressLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl ProgressSink for ProgressLog {
    async fn emit(&self, line: String) {
        match self.lines.lock() {
            Ok(mut lines) => lines.push(line),
            Err(poisoned) => poisoned.into_inner().push(line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_channel_sink_preserves_order() {
        let (tx, mut rx) = mpsc::channel(100);
        let sink = ChannelSink::new(tx);
        sink.emit("one".to_string()).await;
        sink.emit("two".to_string()).await;
        drop(sink);

        let mut received = Vec::new();
        while let Some(line) = rx.recv().await {
            received.push(line);
        }
        assert_eq!(received, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_channel_sink_tolerates_closed_receiver() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        ChannelSink::new(tx).emit("lost".to_string()).await;
    }

    #[tokio::test]
    async fn test_closure_sink_and_log() {
        let count = AtomicUsize::new(0);
        let counter = |_line: String| {
            count.fetch_add(1, Ordering::SeqCst);
        };
        counter.emit("first".to_string()).await;
        counter.emit("second".to_string()).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);

        let log = ProgressLog::new();
        log.emit("kept".to_string()).await;
        assert_eq!(log.lines(), vec!["kept"]);
    }
}

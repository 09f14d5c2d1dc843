//! User-facing notification sinks.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyKind {
    Info,
    Success,
    Error,
}

/// Presentation options for a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notify {
    #[serde(rename = "type")]
    pub kind: NotifyKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_title: Option<String>,
}

impl Notify {
    pub fn info() -> Self {
        Self::of(NotifyKind::Info)
    }

    pub fn success() -> Self {
        Self::of(NotifyKind::Success)
    }

    pub fn error() -> Self {
        Self::of(NotifyKind::Error)
    }

    fn of(kind: NotifyKind) -> Self {
        Self {
            kind,
            link: None,
            link_title: None,
        }
    }

    /// Attach a link when one is available.
    pub fn with_link(mut self, link: Option<String>, title: &str) -> Self {
        if let Some(link) = link {
            self.link = Some(link);
            self.link_title = Some(title.to_string());
        }
        self
    }
}

/// A delivered notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    #[serde(flatten)]
    pub options: Notify,
}

/// Where user-visible messages go.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, message: &str, options: Notify);
}

/// Writes notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, message: &str, options: Notify) {
        let link = options.link.as_deref().unwrap_or("");
        match options.kind {
            NotifyKind::Info => tracing::info!(link, "{}", message),
            NotifyKind::Success => tracing::info!(link, success = true, "{}", message),
            NotifyKind::Error => tracing::error!(link, "{}", message),
        }
    }
}

/// Forwards notifications over an unbounded channel, e.g. to a UI task.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl NotificationSink for ChannelSink {
    fn notify(&self, message: &str, options: Notify) {
        let notification = Notification {
            message: message.to_string(),
            options,
        };
        if self.tx.send(notification).is_err() {
            tracing::debug!("Notification receiver dropped");
        }
    }
}

//! User-facing notifications.
//!
//! Every terminal state of the session and submission flows ends up here
//! as exactly one message.

pub mod sink;

pub use sink::{ChannelSink, Notification, NotificationSink, Notify, NotifyKind, TracingSink};

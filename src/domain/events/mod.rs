//! Domain events
//!
//! Aggregates raise notifications instead of talking to a UI directly. They
//! are fire-and-forget: callers drain them with `take_notifications` and show
//! them however they like.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel { Success, Error, Info }

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Notification {
    pub fn success(title: impl Into<String>, description: Option<String>) -> Self {
        Self { level: NotificationLevel::Success, title: title.into(), description }
    }
    pub fn error(title: impl Into<String>, description: Option<String>) -> Self {
        Self { level: NotificationLevel::Error, title: title.into(), description }
    }
    pub fn info(title: impl Into<String>) -> Self {
        Self { level: NotificationLevel::Info, title: title.into(), description: None }
    }
}

// ============================================================================
// mediakit-core/src/notifications/ntfy.rs
// ============================================================================
//
// NTFY IMPLEMENTATION: Task-complete notifications via ntfy.sh
//
// This module sends notifications to an ntfy topic, which can be received on
// phones and desktops subscribed to it.
//
// KEY COMPONENTS:
// - NtfyNotificationSender: Sends one message to an ntfy topic URL

// ---- Internal crate imports ----
use super::Notifier;
use crate::error::{CoreError, CoreResult};

// ---- External crate imports ----
use ntfy::DispatcherBuilder;
use ntfy::payload::{Payload, Priority as NtfyPriority};

// ============================================================================
// NTFY NOTIFICATION SENDER
// ============================================================================

/// Sends notifications to an ntfy server.
///
/// # Examples
///
/// ```rust,no_run
/// use mediakit_core::notifications::{Notifier, NtfyNotificationSender};
///
/// let sender = NtfyNotificationSender::new("https://ntfy.sh/your_topic", "QC 扫描 完成")
///     .unwrap()
///     .with_title("任务完成通知");
/// sender.send().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct NtfyNotificationSender {
    base_url: String,
    topic: String,
    title: Option<String>,
    message: String,
    priority: u8,
}

/// Splits `https://host/topic` into `("https://host", "topic")`.
fn split_topic_url(topic_url: &str) -> CoreResult<(String, String)> {
    let after_scheme = topic_url.strip_prefix("https://").ok_or_else(|| {
        CoreError::NotificationError(format!(
            "Invalid ntfy topic URL '{}': must start with https://",
            topic_url
        ))
    })?;

    let (host, topic) = after_scheme
        .split_once('/')
        .unwrap_or((after_scheme, ""));

    if host.is_empty() {
        return Err(CoreError::NotificationError(format!(
            "URL '{}' must have a non-empty host",
            topic_url
        )));
    }

    let topic = topic.trim_end_matches('/');
    if topic.is_empty() {
        return Err(CoreError::NotificationError(format!(
            "URL '{}' is missing topic path",
            topic_url
        )));
    }

    Ok((format!("https://{}", host), topic.to_string()))
}

impl NtfyNotificationSender {
    /// Creates a sender for `topic_url` (e.g. `https://ntfy.sh/your_topic`).
    ///
    /// # Returns
    ///
    /// * `Ok(NtfyNotificationSender)` - A new notification sender instance
    /// * `Err(CoreError::NotificationError)` - If the topic URL is invalid
    pub fn new(topic_url: &str, message: impl Into<String>) -> CoreResult<Self> {
        let (base_url, topic) = split_topic_url(topic_url.trim())?;
        Ok(Self {
            base_url,
            topic,
            title: None,
            message: message.into(),
            priority: 3,
        })
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the priority (1-5). Out-of-range values fall back to the default.
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Notifier for NtfyNotificationSender {
    fn channel(&self) -> &'static str {
        "ntfy"
    }

    fn send(&self) -> CoreResult<()> {
        let dispatcher = DispatcherBuilder::new(&self.base_url)
            .build_blocking()
            .map_err(|e| {
                CoreError::NotificationError(format!(
                    "Failed to build ntfy dispatcher for {}: {}",
                    self.base_url, e
                ))
            })?;

        let priority = map_priority(self.priority).unwrap_or_else(|| {
            log::warn!("Invalid ntfy priority value provided: {}", self.priority);
            NtfyPriority::Default
        });

        let mut payload = Payload::new(&self.topic)
            .message(&self.message)
            .priority(priority)
            .tags(vec!["mediakit".to_string(), "complete".to_string()]);
        if let Some(title) = &self.title {
            payload = payload.title(title);
        }

        dispatcher.send(&payload).map_err(|e| {
            CoreError::NotificationError(format!(
                "Failed to send ntfy notification to {}/{}: {}",
                self.base_url, self.topic, e
            ))
        })?;
        log::info!("ntfy notification sent to topic {}", self.topic);
        Ok(())
    }
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Maps a numeric priority (1-5) to the ntfy priority enum.
fn map_priority(p: u8) -> Option<NtfyPriority> {
    match p {
        1 => Some(NtfyPriority::Min),
        2 => Some(NtfyPriority::Low),
        3 => Some(NtfyPriority::Default),
        4 => Some(NtfyPriority::High),
        5 => Some(NtfyPriority::Max),
        _ => None,
    }
}

// ============================================================================
// mediakit-core/src/notifications/mod.rs
// ============================================================================
//
// NOTIFICATIONS: Task-complete notifications
//
// When a batch task finishes, a notification can be pushed to a Feishu bot,
// a custom JSON webhook and an ntfy topic. Channels are independent: one
// failing never stops the others.
//
// KEY COMPONENTS:
// - NotifyConfig / NotifyConfigStore: Preferences and their JSON file
// - Notifier: Trait implemented by each channel
// - send_task_complete: Builds the configured channels and sends on each

mod config;
mod feishu;
mod ntfy;
mod webhook;

use std::time::Duration;

use crate::error::{CoreError, CoreResult};

pub use config::{DEFAULT_NOTIFY_CONFIG_FILE, NotifyConfig, NotifyConfigStore, TASK_PLACEHOLDER};
pub use feishu::{FEISHU_COLORS, FeishuNotifier, build_card, normalize_color, response_accepted};
pub use ntfy::NtfyNotificationSender;
pub use webhook::{WebhookNotifier, parse_body, parse_headers};

/// Request timeout for every HTTP channel.
pub const NOTIFY_TIMEOUT: Duration = Duration::from_secs(30);

/// A single notification channel with its message already bound.
pub trait Notifier {
    /// Short channel name used in logs and results.
    fn channel(&self) -> &'static str;

    fn send(&self) -> CoreResult<()>;
}

pub(crate) fn http_client() -> CoreResult<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(NOTIFY_TIMEOUT)
        .build()
        .map_err(|e| CoreError::NotificationError(format!("Failed to build HTTP client: {e}")))
}

/// Builds one notifier per configured channel for `task`.
///
/// Ignores `enabled`; an invalid ntfy topic becomes an `Err` entry so the
/// caller reports it alongside the other channels.
pub fn build_notifiers(
    config: &NotifyConfig,
    task: &str,
) -> Vec<(&'static str, CoreResult<Box<dyn Notifier>>)> {
    let content = config.content_for(task);
    let mut notifiers: Vec<(&'static str, CoreResult<Box<dyn Notifier>>)> = Vec::new();

    if !config.feishu_webhook.trim().is_empty() {
        let notifier = FeishuNotifier::new(
            config.feishu_webhook.trim(),
            &config.feishu_title,
            &content,
            &config.feishu_color,
        );
        notifiers.push(("feishu", Ok(Box::new(notifier))));
    }

    if !config.webhook_url.trim().is_empty() {
        let notifier = WebhookNotifier::new(
            config.webhook_url.trim(),
            &config.webhook_headers,
            config.body_for(task),
        );
        notifiers.push(("webhook", Ok(Box::new(notifier))));
    }

    if let Some(topic) = config.ntfy_topic.as_deref().filter(|t| !t.trim().is_empty()) {
        let built = NtfyNotificationSender::new(topic, &content)
            .map(|n| Box::new(n.with_title(&config.feishu_title)) as Box<dyn Notifier>);
        notifiers.push(("ntfy", built));
    }

    notifiers
}

/// Sends the task-complete notification on every configured channel.
///
/// # Returns
///
/// One `(channel, result)` per configured channel, in the order Feishu,
/// webhook, ntfy. Empty when notifications are disabled or no channel is set.
pub fn send_task_complete(config: &NotifyConfig, task: &str) -> Vec<(&'static str, CoreResult<()>)> {
    if !config.enabled {
        log::debug!("Notifications disabled, skipping '{}'", task);
        return Vec::new();
    }

    log::info!("Sending task-complete notification for '{}'", task);
    build_notifiers(config, task)
        .into_iter()
        .map(|(channel, notifier)| {
            let result = notifier.and_then(|n| n.send());
            if let Err(e) = &result {
                log::warn!("{} notification failed: {}", channel, e);
            }
            (channel, result)
        })
        .collect()
}

// ============================================================================
// mediakit-core/src/notifications/config.rs
// ============================================================================
//
// NOTIFICATION CONFIG: Persisted notification preferences
//
// The preferences are a flat JSON object. Keys present in the file overlay the
// defaults, so older files without newer keys keep working.
//
// KEY COMPONENTS:
// - NotifyConfig: The preference values
// - NotifyConfigStore: Loads, saves and deletes the JSON file

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Default notification file name, resolved against the working directory.
pub const DEFAULT_NOTIFY_CONFIG_FILE: &str = "notify_config.json";

/// Placeholder replaced by the task name in content and body templates.
pub const TASK_PLACEHOLDER: &str = "{task}";

/// Task-complete notification preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Send a notification automatically when a task finishes
    pub enabled: bool,
    /// Feishu bot webhook URL; empty disables the Feishu channel
    pub feishu_webhook: String,
    pub feishu_title: String,
    /// Card body in `lark_md`; may contain `{task}`
    pub feishu_content: String,
    /// Card header colour
    pub feishu_color: String,
    /// Custom webhook URL; empty disables the webhook channel
    pub webhook_url: String,
    /// JSON object of extra request headers
    pub webhook_headers: String,
    /// JSON request body; may contain `{task}`
    pub webhook_body: String,
    /// Full ntfy topic URL, e.g. `https://ntfy.sh/my-topic`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ntfy_topic: Option<String>,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            feishu_webhook: String::new(),
            feishu_title: "任务完成通知".to_string(),
            feishu_content: "您的视频处理任务已完成！".to_string(),
            feishu_color: "blue".to_string(),
            webhook_url: String::new(),
            webhook_headers: r#"{"Content-Type": "application/json"}"#.to_string(),
            webhook_body: r#"{"message": "任务完成"}"#.to_string(),
            ntfy_topic: None,
        }
    }
}

impl NotifyConfig {
    /// Whether at least one channel has a destination.
    pub fn has_channel(&self) -> bool {
        !self.feishu_webhook.trim().is_empty()
            || !self.webhook_url.trim().is_empty()
            || self
                .ntfy_topic
                .as_deref()
                .is_some_and(|t| !t.trim().is_empty())
    }

    /// Feishu content with `{task}` filled in.
    pub fn content_for(&self, task: &str) -> String {
        self.feishu_content.replace(TASK_PLACEHOLDER, task)
    }

    /// Webhook body with `{task}` filled in.
    pub fn body_for(&self, task: &str) -> String {
        self.webhook_body.replace(TASK_PLACEHOLDER, task)
    }
}

/// JSON file holding a [`NotifyConfig`].
#[derive(Debug, Clone)]
pub struct NotifyConfigStore {
    path: PathBuf,
}

impl NotifyConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored preferences.
    ///
    /// # Returns
    ///
    /// The configuration and whether it came from the file. A missing file
    /// yields the defaults; an unreadable or corrupt file is logged and also
    /// yields the defaults.
    pub fn load(&self) -> (NotifyConfig, bool) {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!(
                    "No notification config at {}, using defaults",
                    self.path.display()
                );
                return (NotifyConfig::default(), false);
            }
            Err(e) => {
                log::warn!(
                    "Failed to read notification config {}: {}",
                    self.path.display(),
                    e
                );
                return (NotifyConfig::default(), false);
            }
        };

        match serde_json::from_str::<NotifyConfig>(&text) {
            Ok(config) => {
                log::debug!("Loaded notification config from {}", self.path.display());
                (config, true)
            }
            Err(e) => {
                log::warn!(
                    "Failed to parse notification config {}: {}",
                    self.path.display(),
                    e
                );
                (NotifyConfig::default(), false)
            }
        }
    }

    /// Writes the preferences as pretty-printed UTF-8 JSON.
    pub fn save(&self, config: &NotifyConfig) -> CoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(config)
            .map_err(|e| CoreError::Config(format!("Failed to serialize notification config: {e}")))?;
        fs::write(&self.path, json)?;
        log::info!("Notification config saved to {}", self.path.display());
        Ok(())
    }

    /// Removes the file. Returns `true` when it was removed or never existed.
    pub fn delete(&self) -> bool {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                log::info!("Deleted notification config {}", self.path.display());
                true
            }
            Err(e) if e.kind() == ErrorKind::NotFound => true,
            Err(e) => {
                log::error!(
                    "Failed to delete notification config {}: {}",
                    self.path.display(),
                    e
                );
                false
            }
        }
    }
}

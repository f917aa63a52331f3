// ============================================================================
// mediakit-core/src/notifications/feishu.rs
// ============================================================================
//
// FEISHU: Interactive card messages to a Feishu (Lark) bot webhook
//
// KEY COMPONENTS:
// - FeishuNotifier: Posts a card and checks the bot's response code
// - build_card: Card payload construction

use serde_json::{Value, json};

use super::{Notifier, http_client};
use crate::error::{CoreError, CoreResult};

/// Card header colours accepted by Feishu.
pub const FEISHU_COLORS: &[&str] = &["blue", "green", "red", "orange", "purple", "indigo", "grey"];

/// Footer shown under every card.
pub const FEISHU_FOOTER: &str = "MediaKit";

/// Returns `color` if Feishu knows it, otherwise `"blue"`.
pub fn normalize_color(color: &str) -> &'static str {
    let color = color.trim().to_lowercase();
    FEISHU_COLORS
        .iter()
        .find(|c| **c == color)
        .copied()
        .unwrap_or("blue")
}

/// Builds the interactive card payload.
pub fn build_card(title: &str, content: &str, color: &str) -> Value {
    json!({
        "msg_type": "interactive",
        "card": {
            "config": { "wide_screen_mode": true },
            "header": {
                "title": { "tag": "plain_text", "content": title },
                "template": normalize_color(color),
            },
            "elements": [
                { "tag": "div", "text": { "tag": "lark_md", "content": content } },
                { "tag": "hr" },
                {
                    "tag": "note",
                    "elements": [ { "tag": "plain_text", "content": FEISHU_FOOTER } ]
                }
            ]
        }
    })
}

/// The bot reports success with `code == 0` (or `StatusCode == 0` on older
/// endpoints) in an HTTP 200 response.
pub fn response_accepted(status: u16, body: &Value) -> bool {
    status == 200
        && (body.get("code").and_then(Value::as_i64) == Some(0)
            || body.get("StatusCode").and_then(Value::as_i64) == Some(0))
}

#[derive(Debug, Clone)]
pub struct FeishuNotifier {
    webhook_url: String,
    title: String,
    content: String,
    color: String,
}

impl FeishuNotifier {
    pub fn new(
        webhook_url: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            title: title.into(),
            content: content.into(),
            color: color.into(),
        }
    }

    pub fn payload(&self) -> Value {
        build_card(&self.title, &self.content, &self.color)
    }
}

impl Notifier for FeishuNotifier {
    fn channel(&self) -> &'static str {
        "feishu"
    }

    fn send(&self) -> CoreResult<()> {
        if self.webhook_url.trim().is_empty() {
            return Err(CoreError::NotificationError(
                "Feishu webhook URL is empty".to_string(),
            ));
        }

        let client = http_client()?;
        log::debug!("POST {} (Feishu card)", self.webhook_url);
        let response = client
            .post(&self.webhook_url)
            .json(&self.payload())
            .send()
            .map_err(|e| CoreError::NotificationError(format!("Feishu request failed: {e}")))?;

        let status = response.status().as_u16();
        let text = response.text().unwrap_or_default();
        let body: Value = serde_json::from_str(&text).unwrap_or(Value::Null);

        if response_accepted(status, &body) {
            log::info!("Feishu notification sent");
            Ok(())
        } else if status != 200 {
            Err(CoreError::NotificationError(format!(
                "Feishu returned HTTP {status}: {text}"
            )))
        } else {
            Err(CoreError::NotificationError(format!(
                "Feishu rejected the message: {text}"
            )))
        }
    }
}

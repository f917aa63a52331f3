// ============================================================================
// mediakit-core/src/notifications/webhook.rs
// ============================================================================
//
// WEBHOOK: User-defined JSON POST requests
//
// Headers and body come from the notification config as JSON text. Parsing
// happens before any request is made so a typo fails fast.

use std::collections::BTreeMap;

use serde_json::Value;

use super::{Notifier, http_client};
use crate::error::{CoreError, CoreResult};

/// Parses the header JSON and merges it over `Content-Type: application/json`.
///
/// Non-object JSON is ignored. Non-string values are stored as their JSON text.
pub fn parse_headers(headers_json: &str) -> CoreResult<BTreeMap<String, String>> {
    let mut headers = BTreeMap::new();
    headers.insert("Content-Type".to_string(), "application/json".to_string());

    if headers_json.trim().is_empty() {
        return Ok(headers);
    }

    let parsed: Value = serde_json::from_str(headers_json)
        .map_err(|e| CoreError::NotificationError(format!("Invalid webhook headers JSON: {e}")))?;
    if let Value::Object(map) = parsed {
        for (name, value) in map {
            let value = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            // Header names are case-insensitive; let the user's spelling win.
            headers.retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
            headers.insert(name, value);
        }
    }
    Ok(headers)
}

/// Parses the body JSON; an empty string yields `{}`.
pub fn parse_body(body_json: &str) -> CoreResult<Value> {
    if body_json.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_str(body_json)
        .map_err(|e| CoreError::NotificationError(format!("Invalid webhook body JSON: {e}")))
}

#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    url: String,
    headers_json: String,
    body_json: String,
}

impl WebhookNotifier {
    pub fn new(
        url: impl Into<String>,
        headers_json: impl Into<String>,
        body_json: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            headers_json: headers_json.into(),
            body_json: body_json.into(),
        }
    }
}

impl Notifier for WebhookNotifier {
    fn channel(&self) -> &'static str {
        "webhook"
    }

    fn send(&self) -> CoreResult<()> {
        if self.url.trim().is_empty() {
            return Err(CoreError::NotificationError(
                "Webhook URL is empty".to_string(),
            ));
        }

        let headers = parse_headers(&self.headers_json)?;
        let body = parse_body(&self.body_json)?;
        let payload = serde_json::to_vec(&body)?;

        log::debug!("POST {}", self.url);
        log::debug!("  Headers: {:?}", headers);
        log::debug!("  Body: {}", body);

        let client = http_client()?;
        let mut request = client.post(&self.url);
        for (name, value) in &headers {
            request = request.header(name.as_str(), value.as_str());
        }
        let response = request
            .body(payload)
            .send()
            .map_err(|e| CoreError::NotificationError(format!("Webhook request failed: {e}")))?;

        let status = response.status();
        let text = response.text().unwrap_or_default();
        log::debug!("Webhook responded {}: {}", status, text.chars().take(500).collect::<String>());

        if status.is_success() {
            log::info!("Webhook notification sent");
            Ok(())
        } else {
            Err(CoreError::NotificationError(format!(
                "Webhook returned HTTP {}",
                status.as_u16()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_headers_merge_over_content_type() {
        let headers = parse_headers(r#"{"Authorization": "Bearer x", "X-Retry": 3}"#).unwrap();
        assert_eq!(headers["Content-Type"], "application/json");
        assert_eq!(headers["Authorization"], "Bearer x");
        assert_eq!(headers["X-Retry"], "3");

        let headers = parse_headers(r#"{"content-type": "text/plain"}"#).unwrap();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers["content-type"], "text/plain");
    }

    #[test]
    fn test_headers_edge_cases() {
        assert_eq!(parse_headers("").unwrap().len(), 1);
        assert_eq!(parse_headers("[1, 2]").unwrap().len(), 1);
        assert!(parse_headers("{broken").is_err());
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body("").unwrap(), json!({}));
        assert_eq!(parse_body(r#"{"message": "完成"}"#).unwrap(), json!({"message": "完成"}));
        assert!(parse_body("{message}").is_err());
    }

    #[test]
    fn test_bad_body_fails_before_request() {
        let notifier = WebhookNotifier::new("http://127.0.0.1:9/hook", "", "{oops");
        let err = notifier.send().unwrap_err();
        assert!(err.to_string().contains("body JSON"));
    }
}

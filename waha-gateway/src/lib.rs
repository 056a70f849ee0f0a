//! WAHA gateway client: outbound WhatsApp messages over the WAHA HTTP API.
//!
//! Implements [`capy_core::Gateway`]; the rest of the system never sees HTTP
//! details. Requests carry the configured API key and are bounded by the
//! settings timeout, so a wedged gateway degrades into a send failure instead
//! of hanging message processing.

use async_trait::async_trait;
use capy_core::{CapyError, Gateway, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

/// Connection settings for the WAHA instance.
#[derive(Debug, Clone)]
pub struct WahaSettings {
    pub base_url: String,
    pub api_key: String,
    pub session_name: String,
    pub timeout_seconds: u64,
}

impl Default for WahaSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            api_key: "dev-api-key".to_string(),
            session_name: "dev-session".to_string(),
            timeout_seconds: 5,
        }
    }
}

#[derive(Serialize)]
struct SendTextRequest<'a> {
    #[serde(rename = "chatId")]
    chat_id: String,
    text: &'a str,
    session: &'a str,
}

#[derive(Deserialize)]
struct SessionStatusResponse {
    #[serde(default)]
    status: Option<String>,
}

/// Adds the WhatsApp Web suffix to bare phone-number ids.
pub fn normalize_chat_id(chat_id: &str) -> String {
    if chat_id.contains('@') {
        chat_id.to_string()
    } else {
        format!("{}@c.us", chat_id)
    }
}

/// Reqwest-based WAHA client.
pub struct WahaClient {
    settings: WahaSettings,
    http: reqwest::Client,
}

impl WahaClient {
    pub fn new(settings: WahaSettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .map_err(|e| CapyError::Gateway(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { settings, http })
    }

    pub fn settings(&self) -> &WahaSettings {
        &self.settings
    }
}

#[async_trait]
impl Gateway for WahaClient {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<()> {
        let url = format!("{}/api/send/text", self.settings.base_url);
        let payload = SendTextRequest {
            chat_id: normalize_chat_id(chat_id),
            text,
            session: &self.settings.session_name,
        };

        let response = self
            .http
            .post(&url)
            .header("X-Api-Key", &self.settings.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!(chat_id = %chat_id, error = %e, "WAHA send failed");
                CapyError::Gateway(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(chat_id = %chat_id, %status, body = %body, "WAHA rejected send");
            return Err(CapyError::Gateway(format!("WAHA returned {}", status)));
        }

        debug!(chat_id = %chat_id, len = text.len(), "Sent message via WAHA");
        Ok(())
    }

    fn session_name(&self) -> &str {
        &self.settings.session_name
    }

    async fn session_status(&self) -> Result<String> {
        let url = format!(
            "{}/api/sessions/{}",
            self.settings.base_url, self.settings.session_name
        );

        let response = self
            .http
            .get(&url)
            .header("X-Api-Key", &self.settings.api_key)
            .send()
            .await
            .map_err(|e| CapyError::Gateway(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CapyError::Gateway(format!(
                "WAHA returned {}",
                response.status()
            )));
        }

        let body: SessionStatusResponse = response
            .json()
            .await
            .map_err(|e| CapyError::Gateway(e.to_string()))?;

        Ok(body.status.unwrap_or_else(|| "unknown".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_chat_id_adds_suffix() {
        assert_eq!(normalize_chat_id("554199999999"), "554199999999@c.us");
    }

    #[test]
    fn test_normalize_chat_id_keeps_existing_suffix() {
        assert_eq!(normalize_chat_id("554199999999@c.us"), "554199999999@c.us");
        assert_eq!(normalize_chat_id("group@g.us"), "group@g.us");
    }
}

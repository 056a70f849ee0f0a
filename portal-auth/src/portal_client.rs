//! HTTP client for the student portal login endpoint.

use capy_core::{CapyError, Result};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, info};

/// Portal connection settings.
#[derive(Debug, Clone)]
pub struct PortalSettings {
    pub login_url: String,
    pub timeout_seconds: u64,
}

impl Default for PortalSettings {
    fn default() -> Self {
        Self {
            login_url: "http://localhost:8800/login".to_string(),
            timeout_seconds: 5,
        }
    }
}

/// Posts credential pairs to the portal and maps the response to a verdict.
pub struct PortalClient {
    settings: PortalSettings,
    http: reqwest::Client,
}

impl PortalClient {
    pub fn new(settings: PortalSettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .map_err(|e| CapyError::Provider(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { settings, http })
    }

    /// `Ok(true)` on 2xx, `Ok(false)` on 401/403, `Err` on anything else
    /// (including timeouts). Callers treat `Err` as a failed authentication,
    /// never as a crash.
    pub async fn check_credentials(&self, ra: &str, password: &str) -> Result<bool> {
        info!(ra = %ra, "Authenticating against portal");

        let response = self
            .http
            .post(&self.settings.login_url)
            .form(&[("ra", ra), ("password", password)])
            .send()
            .await
            .map_err(|e| CapyError::Provider(format!("Portal request failed: {}", e)))?;

        let status = response.status();
        debug!(ra = %ra, %status, "Portal responded");

        if status.is_success() {
            return Ok(true);
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Ok(false);
        }
        Err(CapyError::Provider(format!("Portal returned {}", status)))
    }
}

//! HTTP surface: WAHA webhook intake and the health probe.
//!
//! The webhook answers 200 as soon as the message is accepted; actual handling
//! runs in a spawned task so a slow provider never makes the gateway retry.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use capy_core::Gateway;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use crate::router::ConversationRouter;

#[derive(Clone)]
pub struct AppState {
    pub router: Arc<ConversationRouter>,
    pub gateway: Arc<dyn Gateway>,
}

/// WAHA event envelope. Only `message.any` events are routed.
#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub payload: WebhookPayload,
}

#[derive(Debug, Default, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(rename = "fromMe", default)]
    pub from_me: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub session_status: String,
    pub response_time_ms: f64,
}

/// Builds the axum router for the webhook and health endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/webhook", post(receive_webhook))
        .route("/health", get(health))
        .with_state(state)
}

async fn receive_webhook(
    State(state): State<AppState>,
    Json(event): Json<WebhookEvent>,
) -> (StatusCode, &'static str) {
    if event.event != "message.any" {
        return (StatusCode::OK, "OK");
    }
    let (Some(chat_id), Some(body)) = (event.payload.from, event.payload.body) else {
        return (StatusCode::OK, "OK");
    };
    if body.trim().is_empty() {
        return (StatusCode::OK, "OK");
    }

    let from_me = event.payload.from_me;
    let router = state.router.clone();
    tokio::spawn(async move {
        if let Err(e) = router.process_message(&chat_id, &body, from_me).await {
            error!(chat_id = %chat_id, error = %e, "Message processing failed");
        }
    });

    (StatusCode::OK, "OK")
}

/// Probes the gateway session. `WORKING` reads as online; a timeout or
/// connection failure degrades the status instead of erroring the endpoint.
async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    let started = Instant::now();
    let (status, session_status) = match state.gateway.session_status().await {
        Ok(session_status) => {
            let status = if session_status == "WORKING" {
                "online"
            } else {
                "offline"
            };
            (status, session_status)
        }
        Err(e) => {
            info!(error = %e, "Gateway health probe failed");
            ("error", e.to_string())
        }
    };

    Json(HealthStatus {
        status,
        session_status,
        response_time_ms: started.elapsed().as_secs_f64() * 1000.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webhook_event_parses_waha_envelope() {
        let event: WebhookEvent = serde_json::from_str(
            r#"{
                "event": "message.any",
                "payload": {"from": "554199999999@c.us", "body": "oi", "fromMe": false}
            }"#,
        )
        .unwrap();

        assert_eq!(event.event, "message.any");
        assert_eq!(event.payload.from.as_deref(), Some("554199999999@c.us"));
        assert_eq!(event.payload.body.as_deref(), Some("oi"));
        assert!(!event.payload.from_me);
    }

    #[test]
    fn test_webhook_event_tolerates_missing_fields() {
        let event: WebhookEvent =
            serde_json::from_str(r#"{"event": "session.status"}"#).unwrap();

        assert_eq!(event.event, "session.status");
        assert!(event.payload.from.is_none());
        assert!(event.payload.body.is_none());
        assert!(!event.payload.from_me);
    }
}

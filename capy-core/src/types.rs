//! Core types: conversation state, user session, message direction, flow outcome.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which flow, if any, owns the next inbound message of a session.
///
/// `Idle` is the rest state: outside an active flow the session is always `Idle`
/// and `flow_scratch` is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FlowState {
    #[default]
    Idle,
    AwaitingRa,
    AwaitingPassword,
    AwaitingCourseChoice,
    AwaitingTermChoice,
}

impl FlowState {
    /// Column representation; `Idle` is stored as NULL.
    pub fn as_column(&self) -> Option<&'static str> {
        match self {
            FlowState::Idle => None,
            FlowState::AwaitingRa => Some("awaiting_ra"),
            FlowState::AwaitingPassword => Some("awaiting_password"),
            FlowState::AwaitingCourseChoice => Some("awaiting_course_choice"),
            FlowState::AwaitingTermChoice => Some("awaiting_term_choice"),
        }
    }

    /// Parses the column representation. Unknown tags map to `Idle` so a
    /// session never gets stuck on a state no handler owns.
    pub fn from_column(value: Option<&str>) -> Self {
        match value {
            Some("awaiting_ra") => FlowState::AwaitingRa,
            Some("awaiting_password") => FlowState::AwaitingPassword,
            Some("awaiting_course_choice") => FlowState::AwaitingCourseChoice,
            Some("awaiting_term_choice") => FlowState::AwaitingTermChoice,
            _ => FlowState::Idle,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, FlowState::Idle)
    }
}

/// One user session per chat identifier.
///
/// Created lazily on the first inbound message from an unseen chat id and
/// mutated only by the router and flow handlers while the per-chat lock is held.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSession {
    /// WhatsApp chat identifier (e.g. `554199999999@c.us`), unique key.
    pub chat_id: String,
    /// Academic registry (RA), set once authenticated.
    pub ra: Option<String>,
    pub is_authenticated: bool,
    pub current_state: FlowState,
    pub selected_course_id: Option<i64>,
    pub selected_term_id: Option<i64>,
    /// Cross-step data within a single flow (e.g. the RA typed before the
    /// password step). Must be empty whenever `current_state` is `Idle`.
    pub flow_scratch: HashMap<String, String>,
    pub last_activity: DateTime<Utc>,
}

impl UserSession {
    /// Fresh unauthenticated session for a chat id.
    pub fn new(chat_id: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            ra: None,
            is_authenticated: false,
            current_state: FlowState::Idle,
            selected_course_id: None,
            selected_term_id: None,
            flow_scratch: HashMap::new(),
            last_activity: Utc::now(),
        }
    }

    /// Returns the session to `Idle` and discards flow scratch data.
    pub fn reset_flow(&mut self) {
        self.current_state = FlowState::Idle;
        self.flow_scratch.clear();
    }

    /// Enters `state`, clearing scratch left over from a previous flow.
    pub fn enter_flow(&mut self, state: FlowState) {
        self.flow_scratch.clear();
        self.current_state = state;
    }
}

/// Direction of a logged message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageDirection {
    Received,
    Sent,
}

impl MessageDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageDirection::Received => "received",
            MessageDirection::Sent => "sent",
        }
    }
}

/// Result of offering a message to a flow handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
    /// The handler owned the state and fully consumed the message.
    Consumed,
    /// The session is not in a state this handler owns.
    NotApplicable,
}

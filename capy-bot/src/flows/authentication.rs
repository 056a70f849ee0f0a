//! Authentication flow: login (RA then password) and logout.

use async_trait::async_trait;
use capy_core::{FlowHandler, FlowOutcome, FlowState, Result, UserSession};
use portal_auth::AuthProvider;
use std::sync::Arc;
use storage::SessionRepository;
use tracing::{error, info, warn};

use super::db_err;
use crate::messenger::Messenger;
use crate::texts;

/// Scratch key holding the RA typed before the password step.
const SCRATCH_RA: &str = "temp_ra";

/// Minimum RA length; a syntactic sanity check, not format validation.
const MIN_RA_LEN: usize = 5;

pub struct AuthenticationFlow {
    messenger: Arc<Messenger>,
    sessions: Arc<SessionRepository>,
    auth: Arc<dyn AuthProvider>,
}

impl AuthenticationFlow {
    pub fn new(
        messenger: Arc<Messenger>,
        sessions: Arc<SessionRepository>,
        auth: Arc<dyn AuthProvider>,
    ) -> Self {
        Self {
            messenger,
            sessions,
            auth,
        }
    }

    /// Entry point for `1`/`cadastrar`/`login`/`entrar`. Idempotent when the
    /// session is already authenticated.
    pub async fn start_login(&self, session: &mut UserSession) -> Result<()> {
        if session.is_authenticated {
            self.messenger
                .send(&session.chat_id, texts::ALREADY_REGISTERED)
                .await;
            return Ok(());
        }

        session.enter_flow(FlowState::AwaitingRa);
        self.sessions.update_flow(session).await.map_err(db_err)?;

        let msg = self
            .messenger
            .text_for(texts::KEY_LOGIN_PROMPT_RA, texts::DEFAULT_LOGIN_PROMPT_RA)
            .await;
        self.messenger.send(&session.chat_id, &msg).await;
        Ok(())
    }

    async fn handle_ra(&self, session: &mut UserSession, text: &str) -> Result<()> {
        let ra = text.trim().to_lowercase();

        if ra.chars().count() < MIN_RA_LEN {
            self.messenger
                .send(&session.chat_id, texts::RA_TOO_SHORT)
                .await;
            return Ok(());
        }

        session.flow_scratch.insert(SCRATCH_RA.to_string(), ra);
        session.current_state = FlowState::AwaitingPassword;
        self.sessions.update_flow(session).await.map_err(db_err)?;

        let msg = self
            .messenger
            .text_for(
                texts::KEY_LOGIN_PROMPT_PASSWORD,
                texts::DEFAULT_LOGIN_PROMPT_PASSWORD,
            )
            .await;
        self.messenger.send(&session.chat_id, &msg).await;
        Ok(())
    }

    async fn handle_password(&self, session: &mut UserSession, text: &str) -> Result<()> {
        // Password is used exactly as typed; only surrounding whitespace goes.
        let password = text.trim();

        let Some(ra) = session.flow_scratch.get(SCRATCH_RA).cloned() else {
            // State says password step but the RA is gone: flow integrity
            // violation, restart rather than guessing.
            warn!(chat_id = %session.chat_id, "Password step without stored RA, resetting flow");
            self.messenger
                .send(&session.chat_id, texts::FLOW_ERROR)
                .await;
            session.reset_flow();
            self.sessions.update_flow(session).await.map_err(db_err)?;
            return Ok(());
        };

        self.messenger
            .send(&session.chat_id, texts::VALIDATING_CREDENTIALS)
            .await;

        let authenticated = match self.auth.authenticate(&ra, password).await {
            Ok(ok) => ok,
            Err(e) => {
                warn!(chat_id = %session.chat_id, error = %e, "Authentication provider failed");
                false
            }
        };

        if !authenticated {
            warn!(chat_id = %session.chat_id, ra = %ra, "Authentication failed");
            let msg = self
                .messenger
                .text_for(texts::KEY_LOGIN_ERROR, texts::DEFAULT_LOGIN_ERROR)
                .await;
            self.messenger.send(&session.chat_id, &msg).await;
            // Stay in awaiting_password so the user can retry the password
            // without re-entering the RA.
            return Ok(());
        }

        if let Err(e) = self.auth.link(&session.chat_id, &ra, password).await {
            error!(chat_id = %session.chat_id, error = %e, "Failed to link identity");
            let msg = self
                .messenger
                .text_for(texts::KEY_LOGIN_ERROR, texts::DEFAULT_LOGIN_ERROR)
                .await;
            self.messenger.send(&session.chat_id, &msg).await;
            return Ok(());
        }

        session.is_authenticated = true;
        session.ra = Some(ra.clone());
        session.reset_flow();
        self.sessions.update_flow(session).await.map_err(db_err)?;

        let msg = self
            .messenger
            .text_for(texts::KEY_LOGIN_SUCCESS, texts::DEFAULT_LOGIN_SUCCESS)
            .await;
        self.messenger.send(&session.chat_id, &msg).await;

        info!(chat_id = %session.chat_id, ra = %ra, "User authenticated");
        Ok(())
    }

    /// Entry point for `2`/`logout`/`deslogar` and the `sair` global command.
    /// Idempotent: logging out an already-logged-out session sends the same
    /// confirmation.
    pub async fn logout(&self, session: &mut UserSession) -> Result<()> {
        match self.auth.logout(&session.chat_id).await {
            Ok(_) => {
                session.is_authenticated = false;
                session.selected_course_id = None;
                session.selected_term_id = None;
                session.reset_flow();
                self.messenger
                    .send(&session.chat_id, texts::LOGGED_OUT)
                    .await;
                info!(chat_id = %session.chat_id, "User logged out");
            }
            Err(e) => {
                error!(chat_id = %session.chat_id, error = %e, "Logout failed");
                self.messenger
                    .send(&session.chat_id, texts::FLOW_ERROR)
                    .await;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl FlowHandler for AuthenticationFlow {
    async fn try_handle(&self, session: &mut UserSession, text: &str) -> Result<FlowOutcome> {
        match session.current_state {
            FlowState::AwaitingRa => {
                self.handle_ra(session, text).await?;
                Ok(FlowOutcome::Consumed)
            }
            FlowState::AwaitingPassword => {
                self.handle_password(session, text).await?;
                Ok(FlowOutcome::Consumed)
            }
            _ => Ok(FlowOutcome::NotApplicable),
        }
    }
}

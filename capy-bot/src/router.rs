//! Conversation router: normalizes inbound text, resolves the session, applies
//! global commands, then dispatches to the flow owning the current state.
//!
//! Message handling for one chat id is fully serialized behind [`ChatLocks`];
//! different chats proceed concurrently.

use capy_core::{FlowHandler, FlowOutcome, FlowState, Result, UserSession};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::chat_locks::ChatLocks;
use crate::flows::{db_err, AuthenticationFlow, JobSearchFlow, MenuFlow};
use crate::messenger::Messenger;
use crate::texts;

/// Synonyms for "show menu". Checked before anything else.
const MENU_COMMANDS: &[&str] = &["menu", "inicio", "início", "start", "começar"];

/// Synonyms for "cancel/back/exit". `sair` doubles as logout when authenticated.
const CANCEL_COMMANDS: &[&str] = &["cancelar", "voltar", "sair"];
const LOGOUT_SYNONYM: &str = "sair";

pub struct ConversationRouter {
    sessions: Arc<storage::SessionRepository>,
    messenger: Arc<Messenger>,
    auth_flow: Arc<AuthenticationFlow>,
    job_flow: Arc<JobSearchFlow>,
    menu_flow: Arc<MenuFlow>,
    locks: ChatLocks,
}

impl ConversationRouter {
    pub fn new(
        sessions: Arc<storage::SessionRepository>,
        messenger: Arc<Messenger>,
        auth_flow: Arc<AuthenticationFlow>,
        job_flow: Arc<JobSearchFlow>,
        menu_flow: Arc<MenuFlow>,
    ) -> Self {
        Self {
            sessions,
            messenger,
            auth_flow,
            job_flow,
            menu_flow,
            locks: ChatLocks::new(),
        }
    }

    /// Entry point for every inbound message.
    ///
    /// Silently ignores bot echoes and blank texts; everything else produces
    /// at least one reply.
    #[instrument(skip(self, raw_text))]
    pub async fn process_message(
        &self,
        chat_id: &str,
        raw_text: &str,
        is_from_bot: bool,
    ) -> Result<()> {
        if is_from_bot {
            return Ok(());
        }
        let text = raw_text.trim();
        if text.is_empty() {
            return Ok(());
        }

        // Serialize handling per chat id for the whole sequence.
        let _guard = self.locks.acquire(chat_id).await;

        // Lower-cased copy for command matching; flows get the original case.
        let command = text.to_lowercase();

        let (mut session, created) = self
            .sessions
            .get_or_create(chat_id)
            .await
            .map_err(db_err)?;
        if created {
            info!(chat_id = %chat_id, "New user");
        }

        self.messenger.log_received(chat_id, raw_text).await;
        self.sessions.touch(chat_id).await.map_err(db_err)?;

        // Global commands win over any in-flight flow.
        if MENU_COMMANDS.contains(&command.as_str()) {
            self.reset_state(&mut session).await?;
            self.menu_flow.send_menu(&session).await;
            return Ok(());
        }

        if CANCEL_COMMANDS.contains(&command.as_str()) {
            if command == LOGOUT_SYNONYM && session.is_authenticated {
                return self.auth_flow.logout(&mut session).await;
            }
            self.reset_state(&mut session).await?;
            self.messenger.send(chat_id, texts::ACTION_CANCELLED).await;
            self.menu_flow.send_menu(&session).await;
            return Ok(());
        }

        // State dispatch: one owning handler per state.
        if !session.current_state.is_idle() {
            if let Some(flow) = self.owning_flow(session.current_state) {
                if flow.try_handle(&mut session, text).await? == FlowOutcome::Consumed {
                    return Ok(());
                }
            }
        }

        // Main-menu commands.
        match command.as_str() {
            "1" | "cadastrar" | "login" | "entrar" => {
                self.auth_flow.start_login(&mut session).await
            }
            "2" | "logout" | "deslogar" => self.auth_flow.logout(&mut session).await,
            "3" | "vagas" | "buscar" | "cursos" => {
                self.job_flow.start_course_selection(&mut session).await
            }
            _ => {
                // First contact gets the menu as a greeting; after that an
                // unrecognized command points at it instead.
                if created {
                    self.menu_flow.send_menu(&session).await;
                } else {
                    self.menu_flow.send_unknown(&session).await;
                }
                Ok(())
            }
        }
    }

    /// State → owning handler table. Adding a flow means one new enum case and
    /// one arm here.
    fn owning_flow(&self, state: FlowState) -> Option<Arc<dyn FlowHandler>> {
        match state {
            FlowState::Idle => None,
            FlowState::AwaitingRa | FlowState::AwaitingPassword => {
                Some(self.auth_flow.clone() as Arc<dyn FlowHandler>)
            }
            FlowState::AwaitingCourseChoice | FlowState::AwaitingTermChoice => {
                Some(self.job_flow.clone() as Arc<dyn FlowHandler>)
            }
        }
    }

    async fn reset_state(&self, session: &mut UserSession) -> Result<()> {
        session.reset_flow();
        self.sessions.update_flow(session).await.map_err(db_err)?;
        Ok(())
    }
}

//! Menu flow: main menu and unknown-command replies.
//!
//! Stateless; both renderers are pure text builders, sending is left to the
//! thin wrappers so the router and other flows can reuse them.

use capy_core::UserSession;
use std::sync::Arc;
use tracing::{debug, info};

use crate::messenger::Messenger;
use crate::texts;

pub struct MenuFlow {
    messenger: Arc<Messenger>,
}

impl MenuFlow {
    pub fn new(messenger: Arc<Messenger>) -> Self {
        Self { messenger }
    }

    /// Builds the main menu, branching on authentication.
    pub fn render_menu(session: &UserSession) -> String {
        if session.is_authenticated {
            format!(
                "{}\n\n👤 *Usuário*: {}\n\n📋 *Menu Principal*:\n\
                 1️⃣ Atualizar Cadastro\n\
                 2️⃣ Sair da Conta\n\
                 3️⃣ Buscar Vagas\n\n\
                 Digite o número da opção desejada.",
                texts::BRAND_HEADER,
                session.ra.as_deref().unwrap_or("Não cadastrado"),
            )
        } else {
            format!(
                "{}\n\n📋 *Menu Principal*:\n\
                 1️⃣ Fazer Cadastro/Login\n\
                 3️⃣ Buscar Vagas\n\n\
                 Digite o número da opção desejada.",
                texts::BRAND_HEADER,
            )
        }
    }

    pub fn render_unknown_command() -> &'static str {
        texts::DEFAULT_UNKNOWN_COMMAND
    }

    pub async fn send_menu(&self, session: &UserSession) {
        let menu = Self::render_menu(session);
        self.messenger.send(&session.chat_id, &menu).await;
        info!(
            chat_id = %session.chat_id,
            authenticated = session.is_authenticated,
            "Menu displayed"
        );
    }

    pub async fn send_unknown(&self, session: &UserSession) {
        let msg = self
            .messenger
            .text_for(texts::KEY_UNKNOWN_COMMAND, Self::render_unknown_command())
            .await;
        self.messenger.send(&session.chat_id, &msg).await;
        debug!(chat_id = %session.chat_id, "Unknown command");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_menu_unauthenticated_offers_login() {
        let session = UserSession::new("555@c.us");
        let menu = MenuFlow::render_menu(&session);
        assert!(menu.contains("CapyVagas"));
        assert!(menu.contains("1️⃣ Fazer Cadastro/Login"));
        assert!(menu.contains("3️⃣ Buscar Vagas"));
        assert!(!menu.contains("Sair da Conta"));
    }

    #[test]
    fn test_render_menu_authenticated_shows_ra_and_logout() {
        let mut session = UserSession::new("555@c.us");
        session.is_authenticated = true;
        session.ra = Some("a1234567".to_string());
        let menu = MenuFlow::render_menu(&session);
        assert!(menu.contains("a1234567"));
        assert!(menu.contains("2️⃣ Sair da Conta"));
        assert!(menu.contains("1️⃣ Atualizar Cadastro"));
    }
}

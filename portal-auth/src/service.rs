//! `PortalAuthService`: the production [`AuthProvider`].
//!
//! Ties the portal client, the credential cipher and the session store. The
//! password is encrypted the moment a link is requested; only ciphertext ever
//! reaches a sessions row.

use async_trait::async_trait;
use capy_core::{CapyError, Result};
use std::sync::Arc;
use storage::SessionRepository;
use tracing::info;

use crate::cipher::CredentialCipher;
use crate::portal_client::PortalClient;
use crate::provider::AuthProvider;

pub struct PortalAuthService {
    portal: PortalClient,
    sessions: Arc<SessionRepository>,
    cipher: Arc<dyn CredentialCipher>,
}

impl PortalAuthService {
    pub fn new(
        portal: PortalClient,
        sessions: Arc<SessionRepository>,
        cipher: Arc<dyn CredentialCipher>,
    ) -> Self {
        Self {
            portal,
            sessions,
            cipher,
        }
    }
}

#[async_trait]
impl AuthProvider for PortalAuthService {
    async fn authenticate(&self, ra: &str, password: &str) -> Result<bool> {
        self.portal.check_credentials(ra, password).await
    }

    async fn link(&self, chat_id: &str, ra: &str, password: &str) -> Result<()> {
        let encrypted = self.cipher.encrypt(password);
        self.sessions
            .mark_authenticated(chat_id, ra, &encrypted)
            .await
            .map_err(|e| CapyError::Database(e.to_string()))?;

        info!(chat_id = %chat_id, ra = %ra, "Linked portal identity");
        Ok(())
    }

    async fn logout(&self, chat_id: &str) -> Result<bool> {
        let existed = self
            .sessions
            .apply_logout(chat_id)
            .await
            .map_err(|e| CapyError::Database(e.to_string()))?;

        info!(chat_id = %chat_id, existed, "Logged out");
        Ok(existed)
    }
}

//! Portal authentication: credential validation against the student portal,
//! identity linking with encryption at rest, and logout.
//!
//! ## Modules
//!
//! - [`provider`] – the `AuthProvider` trait the flows depend on
//! - [`portal_client`] – HTTP client for the portal login endpoint
//! - [`cipher`] – `CredentialCipher` boundary and the Fernet implementation
//! - [`service`] – `PortalAuthService` tying client, cipher and session store

mod cipher;
mod portal_client;
mod provider;
mod service;

pub use cipher::{CredentialCipher, FernetCipher};
pub use portal_client::{PortalClient, PortalSettings};
pub use provider::AuthProvider;
pub use service::PortalAuthService;

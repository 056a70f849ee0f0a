//! # capy-bot
//!
//! Assembly crate for the CapyVagas WhatsApp bot: env config, component
//! factory, the conversation router with its three flows, per-chat
//! serialization, and the webhook/health HTTP surface.

pub mod chat_locks;
pub mod cli;
pub mod components;
pub mod config;
pub mod flows;
pub mod messenger;
pub mod router;
pub mod texts;
pub mod webhook;

pub use chat_locks::ChatLocks;
pub use cli::{Cli, Commands};
pub use components::{build_components, build_router, BotComponents};
pub use config::BotConfig;
pub use messenger::Messenger;
pub use router::ConversationRouter;
pub use webhook::{create_router, AppState};

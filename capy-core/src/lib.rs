//! # capy-core
//!
//! Core types and traits for the CapyVagas WhatsApp bot: [`UserSession`], [`FlowState`],
//! the [`FlowHandler`] and [`Gateway`] traits, error types, and tracing initialization.
//! Transport-agnostic; used by storage, waha-gateway and capy-bot.

pub mod error;
pub mod flow;
pub mod gateway;
pub mod logger;
pub mod types;

pub use error::{CapyError, Result};
pub use flow::FlowHandler;
pub use gateway::Gateway;
pub use logger::init_tracing;
pub use types::{FlowOutcome, FlowState, MessageDirection, UserSession};

//! CLI parser and config loading.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::BotConfig;

#[derive(Parser)]
#[command(name = "capyvagas")]
#[command(about = "CapyVagas WhatsApp bot", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the webhook and health endpoints (config from env; --bind overrides BIND_ADDR).
    Serve {
        #[arg(short, long)]
        bind: Option<String>,
    },
}

/// Load BotConfig from environment. If `bind` is provided it overrides BIND_ADDR.
pub fn load_config(bind: Option<String>) -> Result<BotConfig> {
    let mut config = BotConfig::load()?;
    if let Some(bind) = bind {
        config.bind_addr = bind;
    }
    Ok(config)
}

//! Binary for the CapyVagas bot: webhook server wired to the conversation router.

use anyhow::Result;
use capy_bot::cli::{load_config, Cli, Commands};
use capy_bot::{build_components, build_router, create_router, AppState};
use capy_core::init_tracing;
use clap::Parser;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { bind } => {
            let config = load_config(bind)?;
            config.validate()?;

            std::fs::create_dir_all("logs")?;
            init_tracing(&config.log_file)?;

            let components = build_components(&config).await?;
            let router = build_router(&config, &components);
            let app = create_router(AppState {
                router,
                gateway: components.gateway.clone(),
            });

            let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
            info!(bind_addr = %config.bind_addr, "CapyVagas listening");
            axum::serve(listener, app).await?;
            Ok(())
        }
    }
}

pub mod api;
pub mod auth;
pub mod cli;
pub mod context;
pub mod core;
pub mod i18n;
pub mod store;

use crate::context::AppContext;
use crate::core::config::AppConfig;
use anyhow::Result;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub enum AppCommand {
    Login { username: Option<String> },
    Logout,
    Budget { year: Option<u16> },
    Investments,
    Market { symbols: Vec<String> },
    Crypto,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("finboard starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let ctx = AppContext::new(config)?;

    match command {
        AppCommand::Login { username } => cli::login::run(&ctx, username).await,
        AppCommand::Logout => cli::login::logout(&ctx).await,
        AppCommand::Budget { year } => cli::budget::run(&ctx, year).await,
        AppCommand::Investments => cli::investments::run(&ctx).await,
        AppCommand::Market { symbols } => cli::market::run(&ctx, symbols).await,
        AppCommand::Crypto => cli::crypto::run(&ctx).await,
    }
}

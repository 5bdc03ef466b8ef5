use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use finboard::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for finboard::AppCommand {
    fn from(cmd: Commands) -> finboard::AppCommand {
        match cmd {
            Commands::Login { username } => finboard::AppCommand::Login { username },
            Commands::Logout => finboard::AppCommand::Logout,
            Commands::Budget { year } => finboard::AppCommand::Budget { year },
            Commands::Investments => finboard::AppCommand::Investments,
            Commands::Market { symbols } => finboard::AppCommand::Market { symbols },
            Commands::Crypto => finboard::AppCommand::Crypto,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Log in to the backend and persist the session
    Login {
        /// Username; prompted for when omitted
        #[arg(short, long)]
        username: Option<String>,
    },
    /// Destroy the persisted session
    Logout,
    /// Display the budget summary
    Budget {
        /// Budget year; defaults to the current year
        #[arg(short, long)]
        year: Option<u16>,
    },
    /// Display investment holdings
    Investments,
    /// Display market quotes
    Market {
        /// Symbols to quote
        #[arg(required = true)]
        symbols: Vec<String>,
    },
    /// Display crypto assets
    Crypto,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => finboard::cli::setup::setup(),
        Some(cmd) => finboard::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

//! ledgerlink - command-line front end for a personal ledger account.
//!
//! Logs in against the ledger backend, shows the balance and transaction
//! history, records and removes entries, and manages the profile photo.

mod app;

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::App;

#[derive(Debug, Parser)]
#[command(name = "ledgerlink", version, about = "Personal ledger from the terminal")]
struct Cli {
    /// Backend root URL (overrides config and LEDGERLINK_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Log in and store the session token
    Login {
        #[arg(long)]
        email: Option<String>,
    },
    /// Create a new account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    /// Show balance and transactions
    Home,
    /// Record a transaction
    Add {
        /// entrada/income or saida/expense
        #[arg(long)]
        kind: String,
        /// Amount in local notation, e.g. 100,50 or 1.234,56
        #[arg(long)]
        amount: String,
        #[arg(long)]
        description: String,
    },
    /// Remove a transaction by id
    Remove { id: i64 },
    /// Show profile data
    Profile,
    /// Upload a new profile photo
    Photo { path: PathBuf },
    /// End the session
    Logout,
    /// Show whether a session token is stored
    Status,
}

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // RUST_LOG controls the level (e.g. RUST_LOG=ledgerlink_core=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing();
    info!("ledgerlink starting");

    let mut app = App::new(cli.base_url)?;
    let result = match cli.command {
        Command::Login { email } => app.login(email).await,
        Command::Register { name, email } => app.register(name, email).await,
        Command::Home => app.home().await,
        Command::Add { kind, amount, description } => app.add(&kind, amount, description).await,
        Command::Remove { id } => app.remove(id).await,
        Command::Profile => app.profile().await,
        Command::Photo { path } => app.photo(&path).await,
        Command::Logout => app.logout().await,
        Command::Status => app.status(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}

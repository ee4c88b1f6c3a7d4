//! NeuroScan command-line client.

mod app;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use client_core::{init_logging, Config, Paths};

/// NeuroScan client command-line interface.
#[derive(Parser)]
#[command(name = "neuroscan")]
#[command(about = "Client for the NeuroScan detection service")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Base directory for runtime files (config, credentials, logs). Defaults to ~/.neuroscan
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and sign in
    Signup {
        /// Full name of the new user
        #[arg(long)]
        full_name: String,
        /// Email address
        #[arg(long)]
        email: String,
        /// Password
        #[arg(long)]
        password: String,
    },
    /// Sign in with email and password
    Login {
        /// Email address
        #[arg(long)]
        email: String,
        /// Password
        #[arg(long)]
        password: String,
    },
    /// Sign out and revoke the session
    Logout,
    /// Show whether a user is signed in
    Status,
    /// Fetch the signed-in user's profile
    Profile,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    init_logging(&cli.log_level);

    let paths = match cli.base_dir {
        Some(base) => Paths::with_base_dir(base),
        None => Paths::new()?,
    };
    let config = Config::load(&paths)?;

    let app = app::App::build(&config, &paths).await?;

    match cli.command {
        Commands::Signup {
            full_name,
            email,
            password,
        } => app.signup(&full_name, &email, &password).await?,
        Commands::Login { email, password } => app.login(&email, &password).await?,
        Commands::Logout => app.logout().await?,
        Commands::Status => app.status().await?,
        Commands::Profile => app.profile().await?,
    }

    Ok(())
}

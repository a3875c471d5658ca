//! examgate CLI — console exam management.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "examgate", version, about = "Console exam management for admins, teachers and students")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive login session (default)
    Run {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate a config file
    Validate {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List the accounts a session would start with
    Accounts {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config file
    Init,
}

fn main() {
    // Logs go to stderr; stdout carries the console session.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("examgate=warn".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command.unwrap_or(Commands::Run { config: None }) {
        Commands::Run { config } => commands::run::execute(config),
        Commands::Validate { config } => commands::validate::execute(config),
        Commands::Accounts { config } => commands::accounts::execute(config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

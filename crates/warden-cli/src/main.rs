mod client;
mod commands;
mod daemon_launcher;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "warden")]
#[command(about = "Warden CLI - Block distracting applications", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show whether usage access is granted
    Permission {
        /// Ask for usage access instead of only checking it
        #[arg(long)]
        request: bool,
    },
    /// Manage the blocked application list
    Block {
        #[command(subcommand)]
        command: BlockCommands,
    },
    /// Start foreground monitoring (launches the daemon if needed)
    Start {
        /// Polling interval in milliseconds
        #[arg(long)]
        interval_ms: Option<u64>,
    },
    /// Stop foreground monitoring
    Stop,
    /// Show the monitor status
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Show foreground time per application
    Stats {
        /// Number of days to look back
        #[arg(long)]
        days: Option<u32>,
        #[arg(long)]
        json: bool,
    },
    /// List launchable installed applications
    Apps {
        #[arg(long)]
        json: bool,
    },
    /// Print blocked applications as they are detected
    Watch {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum BlockCommands {
    /// Replace the blocklist (no identifiers clears it)
    Set { packages: Vec<String> },
    /// Print the blocklist
    List {
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Permission { request } => commands::permission(request).await,
        Commands::Block { command } => match command {
            BlockCommands::Set { packages } => commands::block_set(packages).await,
            BlockCommands::List { json } => commands::block_list(json).await,
        },
        Commands::Start { interval_ms } => commands::start(interval_ms).await,
        Commands::Stop => commands::stop().await,
        Commands::Status { json } => commands::status(json).await,
        Commands::Stats { days, json } => commands::stats(days, json).await,
        Commands::Apps { json } => commands::apps(json).await,
        Commands::Watch { json } => commands::watch(json).await,
    }
}

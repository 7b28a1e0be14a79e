use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

use commands::{CampaignsArgs, ReportArgs, RunArgs, StatusArgs};

#[derive(Parser)]
#[command(name = "options-tracker")]
#[command(about = "Options position tracker for the IB Client Portal gateway", long_about = None)]
struct Cli {
    /// Directory holding Tracker.toml
    #[arg(short, long, global = true, default_value = "config", env = "OPTIONS_TRACKER_CONFIG")]
    config: PathBuf,

    /// Profile overlay (loads Tracker.<profile>.toml)
    #[arg(short, long, global = true, env = "OPTIONS_TRACKER_PROFILE")]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one batch: fetch, price, classify, group, and optionally place target orders
    Run(RunArgs),
    /// Write a CSV report of every position
    Report(ReportArgs),
    /// List campaigns and their inferred strategies
    Campaigns(CampaignsArgs),
    /// Check the gateway session
    Status(StatusArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = commands::load_config(&cli.config, cli.profile.as_deref())?;

    match cli.command {
        Commands::Run(args) => commands::run_batch_command(args, config).await?,
        Commands::Report(args) => commands::run_report(args, config).await?,
        Commands::Campaigns(args) => commands::run_campaigns(args, config).await?,
        Commands::Status(args) => commands::run_status(args, config).await?,
    }

    Ok(())
}

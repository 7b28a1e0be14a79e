//! CLI commands for the options tracker.

pub mod campaigns;
pub mod report;
pub mod run;
pub mod status;

pub use campaigns::{run_campaigns, CampaignsArgs};
pub use report::{run_report, ReportArgs};
pub use run::{run_batch_command, RunArgs};
pub use status::{run_status, StatusArgs};

use std::path::Path;

use anyhow::{Context, Result};
use options_tracker_core::{ConfigLoader, TrackerConfig};
use options_tracker_ib::{IbConfig, IbGateway};

/// Loads the tracker configuration from `dir`, with an optional profile.
pub fn load_config(dir: &Path, profile: Option<&str>) -> Result<TrackerConfig> {
    let config = match profile {
        Some(profile) => ConfigLoader::load_with_profile(dir, profile),
        None => ConfigLoader::load(dir),
    }
    .with_context(|| format!("Failed to load configuration from {}", dir.display()))?;

    tracing::debug!(?config, "Loaded configuration");
    Ok(config)
}

/// Builds the Client Portal gateway client from configuration.
pub fn connect(config: &TrackerConfig) -> Result<IbGateway> {
    let gateway = IbGateway::new(IbConfig::from(&config.gateway))
        .context("Failed to create gateway client")?;
    tracing::info!(base_url = gateway.base_url(), "Using Client Portal gateway");
    Ok(gateway)
}

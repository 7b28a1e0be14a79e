//! `campaigns`: dry-run batch, one line per campaign and its legs.

use anyhow::Result;
use chrono::Local;
use clap::Args;
use options_tracker_core::{Campaign, Position, TrackerConfig};
use options_tracker_manager::{run_batch, BatchReport};

use super::connect;

#[derive(Args, Debug, Clone, Default)]
pub struct CampaignsArgs {
    /// Also list every leg under its campaign
    #[arg(long)]
    pub legs: bool,
}

pub async fn run_campaigns(args: CampaignsArgs, mut config: TrackerConfig) -> Result<()> {
    config.orders.place_orders = false;
    let gateway = connect(&config)?;

    let report = run_batch(&gateway, &config, Local::now().naive_local()).await?;

    print_campaigns(&report);
    if args.legs {
        for campaign in report.campaigns.values() {
            println!();
            println!("{}", format_campaign(campaign));
            for position in campaign.positions() {
                println!("  {}", format_leg(position));
            }
        }
    }
    Ok(())
}

pub(crate) fn print_campaigns(report: &BatchReport) {
    println!(
        "Account {}: {} position(s) in {} campaign(s)",
        report.account_id,
        report.position_count(),
        report.campaigns.len()
    );
    for campaign in report.campaigns.values() {
        println!("{}", format_campaign(campaign));
    }
    for (conid, reason) in &report.unvalued {
        println!("Not valued: {conid} ({reason}); its campaign places no orders");
    }
}

pub(crate) fn format_campaign(campaign: &Campaign) -> String {
    let strategy = campaign
        .strategy_type()
        .map_or_else(|| "-".to_string(), |s| s.to_string());
    format!(
        "{:<8} {:>12} {:<18} {:>2} leg(s) {}",
        campaign.ticker().unwrap_or("?"),
        campaign.underlying_conid(),
        strategy,
        campaign.len(),
        campaign.currency()
    )
}

fn format_leg(position: &Position) -> String {
    let contract = position.contract();
    let leg = position
        .leg_type()
        .map_or_else(|| "-".to_string(), |leg| leg.to_string());
    let target = contract
        .target_price()
        .map_or_else(|| "-".to_string(), |price| price.to_string());
    format!(
        "{:>12} {:<14} {:>8} target {}",
        position.conid(),
        leg,
        position.size(),
        target
    )
}

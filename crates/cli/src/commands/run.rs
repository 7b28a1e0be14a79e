//! `run`: one full batch, optionally placing target orders.

use anyhow::Result;
use chrono::Local;
use clap::Args;
use options_tracker_core::TrackerConfig;
use options_tracker_manager::{run_batch, BatchReport};

use super::campaigns::print_campaigns;
use super::connect;

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Place target orders (overrides `orders.place_orders`)
    #[arg(long)]
    pub place: bool,

    /// Leave existing working orders in place
    #[arg(long)]
    pub keep_orders: bool,
}

impl RunArgs {
    fn apply(&self, config: &mut TrackerConfig) {
        if self.place {
            config.orders.place_orders = true;
        }
        if self.keep_orders {
            config.orders.clear_existing = false;
        }
    }
}

/// Runs the run command.
///
/// # Errors
/// Returns an error if any gateway call or engine step fails.
pub async fn run_batch_command(args: RunArgs, mut config: TrackerConfig) -> Result<()> {
    args.apply(&mut config);
    let gateway = connect(&config)?;

    let report = run_batch(&gateway, &config, Local::now().naive_local()).await?;

    print_campaigns(&report);
    print_orders(&report);
    Ok(())
}

fn print_orders(report: &BatchReport) {
    if report.target_orders.is_empty() {
        println!("No target orders.");
        return;
    }

    println!();
    println!(
        "{:<12} {:<5} {:>8} {:>10}  {}",
        "CONID", "SIDE", "QTY", "LIMIT", "RESULT"
    );
    for order in &report.target_orders {
        let result = report
            .placed
            .iter()
            .find(|placed| placed.conid == order.conid)
            .map_or_else(
                || "not placed".to_string(),
                |placed| match (&placed.order_id, &placed.status) {
                    (Some(id), Some(status)) => format!("{id} {status}"),
                    (Some(id), None) => id.clone(),
                    _ => "sent".to_string(),
                },
            );
        println!(
            "{:<12} {:<5} {:>8} {:>10}  {}",
            order.conid, order.side, order.quantity, order.price, result
        );
    }

    if !report.cancelled.is_empty() {
        println!("Cancelled {} working order(s).", report.cancelled.len());
    }
}

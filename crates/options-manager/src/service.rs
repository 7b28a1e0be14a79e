//! One batch pass: fetch, enrich, price, classify, group, then place.

use anyhow::{bail, Context, Result};
use chrono::NaiveDateTime;
use options_tracker_core::{
    group_into_campaigns, BrokerGateway, Campaign, ClosingOrder, EngineError, PricingContext,
    TrackerConfig,
};
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::executor;
use crate::monitor;
use crate::types::BatchReport;

/// Runs one batch against `gateway`, valued at `as_of`.
///
/// 1. Check the gateway session, resolve the account and list the
///    tradable accounts
/// 2. Fetch positions and enrich them with details and prices
/// 3. Classify positions and group them into campaigns
/// 4. Collect target orders; clear and place them when enabled
pub async fn run_batch(
    gateway: &dyn BrokerGateway,
    config: &TrackerConfig,
    as_of: NaiveDateTime,
) -> Result<BatchReport> {
    let status = gateway
        .auth_status()
        .await
        .context("Failed to query gateway session")?;
    if !status.authenticated {
        bail!("Gateway session is not authenticated; log in to the Client Portal gateway first");
    }

    let account_id = gateway
        .account_id()
        .await
        .context("Failed to resolve account")?;
    let tradable = gateway
        .brokerage_accounts()
        .await
        .context("Failed to list brokerage accounts")?;
    if !tradable.contains(&account_id) {
        warn!(%account_id, ?tradable, "Account is not among the tradable accounts");
    }
    info!(%account_id, %as_of, "Starting batch");

    let policy = config.engine.target_rate_policy();
    let ctx = PricingContext::new(as_of, &policy);

    let mut positions =
        monitor::fetch_positions(gateway, &account_id, config.engine.page_size).await?;
    monitor::enrich_details(gateway, &mut positions).await?;
    let unvalued = monitor::update_prices(gateway, &mut positions, &ctx).await?;
    monitor::classify_all(&mut positions)?;

    let campaigns = group_into_campaigns(positions.into_values())?;
    let target_orders = collect_target_orders(&campaigns, &unvalued)?;
    info!(
        campaigns = campaigns.len(),
        target_orders = target_orders.len(),
        "Campaigns built"
    );

    let (cancelled, placed) = if config.orders.place_orders {
        executor::clear_and_place_target_orders(gateway, &account_id, &target_orders, &config.orders)
            .await?
    } else {
        info!("Order placement disabled; target orders computed only");
        (Vec::new(), Vec::new())
    };

    Ok(BatchReport {
        account_id,
        as_of,
        campaigns,
        unvalued,
        target_orders,
        cancelled,
        placed,
    })
}

/// Target orders of every campaign, in underlying order.
///
/// Campaigns holding an unvalued leg are skipped as a whole.
pub fn collect_target_orders(
    campaigns: &BTreeMap<i64, Campaign>,
    unvalued: &BTreeMap<i64, EngineError>,
) -> Result<Vec<ClosingOrder>> {
    let mut orders = Vec::new();
    for (underlying, campaign) in campaigns {
        let blocked: Vec<i64> = campaign
            .positions()
            .into_iter()
            .map(|position| position.conid())
            .filter(|conid| unvalued.contains_key(conid))
            .collect();
        if !blocked.is_empty() {
            warn!(underlying, ?blocked, "Skipping campaign with unvalued legs");
            continue;
        }
        orders.extend(
            campaign
                .target_orders()
                .with_context(|| format!("Failed to build orders for underlying {underlying}"))?,
        );
    }
    Ok(orders)
}

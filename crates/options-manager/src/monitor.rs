//! Position enrichment: fetch, contract details, prices, classification.
//!
//! Each step touches every position exactly once and runs to completion
//! before the next begins, so campaigns only ever see fully classified
//! positions.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use anyhow::{Context, Result};
use options_tracker_core::{
    BrokerGateway, ContractDetail, EngineError, LegType, MarketSnapshot, Position, PricingContext,
};
use tracing::{debug, info, warn};

/// Reads every positions page of `account_id`.
///
/// Paging stops at the first page shorter than `page_size`. Flat records
/// are dropped; a conid seen twice keeps its last record.
pub async fn fetch_positions(
    gateway: &dyn BrokerGateway,
    account_id: &str,
    page_size: usize,
) -> Result<BTreeMap<i64, Position>> {
    let mut positions = BTreeMap::new();
    let mut page = 0u32;

    loop {
        let records = gateway
            .positions_page(account_id, page)
            .await
            .with_context(|| format!("Failed to fetch positions page {page}"))?;
        let fetched = records.len();

        for record in &records {
            if let Some(position) = Position::from_record(record)
                .with_context(|| format!("Bad position record on page {page}"))?
            {
                positions.insert(position.conid(), position);
            }
        }

        if fetched == 0 || fetched < page_size {
            break;
        }
        page += 1;
    }

    info!(
        account_id,
        pages = page + 1,
        count = positions.len(),
        "Fetched positions"
    );
    Ok(positions)
}

/// Applies contract definitions to every position in one request.
pub async fn enrich_details(
    gateway: &dyn BrokerGateway,
    positions: &mut BTreeMap<i64, Position>,
) -> Result<()> {
    let conids: Vec<i64> = positions.keys().copied().collect();
    let details: HashMap<i64, ContractDetail> = gateway
        .contract_details(&conids)
        .await
        .context("Failed to fetch contract details")?
        .into_iter()
        .filter_map(|detail| detail.conid.map(|conid| (conid, detail)))
        .collect();

    for (conid, position) in positions.iter_mut() {
        let detail = details
            .get(conid)
            .ok_or(EngineError::missing("contract details", "conid"))
            .with_context(|| format!("No contract detail returned for conid {conid}"))?;
        position
            .enrich(detail)
            .with_context(|| format!("Failed to enrich conid {conid}"))?;
    }

    debug!(count = positions.len(), "Enriched contract details");
    Ok(())
}

/// Prices every position and its underlying from one snapshot request.
///
/// An option that cannot be valued at the batch clock (expiring today or
/// already expired) is still priced and classified, but without moneyness.
/// Such legs are returned with their error; any other failure aborts.
pub async fn update_prices(
    gateway: &dyn BrokerGateway,
    positions: &mut BTreeMap<i64, Position>,
    ctx: &PricingContext<'_>,
) -> Result<BTreeMap<i64, EngineError>> {
    let conids: BTreeSet<i64> = positions
        .values()
        .flat_map(|p| [p.conid(), p.contract().underlying_conid()])
        .collect();
    let conids: Vec<i64> = conids.into_iter().collect();

    let snapshots: HashMap<i64, MarketSnapshot> = gateway
        .market_snapshot(&conids)
        .await
        .context("Failed to fetch market snapshot")?
        .into_iter()
        .filter_map(|snapshot| snapshot.conid.map(|conid| (conid, snapshot)))
        .collect();

    let last_price = |conid: i64| -> Result<_> {
        let price = snapshots
            .get(&conid)
            .ok_or(EngineError::missing("market snapshot", "31"))
            .and_then(MarketSnapshot::last_price)
            .with_context(|| format!("No last price for conid {conid}"))?;
        Ok(price)
    };

    let mut unvalued = BTreeMap::new();
    for (conid, position) in positions.iter_mut() {
        let market = last_price(*conid)?;
        let underlying = last_price(position.contract().underlying_conid())?;
        match position.apply_prices(market, underlying, ctx) {
            Ok(()) => {}
            Err(err) if err.is_tenor() => {
                warn!(conid, error = %err, "Leg cannot be valued; no target order");
                position
                    .apply_prices_unvalued(market, underlying, ctx)
                    .with_context(|| format!("Failed to price conid {conid}"))?;
                unvalued.insert(*conid, err);
            }
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to price conid {conid}"));
            }
        }
    }

    debug!(
        positions = positions.len(),
        quoted = conids.len(),
        unvalued = unvalued.len(),
        "Updated prices"
    );
    Ok(unvalued)
}

/// Classifies every priced position and returns the leg-type tally.
pub fn classify_all(positions: &mut BTreeMap<i64, Position>) -> Result<BTreeMap<LegType, usize>> {
    let mut tally = BTreeMap::new();
    for (conid, position) in positions.iter_mut() {
        let leg_type = position
            .classify()
            .with_context(|| format!("Failed to classify conid {conid}"))?;
        *tally.entry(leg_type).or_insert(0) += 1;
    }

    if let Some(unclassified) = tally.get(&LegType::Unclassified) {
        info!(count = unclassified, "Positions outside the leg table");
    }
    Ok(tally)
}

//! Types for one tracker batch.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use options_tracker_core::{Campaign, ClosingOrder, EngineError, PlacedOrder, Position};

/// Outcome of one batch run.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub account_id: String,
    /// Valuation clock used for every moneyness figure.
    pub as_of: NaiveDateTime,
    /// Campaigns keyed by underlying conid.
    pub campaigns: BTreeMap<i64, Campaign>,
    /// Option legs that could not be valued, with the reason. Their
    /// campaigns place no orders in this batch.
    pub unvalued: BTreeMap<i64, EngineError>,
    /// Closing orders the campaigns asked for, placed or not.
    pub target_orders: Vec<ClosingOrder>,
    /// Working orders cancelled before placement.
    pub cancelled: Vec<i64>,
    pub placed: Vec<PlacedOrder>,
}

impl BatchReport {
    /// Every position of the batch, by underlying then conid.
    pub fn positions(&self) -> impl Iterator<Item = &Position> {
        self.campaigns
            .values()
            .flat_map(|campaign| campaign.positions().into_iter())
    }

    pub fn position_count(&self) -> usize {
        self.campaigns.values().map(Campaign::len).sum()
    }

    /// Whether orders were sent to the gateway in this run.
    pub fn orders_submitted(&self) -> bool {
        !self.placed.is_empty() || !self.cancelled.is_empty()
    }
}

//! Flat per-position rows for tabular sinks.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::position::Position;

const LAST_UPDATE_FORMAT: &str = "%d/%m/%Y %H:%M:%S";
const EXPIRY_FORMAT: &str = "%Y%m%d";

/// One selectable report column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReportField {
    #[serde(rename = "lastUpdate")]
    LastUpdate,
    #[serde(rename = "conid")]
    Conid,
    #[serde(rename = "ticker")]
    Ticker,
    #[serde(rename = "undConid")]
    UnderlyingConid,
    #[serde(rename = "expiry")]
    Expiry,
    #[serde(rename = "putOrCall")]
    PutOrCall,
    #[serde(rename = "strike")]
    Strike,
    #[serde(rename = "multiplier")]
    Multiplier,
    #[serde(rename = "currency")]
    Currency,
    #[serde(rename = "mktPrice")]
    MarketPrice,
    #[serde(rename = "undPrice")]
    UnderlyingPrice,
    #[serde(rename = "size")]
    Size,
    #[serde(rename = "avgPrice")]
    AvgPrice,
    #[serde(rename = "dte")]
    DaysToExpiry,
    #[serde(rename = "extrinsic")]
    Extrinsic,
    #[serde(rename = "intrinsic")]
    Intrinsic,
    #[serde(rename = "ann_extrinsic")]
    AnnualizedExtrinsic,
    #[serde(rename = "target")]
    Target,
}

impl ReportField {
    pub const ALL: [ReportField; 18] = [
        Self::LastUpdate,
        Self::Conid,
        Self::Ticker,
        Self::UnderlyingConid,
        Self::Expiry,
        Self::PutOrCall,
        Self::Strike,
        Self::Multiplier,
        Self::Currency,
        Self::MarketPrice,
        Self::UnderlyingPrice,
        Self::Size,
        Self::AvgPrice,
        Self::DaysToExpiry,
        Self::Extrinsic,
        Self::Intrinsic,
        Self::AnnualizedExtrinsic,
        Self::Target,
    ];

    /// Column header name.
    pub const fn header(self) -> &'static str {
        match self {
            Self::LastUpdate => "lastUpdate",
            Self::Conid => "conid",
            Self::Ticker => "ticker",
            Self::UnderlyingConid => "undConid",
            Self::Expiry => "expiry",
            Self::PutOrCall => "putOrCall",
            Self::Strike => "strike",
            Self::Multiplier => "multiplier",
            Self::Currency => "currency",
            Self::MarketPrice => "mktPrice",
            Self::UnderlyingPrice => "undPrice",
            Self::Size => "size",
            Self::AvgPrice => "avgPrice",
            Self::DaysToExpiry => "dte",
            Self::Extrinsic => "extrinsic",
            Self::Intrinsic => "intrinsic",
            Self::AnnualizedExtrinsic => "ann_extrinsic",
            Self::Target => "target",
        }
    }

    pub fn from_header(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.header() == name)
    }

    /// Parses a header row, silently dropping names that are not fields.
    pub fn parse_header<S: AsRef<str>>(names: &[S]) -> Vec<Self> {
        names
            .iter()
            .filter_map(|name| Self::from_header(name.as_ref()))
            .collect()
    }

    /// Renders this field for `position`, or `None` when it is not known
    /// (option terms on a stock, moneyness before pricing, ...).
    pub fn value(self, position: &Position) -> Option<String> {
        let contract = position.contract();
        let terms = contract.option_terms();
        let moneyness = contract.moneyness();

        match self {
            Self::LastUpdate => Some(contract.last_update().format(LAST_UPDATE_FORMAT).to_string()),
            Self::Conid => Some(contract.conid().to_string()),
            Self::Ticker => contract.ticker().map(str::to_string),
            Self::UnderlyingConid => Some(contract.underlying_conid().to_string()),
            Self::Expiry => terms.map(|t| t.expiry.format(EXPIRY_FORMAT).to_string()),
            Self::PutOrCall => terms.map(|t| t.put_or_call.to_string()),
            Self::Strike => terms.map(|t| t.strike.to_string()),
            Self::Multiplier => terms.map(|t| t.multiplier.to_string()),
            Self::Currency => Some(contract.currency().to_string()),
            Self::MarketPrice => contract.market_price().map(|p| p.to_string()),
            Self::UnderlyingPrice => contract.underlying_price().map(|p| p.to_string()),
            Self::Size => Some(position.size().to_string()),
            Self::AvgPrice => Some(position.avg_price().to_string()),
            Self::DaysToExpiry => moneyness.map(|m| m.days_to_expiry.to_string()),
            Self::Extrinsic => moneyness.map(|m| m.extrinsic.to_string()),
            Self::Intrinsic => moneyness.map(|m| m.intrinsic.to_string()),
            Self::AnnualizedExtrinsic => {
                moneyness.map(|m| m.annualized_extrinsic_yield.round_dp(4).to_string())
            }
            Self::Target => moneyness.map(|m| m.target_price.to_string()),
        }
    }
}

impl std::fmt::Display for ReportField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.header())
    }
}

/// The selected fields of one position. Unknown values are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    values: BTreeMap<ReportField, String>,
}

impl ReportRow {
    pub fn from_position(position: &Position, fields: &[ReportField]) -> Self {
        let values = fields
            .iter()
            .filter_map(|&field| field.value(position).map(|v| (field, v)))
            .collect();
        Self { values }
    }

    pub fn get(&self, field: ReportField) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    /// One cell per column, empty for columns that name no field and for
    /// fields with no known value.
    pub fn cells(&self, columns: &[Option<ReportField>]) -> Vec<String> {
        columns
            .iter()
            .map(|column| {
                column
                    .and_then(|field| self.get(field))
                    .unwrap_or_default()
                    .to_string()
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::tests::{option_leg, stock_leg};
    use rust_decimal_macros::dec;

    #[test]
    fn header_round_trip_covers_every_field() {
        for field in ReportField::ALL {
            assert_eq!(ReportField::from_header(field.header()), Some(field));
        }
    }

    #[test]
    fn unknown_headers_are_dropped() {
        let fields = ReportField::parse_header(&["conid", "notes", "target", ""]);
        assert_eq!(fields, vec![ReportField::Conid, ReportField::Target]);
    }

    #[test]
    fn option_row_carries_moneyness() {
        let position = option_leg(700, "P", dec!(-2), 9);

        let row = ReportRow::from_position(&position, &ReportField::ALL);

        assert_eq!(row.get(ReportField::Conid), Some("700"));
        assert_eq!(row.get(ReportField::UnderlyingConid), Some("9"));
        assert_eq!(row.get(ReportField::Expiry), Some("20260401"));
        assert_eq!(row.get(ReportField::PutOrCall), Some("P"));
        assert_eq!(row.get(ReportField::Size), Some("-2"));
        assert_eq!(row.get(ReportField::DaysToExpiry), Some("30"));
        assert_eq!(row.get(ReportField::Intrinsic), Some("5"));
        assert_eq!(row.get(ReportField::Extrinsic), Some("2"));
        assert_eq!(row.get(ReportField::AnnualizedExtrinsic), Some("0.2433"));
        assert_eq!(row.get(ReportField::Target), Some("0.82"));
        assert_eq!(row.get(ReportField::LastUpdate), Some("02/03/2026 00:00:00"));
        assert_eq!(row.len(), ReportField::ALL.len());
    }

    #[test]
    fn stock_row_omits_option_fields() {
        let position = stock_leg(9, dec!(100));

        let row = ReportRow::from_position(&position, &ReportField::ALL);

        assert_eq!(row.get(ReportField::Ticker), Some("XYZ"));
        assert!(row.get(ReportField::Strike).is_none());
        assert!(row.get(ReportField::Expiry).is_none());
        assert!(row.get(ReportField::Target).is_none());
    }

    #[test]
    fn row_only_holds_selected_fields() {
        let position = option_leg(700, "C", dec!(1), 9);
        let fields = [ReportField::Target, ReportField::Conid];

        let row = ReportRow::from_position(&position, &fields);

        assert_eq!(row.len(), 2);
        assert!(row.get(ReportField::Strike).is_none());
        assert_eq!(row.cells(&fields.map(Some)), vec!["0.82", "700"]);
    }

    #[test]
    fn cells_leave_unknown_values_blank() {
        let position = stock_leg(9, dec!(100));
        let fields = [ReportField::Conid, ReportField::Strike, ReportField::Size];
        let columns = [
            Some(ReportField::Conid),
            None,
            Some(ReportField::Strike),
            Some(ReportField::Size),
        ];

        let row = ReportRow::from_position(&position, &fields);

        assert_eq!(row.cells(&columns), vec!["9", "", "", "100"]);
    }
}

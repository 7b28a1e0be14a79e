//! Wire records exchanged with the brokerage gateway.
//!
//! Inbound records keep every key optional so that absent keys surface as
//! [`EngineError::MissingField`] at the point the engine needs them, rather
//! than as an opaque deserialization failure for the whole page.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Instrument asset class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AssetClass {
    Stock,
    Option,
    /// Any other gateway code (FUT, CASH, BOND, ...).
    Other(String),
}

impl AssetClass {
    /// Parses a gateway asset class code.
    pub fn from_code(code: &str) -> Self {
        match code {
            "STK" => Self::Stock,
            "OPT" => Self::Option,
            other => Self::Other(other.to_string()),
        }
    }

    /// Gateway code for this asset class.
    pub fn code(&self) -> &str {
        match self {
            Self::Stock => "STK",
            Self::Option => "OPT",
            Self::Other(code) => code,
        }
    }
}

impl std::fmt::Display for AssetClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Option right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PutOrCall {
    #[serde(rename = "P")]
    Put,
    #[serde(rename = "C")]
    Call,
}

impl PutOrCall {
    pub const fn code(self) -> &'static str {
        match self {
            Self::Put => "P",
            Self::Call => "C",
        }
    }
}

impl FromStr for PutOrCall {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "P" => Ok(Self::Put),
            "C" => Ok(Self::Call),
            other => Err(EngineError::invalid("putOrCall", other)),
        }
    }
}

impl std::fmt::Display for PutOrCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// One entry of the portfolio positions endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionRecord {
    pub conid: Option<i64>,
    pub asset_class: Option<String>,
    pub currency: Option<String>,
    #[serde(rename = "contractDesc", alias = "contractDescription")]
    pub contract_desc: Option<String>,
    pub mkt_price: Option<Decimal>,
    pub position: Option<Decimal>,
    pub avg_price: Option<Decimal>,
}

/// Contract definition returned by the security definition lookup.
///
/// Option keys are required only when the contract is an option.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractDetail {
    pub conid: Option<i64>,
    pub ticker: Option<String>,
    /// Expiry as `YYYYMMDD`.
    pub expiry: Option<String>,
    pub strike: Option<Decimal>,
    pub put_or_call: Option<String>,
    pub multiplier: Option<Decimal>,
    pub und_conid: Option<i64>,
}

/// Market-data snapshot row. Field `31` carries the last price.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub conid: Option<i64>,
    #[serde(rename = "31")]
    pub last: Option<String>,
}

impl MarketSnapshot {
    /// Parses the last price, stripping marker letters such as the `C`
    /// prefix the gateway uses for a prior close.
    pub fn last_price(&self) -> Result<Decimal> {
        let raw = self
            .last
            .as_deref()
            .ok_or(EngineError::missing("market snapshot", "31"))?;
        let numeric = raw.trim().trim_matches(|c: char| c.is_ascii_alphabetic());
        Decimal::from_str(numeric).map_err(|_| EngineError::invalid("31", raw))
    }
}

/// Session state reported by the gateway.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthStatus {
    #[serde(default)]
    pub authenticated: bool,
    #[serde(default)]
    pub connected: bool,
    #[serde(default)]
    pub competing: bool,
}

/// A working or historical order as listed by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveOrder {
    pub order_id: i64,
    #[serde(default)]
    pub conid: Option<i64>,
    #[serde(default)]
    pub ticker: Option<String>,
    pub status: String,
}

impl LiveOrder {
    /// Whether the order can still be cancelled.
    pub fn is_working(&self) -> bool {
        !matches!(self.status.as_str(), "Cancelled" | "Inactive" | "Filled")
    }
}

/// Reply to an order submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrderReply {
    /// The gateway wants an explicit confirmation before accepting.
    Question {
        id: String,
        #[serde(default)]
        message: Vec<String>,
    },
    /// The order was accepted.
    Acknowledged {
        order_id: String,
        order_status: String,
    },
    /// Any shape the engine does not interpret.
    Other(serde_json::Value),
}

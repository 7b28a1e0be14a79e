use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::moneyness::FlatTargetRate;
use crate::report::ReportField;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub gateway: GatewayConfig,
    pub engine: EngineConfig,
    pub orders: OrdersConfig,
    pub report: ReportConfig,
}

/// Client Portal gateway connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub base_url: String,
    /// The local gateway serves a self-signed certificate.
    pub accept_invalid_certs: bool,
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "https://localhost:5000/v1/api".to_string(),
            accept_invalid_certs: true,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Annual return kept before a short premium leg is closed.
    #[serde(with = "rust_decimal::serde::float")]
    pub target_annual_rate: Decimal,
    /// Records per positions page; a shorter page is the last one.
    pub page_size: usize,
}

impl EngineConfig {
    pub fn target_rate_policy(&self) -> FlatTargetRate {
        FlatTargetRate(self.target_annual_rate)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            target_annual_rate: FlatTargetRate::default().0,
            page_size: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrdersConfig {
    /// Submit target orders. When false the batch only computes them.
    pub place_orders: bool,
    /// Cancel every working order before placing targets.
    pub clear_existing: bool,
    /// Confirmation questions answered per order before giving up.
    pub max_confirmations: u32,
}

impl Default for OrdersConfig {
    fn default() -> Self {
        Self {
            place_orders: false,
            clear_existing: true,
            max_confirmations: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub path: String,
    /// Column headers; names that are not report fields are left blank.
    pub fields: Vec<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            path: "positions.csv".to_string(),
            fields: ReportField::ALL
                .iter()
                .map(|field| field.header().to_string())
                .collect(),
        }
    }
}

//! Closing orders handed to the order-placement gateway.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    #[serde(rename = "LMT")]
    Limit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeInForce {
    #[serde(rename = "DAY")]
    Day,
}

/// A limit order that flattens one option leg at its target price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosingOrder {
    pub conid: i64,
    /// `<conid>:<assetClass>`, e.g. `"495512563:OPT"`.
    #[serde(rename = "secType")]
    pub asset_class_tag: String,
    #[serde(rename = "orderType")]
    pub order_type: OrderType,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub side: OrderSide,
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    #[serde(rename = "tif")]
    pub time_in_force: TimeInForce,
}

/// Outcome of submitting one closing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedOrder {
    pub conid: i64,
    /// Gateway order id, when the reply carried one.
    pub order_id: Option<String>,
    pub status: Option<String>,
    /// Number of confirmation questions answered before acceptance.
    pub confirmations: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn closing_order_wire_shape() {
        let order = ClosingOrder {
            conid: 495512563,
            asset_class_tag: "495512563:OPT".to_string(),
            order_type: OrderType::Limit,
            price: dec!(0.82),
            side: OrderSide::Buy,
            quantity: dec!(2),
            time_in_force: TimeInForce::Day,
        };

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "conid": 495512563,
                "secType": "495512563:OPT",
                "orderType": "LMT",
                "price": 0.82,
                "side": "BUY",
                "quantity": 2.0,
                "tif": "DAY"
            })
        );
    }

    #[test]
    fn side_display() {
        assert_eq!(OrderSide::Buy.to_string(), "BUY");
        assert_eq!(OrderSide::Sell.to_string(), "SELL");
    }
}

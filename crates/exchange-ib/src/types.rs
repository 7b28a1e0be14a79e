//! Response and request envelopes of the Client Portal REST API.
//!
//! Record payloads themselves live in `options_tracker_core::records`; these
//! types only wrap or unwrap them.

use options_tracker_core::{ClosingOrder, ContractDetail, LiveOrder};
use serde::{Deserialize, Serialize};

/// One entry of `portfolio/accounts`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioAccount {
    pub account_id: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default, rename = "type")]
    pub account_type: Option<String>,
}

/// `iserver/accounts` answer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokerageAccounts {
    #[serde(default)]
    pub accounts: Vec<String>,
    #[serde(default)]
    pub selected_account: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct SecDefResponse {
    #[serde(default)]
    pub secdef: Vec<ContractDetail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct LiveOrdersResponse {
    #[serde(default)]
    pub orders: Vec<LiveOrder>,
}

#[derive(Debug, Serialize)]
pub(crate) struct OrdersRequest<'a> {
    pub orders: [&'a ClosingOrder; 1],
}

#[derive(Debug, Serialize)]
pub(crate) struct ReplyRequest {
    pub confirmed: bool,
}

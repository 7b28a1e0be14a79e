use anyhow::Result;
use async_trait::async_trait;

use crate::orders::ClosingOrder;
use crate::records::{AuthStatus, ContractDetail, LiveOrder, MarketSnapshot, OrderReply, PositionRecord};

/// Brokerage session the batch runner reads positions from and sends
/// closing orders to.
#[async_trait]
pub trait BrokerGateway: Send + Sync {
    async fn auth_status(&self) -> Result<AuthStatus>;

    /// Keeps the brokerage session alive.
    async fn tickle(&self) -> Result<()>;

    /// Id of the first account the session can see.
    async fn account_id(&self) -> Result<String>;

    /// Ids of the accounts the session can trade. The gateway requires this
    /// listing before market-data and order calls.
    async fn brokerage_accounts(&self) -> Result<Vec<String>>;

    /// One page of positions, starting at page 0.
    async fn positions_page(&self, account_id: &str, page: u32) -> Result<Vec<PositionRecord>>;

    async fn contract_details(&self, conids: &[i64]) -> Result<Vec<ContractDetail>>;

    /// Last-price snapshots for `conids`.
    async fn market_snapshot(&self, conids: &[i64]) -> Result<Vec<MarketSnapshot>>;

    async fn live_orders(&self) -> Result<Vec<LiveOrder>>;

    async fn cancel_order(&self, account_id: &str, order_id: i64) -> Result<()>;

    async fn place_order(&self, account_id: &str, order: &ClosingOrder) -> Result<Vec<OrderReply>>;

    /// Answers a confirmation question with "yes".
    async fn confirm_reply(&self, reply_id: &str) -> Result<Vec<OrderReply>>;
}

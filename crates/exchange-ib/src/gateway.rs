use anyhow::Result;
use async_trait::async_trait;
use options_tracker_core::{
    AuthStatus, BrokerGateway, ClosingOrder, ContractDetail, LiveOrder, MarketSnapshot,
    OrderReply, PositionRecord,
};

use crate::client::IbGateway;

#[async_trait]
impl BrokerGateway for IbGateway {
    async fn auth_status(&self) -> Result<AuthStatus> {
        Ok(IbGateway::auth_status(self).await?)
    }

    async fn tickle(&self) -> Result<()> {
        Ok(IbGateway::tickle(self).await?)
    }

    async fn account_id(&self) -> Result<String> {
        Ok(IbGateway::account_id(self).await?)
    }

    async fn brokerage_accounts(&self) -> Result<Vec<String>> {
        Ok(IbGateway::brokerage_accounts(self).await?.accounts)
    }

    async fn positions_page(&self, account_id: &str, page: u32) -> Result<Vec<PositionRecord>> {
        Ok(IbGateway::positions_page(self, account_id, page).await?)
    }

    async fn contract_details(&self, conids: &[i64]) -> Result<Vec<ContractDetail>> {
        Ok(IbGateway::contract_details(self, conids).await?)
    }

    async fn market_snapshot(&self, conids: &[i64]) -> Result<Vec<MarketSnapshot>> {
        Ok(IbGateway::market_snapshot(self, conids).await?)
    }

    async fn live_orders(&self) -> Result<Vec<LiveOrder>> {
        Ok(IbGateway::live_orders(self).await?)
    }

    async fn cancel_order(&self, account_id: &str, order_id: i64) -> Result<()> {
        Ok(IbGateway::cancel_order(self, account_id, order_id).await?)
    }

    async fn place_order(&self, account_id: &str, order: &ClosingOrder) -> Result<Vec<OrderReply>> {
        Ok(IbGateway::place_order(self, account_id, order).await?)
    }

    async fn confirm_reply(&self, reply_id: &str) -> Result<Vec<OrderReply>> {
        Ok(IbGateway::confirm_reply(self, reply_id).await?)
    }
}

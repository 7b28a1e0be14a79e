//! Session and portfolio endpoints: auth status, keep-alive, accounts,
//! positions.

use options_tracker_core::{AuthStatus, PositionRecord};
use serde_json::Value;
use tracing::{debug, info};

use crate::client::IbGateway;
use crate::error::{IbError, Result};
use crate::types::{BrokerageAccounts, PortfolioAccount};

impl IbGateway {
    pub async fn auth_status(&self) -> Result<AuthStatus> {
        let status: AuthStatus = self.post_empty("iserver/auth/status").await?;
        debug!(
            authenticated = status.authenticated,
            connected = status.connected,
            competing = status.competing,
            "Gateway session status"
        );
        Ok(status)
    }

    /// Pings the gateway so an idle session is not timed out.
    pub async fn tickle(&self) -> Result<()> {
        let _: Value = self.post_empty("tickle").await?;
        Ok(())
    }

    /// Re-establishes the brokerage session of a still valid SSO login.
    pub async fn reauthenticate(&self) -> Result<()> {
        let _: Value = self.post_empty("iserver/reauthenticate").await?;
        info!("Requested brokerage session reauthentication");
        Ok(())
    }

    /// Accounts whose positions the session can read. Must precede any
    /// other `portfolio/` call.
    pub async fn portfolio_accounts(&self) -> Result<Vec<PortfolioAccount>> {
        self.get("portfolio/accounts").await
    }

    /// Accounts the session can trade. The gateway expects this call before
    /// market-data and order calls; the batch makes it right after
    /// resolving the account.
    pub async fn brokerage_accounts(&self) -> Result<BrokerageAccounts> {
        self.get("iserver/accounts").await
    }

    /// Id of the first portfolio account.
    pub async fn account_id(&self) -> Result<String> {
        self.portfolio_accounts()
            .await?
            .into_iter()
            .next()
            .map(|account| account.account_id)
            .ok_or_else(|| IbError::Configuration("gateway session has no accounts".to_string()))
    }

    /// One page of account positions; page 0 is the first.
    pub async fn positions_page(&self, account_id: &str, page: u32) -> Result<Vec<PositionRecord>> {
        let records: Vec<PositionRecord> = self
            .get(&format!("portfolio/{account_id}/positions/{page}"))
            .await?;
        debug!(account_id, page, count = records.len(), "Fetched positions page");
        Ok(records)
    }
}

//! Order endpoints: list, cancel, place and confirm.

use options_tracker_core::{ClosingOrder, LiveOrder, OrderReply};
use tracing::{debug, info};

use crate::client::IbGateway;
use crate::error::Result;
use crate::types::{LiveOrdersResponse, OrdersRequest, ReplyRequest};

impl IbGateway {
    /// Orders of the current session, working or not.
    pub async fn live_orders(&self) -> Result<Vec<LiveOrder>> {
        let response: LiveOrdersResponse = self.get("iserver/account/orders").await?;
        debug!(count = response.orders.len(), "Fetched live orders");
        Ok(response.orders)
    }

    pub async fn cancel_order(&self, account_id: &str, order_id: i64) -> Result<()> {
        info!(account_id, order_id, "Cancelling order");
        self.delete(&format!("iserver/account/{account_id}/order/{order_id}"))
            .await
    }

    /// Submits one order. The reply is either an acknowledgement or a
    /// question that must be confirmed with [`IbGateway::confirm_reply`].
    pub async fn place_order(
        &self,
        account_id: &str,
        order: &ClosingOrder,
    ) -> Result<Vec<OrderReply>> {
        info!(
            account_id,
            conid = order.conid,
            side = %order.side,
            quantity = %order.quantity,
            price = %order.price,
            "Placing order"
        );
        self.post(
            &format!("iserver/account/{account_id}/orders"),
            &OrdersRequest { orders: [order] },
        )
        .await
    }

    pub async fn confirm_reply(&self, reply_id: &str) -> Result<Vec<OrderReply>> {
        debug!(reply_id, "Confirming order reply");
        self.post(
            &format!("iserver/reply/{reply_id}"),
            &ReplyRequest { confirmed: true },
        )
        .await
    }
}

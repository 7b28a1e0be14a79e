//! Clears working orders and places campaign target orders.

use anyhow::{bail, Context, Result};
use options_tracker_core::{BrokerGateway, ClosingOrder, OrderReply, OrdersConfig, PlacedOrder};
use tracing::{info, warn};

/// Cancels every working order of the session. Returns the cancelled ids.
pub async fn clear_orders(gateway: &dyn BrokerGateway, account_id: &str) -> Result<Vec<i64>> {
    let orders = gateway
        .live_orders()
        .await
        .context("Failed to list live orders")?;

    let mut cancelled = Vec::new();
    for order in orders.iter().filter(|o| o.is_working()) {
        gateway
            .cancel_order(account_id, order.order_id)
            .await
            .with_context(|| format!("Failed to cancel order {}", order.order_id))?;
        cancelled.push(order.order_id);
    }

    info!(
        listed = orders.len(),
        cancelled = cancelled.len(),
        "Cleared working orders"
    );
    Ok(cancelled)
}

/// Places `order`, answering confirmation questions until the gateway
/// acknowledges it.
///
/// # Errors
///
/// Fails when more than `max_confirmations` questions are asked, when the
/// reply is empty, or when it carries an `error` key.
pub async fn place_with_confirm(
    gateway: &dyn BrokerGateway,
    account_id: &str,
    order: &ClosingOrder,
    max_confirmations: u32,
) -> Result<PlacedOrder> {
    let conid = order.conid;
    let mut replies = gateway
        .place_order(account_id, order)
        .await
        .with_context(|| format!("Failed to place order for conid {conid}"))?;
    let mut confirmations = 0u32;

    loop {
        match replies.into_iter().next() {
            Some(OrderReply::Question { id, message }) => {
                if confirmations >= max_confirmations {
                    bail!(
                        "Order for conid {conid} still unconfirmed after {confirmations} replies: {}",
                        message.join(" ")
                    );
                }
                warn!(conid, reply_id = %id, message = %message.join(" "), "Confirming order question");
                replies = gateway
                    .confirm_reply(&id)
                    .await
                    .with_context(|| format!("Failed to confirm reply {id}"))?;
                confirmations += 1;
            }
            Some(OrderReply::Acknowledged {
                order_id,
                order_status,
            }) => {
                info!(conid, %order_id, %order_status, confirmations, "Order accepted");
                return Ok(PlacedOrder {
                    conid,
                    order_id: Some(order_id),
                    status: Some(order_status),
                    confirmations,
                });
            }
            Some(OrderReply::Other(value)) => {
                if let Some(error) = value.get("error") {
                    bail!("Order for conid {conid} rejected: {error}");
                }
                warn!(conid, reply = %value, "Unrecognised order reply");
                return Ok(PlacedOrder {
                    conid,
                    order_id: None,
                    status: None,
                    confirmations,
                });
            }
            None => bail!("Empty reply placing order for conid {conid}"),
        }
    }
}

/// Optionally clears working orders, then places every target order.
///
/// Returns the cancelled order ids and the placed orders.
pub async fn clear_and_place_target_orders(
    gateway: &dyn BrokerGateway,
    account_id: &str,
    orders: &[ClosingOrder],
    config: &OrdersConfig,
) -> Result<(Vec<i64>, Vec<PlacedOrder>)> {
    let cancelled = if config.clear_existing {
        clear_orders(gateway, account_id).await?
    } else {
        Vec::new()
    };

    let mut placed = Vec::with_capacity(orders.len());
    for order in orders {
        placed.push(place_with_confirm(gateway, account_id, order, config.max_confirmations).await?);
    }

    info!(placed = placed.len(), "Placed target orders");
    Ok((cancelled, placed))
}

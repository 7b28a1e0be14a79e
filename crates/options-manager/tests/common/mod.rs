//! Scripted in-memory gateway for batch tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use options_tracker_core::{
    AuthStatus, BrokerGateway, ClosingOrder, ContractDetail, LiveOrder, MarketSnapshot,
    OrderReply, PositionRecord,
};
use rust_decimal::Decimal;

pub const ACCOUNT: &str = "U1234567";
pub const EXPIRY: &str = "20260401";

/// 30 days before [`EXPIRY`].
pub fn as_of() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 2)
        .unwrap()
        .and_time(NaiveTime::MIN)
}

pub struct MockGateway {
    pub authenticated: bool,
    pub pages: Vec<Vec<PositionRecord>>,
    pub details: Vec<ContractDetail>,
    pub snapshots: Vec<MarketSnapshot>,
    pub live: Vec<LiveOrder>,
    /// Replies to `place_order` and `confirm_reply`, consumed in order.
    /// When exhausted, orders are acknowledged straight away.
    pub replies: Mutex<VecDeque<Vec<OrderReply>>>,
    pub calls: Mutex<Vec<String>>,
    pub placed: Mutex<Vec<ClosingOrder>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            authenticated: true,
            pages: Vec::new(),
            details: Vec::new(),
            snapshots: Vec::new(),
            live: Vec::new(),
            replies: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            placed: Mutex::new(Vec::new()),
        }
    }

    pub fn with_page(mut self, records: Vec<PositionRecord>) -> Self {
        self.pages.push(records);
        self
    }

    pub fn with_detail(mut self, detail: ContractDetail) -> Self {
        self.details.push(detail);
        self
    }

    pub fn with_price(mut self, conid: i64, last: &str) -> Self {
        self.snapshots.push(MarketSnapshot {
            conid: Some(conid),
            last: Some(last.to_string()),
        });
        self
    }

    pub fn with_live_order(mut self, order_id: i64, status: &str) -> Self {
        self.live.push(LiveOrder {
            order_id,
            conid: None,
            ticker: None,
            status: status.to_string(),
        });
        self
    }

    pub fn with_replies(self, replies: Vec<Vec<OrderReply>>) -> Self {
        self.replies.lock().unwrap().extend(replies);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, endpoint: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| call.starts_with(endpoint))
            .collect()
    }

    pub fn placed(&self) -> Vec<ClosingOrder> {
        self.placed.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_reply(&self, fallback_id: String) -> Vec<OrderReply> {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| vec![acknowledged(&fallback_id)])
    }
}

fn join(conids: &[i64]) -> String {
    conids
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[async_trait]
impl BrokerGateway for MockGateway {
    async fn auth_status(&self) -> Result<AuthStatus> {
        self.record("auth_status".to_string());
        Ok(AuthStatus {
            authenticated: self.authenticated,
            connected: true,
            competing: false,
        })
    }

    async fn tickle(&self) -> Result<()> {
        self.record("tickle".to_string());
        Ok(())
    }

    async fn account_id(&self) -> Result<String> {
        self.record("account_id".to_string());
        Ok(ACCOUNT.to_string())
    }

    async fn brokerage_accounts(&self) -> Result<Vec<String>> {
        self.record("brokerage_accounts".to_string());
        Ok(vec![ACCOUNT.to_string()])
    }

    async fn positions_page(&self, _account_id: &str, page: u32) -> Result<Vec<PositionRecord>> {
        self.record(format!("positions_page:{page}"));
        Ok(self.pages.get(page as usize).cloned().unwrap_or_default())
    }

    async fn contract_details(&self, conids: &[i64]) -> Result<Vec<ContractDetail>> {
        self.record(format!("contract_details:{}", join(conids)));
        Ok(self
            .details
            .iter()
            .filter(|d| d.conid.is_some_and(|c| conids.contains(&c)))
            .cloned()
            .collect())
    }

    async fn market_snapshot(&self, conids: &[i64]) -> Result<Vec<MarketSnapshot>> {
        self.record(format!("market_snapshot:{}", join(conids)));
        Ok(self
            .snapshots
            .iter()
            .filter(|s| s.conid.is_some_and(|c| conids.contains(&c)))
            .cloned()
            .collect())
    }

    async fn live_orders(&self) -> Result<Vec<LiveOrder>> {
        self.record("live_orders".to_string());
        Ok(self.live.clone())
    }

    async fn cancel_order(&self, _account_id: &str, order_id: i64) -> Result<()> {
        self.record(format!("cancel_order:{order_id}"));
        Ok(())
    }

    async fn place_order(&self, _account_id: &str, order: &ClosingOrder) -> Result<Vec<OrderReply>> {
        self.record(format!("place_order:{}", order.conid));
        self.placed.lock().unwrap().push(order.clone());
        Ok(self.next_reply(format!("ord-{}", order.conid)))
    }

    async fn confirm_reply(&self, reply_id: &str) -> Result<Vec<OrderReply>> {
        self.record(format!("confirm_reply:{reply_id}"));
        Ok(self.next_reply(format!("ord-{reply_id}")))
    }
}

pub fn question(id: &str) -> OrderReply {
    OrderReply::Question {
        id: id.to_string(),
        message: vec![format!("question {id}")],
    }
}

pub fn acknowledged(order_id: &str) -> OrderReply {
    OrderReply::Acknowledged {
        order_id: order_id.to_string(),
        order_status: "Submitted".to_string(),
    }
}

pub fn record(conid: i64, asset_class: &str, size: Decimal) -> PositionRecord {
    PositionRecord {
        conid: Some(conid),
        asset_class: Some(asset_class.to_string()),
        currency: Some("USD".to_string()),
        contract_desc: Some(format!("contract {conid}")),
        mkt_price: None,
        position: Some(size),
        avg_price: Some(Decimal::ONE),
    }
}

pub fn option_detail(conid: i64, right: &str, strike: Decimal, und_conid: i64) -> ContractDetail {
    ContractDetail {
        conid: Some(conid),
        ticker: Some("XYZ".to_string()),
        expiry: Some(EXPIRY.to_string()),
        strike: Some(strike),
        put_or_call: Some(right.to_string()),
        multiplier: Some(Decimal::ONE_HUNDRED),
        und_conid: Some(und_conid),
    }
}

pub fn stock_detail(conid: i64) -> ContractDetail {
    ContractDetail {
        conid: Some(conid),
        ticker: Some("XYZ".to_string()),
        ..ContractDetail::default()
    }
}

//! Batch runner for the options tracker.
//!
//! One pass over a brokerage gateway:
//! - Fetches every position page of the account
//! - Enriches positions with contract details and last prices
//! - Classifies legs and groups them into campaigns per underlying
//! - Optionally clears working orders and places target closing orders
//!
//! The runner only talks to [`options_tracker_core::BrokerGateway`], so any
//! gateway implementation (or a test double) can drive it.

pub mod executor;
pub mod monitor;
pub mod service;
pub mod types;

pub use service::{collect_target_orders, run_batch};
pub use types::BatchReport;

//! Interactive Brokers Client Portal gateway.
//!
//! REST access to the local Client Portal gateway: session status, paged
//! portfolio positions, contract definitions, last-price snapshots and
//! order management. [`IbGateway`] implements
//! [`options_tracker_core::BrokerGateway`] for the batch runner.

pub mod account;
pub mod client;
pub mod error;
pub mod execution;
pub mod gateway;
pub mod market_data;
pub mod types;

pub use client::{IbConfig, IbGateway, DEFAULT_BASE_URL};
pub use error::{IbError, Result};
pub use types::{BrokerageAccounts, PortfolioAccount};

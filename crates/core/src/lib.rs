pub mod campaign;
pub mod config;
pub mod config_loader;
pub mod contract;
pub mod error;
pub mod moneyness;
pub mod orders;
pub mod position;
pub mod records;
pub mod report;
pub mod traits;

pub use campaign::{group_into_campaigns, Campaign, StrategyType};
pub use config::{EngineConfig, GatewayConfig, OrdersConfig, ReportConfig, TrackerConfig};
pub use config_loader::ConfigLoader;
pub use contract::Contract;
pub use error::{EngineError, Result};
pub use moneyness::{
    days_to_expiry, FlatTargetRate, Moneyness, OptionTerms, PricingContext, TargetRatePolicy,
};
pub use orders::{ClosingOrder, OrderSide, OrderType, PlacedOrder, TimeInForce};
pub use position::{LegType, Position, Stage};
pub use records::{
    AssetClass, AuthStatus, ContractDetail, LiveOrder, MarketSnapshot, OrderReply, PositionRecord,
    PutOrCall,
};
pub use report::{ReportField, ReportRow};
pub use traits::BrokerGateway;

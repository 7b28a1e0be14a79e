use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::contract::Contract;
use crate::error::{EngineError, Result};
use crate::moneyness::PricingContext;
use crate::orders::{ClosingOrder, OrderSide, OrderType, TimeInForce};
use crate::records::{AssetClass, ContractDetail, PositionRecord, PutOrCall};

const POSITION_RECORD: &str = "position";

/// Enrichment progress of a position.
///
/// Transitions run strictly `Raw → Detailed → Priced → Classified`; prices
/// may be refreshed again once a position is priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    Raw,
    Detailed,
    Priced,
    Classified,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Raw => write!(f, "RAW"),
            Self::Detailed => write!(f, "DETAILED"),
            Self::Priced => write!(f, "PRICED"),
            Self::Classified => write!(f, "CLASSIFIED"),
        }
    }
}

/// Directional leg type of a single position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LegType {
    LongStock,
    ShortStock,
    LongPut,
    ShortPut,
    LongCall,
    ShortCall,
    Unclassified,
}

impl LegType {
    /// Classifies a leg from its asset class, option right and signed size.
    pub fn from_parts(
        asset_class: &AssetClass,
        put_or_call: Option<PutOrCall>,
        size: Decimal,
    ) -> Self {
        let long = size.is_sign_positive() && !size.is_zero();
        let short = size.is_sign_negative() && !size.is_zero();

        match (asset_class, put_or_call) {
            (AssetClass::Stock, _) if long => Self::LongStock,
            (AssetClass::Stock, _) if short => Self::ShortStock,
            (AssetClass::Option, Some(PutOrCall::Put)) if long => Self::LongPut,
            (AssetClass::Option, Some(PutOrCall::Put)) if short => Self::ShortPut,
            (AssetClass::Option, Some(PutOrCall::Call)) if long => Self::LongCall,
            (AssetClass::Option, Some(PutOrCall::Call)) if short => Self::ShortCall,
            _ => Self::Unclassified,
        }
    }

    /// Whether this is a single directional option leg.
    pub const fn is_option_leg(self) -> bool {
        matches!(
            self,
            Self::LongPut | Self::ShortPut | Self::LongCall | Self::ShortCall
        )
    }
}

impl std::fmt::Display for LegType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LongStock => write!(f, "LONG STK"),
            Self::ShortStock => write!(f, "SHORT STK"),
            Self::LongPut => write!(f, "LONG PUT"),
            Self::ShortPut => write!(f, "SHORT PUT"),
            Self::LongCall => write!(f, "LONG CALL"),
            Self::ShortCall => write!(f, "SHORT CALL"),
            Self::Unclassified => write!(f, "UNCLASSIFIED"),
        }
    }
}

/// One account holding. The position is the sole owner of its contract.
#[derive(Debug, Clone)]
pub struct Position {
    contract: Contract,
    size: Decimal,
    avg_price: Decimal,
    leg_type: Option<LegType>,
    stage: Stage,
}

impl Position {
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidField`] for a zero size.
    pub fn new(contract: Contract, size: Decimal, avg_price: Decimal) -> Result<Self> {
        if size.is_zero() {
            return Err(EngineError::invalid("position", size.to_string()));
        }
        Ok(Self {
            contract,
            size,
            avg_price,
            leg_type: None,
            stage: Stage::Raw,
        })
    }

    /// Builds a raw position from a gateway record.
    ///
    /// Returns `Ok(None)` for flat (size 0) records, which never enter the model.
    pub fn from_record(record: &PositionRecord) -> Result<Option<Self>> {
        let size = record
            .position
            .ok_or(EngineError::missing(POSITION_RECORD, "position"))?;
        if size.is_zero() {
            return Ok(None);
        }

        let conid = record
            .conid
            .ok_or(EngineError::missing(POSITION_RECORD, "conid"))?;
        let asset_class = record
            .asset_class
            .as_deref()
            .map(AssetClass::from_code)
            .ok_or(EngineError::missing(POSITION_RECORD, "assetClass"))?;
        let currency = record
            .currency
            .clone()
            .ok_or(EngineError::missing(POSITION_RECORD, "currency"))?;
        let avg_price = record
            .avg_price
            .ok_or(EngineError::missing(POSITION_RECORD, "avgPrice"))?;

        let contract = Contract::new(
            conid,
            asset_class,
            currency,
            record.contract_desc.clone().unwrap_or_default(),
            record.mkt_price,
        );
        Self::new(contract, size, avg_price).map(Some)
    }

    /// Applies the contract definition. `Raw → Detailed`.
    pub fn enrich(&mut self, detail: &ContractDetail) -> Result<()> {
        self.expect_stage("enrich", &[Stage::Raw])?;
        self.contract.set_detail(detail)?;
        self.stage = Stage::Detailed;
        Ok(())
    }

    /// Applies the latest contract and underlying prices. `Detailed → Priced`,
    /// or a refresh when already priced.
    pub fn apply_prices(
        &mut self,
        market_price: Decimal,
        underlying_price: Decimal,
        ctx: &PricingContext<'_>,
    ) -> Result<()> {
        self.expect_stage(
            "price",
            &[Stage::Detailed, Stage::Priced, Stage::Classified],
        )?;
        self.contract
            .set_prices(Some(market_price), Some(underlying_price), ctx)?;
        if self.stage == Stage::Detailed {
            self.stage = Stage::Priced;
        }
        Ok(())
    }

    /// Same stage move as [`Position::apply_prices`], for a leg whose tenor
    /// cannot be valued. The leg keeps its prices but has no target price,
    /// so it never yields a closing order.
    pub fn apply_prices_unvalued(
        &mut self,
        market_price: Decimal,
        underlying_price: Decimal,
        ctx: &PricingContext<'_>,
    ) -> Result<()> {
        self.expect_stage(
            "price",
            &[Stage::Detailed, Stage::Priced, Stage::Classified],
        )?;
        self.contract
            .set_prices_unvalued(market_price, underlying_price, ctx.as_of);
        if self.stage == Stage::Detailed {
            self.stage = Stage::Priced;
        }
        Ok(())
    }

    /// Derives the leg type. `Priced → Classified`.
    ///
    /// Combinations outside the leg table classify as
    /// [`LegType::Unclassified`] rather than failing.
    pub fn classify(&mut self) -> Result<LegType> {
        self.expect_stage("classify", &[Stage::Priced])?;
        let leg_type = LegType::from_parts(
            self.contract.asset_class(),
            self.contract.put_or_call(),
            self.size,
        );
        self.leg_type = Some(leg_type);
        self.stage = Stage::Classified;
        Ok(leg_type)
    }

    /// Builds the limit order that flattens this leg at its target price.
    ///
    /// Short legs buy to close, long legs sell to close.
    pub fn build_closing_order(&self) -> Result<ClosingOrder> {
        self.expect_stage("build a closing order for", &[Stage::Classified])?;
        let conid = self.contract.conid();
        let leg_type = self.leg_type.unwrap_or(LegType::Unclassified);
        if !leg_type.is_option_leg() {
            return Err(EngineError::NotClosable { conid, leg_type });
        }
        let price = self
            .contract
            .target_price()
            .ok_or(EngineError::MissingTargetPrice { conid })?;

        Ok(ClosingOrder {
            conid,
            asset_class_tag: format!("{}:{}", conid, self.contract.asset_class()),
            order_type: OrderType::Limit,
            price,
            side: if self.size.is_sign_negative() {
                OrderSide::Buy
            } else {
                OrderSide::Sell
            },
            quantity: self.size.abs(),
            time_in_force: TimeInForce::Day,
        })
    }

    fn expect_stage(&self, operation: &'static str, allowed: &[Stage]) -> Result<()> {
        if allowed.contains(&self.stage) {
            Ok(())
        } else {
            Err(EngineError::StageViolation {
                conid: self.contract.conid(),
                operation,
                stage: self.stage,
            })
        }
    }

    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    pub fn conid(&self) -> i64 {
        self.contract.conid()
    }

    pub fn size(&self) -> Decimal {
        self.size
    }

    pub fn avg_price(&self) -> Decimal {
        self.avg_price
    }

    /// `None` until the position is classified.
    pub fn leg_type(&self) -> Option<LegType> {
        self.leg_type
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }
}

//! Campaigns: every leg held on one underlying, classified as a strategy.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::orders::ClosingOrder;
use crate::position::{LegType, Position, Stage};

/// Strategy a campaign's distinct leg types add up to.
///
/// Straddles, strangles and swamps are not told apart; they all land in
/// [`StrategyType::ShortPutAndCall`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyType {
    /// A campaign made of a single leg type.
    Single(LegType),
    ShortPutAndCall,
    /// Poor man's covered call (long call financing a short call).
    PoorMansCoveredCall,
    CoveredCall,
    PoorMansCoveredCallAndShortPut,
    Others,
}

impl StrategyType {
    /// Infers the strategy from the set of distinct leg types held.
    ///
    /// Matching is exact set equality; `None` for an empty set.
    pub fn infer(legs: &BTreeSet<LegType>) -> Option<Self> {
        use LegType::{LongCall, LongStock, ShortCall, ShortPut};

        let has_exactly = |expected: &[LegType]| {
            legs.len() == expected.len() && expected.iter().all(|leg| legs.contains(leg))
        };

        let strategy = match legs.len() {
            0 => return None,
            1 => Self::Single(*legs.iter().next()?),
            2 if has_exactly(&[ShortPut, ShortCall]) => Self::ShortPutAndCall,
            2 if has_exactly(&[LongCall, ShortCall]) => Self::PoorMansCoveredCall,
            2 if has_exactly(&[LongStock, ShortCall]) => Self::CoveredCall,
            3 if has_exactly(&[ShortPut, ShortCall, LongCall]) => {
                Self::PoorMansCoveredCallAndShortPut
            }
            _ => Self::Others,
        };
        Some(strategy)
    }

    /// Whether the engine may auto-close this campaign at target.
    ///
    /// Only single-leg premium-selling campaigns qualify.
    pub const fn auto_closable(self) -> bool {
        matches!(
            self,
            Self::Single(LegType::ShortPut) | Self::Single(LegType::ShortCall)
        )
    }
}

impl std::fmt::Display for StrategyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single(leg) => write!(f, "{leg}"),
            Self::ShortPutAndCall => write!(f, "SHORT PUT&CALL"),
            Self::PoorMansCoveredCall => write!(f, "PMCC"),
            Self::CoveredCall => write!(f, "CC"),
            Self::PoorMansCoveredCallAndShortPut => write!(f, "PMCC & SHORT PUT"),
            Self::Others => write!(f, "others"),
        }
    }
}

/// All positions sharing one underlying.
#[derive(Debug, Clone)]
pub struct Campaign {
    underlying_conid: i64,
    ticker: Option<String>,
    currency: String,
    positions: HashMap<i64, Position>,
    strategy_type: Option<StrategyType>,
    margin: Option<Decimal>,
    implied_capital: Option<Decimal>,
}

impl Campaign {
    pub fn new(underlying_conid: i64, ticker: Option<String>, currency: impl Into<String>) -> Self {
        Self {
            underlying_conid,
            ticker,
            currency: currency.into(),
            positions: HashMap::new(),
            strategy_type: None,
            margin: None,
            implied_capital: None,
        }
    }

    /// Adds a classified position and re-infers the strategy.
    ///
    /// A position with an already-held conid replaces the held one; sizes
    /// are not merged. The replaced position is returned.
    pub fn add_position(&mut self, position: Position) -> Result<Option<Position>> {
        if position.stage() != Stage::Classified {
            return Err(EngineError::StageViolation {
                conid: position.conid(),
                operation: "add to a campaign",
                stage: position.stage(),
            });
        }
        let actual = position.contract().underlying_conid();
        if actual != self.underlying_conid {
            return Err(EngineError::UnderlyingMismatch {
                conid: position.conid(),
                expected: self.underlying_conid,
                actual,
            });
        }

        let conid = position.conid();
        let replaced = self.positions.insert(conid, position);
        if replaced.is_some() {
            tracing::debug!(conid, underlying = self.underlying_conid, "Replaced held position");
        }
        self.strategy_type = StrategyType::infer(&self.leg_types());
        Ok(replaced)
    }

    /// Distinct leg types currently held.
    pub fn leg_types(&self) -> BTreeSet<LegType> {
        self.positions
            .values()
            .filter_map(Position::leg_type)
            .collect()
    }

    /// One closing order per held leg for single-leg premium-selling
    /// campaigns; nothing for every other strategy.
    pub fn target_orders(&self) -> Result<Vec<ClosingOrder>> {
        match self.strategy_type {
            Some(strategy) if strategy.auto_closable() => {
                let mut orders = self
                    .positions
                    .values()
                    .map(Position::build_closing_order)
                    .collect::<Result<Vec<_>>>()?;
                orders.sort_by_key(|order| order.conid);
                Ok(orders)
            }
            _ => Ok(Vec::new()),
        }
    }

    pub fn underlying_conid(&self) -> i64 {
        self.underlying_conid
    }

    pub fn ticker(&self) -> Option<&str> {
        self.ticker.as_deref()
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn strategy_type(&self) -> Option<StrategyType> {
        self.strategy_type
    }

    pub fn position(&self, conid: i64) -> Option<&Position> {
        self.positions.get(&conid)
    }

    /// Held positions, ordered by conid.
    pub fn positions(&self) -> Vec<&Position> {
        let mut positions: Vec<&Position> = self.positions.values().collect();
        positions.sort_by_key(|p| p.conid());
        positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Reserved; never computed.
    pub fn margin(&self) -> Option<Decimal> {
        self.margin
    }

    /// Reserved; never computed.
    pub fn implied_capital(&self) -> Option<Decimal> {
        self.implied_capital
    }
}

/// Groups classified positions into campaigns keyed by underlying conid.
///
/// A campaign takes its ticker and currency from the first position seen
/// for its underlying.
pub fn group_into_campaigns(
    positions: impl IntoIterator<Item = Position>,
) -> Result<BTreeMap<i64, Campaign>> {
    let mut campaigns: BTreeMap<i64, Campaign> = BTreeMap::new();
    for position in positions {
        let contract = position.contract();
        let campaign = campaigns
            .entry(contract.underlying_conid())
            .or_insert_with(|| {
                Campaign::new(
                    contract.underlying_conid(),
                    contract.ticker().map(str::to_string),
                    contract.currency(),
                )
            });
        campaign.add_position(position)?;
    }
    Ok(campaigns)
}

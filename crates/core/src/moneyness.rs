//! Option moneyness: intrinsic/extrinsic split, annualized yield, target price.
//!
//! [`Moneyness`] is an immutable snapshot produced by a pure function of the
//! option terms, both prices and the valuation clock. A contract swaps the
//! whole snapshot in at once, so readers never observe half-updated figures.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::records::PutOrCall;

const DAYS_PER_YEAR: i64 = 365;
const SECONDS_PER_DAY: i64 = 86_400;

/// Annual return a short premium position is expected to keep before it is
/// worth closing, as a function of tenor.
pub trait TargetRatePolicy: Send + Sync + std::fmt::Debug {
    fn annual_rate(&self, days_to_expiry: i64) -> Decimal;
}

/// Same target rate for every tenor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatTargetRate(pub Decimal);

impl Default for FlatTargetRate {
    fn default() -> Self {
        Self(Decimal::new(10, 2))
    }
}

impl TargetRatePolicy for FlatTargetRate {
    fn annual_rate(&self, _days_to_expiry: i64) -> Decimal {
        self.0
    }
}

/// Valuation clock and target policy shared by every price update in a batch.
#[derive(Debug, Clone, Copy)]
pub struct PricingContext<'a> {
    pub as_of: NaiveDateTime,
    pub policy: &'a dyn TargetRatePolicy,
}

impl<'a> PricingContext<'a> {
    pub fn new(as_of: NaiveDateTime, policy: &'a dyn TargetRatePolicy) -> Self {
        Self { as_of, policy }
    }
}

/// Option-only contract terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionTerms {
    pub expiry: NaiveDate,
    pub strike: Decimal,
    pub put_or_call: PutOrCall,
    pub multiplier: Decimal,
}

/// Derived moneyness figures for one option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Moneyness {
    pub days_to_expiry: i64,
    pub intrinsic: Decimal,
    pub extrinsic: Decimal,
    pub annualized_extrinsic_yield: Decimal,
    pub target_price: Decimal,
}

impl Moneyness {
    /// Computes moneyness for `conid` valued at `ctx.as_of`.
    ///
    /// # Errors
    ///
    /// - [`EngineError::DegenerateTenor`] when the option expires within a day.
    /// - [`EngineError::ContractExpired`] when expiry is already behind the clock.
    /// - [`EngineError::InvalidField`] for a non-positive strike.
    pub fn compute(
        conid: i64,
        terms: &OptionTerms,
        market_price: Decimal,
        underlying_price: Decimal,
        ctx: &PricingContext<'_>,
    ) -> Result<Self> {
        let dte = days_to_expiry(terms.expiry, ctx.as_of);
        if dte == 0 {
            return Err(EngineError::DegenerateTenor { conid });
        }
        if dte < 0 {
            return Err(EngineError::ContractExpired {
                conid,
                days_to_expiry: dte,
            });
        }
        if terms.strike <= Decimal::ZERO {
            return Err(EngineError::invalid("strike", terms.strike.to_string()));
        }

        let intrinsic = match terms.put_or_call {
            PutOrCall::Put => terms.strike - underlying_price,
            PutOrCall::Call => underlying_price - terms.strike,
        }
        .max(Decimal::ZERO);
        let extrinsic = market_price - intrinsic;

        let days = Decimal::from(dte);
        let year = Decimal::from(DAYS_PER_YEAR);
        let annualized_extrinsic_yield = extrinsic / terms.strike * (year / days);

        let rate = ctx.policy.annual_rate(dte);
        let target_price = (rate * terms.strike * days / year).round_dp(2);

        Ok(Self {
            days_to_expiry: dte,
            intrinsic,
            extrinsic,
            annualized_extrinsic_yield,
            target_price,
        })
    }
}

/// Whole days from `as_of` until the start of `expiry`, floored.
///
/// An option expiring tomorrow valued this afternoon is 0 days out; on the
/// expiry day itself the result is -1.
pub fn days_to_expiry(expiry: NaiveDate, as_of: NaiveDateTime) -> i64 {
    (expiry.and_time(NaiveTime::MIN) - as_of)
        .num_seconds()
        .div_euclid(SECONDS_PER_DAY)
}

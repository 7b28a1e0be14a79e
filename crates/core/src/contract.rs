//! One tradable instrument and its price-driven moneyness.

use chrono::{Local, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::error::{EngineError, Result};
use crate::moneyness::{Moneyness, OptionTerms, PricingContext};
use crate::records::{AssetClass, ContractDetail, PutOrCall};

const DETAIL_RECORD: &str = "contract detail";

#[derive(Debug, Clone)]
pub struct Contract {
    conid: i64,
    asset_class: AssetClass,
    currency: String,
    description: String,
    ticker: Option<String>,
    underlying_conid: i64,
    option_terms: Option<OptionTerms>,
    market_price: Option<Decimal>,
    underlying_price: Option<Decimal>,
    last_update: NaiveDateTime,
    moneyness: Option<Moneyness>,
}

impl Contract {
    /// Creates a contract as first seen on a position record.
    ///
    /// The underlying defaults to the contract itself, which is final for
    /// anything that is not an option.
    pub fn new(
        conid: i64,
        asset_class: AssetClass,
        currency: impl Into<String>,
        description: impl Into<String>,
        market_price: Option<Decimal>,
    ) -> Self {
        Self {
            conid,
            asset_class,
            currency: currency.into(),
            description: description.into(),
            ticker: None,
            underlying_conid: conid,
            option_terms: None,
            market_price,
            underlying_price: None,
            last_update: Local::now().naive_local(),
            moneyness: None,
        }
    }

    /// Applies a contract definition.
    ///
    /// Every contract takes its ticker. Options additionally require expiry,
    /// strike, right, multiplier and underlying id. Nothing is written unless
    /// the whole record validates.
    pub fn set_detail(&mut self, detail: &ContractDetail) -> Result<()> {
        let ticker = detail
            .ticker
            .clone()
            .ok_or(EngineError::missing(DETAIL_RECORD, "ticker"))?;

        if self.asset_class != AssetClass::Option {
            self.ticker = Some(ticker);
            return Ok(());
        }

        let expiry_raw = detail
            .expiry
            .as_deref()
            .ok_or(EngineError::missing(DETAIL_RECORD, "expiry"))?;
        let expiry = NaiveDate::parse_from_str(expiry_raw, "%Y%m%d")
            .map_err(|_| EngineError::invalid("expiry", expiry_raw))?;
        let strike = detail
            .strike
            .ok_or(EngineError::missing(DETAIL_RECORD, "strike"))?;
        let put_or_call: PutOrCall = detail
            .put_or_call
            .as_deref()
            .ok_or(EngineError::missing(DETAIL_RECORD, "putOrCall"))?
            .parse()?;
        let multiplier = detail
            .multiplier
            .ok_or(EngineError::missing(DETAIL_RECORD, "multiplier"))?;
        let underlying_conid = detail
            .und_conid
            .ok_or(EngineError::missing(DETAIL_RECORD, "undConid"))?;

        self.ticker = Some(ticker);
        self.underlying_conid = underlying_conid;
        self.option_terms = Some(OptionTerms {
            expiry,
            strike,
            put_or_call,
            multiplier,
        });
        Ok(())
    }

    /// Updates the contract's own price and recomputes moneyness when the
    /// underlying price is already known.
    pub fn set_market_price(&mut self, price: Decimal, ctx: &PricingContext<'_>) -> Result<()> {
        self.set_prices(Some(price), self.underlying_price, ctx)
    }

    /// Updates the underlying price and recomputes moneyness when the
    /// contract's own price is already known.
    pub fn set_underlying_price(
        &mut self,
        price: Decimal,
        ctx: &PricingContext<'_>,
    ) -> Result<()> {
        self.set_prices(self.market_price, Some(price), ctx)
    }

    /// Sets both prices with a single recomputation.
    ///
    /// On error the contract is left exactly as it was.
    pub fn set_prices(
        &mut self,
        market_price: Option<Decimal>,
        underlying_price: Option<Decimal>,
        ctx: &PricingContext<'_>,
    ) -> Result<()> {
        let moneyness = match (self.option_terms.as_ref(), market_price, underlying_price) {
            (Some(terms), Some(market), Some(underlying))
                if self.asset_class == AssetClass::Option =>
            {
                Some(Moneyness::compute(
                    self.conid, terms, market, underlying, ctx,
                )?)
            }
            _ => None,
        };

        self.market_price = market_price;
        self.underlying_price = underlying_price;
        self.last_update = ctx.as_of;
        if moneyness.is_some() {
            self.moneyness = moneyness;
        }
        Ok(())
    }

    /// Stores both prices and drops any moneyness, for an option that
    /// cannot be valued at `as_of`. No target price exists afterwards.
    pub fn set_prices_unvalued(
        &mut self,
        market_price: Decimal,
        underlying_price: Decimal,
        as_of: NaiveDateTime,
    ) {
        self.market_price = Some(market_price);
        self.underlying_price = Some(underlying_price);
        self.last_update = as_of;
        self.moneyness = None;
    }

    pub fn conid(&self) -> i64 {
        self.conid
    }

    pub fn asset_class(&self) -> &AssetClass {
        &self.asset_class
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn ticker(&self) -> Option<&str> {
        self.ticker.as_deref()
    }

    pub fn underlying_conid(&self) -> i64 {
        self.underlying_conid
    }

    pub fn option_terms(&self) -> Option<&OptionTerms> {
        self.option_terms.as_ref()
    }

    pub fn put_or_call(&self) -> Option<PutOrCall> {
        self.option_terms.map(|t| t.put_or_call)
    }

    pub fn market_price(&self) -> Option<Decimal> {
        self.market_price
    }

    pub fn underlying_price(&self) -> Option<Decimal> {
        self.underlying_price
    }

    pub fn last_update(&self) -> NaiveDateTime {
        self.last_update
    }

    pub fn moneyness(&self) -> Option<&Moneyness> {
        self.moneyness.as_ref()
    }

    pub fn target_price(&self) -> Option<Decimal> {
        self.moneyness.map(|m| m.target_price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moneyness::FlatTargetRate;
    use chrono::NaiveTime;
    use rust_decimal_macros::dec;

    fn as_of() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_time(NaiveTime::MIN)
    }

    fn option_detail() -> ContractDetail {
        ContractDetail {
            conid: Some(700),
            ticker: Some("SPY".to_string()),
            expiry: Some("20260401".to_string()),
            strike: Some(dec!(100)),
            put_or_call: Some("P".to_string()),
            multiplier: Some(dec!(100)),
            und_conid: Some(756733),
        }
    }

    fn option() -> Contract {
        let mut contract = Contract::new(700, AssetClass::Option, "USD", "SPY APR26 100 P", None);
        contract.set_detail(&option_detail()).unwrap();
        contract
    }

    #[test]
    fn stock_is_its_own_underlying() {
        let mut stock = Contract::new(756733, AssetClass::Stock, "USD", "SPY", Some(dec!(500)));
        assert_eq!(stock.underlying_conid(), 756733);

        stock
            .set_detail(&ContractDetail {
                ticker: Some("SPY".to_string()),
                ..ContractDetail::default()
            })
            .unwrap();

        assert_eq!(stock.ticker(), Some("SPY"));
        assert_eq!(stock.underlying_conid(), 756733);
        assert!(stock.option_terms().is_none());
    }

    #[test]
    fn option_detail_sets_terms_and_underlying() {
        let contract = option();

        assert_eq!(contract.underlying_conid(), 756733);
        let terms = contract.option_terms().unwrap();
        assert_eq!(terms.expiry, NaiveDate::from_ymd_opt(2026, 4, 1).unwrap());
        assert_eq!(terms.strike, dec!(100));
        assert_eq!(terms.put_or_call, PutOrCall::Put);
        assert_eq!(terms.multiplier, dec!(100));
    }

    #[test]
    fn option_detail_requires_underlying() {
        let mut contract = Contract::new(700, AssetClass::Option, "USD", "", None);
        let detail = ContractDetail {
            und_conid: None,
            ..option_detail()
        };

        let err = contract.set_detail(&detail).unwrap_err();

        assert_eq!(err, EngineError::missing("contract detail", "undConid"));
        assert!(contract.ticker().is_none());
        assert_eq!(contract.underlying_conid(), 700);
    }

    #[test]
    fn detail_requires_ticker() {
        let mut stock = Contract::new(1, AssetClass::Stock, "USD", "", None);
        let err = stock.set_detail(&ContractDetail::default()).unwrap_err();
        assert_eq!(err, EngineError::missing("contract detail", "ticker"));
    }

    #[test]
    fn malformed_expiry_is_invalid() {
        let mut contract = Contract::new(700, AssetClass::Option, "USD", "", None);
        let detail = ContractDetail {
            expiry: Some("2026-04-01".to_string()),
            ..option_detail()
        };

        assert!(matches!(
            contract.set_detail(&detail),
            Err(EngineError::InvalidField { field: "expiry", .. })
        ));
    }

    #[test]
    fn moneyness_waits_for_both_prices() {
        let policy = FlatTargetRate::default();
        let ctx = PricingContext::new(as_of(), &policy);
        let mut contract = option();

        contract.set_market_price(dec!(7), &ctx).unwrap();
        assert!(contract.moneyness().is_none());

        contract.set_underlying_price(dec!(95), &ctx).unwrap();
        let m = contract.moneyness().unwrap();
        assert_eq!(m.days_to_expiry, 30);
        assert_eq!(m.intrinsic, dec!(5));
        assert_eq!(m.extrinsic, dec!(2));
        assert_eq!(contract.target_price(), Some(dec!(0.82)));
        assert_eq!(contract.last_update(), as_of());
    }

    #[test]
    fn price_change_recomputes_moneyness() {
        let policy = FlatTargetRate::default();
        let ctx = PricingContext::new(as_of(), &policy);
        let mut contract = option();
        contract
            .set_prices(Some(dec!(7)), Some(dec!(95)), &ctx)
            .unwrap();

        contract.set_underlying_price(dec!(101), &ctx).unwrap();

        let m = contract.moneyness().unwrap();
        assert_eq!(m.intrinsic, Decimal::ZERO);
        assert_eq!(m.extrinsic, dec!(7));
    }

    #[test]
    fn stock_never_computes_moneyness() {
        let policy = FlatTargetRate::default();
        let ctx = PricingContext::new(as_of(), &policy);
        let mut stock = Contract::new(1, AssetClass::Stock, "USD", "", None);

        stock.set_market_price(dec!(50), &ctx).unwrap();
        stock.set_underlying_price(dec!(50), &ctx).unwrap();

        assert!(stock.moneyness().is_none());
        assert_eq!(stock.market_price(), Some(dec!(50)));
    }

    #[test]
    fn failed_recompute_leaves_contract_untouched() {
        let policy = FlatTargetRate::default();
        let expiry_eve = NaiveDate::from_ymd_opt(2026, 4, 1)
            .unwrap()
            .and_time(NaiveTime::MIN);
        let good = PricingContext::new(as_of(), &policy);
        let degenerate = PricingContext::new(expiry_eve, &policy);
        let mut contract = option();
        contract
            .set_prices(Some(dec!(7)), Some(dec!(95)), &good)
            .unwrap();

        let err = contract.set_market_price(dec!(3), &degenerate).unwrap_err();

        assert_eq!(err, EngineError::DegenerateTenor { conid: 700 });
        assert_eq!(contract.market_price(), Some(dec!(7)));
        assert_eq!(contract.moneyness().unwrap().days_to_expiry, 30);
        assert_eq!(contract.last_update(), as_of());
    }
}

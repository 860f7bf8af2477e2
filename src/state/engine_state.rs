use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::model::{Currency, CurrencyPair, MarketRate, Money};

/// A persistent (copy-on-write) snapshot of the desk's accounting state.
/// Every mutating operation returns a new `EngineState`; the receiver is
/// consumed but any other holder of the prior value is unaffected, which is
/// what makes time-travel debugging and deterministic replay possible.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineState {
    cash_balances: HashMap<Currency, Money>,
    positions: HashMap<CurrencyPair, Decimal>,
    market_rates: HashMap<CurrencyPair, MarketRate>,
    pub reporting_currency: Currency,
    pub last_timestamp: Option<DateTime<Utc>>,
    pub event_count: u64,
}

impl EngineState {
    pub fn new(reporting_currency: Currency) -> Self {
        Self {
            cash_balances: HashMap::new(),
            positions: HashMap::new(),
            market_rates: HashMap::new(),
            reporting_currency,
            last_timestamp: None,
            event_count: 0,
        }
    }

    pub fn get_cash_balance(&self, ccy: &Currency) -> Money {
        self.cash_balances.get(ccy).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn get_position(&self, pair: &CurrencyPair) -> Decimal {
        self.positions.get(pair).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn get_market_rate(&self, pair: &CurrencyPair) -> Option<MarketRate> {
        self.market_rates.get(pair).copied()
    }

    pub fn cash_balances(&self) -> &HashMap<Currency, Money> {
        &self.cash_balances
    }

    pub fn positions(&self) -> &HashMap<CurrencyPair, Decimal> {
        &self.positions
    }

    pub fn market_rates(&self) -> &HashMap<CurrencyPair, MarketRate> {
        &self.market_rates
    }

    /// Delta-applies `delta` to `ccy`'s cash balance, returning a successor
    /// snapshot.
    #[must_use]
    pub fn update_cash(mut self, ccy: &Currency, delta: Money) -> Self {
        let entry = self.cash_balances.entry(ccy.clone()).or_insert(Decimal::ZERO);
        *entry += delta;
        self
    }

    /// Delta-applies `delta` to `pair`'s signed base-notional position,
    /// returning a successor snapshot.
    #[must_use]
    pub fn update_position(mut self, pair: &CurrencyPair, delta: Decimal) -> Self {
        let entry = self.positions.entry(pair.clone()).or_insert(Decimal::ZERO);
        *entry += delta;
        self
    }

    /// Overwrites the cached rate for `pair`, returning a successor snapshot.
    #[must_use]
    pub fn update_market_rate(mut self, pair: &CurrencyPair, rate: MarketRate) -> Self {
        self.market_rates.insert(pair.clone(), rate);
        self
    }

    /// Applies a config key, if recognized. Only `reporting_currency` is
    /// currently recognized; unknown keys are silently ignored, matching the
    /// documented (and preserved) behavior rather than a later bug-fix.
    #[must_use]
    pub fn update_config(mut self, key: &str, value: &Currency) -> Self {
        if key == "reporting_currency" {
            self.reporting_currency = value.clone();
        }
        self
    }

    /// Bumps the event counter and records the latest handled timestamp.
    /// Called exactly once per handled event, even when the handler makes no
    /// other state change, so `event_count == number of handled events`
    /// always holds.
    #[must_use]
    pub fn increment_event_count(mut self, ts: DateTime<Utc>) -> Self {
        self.event_count += 1;
        self.last_timestamp = Some(ts);
        self
    }

    /// Per-currency net exposure: `+position` to the base currency of every
    /// non-zero position, and (when a rate is cached) `-position*mid` to the
    /// quote currency. Pairs without a cached rate contribute only to base.
    pub fn compute_exposures(&self) -> HashMap<Currency, Decimal> {
        let mut exposures: HashMap<Currency, Decimal> = HashMap::new();
        for (pair, &position) in &self.positions {
            if position == Decimal::ZERO {
                continue;
            }
            *exposures.entry(pair.base.clone()).or_insert(Decimal::ZERO) += position;
            if let Some(rate) = self.market_rates.get(pair) {
                *exposures.entry(pair.quote.clone()).or_insert(Decimal::ZERO) -=
                    position * rate.mid;
            }
        }
        exposures
    }

    /// Stable serialization of the state, used for the final-state JSON
    /// document and for determinism comparisons in tests.
    pub fn to_dict(&self) -> EngineStateDict {
        let mut cash_balances: Vec<(String, String)> = self
            .cash_balances
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        cash_balances.sort();

        let mut positions: Vec<(String, String)> = self
            .positions
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        positions.sort();

        let mut market_rates: Vec<(String, (String, String, String))> = self
            .market_rates
            .iter()
            .map(|(k, v)| {
                (
                    k.to_string(),
                    (v.bid.to_string(), v.ask.to_string(), v.mid.to_string()),
                )
            })
            .collect();
        market_rates.sort_by(|a, b| a.0.cmp(&b.0));

        EngineStateDict {
            cash_balances: cash_balances.into_iter().collect(),
            positions: positions.into_iter().collect(),
            market_rates: market_rates.into_iter().collect(),
            reporting_currency: self.reporting_currency.to_string(),
            last_timestamp: self.last_timestamp.map(|t| t.to_rfc3339()),
            event_count: self.event_count,
        }
    }
}

/// Stable, sorted-key serialization form of [`EngineState`], used for the
/// final-state document and determinism comparisons (byte-identical output
/// across independent replays of the same input requires key order that does
/// not depend on `HashMap` iteration order).
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EngineStateDict {
    pub cash_balances: std::collections::BTreeMap<String, String>,
    pub positions: std::collections::BTreeMap<String, String>,
    pub market_rates: std::collections::BTreeMap<String, (String, String, String)>,
    pub reporting_currency: String,
    pub last_timestamp: Option<String>,
    pub event_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ccy(s: &str) -> Currency {
        Currency::new(s).unwrap()
    }

    fn pair(s: &str) -> CurrencyPair {
        s.parse().unwrap()
    }

    #[test]
    fn update_cash_is_persistent() {
        let s0 = EngineState::new(ccy("USD"));
        let s1 = s0.clone().update_cash(&ccy("USD"), dec!(100));
        assert_eq!(s0.get_cash_balance(&ccy("USD")), Decimal::ZERO);
        assert_eq!(s1.get_cash_balance(&ccy("USD")), dec!(100));
    }

    #[test]
    fn compute_exposures_skips_quote_leg_without_rate() {
        let s = EngineState::new(ccy("USD")).update_position(&pair("EUR/USD"), dec!(1_000_000));
        let exposures = s.compute_exposures();
        assert_eq!(exposures.get(&ccy("EUR")), Some(&dec!(1_000_000)));
        assert_eq!(exposures.get(&ccy("USD")), None);
    }

    #[test]
    fn event_count_monotonic() {
        let s = EngineState::new(ccy("USD"));
        let s = s.increment_event_count(Utc::now());
        let s = s.increment_event_count(Utc::now());
        assert_eq!(s.event_count, 2);
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{error::EventError, model::currency::Currency};

/// A currency pair `BASE/QUOTE`. A pair is *direct* (a "risk pair") iff `QUOTE`
/// equals the reporting currency in scope; otherwise it is a *cross*.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyPair {
    pub base: Currency,
    pub quote: Currency,
}

impl CurrencyPair {
    pub fn new(base: Currency, quote: Currency) -> Result<Self, EventError> {
        if base == quote {
            return Err(EventError::InvalidEvent(format!(
                "currency pair base and quote must differ, got {base}/{base}"
            )));
        }
        Ok(Self { base, quote })
    }

    /// True iff `quote` equals `reporting_currency` — this pair can carry a
    /// risk-pair lot queue directly, with no cross decomposition.
    pub fn is_direct(&self, reporting_currency: &Currency) -> bool {
        &self.quote == reporting_currency
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

impl std::str::FromStr for CurrencyPair {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (base, quote) = s.split_once('/').ok_or_else(|| {
            EventError::InvalidEvent(format!("currency pair '{s}' must be of the form BASE/QUOTE"))
        })?;
        CurrencyPair::new(Currency::new(base)?, Currency::new(quote)?)
    }
}

impl TryFrom<String> for CurrencyPair {
    type Error = EventError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CurrencyPair> for String {
    fn from(value: CurrencyPair) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_displays() {
        let pair: CurrencyPair = "EUR/USD".parse().unwrap();
        assert_eq!(pair.base.as_str(), "EUR");
        assert_eq!(pair.quote.as_str(), "USD");
        assert_eq!(pair.to_string(), "EUR/USD");
    }

    #[test]
    fn is_direct_checks_quote_against_reporting_currency() {
        let pair: CurrencyPair = "EUR/USD".parse().unwrap();
        let usd = Currency::new("USD").unwrap();
        let gbp = Currency::new("GBP").unwrap();
        assert!(pair.is_direct(&usd));
        assert!(!pair.is_direct(&gbp));
    }
}

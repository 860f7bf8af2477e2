//! Direct/inverse FX rate lookup with bid/ask/mid selection.
//!
//! Using the *bid* for a positive direct-pair conversion models selling base
//! to receive quote, which is how a desk actually executes; the inverse
//! branch flips bid/ask accordingly.

use rust_decimal::Decimal;

use crate::{
    error::ConversionError,
    model::{Currency, CurrencyPair},
    state::EngineState,
};

pub struct Converter<'a> {
    state: &'a EngineState,
}

impl<'a> Converter<'a> {
    pub fn new(state: &'a EngineState) -> Self {
        Self { state }
    }

    /// Converts `amount` denominated in `from` into `to`, selecting bid, ask,
    /// or mid per the rules below.
    ///
    /// 1. `from == to` -> `amount` unchanged.
    /// 2. Direct rate `from/to` cached: `price = mid` if `use_mid`, else
    ///    `bid` when `amount > 0` else `ask`. Returns `amount * price`.
    /// 3. Else inverse rate `to/from` cached: `price = mid` if `use_mid`,
    ///    else `ask` when `amount > 0` else `bid`. `price == 0` ->
    ///    [`ConversionError::ZeroRate`]. Returns `amount / price`.
    /// 4. Else [`ConversionError::NoRate`].
    pub fn convert(
        &self,
        amount: Decimal,
        from: &Currency,
        to: &Currency,
        use_mid: bool,
    ) -> Result<Decimal, ConversionError> {
        if from == to {
            return Ok(amount);
        }

        if let Ok(direct) = CurrencyPair::new(from.clone(), to.clone()) {
            if let Some(rate) = self.state.get_market_rate(&direct) {
                let price = if use_mid {
                    rate.mid
                } else if amount > Decimal::ZERO {
                    rate.bid
                } else {
                    rate.ask
                };
                return Ok(amount * price);
            }
        }

        if let Ok(inverse) = CurrencyPair::new(to.clone(), from.clone()) {
            if let Some(rate) = self.state.get_market_rate(&inverse) {
                let price = if use_mid {
                    rate.mid
                } else if amount > Decimal::ZERO {
                    rate.ask
                } else {
                    rate.bid
                };
                if price == Decimal::ZERO {
                    return Err(ConversionError::ZeroRate {
                        from: from.to_string(),
                        to: to.to_string(),
                    });
                }
                return Ok(amount / price);
            }
        }

        Err(ConversionError::NoRate {
            from: from.to_string(),
            to: to.to_string(),
        })
    }

    /// Mid-rate conversion factor from `from` to `to`: `1` when equal,
    /// `mid` for a cached direct pair, `1/mid` for a cached inverse pair,
    /// else [`ConversionError::NoRate`].
    pub fn get_rate(&self, from: &Currency, to: &Currency) -> Result<Decimal, ConversionError> {
        if from == to {
            return Ok(Decimal::ONE);
        }

        if let Ok(direct) = CurrencyPair::new(from.clone(), to.clone()) {
            if let Some(rate) = self.state.get_market_rate(&direct) {
                return Ok(rate.mid);
            }
        }

        if let Ok(inverse) = CurrencyPair::new(to.clone(), from.clone()) {
            if let Some(rate) = self.state.get_market_rate(&inverse) {
                if rate.mid == Decimal::ZERO {
                    return Err(ConversionError::ZeroRate {
                        from: from.to_string(),
                        to: to.to_string(),
                    });
                }
                return Ok(Decimal::ONE / rate.mid);
            }
        }

        Err(ConversionError::NoRate {
            from: from.to_string(),
            to: to.to_string(),
        })
    }

    /// Convenience wrapper used by clock-tick equity aggregation: mid-rate
    /// conversion of `amount` from `ccy` into the state's reporting currency.
    pub fn convert_to_reporting(
        &self,
        amount: Decimal,
        ccy: &Currency,
    ) -> Result<Decimal, ConversionError> {
        self.convert(amount, ccy, &self.state.reporting_currency, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ccy(s: &str) -> Currency {
        Currency::new(s).unwrap()
    }

    fn with_rate(pair: &str, bid: Decimal, ask: Decimal, mid: Decimal) -> EngineState {
        let state = EngineState::new(ccy("USD"));
        let pair: CurrencyPair = pair.parse().unwrap();
        let rate = crate::model::MarketRate::new(bid, ask, mid).unwrap();
        state.update_market_rate(&pair, rate)
    }

    #[test]
    fn same_currency_is_identity() {
        let state = EngineState::new(ccy("USD"));
        let conv = Converter::new(&state);
        assert_eq!(
            conv.convert(dec!(100), &ccy("USD"), &ccy("USD"), true).unwrap(),
            dec!(100)
        );
    }

    #[test]
    fn direct_positive_uses_bid() {
        let state = with_rate("EUR/USD", dec!(1.0995), dec!(1.1005), dec!(1.1000));
        let conv = Converter::new(&state);
        let got = conv.convert(dec!(1_000_000), &ccy("EUR"), &ccy("USD"), false).unwrap();
        assert_eq!(got, dec!(1_000_000) * dec!(1.0995));
    }

    #[test]
    fn inverse_positive_uses_ask() {
        let state = with_rate("EUR/USD", dec!(1.0995), dec!(1.1005), dec!(1.1000));
        let conv = Converter::new(&state);
        let got = conv.convert(dec!(1_100_000), &ccy("USD"), &ccy("EUR"), false).unwrap();
        assert_eq!(got, dec!(1_100_000) / dec!(1.1005));
    }

    #[test]
    fn no_rate_errors() {
        let state = EngineState::new(ccy("USD"));
        let conv = Converter::new(&state);
        assert!(conv.convert(dec!(1), &ccy("EUR"), &ccy("GBP"), true).is_err());
    }

    #[test]
    fn get_rate_round_trips_via_mid() {
        let state = with_rate("EUR/USD", dec!(1.0995), dec!(1.1005), dec!(1.1000));
        let conv = Converter::new(&state);
        let fwd = conv.get_rate(&ccy("EUR"), &ccy("USD")).unwrap();
        let back = conv.get_rate(&ccy("USD"), &ccy("EUR")).unwrap();
        assert_eq!(fwd * back, Decimal::ONE);
    }
}

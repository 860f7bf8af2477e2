//! Cross-trade -> direct-pair leg decomposition (§4.G).
//!
//! Mirrors the physical hedge a desk executes to absorb a cross: two direct
//! trades whose combined currency flows replicate the cross.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::{
    converter::Converter,
    error::DecompositionError,
    lot::Lot,
    model::{Currency, CurrencyPair, Price, Quantity, Side},
};

/// One direct-pair leg produced by decomposing a client trade.
#[derive(Debug, Clone, PartialEq)]
pub struct Leg {
    pub risk_pair: CurrencyPair,
    pub side: Side,
    pub quantity: Quantity,
    pub trade_price: Price,
    pub decomposition_path: String,
}

/// Decomposes `(trade_pair, client_side, quantity, execution_price)` into one
/// or two direct-pair legs, stated from the desk's perspective.
///
/// - Direct pair (`trade_pair.quote == reporting_currency`): a single leg at
///   `execution_price`.
/// - Cross pair: two legs, one per currency, each trade_price taken as the
///   *mid* rate cached at event time via `converter.get_rate`.
pub fn decompose(
    trade_pair: &CurrencyPair,
    client_side: Side,
    quantity: Quantity,
    execution_price: Price,
    reporting_currency: &Currency,
    converter: &Converter,
) -> Result<Vec<Leg>, DecompositionError> {
    if trade_pair.is_direct(reporting_currency) {
        return Ok(vec![Leg {
            risk_pair: trade_pair.clone(),
            side: client_side.opposite(),
            quantity,
            trade_price: execution_price,
            decomposition_path: trade_pair.to_string(),
        }]);
    }

    let base_pair = CurrencyPair::new(trade_pair.base.clone(), reporting_currency.clone())
        .map_err(|_| DecompositionError::MissingRate(format!("{}/{}", trade_pair.base, reporting_currency)))?;
    let quote_pair = CurrencyPair::new(trade_pair.quote.clone(), reporting_currency.clone())
        .map_err(|_| DecompositionError::MissingRate(format!("{}/{}", trade_pair.quote, reporting_currency)))?;

    let base_desk_side = if client_side == Side::Buy { Side::Sell } else { Side::Buy };
    let quote_desk_side = base_desk_side.opposite();

    let base_rate = converter
        .get_rate(&trade_pair.base, reporting_currency)
        .map_err(|_| DecompositionError::MissingRate(base_pair.to_string()))?;
    let quote_rate = converter
        .get_rate(&trade_pair.quote, reporting_currency)
        .map_err(|_| DecompositionError::MissingRate(quote_pair.to_string()))?;

    let base_leg = Leg {
        decomposition_path: format!("{trade_pair}->{base_pair}"),
        risk_pair: base_pair,
        side: base_desk_side,
        quantity,
        trade_price: base_rate,
    };
    let quote_leg = Leg {
        decomposition_path: format!("{trade_pair}->{quote_pair}"),
        risk_pair: quote_pair,
        side: quote_desk_side,
        quantity: quantity * execution_price,
        trade_price: quote_rate,
    };

    Ok(vec![base_leg, quote_leg])
}

/// Builds one [`Lot`] per leg. `lot_id = "{trade_id}_{risk_pair}"`. Every leg
/// pair must have a cached open mid in `open_mids`.
pub fn legs_to_lots(
    legs: &[Leg],
    trade_id: &str,
    timestamp: DateTime<Utc>,
    open_mids: &HashMap<CurrencyPair, Price>,
) -> Result<Vec<Lot>, DecompositionError> {
    legs.iter()
        .map(|leg| {
            let open_mid = open_mids
                .get(&leg.risk_pair)
                .copied()
                .ok_or_else(|| DecompositionError::MissingOpenMid(leg.risk_pair.to_string()))?;
            Lot::open(
                format!("{trade_id}_{}", leg.risk_pair),
                leg.risk_pair.clone(),
                leg.side,
                leg.quantity,
                leg.trade_price,
                timestamp,
                trade_id,
                leg.decomposition_path.clone(),
                open_mid,
            )
            .map_err(|e| DecompositionError::InvalidLeg(leg.risk_pair.to_string(), e.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::EngineState;
    use rust_decimal_macros::dec;

    fn ccy(s: &str) -> Currency {
        Currency::new(s).unwrap()
    }

    fn with_rates() -> EngineState {
        let state = EngineState::new(ccy("USD"));
        let state = state.update_market_rate(
            &"EUR/USD".parse().unwrap(),
            crate::model::MarketRate::new(dec!(1.0995), dec!(1.1005), dec!(1.1000)).unwrap(),
        );
        state.update_market_rate(
            &"GBP/USD".parse().unwrap(),
            crate::model::MarketRate::new(dec!(1.2935), dec!(1.2945), dec!(1.2941)).unwrap(),
        )
    }

    #[test]
    fn direct_pair_produces_single_leg() {
        let state = with_rates();
        let conv = Converter::new(&state);
        let legs = decompose(
            &"EUR/USD".parse().unwrap(),
            Side::Buy,
            dec!(1_000_000),
            dec!(1.1000),
            &ccy("USD"),
            &conv,
        )
        .unwrap();
        assert_eq!(legs.len(), 1);
        assert_eq!(legs[0].side, Side::Sell);
        assert_eq!(legs[0].quantity, dec!(1_000_000));
    }

    #[test]
    fn cross_pair_produces_two_legs() {
        let state = with_rates();
        let conv = Converter::new(&state);
        let legs = decompose(
            &"EUR/GBP".parse().unwrap(),
            Side::Buy,
            dec!(1_000_000),
            dec!(0.8500),
            &ccy("USD"),
            &conv,
        )
        .unwrap();
        assert_eq!(legs.len(), 2);
        assert_eq!(legs[0].risk_pair.to_string(), "EUR/USD");
        assert_eq!(legs[0].side, Side::Sell);
        assert_eq!(legs[0].quantity, dec!(1_000_000));
        assert_eq!(legs[0].trade_price, dec!(1.1000));

        assert_eq!(legs[1].risk_pair.to_string(), "GBP/USD");
        assert_eq!(legs[1].side, Side::Buy);
        assert_eq!(legs[1].quantity, dec!(1_000_000) * dec!(0.8500));
        assert_eq!(legs[1].trade_price, dec!(1.2941));
    }

    #[test]
    fn missing_rate_errors() {
        let state = EngineState::new(ccy("USD"));
        let conv = Converter::new(&state);
        assert!(
            decompose(
                &"EUR/GBP".parse().unwrap(),
                Side::Buy,
                dec!(1_000_000),
                dec!(0.85),
                &ccy("USD"),
                &conv
            )
            .is_err()
        );
    }
}

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::{
    model::event::HedgeFill,
    output::{HedgeFillData, OutputRecord, RecordPayload},
    state::EngineState,
};

/// Identical desk-perspective accounting to a client trade, using
/// `fill_price`, then (if `slippage > 0`) a further debit of `slippage` from
/// quote-currency cash. Emits `hedge_fill`.
pub fn handle(
    state: EngineState,
    event: &HedgeFill,
    event_timestamp: DateTime<Utc>,
) -> (EngineState, Vec<OutputRecord>) {
    let sign = Decimal::from(event.side.direction());

    let mut state = state
        .update_cash(&event.pair.base, -sign * event.notional)
        .update_cash(&event.pair.quote, sign * event.notional * event.fill_price)
        .update_position(&event.pair, -sign * event.notional);

    if event.slippage > Decimal::ZERO {
        state = state.update_cash(&event.pair.quote, -event.slippage);
    }

    let records = vec![OutputRecord::new(
        event_timestamp,
        RecordPayload::HedgeFill(HedgeFillData {
            order_id: event.order_id.clone(),
            pair: event.pair.to_string(),
            side: event.side.to_string(),
            notional: event.notional,
            fill_price: event.fill_price,
            slippage: event.slippage,
        }),
    )];

    (state, records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Currency, CurrencyPair, Side};
    use rust_decimal_macros::dec;

    #[test]
    fn slippage_debits_quote_cash() {
        let state = EngineState::new(Currency::new("USD").unwrap());
        let event = HedgeFill {
            order_id: "ORDER_001".into(),
            pair: "EUR/USD".parse().unwrap(),
            side: Side::Sell,
            notional: dec!(500_000),
            fill_price: dec!(1.0955),
            slippage: dec!(250),
        };
        let (state, _) = handle(state, &event, chrono::Utc::now());
        assert_eq!(state.get_cash_balance(&Currency::new("EUR").unwrap()), dec!(500_000));
        assert_eq!(
            state.get_cash_balance(&Currency::new("USD").unwrap()),
            dec!(-500_000) * dec!(1.0955) - dec!(250)
        );
        assert_eq!(
            state.get_position(&"EUR/USD".parse::<CurrencyPair>().unwrap()),
            dec!(500_000)
        );
    }
}

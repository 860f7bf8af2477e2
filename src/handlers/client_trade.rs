use rust_decimal::Decimal;

use crate::{
    handlers::lot_tracking,
    lot::{LotConfig, LotManager},
    model::event::ClientTrade,
    output::{ClientTradeData, OutputRecord, RecordPayload},
    state::EngineState,
};

/// Desk-perspective double-entry bookkeeping plus lot tracking for a single
/// client trade.
///
/// For BUY (client buys base from the desk): base cash -= notional, quote
/// cash += notional*price, position -= notional. SELL flips every sign.
pub fn handle(
    state: EngineState,
    event: &ClientTrade,
    event_timestamp: chrono::DateTime<chrono::Utc>,
    lot_manager: Option<(&mut LotManager, &LotConfig)>,
) -> (EngineState, Vec<OutputRecord>) {
    let sign = Decimal::from(event.side.direction());

    let state = state
        .update_cash(&event.pair.base, -sign * event.notional)
        .update_cash(&event.pair.quote, sign * event.notional * event.price)
        .update_position(&event.pair, -sign * event.notional);

    let mut records = vec![OutputRecord::new(
        event_timestamp,
        RecordPayload::ClientTrade(ClientTradeData {
            pair: event.pair.to_string(),
            side: event.side.to_string(),
            notional: event.notional,
            price: event.price,
            client_id: event.client_id.clone(),
            trade_id: event.trade_id.clone(),
        }),
    )];

    if let Some((lot_manager, lot_config)) = lot_manager {
        let lot_records = lot_tracking::run(
            lot_manager,
            lot_config,
            &state,
            &event.pair,
            event.side,
            event.notional,
            event.price,
            &event.trade_id,
            event_timestamp,
        );
        records.extend(lot_records);
    }

    (state, records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Currency, CurrencyPair, Side};
    use rust_decimal_macros::dec;

    fn trade(pair: &str, side: Side, notional: Decimal, price: Decimal) -> ClientTrade {
        ClientTrade {
            pair: pair.parse().unwrap(),
            side,
            notional,
            price,
            client_id: "C1".into(),
            trade_id: "T1".into(),
        }
    }

    #[test]
    fn buy_debits_base_credits_quote() {
        let state = EngineState::new(Currency::new("USD").unwrap());
        let event = trade("EUR/USD", Side::Buy, dec!(1_000_000), dec!(1.10));
        let (state, records) = handle(state, &event, chrono::Utc::now(), None);
        assert_eq!(state.get_cash_balance(&Currency::new("EUR").unwrap()), dec!(-1_000_000));
        assert_eq!(state.get_cash_balance(&Currency::new("USD").unwrap()), dec!(1_100_000));
        assert_eq!(
            state.get_position(&"EUR/USD".parse::<CurrencyPair>().unwrap()),
            dec!(-1_000_000)
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].record_type(), "client_trade");
    }

    #[test]
    fn sell_flips_every_sign() {
        let state = EngineState::new(Currency::new("USD").unwrap());
        let event = trade("EUR/USD", Side::Sell, dec!(1_000_000), dec!(1.10));
        let (state, _) = handle(state, &event, chrono::Utc::now(), None);
        assert_eq!(state.get_cash_balance(&Currency::new("EUR").unwrap()), dec!(1_000_000));
        assert_eq!(state.get_cash_balance(&Currency::new("USD").unwrap()), dec!(-1_100_000));
        assert_eq!(
            state.get_position(&"EUR/USD".parse::<CurrencyPair>().unwrap()),
            dec!(1_000_000)
        );
    }
}

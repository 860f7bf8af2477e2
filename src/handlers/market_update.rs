use chrono::{DateTime, Utc};

use crate::{
    model::{MarketRate, event::MarketUpdate},
    output::{MarketUpdateData, OutputRecord, RecordPayload},
    state::EngineState,
};

/// Overwrites the cached rate for the event's pair; emits `market_update`.
pub fn handle(
    state: EngineState,
    event: &MarketUpdate,
    event_timestamp: DateTime<Utc>,
) -> (EngineState, Vec<OutputRecord>) {
    // The event was already validated at construction, so this cannot fail.
    let rate = MarketRate::new(event.bid, event.ask, event.mid)
        .expect("market update events are validated at construction");
    let state = state.update_market_rate(&event.pair, rate);

    let records = vec![OutputRecord::new(
        event_timestamp,
        RecordPayload::MarketUpdate(MarketUpdateData {
            pair: event.pair.to_string(),
            bid: event.bid,
            ask: event.ask,
            mid: event.mid,
        }),
    )];

    (state, records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Currency;
    use rust_decimal_macros::dec;

    #[test]
    fn overwrites_cached_rate() {
        let state = EngineState::new(Currency::new("USD").unwrap());
        let event = MarketUpdate {
            pair: "EUR/USD".parse().unwrap(),
            bid: dec!(1.0995),
            ask: dec!(1.1005),
            mid: dec!(1.1000),
        };
        let (state, records) = handle(state, &event, Utc::now());
        let rate = state.get_market_rate(&"EUR/USD".parse().unwrap()).unwrap();
        assert_eq!(rate.mid, dec!(1.1000));
        assert_eq!(records[0].record_type(), "market_update");
    }
}

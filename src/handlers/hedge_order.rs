use chrono::{DateTime, Utc};

use crate::{
    model::event::HedgeOrder,
    output::{HedgeOrderData, OutputRecord, RecordPayload},
    state::EngineState,
};

/// No state mutation beyond the counter: a hedge order is recorded as
/// intent, never routed. Emits `hedge_order`.
pub fn handle(
    state: EngineState,
    event: &HedgeOrder,
    event_timestamp: DateTime<Utc>,
) -> (EngineState, Vec<OutputRecord>) {
    let records = vec![OutputRecord::new(
        event_timestamp,
        RecordPayload::HedgeOrder(HedgeOrderData {
            order_id: event.order_id.clone(),
            pair: event.pair.to_string(),
            side: event.side.to_string(),
            notional: event.notional,
            limit_price: event.limit_price,
        }),
    )];

    (state, records)
}

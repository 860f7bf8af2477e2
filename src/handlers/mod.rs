//! Pure handler functions `(state, event) -> (state', outputs)` (§4.H).
//!
//! Each handler advances `event_count` exactly once per event — even when no
//! other state mutation occurs — via [`dispatch`], so `state.event_count ==
//! number of handled events` always holds.

pub mod client_trade;
pub mod clock_tick;
pub mod config_update;
pub mod hedge_fill;
pub mod hedge_order;
pub mod lot_tracking;
pub mod market_update;

use crate::{
    error::EngineResult,
    lot::{LotConfig, LotManager},
    model::{Event, EventPayload},
    output::OutputRecord,
    state::EngineState,
};

/// Dispatches a single validated event to its handler. The lot-tracking
/// subsystem is consulted only for `ClientTrade` events, and only when both
/// a manager and its config are supplied.
pub fn dispatch(
    state: EngineState,
    event: &Event,
    lot_manager: Option<(&mut LotManager, &LotConfig)>,
) -> EngineResult<(EngineState, Vec<OutputRecord>)> {
    let state = state.increment_event_count(event.timestamp);

    let (state, records) = match &event.payload {
        EventPayload::ClientTrade(e) => client_trade::handle(state, e, event.timestamp, lot_manager),
        EventPayload::MarketUpdate(e) => market_update::handle(state, e, event.timestamp),
        EventPayload::ConfigUpdate(e) => config_update::handle(state, e, event.timestamp),
        EventPayload::HedgeOrder(e) => hedge_order::handle(state, e, event.timestamp),
        EventPayload::HedgeFill(e) => hedge_fill::handle(state, e, event.timestamp),
        EventPayload::ClockTick(e) => {
            let lot_manager_ref = lot_manager.map(|(mgr, _)| &*mgr);
            clock_tick::handle(state, e, event.timestamp, lot_manager_ref)
        }
    };

    Ok((state, records))
}

//! Deterministic driver: dispatch, progress reporting (§4.I).

use tracing::{error, info};

use crate::{
    error::EngineResult,
    handlers,
    lot::{LotConfig, LotManager},
    model::Event,
    output::OutputRecord,
    state::EngineState,
};

const PROGRESS_INTERVAL: usize = 10_000;

/// Holds the current [`EngineState`] and the append-only list of
/// [`OutputRecord`]s produced so far. The lot manager, when configured, is
/// owned here and mutated in place by handlers; the engine state itself
/// remains a persistent snapshot threaded through each call.
pub struct Processor {
    state: EngineState,
    lot_manager: Option<LotManager>,
    lot_config: Option<LotConfig>,
    records: Vec<OutputRecord>,
}

impl Processor {
    pub fn new(state: EngineState, lot_config: Option<LotConfig>) -> Self {
        let lot_manager = lot_config
            .as_ref()
            .filter(|c| c.enabled)
            .map(LotManager::new);
        Self {
            state,
            lot_manager,
            lot_config,
            records: Vec::new(),
        }
    }

    /// Dispatches a single event. On handler failure, logs full event
    /// context and re-raises (fail-fast): state is left exactly as it was
    /// before the call, since the handler either returns atomically or not
    /// at all.
    pub fn process_event(&mut self, event: &Event) -> EngineResult<()> {
        let lot_ctx = match (&mut self.lot_manager, &self.lot_config) {
            (Some(mgr), Some(cfg)) => Some((mgr, cfg)),
            _ => None,
        };

        match handlers::dispatch(self.state.clone(), event, lot_ctx) {
            Ok((next_state, new_records)) => {
                self.state = next_state;
                self.records.extend(new_records);
                Ok(())
            }
            Err(e) => {
                error!(
                    event_kind = %event.kind(),
                    timestamp = %event.timestamp,
                    sequence_id = event.sequence_id,
                    error = %e,
                    "handler failed while processing event"
                );
                Err(e)
            }
        }
    }

    /// Processes an already totally-ordered sequence of events, logging
    /// progress every 10,000 events.
    pub fn process_events(&mut self, events: &[Event]) -> EngineResult<()> {
        for (i, event) in events.iter().enumerate() {
            self.process_event(event)?;
            if (i + 1) % PROGRESS_INTERVAL == 0 {
                info!(processed = i + 1, total = events.len(), "processing progress");
            }
        }
        Ok(())
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn lot_manager(&self) -> Option<&LotManager> {
        self.lot_manager.as_ref()
    }

    pub fn output_records(&self) -> &[OutputRecord] {
        &self.records
    }

    pub fn into_parts(self) -> (EngineState, Vec<OutputRecord>) {
        (self.state, self.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Currency, CurrencyPair, Side};
    use chrono::Utc;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn pair(s: &str) -> CurrencyPair {
        s.parse().unwrap()
    }

    #[test]
    fn event_count_matches_events_processed() {
        let mut proc = Processor::new(EngineState::new(Currency::new("USD").unwrap()), None);
        let events = vec![
            Event::market_update(Utc::now(), 0, pair("EUR/USD"), dec!(1.0995), dec!(1.1005), dec!(1.1000))
                .unwrap(),
            Event::client_trade(
                Utc::now(),
                1,
                pair("EUR/USD"),
                Side::Buy,
                dec!(1_000_000),
                dec!(1.1000),
                "C1",
                "T1",
            )
            .unwrap(),
            Event::clock_tick(Utc::now(), 2, "SNAP").unwrap(),
        ];
        proc.process_events(&events).unwrap();
        assert_eq!(proc.state().event_count, 3);
        assert_eq!(proc.output_records().len(), 3);
    }

    #[test]
    fn scenario_buy_then_flat_direct_pair() {
        let mut proc = Processor::new(EngineState::new(Currency::new("USD").unwrap()), None);
        let events = vec![
            Event::market_update(Utc::now(), 0, pair("EUR/USD"), dec!(1.0995), dec!(1.1005), dec!(1.1000))
                .unwrap(),
            Event::client_trade(
                Utc::now(),
                1,
                pair("EUR/USD"),
                Side::Buy,
                dec!(1_000_000),
                dec!(1.1000),
                "C1",
                "TRADE_001",
            )
            .unwrap(),
            Event::market_update(Utc::now(), 2, pair("EUR/USD"), dec!(1.1495), dec!(1.1505), dec!(1.1500))
                .unwrap(),
            Event::client_trade(
                Utc::now(),
                3,
                pair("EUR/USD"),
                Side::Sell,
                dec!(1_000_000),
                dec!(1.1500),
                "C1",
                "TRADE_002",
            )
            .unwrap(),
        ];
        proc.process_events(&events).unwrap();
        let state = proc.state();
        assert_eq!(state.get_position(&pair("EUR/USD")), Decimal::ZERO);
        assert_eq!(state.get_cash_balance(&Currency::new("EUR").unwrap()), Decimal::ZERO);
        assert_eq!(
            state.get_cash_balance(&Currency::new("USD").unwrap()),
            dec!(-50_000)
        );
    }
}

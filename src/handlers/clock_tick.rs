use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::{
    converter::Converter,
    lot::LotManager,
    model::event::ClockTick,
    output::{ClockTickData, LotTrackingSnapshot, OutputRecord, RecordPayload},
    state::EngineState,
};

/// No mutation beyond the counter. Builds a snapshot record with cash,
/// positions, exposures, total reporting-currency equity, event count, and —
/// when a lot manager is active — aggregate lot-tracking state.
pub fn handle(
    state: EngineState,
    event: &ClockTick,
    event_timestamp: DateTime<Utc>,
    lot_manager: Option<&LotManager>,
) -> (EngineState, Vec<OutputRecord>) {
    let converter = Converter::new(&state);

    // Currencies that cannot be converted to reporting currency contribute
    // zero to total equity and are silently skipped (§9 open question).
    let total_equity: Decimal = state
        .cash_balances()
        .iter()
        .filter_map(|(ccy, &balance)| converter.convert_to_reporting(balance, ccy).ok())
        .sum();

    let cash_balances: BTreeMap<String, Decimal> = state
        .cash_balances()
        .iter()
        .map(|(k, v)| (k.to_string(), *v))
        .collect();
    let positions: BTreeMap<String, Decimal> = state
        .positions()
        .iter()
        .map(|(k, v)| (k.to_string(), *v))
        .collect();
    let exposures: BTreeMap<String, Decimal> = state
        .compute_exposures()
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

    let lot_tracking = lot_manager.map(|mgr| {
        let market_mids: std::collections::HashMap<_, _> = state
            .market_rates()
            .iter()
            .map(|(pair, rate)| (pair.clone(), rate.mid))
            .collect();
        LotTrackingSnapshot {
            total_open_lots: mgr.total_open_lots(),
            total_closed_lots: mgr.total_closed_lots(),
            total_unrealized_pnl: mgr.compute_total_unrealized_pnl(&market_mids),
            net_positions: mgr
                .get_all_net_positions()
                .into_iter()
                .map(|(pair, qty)| (pair.to_string(), qty))
                .collect(),
        }
    });

    let records = vec![OutputRecord::new(
        event_timestamp,
        RecordPayload::ClockTick(ClockTickData {
            tick_label: event.tick_label.clone(),
            cash_balances,
            positions,
            exposures,
            total_equity,
            // `state` already reflects dispatch's increment for *this* tick;
            // the snapshot reports the count of events handled before it.
            event_count: state.event_count - 1,
            lot_tracking,
        }),
    )];

    (state, records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        lot::{LotConfig, LotManager},
        model::{Currency, CurrencyPair, Side},
    };
    use rust_decimal_macros::dec;

    #[test]
    fn snapshot_event_count_is_pre_tick() {
        let state = EngineState::new(Currency::new("USD").unwrap()).increment_event_count(Utc::now());
        let event = ClockTick { tick_label: "SNAP".into() };
        let (_, records) = handle(state, &event, Utc::now(), None);
        match &records[0].payload {
            RecordPayload::ClockTick(data) => assert_eq!(data.event_count, 0),
            other => panic!("expected clock_tick payload, got {other:?}"),
        }
    }

    #[test]
    fn snapshot_reports_open_and_closed_lot_counts() {
        let pair: CurrencyPair = "EUR/USD".parse().unwrap();
        let config = LotConfig {
            enabled: true,
            matching_rule: "FIFO".into(),
            risk_pairs: vec![pair.clone()],
            trade_pairs: vec![],
            hedge_pairs: vec![],
            reporting_currency: Currency::new("USD").unwrap(),
        };
        let mut mgr = LotManager::new(&config);
        let lot = crate::lot::Lot::open(
            "T1_EUR/USD", pair.clone(), Side::Buy, dec!(100), dec!(1.10), Utc::now(), "T1", "EUR/USD", dec!(1.10),
        )
        .unwrap();
        mgr.add_lot(lot).unwrap();
        mgr.match_lots(&pair, dec!(100), Side::Sell, dec!(1.15), Utc::now()).unwrap();

        let state = EngineState::new(Currency::new("USD").unwrap()).increment_event_count(Utc::now());
        let event = ClockTick { tick_label: "SNAP".into() };
        let (_, records) = handle(state, &event, Utc::now(), Some(&mgr));
        match &records[0].payload {
            RecordPayload::ClockTick(data) => {
                let lot_tracking = data.lot_tracking.as_ref().unwrap();
                assert_eq!(lot_tracking.total_open_lots, 0);
                assert_eq!(lot_tracking.total_closed_lots, 1);
            }
            other => panic!("expected clock_tick payload, got {other:?}"),
        }
    }
}

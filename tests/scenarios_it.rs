//! End-to-end replay scenarios driven entirely through the public
//! `Processor` API, mirroring the literal worked examples a reviewer would
//! reach for to sanity-check the accounting core.

use chrono::{DateTime, Utc};
use deskline::{
    lot::{LotConfig, LotManager},
    model::{Currency, CurrencyPair, Event, Side},
    processor::Processor,
};
use rust_decimal_macros::dec;

fn usd() -> Currency {
    Currency::new("USD").unwrap()
}

fn pair(s: &str) -> CurrencyPair {
    s.parse().unwrap()
}

fn ts(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

fn fifo_config(risk_pairs: &[&str]) -> LotConfig {
    LotConfig {
        enabled: true,
        matching_rule: "FIFO".into(),
        risk_pairs: risk_pairs.iter().map(|p| pair(p)).collect(),
        trade_pairs: vec![],
        hedge_pairs: vec![],
        reporting_currency: usd(),
    }
}

#[test]
fn partial_match_leaves_a_reduced_open_lot() {
    let mut proc = Processor::new(
        deskline::state::EngineState::new(usd()),
        Some(fifo_config(&["EUR/USD"])),
    );

    let events = vec![
        Event::market_update(ts("2024-01-01T00:00:00Z"), 0, pair("EUR/USD"), dec!(1.0995), dec!(1.1005), dec!(1.1000)).unwrap(),
        Event::client_trade(ts("2024-01-01T00:00:01Z"), 1, pair("EUR/USD"), Side::Buy, dec!(1_000_000), dec!(1.1000), "C1", "TRADE_001").unwrap(),
        Event::market_update(ts("2024-01-01T00:00:02Z"), 2, pair("EUR/USD"), dec!(1.1495), dec!(1.1505), dec!(1.1500)).unwrap(),
        Event::client_trade(ts("2024-01-01T00:00:03Z"), 3, pair("EUR/USD"), Side::Sell, dec!(600_000), dec!(1.1500), "C1", "TRADE_003").unwrap(),
    ];
    proc.process_events(&events).unwrap();

    let state = proc.state();
    assert_eq!(state.get_position(&pair("EUR/USD")), dec!(-400_000));

    let mgr = proc.lot_manager().unwrap();
    let queue = mgr.queue(&pair("EUR/USD")).unwrap();
    assert_eq!(queue.open_lots().len(), 1);
    assert_eq!(queue.open_lots()[0].quantity, dec!(400_000));

    let lot_matches: Vec<_> = proc
        .output_records()
        .iter()
        .filter(|r| r.record_type() == "lot_match")
        .collect();
    assert_eq!(lot_matches.len(), 1);
}

#[test]
fn determinism_two_independent_runs_agree_byte_for_byte() {
    let events = vec![
        Event::market_update(ts("2024-01-01T00:00:00Z"), 0, pair("EUR/USD"), dec!(1.0995), dec!(1.1005), dec!(1.1000)).unwrap(),
        Event::client_trade(ts("2024-01-01T00:00:01Z"), 1, pair("EUR/USD"), Side::Buy, dec!(1_000_000), dec!(1.1000), "C1", "TRADE_001").unwrap(),
        Event::market_update(ts("2024-01-01T00:00:02Z"), 2, pair("EUR/USD"), dec!(1.1495), dec!(1.1505), dec!(1.1500)).unwrap(),
        Event::client_trade(ts("2024-01-01T00:00:03Z"), 3, pair("EUR/USD"), Side::Sell, dec!(1_000_000), dec!(1.1500), "C1", "TRADE_002").unwrap(),
    ];

    let mut run_a = Processor::new(deskline::state::EngineState::new(usd()), None);
    run_a.process_events(&events).unwrap();
    let mut run_b = Processor::new(deskline::state::EngineState::new(usd()), None);
    run_b.process_events(&events).unwrap();

    assert_eq!(run_a.state().to_dict(), run_b.state().to_dict());

    let serialize = |records: &[deskline::output::OutputRecord]| {
        records
            .iter()
            .map(|r| serde_json::to_string(r).unwrap())
            .collect::<Vec<_>>()
            .join("\n")
    };
    assert_eq!(serialize(run_a.output_records()), serialize(run_b.output_records()));
}

#[test]
fn cross_trade_then_clock_tick_reports_both_legs() {
    let mut proc = Processor::new(
        deskline::state::EngineState::new(usd()),
        Some(fifo_config(&["EUR/USD", "GBP/USD"])),
    );

    let events = vec![
        Event::market_update(ts("2024-01-01T00:00:00Z"), 0, pair("EUR/USD"), dec!(1.0995), dec!(1.1005), dec!(1.1000)).unwrap(),
        Event::market_update(ts("2024-01-01T00:00:01Z"), 1, pair("GBP/USD"), dec!(1.2935), dec!(1.2945), dec!(1.2941)).unwrap(),
        Event::client_trade(ts("2024-01-01T00:00:02Z"), 2, pair("EUR/GBP"), Side::Buy, dec!(1_000_000), dec!(0.8500), "C1", "TRADE_CROSS").unwrap(),
        Event::clock_tick(ts("2024-01-01T00:00:03Z"), 3, "SNAP").unwrap(),
    ];
    proc.process_events(&events).unwrap();

    let created: Vec<_> = proc
        .output_records()
        .iter()
        .filter(|r| r.record_type() == "lot_created")
        .collect();
    assert_eq!(created.len(), 2);

    assert_eq!(proc.state().get_position(&pair("EUR/USD")), dec!(-1_000_000));
    assert_eq!(proc.state().get_position(&pair("GBP/USD")), dec!(850_000));

    let exposures = proc.state().compute_exposures();
    assert_eq!(exposures.get(&Currency::new("EUR").unwrap()), Some(&dec!(-1_000_000)));

    let snapshot = proc
        .output_records()
        .iter()
        .find(|r| r.record_type() == "clock_tick")
        .unwrap();
    match &snapshot.payload {
        deskline::output::RecordPayload::ClockTick(data) => {
            let lot_tracking = data.lot_tracking.as_ref().unwrap();
            assert_eq!(lot_tracking.total_open_lots, 2);
        }
        other => panic!("expected clock_tick payload, got {other:?}"),
    }
}

#[test]
fn hedge_fill_with_slippage_matches_worked_example() {
    let state = deskline::state::EngineState::new(usd())
        .update_market_rate(&pair("EUR/USD"), deskline::model::MarketRate::new(dec!(1.0945), dec!(1.0965), dec!(1.0955)).unwrap());
    let mut proc = Processor::new(state, None);

    let events = vec![
        Event::hedge_fill(ts("2024-01-01T00:00:00Z"), 0, "ORDER_001", pair("EUR/USD"), Side::Sell, dec!(500_000), dec!(1.0955), dec!(250)).unwrap(),
    ];
    proc.process_events(&events).unwrap();

    assert_eq!(proc.state().get_cash_balance(&Currency::new("EUR").unwrap()), dec!(500_000));
    assert_eq!(
        proc.state().get_cash_balance(&Currency::new("USD").unwrap()),
        dec!(-500_000) * dec!(1.0955) - dec!(250)
    );
    assert_eq!(proc.state().get_position(&pair("EUR/USD")), dec!(500_000));
}

#[test]
fn lot_manager_constructed_independently_still_rejects_stale_pairs() {
    let cfg = fifo_config(&["EUR/USD"]);
    let mut mgr = LotManager::new(&cfg);
    let lot = deskline::lot::Lot::open(
        "T1_GBP/USD",
        pair("GBP/USD"),
        Side::Buy,
        dec!(1),
        dec!(1.3),
        Utc::now(),
        "T1",
        "GBP/USD",
        dec!(1.3),
    )
    .unwrap();
    assert!(mgr.add_lot(lot).is_err());
}

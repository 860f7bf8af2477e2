//! Synthetic input generation for `generate-sample-data` (§4.K). Not part of
//! the accounting core; exists purely so the CLI's `run` subcommand has
//! something to replay without wiring up real desk feeds.

use std::path::Path;

use chrono::{Duration, Utc};
use polars::prelude::*;
use rand::Rng;

use crate::{
    error::{EngineResult, IoError},
    io::schema::col,
};

fn write_parquet(path: &Path, df: &mut DataFrame) -> EngineResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(IoError::from)?;
    }
    let file = std::fs::File::create(path).map_err(IoError::from)?;
    ParquetWriter::new(file).finish(df).map_err(IoError::from)?;
    Ok(())
}

/// Writes a small synthetic desk feed: EUR/USD and GBP/USD market updates,
/// `num_trades` alternating BUY/SELL EUR/USD client trades plus one cross
/// (EUR/GBP) trade, one hedge order/fill pair, and `num_ticks` clock ticks —
/// enough to exercise direct matching, cross decomposition, and hedge
/// accounting in one replay.
pub fn generate(out_dir: &Path, num_trades: usize, num_ticks: usize) -> EngineResult<()> {
    let mut rng = rand::rng();
    let base_ts = Utc::now();
    let ts = |offset_secs: i64| (base_ts + Duration::seconds(offset_secs)).to_rfc3339();
    let num_trades = num_trades.max(1);
    let num_ticks = num_ticks.max(1);

    // market_update.parquet
    {
        let mut timestamps = Vec::new();
        let mut sequence_ids = Vec::new();
        let mut pairs = Vec::new();
        let mut bids = Vec::new();
        let mut asks = Vec::new();
        let mut mids = Vec::new();

        let mut push = |seq: i64, offset: i64, pair: &str, mid: f64, spread: f64| {
            let bid = mid - spread / 2.0;
            let ask = mid + spread / 2.0;
            timestamps.push(ts(offset));
            sequence_ids.push(seq);
            pairs.push(pair.to_string());
            bids.push(format!("{bid:.4}"));
            asks.push(format!("{ask:.4}"));
            mids.push(format!("{mid:.4}"));
        };

        push(0, 0, "EUR/USD", 1.1000, 0.0010);
        push(1, 0, "GBP/USD", 1.2941, 0.0012);
        push(5, 30, "EUR/USD", 1.1000 + rng.random_range(-0.002..0.002), 0.0010);

        let mut df = df![
            col::TIMESTAMP => timestamps,
            col::SEQUENCE_ID => sequence_ids,
            col::PAIR => pairs,
            col::BID => bids,
            col::ASK => asks,
            col::MID => mids,
        ]
        .map_err(IoError::from)?;
        write_parquet(&out_dir.join("market_update.parquet"), &mut df)?;
    }

    // client_trade.parquet
    {
        let notional: i64 = 1_000_000;
        let mut timestamps = Vec::new();
        let mut sequence_ids = Vec::new();
        let mut pairs = Vec::new();
        let mut sides = Vec::new();
        let mut notionals = Vec::new();
        let mut prices = Vec::new();
        let mut client_ids = Vec::new();
        let mut trade_ids = Vec::new();

        let mut seq = 1i64;
        for i in 0..num_trades {
            let side = if i % 2 == 0 { "BUY" } else { "SELL" };
            let price = if i % 2 == 0 { "1.1000" } else { "1.1500" };
            timestamps.push(ts(2 + i as i64));
            sequence_ids.push(seq);
            pairs.push("EUR/USD".to_string());
            sides.push(side.to_string());
            notionals.push(notional.to_string());
            prices.push(price.to_string());
            client_ids.push("C1".to_string());
            trade_ids.push(format!("TRADE_{:03}", i + 1));
            seq += 1;
        }

        timestamps.push(ts(2 + num_trades as i64));
        sequence_ids.push(seq);
        pairs.push("EUR/GBP".to_string());
        sides.push("BUY".to_string());
        notionals.push(notional.to_string());
        prices.push("0.8500".to_string());
        client_ids.push("C2".to_string());
        trade_ids.push(format!("TRADE_{:03}", num_trades + 1));

        let mut df = df![
            col::TIMESTAMP => timestamps,
            col::SEQUENCE_ID => sequence_ids,
            col::PAIR => pairs,
            col::SIDE => sides,
            col::NOTIONAL => notionals,
            col::PRICE => prices,
            col::CLIENT_ID => client_ids,
            col::TRADE_ID => trade_ids,
        ]
        .map_err(IoError::from)?;
        write_parquet(&out_dir.join("client_trade.parquet"), &mut df)?;
    }

    // hedge_order.parquet / hedge_fill.parquet
    {
        let mut df = df![
            col::TIMESTAMP => vec![ts(1)],
            col::SEQUENCE_ID => vec![3i64],
            col::ORDER_ID => vec!["HEDGE_001".to_string()],
            col::PAIR => vec!["EUR/USD".to_string()],
            col::SIDE => vec!["BUY".to_string()],
            col::NOTIONAL => vec!["500000".to_string()],
            col::LIMIT_PRICE => vec![None::<String>],
        ]
        .map_err(IoError::from)?;
        write_parquet(&out_dir.join("hedge_order.parquet"), &mut df)?;

        let mut df = df![
            col::TIMESTAMP => vec![ts(1)],
            col::SEQUENCE_ID => vec![4i64],
            col::ORDER_ID => vec!["HEDGE_001".to_string()],
            col::PAIR => vec!["EUR/USD".to_string()],
            col::SIDE => vec!["BUY".to_string()],
            col::NOTIONAL => vec!["500000".to_string()],
            col::FILL_PRICE => vec!["1.1004".to_string()],
            col::SLIPPAGE => vec!["200".to_string()],
        ]
        .map_err(IoError::from)?;
        write_parquet(&out_dir.join("hedge_fill.parquet"), &mut df)?;
    }

    // clock_tick.parquet
    {
        let timestamps: Vec<String> = (0..num_ticks).map(|i| ts(10 + 30 * i as i64)).collect();
        let sequence_ids: Vec<i64> = (0..num_ticks).map(|i| 100 + i as i64).collect();
        let tick_labels: Vec<String> = (0..num_ticks).map(|i| format!("EOD_{}", i + 1)).collect();

        let mut df = df![
            col::TIMESTAMP => timestamps,
            col::SEQUENCE_ID => sequence_ids,
            col::TICK_LABEL => tick_labels,
        ]
        .map_err(IoError::from)?;
        write_parquet(&out_dir.join("clock_tick.parquet"), &mut df)?;
    }

    Ok(())
}

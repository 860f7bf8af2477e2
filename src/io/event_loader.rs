//! Columnar event ingestion (§4.J). One Parquet file per configured event
//! kind; rows are decoded into validated [`Event`]s and merged into a single
//! totally-ordered sequence before the processor ever sees them.

use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use polars::prelude::*;
use rust_decimal::Decimal;

use crate::{
    config::SimConfig,
    error::{EngineResult, IoError},
    io::schema::col,
    model::{CurrencyPair, Event, EventKind, Side},
};

fn read_parquet(path: &Path) -> EngineResult<DataFrame> {
    LazyFrame::scan_parquet(path, ScanArgsParquet::default())
        .map_err(IoError::from)?
        .collect()
        .map_err(|e| IoError::from(e).into())
}

fn str_cell(df: &DataFrame, name: &str, row: usize) -> EngineResult<String> {
    df.column(name)
        .map_err(IoError::from)?
        .str()
        .map_err(IoError::from)?
        .get(row)
        .map(str::to_string)
        .ok_or_else(|| IoError::MalformedDecimal {
            field: name.to_string(),
            value: "<null>".to_string(),
        }.into())
}

fn opt_str_cell(df: &DataFrame, name: &str, row: usize) -> EngineResult<Option<String>> {
    Ok(df
        .column(name)
        .map_err(IoError::from)?
        .str()
        .map_err(IoError::from)?
        .get(row)
        .map(str::to_string))
}

fn i64_cell(df: &DataFrame, name: &str, row: usize) -> EngineResult<i64> {
    df.column(name)
        .map_err(IoError::from)?
        .i64()
        .map_err(IoError::from)?
        .get(row)
        .ok_or_else(|| {
            IoError::MalformedDecimal {
                field: name.to_string(),
                value: "<null>".to_string(),
            }
            .into()
        })
}

fn decimal_cell(df: &DataFrame, name: &str, row: usize) -> EngineResult<Decimal> {
    let raw = str_cell(df, name, row)?;
    Decimal::from_str(&raw).map_err(|_| {
        IoError::MalformedDecimal {
            field: name.to_string(),
            value: raw,
        }
        .into()
    })
}

fn timestamp_cell(df: &DataFrame, name: &str, row: usize) -> EngineResult<DateTime<Utc>> {
    let raw = str_cell(df, name, row)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            IoError::MalformedTimestamp {
                field: name.to_string(),
                value: raw,
            }
            .into()
        })
}

fn side_cell(df: &DataFrame, name: &str, row: usize) -> EngineResult<Side> {
    let raw = str_cell(df, name, row)?;
    Side::from_str(&raw).map_err(|_| {
        IoError::MalformedDecimal {
            field: name.to_string(),
            value: raw,
        }
        .into()
    })
}

fn pair_cell(df: &DataFrame, name: &str, row: usize) -> EngineResult<CurrencyPair> {
    let raw = str_cell(df, name, row)?;
    raw.parse::<CurrencyPair>()
        .map_err(|e| IoError::MalformedDecimal {
            field: name.to_string(),
            value: format!("{raw} ({e})"),
        }.into())
}

fn load_client_trades(path: &Path) -> EngineResult<Vec<Event>> {
    let df = read_parquet(path)?;
    (0..df.height())
        .map(|i| {
            Ok(Event::client_trade(
                timestamp_cell(&df, col::TIMESTAMP, i)?,
                i64_cell(&df, col::SEQUENCE_ID, i)? as u64,
                pair_cell(&df, col::PAIR, i)?,
                side_cell(&df, col::SIDE, i)?,
                decimal_cell(&df, col::NOTIONAL, i)?,
                decimal_cell(&df, col::PRICE, i)?,
                str_cell(&df, col::CLIENT_ID, i)?,
                str_cell(&df, col::TRADE_ID, i)?,
            )?)
        })
        .collect()
}

fn load_market_updates(path: &Path) -> EngineResult<Vec<Event>> {
    let df = read_parquet(path)?;
    (0..df.height())
        .map(|i| {
            Ok(Event::market_update(
                timestamp_cell(&df, col::TIMESTAMP, i)?,
                i64_cell(&df, col::SEQUENCE_ID, i)? as u64,
                pair_cell(&df, col::PAIR, i)?,
                decimal_cell(&df, col::BID, i)?,
                decimal_cell(&df, col::ASK, i)?,
                decimal_cell(&df, col::MID, i)?,
            )?)
        })
        .collect()
}

fn load_config_updates(path: &Path) -> EngineResult<Vec<Event>> {
    let df = read_parquet(path)?;
    (0..df.height())
        .map(|i| {
            Ok(Event::config_update(
                timestamp_cell(&df, col::TIMESTAMP, i)?,
                i64_cell(&df, col::SEQUENCE_ID, i)? as u64,
                str_cell(&df, col::KEY, i)?,
                str_cell(&df, col::VALUE, i)?,
            )?)
        })
        .collect()
}

fn load_hedge_orders(path: &Path) -> EngineResult<Vec<Event>> {
    let df = read_parquet(path)?;
    (0..df.height())
        .map(|i| {
            let limit_price = match opt_str_cell(&df, col::LIMIT_PRICE, i)? {
                Some(raw) => Some(Decimal::from_str(&raw).map_err(|_| IoError::MalformedDecimal {
                    field: col::LIMIT_PRICE.to_string(),
                    value: raw,
                })?),
                None => None,
            };
            Ok(Event::hedge_order(
                timestamp_cell(&df, col::TIMESTAMP, i)?,
                i64_cell(&df, col::SEQUENCE_ID, i)? as u64,
                str_cell(&df, col::ORDER_ID, i)?,
                pair_cell(&df, col::PAIR, i)?,
                side_cell(&df, col::SIDE, i)?,
                decimal_cell(&df, col::NOTIONAL, i)?,
                limit_price,
            )?)
        })
        .collect()
}

fn load_hedge_fills(path: &Path) -> EngineResult<Vec<Event>> {
    let df = read_parquet(path)?;
    (0..df.height())
        .map(|i| {
            Ok(Event::hedge_fill(
                timestamp_cell(&df, col::TIMESTAMP, i)?,
                i64_cell(&df, col::SEQUENCE_ID, i)? as u64,
                str_cell(&df, col::ORDER_ID, i)?,
                pair_cell(&df, col::PAIR, i)?,
                side_cell(&df, col::SIDE, i)?,
                decimal_cell(&df, col::NOTIONAL, i)?,
                decimal_cell(&df, col::FILL_PRICE, i)?,
                decimal_cell(&df, col::SLIPPAGE, i)?,
            )?)
        })
        .collect()
}

fn load_clock_ticks(path: &Path) -> EngineResult<Vec<Event>> {
    let df = read_parquet(path)?;
    (0..df.height())
        .map(|i| {
            Ok(Event::clock_tick(
                timestamp_cell(&df, col::TIMESTAMP, i)?,
                i64_cell(&df, col::SEQUENCE_ID, i)? as u64,
                str_cell(&df, col::TICK_LABEL, i)?,
            )?)
        })
        .collect()
}

fn load_one(kind: EventKind, path: &Path) -> EngineResult<Vec<Event>> {
    match kind {
        EventKind::ClientTrade => load_client_trades(path),
        EventKind::MarketUpdate => load_market_updates(path),
        EventKind::ConfigUpdate => load_config_updates(path),
        EventKind::HedgeOrder => load_hedge_orders(path),
        EventKind::HedgeFill => load_hedge_fills(path),
        EventKind::ClockTick => load_clock_ticks(path),
    }
}

/// Loads every configured input file and merges the resulting events into a
/// single sequence in total order `(timestamp, sequence_id)`. A missing
/// `inputs.files` entry for a kind simply means no events of that kind are
/// replayed; an entry whose file is absent on disk is an error.
pub fn load_events(config: &SimConfig) -> EngineResult<Vec<Event>> {
    const KINDS: [EventKind; 6] = [
        EventKind::ClientTrade,
        EventKind::MarketUpdate,
        EventKind::ConfigUpdate,
        EventKind::HedgeOrder,
        EventKind::HedgeFill,
        EventKind::ClockTick,
    ];

    let mut events = Vec::new();
    for kind in KINDS {
        if let Some(path) = config.input_path(kind) {
            events.extend(load_one(kind, &path)?);
        }
    }
    events.sort();
    Ok(events)
}

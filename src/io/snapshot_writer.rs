//! Columnar snapshot writer (§4.J, §6): the `clock_tick` subset of the audit
//! trail, written out as Parquet for downstream analysis. Nested maps are
//! flattened to JSON strings, following the same `to_json_rows`-adjacent
//! house habit of keeping per-cell values self-describing in a single
//! column rather than exploding them into a wide, sparsely-populated frame.

use std::{fs::File, path::Path};

use polars::prelude::*;

use crate::{
    error::{EngineResult, IoError},
    io::schema::col,
    output::{OutputRecord, RecordPayload},
};

/// Writes every `clock_tick` record in `records` as a single Parquet file.
/// Non-`clock_tick` records are skipped. Produces an empty (zero-row) file
/// when no clock ticks are present.
pub fn write_snapshots(path: &Path, records: &[OutputRecord]) -> EngineResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(IoError::from)?;
    }

    let ticks: Vec<&OutputRecord> = records
        .iter()
        .filter(|r| matches!(r.payload, RecordPayload::ClockTick(_)))
        .collect();

    let mut timestamps = Vec::with_capacity(ticks.len());
    let mut tick_labels = Vec::with_capacity(ticks.len());
    let mut cash_balances = Vec::with_capacity(ticks.len());
    let mut positions = Vec::with_capacity(ticks.len());
    let mut exposures = Vec::with_capacity(ticks.len());
    let mut total_equities = Vec::with_capacity(ticks.len());
    let mut event_counts = Vec::with_capacity(ticks.len());
    let mut lot_trackings: Vec<Option<String>> = Vec::with_capacity(ticks.len());

    for record in &ticks {
        let RecordPayload::ClockTick(data) = &record.payload else {
            unreachable!("filtered to ClockTick above");
        };
        timestamps.push(record.timestamp.to_rfc3339());
        tick_labels.push(data.tick_label.clone());
        cash_balances.push(serde_json::to_string(&data.cash_balances).map_err(IoError::from)?);
        positions.push(serde_json::to_string(&data.positions).map_err(IoError::from)?);
        exposures.push(serde_json::to_string(&data.exposures).map_err(IoError::from)?);
        total_equities.push(data.total_equity.to_string());
        event_counts.push(data.event_count as i64);
        lot_trackings.push(match &data.lot_tracking {
            Some(snapshot) => Some(serde_json::to_string(snapshot).map_err(IoError::from)?),
            None => None,
        });
    }

    let mut df = df![
        col::TIMESTAMP => timestamps,
        col::TICK_LABEL => tick_labels,
        col::CASH_BALANCES => cash_balances,
        col::POSITIONS => positions,
        col::EXPOSURES => exposures,
        col::TOTAL_EQUITY => total_equities,
        col::EVENT_COUNT => event_counts,
        "lot_tracking" => lot_trackings,
    ]
    .map_err(IoError::from)?;

    let file = File::create(path).map_err(IoError::from)?;
    ParquetWriter::new(file).finish(&mut df).map_err(IoError::from)?;
    Ok(())
}

//! Lot-tracking sub-protocol (§4.H.1), triggered from the `ClientTrade`
//! handler whenever a `LotManager` is attached.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::{
    converter::Converter,
    decomposer::{self, Leg},
    lot::{LotConfig, LotManager},
    model::{CurrencyPair, Price, Quantity, Side},
    output::{LotCreatedData, LotMatchData, LotTrackingErrorData, OutputRecord, RecordPayload},
    state::EngineState,
};

#[allow(clippy::too_many_arguments)]
pub fn run(
    lot_manager: &mut LotManager,
    lot_config: &LotConfig,
    state: &EngineState,
    trade_pair: &CurrencyPair,
    client_side: Side,
    notional: Quantity,
    execution_price: Price,
    trade_id: &str,
    timestamp: DateTime<Utc>,
) -> Vec<OutputRecord> {
    if !lot_config.enabled {
        return Vec::new();
    }

    let converter = Converter::new(state);

    // 1. Decompose the client trade. On failure, emit an error record and stop.
    let legs = match decomposer::decompose(
        trade_pair,
        client_side,
        notional,
        execution_price,
        &lot_config.reporting_currency,
        &converter,
    ) {
        Ok(legs) => legs,
        Err(e) => {
            return vec![error_record(timestamp, trade_id, trade_pair, e.to_string())];
        }
    };

    // 2. Every distinct leg pair requires a cached market mid.
    let mut open_mids: HashMap<CurrencyPair, Price> = HashMap::new();
    for leg in &legs {
        match state.get_market_rate(&leg.risk_pair) {
            Some(rate) => {
                open_mids.insert(leg.risk_pair.clone(), rate.mid);
            }
            None => {
                return vec![error_record(
                    timestamp,
                    trade_id,
                    &leg.risk_pair,
                    format!("no cached market mid for {}", leg.risk_pair),
                )];
            }
        }
    }

    // 3. Process each leg in emission order.
    let mut records = Vec::new();
    for leg in &legs {
        records.extend(process_leg(lot_manager, leg, trade_id, timestamp, &open_mids));
    }
    records
}

fn process_leg(
    lot_manager: &mut LotManager,
    leg: &Leg,
    trade_id: &str,
    timestamp: DateTime<Utc>,
    open_mids: &HashMap<CurrencyPair, Price>,
) -> Vec<OutputRecord> {
    let net = lot_manager.get_net_position(&leg.risk_pair);
    let impact = match leg.side {
        Side::Buy => leg.quantity,
        Side::Sell => -leg.quantity,
    };
    // The leg reduces the position iff net and impact have opposite (nonzero)
    // signs. At net == 0 the leg is non-reducing: it opens a fresh lot.
    let reduces = (net > Decimal::ZERO && impact < Decimal::ZERO)
        || (net < Decimal::ZERO && impact > Decimal::ZERO);

    if reduces {
        reduce(lot_manager, leg, trade_id, timestamp, open_mids)
    } else {
        open_new_lot(lot_manager, leg, trade_id, timestamp, open_mids)
            .into_iter()
            .collect()
    }
}

fn reduce(
    lot_manager: &mut LotManager,
    leg: &Leg,
    trade_id: &str,
    timestamp: DateTime<Utc>,
    open_mids: &HashMap<CurrencyPair, Price>,
) -> Vec<OutputRecord> {
    let matches = match lot_manager.match_lots(&leg.risk_pair, leg.quantity, leg.side, leg.trade_price, timestamp)
    {
        Ok(m) => m,
        Err(e) => {
            return vec![error_record(timestamp, trade_id, &leg.risk_pair, e.to_string())];
        }
    };

    let mut records: Vec<OutputRecord> = matches
        .iter()
        .map(|m| {
            OutputRecord::new(
                timestamp,
                RecordPayload::LotMatch(LotMatchData::from(m)),
            )
        })
        .collect();

    let matched_total: Decimal = matches.iter().map(|m| m.matched_quantity).sum();
    let residual = leg.quantity - matched_total;

    // Crossing through zero via a single oversized leg: matches first, then
    // a residual lot opens on the *same* side as the incoming leg.
    if residual > Decimal::ZERO {
        let residual_leg = Leg {
            risk_pair: leg.risk_pair.clone(),
            side: leg.side,
            quantity: residual,
            trade_price: leg.trade_price,
            decomposition_path: leg.decomposition_path.clone(),
        };
        if let Some(record) = open_new_lot(lot_manager, &residual_leg, trade_id, timestamp, open_mids) {
            records.push(record);
        }
    }

    records
}

fn open_new_lot(
    lot_manager: &mut LotManager,
    leg: &Leg,
    trade_id: &str,
    timestamp: DateTime<Utc>,
    open_mids: &HashMap<CurrencyPair, Price>,
) -> Option<OutputRecord> {
    let lots = match decomposer::legs_to_lots(std::slice::from_ref(leg), trade_id, timestamp, open_mids) {
        Ok(lots) => lots,
        Err(e) => {
            return Some(error_record(timestamp, trade_id, &leg.risk_pair, e.to_string()));
        }
    };
    let lot = lots.into_iter().next()?;
    let data = LotCreatedData::from(&lot);
    match lot_manager.add_lot(lot) {
        Ok(()) => Some(OutputRecord::new(timestamp, RecordPayload::LotCreated(data))),
        Err(e) => Some(error_record(timestamp, trade_id, &leg.risk_pair, e.to_string())),
    }
}

fn error_record(
    timestamp: DateTime<Utc>,
    trade_id: &str,
    pair: &CurrencyPair,
    reason: String,
) -> OutputRecord {
    OutputRecord::new(
        timestamp,
        RecordPayload::LotTrackingError(LotTrackingErrorData {
            trade_id: trade_id.to_string(),
            pair: pair.to_string(),
            reason,
        }),
    )
}

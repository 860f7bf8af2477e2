//! Audit-log output records (§6 "Output record types").
//!
//! Every handler invocation appends zero or more [`OutputRecord`]s in
//! handler-emission order. The audit writer serializes each one as a single
//! line of newline-delimited JSON: `{timestamp, record_type, data}`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer, ser::SerializeStruct};

use crate::lot::{Lot, LotMatch};

#[derive(Debug, Clone, Serialize)]
pub struct ClientTradeData {
    pub pair: String,
    pub side: String,
    pub notional: Decimal,
    pub price: Decimal,
    pub client_id: String,
    pub trade_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarketUpdateData {
    pub pair: String,
    pub bid: Decimal,
    pub ask: Decimal,
    pub mid: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigUpdateData {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HedgeOrderData {
    pub order_id: String,
    pub pair: String,
    pub side: String,
    pub notional: Decimal,
    pub limit_price: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HedgeFillData {
    pub order_id: String,
    pub pair: String,
    pub side: String,
    pub notional: Decimal,
    pub fill_price: Decimal,
    pub slippage: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct LotTrackingSnapshot {
    pub total_open_lots: usize,
    pub total_closed_lots: usize,
    pub total_unrealized_pnl: Decimal,
    pub net_positions: std::collections::BTreeMap<String, Decimal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClockTickData {
    pub tick_label: String,
    pub cash_balances: std::collections::BTreeMap<String, Decimal>,
    pub positions: std::collections::BTreeMap<String, Decimal>,
    pub exposures: std::collections::BTreeMap<String, Decimal>,
    pub total_equity: Decimal,
    pub event_count: u64,
    pub lot_tracking: Option<LotTrackingSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LotCreatedData {
    pub lot_id: String,
    pub risk_pair: String,
    pub side: String,
    pub quantity: Decimal,
    pub original_quantity: Decimal,
    pub trade_price: Decimal,
    pub originating_trade_id: String,
    pub decomposition_path: String,
    pub open_mid: Decimal,
}

impl From<&Lot> for LotCreatedData {
    fn from(lot: &Lot) -> Self {
        Self {
            lot_id: lot.lot_id.clone(),
            risk_pair: lot.risk_pair.to_string(),
            side: lot.side.to_string(),
            quantity: lot.quantity,
            original_quantity: lot.original_quantity,
            trade_price: lot.trade_price,
            originating_trade_id: lot.originating_trade_id.clone(),
            decomposition_path: lot.decomposition_path.clone(),
            open_mid: lot.open_mid,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LotMatchData {
    pub lot_id: String,
    pub risk_pair: String,
    pub matched_quantity: Decimal,
    pub remaining_quantity: Decimal,
    pub lot_closed: bool,
    pub realized_pnl: Decimal,
    pub close_price: Decimal,
}

impl From<&LotMatch> for LotMatchData {
    fn from(m: &LotMatch) -> Self {
        Self {
            lot_id: m.lot.lot_id.clone(),
            risk_pair: m.lot.risk_pair.to_string(),
            matched_quantity: m.matched_quantity,
            remaining_quantity: m.remaining_lot.as_ref().map(|l| l.quantity).unwrap_or(Decimal::ZERO),
            lot_closed: m.remaining_lot.is_none(),
            realized_pnl: m.realized_pnl,
            close_price: m.close_price,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LotTrackingErrorData {
    pub trade_id: String,
    pub pair: String,
    pub reason: String,
}

/// The variant of data carried by an [`OutputRecord`]. Tagless: the
/// discriminant is surfaced separately as `record_type` by `OutputRecord`'s
/// custom `Serialize` impl, matching the `{timestamp, record_type, data}`
/// shape the audit-log format requires.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RecordPayload {
    ClientTrade(ClientTradeData),
    MarketUpdate(MarketUpdateData),
    ConfigUpdate(ConfigUpdateData),
    HedgeOrder(HedgeOrderData),
    HedgeFill(HedgeFillData),
    ClockTick(ClockTickData),
    LotCreated(LotCreatedData),
    LotMatch(LotMatchData),
    LotTrackingError(LotTrackingErrorData),
}

impl RecordPayload {
    pub fn record_type(&self) -> &'static str {
        match self {
            RecordPayload::ClientTrade(_) => "client_trade",
            RecordPayload::MarketUpdate(_) => "market_update",
            RecordPayload::ConfigUpdate(_) => "config_update",
            RecordPayload::HedgeOrder(_) => "hedge_order",
            RecordPayload::HedgeFill(_) => "hedge_fill",
            RecordPayload::ClockTick(_) => "clock_tick",
            RecordPayload::LotCreated(_) => "lot_created",
            RecordPayload::LotMatch(_) => "lot_match",
            RecordPayload::LotTrackingError(_) => "lot_tracking_error",
        }
    }
}

/// One line of the append-only audit record of every handled event.
#[derive(Debug, Clone)]
pub struct OutputRecord {
    pub timestamp: DateTime<Utc>,
    pub payload: RecordPayload,
}

impl OutputRecord {
    pub fn new(timestamp: DateTime<Utc>, payload: RecordPayload) -> Self {
        Self { timestamp, payload }
    }

    pub fn record_type(&self) -> &'static str {
        self.payload.record_type()
    }
}

impl Serialize for OutputRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut s = serializer.serialize_struct("OutputRecord", 3)?;
        s.serialize_field("timestamp", &self.timestamp.to_rfc3339())?;
        s.serialize_field("record_type", self.payload.record_type())?;
        s.serialize_field("data", &self.payload)?;
        s.end()
    }
}

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{
    error::EventError,
    model::{
        market_rate::MarketRate,
        money::{Price, Quantity},
        pair::CurrencyPair,
        side::Side,
    },
};

/// Dispatch tag, also used as the input-file / config identifier for each
/// event kind (`inputs.files` keys, CLI sample-data output).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    ClientTrade,
    MarketUpdate,
    ConfigUpdate,
    HedgeOrder,
    HedgeFill,
    ClockTick,
}

/// A single client trade, stated from the client's perspective. The desk's
/// side is always `side.opposite()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientTrade {
    pub pair: CurrencyPair,
    pub side: Side,
    pub notional: Quantity,
    pub price: Price,
    pub client_id: String,
    pub trade_id: String,
}

/// A market-data tick refreshing the cached rate for `pair`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketUpdate {
    pub pair: CurrencyPair,
    pub bid: Decimal,
    pub ask: Decimal,
    pub mid: Decimal,
}

/// A configuration change applied mid-run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigUpdate {
    pub key: String,
    pub value: String,
}

/// A hedge intent. Recorded for audit only — no order-matching engine exists
/// in this system; the desk never actually routes this order anywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HedgeOrder {
    pub order_id: String,
    pub pair: CurrencyPair,
    pub side: Side,
    pub notional: Quantity,
    pub limit_price: Option<Price>,
}

/// A hedge fill, ingested as a fact — accounted for exactly like a client
/// trade from the desk's perspective, plus slippage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HedgeFill {
    pub order_id: String,
    pub pair: CurrencyPair,
    pub side: Side,
    pub notional: Quantity,
    pub fill_price: Price,
    pub slippage: Decimal,
}

/// A clock advance triggering a desk-state snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockTick {
    pub tick_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum EventPayload {
    ClientTrade(ClientTrade),
    MarketUpdate(MarketUpdate),
    ConfigUpdate(ConfigUpdate),
    HedgeOrder(HedgeOrder),
    HedgeFill(HedgeFill),
    ClockTick(ClockTick),
}

impl EventPayload {
    pub fn kind(&self) -> EventKind {
        match self {
            EventPayload::ClientTrade(_) => EventKind::ClientTrade,
            EventPayload::MarketUpdate(_) => EventKind::MarketUpdate,
            EventPayload::ConfigUpdate(_) => EventKind::ConfigUpdate,
            EventPayload::HedgeOrder(_) => EventKind::HedgeOrder,
            EventPayload::HedgeFill(_) => EventKind::HedgeFill,
            EventPayload::ClockTick(_) => EventKind::ClockTick,
        }
    }
}

/// An immutable, validated, totally-ordered event record. Total order is
/// lexicographic `(timestamp, sequence_id)`; the producer is responsible for
/// assigning unique `sequence_id`s within a timestamp so ties never occur.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub timestamp: DateTime<Utc>,
    pub sequence_id: u64,
    pub payload: EventPayload,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        self.payload.kind()
    }

    pub fn client_trade(
        timestamp: DateTime<Utc>,
        sequence_id: u64,
        pair: CurrencyPair,
        side: Side,
        notional: Quantity,
        price: Price,
        client_id: impl Into<String>,
        trade_id: impl Into<String>,
    ) -> Result<Self, EventError> {
        if notional <= Decimal::ZERO {
            return Err(EventError::InvalidEvent(format!(
                "client trade notional must be positive, got {notional}"
            )));
        }
        if price <= Decimal::ZERO {
            return Err(EventError::InvalidEvent(format!(
                "client trade price must be positive, got {price}"
            )));
        }
        Ok(Self {
            timestamp,
            sequence_id,
            payload: EventPayload::ClientTrade(ClientTrade {
                pair,
                side,
                notional,
                price,
                client_id: client_id.into(),
                trade_id: trade_id.into(),
            }),
        })
    }

    pub fn market_update(
        timestamp: DateTime<Utc>,
        sequence_id: u64,
        pair: CurrencyPair,
        bid: Decimal,
        ask: Decimal,
        mid: Decimal,
    ) -> Result<Self, EventError> {
        // Validate via MarketRate's invariant (strict bid < ask), matching the
        // "subject to MarketRate invariant, strict" requirement on this event.
        MarketRate::new(bid, ask, mid)?;
        Ok(Self {
            timestamp,
            sequence_id,
            payload: EventPayload::MarketUpdate(MarketUpdate {
                pair,
                bid,
                ask,
                mid,
            }),
        })
    }

    pub fn config_update(
        timestamp: DateTime<Utc>,
        sequence_id: u64,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, EventError> {
        let key = key.into();
        if key.is_empty() {
            return Err(EventError::InvalidEvent(
                "config update key must not be empty".into(),
            ));
        }
        Ok(Self {
            timestamp,
            sequence_id,
            payload: EventPayload::ConfigUpdate(ConfigUpdate {
                key,
                value: value.into(),
            }),
        })
    }

    pub fn hedge_order(
        timestamp: DateTime<Utc>,
        sequence_id: u64,
        order_id: impl Into<String>,
        pair: CurrencyPair,
        side: Side,
        notional: Quantity,
        limit_price: Option<Price>,
    ) -> Result<Self, EventError> {
        if notional <= Decimal::ZERO {
            return Err(EventError::InvalidEvent(format!(
                "hedge order notional must be positive, got {notional}"
            )));
        }
        if let Some(p) = limit_price {
            if p <= Decimal::ZERO {
                return Err(EventError::InvalidEvent(format!(
                    "hedge order limit price must be positive when present, got {p}"
                )));
            }
        }
        Ok(Self {
            timestamp,
            sequence_id,
            payload: EventPayload::HedgeOrder(HedgeOrder {
                order_id: order_id.into(),
                pair,
                side,
                notional,
                limit_price,
            }),
        })
    }

    pub fn hedge_fill(
        timestamp: DateTime<Utc>,
        sequence_id: u64,
        order_id: impl Into<String>,
        pair: CurrencyPair,
        side: Side,
        notional: Quantity,
        fill_price: Price,
        slippage: Decimal,
    ) -> Result<Self, EventError> {
        if notional <= Decimal::ZERO {
            return Err(EventError::InvalidEvent(format!(
                "hedge fill notional must be positive, got {notional}"
            )));
        }
        if fill_price <= Decimal::ZERO {
            return Err(EventError::InvalidEvent(format!(
                "hedge fill price must be positive, got {fill_price}"
            )));
        }
        if slippage < Decimal::ZERO {
            return Err(EventError::InvalidEvent(format!(
                "hedge fill slippage must be non-negative, got {slippage}"
            )));
        }
        Ok(Self {
            timestamp,
            sequence_id,
            payload: EventPayload::HedgeFill(HedgeFill {
                order_id: order_id.into(),
                pair,
                side,
                notional,
                fill_price,
                slippage,
            }),
        })
    }

    pub fn clock_tick(
        timestamp: DateTime<Utc>,
        sequence_id: u64,
        tick_label: impl Into<String>,
    ) -> Result<Self, EventError> {
        let tick_label = tick_label.into();
        if tick_label.is_empty() {
            return Err(EventError::InvalidEvent(
                "clock tick label must not be empty".into(),
            ));
        }
        Ok(Self {
            timestamp,
            sequence_id,
            payload: EventPayload::ClockTick(ClockTick { tick_label }),
        })
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Eq for Event {}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.timestamp, self.sequence_id).cmp(&(other.timestamp, other.sequence_id))
    }
}

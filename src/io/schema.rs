//! Canonical column-name vocabulary for the per-event-kind columnar input
//! files and the snapshot output file, mirroring the pattern used elsewhere
//! in the house codebase for naming DataFrame columns.

pub mod col {
    pub const TIMESTAMP: &str = "timestamp";
    pub const SEQUENCE_ID: &str = "sequence_id";
    pub const PAIR: &str = "pair";
    pub const SIDE: &str = "side";
    pub const NOTIONAL: &str = "notional";
    pub const PRICE: &str = "price";
    pub const CLIENT_ID: &str = "client_id";
    pub const TRADE_ID: &str = "trade_id";
    pub const BID: &str = "bid";
    pub const ASK: &str = "ask";
    pub const MID: &str = "mid";
    pub const KEY: &str = "key";
    pub const VALUE: &str = "value";
    pub const ORDER_ID: &str = "order_id";
    pub const LIMIT_PRICE: &str = "limit_price";
    pub const FILL_PRICE: &str = "fill_price";
    pub const SLIPPAGE: &str = "slippage";
    pub const TICK_LABEL: &str = "tick_label";

    // Snapshot (clock_tick) output columns.
    pub const RECORD_TYPE: &str = "record_type";
    pub const CASH_BALANCES: &str = "cash_balances";
    pub const POSITIONS: &str = "positions";
    pub const EXPOSURES: &str = "exposures";
    pub const TOTAL_EQUITY: &str = "total_equity";
    pub const EVENT_COUNT: &str = "event_count";
}

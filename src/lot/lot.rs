use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    error::LotInvariantError,
    model::{CurrencyPair, Money, Price, Quantity, Side},
};

/// A single position entry opened by one leg of one trade — the unit of
/// match-and-close bookkeeping. Immutable: every mutation is expressed as
/// producing a new `Lot`, never an in-place edit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lot {
    pub lot_id: String,
    pub risk_pair: CurrencyPair,
    pub side: Side,
    pub quantity: Quantity,
    pub original_quantity: Quantity,
    pub trade_price: Price,
    pub open_timestamp: DateTime<Utc>,
    pub originating_trade_id: String,
    pub decomposition_path: String,
    pub open_mid: Price,
    pub close_timestamp: Option<DateTime<Utc>>,
    pub close_mid: Option<Price>,
}

impl Lot {
    #[allow(clippy::too_many_arguments)]
    pub fn open(
        lot_id: impl Into<String>,
        risk_pair: CurrencyPair,
        side: Side,
        original_quantity: Quantity,
        trade_price: Price,
        open_timestamp: DateTime<Utc>,
        originating_trade_id: impl Into<String>,
        decomposition_path: impl Into<String>,
        open_mid: Price,
    ) -> Result<Self, LotInvariantError> {
        if original_quantity <= Decimal::ZERO {
            return Err(LotInvariantError::NonPositiveQuantity(
                original_quantity.to_string(),
            ));
        }
        Ok(Self {
            lot_id: lot_id.into(),
            risk_pair,
            side,
            quantity: original_quantity,
            original_quantity,
            trade_price,
            open_timestamp,
            originating_trade_id: originating_trade_id.into(),
            decomposition_path: decomposition_path.into(),
            open_mid,
            close_timestamp: None,
            close_mid: None,
        })
    }

    pub fn is_closed(&self) -> bool {
        self.quantity == Decimal::ZERO
    }

    /// Returns a new lot with `quantity` reduced by `delta` (`0 < delta <=
    /// quantity`).
    pub fn reduce_quantity(&self, delta: Quantity) -> Result<Self, LotInvariantError> {
        if delta <= Decimal::ZERO {
            return Err(LotInvariantError::NonPositiveQuantity(delta.to_string()));
        }
        if delta > self.quantity {
            return Err(LotInvariantError::OverReduction {
                lot_id: self.lot_id.clone(),
                delta: delta.to_string(),
                quantity: self.quantity.to_string(),
            });
        }
        let mut next = self.clone();
        next.quantity -= delta;
        Ok(next)
    }

    /// Returns a new lot with `close_timestamp`/`close_mid` populated. Used
    /// together with a reduction to zero quantity.
    pub fn close(&self, timestamp: DateTime<Utc>, close_mid: Price) -> Self {
        let mut next = self.clone();
        next.close_timestamp = Some(timestamp);
        next.close_mid = Some(close_mid);
        next
    }

    /// `0` if closed; else `(current_mid - trade_price) * quantity * dir`.
    pub fn compute_unrealized_pnl(&self, current_mid: Price) -> Money {
        if self.is_closed() {
            return Decimal::ZERO;
        }
        (current_mid - self.trade_price) * self.quantity * Decimal::from(self.side.direction())
    }

    /// `(close_price - trade_price) * qty_closed * dir`, with `0 <
    /// qty_closed <= original_quantity`.
    pub fn compute_realized_pnl(
        &self,
        qty_closed: Quantity,
        close_price: Price,
    ) -> Result<Money, LotInvariantError> {
        if qty_closed <= Decimal::ZERO || qty_closed > self.original_quantity {
            return Err(LotInvariantError::InvalidClosedQuantity(
                qty_closed.to_string(),
            ));
        }
        Ok((close_price - self.trade_price) * qty_closed * Decimal::from(self.side.direction()))
    }
}

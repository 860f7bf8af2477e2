use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    error::LotInvariantError,
    lot::lot::Lot,
    model::{CurrencyPair, Money, Price, Quantity, Side},
};

/// The result of matching one incoming leg against a single pre-existing
/// open lot. References the pre-match lot (read-only); consumers must not
/// treat this as a handle into the queue's own storage.
#[derive(Debug, Clone, Serialize)]
pub struct LotMatch {
    pub lot: Lot,
    pub matched_quantity: Quantity,
    pub remaining_lot: Option<Lot>,
    pub realized_pnl: Money,
    pub close_price: Price,
    pub close_timestamp: DateTime<Utc>,
}

/// Per-risk-pair ordered sequence of open lots (FIFO by `add_lot` arrival
/// order), plus an append-only list of closed lots for auditability.
#[derive(Debug, Clone)]
pub struct LotQueue {
    risk_pair: CurrencyPair,
    open: Vec<Lot>,
    closed: Vec<Lot>,
}

impl LotQueue {
    pub fn new(risk_pair: CurrencyPair) -> Self {
        Self {
            risk_pair,
            open: Vec::new(),
            closed: Vec::new(),
        }
    }

    pub fn risk_pair(&self) -> &CurrencyPair {
        &self.risk_pair
    }

    pub fn open_lots(&self) -> &[Lot] {
        &self.open
    }

    pub fn closed_lots(&self) -> &[Lot] {
        &self.closed
    }

    pub fn add_lot(&mut self, lot: Lot) -> Result<(), LotInvariantError> {
        if lot.risk_pair != self.risk_pair {
            return Err(LotInvariantError::UnconfiguredPair(lot.risk_pair.to_string()));
        }
        if lot.quantity <= Decimal::ZERO {
            return Err(LotInvariantError::NonPositiveQuantity(lot.quantity.to_string()));
        }
        self.open.push(lot);
        Ok(())
    }

    /// Signed net position: sum of BUY-lot quantity minus sum of SELL-lot
    /// quantity, over currently open lots.
    pub fn net_position(&self) -> Quantity {
        self.open.iter().fold(Decimal::ZERO, |acc, lot| {
            acc + lot.quantity * Decimal::from(lot.side.direction())
        })
    }

    /// FIFO-matches `quantity` of `incoming_side` against open lots on the
    /// opposite side, closing fully consumed lots and reducing partially
    /// consumed ones, in arrival order. Same-side lots are never touched.
    /// Any unmatched residual of `quantity` is the caller's concern.
    pub fn match_lots(
        &mut self,
        quantity: Quantity,
        incoming_side: Side,
        close_price: Price,
        close_timestamp: DateTime<Utc>,
    ) -> Result<Vec<LotMatch>, LotInvariantError> {
        if quantity <= Decimal::ZERO {
            return Err(LotInvariantError::NonPositiveQuantity(quantity.to_string()));
        }
        let opposite = incoming_side.opposite();
        let mut remaining = quantity;
        let mut matches = Vec::new();
        let mut retained = Vec::with_capacity(self.open.len());

        for lot in self.open.drain(..) {
            if remaining <= Decimal::ZERO || lot.side != opposite {
                retained.push(lot);
                continue;
            }

            let matched_qty = matched_quantity(lot.quantity, remaining);
            let realized_pnl = lot.compute_realized_pnl(matched_qty, close_price)?;

            let remaining_lot = if matched_qty == lot.quantity {
                let closed = lot.reduce_quantity(matched_qty)?.close(close_timestamp, close_price);
                self.closed.push(closed);
                None
            } else {
                let reduced = lot.reduce_quantity(matched_qty)?;
                retained.push(reduced.clone());
                Some(reduced)
            };

            matches.push(LotMatch {
                lot,
                matched_quantity: matched_qty,
                remaining_lot,
                realized_pnl,
                close_price,
                close_timestamp,
            });

            remaining -= matched_qty;
        }

        self.open = retained;
        Ok(matches)
    }
}

fn matched_quantity(lot_quantity: Decimal, remaining: Decimal) -> Decimal {
    lot_quantity.min(remaining)
}

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EventError;

/// A cached bid/ask/mid quote. Invariant: `0 < bid < ask` and `bid <= mid <=
/// ask` at construction (the event layer enforces the strict inequality on
/// bid/ask; zero-spread ticks are rejected here, not merely discouraged).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketRate {
    pub bid: Decimal,
    pub ask: Decimal,
    pub mid: Decimal,
}

impl MarketRate {
    pub fn new(bid: Decimal, ask: Decimal, mid: Decimal) -> Result<Self, EventError> {
        if bid <= Decimal::ZERO {
            return Err(EventError::InvalidEvent(format!(
                "market rate bid must be positive, got {bid}"
            )));
        }
        if bid >= ask {
            return Err(EventError::InvalidEvent(format!(
                "market rate requires bid < ask, got bid={bid} ask={ask}"
            )));
        }
        if mid < bid || mid > ask {
            return Err(EventError::InvalidEvent(format!(
                "market rate mid {mid} must lie within [bid={bid}, ask={ask}]"
            )));
        }
        Ok(Self { bid, ask, mid })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rejects_equal_bid_ask() {
        assert!(MarketRate::new(dec!(1.1), dec!(1.1), dec!(1.1)).is_err());
    }

    #[test]
    fn rejects_mid_outside_spread() {
        assert!(MarketRate::new(dec!(1.0), dec!(1.1), dec!(1.2)).is_err());
    }

    #[test]
    fn accepts_valid_quote() {
        let r = MarketRate::new(dec!(1.0995), dec!(1.1005), dec!(1.1000)).unwrap();
        assert_eq!(r.mid, dec!(1.1000));
    }
}

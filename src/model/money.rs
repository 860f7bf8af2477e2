use rust_decimal::Decimal;

/// A price quoted in a pair's quote currency (e.g. 1.1000 for EUR/USD).
pub type Price = Decimal;

/// A base-currency notional amount.
pub type Quantity = Decimal;

/// A currency-denominated cash amount (balance, delta, or P&L).
pub type Money = Decimal;

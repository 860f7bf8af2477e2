pub mod currency;
pub mod event;
pub mod market_rate;
pub mod money;
pub mod pair;
pub mod side;

pub use currency::Currency;
pub use event::{Event, EventKind, EventPayload};
pub use market_rate::MarketRate;
pub use money::{Money, Price, Quantity};
pub use pair::CurrencyPair;
pub use side::Side;

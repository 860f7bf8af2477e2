use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Trade direction, always stated from the *client*'s perspective. The desk's
/// side for the same leg is always the opposite.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// +1 for BUY, -1 for SELL — the directional multiplier used throughout
    /// the P&L formulas.
    pub fn direction(self) -> i32 {
        match self {
            Side::Buy => 1,
            Side::Sell => -1,
        }
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EventError;

/// A short uppercase currency symbol, e.g. `EUR`, `USD`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    pub fn new(symbol: impl Into<String>) -> Result<Self, EventError> {
        let symbol = symbol.into();
        if symbol.is_empty() {
            return Err(EventError::InvalidEvent(
                "currency symbol must not be empty".into(),
            ));
        }
        if !symbol.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(EventError::InvalidEvent(format!(
                "currency symbol '{symbol}' must be all ASCII uppercase"
            )));
        }
        Ok(Self(symbol))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Currency {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::new(s)
    }
}

use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, model::{Currency, CurrencyPair}};

/// Configuration for the lot-tracking subsystem: which risk pairs carry a
/// `LotQueue`, which trade/hedge pairs feed into it, and the matching rule
/// (only `"FIFO"` is implemented).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LotConfig {
    pub enabled: bool,
    #[serde(default = "default_matching_rule")]
    pub matching_rule: String,
    pub risk_pairs: Vec<CurrencyPair>,
    #[serde(default)]
    pub trade_pairs: Vec<CurrencyPair>,
    #[serde(default)]
    pub hedge_pairs: Vec<CurrencyPair>,
    pub reporting_currency: Currency,
}

fn default_matching_rule() -> String {
    "FIFO".to_string()
}

impl LotConfig {
    /// Validates that every configured risk pair quotes the reporting
    /// currency, and that the matching rule is the only one implemented.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.matching_rule != "FIFO" {
            return Err(ConfigError::Invalid(format!(
                "unsupported lot matching rule '{}': only FIFO is implemented",
                self.matching_rule
            )));
        }
        for pair in &self.risk_pairs {
            if !pair.is_direct(&self.reporting_currency) {
                return Err(ConfigError::Invalid(format!(
                    "configured risk pair {pair} does not quote reporting currency {}",
                    self.reporting_currency
                )));
            }
        }
        Ok(())
    }
}

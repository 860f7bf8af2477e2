use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::{
    error::LotInvariantError,
    lot::{
        lot::Lot,
        lot_config::LotConfig,
        lot_queue::{LotMatch, LotQueue},
    },
    model::{CurrencyPair, Money, Price, Quantity, Side},
};

/// `risk_pair -> LotQueue` orchestrator over the configured set of risk
/// pairs. Mutated in place by handlers, per design note (b): the engine's
/// `EngineState` is persistent, but the lot manager is a single owned
/// mutable instance reachable from the processor.
#[derive(Debug, Clone)]
pub struct LotManager {
    queues: HashMap<CurrencyPair, LotQueue>,
}

impl LotManager {
    pub fn new(config: &LotConfig) -> Self {
        let queues = config
            .risk_pairs
            .iter()
            .cloned()
            .map(|pair| (pair.clone(), LotQueue::new(pair)))
            .collect();
        Self { queues }
    }

    pub fn is_configured(&self, pair: &CurrencyPair) -> bool {
        self.queues.contains_key(pair)
    }

    pub fn add_lot(&mut self, lot: Lot) -> Result<(), LotInvariantError> {
        let queue = self
            .queues
            .get_mut(&lot.risk_pair)
            .ok_or_else(|| LotInvariantError::UnconfiguredPair(lot.risk_pair.to_string()))?;
        queue.add_lot(lot)
    }

    pub fn match_lots(
        &mut self,
        pair: &CurrencyPair,
        quantity: Quantity,
        side: Side,
        price: Price,
        timestamp: DateTime<Utc>,
    ) -> Result<Vec<LotMatch>, LotInvariantError> {
        let queue = self
            .queues
            .get_mut(pair)
            .ok_or_else(|| LotInvariantError::UnconfiguredPair(pair.to_string()))?;
        queue.match_lots(quantity, side, price, timestamp)
    }

    pub fn get_net_position(&self, pair: &CurrencyPair) -> Quantity {
        self.queues
            .get(pair)
            .map(LotQueue::net_position)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn get_all_net_positions(&self) -> HashMap<CurrencyPair, Quantity> {
        self.queues
            .iter()
            .map(|(pair, queue)| (pair.clone(), queue.net_position()))
            .collect()
    }

    pub fn total_open_lots(&self) -> usize {
        self.queues.values().map(|q| q.open_lots().len()).sum()
    }

    pub fn total_closed_lots(&self) -> usize {
        self.queues.values().map(|q| q.closed_lots().len()).sum()
    }

    pub fn queue(&self, pair: &CurrencyPair) -> Option<&LotQueue> {
        self.queues.get(pair)
    }

    pub fn queues(&self) -> &HashMap<CurrencyPair, LotQueue> {
        &self.queues
    }

    /// Sums unrealized P&L over pairs for which `market_mids` has an entry;
    /// pairs without a cached mid contribute zero.
    pub fn compute_total_unrealized_pnl(
        &self,
        market_mids: &HashMap<CurrencyPair, Price>,
    ) -> Money {
        self.queues
            .iter()
            .filter_map(|(pair, queue)| {
                market_mids.get(pair).map(|&mid| {
                    queue
                        .open_lots()
                        .iter()
                        .map(|lot| lot.compute_unrealized_pnl(mid))
                        .sum::<Money>()
                })
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn config() -> LotConfig {
        LotConfig {
            enabled: true,
            matching_rule: "FIFO".into(),
            risk_pairs: vec!["EUR/USD".parse().unwrap()],
            trade_pairs: vec![],
            hedge_pairs: vec![],
            reporting_currency: crate::model::Currency::new("USD").unwrap(),
        }
    }

    #[test]
    fn rejects_unconfigured_pair() {
        let mut mgr = LotManager::new(&config());
        let lot = Lot::open(
            "T1_GBP/USD",
            "GBP/USD".parse().unwrap(),
            Side::Buy,
            dec!(100),
            dec!(1.3),
            Utc::now(),
            "T1",
            "GBP/USD",
            dec!(1.3),
        )
        .unwrap();
        assert!(mgr.add_lot(lot).is_err());
    }

    #[test]
    fn net_position_reflects_open_lots() {
        let mut mgr = LotManager::new(&config());
        let lot = Lot::open(
            "T1_EUR/USD",
            "EUR/USD".parse().unwrap(),
            Side::Buy,
            dec!(1_000_000),
            dec!(1.10),
            Utc::now(),
            "T1",
            "EUR/USD",
            dec!(1.10),
        )
        .unwrap();
        mgr.add_lot(lot).unwrap();
        assert_eq!(mgr.get_net_position(&"EUR/USD".parse().unwrap()), dec!(1_000_000));
    }

    #[test]
    fn total_closed_lots_counts_fully_matched_lots_across_queues() {
        let mut mgr = LotManager::new(&config());
        let pair: CurrencyPair = "EUR/USD".parse().unwrap();
        let lot = Lot::open("T1_EUR/USD", pair.clone(), Side::Buy, dec!(100), dec!(1.10), Utc::now(), "T1", "EUR/USD", dec!(1.10)).unwrap();
        mgr.add_lot(lot).unwrap();
        assert_eq!(mgr.total_open_lots(), 1);
        assert_eq!(mgr.total_closed_lots(), 0);

        mgr.match_lots(&pair, dec!(100), Side::Sell, dec!(1.15), Utc::now()).unwrap();
        assert_eq!(mgr.total_open_lots(), 0);
        assert_eq!(mgr.total_closed_lots(), 1);
    }
}

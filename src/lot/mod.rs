pub mod lot;
pub mod lot_config;
pub mod lot_manager;
pub mod lot_queue;

pub use lot::Lot;
pub use lot_config::LotConfig;
pub use lot_manager::LotManager;
pub use lot_queue::{LotMatch, LotQueue};

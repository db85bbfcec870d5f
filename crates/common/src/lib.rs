pub mod config;
pub mod error;
pub mod gateway;
pub mod notify;
pub mod outcome;
pub mod types;

pub use config::{Config, TradingConfig};
pub use error::{Error, Result};
pub use gateway::{Clock, MarketGateway, Notifier, SystemClock, TradeJournal};
pub use notify::LogNotifier;
pub use outcome::TradeOutcome;
pub use types::*;

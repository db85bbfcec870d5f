use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::{Action, Candle, OrderRequest, Result, TradeRecord};

/// Market-data and order-execution gateway.
///
/// `BrokerClient` implements this against the broker bridge.
/// `PaperClient` implements this for simulation.
///
/// Only the trade executor in `crates/engine` calls `submit_order`, and it
/// normalizes the raw result into a `TradeOutcome` immediately.
#[async_trait]
pub trait MarketGateway: Send + Sync {
    /// Fetch the most recent `lookback` candles, oldest first.
    async fn get_candles(&self, pair: &str, interval_secs: u64, lookback: usize)
        -> Result<Vec<Candle>>;

    /// Place a fixed-expiry order. The returned value is whatever shape the
    /// broker produced; callers must normalize it.
    async fn submit_order(&self, order: &OrderRequest) -> Result<Value>;
}

/// Outbound chat channel. Failures are logged by callers and never abort a cycle.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify_open(
        &self,
        pair: &str,
        action: Action,
        strategy: &str,
        timeframe_secs: u64,
        stake: f64,
    ) -> Result<()>;

    /// Returns the id of the sent message so feedback replies can be matched.
    async fn notify_close(&self, pair: &str, profit: f64, is_win: bool) -> Result<Option<i32>>;

    /// Ask the operator for feedback on the last trade.
    async fn request_feedback(&self) -> Result<Option<i32>>;

    /// Report a failure that did not stop the trading loop.
    async fn notify_error(&self, message: &str) -> Result<()>;
}

/// Write-only trade journal.
#[async_trait]
pub trait TradeJournal: Send + Sync {
    async fn save_trade(&self, record: &TradeRecord) -> Result<()>;

    /// Attach operator feedback to the trade whose notification has
    /// `message_id`. Returns false when no trade matched.
    async fn add_feedback(&self, message_id: i32, text: &str, image: Option<&str>)
        -> Result<bool>;
}

/// Source of the current time. Lets tests drive the trade gate deterministically.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

use async_trait::async_trait;
use tracing::info;

use crate::{Action, Notifier, Result};

/// Notifier used when no chat channel is configured. Writes to the log only.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify_open(
        &self,
        pair: &str,
        action: Action,
        strategy: &str,
        timeframe_secs: u64,
        stake: f64,
    ) -> Result<()> {
        info!(pair, %action, strategy, timeframe_secs, stake, "Trade opened");
        Ok(())
    }

    async fn notify_close(&self, pair: &str, profit: f64, is_win: bool) -> Result<Option<i32>> {
        info!(pair, profit, is_win, "Trade closed");
        Ok(None)
    }

    async fn request_feedback(&self) -> Result<Option<i32>> {
        Ok(None)
    }

    async fn notify_error(&self, message: &str) -> Result<()> {
        info!(message, "Error notification (no chat channel configured)");
        Ok(())
    }
}

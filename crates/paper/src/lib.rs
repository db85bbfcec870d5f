use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, info};

use common::{Action, Candle, Error, MarketGateway, OrderRequest, Result};

/// Candles requested when only the latest close is needed.
const PRICE_LOOKBACK: usize = 2;

/// Simulated binary-option gateway for paper trading.
///
/// Candles come from the wrapped source. Orders never leave the process: the
/// open price is the latest close at submission, the close price is the
/// latest close once the expiry has elapsed.
pub struct PaperClient {
    source: Arc<dyn MarketGateway>,
    interval_secs: u64,
    /// Fraction of the stake paid on a win, e.g. 0.92.
    payout_pct: f64,
}

impl PaperClient {
    pub fn new(source: Arc<dyn MarketGateway>, interval_secs: u64, payout_pct: f64) -> Self {
        info!(payout_pct, "PaperClient initialized");
        Self {
            source,
            interval_secs,
            payout_pct,
        }
    }

    async fn last_close(&self, pair: &str) -> Result<f64> {
        let candles = self
            .source
            .get_candles(pair, self.interval_secs, PRICE_LOOKBACK)
            .await?;
        candles
            .last()
            .map(|c| c.close)
            .ok_or_else(|| Error::Gateway(format!("PaperClient has no price for '{pair}'")))
    }

    /// Settle at `close` an order opened at `open`.
    fn settle(&self, order: &OrderRequest, open: f64, close: f64) -> (&'static str, f64) {
        let won = match order.action {
            Action::Buy => close > open,
            Action::Sell => close < open,
            Action::Hold => false,
        };
        if won {
            ("win", order.stake * self.payout_pct)
        } else if close == open {
            ("draw", 0.0)
        } else {
            ("loss", -order.stake)
        }
    }
}

#[async_trait]
impl MarketGateway for PaperClient {
    async fn get_candles(&self, pair: &str, interval_secs: u64, lookback: usize) -> Result<Vec<Candle>> {
        self.source.get_candles(pair, interval_secs, lookback).await
    }

    async fn submit_order(&self, order: &OrderRequest) -> Result<Value> {
        if order.action == Action::Hold {
            return Err(Error::Gateway(format!("refusing to place a HOLD order on {}", order.pair)));
        }

        let trade_id = uuid::Uuid::new_v4().to_string();
        let open = self.last_close(&order.pair).await?;
        debug!(pair = %order.pair, action = %order.action, open, "Paper order opened");

        if !order.wait_for_result {
            return Ok(json!({ "trade_id": trade_id, "status": "open", "open_price": open }));
        }

        tokio::time::sleep(Duration::from_secs(order.duration_secs)).await;
        let close = self.last_close(&order.pair).await?;
        let (result, profit) = self.settle(order, open, close);
        info!(pair = %order.pair, result, profit, open, close, "Paper order settled");

        Ok(json!({
            "trade_id": trade_id,
            "result": result,
            "profit": profit,
            "open_price": open,
            "close_price": close,
        }))
    }
}

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{error, info, warn};

use common::{
    Clock, MarketGateway, Notifier, OrderRequest, Result, Signal, TradeJournal, TradeOutcome,
    TradeRecord,
};

/// An order about to be sent to the gateway.
#[derive(Debug, Clone)]
pub struct Placement {
    pub order: OrderRequest,
    pub signal: Signal,
    pub placed_at: DateTime<Utc>,
}

/// Submits winning signals to the gateway and records what happened.
///
/// This is the ONLY component that calls `MarketGateway::submit_order`.
/// Gate handling stays with the orchestrator: it locks after `prepare` and
/// before `announce`, so observers see the trade while it is running.
pub struct TradeExecutor {
    gateway: Arc<dyn MarketGateway>,
    notifier: Arc<dyn Notifier>,
    journal: Arc<dyn TradeJournal>,
    clock: Arc<dyn Clock>,
    stake: f64,
}

impl TradeExecutor {
    pub fn new(
        gateway: Arc<dyn MarketGateway>,
        notifier: Arc<dyn Notifier>,
        journal: Arc<dyn TradeJournal>,
        clock: Arc<dyn Clock>,
        stake: f64,
    ) -> Self {
        Self {
            gateway,
            notifier,
            journal,
            clock,
            stake,
        }
    }

    /// Build the order for `signal`, stamped with the current time.
    pub fn prepare(&self, pair: &str, signal: &Signal) -> Placement {
        Placement {
            order: OrderRequest {
                pair: pair.to_string(),
                action: signal.action,
                stake: self.stake,
                duration_secs: signal.duration_secs,
                wait_for_result: true,
            },
            signal: signal.clone(),
            placed_at: self.clock.now(),
        }
    }

    /// Send the open notification. Failures are logged only.
    pub async fn announce(&self, placement: &Placement) {
        let Placement { order, signal, .. } = placement;
        if let Err(e) = self
            .notifier
            .notify_open(&order.pair, order.action, &signal.source, order.duration_secs, order.stake)
            .await
        {
            warn!(pair = %order.pair, error = %e, "Open notification failed");
        }
    }

    /// Place the order and wait for the gateway's terminal result.
    pub async fn submit(&self, placement: &Placement) -> Result<Value> {
        let Placement { order, signal, .. } = placement;
        info!(
            pair = %order.pair,
            action = %order.action,
            duration_secs = order.duration_secs,
            strategy = %signal.source,
            "Executing order"
        );
        self.gateway.submit_order(order).await
    }

    /// Normalize the result, notify and journal. Side-effect failures are
    /// logged and never propagate.
    pub async fn settle(&self, placement: &Placement, raw: &Value) -> TradeOutcome {
        let Placement {
            order,
            signal,
            placed_at,
        } = placement;
        let pair = &order.pair;

        let outcome = TradeOutcome::normalize(raw, order.stake);
        info!(
            pair = %pair,
            trade_id = %outcome.trade_id,
            is_win = outcome.is_win,
            profit = outcome.profit,
            "Trade settled"
        );

        let close_message_id = self
            .notifier
            .notify_close(pair, outcome.profit, outcome.is_win)
            .await
            .unwrap_or_else(|e| {
                warn!(pair = %pair, error = %e, "Close notification failed");
                None
            });
        let feedback_message_id = self.notifier.request_feedback().await.unwrap_or_else(|e| {
            warn!(error = %e, "Feedback request failed");
            None
        });

        let record = TradeRecord {
            trade_id: outcome.trade_id.clone(),
            pair: pair.clone(),
            action: order.action,
            strategy: signal.source.clone(),
            timeframe: format!("{}s", order.duration_secs),
            amount: order.stake,
            open_price: outcome.open_price,
            close_price: outcome.close_price,
            is_win: outcome.is_win,
            profit: outcome.profit,
            opened_at: *placed_at,
            closed_at: self.clock.now(),
            close_message_id,
            feedback_message_id,
        };
        if let Err(e) = self.journal.save_trade(&record).await {
            error!(trade_id = %record.trade_id, error = %e, "Failed to journal trade");
        }

        outcome
    }

    /// Report a failed submission on the chat channel.
    pub async fn report_failure(&self, pair: &str, signal: &Signal, reason: &str) {
        let message = format!("Order failed on {pair} ({} via {}): {reason}", signal.action, signal.source);
        if let Err(e) = self.notifier.notify_error(&message).await {
            warn!(pair = %pair, error = %e, "Error notification failed");
        }
    }
}

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use common::{Candle, Clock, MarketGateway, Notifier, TradeJournal, TradeOutcome, TradingConfig};
use risk::{ConsensusResolver, Decision, TradeGate};
use strategy::{IndicatorEngine, PatternRecognizer, StrategySet};

use crate::executor::TradeExecutor;

/// What one call to `run_cycle` did.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// A trade is still running; no pair was evaluated.
    Gated { remaining: Duration },
    /// An order was placed on `pair`; the sweep stopped there.
    Traded { pair: String, outcome: TradeOutcome },
    /// Every pair was evaluated and none produced an executable decision.
    NoTrade,
}

/// Read-only view of the trade gate for observers (dashboard, logs).
#[derive(Clone)]
pub struct OrchestratorHandle {
    gate_rx: watch::Receiver<Option<DateTime<Utc>>>,
}

impl OrchestratorHandle {
    /// A handle whose gate never changes. Used when no orchestrator runs.
    pub fn fixed(expiry: Option<DateTime<Utc>>) -> Self {
        let (_tx, gate_rx) = watch::channel(expiry);
        Self { gate_rx }
    }

    /// Instant until which no new trade will be placed, if any was placed.
    pub fn gate_expiry(&self) -> Option<DateTime<Utc>> {
        *self.gate_rx.borrow()
    }

    pub fn is_gated(&self, now: DateTime<Utc>) -> bool {
        self.gate_expiry().is_some_and(|expiry| now < expiry)
    }
}

/// Drives fetch → enrich → evaluate → resolve → execute over the configured
/// pairs, one trade at a time.
///
/// The orchestrator owns the trade gate and is its only writer. Observers get
/// the expiry through `OrchestratorHandle`.
pub struct TradingOrchestrator {
    settings: TradingConfig,
    gateway: Arc<dyn MarketGateway>,
    clock: Arc<dyn Clock>,
    indicators: IndicatorEngine,
    recognizer: PatternRecognizer,
    strategies: StrategySet,
    resolver: ConsensusResolver,
    executor: TradeExecutor,
    gate: TradeGate,
    gate_tx: watch::Sender<Option<DateTime<Utc>>>,
}

impl TradingOrchestrator {
    pub fn new(
        settings: TradingConfig,
        strategies: StrategySet,
        gateway: Arc<dyn MarketGateway>,
        notifier: Arc<dyn Notifier>,
        journal: Arc<dyn TradeJournal>,
        clock: Arc<dyn Clock>,
    ) -> (Self, OrchestratorHandle) {
        let (gate_tx, gate_rx) = watch::channel(None);
        let executor = TradeExecutor::new(
            gateway.clone(),
            notifier,
            journal,
            clock.clone(),
            settings.stake,
        );

        let orchestrator = Self {
            settings,
            gateway,
            clock,
            indicators: IndicatorEngine::new(),
            recognizer: PatternRecognizer::new(),
            strategies,
            resolver: ConsensusResolver::new(),
            executor,
            gate: TradeGate::new(),
            gate_tx,
        };

        (orchestrator, OrchestratorHandle { gate_rx })
    }

    /// Run forever. Call from `tokio::spawn`.
    pub async fn run(mut self) {
        info!(
            pairs = ?self.settings.pairs,
            strategies = ?self.strategies.names().collect::<Vec<_>>(),
            "Trading orchestrator running, one trade at a time"
        );
        loop {
            match self.run_cycle().await {
                CycleOutcome::Gated { remaining } => {
                    debug!(remaining_secs = remaining.as_secs(), "Trade in progress, waiting");
                    tokio::time::sleep(self.settings.poll_interval()).await;
                }
                CycleOutcome::Traded { .. } | CycleOutcome::NoTrade => {
                    debug!("Sweep complete");
                    tokio::time::sleep(self.settings.sweep_delay()).await;
                }
            }
        }
    }

    /// One gate check followed, if open, by one sweep over all pairs.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        let now = self.clock.now();
        if !self.gate.is_open(now) {
            return CycleOutcome::Gated {
                remaining: self.gate.remaining(now),
            };
        }

        let pairs = self.settings.pairs.clone();
        for pair in &pairs {
            let now = self.clock.now();
            if !self.gate.is_open(now) {
                return CycleOutcome::Gated {
                    remaining: self.gate.remaining(now),
                };
            }

            if let Some(outcome) = self.process_pair(pair).await {
                return CycleOutcome::Traded {
                    pair: pair.clone(),
                    outcome,
                };
            }

            tokio::time::sleep(self.settings.pair_delay()).await;
        }

        CycleOutcome::NoTrade
    }

    async fn process_pair(&mut self, pair: &str) -> Option<TradeOutcome> {
        let candles = self.fetch(pair).await;
        if candles.is_empty() {
            return None;
        }

        let series = self.recognizer.annotate(self.indicators.compute(&candles));
        let regime = self.indicators.classify_regime(&series);
        debug!(pair = %pair, candles = series.len(), regime = %regime, "Pair analysed");

        let signals = self.strategies.evaluate(pair, &series);
        let Decision::Trade(signal) = self.resolver.resolve(pair, &signals) else {
            return None;
        };

        // Locked before submission; a rejected order restores the previous expiry.
        let placement = self.executor.prepare(pair, &signal);
        let previous = self.gate.expiry();
        let expiry = self.gate.lock(
            placement.placed_at,
            Duration::from_secs(signal.duration_secs),
            self.settings.safety_margin(),
        );
        self.gate_tx.send_replace(Some(expiry));
        info!(pair = %pair, expiry = %expiry, "Gate closed until trade expiry");

        self.executor.announce(&placement).await;
        match self.executor.submit(&placement).await {
            Ok(raw) => Some(self.executor.settle(&placement, &raw).await),
            Err(e) => {
                self.gate.restore(previous);
                self.gate_tx.send_replace(previous);
                error!(pair = %pair, error = %e, "Order submission failed, gate reopened");
                self.executor.report_failure(pair, &signal, &e.to_string()).await;
                None
            }
        }
    }

    /// Fetch candles, bounded by the fetch timeout. Any failure is an empty
    /// result, never stale data.
    async fn fetch(&self, pair: &str) -> Vec<Candle> {
        let fetch = self.gateway.get_candles(pair, self.settings.interval_secs, self.settings.lookback);
        match tokio::time::timeout(self.settings.fetch_timeout(), fetch).await {
            Ok(Ok(candles)) => candles,
            Ok(Err(e)) => {
                warn!(pair = %pair, error = %e, "Candle fetch failed, skipping pair");
                Vec::new()
            }
            Err(_) => {
                warn!(pair = %pair, timeout_secs = self.settings.fetch_timeout_secs, "Candle fetch timed out, skipping pair");
                Vec::new()
            }
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

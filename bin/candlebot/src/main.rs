use std::sync::Arc;

use sqlx::SqlitePool;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use common::{
    Config, LogNotifier, MarketGateway, Notifier, SystemClock, TradeJournal, TradingMode,
};
use engine::{BrokerClient, SqliteJournal, TradingOrchestrator};
use paper::PaperClient;
use strategy::{StrategyFileConfig, StrategySet};
use telegram_notify::{run_feedback_listener, TelegramNotifier};

#[tokio::main]
async fn main() {
    // ── Logging ──────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = Config::from_env();
    info!(mode = %cfg.trading_mode, "CandleBot starting");

    let strategy_file = StrategyFileConfig::load(&cfg.strategy_config_path);
    let strategies = match StrategySet::from_config(&strategy_file) {
        Ok(set) if set.is_empty() => {
            warn!("No strategies enabled in config, using the default set");
            StrategySet::default_set()
        }
        Ok(set) => set,
        Err(e) => panic!("Invalid strategy config '{}': {e}", cfg.strategy_config_path),
    };
    let trading = strategy_file.trading.clone();
    info!(
        pairs = trading.pairs.len(),
        strategies = ?strategies.names().collect::<Vec<_>>(),
        "Strategy config loaded"
    );

    // ── Database ──────────────────────────────────────────────────────────────
    let db = SqlitePool::connect(&cfg.database_url)
        .await
        .unwrap_or_else(|e| panic!("Failed to connect to database: {e}"));
    sqlx::migrate!("../../migrations")
        .run(&db)
        .await
        .unwrap_or_else(|e| panic!("Database migration failed: {e}"));
    let journal = SqliteJournal::new(db);
    info!("Database ready");

    // ── Gateway (injected based on TRADING_MODE) ──────────────────────────────
    let broker = BrokerClient::new(&cfg.broker_api_url, cfg.broker_ssid.clone())
        .unwrap_or_else(|e| panic!("{e}"));
    let gateway: Arc<dyn MarketGateway> = match cfg.trading_mode {
        TradingMode::Live => {
            info!("Live trading mode, orders go to the broker");
            Arc::new(broker)
        }
        TradingMode::Paper => {
            info!(payout_pct = cfg.paper_payout_pct, "Paper trading mode, orders are simulated");
            Arc::new(PaperClient::new(
                Arc::new(broker),
                trading.interval_secs,
                cfg.paper_payout_pct,
            ))
        }
    };

    // ── Notifier + feedback listener ──────────────────────────────────────────
    let journal_dyn: Arc<dyn TradeJournal> = Arc::new(journal.clone());
    let notifier: Arc<dyn Notifier> = match (&cfg.telegram_token, cfg.telegram_chat_id) {
        (Some(token), Some(chat_id)) => {
            let bot = teloxide::Bot::new(token);
            let telegram = TelegramNotifier::new(bot.clone(), chat_id);
            tokio::spawn(run_feedback_listener(bot, telegram.chat_id(), journal_dyn.clone()));
            Arc::new(telegram)
        }
        (Some(_), None) => panic!("TELEGRAM_TOKEN is set but TELEGRAM_CHAT_ID is missing"),
        (None, _) => {
            info!("No Telegram token configured, notifications go to the log only");
            Arc::new(LogNotifier)
        }
    };

    // ── Orchestrator ──────────────────────────────────────────────────────────
    let (orchestrator, handle) = TradingOrchestrator::new(
        trading,
        strategies,
        gateway,
        notifier,
        journal_dyn,
        Arc::new(SystemClock),
    );

    // ── Dashboard API ─────────────────────────────────────────────────────────
    let api_state = api::AppState {
        journal,
        gate: handle,
        trading_mode: cfg.trading_mode,
        dashboard_token: cfg.dashboard_token.clone(),
    };
    let port = cfg.dashboard_port;
    tokio::spawn(async move {
        if let Err(e) = api::serve(api_state, port).await {
            error!(error = %e, "Dashboard API stopped");
        }
    });

    // ── Spawn trading loop ────────────────────────────────────────────────────
    tokio::spawn(orchestrator.run());

    info!("All subsystems started. Waiting for shutdown signal.");
    tokio::signal::ctrl_c().await.unwrap();
    info!("Shutdown signal received. Exiting.");
}

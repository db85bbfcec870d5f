use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::TradingMode;

/// All configuration loaded from environment variables at startup.
/// Missing required variables cause an immediate panic with a clear message.
#[derive(Debug, Clone)]
pub struct Config {
    // Broker bridge
    pub broker_api_url: String,
    pub broker_ssid: String,

    // Telegram (optional: without a token, notifications only go to the log)
    pub telegram_token: Option<String>,
    pub telegram_chat_id: Option<i64>,

    // Dashboard
    pub dashboard_token: String,
    pub dashboard_port: u16,

    // Trading
    pub trading_mode: TradingMode,
    pub paper_payout_pct: f64,

    // Database
    pub database_url: String,

    // Strategy config file path
    pub strategy_config_path: String,
}

impl Config {
    /// Load all configuration from environment variables.
    /// Loads `.env` if present. Panics on any missing required variable.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // ignore error if .env not present

        let trading_mode = match required_env("TRADING_MODE").to_lowercase().as_str() {
            "paper" => TradingMode::Paper,
            "live" => TradingMode::Live,
            other => panic!("ERROR: TRADING_MODE must be 'paper' or 'live', got: '{other}'"),
        };

        let telegram_chat_id = optional_env("TELEGRAM_CHAT_ID").map(|s| {
            s.trim().parse::<i64>().unwrap_or_else(|_| {
                panic!("TELEGRAM_CHAT_ID must be numeric, got: '{}'", s.trim())
            })
        });

        Config {
            broker_api_url: required_env("BROKER_API_URL"),
            broker_ssid: required_env("BROKER_SSID"),
            telegram_token: optional_env("TELEGRAM_TOKEN").filter(|t| !t.trim().is_empty()),
            telegram_chat_id,
            dashboard_token: required_env("DASHBOARD_TOKEN"),
            dashboard_port: optional_env("DASHBOARD_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            trading_mode,
            paper_payout_pct: optional_env("PAPER_PAYOUT_PCT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.92),
            database_url: required_env("DATABASE_URL"),
            strategy_config_path: optional_env("STRATEGY_CONFIG_PATH")
                .unwrap_or_else(|| "config/strategies.toml".to_string()),
        }
    }
}

fn required_env(key: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| {
        panic!("Required environment variable '{key}' is not set. Check your .env file.")
    })
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Orchestrator settings, read from the `[trading]` table of the strategy file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TradingConfig {
    /// Pairs swept in this order every cycle.
    pub pairs: Vec<String>,
    /// Candle interval in seconds.
    pub interval_secs: u64,
    /// Candles requested per fetch. Must cover the 200-period SMA.
    pub lookback: usize,
    /// Stake per order.
    pub stake: f64,
    /// Sleep between gate checks while a trade is running.
    pub poll_interval_secs: u64,
    /// Pause between pairs within one sweep.
    pub pair_delay_secs: u64,
    /// Pause between full sweeps.
    pub sweep_delay_secs: u64,
    /// Upper bound on a single candle fetch.
    pub fetch_timeout_secs: u64,
    /// Added to the trade duration when locking the gate.
    pub safety_margin_secs: u64,
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            pairs: [
                "EURUSD_otc",
                "GBPUSD_otc",
                "AUDUSD_otc",
                "USDCAD_otc",
                "AUDCAD_otc",
                "USDMXN_otc",
                "USDCOP_otc",
            ]
            .iter()
            .map(|p| p.to_string())
            .collect(),
            interval_secs: 300,
            lookback: 250,
            stake: 1.0,
            poll_interval_secs: 5,
            pair_delay_secs: 2,
            sweep_delay_secs: 10,
            fetch_timeout_secs: 10,
            safety_margin_secs: 5,
        }
    }
}

impl TradingConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn pair_delay(&self) -> Duration {
        Duration::from_secs(self.pair_delay_secs)
    }

    pub fn sweep_delay(&self) -> Duration {
        Duration::from_secs(self.sweep_delay_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn safety_margin(&self) -> Duration {
        Duration::from_secs(self.safety_margin_secs)
    }
}

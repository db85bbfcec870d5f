use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One OHLC price bar for a fixed interval. Immutable once fetched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    pub fn upper_shadow(&self) -> f64 {
        self.high - self.open.max(self.close)
    }

    pub fn lower_shadow(&self) -> f64 {
        self.open.min(self.close) - self.low
    }

    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }
}

/// Direction of a strategy opinion. `Hold` means the strategy abstains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Buy => write!(f, "BUY"),
            Action::Sell => write!(f, "SELL"),
            Action::Hold => write!(f, "HOLD"),
        }
    }
}

/// Opinion emitted by a strategy for one analysis cycle. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub action: Action,
    pub reason: String,
    pub duration_secs: u64,
    /// Name of the strategy that produced this signal.
    pub source: String,
}

impl Signal {
    pub fn buy(source: impl Into<String>, reason: impl Into<String>, duration_secs: u64) -> Self {
        Self {
            action: Action::Buy,
            reason: reason.into(),
            duration_secs,
            source: source.into(),
        }
    }

    pub fn sell(source: impl Into<String>, reason: impl Into<String>, duration_secs: u64) -> Self {
        Self {
            action: Action::Sell,
            reason: reason.into(),
            duration_secs,
            source: source.into(),
        }
    }

    /// No opinion. Duration is always zero.
    pub fn hold(source: impl Into<String>) -> Self {
        Self {
            action: Action::Hold,
            reason: String::new(),
            duration_secs: 0,
            source: source.into(),
        }
    }

    pub fn is_hold(&self) -> bool {
        self.action == Action::Hold
    }
}

/// Classified market condition for the latest candle of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketState {
    TrendingUp,
    TrendingDown,
    Sideways,
    Volatile,
    Unknown,
}

impl std::fmt::Display for MarketState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarketState::TrendingUp => write!(f, "TRENDING_UP"),
            MarketState::TrendingDown => write!(f, "TRENDING_DOWN"),
            MarketState::Sideways => write!(f, "SIDEWAYS"),
            MarketState::Volatile => write!(f, "VOLATILE"),
            MarketState::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// A fixed-expiry order handed to the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    pub pair: String,
    pub action: Action,
    pub stake: f64,
    pub duration_secs: u64,
    /// When true the gateway only returns once the trade has settled.
    pub wait_for_result: bool,
}

/// Journal entry for one executed trade: canonical outcome plus signal metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRecord {
    pub trade_id: String,
    pub pair: String,
    pub action: Action,
    pub strategy: String,
    /// Expiry of the trade, e.g. "300s".
    pub timeframe: String,
    pub amount: f64,
    pub open_price: Option<f64>,
    pub close_price: Option<f64>,
    pub is_win: bool,
    pub profit: f64,
    pub opened_at: DateTime<Utc>,
    pub closed_at: DateTime<Utc>,
    /// Telegram id of the close notification, if one was sent.
    pub close_message_id: Option<i32>,
    /// Telegram id of the feedback prompt, if one was sent.
    pub feedback_message_id: Option<i32>,
}

impl TradeRecord {
    pub fn result_label(&self) -> &'static str {
        if self.is_win {
            "WIN"
        } else if self.profit == 0.0 {
            "DRAW"
        } else {
            "LOSS"
        }
    }
}

/// A journal row as read back for the dashboard, including any feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: i64,
    pub trade_id: String,
    pub timestamp: String,
    pub pair: String,
    pub action: String,
    pub strategy: String,
    pub timeframe: String,
    pub amount: f64,
    pub open_price: Option<f64>,
    pub close_price: Option<f64>,
    pub result: String,
    pub profit: f64,
    pub closed_at: String,
    pub telegram_message_id: Option<i64>,
    pub feedback_message_id: Option<i64>,
    pub feedback_text: Option<String>,
    pub feedback_image: Option<String>,
    pub feedback_timestamp: Option<String>,
}

/// Whether orders reach the real broker or are settled by the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradingMode {
    Live,
    Paper,
}

impl std::fmt::Display for TradingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradingMode::Live => write!(f, "live"),
            TradingMode::Paper => write!(f, "paper"),
        }
    }
}

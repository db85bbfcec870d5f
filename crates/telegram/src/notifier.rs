use async_trait::async_trait;
use chrono::Utc;
use teloxide::prelude::*;
use tracing::debug;

use common::{Action, Error, Notifier, Result};

/// Sends trade notifications to a single Telegram chat.
#[derive(Clone)]
pub struct TelegramNotifier {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramNotifier {
    pub fn new(bot: Bot, chat_id: i64) -> Self {
        Self {
            bot,
            chat_id: ChatId(chat_id),
        }
    }

    pub fn chat_id(&self) -> ChatId {
        self.chat_id
    }

    async fn send(&self, text: String) -> Result<i32> {
        let msg = self
            .bot
            .send_message(self.chat_id, text)
            .await
            .map_err(|e| Error::Notify(e.to_string()))?;
        debug!(message_id = msg.id.0, "Telegram message sent");
        Ok(msg.id.0)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify_open(
        &self,
        pair: &str,
        action: Action,
        strategy: &str,
        timeframe_secs: u64,
        stake: f64,
    ) -> Result<()> {
        self.send(open_message(pair, action, strategy, timeframe_secs, stake))
            .await
            .map(|_| ())
    }

    async fn notify_close(&self, pair: &str, profit: f64, is_win: bool) -> Result<Option<i32>> {
        self.send(close_message(pair, profit, is_win)).await.map(Some)
    }

    async fn request_feedback(&self) -> Result<Option<i32>> {
        self.send(FEEDBACK_PROMPT.to_string()).await.map(Some)
    }

    async fn notify_error(&self, message: &str) -> Result<()> {
        self.send(format!("\u{26a0}\u{fe0f} ERROR\n\n{message}")).await.map(|_| ())
    }
}

// ─── Message formatting ───────────────────────────────────────────────────────

const FEEDBACK_PROMPT: &str = "\u{1f4dd} How did this trade look?\n\
    Reply to this message with a comment, or a chart screenshot with a caption.";

fn now_label() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn open_message(pair: &str, action: Action, strategy: &str, timeframe_secs: u64, stake: f64) -> String {
    let (icon, direction) = match action {
        Action::Buy => ("\u{1f7e2}", "UP (Buy)"),
        _ => ("\u{1f534}", "DOWN (Sell)"),
    };
    format!(
        "{icon} NEW TRADE {icon}\n\n\
         Pair: {pair}\n\
         Direction: {direction}\n\
         Strategy: {strategy}\n\
         Duration: {timeframe_secs}s\n\
         Stake: ${stake:.2}\n\
         Time: {}",
        now_label()
    )
}

fn close_message(pair: &str, profit: f64, is_win: bool) -> String {
    let (icon, result) = if is_win {
        ("\u{2705}", "WON")
    } else if profit == 0.0 {
        ("\u{2796}", "DRAW")
    } else {
        ("\u{274c}", "LOST")
    };
    format!(
        "{icon} TRADE CLOSED {icon}\n\n\
         Pair: {pair}\n\
         Result: {result}\n\
         Profit: ${profit:.2}\n\
         Time: {}",
        now_label()
    )
}

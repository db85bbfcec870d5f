use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use common::{JournalEntry, Result, TradeJournal, TradeRecord};

const SELECT_COLUMNS: &str = r#"
    SELECT id, trade_id, timestamp, pair, action, strategy, timeframe, amount,
           open_price, close_price, result, profit, closed_at,
           telegram_message_id, feedback_message_id,
           feedback_text, feedback_image, feedback_timestamp
    FROM trades
"#;

/// SQLite-backed trade journal. Cheap to clone.
#[derive(Clone)]
pub struct SqliteJournal {
    db: SqlitePool,
}

impl SqliteJournal {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db
    }

    /// Most recent trades first.
    pub async fn recent_trades(&self, limit: i64) -> Result<Vec<JournalEntry>> {
        let sql = format!("{SELECT_COLUMNS} ORDER BY id DESC LIMIT ?1");
        let rows = sqlx::query(&sql).bind(limit).fetch_all(&self.db).await?;
        rows.iter().map(entry_from_row).collect()
    }

    /// Trades that have received operator feedback, oldest first.
    pub async fn trades_with_feedback(&self) -> Result<Vec<JournalEntry>> {
        let sql = format!("{SELECT_COLUMNS} WHERE feedback_text IS NOT NULL ORDER BY id ASC");
        let rows = sqlx::query(&sql).fetch_all(&self.db).await?;
        rows.iter().map(entry_from_row).collect()
    }
}

#[async_trait]
impl TradeJournal for SqliteJournal {
    async fn save_trade(&self, record: &TradeRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO trades (
                trade_id, timestamp, pair, action, strategy, timeframe, amount,
                open_price, close_price, result, profit, closed_at,
                telegram_message_id, feedback_message_id
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            ON CONFLICT(trade_id) DO NOTHING
            "#,
        )
        .bind(&record.trade_id)
        .bind(record.opened_at.to_rfc3339())
        .bind(&record.pair)
        .bind(record.action.to_string())
        .bind(&record.strategy)
        .bind(&record.timeframe)
        .bind(record.amount)
        .bind(record.open_price)
        .bind(record.close_price)
        .bind(record.result_label())
        .bind(record.profit)
        .bind(record.closed_at.to_rfc3339())
        .bind(record.close_message_id)
        .bind(record.feedback_message_id)
        .execute(&self.db)
        .await?;

        info!(trade_id = %record.trade_id, pair = %record.pair, result = record.result_label(), "Trade journaled");
        Ok(())
    }

    async fn add_feedback(&self, message_id: i32, text: &str, image: Option<&str>) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE trades
            SET feedback_text = ?1, feedback_image = ?2, feedback_timestamp = ?3
            WHERE telegram_message_id = ?4 OR feedback_message_id = ?4
            "#,
        )
        .bind(text)
        .bind(image)
        .bind(Utc::now().to_rfc3339())
        .bind(message_id)
        .execute(&self.db)
        .await?;

        let matched = result.rows_affected() > 0;
        debug!(message_id, matched, "Feedback recorded");
        Ok(matched)
    }
}

fn entry_from_row(row: &SqliteRow) -> Result<JournalEntry> {
    Ok(JournalEntry {
        id: row.try_get("id")?,
        trade_id: row.try_get("trade_id")?,
        timestamp: row.try_get("timestamp")?,
        pair: row.try_get("pair")?,
        action: row.try_get("action")?,
        strategy: row.try_get("strategy")?,
        timeframe: row.try_get("timeframe")?,
        amount: row.try_get("amount")?,
        open_price: row.try_get("open_price")?,
        close_price: row.try_get("close_price")?,
        result: row.try_get("result")?,
        profit: row.try_get("profit")?,
        closed_at: row.try_get("closed_at")?,
        telegram_message_id: row.try_get("telegram_message_id")?,
        feedback_message_id: row.try_get("feedback_message_id")?,
        feedback_text: row.try_get("feedback_text")?,
        feedback_image: row.try_get("feedback_image")?,
        feedback_timestamp: row.try_get("feedback_timestamp")?,
    })
}

use axum::{
    extract::{Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::{auth::require_auth, AppState};

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 500;

pub fn api_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/trades", get(get_trades))
        .route("/api/feedback", get(get_feedback))
        .route("/api/status", get(get_status))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

fn journal_error(e: common::Error) -> Response {
    warn!(error = %e, "Journal query failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "journal unavailable" })),
    )
        .into_response()
}

// ─── Trades ───────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct TradesQuery {
    limit: Option<i64>,
}

async fn get_trades(State(state): State<AppState>, Query(q): Query<TradesQuery>) -> Response {
    let limit = q.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    match state.journal.recent_trades(limit).await {
        Ok(trades) => Json(json!({ "trades": trades, "count": trades.len(), "limit": limit })).into_response(),
        Err(e) => journal_error(e),
    }
}

// ─── Feedback ─────────────────────────────────────────────────────────────────

async fn get_feedback(State(state): State<AppState>) -> Response {
    match state.journal.trades_with_feedback().await {
        Ok(trades) => Json(json!({ "trades": trades, "count": trades.len() })).into_response(),
        Err(e) => journal_error(e),
    }
}

// ─── Status ───────────────────────────────────────────────────────────────────

async fn get_status(State(state): State<AppState>) -> Json<serde_json::Value> {
    let now = Utc::now();
    let expiry = state.gate.gate_expiry();
    let remaining_secs = expiry
        .filter(|e| *e > now)
        .map(|e| (e - now).num_seconds())
        .unwrap_or(0);

    Json(json!({
        "mode": state.trading_mode.to_string(),
        "trade_in_progress": state.gate.is_gated(now),
        "gate_expiry": expiry.map(|e| e.to_rfc3339()),
        "remaining_secs": remaining_secs,
    }))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::Value;
    use sqlx::sqlite::SqlitePoolOptions;
    use tower::ServiceExt;

    use common::{Action, TradeJournal, TradeRecord, TradingMode};
    use engine::{OrchestratorHandle, SqliteJournal};

    use crate::{app, AppState};

    const TOKEN: &str = "s3cret";

    async fn state(gate_expiry: Option<chrono::DateTime<Utc>>) -> AppState {
        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("../../migrations").run(&db).await.unwrap();
        AppState {
            journal: SqliteJournal::new(db),
            gate: OrchestratorHandle::fixed(gate_expiry),
            trading_mode: TradingMode::Paper,
            dashboard_token: TOKEN.into(),
        }
    }

    fn record(trade_id: &str, close_msg: i32) -> TradeRecord {
        let opened = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        TradeRecord {
            trade_id: trade_id.into(),
            pair: "GBPUSD_otc".into(),
            action: Action::Sell,
            strategy: "Continuation Patterns".into(),
            timeframe: "300s".into(),
            amount: 1.0,
            open_price: None,
            close_price: None,
            is_win: false,
            profit: -1.0,
            opened_at: opened,
            closed_at: opened + Duration::seconds(300),
            close_message_id: Some(close_msg),
            feedback_message_id: None,
        }
    }

    async fn get(state: AppState, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut req = Request::builder().uri(uri);
        if let Some(t) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {t}"));
        }
        let resp = app(state)
            .oneshot(req.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn healthz_needs_no_token() {
        let (status, body) = get(state(None).await, "/healthz", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mode"], "paper");
        assert_eq!(body["trade_in_progress"], false);
    }

    #[tokio::test]
    async fn api_rejects_missing_or_wrong_token() {
        let s = state(None).await;
        assert_eq!(get(s.clone(), "/api/trades", None).await.0, StatusCode::UNAUTHORIZED);
        assert_eq!(get(s, "/api/trades", Some("nope")).await.0, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn trades_are_listed_newest_first_with_limit() {
        let s = state(None).await;
        for (i, id) in ["a", "b", "c"].iter().enumerate() {
            s.journal.save_trade(&record(id, i as i32 + 1)).await.unwrap();
        }

        let (status, body) = get(s, "/api/trades?limit=2", Some(TOKEN)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 2);
        assert_eq!(body["trades"][0]["trade_id"], "c");
        assert_eq!(body["trades"][0]["result"], "LOSS");
    }

    #[tokio::test]
    async fn feedback_lists_only_annotated_trades() {
        let s = state(None).await;
        s.journal.save_trade(&record("a", 10)).await.unwrap();
        s.journal.save_trade(&record("b", 20)).await.unwrap();
        s.journal.add_feedback(20, "fake breakout", None).await.unwrap();

        let (_, body) = get(s, "/api/feedback", Some(TOKEN)).await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["trades"][0]["feedback_text"], "fake breakout");
    }

    #[tokio::test]
    async fn status_reports_gate() {
        let expiry = Utc::now() + Duration::seconds(120);
        let (status, body) = get(state(Some(expiry)).await, "/api/status", Some(TOKEN)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["trade_in_progress"], true);
        assert!(body["remaining_secs"].as_i64().unwrap() > 100);
        assert_eq!(body["gate_expiry"], expiry.to_rfc3339());
    }

    #[tokio::test]
    async fn status_without_trade_is_open() {
        let (_, body) = get(state(None).await, "/api/status", Some(TOKEN)).await;
        assert_eq!(body["trade_in_progress"], false);
        assert_eq!(body["gate_expiry"], Value::Null);
        assert_eq!(body["remaining_secs"], 0);
    }
}

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use reqwest::Client;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};
use url::Url;

use common::{Action, Candle, Error, MarketGateway, OrderRequest, Result};

/// HTTP client for the broker bridge. Used for candle retrieval and order
/// placement.
pub struct BrokerClient {
    base: Url,
    ssid: String,
    http: Client,
}

impl BrokerClient {
    pub fn new(base_url: &str, ssid: impl Into<String>) -> Result<Self> {
        let mut base = Url::parse(base_url)
            .map_err(|e| Error::Config(format!("invalid broker URL '{base_url}': {e}")))?;
        // Url::join replaces the last path segment unless the base ends with '/'.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let http = Client::builder()
            .use_rustls_tls()
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;
        Ok(Self {
            base,
            ssid: ssid.into(),
            http,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| Error::Config(format!("invalid broker endpoint '{path}': {e}")))
    }

    async fn read_body(resp: reqwest::Response) -> Result<String> {
        let status = resp.status();
        let body = resp.text().await.map_err(|e| Error::Http(e.to_string()))?;
        if !status.is_success() {
            return Err(Error::Gateway(format!("HTTP {status}: {body}")));
        }
        Ok(body)
    }
}

#[async_trait]
impl MarketGateway for BrokerClient {
    async fn get_candles(&self, pair: &str, interval_secs: u64, lookback: usize) -> Result<Vec<Candle>> {
        let mut url = self.endpoint("candles")?;
        // The bridge takes the history span in seconds, not a candle count.
        let offset = interval_secs.saturating_mul(lookback as u64);
        url.query_pairs_mut()
            .append_pair("asset", pair)
            .append_pair("period", &interval_secs.to_string())
            .append_pair("offset", &offset.to_string());

        let resp = self
            .http
            .get(url)
            .header("X-SSID", &self.ssid)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;
        let body = Self::read_body(resp).await?;
        let raw: Value = serde_json::from_str(&body)?;

        let candles = parse_candles(&raw);
        if candles.is_empty() {
            warn!(pair = %pair, "Broker returned no usable candles");
        }
        Ok(candles)
    }

    async fn submit_order(&self, order: &OrderRequest) -> Result<Value> {
        let direction = match order.action {
            Action::Buy => "call",
            Action::Sell => "put",
            Action::Hold => {
                return Err(Error::Gateway(format!("refusing to place a HOLD order on {}", order.pair)))
            }
        };
        let body = TradeBody {
            asset: &order.pair,
            direction,
            amount: order.stake,
            time: order.duration_secs,
            check_win: order.wait_for_result,
        };

        debug!(pair = %order.pair, direction, stake = order.stake, "Submitting order to broker");
        let resp = self
            .http
            .post(self.endpoint("trade")?)
            .header("X-SSID", &self.ssid)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;
        let text = Self::read_body(resp).await?;

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

// ─── Wire types ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct TradeBody<'a> {
    asset: &'a str,
    direction: &'a str,
    amount: f64,
    time: u64,
    check_win: bool,
}

/// Convert the bridge's candle rows into `Candle`s, oldest first.
///
/// Keys are matched case-insensitively. If any row lacks one of
/// open/high/low/close, or holds a non-numeric value there, the whole batch
/// is discarded. Rows without a timestamp are stamped with the current time.
pub fn parse_candles(raw: &Value) -> Vec<Candle> {
    let Some(rows) = raw.as_array() else {
        return Vec::new();
    };

    let mut candles = Vec::with_capacity(rows.len());
    for row in rows {
        let Some(fields) = row.as_object() else {
            return Vec::new();
        };
        let fields = lowercase_keys(fields);
        let ohlc = ["open", "high", "low", "close"].map(|k| fields.get(k).and_then(number));
        let [Some(open), Some(high), Some(low), Some(close)] = ohlc else {
            return Vec::new();
        };
        let timestamp = fields
            .get("time")
            .or_else(|| fields.get("timestamp"))
            .and_then(parse_timestamp)
            .unwrap_or_else(Utc::now);
        candles.push(Candle {
            timestamp,
            open,
            high,
            low,
            close,
        });
    }

    candles.sort_by_key(|c| c.timestamp);
    candles
}

fn lowercase_keys(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(k, v)| (k.to_lowercase(), v.clone()))
        .collect()
}

fn number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Unix seconds (integer, fractional or numeric string) or an RFC 3339 string.
fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    if let Some(secs) = number(value) {
        let whole = secs.trunc() as i64;
        let nanos = ((secs - secs.trunc()) * 1e9).round() as u32;
        return Utc.timestamp_opt(whole, nanos.min(999_999_999)).single();
    }
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

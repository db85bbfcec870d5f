use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Canonical settlement result of one trade, whatever shape the broker returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeOutcome {
    pub is_win: bool,
    pub profit: f64,
    pub open_price: Option<f64>,
    pub close_price: Option<f64>,
    pub trade_id: String,
}

impl TradeOutcome {
    /// Loss of the full stake. Used whenever the result cannot be interpreted.
    pub fn forfeit(stake: f64) -> Self {
        Self {
            is_win: false,
            profit: -stake.abs(),
            open_price: None,
            close_price: None,
            trade_id: new_trade_id(),
        }
    }

    /// Normalize a raw gateway result.
    ///
    /// Accepted shapes:
    /// - `true` / `false`
    /// - a number (the profit; positive means win)
    /// - a string: `"win"`, `"loss"`, `"draw"` and synonyms, or a numeric profit
    /// - an object with any of `result`/`status`/`win`, `profit`, open/close
    ///   prices and an id
    /// - an array whose first element is the trade id and whose last element
    ///   is one of the shapes above
    ///
    /// Anything else is a loss at full stake. A win is never inferred from
    /// ambiguous data.
    pub fn normalize(raw: &Value, stake: f64) -> Self {
        match raw {
            Value::Bool(won) => from_verdict(Verdict::from_bool(*won), stake),
            Value::Number(n) => match n.as_f64() {
                Some(profit) => from_profit(profit),
                None => Self::forfeit(stake),
            },
            Value::String(s) => from_str(s, stake),
            Value::Object(map) => from_object(map, stake),
            Value::Array(items) => from_array(items, stake),
            Value::Null => Self::forfeit(stake),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Verdict {
    Win,
    Loss,
    Draw,
}

impl Verdict {
    fn from_bool(won: bool) -> Self {
        if won {
            Verdict::Win
        } else {
            Verdict::Loss
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "win" | "won" | "true" | "success" | "profit" => Some(Verdict::Win),
            "loss" | "lose" | "lost" | "false" | "fail" | "failed" => Some(Verdict::Loss),
            "draw" | "tie" | "equal" | "refund" => Some(Verdict::Draw),
            _ => None,
        }
    }
}

fn new_trade_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// A bare verdict carries no payout, so a win is reported with zero profit.
fn from_verdict(verdict: Verdict, stake: f64) -> TradeOutcome {
    let (is_win, profit) = match verdict {
        Verdict::Win => (true, 0.0),
        Verdict::Draw => (false, 0.0),
        Verdict::Loss => (false, -stake.abs()),
    };
    TradeOutcome {
        is_win,
        profit,
        open_price: None,
        close_price: None,
        trade_id: new_trade_id(),
    }
}

fn from_profit(profit: f64) -> TradeOutcome {
    TradeOutcome {
        is_win: profit > 0.0,
        profit,
        open_price: None,
        close_price: None,
        trade_id: new_trade_id(),
    }
}

fn from_str(s: &str, stake: f64) -> TradeOutcome {
    if let Some(verdict) = Verdict::parse(s) {
        return from_verdict(verdict, stake);
    }
    match s.trim().parse::<f64>() {
        Ok(profit) if profit.is_finite() => from_profit(profit),
        _ => TradeOutcome::forfeit(stake),
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

fn first_number(map: &serde_json::Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|k| map.get(*k).and_then(number))
}

fn from_object(map: &serde_json::Map<String, Value>, stake: f64) -> TradeOutcome {
    let verdict = ["result", "status", "outcome", "win", "is_win"]
        .iter()
        .find_map(|k| match map.get(*k)? {
            Value::Bool(b) => Some(Verdict::from_bool(*b)),
            Value::String(s) => Verdict::parse(s),
            _ => None,
        });
    let profit = first_number(map, &["profit", "pnl", "payout_profit"]);

    let (is_win, profit) = match (verdict, profit) {
        (Some(Verdict::Win), Some(p)) => (p > 0.0, p),
        (Some(Verdict::Win), None) => (true, 0.0),
        (Some(Verdict::Draw), p) => (false, p.unwrap_or(0.0)),
        (Some(Verdict::Loss), Some(p)) => (false, p.min(0.0)),
        (Some(Verdict::Loss), None) => (false, -stake.abs()),
        (None, Some(p)) => (p > 0.0, p),
        (None, None) => {
            let mut outcome = TradeOutcome::forfeit(stake);
            outcome.trade_id = object_id(map).unwrap_or(outcome.trade_id);
            return outcome;
        }
    };

    TradeOutcome {
        is_win,
        profit,
        open_price: first_number(map, &["open_price", "openPrice", "open"]),
        close_price: first_number(map, &["close_price", "closePrice", "close"]),
        trade_id: object_id(map).unwrap_or_else(new_trade_id),
    }
}

fn object_id(map: &serde_json::Map<String, Value>) -> Option<String> {
    ["trade_id", "id", "uuid", "order_id"]
        .iter()
        .find_map(|k| match map.get(*k)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}

fn from_array(items: &[Value], stake: f64) -> TradeOutcome {
    let Some(last) = items.last() else {
        return TradeOutcome::forfeit(stake);
    };
    // A single-element array carries no separate id.
    let id = if items.len() > 1 {
        match &items[0] {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    } else {
        None
    };

    let mut outcome = match last {
        Value::Array(_) => TradeOutcome::forfeit(stake),
        other => TradeOutcome::normalize(other, stake),
    };
    let explicit_id = matches!(last, Value::Object(map) if object_id(map).is_some());
    if let (Some(id), false) = (id, explicit_id) {
        outcome.trade_id = id;
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bool_shapes() {
        let win = TradeOutcome::normalize(&json!(true), 1.0);
        assert!(win.is_win);
        assert_eq!(win.profit, 0.0);

        let loss = TradeOutcome::normalize(&json!(false), 2.0);
        assert!(!loss.is_win);
        assert_eq!(loss.profit, -2.0);
    }

    #[test]
    fn numeric_profit() {
        let o = TradeOutcome::normalize(&json!(0.92), 1.0);
        assert!(o.is_win);
        assert!((o.profit - 0.92).abs() < 1e-12);

        let o = TradeOutcome::normalize(&json!(-1), 1.0);
        assert!(!o.is_win);
        assert_eq!(o.profit, -1.0);
    }

    #[test]
    fn string_verdicts_and_numbers() {
        assert!(TradeOutcome::normalize(&json!("WIN"), 1.0).is_win);
        assert_eq!(TradeOutcome::normalize(&json!("lost"), 1.0).profit, -1.0);
        let draw = TradeOutcome::normalize(&json!("draw"), 1.0);
        assert!(!draw.is_win);
        assert_eq!(draw.profit, 0.0);
        assert_eq!(TradeOutcome::normalize(&json!("1.5"), 1.0).profit, 1.5);
    }

    #[test]
    fn structured_result() {
        let raw = json!({
            "id": "abc-123",
            "result": "win",
            "profit": 0.85,
            "openPrice": 1.0812,
            "closePrice": 1.0820,
        });
        let o = TradeOutcome::normalize(&raw, 1.0);
        assert!(o.is_win);
        assert_eq!(o.trade_id, "abc-123");
        assert_eq!(o.open_price, Some(1.0812));
        assert_eq!(o.close_price, Some(1.0820));
    }

    #[test]
    fn structured_loss_without_profit_forfeits_stake() {
        let o = TradeOutcome::normalize(&json!({"status": "loss"}), 3.0);
        assert!(!o.is_win);
        assert_eq!(o.profit, -3.0);
    }

    #[test]
    fn id_and_payload_tuple() {
        let raw = json!(["t-9", {"result": "loss", "profit": -1.0}]);
        let o = TradeOutcome::normalize(&raw, 1.0);
        assert!(!o.is_win);
        assert_eq!(o.trade_id, "t-9");
    }

    #[test]
    fn unrecognized_shapes_are_full_losses() {
        for raw in [
            json!(null),
            json!("maybe"),
            json!({"foo": "bar"}),
            json!([]),
            json!([[true]]),
        ] {
            let o = TradeOutcome::normalize(&raw, 1.0);
            assert!(!o.is_win, "shape {raw} must not be a win");
            assert_eq!(o.profit, -1.0, "shape {raw} must forfeit the stake");
        }
    }

    #[test]
    fn win_verdict_with_non_positive_profit_is_not_a_win() {
        let o = TradeOutcome::normalize(&json!({"result": "win", "profit": 0.0}), 1.0);
        assert!(!o.is_win);
    }

    #[test]
    fn missing_id_gets_generated() {
        let a = TradeOutcome::normalize(&json!(true), 1.0);
        let b = TradeOutcome::normalize(&json!(true), 1.0);
        assert!(!a.trade_id.is_empty());
        assert_ne!(a.trade_id, b.trade_id);
    }
}

use std::time::Duration;

use chrono::{DateTime, Utc};

/// One-trade-at-a-time lock.
///
/// Holds the instant until which no new order may be placed. Owned by the
/// orchestrator, which is its only writer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TradeGate {
    expiry: Option<DateTime<Utc>>,
}

impl TradeGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        self.expiry
    }

    /// True when a new order may be placed at `now`.
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        match self.expiry {
            Some(expiry) => now >= expiry,
            None => true,
        }
    }

    /// Time left until the gate opens, zero when already open.
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        self.expiry
            .and_then(|expiry| (expiry - now).to_std().ok())
            .unwrap_or(Duration::ZERO)
    }

    /// Close the gate until `placed_at + duration + margin`. Returns the new
    /// expiry.
    pub fn lock(&mut self, placed_at: DateTime<Utc>, duration: Duration, margin: Duration) -> DateTime<Utc> {
        let hold = chrono::Duration::from_std(duration + margin).unwrap_or(chrono::Duration::MAX);
        let expiry = placed_at.checked_add_signed(hold).unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.expiry = Some(expiry);
        expiry
    }

    /// Put back an expiry saved before `lock`. Used when the order the lock
    /// was taken for never reached the broker.
    pub fn restore(&mut self, expiry: Option<DateTime<Utc>>) {
        self.expiry = expiry;
    }
}

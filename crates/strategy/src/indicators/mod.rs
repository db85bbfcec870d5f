//! Column-wise technical indicators.
//!
//! Every function returns one value per input candle. Values that need more
//! history than is available are `None`, never zero.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod macd;
pub mod moving;
pub mod rsi;
pub mod stochastic;

pub use adx::adx;
pub use atr::{atr, true_range};
pub use bollinger::{BollingerIndicator, BollingerSeries};
pub use macd::{MacdIndicator, MacdSeries};
pub use moving::{ema, ema_opt, rolling_std, sma, sma_opt};
pub use rsi::RsiIndicator;
pub use stochastic::{StochasticIndicator, StochasticSeries};

pub mod rest;

pub use rest::{parse_candles, BrokerClient};

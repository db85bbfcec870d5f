pub mod broker;
pub mod executor;
pub mod journal;
pub mod orchestrator;

pub use broker::BrokerClient;
pub use executor::{Placement, TradeExecutor};
pub use journal::SqliteJournal;
pub use orchestrator::{CycleOutcome, OrchestratorHandle, TradingOrchestrator};

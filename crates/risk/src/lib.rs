pub mod consensus;
pub mod gate;

pub use consensus::{ConsensusResolver, Decision};
pub use gate::TradeGate;

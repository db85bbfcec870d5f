mod continuation;
mod fibonacci;
mod stochastic;
mod structure;

pub use continuation::Continuation;
pub use fibonacci::FibonacciRetracement;
pub use stochastic::StochasticTrend;
pub use structure::StructureChange;

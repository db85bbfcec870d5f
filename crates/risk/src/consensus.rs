use tracing::{info, warn};

use common::{Action, Signal};

/// Result of arbitrating one cycle's signals for a pair.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// All opinions agree; the first one in evaluation order wins.
    Trade(Signal),
    /// Strategies disagree on direction. Not an error.
    Veto { buys: usize, sells: usize },
    /// Every strategy abstained.
    NoSignal,
}

impl Decision {
    pub fn signal(&self) -> Option<&Signal> {
        match self {
            Decision::Trade(signal) => Some(signal),
            _ => None,
        }
    }
}

/// Conservative arbitration: any disagreement is a veto, otherwise the first
/// signal in strategy order wins. There is no weighting or ranking.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsensusResolver;

impl ConsensusResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve `signals`, which must be in strategy-evaluation order. HOLD
    /// signals are ignored.
    pub fn resolve(&self, pair: &str, signals: &[Signal]) -> Decision {
        let buys: Vec<&Signal> = signals.iter().filter(|s| s.action == Action::Buy).collect();
        let sells: Vec<&Signal> = signals.iter().filter(|s| s.action == Action::Sell).collect();

        match (buys.first(), sells.first()) {
            (Some(_), Some(_)) => {
                warn!(
                    pair = %pair,
                    buys = buys.len(),
                    sells = sells.len(),
                    "Conflicting signals, trade vetoed"
                );
                Decision::Veto {
                    buys: buys.len(),
                    sells: sells.len(),
                }
            }
            (Some(winner), None) | (None, Some(winner)) => {
                info!(
                    pair = %pair,
                    action = %winner.action,
                    strategy = %winner.source,
                    agreeing = buys.len() + sells.len(),
                    "Consensus reached"
                );
                Decision::Trade((*winner).clone())
            }
            (None, None) => Decision::NoSignal,
        }
    }
}

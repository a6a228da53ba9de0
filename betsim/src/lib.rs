pub mod batch;
pub mod betting;
pub mod counting;
pub mod simulation;
pub mod strategy;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_enum_str::{Deserialize_enum_str, Serialize_enum_str};

/// Immutable options for a run. The caller is responsible for clamping
/// user input into the documented ranges before construction; the engine
/// assumes already-valid options.
#[derive(Clone, Copy, Debug)]
pub struct SimulationOptions {
    pub number_of_decks: u8,
    pub dealer_hits_soft_17: bool,
    pub payout_blackjack: f64,
    /// Percent of the shoe dealt before the cut card forces a reshuffle.
    pub penetration: f64,
    pub min_bet: f64,
    pub start_bet: f64,
    pub table_limit: f64,
    pub starting_bankroll: f64,
    /// Stop a simulation once this much of the bankroll is gone. 0 disables.
    pub max_loss: f64,
    pub hands_per_simulation: u64,
    pub simulation_count: u64,
    pub betting_system: BettingSystem,
    pub proportional_percent: f64,
    pub kelly_fraction: f64,
    pub count_multiplier: f64,
    /// Count every time the loss streak reaches exactly this length. 0 disables.
    pub reset_after_losses: u32,
    pub enable_counting: bool,
    pub use_true_count: bool,
    /// Ignore the hand limit and keep playing until the first winning hand.
    pub stop_after_next_win: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize_enum_str, Deserialize_enum_str)]
#[serde(rename_all = "kebab-case")]
pub enum BettingSystem {
    Flat,
    Martingale,
    TripleMartingale,
    ReverseMartingale,
    Proportional,
    Kelly,
    CountBased,
}

/// Cooperative stop signal shared by a batch caller and its workers.
/// Cancellation is checked between simulations, and additionally between
/// hands while a simulation is in stop-after-next-win mode.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn betting_system_parses_from_config_names() {
        assert_eq!(
            "triple-martingale".parse::<BettingSystem>().unwrap(),
            BettingSystem::TripleMartingale
        );
        assert_eq!(
            "count-based".parse::<BettingSystem>().unwrap(),
            BettingSystem::CountBased
        );
        assert_eq!("flat".parse::<BettingSystem>().unwrap(), BettingSystem::Flat);
        assert!("no-such-system".parse::<BettingSystem>().is_err());
    }

    #[test]
    fn cancellation_token_is_shared_between_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }
}

//! Bet sizing for the configured betting system.

use crate::counting::HiLoCounter;
use crate::simulation::SimulationState;
use crate::{BettingSystem, SimulationOptions};

/// House edge assumed by the Kelly sizing. The model bets a fixed
/// fraction of bankroll rather than deriving an edge from the count.
const KELLY_ASSUMED_EDGE: f64 = 0.01;

/// Sizes the bet for the upcoming hand from the active betting system and
/// the current state. The result is clamped into
/// `[min_bet, table_limit]` and never exceeds the bankroll.
pub fn compute_bet(
    options: &SimulationOptions,
    state: &SimulationState,
    counter: &HiLoCounter,
    cards_remaining: usize,
) -> f64 {
    let bet = match options.betting_system {
        BettingSystem::Flat => options.min_bet,
        BettingSystem::Martingale => loss_progression_bet(options, state.loss_streak, 2.0),
        BettingSystem::TripleMartingale => loss_progression_bet(options, state.loss_streak, 3.0),
        BettingSystem::ReverseMartingale => {
            (options.min_bet * 2.0f64.powi(state.win_streak as i32)).min(options.table_limit)
        }
        BettingSystem::Proportional => {
            let sized = (state.bankroll * options.proportional_percent / 100.0).floor();
            sized.max(options.min_bet)
        }
        BettingSystem::Kelly => {
            let fraction = (KELLY_ASSUMED_EDGE * options.kelly_fraction).min(1.0);
            (state.bankroll * fraction).floor().max(options.min_bet)
        }
        BettingSystem::CountBased => {
            let true_count = if options.use_true_count {
                counter.true_count(cards_remaining)
            } else {
                counter.running_count() as f64
            };
            let multiplier = (1.0 + true_count.floor())
                .min(options.count_multiplier)
                .max(1.0);
            (options.min_bet * multiplier)
                .floor()
                .min(options.table_limit)
                .max(options.min_bet)
        }
    };

    bet.min(options.table_limit)
        .max(options.min_bet)
        .min(state.bankroll)
}

/// Doubles (or triples) the base bet per consecutive loss, capped at the
/// table limit, and drops back to the base once the streak clears.
fn loss_progression_bet(options: &SimulationOptions, loss_streak: u32, base: f64) -> f64 {
    if loss_streak == 0 {
        options.min_bet
    } else {
        (options.min_bet * base.powi(loss_streak as i32)).min(options.table_limit)
    }
}

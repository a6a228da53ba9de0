pub mod hand;
pub mod shoe;

use crate::counting::HiLoCounter;
use crate::{betting, strategy, CancellationToken, SimulationOptions};

use rand::Rng;
use serde::Serialize;
use strum_macros::EnumIter;

use self::{hand::Hand, shoe::Shoe};

static FACE_VALUE_TO_BLACKJACK_VALUE: [u8; 13] = [11, 2, 3, 4, 5, 6, 7, 8, 9, 10, 10, 10, 10];

#[derive(Debug, Clone, Copy, PartialEq, EnumIter)]
pub enum Suit {
    Diamond = 0,
    Club,
    Heart,
    Spade,
}

/// Represents a card in the real world with a suit and a face value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Card {
    pub face_value: u8,
    pub suit: Suit,
}

impl Card {
    /// Blackjack value of the card: aces carry 11 until hand evaluation
    /// demotes them, and every ten-value face is worth 10.
    pub fn blackjack_value(&self) -> u8 {
        FACE_VALUE_TO_BLACKJACK_VALUE[(self.face_value - 1) as usize]
    }
}

/// Mutable state owned by one simulation for its whole duration.
#[derive(Debug, Clone, Copy)]
pub struct SimulationState {
    pub bankroll: f64,
    pub current_bet: f64,
    pub win_streak: u32,
    pub loss_streak: u32,
}

impl SimulationState {
    pub fn new(options: &SimulationOptions) -> Self {
        SimulationState {
            bankroll: options.starting_bankroll,
            current_bet: options.start_bet,
            win_streak: 0,
            loss_streak: 0,
        }
    }
}

/// Final record of a single simulation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimulationResult {
    pub final_bankroll: f64,
    pub hands_won: u64,
    pub hands_lost: u64,
    pub hands_pushed: u64,
    pub blackjacks: u64,
    pub hands_played: u64,
    /// Times the loss streak reached exactly `reset_after_losses`.
    pub loss_streak_hits: u64,
    pub hit_max_loss: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum HandOutcome {
    Blackjack,
    Win,
    Lose,
    Push,
}

impl HandOutcome {
    fn payout_multiplier(self, payout_blackjack: f64) -> f64 {
        match self {
            HandOutcome::Blackjack => payout_blackjack,
            HandOutcome::Win => 1.0,
            HandOutcome::Lose => -1.0,
            HandOutcome::Push => 0.0,
        }
    }

    fn is_win(self) -> bool {
        matches!(self, HandOutcome::Blackjack | HandOutcome::Win)
    }
}

/// Plays one full simulated sequence of hands against the stopping rules.
pub struct Simulator {
    options: SimulationOptions,
    shoe: Shoe,
    counter: HiLoCounter,
    state: SimulationState,
    player_hand: Hand,
    dealer_hand: Hand,
    result: SimulationResult,
}

impl Simulator {
    pub fn new<R: Rng>(options: &SimulationOptions, rng: &mut R) -> Self {
        let mut shoe = Shoe::new(options.number_of_decks, options.penetration);
        shoe.shuffle(rng);
        Simulator {
            options: *options,
            shoe,
            counter: HiLoCounter::new(options.enable_counting),
            state: SimulationState::new(options),
            player_hand: Hand::new(),
            dealer_hand: Hand::new(),
            result: SimulationResult::default(),
        }
    }

    /// Plays hand after hand until a stopping rule fires, then returns the
    /// simulation's result record.
    pub fn run<R: Rng>(mut self, rng: &mut R, token: &CancellationToken) -> SimulationResult {
        loop {
            if !self.options.stop_after_next_win
                && self.result.hands_played >= self.options.hands_per_simulation
            {
                break;
            }
            // A losing streak can hold this mode open indefinitely, so the
            // stop signal is honored per hand rather than per simulation.
            if self.options.stop_after_next_win && token.is_cancelled() {
                break;
            }
            if self.shoe.needs_reshuffle() {
                self.start_new_shoe(rng);
            }

            let bet = betting::compute_bet(
                &self.options,
                &self.state,
                &self.counter,
                self.shoe.remaining_cards(),
            );
            self.state.current_bet = bet;
            let outcome = self.play_hand();
            self.settle(bet, outcome);

            if self.state.bankroll <= 0.0 {
                self.state.bankroll = 0.0;
                break;
            }
            if self.options.max_loss > 0.0
                && self.options.starting_bankroll - self.state.bankroll >= self.options.max_loss
            {
                self.result.hit_max_loss = true;
                break;
            }
            if self.options.stop_after_next_win && outcome.is_win() {
                break;
            }
        }

        self.result.final_bankroll = self.state.bankroll;
        self.result
    }

    /// Deals and plays out a single hand, returning how it resolved.
    fn play_hand(&mut self) -> HandOutcome {
        self.player_hand.clear();
        self.dealer_hand.clear();

        // Deal order is player, player, up card, hole card. Every card
        // feeds the running count the moment it leaves the shoe.
        let card = self.draw();
        self.player_hand.receive_card(card);
        let card = self.draw();
        self.player_hand.receive_card(card);
        let up_card = self.draw();
        self.dealer_hand.receive_card(up_card);
        let hole_card = self.draw();
        self.dealer_hand.receive_card(hole_card);

        let dealer_up_value = up_card.blackjack_value();
        while let strategy::Decision::Hit =
            strategy::player_decision(self.player_hand.value(), dealer_up_value)
        {
            let card = self.draw();
            self.player_hand.receive_card(card);
            if self.player_hand.value() > 21 {
                break;
            }
        }

        // The dealer plays out even against a busted player hand.
        loop {
            let (total, is_soft) = self.dealer_hand.value_and_softness();
            if total > 21 {
                break;
            }
            if strategy::dealer_must_stand(total, is_soft, self.options.dealer_hits_soft_17) {
                break;
            }
            let card = self.draw();
            self.dealer_hand.receive_card(card);
        }

        let player_total = self.player_hand.value();
        let dealer_total = self.dealer_hand.value();
        if self.player_hand.is_blackjack() && !self.dealer_hand.is_blackjack() {
            HandOutcome::Blackjack
        } else if player_total > 21 {
            HandOutcome::Lose
        } else if dealer_total > 21 {
            HandOutcome::Win
        } else if player_total > dealer_total {
            HandOutcome::Win
        } else if player_total < dealer_total {
            HandOutcome::Lose
        } else {
            HandOutcome::Push
        }
    }

    /// Applies the outcome to the bankroll, streaks, and counters.
    fn settle(&mut self, bet: f64, outcome: HandOutcome) {
        self.state.bankroll += bet * outcome.payout_multiplier(self.options.payout_blackjack);

        match outcome {
            HandOutcome::Blackjack | HandOutcome::Win => {
                self.state.win_streak += 1;
                self.state.loss_streak = 0;
                self.result.hands_won += 1;
            }
            HandOutcome::Lose => {
                self.state.loss_streak += 1;
                self.state.win_streak = 0;
                self.result.hands_lost += 1;
            }
            HandOutcome::Push => {
                self.state.win_streak = 0;
                self.state.loss_streak = 0;
                self.result.hands_pushed += 1;
            }
        }
        if self.player_hand.is_blackjack() {
            self.result.blackjacks += 1;
        }
        self.result.hands_played += 1;

        if self.options.reset_after_losses > 0
            && self.state.loss_streak == self.options.reset_after_losses
        {
            self.result.loss_streak_hits += 1;
        }
    }

    fn draw(&mut self) -> Card {
        let card = self.shoe.deal_card().expect("dealt from an exhausted shoe");
        self.counter.observe(card);
        card
    }

    /// A fresh shuffle invalidates everything keyed to the old shoe: the
    /// running count and both streaks start over with it.
    fn start_new_shoe<R: Rng>(&mut self, rng: &mut R) {
        self.shoe.shuffle(rng);
        self.counter.reset();
        self.state.win_streak = 0;
        self.state.loss_streak = 0;
    }
}

/// Plays one simulation to completion with the supplied generator.
pub fn run_one<R: Rng>(options: &SimulationOptions, rng: &mut R) -> SimulationResult {
    run_one_with_token(options, rng, &CancellationToken::new())
}

/// Like [`run_one`], but honors a cancellation token at hand granularity
/// while the stop-after-next-win mode is active.
pub fn run_one_with_token<R: Rng>(
    options: &SimulationOptions,
    rng: &mut R,
    token: &CancellationToken,
) -> SimulationResult {
    Simulator::new(options, rng).run(rng, token)
}

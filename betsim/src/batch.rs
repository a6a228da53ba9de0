//! Runs batches of independent simulations and reduces their results.

use std::sync::mpsc;
use std::thread;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::simulation::{self, SimulationResult};
use crate::{CancellationToken, SimulationOptions};

/// Completed simulations between progress callback invocations.
const PROGRESS_REPORT_INTERVAL: u64 = 10;

/// Aggregated statistics over a batch of simulations.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchResult {
    pub simulations_run: u64,
    pub avg_final_bankroll: f64,
    /// Mean final bankroll minus the starting bankroll.
    pub expected_value: f64,
    /// Fraction of simulations that ended above the starting bankroll.
    pub profitable_rate: f64,
    pub hands_won: u64,
    pub hands_lost: u64,
    pub hands_pushed: u64,
    pub blackjacks: u64,
    pub hands_played: u64,
    pub simulations_hit_max_loss: u64,
    pub loss_streak_hits: u64,
    /// Raw per-simulation final bankrolls, in simulation order.
    pub final_bankrolls: Vec<f64>,
}

/// Runs `simulation_count` independent simulations across worker threads
/// and reduces their results.
///
/// A `number_of_threads` of 0 uses all available parallelism. Each
/// simulation owns a generator seeded from `seed` (or from entropy when
/// `None`) plus its index, so a fixed seed reproduces the batch exactly.
/// Workers check the cancellation token between simulations; the progress
/// callback runs on the calling thread only.
pub fn run_batch(
    options: &SimulationOptions,
    number_of_threads: usize,
    seed: Option<u64>,
    token: &CancellationToken,
    mut progress: Option<&mut dyn FnMut(u64, u64)>,
) -> BatchResult {
    let number_of_threads = resolve_number_of_threads(number_of_threads);
    let master_seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
    let total = options.simulation_count;

    let mut dispatched: Vec<Vec<u64>> = Vec::with_capacity(number_of_threads);
    for _ in 0..number_of_threads {
        dispatched.push(Vec::new());
    }
    for index in 0..total {
        dispatched[(index % number_of_threads as u64) as usize].push(index);
    }

    let (sender, receiver) = mpsc::channel();
    let mut threads = Vec::with_capacity(number_of_threads);
    for indices in dispatched {
        let sender = sender.clone();
        let token = token.clone();
        let options = *options;
        let thread = thread::spawn(move || {
            for index in indices {
                if token.is_cancelled() {
                    break;
                }
                let mut rng = StdRng::seed_from_u64(master_seed.wrapping_add(index));
                let result = simulation::run_one_with_token(&options, &mut rng, &token);
                if sender.send((index, result)).is_err() {
                    break;
                }
            }
        });
        threads.push(thread);
    }
    drop(sender);

    let mut collected: Vec<(u64, SimulationResult)> = Vec::with_capacity(total as usize);
    for (index, result) in receiver {
        collected.push((index, result));
        let completed = collected.len() as u64;
        if completed % PROGRESS_REPORT_INTERVAL == 0 || completed == total {
            if let Some(callback) = progress.as_mut() {
                callback(completed, total);
            }
        }
    }
    for thread in threads {
        let _ = thread.join();
    }

    // A fixed order keeps the floating-point reduction identical across
    // runs regardless of thread scheduling.
    collected.sort_by_key(|(index, _)| *index);
    let results: Vec<SimulationResult> =
        collected.into_iter().map(|(_, result)| result).collect();
    aggregate(options, &results)
}

fn resolve_number_of_threads(number_of_threads: usize) -> usize {
    if number_of_threads == 0 {
        match thread::available_parallelism() {
            Ok(parallelism) => parallelism.get(),
            Err(_) => 1,
        }
    } else {
        number_of_threads
    }
}

fn aggregate(options: &SimulationOptions, results: &[SimulationResult]) -> BatchResult {
    let mut batch = BatchResult {
        simulations_run: results.len() as u64,
        ..Default::default()
    };
    if results.is_empty() {
        return batch;
    }

    let mut total_final = 0.0;
    let mut profitable = 0u64;
    for result in results {
        total_final += result.final_bankroll;
        if result.final_bankroll > options.starting_bankroll {
            profitable += 1;
        }
        batch.hands_won += result.hands_won;
        batch.hands_lost += result.hands_lost;
        batch.hands_pushed += result.hands_pushed;
        batch.blackjacks += result.blackjacks;
        batch.hands_played += result.hands_played;
        batch.loss_streak_hits += result.loss_streak_hits;
        if result.hit_max_loss {
            batch.simulations_hit_max_loss += 1;
        }
        batch.final_bankrolls.push(result.final_bankroll);
    }
    batch.avg_final_bankroll = total_final / batch.simulations_run as f64;
    batch.expected_value = batch.avg_final_bankroll - options.starting_bankroll;
    batch.profitable_rate = profitable as f64 / batch.simulations_run as f64;
    batch
}

use betsim::{batch, CancellationToken};
use betsim_drivers::Config;

/// Runs the configured batch and prints the JSON summary to stdout.
pub fn run_batch_and_report(config: &Config) -> Result<(), String> {
    if config.options.min_bet <= 0.0 || config.options.start_bet <= 0.0 {
        return Err(String::from("Bets must be positive and non-zero"));
    }

    let options: betsim::SimulationOptions = config
        .options
        .clone()
        .try_into()
        .map_err(|error: serde::de::value::Error| error.to_string())?;

    let token = CancellationToken::new();
    let mut progress = |completed: u64, total: u64| {
        println!("Running simulations: {}/{}", completed, total);
    };
    let result = batch::run_batch(
        &options,
        config.simulator.number_of_threads,
        config.simulator.seed,
        &token,
        Some(&mut progress),
    );

    let summary = serde_json::to_string_pretty(&result).map_err(|error| error.to_string())?;
    println!("{}", summary);
    Ok(())
}

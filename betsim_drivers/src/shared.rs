use serde::{Deserialize, Serialize};
use std::fs;

/// Raw user-facing configuration. Field values are clamped into the
/// engine's accepted ranges during conversion, so an out-of-range config
/// runs with the nearest valid value instead of failing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub options: ConfigOptions,
    pub simulator: ConfigSimulator,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigOptions {
    pub number_of_decks: u8,
    pub dealer_hits_soft_17: bool,
    pub payout_blackjack: f64,
    pub penetration: f64,
    pub min_bet: f64,
    pub start_bet: f64,
    pub table_limit: f64,
    pub starting_bankroll: f64,
    pub max_loss: f64,
    pub hands_per_simulation: u64,
    pub simulation_count: u64,
    pub betting_system: String,
    pub proportional_percent: f64,
    pub kelly_fraction: f64,
    pub count_multiplier: f64,
    pub reset_after_losses: u32,
    pub enable_counting: bool,
    pub use_true_count: bool,
    pub stop_after_next_win: bool,
}

impl TryInto<betsim::SimulationOptions> for ConfigOptions {
    type Error = serde::de::value::Error;

    fn try_into(self) -> Result<betsim::SimulationOptions, Self::Error> {
        let options = betsim::SimulationOptions {
            number_of_decks: self.number_of_decks.clamp(1, 8),
            dealer_hits_soft_17: self.dealer_hits_soft_17,
            payout_blackjack: self.payout_blackjack,
            penetration: clamp_f64(self.penetration, 5.0, 100.0),
            min_bet: self.min_bet.max(1.0),
            start_bet: self.start_bet.max(1.0),
            table_limit: self.table_limit.max(1.0),
            starting_bankroll: self.starting_bankroll.max(0.0),
            max_loss: self.max_loss.max(0.0),
            hands_per_simulation: self.hands_per_simulation.max(1),
            simulation_count: self.simulation_count.max(1),
            betting_system: self.betting_system.parse()?,
            proportional_percent: clamp_f64(self.proportional_percent, 0.0, 100.0),
            kelly_fraction: clamp_f64(self.kelly_fraction, 0.0, 1.0),
            count_multiplier: self.count_multiplier.max(1.0),
            reset_after_losses: self.reset_after_losses,
            enable_counting: self.enable_counting,
            use_true_count: self.use_true_count,
            stop_after_next_win: self.stop_after_next_win,
        };

        Ok(options)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSimulator {
    /// 0 lets the engine use all available parallelism.
    pub number_of_threads: usize,
    /// Fixed master seed for reproducible batches. Omit for entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// f64::max/min pass NaN through to the other operand, so a NaN input
/// lands on the lower bound.
fn clamp_f64(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Reads the content of a given config file and parses it to a Config.
///
/// Panics if any error occurs.
pub fn parse_config_from_file(filename: &str) -> Config {
    let file_content = fs::read_to_string(filename).unwrap();
    serde_yaml::from_str(&file_content).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_typical_config_options() -> ConfigOptions {
        ConfigOptions {
            number_of_decks: 6,
            dealer_hits_soft_17: false,
            payout_blackjack: 1.5,
            penetration: 75.0,
            min_bet: 10.0,
            start_bet: 10.0,
            table_limit: 500.0,
            starting_bankroll: 1000.0,
            max_loss: 0.0,
            hands_per_simulation: 1000,
            simulation_count: 200,
            betting_system: String::from("martingale"),
            proportional_percent: 5.0,
            kelly_fraction: 0.5,
            count_multiplier: 4.0,
            reset_after_losses: 0,
            enable_counting: true,
            use_true_count: true,
            stop_after_next_win: false,
        }
    }

    #[test]
    fn can_convert_options() {
        let config_options = get_typical_config_options();
        let converted: betsim::SimulationOptions = config_options.try_into().unwrap();
        assert_eq!(converted.number_of_decks, 6);
        assert_eq!(converted.penetration, 75.0);
        assert_eq!(converted.betting_system, betsim::BettingSystem::Martingale);
    }

    #[test]
    fn should_return_error_when_converting_unknown_system() {
        let mut config_options = get_typical_config_options();
        config_options.betting_system = String::from("not a system");
        let convert_result: Result<betsim::SimulationOptions, serde::de::value::Error> =
            config_options.try_into();
        assert!(convert_result.is_err());
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let mut config_options = get_typical_config_options();
        config_options.number_of_decks = 12;
        config_options.penetration = 1.0;
        config_options.kelly_fraction = 3.0;
        config_options.min_bet = 0.0;
        config_options.simulation_count = 0;
        let converted: betsim::SimulationOptions = config_options.try_into().unwrap();
        assert_eq!(converted.number_of_decks, 8);
        assert_eq!(converted.penetration, 5.0);
        assert_eq!(converted.kelly_fraction, 1.0);
        assert_eq!(converted.min_bet, 1.0);
        assert_eq!(converted.simulation_count, 1);
    }

    #[test]
    fn config_parses_from_yaml() {
        let yaml = r#"
options:
  number_of_decks: 6
  dealer_hits_soft_17: true
  payout_blackjack: 1.5
  penetration: 75.0
  min_bet: 10.0
  start_bet: 10.0
  table_limit: 500.0
  starting_bankroll: 1000.0
  max_loss: 0.0
  hands_per_simulation: 1000
  simulation_count: 200
  betting_system: count-based
  proportional_percent: 5.0
  kelly_fraction: 0.5
  count_multiplier: 4.0
  reset_after_losses: 0
  enable_counting: true
  use_true_count: true
  stop_after_next_win: false
simulator:
  number_of_threads: 0
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.simulator.number_of_threads, 0);
        assert_eq!(config.simulator.seed, None);
        let converted: betsim::SimulationOptions = config.options.try_into().unwrap();
        assert_eq!(converted.betting_system, betsim::BettingSystem::CountBased);
        assert!(converted.dealer_hits_soft_17);
    }
}

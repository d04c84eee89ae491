//! Brick Breaker headless runner
//!
//! Plays the game on autopilot and prints the final frame as JSON.

use std::path::PathBuf;

use clap::Parser;

use brick_breaker::sim::{Command, GameEvent, GamePhase, GameState, TickInput, tick};
use brick_breaker::tuning::Tuning;

const DEFAULT_SEED: u64 = 0x5EED;
const DEFAULT_TICKS: u64 = 60 * 60 * 5;

#[derive(Parser, Debug)]
#[command(name = "brick-breaker")]
#[command(about = "Run the brick breaker simulation on autopilot and print the final frame")]
struct Args {
    /// JSON tuning file (defaults apply to missing fields)
    tuning: Option<PathBuf>,
    /// RNG seed for serve and launch directions
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
    /// Stop after this many ticks if the game is still running
    #[arg(long, default_value_t = DEFAULT_TICKS)]
    ticks: u64,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path),
        None => Ok(Tuning::default()),
    };
    let state = tuning.and_then(|tuning| GameState::with_tuning(args.seed, tuning));
    let mut state = match state {
        Ok(state) => state,
        Err(err) => {
            log::error!("{err}");
            std::process::exit(1);
        }
    };

    log::info!(
        "Brick Breaker (headless) starting, seed {}, up to {} ticks",
        args.seed,
        args.ticks
    );

    let mut input = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    while state.time_ticks < args.ticks {
        tick(&mut state, &input);
        input.commands.clear();

        for event in state.events() {
            match event {
                GameEvent::LevelCleared { level } => {
                    log::info!("Tick {}: cleared level {level}", state.time_ticks);
                }
                GameEvent::LifeLost { lives_left } => {
                    log::info!("Tick {}: ball lost, {lives_left} lives left", state.time_ticks);
                }
                _ => {}
            }
        }

        match state.phase {
            GamePhase::LevelCleared => input.commands.push(Command::AdvanceOrRestart),
            GamePhase::GameOver => break,
            _ => {}
        }
    }

    let snapshot = state.snapshot();
    log::info!(
        "Finished after {} ticks: level {}, score {}, lives {}, {} bricks standing",
        state.time_ticks,
        snapshot.level_index,
        snapshot.score,
        snapshot.lives,
        snapshot.live_bricks().count()
    );

    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("Failed to serialize snapshot: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["brick-breaker"]).unwrap();
        assert!(args.tuning.is_none());
        assert_eq!(args.seed, DEFAULT_SEED);
        assert_eq!(args.ticks, DEFAULT_TICKS);
    }

    #[test]
    fn test_args_full() {
        let args =
            Args::try_parse_from(["brick-breaker", "tuning.json", "--seed", "7", "--ticks", "100"])
                .unwrap();
        assert_eq!(args.tuning, Some(PathBuf::from("tuning.json")));
        assert_eq!(args.seed, 7);
        assert_eq!(args.ticks, 100);
    }

    #[test]
    fn test_args_reject_bad_seed() {
        assert!(Args::try_parse_from(["brick-breaker", "--seed", "abc"]).is_err());
        assert!(Args::try_parse_from(["brick-breaker", "--ticks", "-5"]).is_err());
    }
}

//! Command-line match simulator
//!
//! Plays whole matches against the built-in opponent with a scripted player,
//! either in bulk (`batch`), one at a time with the full log (`trace`), or by
//! replaying a saved command journal (`replay`).

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use pitpet_core::opponent;
use pitpet_core::petjack::{PetJackStage, PLAYER_HAND_CAP, STAND_THRESHOLD};
use pitpet_core::{Buff, CommandJournal, DuelConfig, DuelEngine, MatchOutcome, Phase, Ruleset};
use rayon::prelude::*;
use serde::Serialize;

type SimResult<T> = Result<T, Box<dyn Error>>;

#[derive(Parser)]
#[command(name = "pitpet-sim")]
#[command(about = "Simulate Pitpet duels", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON config file; missing fields fall back to the defaults
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: SimCommand,
}

#[derive(Subcommand)]
enum SimCommand {
    /// Play many seeded matches in parallel and print a JSON summary
    Batch {
        /// Number of matches
        #[arg(short, long, default_value = "1000")]
        matches: u32,

        /// First seed; match i uses seed + i
        #[arg(short, long, default_value = "0")]
        seed: u32,

        /// Bet placed before every match
        #[arg(short, long)]
        bet: Option<u32>,

        #[arg(short, long, value_enum, default_value = "greedy")]
        policy: Policy,
    },

    /// Play one match and print its log
    Trace {
        #[arg(short, long, default_value = "42")]
        seed: u32,

        #[arg(short, long)]
        bet: Option<u32>,

        #[arg(short, long, value_enum, default_value = "greedy")]
        policy: Policy,

        /// Write the SCALE-encoded command journal here
        #[arg(short, long, value_name = "FILE")]
        journal: Option<PathBuf>,
    },

    /// Replay a saved journal and print the final snapshot as JSON
    Replay {
        #[arg(value_name = "FILE")]
        journal: PathBuf,
    },
}

/// How the scripted player picks its row
#[derive(Clone, Copy, ValueEnum)]
enum Policy {
    /// Always the top row
    First,
    /// The row with the best expected damage
    Greedy,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchSummary {
    matches: u32,
    player_wins: u32,
    opponent_wins: u32,
    draws: u32,
    avg_rounds: f64,
    avg_final_coins: f64,
    avg_commands: f64,
}

struct MatchRecord {
    outcome: Option<MatchOutcome>,
    rounds: u32,
    coins: u32,
    commands: usize,
}

fn load_rules(path: Option<&Path>) -> SimResult<Ruleset> {
    let config = match path {
        Some(path) => DuelConfig::from_json(&fs::read_to_string(path)?)?,
        None => DuelConfig::default(),
    };
    Ok(Ruleset::new(config)?)
}

/// Drive `engine` until the match finishes or the player runs out of coins
fn autoplay(engine: &mut DuelEngine, policy: Policy) {
    while !engine.state().is_finished() {
        let state = engine.state();
        match state.phase {
            Phase::Idle if !state.can_spin() => break,
            Phase::Idle => {
                engine.spin();
            }
            Phase::Spun => {
                let row = match (policy, state.player_grid.as_ref()) {
                    (Policy::Greedy, Some(grid)) => {
                        opponent::choose_row(engine.rules(), grid, &state.player, &state.opponent)
                    }
                    _ => 0,
                };
                engine.choose_row(row as u8);
            }
            Phase::PetJack => {
                let Some(game) = state.petjack.as_ref() else {
                    break;
                };
                match game.stage {
                    PetJackStage::BuffChoice => {
                        engine.apply_petjack_buff(Buff::Crit);
                    }
                    PetJackStage::PlayerTurn
                        if game.player_total() < STAND_THRESHOLD
                            && game.player_hand.len() < PLAYER_HAND_CAP =>
                    {
                        engine.petjack_hit();
                    }
                    _ => {
                        engine.petjack_stand();
                    }
                }
            }
            other => {
                log::warn!("engine resting in {other:?}, stopping");
                break;
            }
        }
    }
}

fn play(rules: &Ruleset, seed: u32, bet: Option<u32>, policy: Policy) -> DuelEngine {
    let mut engine = DuelEngine::from_rules(rules.clone(), seed);
    if let Some(amount) = bet {
        engine.set_bet(amount);
    }
    autoplay(&mut engine, policy);
    engine
}

fn batch(rules: &Ruleset, matches: u32, seed: u32, bet: Option<u32>, policy: Policy) -> BatchSummary {
    let records: Vec<MatchRecord> = (0..matches)
        .into_par_iter()
        .map(|i| {
            let engine = play(rules, seed.wrapping_add(i), bet, policy);
            let state = engine.state();
            MatchRecord {
                outcome: state.outcome,
                rounds: state.round,
                coins: state.coins,
                commands: engine.journal().commands.len(),
            }
        })
        .collect();

    let mut summary = BatchSummary {
        matches,
        ..Default::default()
    };
    for record in &records {
        match record.outcome {
            Some(MatchOutcome::PlayerWin) => summary.player_wins += 1,
            Some(MatchOutcome::OpponentWin) => summary.opponent_wins += 1,
            Some(MatchOutcome::Draw) => summary.draws += 1,
            None => {}
        }
    }
    if !records.is_empty() {
        let n = records.len() as f64;
        summary.avg_rounds = records.iter().map(|r| r.rounds as f64).sum::<f64>() / n;
        summary.avg_final_coins = records.iter().map(|r| r.coins as f64).sum::<f64>() / n;
        summary.avg_commands = records.iter().map(|r| r.commands as f64).sum::<f64>() / n;
    }
    summary
}

fn main() -> SimResult<()> {
    env_logger::init();
    let cli = Cli::parse();
    let rules = load_rules(cli.config.as_deref())?;

    match cli.command {
        SimCommand::Batch {
            matches,
            seed,
            bet,
            policy,
        } => {
            log::info!("simulating {matches} matches from seed {seed}");
            let summary = batch(&rules, matches, seed, bet, policy);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        SimCommand::Trace {
            seed,
            bet,
            policy,
            journal,
        } => {
            let engine = play(&rules, seed, bet, policy);
            for line in &engine.state().log {
                println!("[R{}] {}", line.round, line.text);
            }
            if let Some(path) = journal {
                fs::write(&path, engine.journal().to_bytes())?;
                log::info!("journal written to {}", path.display());
            }
        }
        SimCommand::Replay { journal } => {
            let bytes = fs::read(&journal)?;
            let journal = CommandJournal::from_bytes(&bytes)?;
            let engine = DuelEngine::replay(rules, &journal);
            println!("{}", engine.snapshot().to_json_pretty()?);
        }
    }
    Ok(())
}

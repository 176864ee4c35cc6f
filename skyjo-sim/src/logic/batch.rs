//! Runs many independent games and folds their outcomes into per-player stats.

use log::{debug, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use skyjo_game::numbers::{mean, usize_to_f64};
use skyjo_game::{EngineConfig, GameError, GameOutcome, SkyjoGame, Strategy, game_seed, strategy_rng};

use crate::common::{RosterEntry, SimulationConfig};

/// Aggregated results for one seat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub name: String,
    pub strategy: String,
    pub games: usize,
    pub total_score: i64,
    pub mean_score: Option<f64>,
    pub min_score: Option<i32>,
    pub max_score: Option<i32>,
    /// Games with the lowest score at the table; ties credit every tied player.
    pub wins: usize,
    /// Games this player ended by revealing every card first.
    pub finishes: usize,
    /// Finishes that were penalized by doubling.
    pub doubled: usize,
}

impl PlayerSummary {
    fn new(entry: &RosterEntry) -> Self {
        Self {
            name: entry.name.clone(),
            strategy: entry.strategy.key().to_string(),
            games: 0,
            total_score: 0,
            mean_score: None,
            min_score: None,
            max_score: None,
            wins: 0,
            finishes: 0,
            doubled: 0,
        }
    }

    fn record(&mut self, score: i32) {
        self.games += 1;
        self.total_score += i64::from(score);
        self.min_score = Some(self.min_score.map_or(score, |min| min.min(score)));
        self.max_score = Some(self.max_score.map_or(score, |max| max.max(score)));
        self.mean_score = mean(self.total_score, self.games);
    }
}

/// A game aborted by a fatal rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameFailure {
    pub index: usize,
    pub seed: u64,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub index: usize,
    #[serde(flatten)]
    pub outcome: GameOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub seed: u64,
    pub rounds: usize,
    pub completed: usize,
    pub players: Vec<PlayerSummary>,
    pub mean_turns: Option<f64>,
    pub failures: Vec<GameFailure>,
    /// Individual games, kept only for verbose runs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub games: Vec<GameRecord>,
}

impl BatchSummary {
    #[must_use]
    pub fn failed(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Share of completed games won by `player`, in percent.
    #[must_use]
    pub fn win_rate(&self, player: &PlayerSummary) -> Option<f64> {
        if self.completed == 0 {
            return None;
        }
        Some(usize_to_f64(player.wins) / usize_to_f64(self.completed) * 100.0)
    }
}

/// Play one game of the batch with seeds derived from the batch seed.
///
/// # Errors
///
/// Returns the engine's [`GameError`] when the game aborts.
pub fn play_game(config: &SimulationConfig, index: usize) -> Result<GameOutcome, GameError> {
    let seed = game_seed(config.seed, index as u64);
    let roster: Vec<(String, Box<dyn Strategy + Send>)> = config
        .players
        .iter()
        .enumerate()
        .map(|(seat, entry)| {
            (
                entry.name.clone(),
                entry.strategy.create(strategy_rng(seed, seat)),
            )
        })
        .collect();
    let engine_config = EngineConfig {
        seed,
        max_turns: config.max_turns,
    };
    SkyjoGame::new(roster, engine_config)?.run()
}

/// Run every game of the batch. With `config.parallel` the games are spread
/// over the rayon pool; the summary is identical either way.
#[must_use]
pub fn run_batch(config: &SimulationConfig, keep_games: bool) -> BatchSummary {
    let outcomes: Vec<Result<GameOutcome, GameError>> = if config.parallel {
        (0..config.rounds)
            .into_par_iter()
            .map(|index| play_game(config, index))
            .collect()
    } else {
        (0..config.rounds)
            .map(|index| play_game(config, index))
            .collect()
    };
    summarize(config, outcomes, keep_games)
}

fn summarize(
    config: &SimulationConfig,
    outcomes: Vec<Result<GameOutcome, GameError>>,
    keep_games: bool,
) -> BatchSummary {
    let mut players: Vec<PlayerSummary> = config.players.iter().map(PlayerSummary::new).collect();
    let mut failures = Vec::new();
    let mut games = Vec::new();
    let mut total_turns = 0_i64;
    let mut completed = 0_usize;

    for (index, result) in outcomes.into_iter().enumerate() {
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(err) => {
                let seed = game_seed(config.seed, index as u64);
                warn!("game {index} (seed {seed}) aborted: {err}");
                failures.push(GameFailure {
                    index,
                    seed,
                    error: err.to_string(),
                });
                continue;
            }
        };
        completed += 1;
        total_turns += i64::from(outcome.turns);
        let winners = outcome.winners();
        for player in &mut players {
            let Some(&score) = outcome.scores.get(&player.name) else {
                continue;
            };
            player.record(score);
            if winners.contains(&player.name.as_str()) {
                player.wins += 1;
            }
            if outcome.finisher.as_deref() == Some(player.name.as_str()) {
                player.finishes += 1;
                if outcome.finisher_doubled {
                    player.doubled += 1;
                }
            }
        }
        if keep_games {
            games.push(GameRecord { index, outcome });
        }
    }
    debug!(
        "batch {}: {completed}/{} games completed",
        config.seed, config.rounds
    );

    BatchSummary {
        seed: config.seed,
        rounds: config.rounds,
        completed,
        players,
        mean_turns: mean(total_turns, completed),
        failures,
        games,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyjo_game::StrategyKind;
    use std::collections::BTreeMap;

    fn small_config(rounds: usize) -> SimulationConfig {
        SimulationConfig {
            rounds,
            seed: 99,
            ..SimulationConfig::default()
        }
    }

    fn outcome(scores: &[(&str, i32)], finisher: &str, doubled: bool) -> GameOutcome {
        GameOutcome {
            seed: 0,
            scores: scores
                .iter()
                .map(|(name, score)| ((*name).to_string(), *score))
                .collect::<BTreeMap<_, _>>(),
            finisher: Some(finisher.to_string()),
            finisher_doubled: doubled,
            turns: 10,
        }
    }

    #[test]
    fn summarize_tracks_extremes_wins_and_failures() {
        let config = SimulationConfig {
            players: vec![
                RosterEntry::new("a", StrategyKind::LocalOptimum),
                RosterEntry::new("b", StrategyKind::Random),
            ],
            ..small_config(3)
        };
        let outcomes = vec![
            Ok(outcome(&[("a", 10), ("b", 20)], "b", false)),
            Err(GameError::TurnLimitExceeded(5)),
            Ok(outcome(&[("a", 30), ("b", 30)], "a", true)),
        ];
        let summary = summarize(&config, outcomes, false);

        assert_eq!(summary.completed, 2);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].index, 1);
        assert_eq!(summary.failures[0].seed, game_seed(99, 1));
        assert!(summary.failed());

        let a = &summary.players[0];
        assert_eq!(a.mean_score, Some(20.0));
        assert_eq!((a.min_score, a.max_score), (Some(10), Some(30)));
        assert_eq!(a.wins, 2);
        assert_eq!((a.finishes, a.doubled), (1, 1));
        let b = &summary.players[1];
        assert_eq!(b.wins, 1);
        assert_eq!(summary.win_rate(b), Some(50.0));
        assert_eq!(summary.mean_turns, Some(10.0));
        assert!(summary.games.is_empty());
    }

    #[test]
    fn batches_are_deterministic_and_thread_independent() {
        let sequential = run_batch(&small_config(12), true);
        let parallel = run_batch(
            &SimulationConfig {
                parallel: true,
                ..small_config(12)
            },
            true,
        );
        assert_eq!(sequential, parallel);
        assert_eq!(sequential.completed, 12);
        assert_eq!(sequential.games.len(), 12);
        for player in &sequential.players {
            assert_eq!(player.games, 12);
        }
    }

    #[test]
    fn play_game_uses_per_game_seeds() {
        let config = small_config(2);
        let first = play_game(&config, 0).unwrap();
        assert_eq!(first.seed, game_seed(99, 0));
        assert_eq!(first, play_game(&config, 0).unwrap());
        assert_eq!(first.scores.len(), 3);
    }

    #[test]
    fn turn_cap_failures_are_reported_not_averaged() {
        let config = SimulationConfig {
            max_turns: 2,
            ..small_config(4)
        };
        let summary = run_batch(&config, false);
        assert_eq!(summary.completed, 0);
        assert_eq!(summary.failures.len(), 4);
        assert!(summary.players.iter().all(|p| p.mean_score.is_none()));
        assert_eq!(summary.mean_turns, None);
    }
}

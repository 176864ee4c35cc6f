//! Batch settings, loadable from a JSON file and overridden by CLI flags.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use skyjo_game::StrategyKind;
use skyjo_game::constants::DEFAULT_MAX_TURNS;

use super::roster::{RosterEntry, validate_roster};

pub const DEFAULT_ROUNDS: usize = 10_000;
pub const DEFAULT_SEED: u64 = 1337;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of independent games to play.
    pub rounds: usize,
    /// Batch seed; every game derives its own seed from it.
    pub seed: u64,
    pub players: Vec<RosterEntry>,
    pub max_turns: u32,
    /// Spread games over the rayon thread pool.
    pub parallel: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rounds: DEFAULT_ROUNDS,
            seed: DEFAULT_SEED,
            players: vec![
                RosterEntry::new("player1", StrategyKind::LocalOptimum),
                RosterEntry::new("player2", StrategyKind::Random),
                RosterEntry::new("player3", StrategyKind::LocalOptimum),
            ],
            max_turns: DEFAULT_MAX_TURNS,
            parallel: false,
        }
    }
}

impl SimulationConfig {
    /// # Errors
    ///
    /// Fails when the file cannot be read or is not a valid config.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    /// # Errors
    ///
    /// Fails for zero rounds, a zero turn cap, or an unusable roster.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.rounds > 0, "rounds must be at least 1");
        ensure!(self.max_turns > 0, "max_turns must be at least 1");
        validate_roster(&self.players).context("invalid players")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_mirror_the_stock_table() {
        let config = SimulationConfig::default();
        assert_eq!(config.rounds, 10_000);
        let keys: Vec<&str> = config.players.iter().map(|p| p.strategy.key()).collect();
        assert_eq!(keys, vec!["local", "random", "local"]);
        config.validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: SimulationConfig = serde_json::from_str(
            r#"{ "rounds": 25, "players": [{ "name": "solo", "strategy": "column" }] }"#,
        )
        .unwrap();
        assert_eq!(config.rounds, 25);
        assert_eq!(config.seed, DEFAULT_SEED);
        assert_eq!(config.players.len(), 1);
        assert_eq!(config.players[0].strategy, StrategyKind::ColumnFirst);
    }

    #[test]
    fn validate_rejects_degenerate_batches() {
        let mut config = SimulationConfig {
            rounds: 0,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_err());
        config.rounds = 1;
        config.players.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_reports_the_path() {
        let path = std::env::temp_dir().join("skyjo-sim-missing-config.json");
        let err = SimulationConfig::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("skyjo-sim-missing-config.json"));
    }
}

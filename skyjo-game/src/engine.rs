//! Turn loop driving one game from the deal to the final scores.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use log::debug;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{COLUMN_ROWS, DEFAULT_MAX_TURNS, MAX_PLAYERS};
use crate::deck;
use crate::error::GameError;
use crate::seed;
use crate::state::GameState;
use crate::strategy::Strategy;

/// Lifecycle of a single game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    Setup,
    Playing,
    LastRound,
    Scoring,
    Done,
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Setup => "setup",
            Self::Playing => "playing",
            Self::LastRound => "last round",
            Self::Scoring => "scoring",
            Self::Done => "done",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed of this game; the deck and every seat derive their own stream.
    pub seed: u64,
    /// Turns after which the game is abandoned.
    pub max_turns: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            max_turns: DEFAULT_MAX_TURNS,
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub const fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            max_turns: DEFAULT_MAX_TURNS,
        }
    }
}

/// Result of a completed game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub seed: u64,
    /// Final score per player, after reveal-all and the finisher rule.
    pub scores: BTreeMap<String, i32>,
    /// Player who revealed their whole grid first.
    pub finisher: Option<String>,
    pub finisher_doubled: bool,
    pub turns: u32,
}

impl GameOutcome {
    #[must_use]
    pub fn lowest_score(&self) -> Option<i32> {
        self.scores.values().copied().min()
    }

    /// Every player sharing the lowest score.
    #[must_use]
    pub fn winners(&self) -> Vec<&str> {
        let Some(best) = self.lowest_score() else {
            return Vec::new();
        };
        self.scores
            .iter()
            .filter(|&(_, &score)| score == best)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// Double the finisher's score unless it is the lowest at the table or not
/// positive. Returns whether the score was doubled.
pub fn apply_final_scoring(scores: &mut BTreeMap<String, i32>, finisher: Option<&str>) -> bool {
    let Some(finisher) = finisher else {
        return false;
    };
    let Some(&finisher_score) = scores.get(finisher) else {
        return false;
    };
    let lowest = scores.values().copied().min().unwrap_or(finisher_score);
    if finisher_score == lowest || finisher_score <= 0 {
        return false;
    }
    scores.insert(finisher.to_string(), finisher_score * 2);
    true
}

struct Seat {
    name: String,
    strategy: Box<dyn Strategy + Send>,
}

/// One game of Skyjo: owns the table and every seated strategy.
pub struct SkyjoGame {
    config: EngineConfig,
    state: GameState,
    seats: Vec<Seat>,
    rng: ChaCha20Rng,
    phase: GamePhase,
    current: usize,
    finisher: Option<usize>,
    remaining_turns: usize,
    turns: u32,
}

impl fmt::Debug for SkyjoGame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkyjoGame")
            .field("config", &self.config)
            .field("phase", &self.phase)
            .field("current", &self.current)
            .field("turns", &self.turns)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl SkyjoGame {
    /// Seat `roster` in order and shuffle a fresh deck from `config.seed`.
    ///
    /// # Errors
    ///
    /// Fails when the roster is empty, larger than the deck supports, or
    /// repeats a name.
    pub fn new(
        roster: Vec<(String, Box<dyn Strategy + Send>)>,
        config: EngineConfig,
    ) -> Result<Self, GameError> {
        let seats = Self::validate_roster(roster)?;
        let mut rng = seed::deck_rng(config.seed);
        let draw_stack = deck::generate_draw_stack(&mut rng);
        Ok(Self {
            config,
            state: GameState::new(draw_stack),
            seats,
            rng,
            phase: GamePhase::Setup,
            current: 0,
            finisher: None,
            remaining_turns: 0,
            turns: 0,
        })
    }

    /// Resume from a prepared table, e.g. a hand-built fixture. The roster
    /// must name the same players as `state`, in seating order. Play starts
    /// with the first seat.
    ///
    /// # Errors
    ///
    /// Fails on roster problems, when a roster name has no grid at that seat,
    /// or when a seated player has no strategy in the roster.
    pub fn from_state(
        state: GameState,
        roster: Vec<(String, Box<dyn Strategy + Send>)>,
        config: EngineConfig,
    ) -> Result<Self, GameError> {
        let seats = Self::validate_roster(roster)?;
        let seated: Vec<&str> = state.player_names().collect();
        if let Some(seat) = seats
            .iter()
            .enumerate()
            .find(|(index, seat)| seated.get(*index) != Some(&seat.name.as_str()))
            .map(|(_, seat)| seat)
        {
            return Err(GameError::UnknownPlayer(seat.name.clone()));
        }
        if let Some(&unclaimed) = seated.get(seats.len()) {
            return Err(GameError::UnknownPlayer(unclaimed.to_string()));
        }
        Ok(Self {
            config,
            state,
            seats,
            rng: seed::deck_rng(config.seed),
            phase: GamePhase::Playing,
            current: 0,
            finisher: None,
            remaining_turns: 0,
            turns: 0,
        })
    }

    fn validate_roster(
        roster: Vec<(String, Box<dyn Strategy + Send>)>,
    ) -> Result<Vec<Seat>, GameError> {
        if roster.is_empty() || roster.len() > MAX_PLAYERS {
            return Err(GameError::RosterSize {
                count: roster.len(),
                max: MAX_PLAYERS,
            });
        }
        let mut seen = HashSet::new();
        for (name, _) in &roster {
            if !seen.insert(name.as_str()) {
                return Err(GameError::DuplicatePlayer(name.clone()));
            }
        }
        Ok(roster
            .into_iter()
            .map(|(name, strategy)| Seat { name, strategy })
            .collect())
    }

    #[must_use]
    pub const fn phase(&self) -> GamePhase {
        self.phase
    }

    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub const fn turns(&self) -> u32 {
        self.turns
    }

    /// Name of the player whose turn is next.
    #[must_use]
    pub fn current_player(&self) -> &str {
        self.seats
            .get(self.current)
            .map_or("", |seat| seat.name.as_str())
    }

    fn expect_phase(&self, expected: GamePhase) -> Result<(), GameError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(GameError::WrongPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    fn enter(&mut self, phase: GamePhase) {
        debug!("game {}: {} -> {}", self.config.seed, self.phase, phase);
        self.phase = phase;
    }

    /// Deal every grid, apply the opening flips, start the discard stack and
    /// pick the starting player.
    ///
    /// # Errors
    ///
    /// Fails outside [`GamePhase::Setup`] or when a strategy asks for opening
    /// flips that are repeated or outside the grid.
    pub fn prepare(&mut self) -> Result<(), GameError> {
        self.expect_phase(GamePhase::Setup)?;
        for seat in &self.seats {
            self.state.deal_grid(&seat.name)?;
        }
        for seat in &mut self.seats {
            let [first, second] = seat.strategy.initial_flip_positions();
            let columns = self
                .state
                .grid(&seat.name)
                .map_or(0, crate::grid::Grid::column_count);
            for position in [first, second] {
                if position.column >= columns || position.row >= COLUMN_ROWS {
                    return Err(GameError::OutOfBounds { position, columns });
                }
            }
            if first == second {
                return Err(GameError::InvalidInitialFlips {
                    player: seat.name.clone(),
                    first,
                    second,
                });
            }
            self.state.flip_cards(&seat.name, &[first, second])?;
        }
        self.state.initialize_discard_stack()?;

        let scores = self.state.seated_scores();
        let top = scores.iter().map(|(_, score)| *score).max().unwrap_or(0);
        self.current = scores
            .iter()
            .position(|(_, score)| *score == top)
            .unwrap_or(0);
        debug!(
            "game {}: {} starts with {top} showing",
            self.config.seed,
            self.current_player()
        );
        self.enter(GamePhase::Playing);
        Ok(())
    }

    /// Play one turn for the current player.
    ///
    /// # Errors
    ///
    /// Fails outside the playing phases, when the turn cap is reached, or when
    /// the strategy's move breaks the rules.
    pub fn play_turn(&mut self) -> Result<(), GameError> {
        if !matches!(self.phase, GamePhase::Playing | GamePhase::LastRound) {
            return Err(GameError::WrongPhase {
                expected: GamePhase::Playing,
                actual: self.phase,
            });
        }
        if self.turns >= self.config.max_turns {
            return Err(GameError::TurnLimitExceeded(self.config.max_turns));
        }

        let seat_index = self.current;
        let seat = &mut self.seats[seat_index];
        let view = self.state.snapshot(&seat.name);
        let location = seat.strategy.choose_draw_location(&view);
        let drawn = self.state.peek(location)?;
        let mv = seat.strategy.choose_target_location(&view, drawn);
        self.state.apply_move(&seat.name, location, mv)?;

        let removed = self.state.remove_columns_with_identical_cards(&seat.name)?;
        if removed > 0 {
            debug!("{} cleared {removed} column(s)", seat.name);
        }
        if self.state.reshuffle_if_exhausted(&mut self.rng) {
            debug!(
                "game {}: draw stack reshuffled from discards ({} cards)",
                self.config.seed,
                self.state.draw_stack().len()
            );
        }
        let finished = self.state.player_has_finished(&seat.name)?;
        self.turns += 1;

        match self.phase {
            GamePhase::LastRound if self.finisher != Some(seat_index) => {
                self.remaining_turns = self.remaining_turns.saturating_sub(1);
                if self.remaining_turns == 0 {
                    self.enter(GamePhase::Scoring);
                }
            }
            GamePhase::Playing if finished => {
                debug!(
                    "game {}: {} revealed every card on turn {}",
                    self.config.seed, self.seats[seat_index].name, self.turns
                );
                self.finisher = Some(seat_index);
                self.remaining_turns = self.seats.len() - 1;
                if self.remaining_turns == 0 {
                    self.enter(GamePhase::Scoring);
                } else {
                    self.enter(GamePhase::LastRound);
                }
            }
            _ => {}
        }
        self.current = (self.current + 1) % self.seats.len();
        Ok(())
    }

    /// Reveal everything and compute the final scores.
    ///
    /// # Errors
    ///
    /// Fails unless the game has reached [`GamePhase::Scoring`].
    pub fn score(&mut self) -> Result<GameOutcome, GameError> {
        self.expect_phase(GamePhase::Scoring)?;
        self.state.reveal_all_cards();
        let mut scores = self.state.calculate_scores();
        let finisher = self.finisher.map(|index| self.seats[index].name.clone());
        let finisher_doubled = apply_final_scoring(&mut scores, finisher.as_deref());
        debug!(
            "game {}: final scores {scores:?} after {} turns (finisher doubled: {finisher_doubled})",
            self.config.seed, self.turns
        );
        self.enter(GamePhase::Done);
        Ok(GameOutcome {
            seed: self.config.seed,
            scores,
            finisher,
            finisher_doubled,
            turns: self.turns,
        })
    }

    /// Play the game to the end, preparing it first when still in setup.
    ///
    /// # Errors
    ///
    /// Returns the first [`GameError`] raised along the way.
    pub fn run(mut self) -> Result<GameOutcome, GameError> {
        if self.phase == GamePhase::Setup {
            self.prepare()?;
        }
        while matches!(self.phase, GamePhase::Playing | GamePhase::LastRound) {
            self.play_turn()?;
        }
        self.score()
    }
}

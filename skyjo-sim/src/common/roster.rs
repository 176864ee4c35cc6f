//! Parsing of `name=strategy` seat lists.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use skyjo_game::constants::MAX_PLAYERS;
use skyjo_game::{StrategyKind, UnknownStrategy};
use thiserror::Error;

use super::util::split_csv;

/// One seat at the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub name: String,
    pub strategy: StrategyKind,
}

impl RosterEntry {
    #[must_use]
    pub fn new(name: &str, strategy: StrategyKind) -> Self {
        Self {
            name: name.to_string(),
            strategy,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RosterError {
    #[error("roster is empty")]
    Empty,
    #[error("roster entry '{0}' must look like name=strategy")]
    Malformed(String),
    #[error(transparent)]
    Strategy(#[from] UnknownStrategy),
    #[error("player '{0}' is listed more than once")]
    Duplicate(String),
    #[error("roster has {count} players but at most {max} fit at one table")]
    TooLarge { count: usize, max: usize },
}

/// Parse `player1=local,player2=random` into seats, keeping the order given.
///
/// # Errors
///
/// Fails on malformed entries, unknown strategy keys, or a roster the engine
/// would reject.
pub fn parse_roster(spec: &str) -> Result<Vec<RosterEntry>, RosterError> {
    let entries = split_csv(spec)
        .into_iter()
        .map(|token| {
            let (name, key) = token
                .split_once('=')
                .ok_or_else(|| RosterError::Malformed(token.clone()))?;
            let name = name.trim();
            if name.is_empty() {
                return Err(RosterError::Malformed(token.clone()));
            }
            Ok(RosterEntry::new(name, key.parse()?))
        })
        .collect::<Result<Vec<_>, RosterError>>()?;
    validate_roster(&entries)?;
    Ok(entries)
}

/// # Errors
///
/// Fails when the roster is empty, too large, or repeats a name.
pub fn validate_roster(entries: &[RosterEntry]) -> Result<(), RosterError> {
    if entries.is_empty() {
        return Err(RosterError::Empty);
    }
    if entries.len() > MAX_PLAYERS {
        return Err(RosterError::TooLarge {
            count: entries.len(),
            max: MAX_PLAYERS,
        });
    }
    let mut seen = HashSet::new();
    for entry in entries {
        if !seen.insert(entry.name.as_str()) {
            return Err(RosterError::Duplicate(entry.name.clone()));
        }
    }
    Ok(())
}

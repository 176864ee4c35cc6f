pub mod config;
pub mod roster;
pub mod util;

pub use config::SimulationConfig;
pub use roster::{RosterEntry, parse_roster};
pub use util::report_timestamp;

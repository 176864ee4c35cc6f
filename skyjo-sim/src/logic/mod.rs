pub mod batch;
pub mod reports;

pub use batch::{BatchSummary, run_batch};

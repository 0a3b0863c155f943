//! Single-shot stock check: query every catalog entry, then notify once.

pub mod channels;
pub mod cli;
pub mod run;

pub use run::{run_once, ItemStatus, RunOptions, RunReport};

//! Output module for corpus reports
//!
//! This module handles loading corpus statistics from storage and printing
//! them for the `stats` command.

pub mod stats;

pub use stats::{load_statistics, print_statistics, CorpusStatistics};

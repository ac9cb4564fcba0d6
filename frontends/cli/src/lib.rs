//! Command-line frontend for scorecard
//!
//! - `cli` - argument definitions (clap)
//! - `config` - YAML config loading
//! - `commands` - submit, flush, pending, watch, criteria
//! - `logging` - tracing subscriber setup

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;

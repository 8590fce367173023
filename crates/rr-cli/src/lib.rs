//! Race records CLI library.
//!
//! This crate provides the command-line interface over the result engine.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, FilterArgs, OutputArgs, ResultsArgs, RosterArgs};
pub use config::Config;

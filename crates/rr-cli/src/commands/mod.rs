//! CLI subcommand implementations.

pub mod best;
pub mod normalize;
pub mod person;
pub mod roster;
pub mod util;

//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rr_core::{Category, CategoryMatch, Gender, RosterFilterCriteria};
use rr_sources::RosterProvider;

/// Best race results per participant.
///
/// Reads registration rosters and race-result histories from timing sites,
/// normalizes their distances and times, and ranks the fastest results.
#[derive(Debug, Parser)]
#[command(name = "rr", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show one participant's best result per distance and full history.
    Person {
        /// Given name.
        #[arg(long)]
        given: String,

        /// Family name.
        #[arg(long)]
        family: String,

        #[command(flatten)]
        results: ResultsArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Rank the best results of a filtered roster in one category.
    Best {
        /// Target category (42K, 21K, 15K, 10K, 5K).
        #[arg(long)]
        category: Category,

        /// Event name used in the saved file name.
        #[arg(long, default_value = "race")]
        race_name: String,

        #[command(flatten)]
        roster: RosterArgs,

        #[command(flatten)]
        filter: FilterArgs,

        #[command(flatten)]
        results: ResultsArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List the roster participants that pass the filter.
    Roster {
        #[command(flatten)]
        roster: RosterArgs,

        #[command(flatten)]
        filter: FilterArgs,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the canonical category of distance labels.
    Normalize {
        /// Raw distance labels.
        #[arg(required = true)]
        labels: Vec<String>,
    },
}

/// Where the roster comes from.
#[derive(Debug, Args)]
pub struct RosterArgs {
    /// Registration site layout of `--url`.
    #[arg(long, requires = "url", conflicts_with = "roster_file")]
    pub provider: Option<RosterProvider>,

    /// Registration page URL.
    #[arg(long, requires = "provider")]
    pub url: Option<String>,

    /// Read the roster from a CSV file.
    #[arg(long, required_unless_present = "provider")]
    pub roster_file: Option<PathBuf>,
}

/// Where participant results come from.
#[derive(Debug, Args)]
pub struct ResultsArgs {
    /// Read results from a CSV file instead of the results site.
    #[arg(long)]
    pub results_file: Option<PathBuf>,
}

/// Roster filter options.
#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Earliest birth year (inclusive).
    #[arg(long)]
    pub min_year: Option<i32>,

    /// Latest birth year (inclusive).
    #[arg(long)]
    pub max_year: Option<i32>,

    /// Gender (male, female, or a site token such as ז / נ).
    #[arg(long)]
    pub gender: Option<Gender>,

    /// Registered race: a category (21K) or text contained in the label.
    #[arg(long)]
    pub race: Option<String>,
}

impl FilterArgs {
    pub fn criteria(&self) -> RosterFilterCriteria {
        RosterFilterCriteria {
            min_year: self.min_year,
            max_year: self.max_year,
            gender: self.gender,
            category: self.race.as_deref().map(CategoryMatch::parse),
        }
    }
}

/// Output options.
#[derive(Debug, Args)]
pub struct OutputArgs {
    /// Output as JSON.
    #[arg(long)]
    pub json: bool,

    /// Also save the report as CSV under the output directory.
    #[arg(long)]
    pub save: bool,
}

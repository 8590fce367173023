use std::io::Write;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use rr_core::{CategoryNormalizer, ParticipantIdentity};
use tracing_subscriber::EnvFilter;

use rr_cli::commands::best::BestQuery;
use rr_cli::commands::util::fetcher_if;
use rr_cli::commands::{best, normalize, person, roster};
use rr_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so JSON output on stdout stays clean.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    let normalizer = CategoryNormalizer::new(config.aliases.clone());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Some(Commands::Person {
            given,
            family,
            results,
            output,
        }) => {
            let fetcher = fetcher_if(results.needs_http(), &config)?;
            let source = results.source(fetcher.as_ref(), &config)?;
            let identity = ParticipantIdentity::new(given.as_str(), family.as_str());
            person::run(&mut out, &config, &normalizer, source.as_ref(), &identity, output)?;
        }
        Some(Commands::Best {
            category,
            race_name,
            roster,
            filter,
            results,
            output,
        }) => {
            let fetcher = fetcher_if(roster.needs_http() || results.needs_http(), &config)?;
            let roster_source = roster.source(fetcher.as_ref())?;
            let results_source = results.source(fetcher.as_ref(), &config)?;
            let criteria = filter.criteria();
            let query = BestQuery {
                category: *category,
                criteria: &criteria,
                race_name,
            };
            best::run(
                &mut out,
                &config,
                &normalizer,
                roster_source.as_ref(),
                results_source.as_ref(),
                &query,
                output,
            )?;
        }
        Some(Commands::Roster {
            roster: roster_args,
            filter,
            json,
        }) => {
            let fetcher = fetcher_if(roster_args.needs_http(), &config)?;
            let source = roster_args.source(fetcher.as_ref())?;
            roster::run(
                &mut out,
                &config,
                &normalizer,
                source.as_ref(),
                &filter.criteria(),
                *json,
            )?;
        }
        Some(Commands::Normalize { labels }) => {
            normalize::run(&mut out, &normalizer, labels)?;
        }
        None => {
            Cli::command().print_help()?;
        }
    }

    out.flush()?;
    Ok(())
}

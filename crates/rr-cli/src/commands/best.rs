//! `rr best`: rank a filtered roster's best results in one category.

use std::io::Write;

use anyhow::{Context, Result};
use rr_core::export::{OutputName, best_results_table};
use rr_core::{
    AggregateOptions, AggregateReport, Category, CategoryNormalizer, ResultSource,
    RosterFilterCriteria, SkipReason, aggregate, filter_roster,
};
use rr_sources::RosterSource;
use serde_json::json;

use crate::Config;
use crate::cli::OutputArgs;

/// What to rank and how to label the saved report.
#[derive(Debug)]
pub struct BestQuery<'a> {
    pub category: Category,
    pub criteria: &'a RosterFilterCriteria,
    pub race_name: &'a str,
}

pub fn run<W: Write>(
    writer: &mut W,
    config: &Config,
    normalizer: &CategoryNormalizer,
    roster: &dyn RosterSource,
    results: &dyn ResultSource,
    query: &BestQuery<'_>,
    output: &OutputArgs,
) -> Result<()> {
    let roster = roster.fetch_roster().context("failed to load roster")?;
    let participants = filter_roster(&roster, &config.roster_columns, query.criteria, normalizer)
        .context("roster is missing a required column")?;
    tracing::info!(
        participants = participants.len(),
        "looking up participants"
    );

    let options = AggregateOptions {
        lookup_timeout: config.lookup_timeout(),
        parallelism: config.parallelism,
        columns: config.result_columns.clone(),
        rules: config.selection.clone(),
    };
    let report = aggregate(&participants, query.category, results, normalizer, &options)?;

    if output.json {
        write_json(writer, &report)?;
    } else {
        write_text(writer, &report, participants.len())?;
    }

    if output.save && !report.is_empty() {
        let name = OutputName::now().best_results(
            query.race_name,
            query.category,
            query.criteria.min_year,
            query.criteria.max_year,
        );
        let path =
            super::util::save_table(&best_results_table(&report.rows), &config.output_dir, &name)?;
        if !output.json {
            writeln!(writer, "Saved to {}", path.display())?;
        }
    }
    Ok(())
}

fn participants_noun(count: usize) -> String {
    if count == 1 {
        "1 participant".to_string()
    } else {
        format!("{count} participants")
    }
}

fn skip_reason(reason: &SkipReason) -> String {
    match reason {
        SkipReason::Lookup(err) => err.to_string(),
        SkipReason::NoResultInCategory => "no result in category".to_string(),
    }
}

fn write_json<W: Write>(writer: &mut W, report: &AggregateReport) -> Result<()> {
    let skipped: Vec<_> = report
        .skipped
        .iter()
        .map(|skip| {
            json!({
                "participant": skip.participant,
                "reason": skip_reason(&skip.reason),
            })
        })
        .collect();
    let value = json!({
        "category": report.category,
        "results": best_results_table(&report.rows).to_json_records(),
        "skipped": skipped,
    });
    writeln!(writer, "{}", serde_json::to_string_pretty(&value)?)?;
    Ok(())
}

fn write_text<W: Write>(writer: &mut W, report: &AggregateReport, participants: usize) -> Result<()> {
    if participants == 0 {
        writeln!(writer, "No participants match the filter.")?;
        return Ok(());
    }
    if report.is_empty() {
        writeln!(
            writer,
            "No {} results found for {}.",
            report.category,
            participants_noun(participants)
        )?;
        return Ok(());
    }

    writeln!(writer, "Best {} results", report.category)?;
    for (rank, best) in report.rows.iter().enumerate() {
        writeln!(
            writer,
            "{:>3}. {:<10} {} {}  {}  {}",
            rank + 1,
            best.row.time_text(),
            best.row.given_name,
            best.row.family_name,
            best.row.event_date,
            best.row.event_name
        )?;
    }
    if !report.skipped.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "Skipped {}", participants_noun(report.skipped.len()))?;
        for skip in &report.skipped {
            writeln!(writer, "  {}: {}", skip.participant, skip_reason(&skip.reason))?;
        }
    }
    Ok(())
}

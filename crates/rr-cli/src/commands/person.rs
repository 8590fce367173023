//! `rr person`: one participant's best results and full history.

use std::io::Write;

use anyhow::{Context, Result};
use rr_core::export::{OutputName, best_results_table, person_report_table, results_table};
use rr_core::{
    CategoryNormalizer, LookupError, ParticipantIdentity, PersonReport, ResultSource,
    normalize_results,
};
use serde_json::json;

use crate::Config;
use crate::cli::OutputArgs;

pub fn run<W: Write>(
    writer: &mut W,
    config: &Config,
    normalizer: &CategoryNormalizer,
    source: &dyn ResultSource,
    identity: &ParticipantIdentity,
    output: &OutputArgs,
) -> Result<()> {
    let table = match source.fetch_results(identity, config.lookup_timeout()) {
        Ok(table) => table,
        Err(LookupError::NoData) => {
            writeln!(writer, "No results found for {identity}.")?;
            return Ok(());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("failed to fetch results for {identity}"));
        }
    };
    let rows = normalize_results(&table, &config.result_columns, normalizer)
        .with_context(|| format!("results for {identity} are malformed"))?;
    let report = PersonReport::new(rows, &config.selection);

    if output.json {
        let value = json!({
            "participant": identity,
            "best": best_results_table(&report.best).to_json_records(),
            "all": results_table(&report.all).to_json_records(),
        });
        writeln!(writer, "{}", serde_json::to_string_pretty(&value)?)?;
    } else {
        write_report(writer, identity, &report)?;
    }

    if output.save {
        let name = OutputName::person(&identity.given_name, &identity.family_name);
        let path = super::util::save_table(&person_report_table(&report), &config.output_dir, &name)?;
        if !output.json {
            writeln!(writer, "Saved to {}", path.display())?;
        }
    }
    Ok(())
}

fn write_report<W: Write>(
    writer: &mut W,
    identity: &ParticipantIdentity,
    report: &PersonReport,
) -> Result<()> {
    writeln!(writer, "Best results for {identity}")?;
    if report.best.is_empty() {
        writeln!(writer, "  (no timed results in a known category)")?;
    }
    for best in &report.best {
        writeln!(
            writer,
            "  {:<4} {:<10} {}  {}",
            best.category.label(),
            best.row.time_text(),
            best.row.event_date,
            best.row.event_name
        )?;
    }

    writeln!(writer)?;
    writeln!(writer, "All results ({})", report.all.len())?;
    for row in &report.all {
        let category = row.category().map_or("?", |c| c.label());
        writeln!(
            writer,
            "  {:<4} {:<10} {}  {}  [{}]",
            category,
            row.time_text(),
            row.event_date,
            row.event_name,
            row.distance_label
        )?;
    }
    Ok(())
}

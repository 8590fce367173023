//! Shaping results into output tables and naming output artifacts.

use chrono::{DateTime, Datelike, Local};

use crate::category::Category;
use crate::result::ResultRow;
use crate::selection::{BestResult, PersonReport};
use crate::table::Table;

pub const NORMALIZED_DISTANCE_COLUMN: &str = "normalized_distance";
pub const BEST_TIME_COLUMN: &str = "best_time";
pub const NOTE_COLUMN: &str = "note";

/// Blank rows between the best results and the full history.
const PERSON_REPORT_GAP: usize = 2;

/// Source columns in first-seen order across rows.
fn source_columns<'a>(rows: impl Iterator<Item = &'a ResultRow>) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        for (column, _) in &row.raw {
            if !columns.contains(column) {
                columns.push(column.clone());
            }
        }
    }
    columns
}

fn row_cells(row: &ResultRow, source: &[String], note: &str) -> Vec<String> {
    let mut cells: Vec<String> = source
        .iter()
        .map(|column| {
            row.raw
                .iter()
                .find(|(c, _)| c == column)
                .map(|(_, v)| v.clone())
                .unwrap_or_default()
        })
        .collect();
    cells.push(row.category().map(|c| c.to_string()).unwrap_or_default());
    cells.push(row.time_text().to_string());
    cells.push(note.to_string());
    cells
}

fn with_derived_columns(mut columns: Vec<String>) -> Vec<String> {
    columns.extend(
        [NORMALIZED_DISTANCE_COLUMN, BEST_TIME_COLUMN, NOTE_COLUMN].map(String::from),
    );
    columns
}

/// Renders best results with their source cells plus derived columns.
pub fn best_results_table(best: &[BestResult]) -> Table {
    let source = source_columns(best.iter().map(|b| &b.row));
    let rows = best
        .iter()
        .map(|b| row_cells(&b.row, &source, b.note()))
        .collect();
    Table::from_scraped(with_derived_columns(source), rows)
}

/// Renders rows in source order with the derived columns and no note.
pub fn results_table(rows: &[ResultRow]) -> Table {
    let source = source_columns(rows.iter());
    let cells = rows.iter().map(|row| row_cells(row, &source, "")).collect();
    Table::from_scraped(with_derived_columns(source), cells)
}

/// Renders a person report: best rows, a gap, then every row.
pub fn person_report_table(report: &PersonReport) -> Table {
    let source = source_columns(report.best.iter().map(|b| &b.row).chain(report.all.iter()));
    let columns = with_derived_columns(source.clone());
    let width = columns.len();

    let mut rows: Vec<Vec<String>> = report
        .best
        .iter()
        .map(|b| row_cells(&b.row, &source, b.note()))
        .collect();
    rows.extend(std::iter::repeat_n(vec![String::new(); width], PERSON_REPORT_GAP));
    rows.extend(report.all.iter().map(|row| row_cells(row, &source, "")));

    Table::from_scraped(columns, rows)
}

/// Builds output artifact names.
#[derive(Debug, Clone)]
pub struct OutputName {
    now: DateTime<Local>,
}

impl OutputName {
    pub const fn at(now: DateTime<Local>) -> Self {
        Self { now }
    }

    pub fn now() -> Self {
        Self::at(Local::now())
    }

    /// `{timestamp}_{race}_best_results_{category}{_youngest-oldest}`.
    ///
    /// The age suffix is only added when both birth-year bounds are known.
    pub fn best_results(
        &self,
        race: &str,
        category: Category,
        min_year: Option<i32>,
        max_year: Option<i32>,
    ) -> String {
        let timestamp = self.now.format("%Y_%m_%d_%H_%M_%S");
        let age_suffix = match (min_year, max_year) {
            (Some(min), Some(max)) => {
                let year = self.now.year();
                format!("_{}-{}", year - max, year - min)
            }
            _ => String::new(),
        };
        format!(
            "{timestamp}_{}_best_results_{category}{age_suffix}",
            sanitize(race)
        )
    }

    /// `{given}_{family}_results`.
    pub fn person(given_name: &str, family_name: &str) -> String {
        format!("{}_{}_results", sanitize(given_name), sanitize(family_name))
    }
}

/// Replaces path separators and whitespace so names are single path segments.
fn sanitize(part: &str) -> String {
    part.trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '-',
            c if c.is_whitespace() => '_',
            c => c,
        })
        .collect()
}

//! HTML table extraction.

use std::sync::LazyLock;

use rr_core::Table;
use scraper::{ElementRef, Html, Selector};

use crate::SourceError;

static HEAD_CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("thead th").expect("valid selector"));
static ANY_HEAD_CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("th").expect("valid selector"));
static BODY_ROW: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tbody tr").expect("valid selector"));
static ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").expect("valid selector"));
static CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").expect("valid selector"));

/// Text of an element with each text node trimmed and non-breaking spaces
/// turned into plain spaces.
fn cell_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .collect::<String>()
        .replace('\u{a0}', " ")
        .trim()
        .to_string()
}

fn row_cells(row: ElementRef<'_>) -> Vec<String> {
    row.select(&CELL).map(cell_text).collect()
}

/// Extracts the first table matching `selector`.
///
/// Headers come from `thead th` (or any `th` when there is no `thead`); rows
/// from `tbody tr`, skipping rows without data cells.
pub fn extract_table(html: &str, selector: &str) -> Result<Table, SourceError> {
    let table_selector = Selector::parse(selector).map_err(|err| SourceError::Selector {
        selector: selector.to_string(),
        reason: err.to_string(),
    })?;
    let document = Html::parse_document(html);
    let table = document
        .select(&table_selector)
        .next()
        .ok_or_else(|| SourceError::TableNotFound {
            selector: selector.to_string(),
        })?;

    let mut headers: Vec<String> = table.select(&HEAD_CELL).map(cell_text).collect();
    if headers.is_empty() {
        headers = table.select(&ANY_HEAD_CELL).map(cell_text).collect();
    }
    let rows: Vec<Vec<String>> = table
        .select(&BODY_ROW)
        .map(row_cells)
        .filter(|cells| !cells.is_empty())
        .collect();

    tracing::debug!(
        columns = headers.len(),
        rows = rows.len(),
        "extracted html table"
    );
    Ok(Table::from_scraped(headers, rows))
}

/// Collects the data cells of every row in the document, skipping rows
/// without `td` cells.
pub fn extract_rows(html: &str) -> Vec<Vec<String>> {
    Html::parse_document(html)
        .select(&ROW)
        .map(row_cells)
        .filter(|cells| !cells.is_empty())
        .collect()
}

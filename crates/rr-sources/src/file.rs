//! CSV file input and output.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rr_core::{LookupError, ParticipantIdentity, ResultColumns, ResultSource, Table};

use crate::{RosterSource, SourceError};

/// Reads a CSV file with a header row into a table.
///
/// Rows whose width differs from the header are rejected.
pub fn read_csv(path: &Path) -> Result<Table, SourceError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();
    let rows = reader
        .records()
        .map(|record| record.map(|r| r.iter().map(str::to_string).collect()))
        .collect::<Result<Vec<Vec<String>>, _>>()?;
    Ok(Table::new(columns, rows)?)
}

/// Writes a table as CSV with a header row.
pub fn write_csv(table: &Table, path: &Path) -> Result<(), SourceError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.cells())?;
    }
    writer.flush().map_err(csv::Error::from)?;
    tracing::debug!(path = %path.display(), rows = table.len(), "wrote csv");
    Ok(())
}

/// A roster read from a CSV file.
#[derive(Debug, Clone)]
pub struct CsvRoster {
    path: PathBuf,
}

impl CsvRoster {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RosterSource for CsvRoster {
    fn fetch_roster(&self) -> Result<Table, SourceError> {
        read_csv(&self.path)
    }
}

/// Results for many participants read from one CSV file.
///
/// Lookups return the rows whose name columns match the participant.
#[derive(Debug, Clone)]
pub struct CsvResults {
    table: Table,
    columns: ResultColumns,
}

impl CsvResults {
    pub const fn new(table: Table, columns: ResultColumns) -> Self {
        Self { table, columns }
    }

    pub fn open(path: &Path, columns: ResultColumns) -> Result<Self, SourceError> {
        Ok(Self::new(read_csv(path)?, columns))
    }
}

impl ResultSource for CsvResults {
    fn fetch_results(
        &self,
        identity: &ParticipantIdentity,
        _timeout: Duration,
    ) -> Result<Table, LookupError> {
        self.table.require_column(&self.columns.given_name)?;
        self.table.require_column(&self.columns.family_name)?;

        let mut table = self.table.clone();
        table.retain(|row| {
            identity.matches(
                row.get(&self.columns.given_name).unwrap_or_default(),
                row.get(&self.columns.family_name).unwrap_or_default(),
            )
        });
        if table.is_empty() {
            return Err(LookupError::NoData);
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    const RESULTS: &str = "\u{feff}שם פרטי,שם משפחה,מקצה,זמן אישי,תוצאה\n\
        דנה,כהן,10000,00:48:00,00:48:20\n\
        יואב,לוי,5000,00:21:00,\n\
        דנה,כהן,5000,00:23:00,\n";

    #[test]
    fn read_and_write_roundtrip_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("results.csv");
        fs::write(&input, RESULTS).unwrap();

        let table = read_csv(&input).unwrap();
        assert_eq!(table.columns()[0], "שם פרטי");
        assert_eq!(table.len(), 3);

        let output = dir.path().join("out.csv");
        write_csv(&table, &output).unwrap();
        assert_eq!(read_csv(&output).unwrap(), table);
    }

    #[test]
    fn ragged_csv_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bad.csv");
        fs::write(&input, "a,b\n1,2,3\n").unwrap();
        assert!(matches!(read_csv(&input), Err(SourceError::Table(_))));
    }

    #[test]
    fn csv_results_filter_by_participant() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("results.csv");
        fs::write(&input, RESULTS).unwrap();
        let source = CsvResults::open(&input, ResultColumns::default()).unwrap();

        let dana = source
            .fetch_results(&ParticipantIdentity::new("דנה", "כהן"), Duration::ZERO)
            .unwrap();
        assert_eq!(dana.len(), 2);

        let nobody = source.fetch_results(&ParticipantIdentity::new("x", "y"), Duration::ZERO);
        assert_eq!(nobody, Err(LookupError::NoData));
    }
}

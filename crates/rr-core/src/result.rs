//! Normalized result rows.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::category::{Category, CategoryNormalizer};
use crate::table::{RowRef, Table, TableError};
use crate::timing::{self, ElapsedTime};

/// Source column names for the fields the engine reads from a result table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultColumns {
    pub distance: String,
    pub personal_time: String,
    pub result_time: String,
    pub given_name: String,
    pub family_name: String,
    pub event_name: String,
    pub event_date: String,
}

impl Default for ResultColumns {
    fn default() -> Self {
        Self {
            distance: "מקצה".to_string(),
            personal_time: "זמן אישי".to_string(),
            result_time: "תוצאה".to_string(),
            given_name: "שם פרטי".to_string(),
            family_name: "שם משפחה".to_string(),
            event_name: "שם מרוץ".to_string(),
            event_date: "תאריך אירוע".to_string(),
        }
    }
}

/// A participant, identified by name.
///
/// Two different people with the same full name are indistinguishable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticipantIdentity {
    pub given_name: String,
    pub family_name: String,
}

impl ParticipantIdentity {
    pub fn new(given_name: impl Into<String>, family_name: impl Into<String>) -> Self {
        Self {
            given_name: given_name.into(),
            family_name: family_name.into(),
        }
    }

    /// Returns `true` if the names match after trimming.
    pub fn matches(&self, given_name: &str, family_name: &str) -> bool {
        self.given_name.trim() == given_name.trim() && self.family_name.trim() == family_name.trim()
    }
}

impl fmt::Display for ParticipantIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.given_name, self.family_name)
    }
}

/// One race appearance with its derived category and elapsed time.
///
/// The derived fields are computed from the raw fields at construction and
/// cannot be set directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub distance_label: String,
    pub given_name: String,
    pub family_name: String,
    pub event_name: String,
    pub event_date: String,
    pub personal_time: Option<String>,
    pub result_time: Option<String>,
    /// Every source cell, in source column order.
    pub raw: Vec<(String, String)>,
    category: Option<Category>,
    time_text: String,
    elapsed: ElapsedTime,
}

impl ResultRow {
    /// Builds a normalized row from a table row.
    ///
    /// Missing optional columns read as empty strings; missing time columns
    /// read as absent.
    pub fn from_row(row: RowRef<'_>, columns: &ResultColumns, normalizer: &CategoryNormalizer) -> Self {
        let text = |name: &str| row.get(name).unwrap_or_default().trim().to_string();
        let distance_label = text(&columns.distance);
        let personal_time = row.get(&columns.personal_time).map(str::to_string);
        let result_time = row.get(&columns.result_time).map(str::to_string);

        let category = normalizer.normalize_label(&distance_label);
        let (time_text, elapsed) = timing::resolve(personal_time.as_deref(), result_time.as_deref());

        Self {
            given_name: text(&columns.given_name),
            family_name: text(&columns.family_name),
            event_name: text(&columns.event_name),
            event_date: text(&columns.event_date),
            raw: row.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            distance_label,
            personal_time,
            result_time,
            category,
            time_text,
            elapsed,
        }
    }

    /// Canonical category; `None` when the label matched nothing.
    pub const fn category(&self) -> Option<Category> {
        self.category
    }

    /// The authoritative time text, empty when no field held a value.
    pub fn time_text(&self) -> &str {
        &self.time_text
    }

    pub const fn elapsed(&self) -> ElapsedTime {
        self.elapsed
    }

    /// Replaces the participant name, keeping the raw cells in sync.
    pub fn set_participant(&mut self, identity: &ParticipantIdentity, columns: &ResultColumns) {
        self.given_name.clone_from(&identity.given_name);
        self.family_name.clone_from(&identity.family_name);
        for (column, value) in &mut self.raw {
            if *column == columns.given_name {
                value.clone_from(&identity.given_name);
            } else if *column == columns.family_name {
                value.clone_from(&identity.family_name);
            }
        }
    }
}

/// Normalizes every row of a result table.
///
/// The table must carry the distance column and at least one of the two time
/// columns; anything else is a shape fault in the source.
pub fn normalize_results(
    table: &Table,
    columns: &ResultColumns,
    normalizer: &CategoryNormalizer,
) -> Result<Vec<ResultRow>, TableError> {
    table.require_column(&columns.distance)?;
    if table.column_index(&columns.personal_time).is_none() {
        table.require_column(&columns.result_time)?;
    }
    Ok(table
        .rows()
        .map(|row| ResultRow::from_row(row, columns, normalizer))
        .collect())
}

//! Roster filtering: which registered participants to look up.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::category::{Category, CategoryNormalizer};
use crate::result::ParticipantIdentity;
use crate::table::{Table, TableError};

/// Two-digit years above this are 19xx, the rest 20xx.
const TWO_DIGIT_YEAR_PIVOT: i32 = 25;

/// Source column names for roster fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterColumns {
    pub given_name: String,
    pub family_name: String,
    pub birth_year: String,
    pub gender: String,
    pub category: String,
}

impl Default for RosterColumns {
    fn default() -> Self {
        Self {
            given_name: "שם פרטי".to_string(),
            family_name: "שם משפחה".to_string(),
            birth_year: "שנת לידה".to_string(),
            gender: "מגדר".to_string(),
            category: "מקצה".to_string(),
        }
    }
}

/// Canonical gender vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Maps a source token to the canonical vocabulary.
    pub fn canonicalize(token: &str) -> Option<Self> {
        let token = token.trim();
        if token.eq_ignore_ascii_case("male") {
            return Some(Self::Male);
        }
        if token.eq_ignore_ascii_case("female") {
            return Some(Self::Female);
        }
        match token {
            "ז" | "זכר" => Some(Self::Male),
            "נ" | "נקבה" => Some(Self::Female),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::canonicalize(s).ok_or_else(|| format!("unknown gender: {s}"))
    }
}

/// Extracts a birth year from the formats rosters use.
///
/// Accepts `1985`, `1985.0`, `1985-03-15`, and `15/03/85` (day/month/year,
/// with two-digit years pivoted at 25). Anything else is `None`.
pub fn parse_birth_year(raw: &str) -> Option<i32> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if s.contains('/') {
        let year: i32 = s.split('/').nth(2)?.trim().parse().ok()?;
        return Some(expand_two_digit_year(year));
    }
    if let Ok(year) = s.parse::<i32>() {
        return Some(year);
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.year());
    }
    let (whole, fraction) = s.split_once('.')?;
    if fraction.bytes().all(|b| b == b'0') {
        return whole.parse().ok();
    }
    None
}

const fn expand_two_digit_year(year: i32) -> i32 {
    if year >= 100 {
        year
    } else if year > TWO_DIGIT_YEAR_PIVOT {
        1900 + year
    } else {
        2000 + year
    }
}

/// How a roster row's category is matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryMatch {
    /// Match rows whose label normalizes to this category. Labels in no
    /// known category match if they contain the category text.
    Canonical(Category),
    /// Case-insensitive substring of the raw label.
    Substring(String),
}

impl CategoryMatch {
    /// Canonical if `value` is one of the five category labels, substring otherwise.
    pub fn parse(value: &str) -> Self {
        value
            .parse()
            .map_or_else(|_| Self::Substring(value.to_string()), Self::Canonical)
    }

    fn matches(&self, raw_label: &str, normalizer: &CategoryNormalizer) -> bool {
        let needle = match self {
            Self::Canonical(category) => match normalizer.normalize_label(raw_label) {
                Some(found) => return found == *category,
                None => category.label(),
            },
            Self::Substring(text) => text.as_str(),
        };
        raw_label.to_lowercase().contains(&needle.to_lowercase())
    }
}

/// Roster filter. Unset fields impose no constraint; set fields are ANDed.
#[derive(Debug, Clone, Default)]
pub struct RosterFilterCriteria {
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    pub gender: Option<Gender>,
    pub category: Option<CategoryMatch>,
}

impl RosterFilterCriteria {
    const fn bounds_year(&self) -> bool {
        self.min_year.is_some() || self.max_year.is_some()
    }

    fn year_in_range(&self, year: Option<i32>) -> bool {
        if !self.bounds_year() {
            return true;
        }
        let Some(year) = year else {
            return false;
        };
        self.min_year.is_none_or(|min| year >= min) && self.max_year.is_none_or(|max| year <= max)
    }
}

/// Returns the participants passing `criteria`, in roster order.
///
/// The name columns are always required; the other columns only when the
/// matching criterion is set.
pub fn filter_roster(
    roster: &Table,
    columns: &RosterColumns,
    criteria: &RosterFilterCriteria,
    normalizer: &CategoryNormalizer,
) -> Result<Vec<ParticipantIdentity>, TableError> {
    let given_idx = roster.require_column(&columns.given_name)?;
    let family_idx = roster.require_column(&columns.family_name)?;
    let year_idx = criteria
        .bounds_year()
        .then(|| roster.require_column(&columns.birth_year))
        .transpose()?;
    let gender_idx = criteria
        .gender
        .map(|_| roster.require_column(&columns.gender))
        .transpose()?;
    let category_idx = criteria
        .category
        .as_ref()
        .map(|_| roster.require_column(&columns.category))
        .transpose()?;

    let mut selected = Vec::new();
    for row in roster.rows() {
        let cells = row.cells();
        if let Some(idx) = year_idx {
            if !criteria.year_in_range(parse_birth_year(&cells[idx])) {
                continue;
            }
        }
        if let (Some(idx), Some(gender)) = (gender_idx, criteria.gender) {
            if Gender::canonicalize(&cells[idx]) != Some(gender) {
                continue;
            }
        }
        if let (Some(idx), Some(category)) = (category_idx, &criteria.category) {
            if !category.matches(&cells[idx], normalizer) {
                continue;
            }
        }
        selected.push(ParticipantIdentity::new(
            cells[given_idx].trim(),
            cells[family_idx].trim(),
        ));
    }

    tracing::debug!(
        roster = roster.len(),
        selected = selected.len(),
        "filtered roster"
    );
    Ok(selected)
}

//! Best-result selection for a single participant.

use std::collections::{HashMap, HashSet};

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::result::ResultRow;

/// Note attached to every selected row.
pub const BEST_RESULT_NOTE: &str = "Best Result";

/// Which rows may take part in best selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionRules {
    /// Categories never compared.
    pub excluded_categories: HashSet<Category>,
    /// Raw labels never compared, matched after trimming.
    pub excluded_labels: HashSet<String>,
}

impl Default for SelectionRules {
    fn default() -> Self {
        Self {
            excluded_categories: HashSet::new(),
            // Relay and non-standard distances on the results site.
            excluded_labels: ["30000", "7000"].into_iter().map(String::from).collect(),
        }
    }
}

impl SelectionRules {
    fn admits(&self, row: &ResultRow) -> Option<(Category, Duration)> {
        let category = row.category()?;
        if self.excluded_categories.contains(&category)
            || self.excluded_labels.contains(row.distance_label.trim())
        {
            return None;
        }
        Some((category, row.elapsed().duration()?))
    }
}

/// The fastest row of one participant within one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestResult {
    pub category: Category,
    pub row: ResultRow,
}

impl BestResult {
    pub const fn note(&self) -> &'static str {
        BEST_RESULT_NOTE
    }

    /// The winning duration. Selection only admits recorded times.
    pub fn duration(&self) -> Option<Duration> {
        self.row.elapsed().duration()
    }
}

/// Picks the fastest row per category, ordered 42K, 21K, 15K, 10K, 5K.
///
/// Rows with no category, an excluded category or label, or no recorded time
/// are skipped. Ties keep the first row seen.
pub fn select_best(rows: &[ResultRow], rules: &SelectionRules) -> Vec<BestResult> {
    let mut best: HashMap<Category, (usize, Duration)> = HashMap::new();
    for (idx, row) in rows.iter().enumerate() {
        let Some((category, duration)) = rules.admits(row) else {
            continue;
        };
        best.entry(category)
            .and_modify(|current| {
                if duration < current.1 {
                    *current = (idx, duration);
                }
            })
            .or_insert((idx, duration));
    }

    let mut selected: Vec<(Category, usize)> =
        best.into_iter().map(|(category, (idx, _))| (category, idx)).collect();
    selected.sort_by_key(|(category, _)| *category);

    selected
        .into_iter()
        .map(|(category, idx)| BestResult {
            category,
            row: rows[idx].clone(),
        })
        .collect()
}

/// Picks the fastest row of a single category.
pub fn best_in_category(
    rows: &[ResultRow],
    category: Category,
    rules: &SelectionRules,
) -> Option<BestResult> {
    let mut best: Option<(usize, Duration)> = None;
    for (idx, row) in rows.iter().enumerate() {
        match rules.admits(row) {
            Some((c, duration)) if c == category => {
                if best.is_none_or(|(_, current)| duration < current) {
                    best = Some((idx, duration));
                }
            }
            _ => {}
        }
    }
    best.map(|(idx, _)| BestResult {
        category,
        row: rows[idx].clone(),
    })
}

/// One participant's best results alongside their full history.
#[derive(Debug, Clone)]
pub struct PersonReport {
    pub best: Vec<BestResult>,
    pub all: Vec<ResultRow>,
}

impl PersonReport {
    pub fn new(all: Vec<ResultRow>, rules: &SelectionRules) -> Self {
        let best = select_best(&all, rules);
        Self { best, all }
    }
}

//! Canonical race categories and the label normalizer.
//!
//! Timing sites label distances in meters ("10000"), in Hebrew ("10 ק\"מ",
//! "חצי מרתון"), or already canonically ("21K"). [`CategoryNormalizer`] folds
//! all of them into [`Category`]; labels it cannot place are `None`.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Canonical race distance.
///
/// Variant order is the presentation priority: longest distance first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Marathon,
    HalfMarathon,
    FifteenK,
    TenK,
    FiveK,
}

impl Category {
    /// All categories in presentation order.
    pub const ALL: [Self; 5] = [
        Self::Marathon,
        Self::HalfMarathon,
        Self::FifteenK,
        Self::TenK,
        Self::FiveK,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Marathon => "42K",
            Self::HalfMarathon => "21K",
            Self::FifteenK => "15K",
            Self::TenK => "10K",
            Self::FiveK => "5K",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

impl Serialize for Category {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for strings that are not one of the canonical category labels.
#[derive(Debug, Clone)]
pub struct UnknownCategory(String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown category: {} (expected 42K, 21K, 15K, 10K or 5K)", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

/// Exact-match label aliases for the categories that need them.
///
/// 15K and 5K are recognized by substring rules instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AliasSets {
    pub ten_k: HashSet<String>,
    pub half_marathon: HashSet<String>,
    pub marathon: HashSet<String>,
}

impl Default for AliasSets {
    fn default() -> Self {
        fn set(values: &[&str]) -> HashSet<String> {
            values.iter().map(ToString::to_string).collect()
        }
        Self {
            ten_k: set(&["10 ק\"מ", "10ק\"מ", "9800", "10000", "10 קמ"]),
            half_marathon: set(&[
                "21097",
                "21 ק\"מ",
                "21000",
                "21K",
                "21k",
                "חצי מרתון",
                "חצי מרתון תחרותי",
                "חצי-מרתון",
                "חצי_מרתון",
            ]),
            marathon: set(&["42195", "42K", "42k"]),
        }
    }
}

/// Maps raw distance labels to canonical categories.
///
/// Total and deterministic: a label that matches nothing is `None`, never an
/// error.
#[derive(Debug, Clone, Default)]
pub struct CategoryNormalizer {
    aliases: AliasSets,
}

impl CategoryNormalizer {
    pub const fn new(aliases: AliasSets) -> Self {
        Self { aliases }
    }

    /// Classifies a raw label. Rules are ordered and the first match wins,
    /// since the substring rules overlap ("15" contains "5").
    pub fn normalize(&self, raw: Option<&str>) -> Option<Category> {
        let s = raw?.trim();
        if s.is_empty() {
            return None;
        }
        if self.aliases.ten_k.contains(s) {
            return Some(Category::TenK);
        }
        if self.aliases.half_marathon.contains(s) {
            return Some(Category::HalfMarathon);
        }
        if self.aliases.marathon.contains(s) {
            return Some(Category::Marathon);
        }
        if s.contains("15") {
            return Some(Category::FifteenK);
        }
        // "2" guards against 25K-style labels; "2.5K" and "52K" fall through too.
        if s.contains('5') && !s.contains('2') {
            return Some(Category::FiveK);
        }
        None
    }

    /// Convenience for non-optional input.
    pub fn normalize_label(&self, raw: &str) -> Option<Category> {
        self.normalize(Some(raw))
    }
}

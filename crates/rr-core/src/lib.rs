//! Core domain logic for race records.
//!
//! This crate contains the result normalization and best-selection engine:
//! - Category normalization: folding raw distance labels into canonical categories
//! - Time resolution: choosing and parsing the authoritative elapsed time
//! - Best selection: the fastest result per category for one participant
//! - Roster filtering and cross-participant aggregation

pub mod aggregate;
pub mod category;
pub mod export;
pub mod result;
pub mod roster;
pub mod selection;
pub mod table;
pub mod timing;

pub use aggregate::{
    AggregateError, AggregateOptions, AggregateReport, LookupError, ResultSource, Skip,
    SkipReason, aggregate,
};
pub use category::{AliasSets, Category, CategoryNormalizer, UnknownCategory};
pub use result::{ParticipantIdentity, ResultColumns, ResultRow, normalize_results};
pub use roster::{
    CategoryMatch, Gender, RosterColumns, RosterFilterCriteria, filter_roster, parse_birth_year,
};
pub use selection::{BestResult, PersonReport, SelectionRules, best_in_category, select_best};
pub use table::{RowRef, Table, TableError};
pub use timing::ElapsedTime;

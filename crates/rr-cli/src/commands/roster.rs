//! `rr roster`: list the participants that pass a filter.

use std::io::Write;

use anyhow::{Context, Result};
use rr_core::{CategoryNormalizer, RosterFilterCriteria, filter_roster};
use rr_sources::RosterSource;

use crate::Config;

pub fn run<W: Write>(
    writer: &mut W,
    config: &Config,
    normalizer: &CategoryNormalizer,
    roster: &dyn RosterSource,
    criteria: &RosterFilterCriteria,
    json: bool,
) -> Result<()> {
    let roster = roster.fetch_roster().context("failed to load roster")?;
    let participants = filter_roster(&roster, &config.roster_columns, criteria, normalizer)
        .context("roster is missing a required column")?;

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&participants)?)?;
        return Ok(());
    }
    if participants.is_empty() {
        writeln!(writer, "No participants match the filter.")?;
        return Ok(());
    }
    for participant in &participants {
        writeln!(writer, "{participant}")?;
    }
    writeln!(writer, "{} of {} participants", participants.len(), roster.len())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use rr_core::{CategoryMatch, Table};
    use rr_sources::SourceError;

    struct FixedRoster(Result<Table, ()>);

    impl RosterSource for FixedRoster {
        fn fetch_roster(&self) -> Result<Table, SourceError> {
            self.0.clone().map_err(|()| SourceError::TableNotFound {
                selector: "table".to_string(),
            })
        }
    }

    fn roster() -> FixedRoster {
        let header = ["שם פרטי", "שם משפחה", "שנת לידה", "מגדר", "מקצה"]
            .map(String::from)
            .to_vec();
        let rows = [
            ["נועה", "לוי", "1990", "female", "חצי מרתון"],
            ["יוסי", "כהן", "1985", "male", "10 ק\"מ"],
            ["רון", "אברהם", "1972", "male", "21097"],
        ]
        .map(|r| r.map(String::from).to_vec())
        .to_vec();
        FixedRoster(Ok(Table::new(header, rows).unwrap()))
    }

    fn run_to_string(source: &FixedRoster, criteria: &RosterFilterCriteria, json: bool) -> Result<String> {
        let mut out = Vec::new();
        run(
            &mut out,
            &Config::default(),
            &CategoryNormalizer::default(),
            source,
            criteria,
            json,
        )?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn lists_matching_participants_in_roster_order() {
        let criteria = RosterFilterCriteria {
            category: Some(CategoryMatch::parse("21K")),
            ..RosterFilterCriteria::default()
        };
        let out = run_to_string(&roster(), &criteria, false).unwrap();
        assert_eq!(out, "נועה לוי\nרון אברהם\n2 of 3 participants\n");
    }

    #[test]
    fn json_lists_identities() {
        let criteria = RosterFilterCriteria {
            max_year: Some(1980),
            ..RosterFilterCriteria::default()
        };
        let out = run_to_string(&roster(), &criteria, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 1);
        assert_eq!(value[0]["family_name"], "אברהם");
    }

    #[test]
    fn missing_table_is_an_error() {
        let err = run_to_string(&FixedRoster(Err(())), &RosterFilterCriteria::default(), false)
            .unwrap_err();
        assert!(err.to_string().contains("failed to load roster"));
    }
}

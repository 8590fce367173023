//! `rr normalize`: show how raw distance labels are classified.

use std::io::Write;

use anyhow::Result;
use rr_core::CategoryNormalizer;

pub fn run<W: Write>(writer: &mut W, normalizer: &CategoryNormalizer, labels: &[String]) -> Result<()> {
    let width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    for label in labels {
        let category = normalizer
            .normalize_label(label)
            .map_or_else(|| "unknown".to_string(), |c| c.to_string());
        writeln!(writer, "{label:<width$}  {category}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    #[test]
    fn prints_category_per_label() {
        let labels = ["10000", "חצי מרתון", "15 ק\"מ", "2.5K", "42195"].map(String::from);
        let mut out = Vec::new();
        run(&mut out, &CategoryNormalizer::default(), &labels).unwrap();
        assert_snapshot!(String::from_utf8(out).unwrap(), @r#"
        10000      10K
        חצי מרתון  21K
        15 ק"מ     15K
        2.5K       unknown
        42195      42K
        "#);
    }
}

//! Run reporting
//!
//! A completed pass yields a [`MigrationReport`]: every file's outcome in
//! application order. Rendered as plain text for terminals or as JSON for
//! machine consumers.

use crate::reconcile::{FileOutcome, Outcome};
use serde::Serialize;
use std::str::FromStr;
use strum_macros::EnumString;

/// Output format for the report, parsed from `--format` or config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    /// Parse a format name, `None` for unknown values.
    pub fn parse(s: &str) -> Option<Self> {
        Self::from_str(s).ok()
    }
}

/// Outcome of one full migration pass.
#[derive(Debug, Serialize)]
pub struct MigrationReport {
    pub outcomes: Vec<FileOutcome>,
}

impl MigrationReport {
    pub fn applied(&self) -> usize {
        self.count(Outcome::Applied)
    }

    pub fn skipped(&self) -> usize {
        self.count(Outcome::Skipped)
    }

    fn count(&self, outcome: Outcome) -> usize {
        self.outcomes.iter().filter(|o| o.outcome == outcome).count()
    }

    /// Render for terminal display. Skipped files are listed only when
    /// `verbose` is set; the summary line always appears.
    pub fn to_text(&self, verbose: bool) -> String {
        let mut out = String::new();
        for o in &self.outcomes {
            if verbose || o.outcome == Outcome::Applied {
                out.push_str(&format!("{} {}\n", o.outcome, o.name));
            }
        }
        out.push_str(&format!(
            "{} migration(s): {} applied, {} skipped\n",
            self.outcomes.len(),
            self.applied(),
            self.skipped()
        ));
        out
    }

    /// Render as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> MigrationReport {
        MigrationReport {
            outcomes: vec![
                FileOutcome {
                    name: "v1_create.sql".to_string(),
                    outcome: Outcome::Skipped,
                },
                FileOutcome {
                    name: "v2_add_index.sql".to_string(),
                    outcome: Outcome::Applied,
                },
            ],
        }
    }

    #[test]
    fn test_counts() {
        let r = report();
        assert_eq!(r.applied(), 1);
        assert_eq!(r.skipped(), 1);
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(ReportFormat::parse("text"), Some(ReportFormat::Text));
        assert_eq!(ReportFormat::parse("json"), Some(ReportFormat::Json));
        assert_eq!(ReportFormat::parse("sarif"), None);
    }

    #[test]
    fn test_text_hides_skipped_unless_verbose() {
        let r = report();
        let quiet = r.to_text(false);
        assert!(!quiet.contains("v1_create.sql"));
        assert!(quiet.contains("applied v2_add_index.sql"));

        let verbose = r.to_text(true);
        assert!(verbose.contains("skipped v1_create.sql"));
    }

    #[test]
    fn test_text_snapshot() {
        insta::assert_snapshot!(report().to_text(true), @r###"
        skipped v1_create.sql
        applied v2_add_index.sql
        2 migration(s): 1 applied, 1 skipped
        "###);
    }

    #[test]
    fn test_json_shape() {
        let json = report().to_json().expect("serialize");
        let value: serde_json::Value = serde_json::from_str(&json).expect("parse");
        assert_eq!(value["outcomes"][0]["name"], "v1_create.sql");
        assert_eq!(value["outcomes"][0]["outcome"], "skipped");
        assert_eq!(value["outcomes"][1]["outcome"], "applied");
    }
}

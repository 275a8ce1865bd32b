//! Markdown renderings: build summary table and unreleased change report.

use std::env;
use std::fs::OpenOptions;
use std::io::Write;

use tracing::debug;

use crate::analyzer::UnreleasedChanges;
use crate::error::Result;

/// Value of one summary row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryValue {
    Text(String),
    /// One row per item; rows after the first have an empty key
    List(Vec<String>),
}

impl From<&str> for SummaryValue {
    fn from(value: &str) -> Self {
        SummaryValue::Text(value.to_string())
    }
}

impl From<String> for SummaryValue {
    fn from(value: String) -> Self {
        SummaryValue::Text(value)
    }
}

impl From<Vec<String>> for SummaryValue {
    fn from(values: Vec<String>) -> Self {
        SummaryValue::List(values)
    }
}

/// Two-column markdown table with the values in code spans.
///
/// ```
/// use git_buildinfo::report::{format_summary_table, SummaryValue};
///
/// let table = format_summary_table(&[("Version", SummaryValue::from("v1.2.0"))]);
/// assert_eq!(table, "| | |\n|-|-|\n| Version | `v1.2.0` |\n");
/// ```
pub fn format_summary_table(rows: &[(&str, SummaryValue)]) -> String {
    let mut out = String::from("| | |\n|-|-|\n");
    for (key, value) in rows {
        match value {
            SummaryValue::Text(text) => out.push_str(&format!("| {} | `{}` |\n", key, text)),
            SummaryValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    let key = if i == 0 { *key } else { "" };
                    out.push_str(&format!("| {} | `{}` |\n", key, item));
                }
            }
        }
    }
    out
}

/// Append `content` to the file named by the environment variable `env_name`.
///
/// Returns whether anything was written; an unset or empty variable is not an
/// error.
pub fn record_summary(env_name: &str, content: &str) -> Result<bool> {
    let path = match env::var(env_name) {
        Ok(path) if !path.is_empty() => path,
        _ => {
            debug!("{} is not set; summary not recorded", env_name);
            return Ok(false);
        }
    };

    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    file.write_all(content.as_bytes())?;
    debug!("summary appended to {}", path);
    Ok(true)
}

/// Markdown listing of unreleased merge requests and the issues they close
pub fn format_unreleased(changes: &UnreleasedChanges) -> String {
    let mut out = String::new();

    if changes.merge_requests.is_empty() {
        out.push_str("No merged merge requests since the last release.\n");
    } else {
        out.push_str("## Merge requests\n\n");
        for linked in &changes.merge_requests {
            let mr = &linked.merge_request;
            out.push_str(&format!("- #{} {}", mr.number, mr.title));
            if !linked.issues.is_empty() {
                let issues: Vec<String> = linked.issues.iter().map(|n| format!("#{}", n)).collect();
                out.push_str(&format!(" (closes {})", issues.join(", ")));
            }
            out.push('\n');
        }
    }

    if !changes.issues.is_empty() {
        out.push_str("\n## Issues\n\n");
        for issue in &changes.issues {
            out.push_str(&format!(
                "- #{} {} [{}]\n",
                issue.number,
                issue.title,
                issue.state.as_str()
            ));
        }
    }

    out
}

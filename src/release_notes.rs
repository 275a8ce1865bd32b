//! Release notes document handling
//!
//! The document is a sequence of sections, each opened by a `# <version>`
//! line:
//!
//! ```text
//! # v1.2.0
//!
//! - Faster parser
//!
//! # v1.1.0
//! ...
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::SemanticVersion;
use crate::error::{BuildInfoError, Result};

const HEADER: &str = "# ";

/// How a section label is matched against a target version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchMode {
    /// First section whose label is a textual prefix of the target
    Prefix,
    /// Section whose label equals the target
    Exact,
    /// Longest label that prefixes the target and ends on an identifier
    /// boundary (`.`, `-`, `+` or end of string)
    #[default]
    MostSpecific,
}

impl MatchMode {
    fn accepts(&self, label: &str, target: &str) -> bool {
        match self {
            MatchMode::Prefix => target.starts_with(label),
            MatchMode::Exact => target == label,
            MatchMode::MostSpecific => {
                target.starts_with(label)
                    && matches!(target[label.len()..].chars().next(), None | Some('.' | '-' | '+'))
            }
        }
    }
}

/// One `# <version>` section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub version: String,
    /// Body lines without surrounding blank lines or trailing whitespace
    pub lines: Vec<String>,
}

impl Section {
    pub fn text(&self) -> String {
        let mut text = self.lines.join("\n");
        if !text.is_empty() {
            text.push('\n');
        }
        text
    }
}

/// A parsed release notes document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseNotes {
    sections: Vec<Section>,
}

impl ReleaseNotes {
    /// Split a document into sections; text before the first header is ignored
    pub fn parse(document: &str) -> Self {
        let mut sections: Vec<Section> = Vec::new();

        for line in document.lines() {
            if let Some(label) = line.strip_prefix(HEADER) {
                sections.push(Section {
                    version: label.trim().to_string(),
                    lines: Vec::new(),
                });
            } else if let Some(section) = sections.last_mut() {
                section.lines.push(line.trim_end().to_string());
            }
        }

        for section in &mut sections {
            trim_blank_lines(&mut section.lines);
        }
        ReleaseNotes { sections }
    }

    /// Read and parse a document; an unreadable file is fatal
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let document =
            fs::read_to_string(path).map_err(|e| BuildInfoError::release_notes(path, e))?;
        Ok(Self::parse(&document))
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Section matching `version` under `mode`
    pub fn find(&self, version: &str, mode: MatchMode) -> Option<&Section> {
        let mut candidates = self
            .sections
            .iter()
            .filter(|s| !s.version.is_empty() && mode.accepts(&s.version, version));

        match mode {
            MatchMode::MostSpecific => candidates.max_by_key(|s| s.version.len()),
            _ => candidates.next(),
        }
    }

    /// Version labels, newest first by semver precedence
    pub fn versions(&self) -> Vec<&str> {
        let mut versions: Vec<&str> = self.sections.iter().map(|s| s.version.as_str()).collect();
        versions.sort_by(|a, b| SemanticVersion::parse(b).precedence(&SemanticVersion::parse(a)));
        versions
    }
}

fn trim_blank_lines(lines: &mut Vec<String>) {
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    let leading = lines.iter().take_while(|l| l.trim().is_empty()).count();
    lines.drain(..leading);
}

/// Body of the section matching `version`, or empty text.
///
/// Leading and trailing blank lines are removed.
pub fn extract_section(document: &str, version: &str, mode: MatchMode) -> String {
    ReleaseNotes::parse(document)
        .find(version, mode)
        .map(Section::text)
        .unwrap_or_default()
}

/// Pieces of a release announcement
#[derive(Debug, Clone, Default)]
pub struct Announcement<'a> {
    /// Emitted as `<heading> <version>` followed by a blank line
    pub heading: Option<&'a str>,
    pub notes: Option<&'a ReleaseNotes>,
    pub checksums: Option<&'a str>,
    pub mode: MatchMode,
}

impl Announcement<'_> {
    /// Render the announcement for `version`
    pub fn render(&self, version: &str) -> String {
        let mut out = String::new();
        if let Some(heading) = self.heading {
            out.push_str(&format!("{} {}\n\n", heading, version));
        }
        if let Some(section) = self.notes.and_then(|n| n.find(version, self.mode)) {
            out.push_str(&section.text());
        }
        if let Some(checksums) = self.checksums {
            out.push_str("\n## Checksums\n\n```\n");
            out.push_str(checksums);
            if !checksums.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("```\n");
        }
        out
    }
}

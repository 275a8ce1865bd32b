use serde::Serialize;

/// One decorated entry of the commit log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitEntry {
    pub message: String,
    pub hash: String,
    pub refs: Vec<String>,
    pub tags: Vec<String>,
}

impl CommitEntry {
    /// Create an undecorated entry
    pub fn new(hash: impl Into<String>, message: impl Into<String>) -> Self {
        CommitEntry {
            message: message.into(),
            hash: hash.into(),
            refs: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// Attach a tag name
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Parse one line of `git log --format=%H%x09%D%x09%s`.
    ///
    /// Hash, decorations and subject are tab-separated, so a subject that
    /// looks like a decoration stays a subject. Returns `None` for blank
    /// lines.
    pub fn parse_line(line: &str) -> Option<Self> {
        if line.trim().is_empty() {
            return None;
        }

        let mut fields = line.splitn(3, '\t');
        let hash = fields.next().unwrap_or("").trim();
        let decoration = fields.next().unwrap_or("");
        let message = fields.next().unwrap_or("").trim();

        let mut refs = Vec::new();
        let mut tags = Vec::new();
        for item in decoration.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match item.strip_prefix("tag:") {
                Some(tag) => tags.push(tag.trim().to_string()),
                None => refs.push(item.to_string()),
            }
        }

        Some(CommitEntry {
            message: message.to_string(),
            hash: hash.to_string(),
            refs,
            tags,
        })
    }
}

/// Parse the whole log output, most recent first
pub fn parse_log(output: &str) -> Vec<CommitEntry> {
    output.lines().filter_map(CommitEntry::parse_line).collect()
}

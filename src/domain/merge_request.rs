use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state shared by merge requests and issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum State {
    Open,
    Closed,
    Merged,
}

impl State {
    /// Lowercase name as accepted by forge `--state` filters
    pub fn as_str(&self) -> &'static str {
        match self {
            State::Open => "open",
            State::Closed => "closed",
            State::Merged => "merged",
        }
    }
}

impl FromStr for State {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "open" | "opened" => Ok(State::Open),
            "closed" => Ok(State::Closed),
            "merged" => Ok(State::Merged),
            other => Err(format!("unknown state '{}'", other)),
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A forge-tracked proposed change
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeRequest {
    pub number: u64,
    pub title: String,
    pub url: String,
    pub state: State,
    /// Hash of the merge commit; `None` until merged
    pub merge_commit: Option<String>,
    pub target_branch: String,
}

/// A forge-tracked issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub url: String,
    pub state: State,
}

/// A commit that belongs to a merge request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DetailCommit {
    pub headline: String,
    pub body: String,
}

/// Extended text of a merge request, used to recover issue links
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MergeRequestDetail {
    pub title: String,
    pub body: String,
    pub comments: Vec<String>,
    pub commits: Vec<DetailCommit>,
}

impl MergeRequestDetail {
    /// Every free-text fragment, in order: title, body, comments, then each
    /// commit's headline and body
    pub fn text_fragments(&self) -> Vec<&str> {
        let mut fragments = vec![self.title.as_str(), self.body.as_str()];
        fragments.extend(self.comments.iter().map(String::as_str));
        for commit in &self.commits {
            fragments.push(commit.headline.as_str());
            fragments.push(commit.body.as_str());
        }
        fragments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_parse_is_case_insensitive() {
        assert_eq!("MERGED".parse::<State>(), Ok(State::Merged));
        assert_eq!("Open".parse::<State>(), Ok(State::Open));
        assert_eq!("opened".parse::<State>(), Ok(State::Open));
        assert!("draft".parse::<State>().is_err());
    }

    #[test]
    fn test_text_fragments_order() {
        let detail = MergeRequestDetail {
            title: "title".into(),
            body: "body".into(),
            comments: vec!["c1".into()],
            commits: vec![DetailCommit {
                headline: "h1".into(),
                body: "b1".into(),
            }],
        };
        assert_eq!(detail.text_fragments(), vec!["title", "body", "c1", "h1", "b1"]);
    }
}

use serde::Deserialize;

use crate::command::query_command;
use crate::domain::{DetailCommit, Issue, MergeRequest, MergeRequestDetail, State};
use crate::error::{BuildInfoError, Result};

const PR_FIELDS: &str = "number,title,url,state,mergeCommit,baseRefName";
const ISSUE_FIELDS: &str = "number,title,url,state";
const DETAIL_FIELDS: &str = "title,body,comments,commits";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GhPullRequest {
    number: u64,
    title: String,
    url: String,
    state: String,
    merge_commit: Option<GhOid>,
    #[serde(default)]
    base_ref_name: String,
}

#[derive(Debug, Deserialize)]
struct GhOid {
    oid: String,
}

#[derive(Debug, Deserialize)]
struct GhIssue {
    number: u64,
    title: String,
    url: String,
    state: String,
}

#[derive(Debug, Deserialize)]
struct GhComment {
    #[serde(default)]
    body: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GhCommit {
    #[serde(default)]
    message_headline: String,
    #[serde(default)]
    message_body: String,
}

#[derive(Debug, Deserialize)]
struct GhDetail {
    #[serde(default)]
    title: String,
    #[serde(default)]
    body: String,
    #[serde(default)]
    comments: Vec<GhComment>,
    #[serde(default)]
    commits: Vec<GhCommit>,
}

fn parse_state(raw: &str) -> Result<State> {
    raw.parse().map_err(BuildInfoError::forge)
}

/// Decode `gh pr list --json` output
pub fn parse_merge_requests(json: &str) -> Result<Vec<MergeRequest>> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }
    let raw: Vec<GhPullRequest> = serde_json::from_str(json)?;
    raw.into_iter()
        .map(|pr| {
            Ok(MergeRequest {
                number: pr.number,
                title: pr.title,
                url: pr.url,
                state: parse_state(&pr.state)?,
                merge_commit: pr.merge_commit.map(|c| c.oid).filter(|oid| !oid.is_empty()),
                target_branch: pr.base_ref_name,
            })
        })
        .collect()
}

/// Decode `gh issue list --json` output
pub fn parse_issues(json: &str) -> Result<Vec<Issue>> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }
    let raw: Vec<GhIssue> = serde_json::from_str(json)?;
    raw.into_iter()
        .map(|issue| {
            Ok(Issue {
                number: issue.number,
                title: issue.title,
                url: issue.url,
                state: parse_state(&issue.state)?,
            })
        })
        .collect()
}

/// Decode `gh pr view --json` output
pub fn parse_detail(json: &str) -> Result<Option<MergeRequestDetail>> {
    if json.trim().is_empty() {
        return Ok(None);
    }
    let raw: GhDetail = serde_json::from_str(json)?;
    Ok(Some(MergeRequestDetail {
        title: raw.title,
        body: raw.body,
        comments: raw.comments.into_iter().map(|c| c.body).collect(),
        commits: raw
            .commits
            .into_iter()
            .map(|c| DetailCommit {
                headline: c.message_headline,
                body: c.message_body,
            })
            .collect(),
    }))
}

/// Queries GitHub through the `gh` executable
#[derive(Debug, Clone)]
pub struct GhCli {
    program: String,
    limit: usize,
}

impl GhCli {
    pub fn new(program: impl Into<String>, limit: usize) -> Self {
        GhCli {
            program: program.into(),
            limit,
        }
    }

    /// Run `gh` and return stdout; a failing command yields empty text
    fn query(&self, args: &[&str]) -> Result<String> {
        query_command(&self.program, args, None)
    }
}

impl Default for GhCli {
    fn default() -> Self {
        Self::new("gh", 100)
    }
}

impl super::Forge for GhCli {
    fn merge_requests(&self, state: State) -> Result<Vec<MergeRequest>> {
        let limit = self.limit.to_string();
        let json = self.query(&[
            "pr",
            "list",
            "--state",
            state.as_str(),
            "--limit",
            &limit,
            "--json",
            PR_FIELDS,
        ])?;
        parse_merge_requests(&json)
    }

    fn issues(&self, state: Option<State>) -> Result<Vec<Issue>> {
        let limit = self.limit.to_string();
        let state = state.map(|s| s.as_str()).unwrap_or("all");
        let json = self.query(&[
            "issue",
            "list",
            "--state",
            state,
            "--limit",
            &limit,
            "--json",
            ISSUE_FIELDS,
        ])?;
        parse_issues(&json)
    }

    fn merge_request_detail(&self, number: u64) -> Result<Option<MergeRequestDetail>> {
        let number = number.to_string();
        let json = self.query(&["pr", "view", &number, "--json", DETAIL_FIELDS])?;
        parse_detail(&json)
    }
}

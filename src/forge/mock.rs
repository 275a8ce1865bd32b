use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use crate::domain::{Issue, MergeRequest, MergeRequestDetail, State};
use crate::error::{BuildInfoError, Result};
use crate::forge::Forge;

/// In-memory forge for testing
#[derive(Debug, Default)]
pub struct MockForge {
    merge_requests: Vec<MergeRequest>,
    issues: Vec<Issue>,
    details: HashMap<u64, MergeRequestDetail>,
    broken_details: HashSet<u64>,
    detail_requests: RefCell<Vec<u64>>,
}

impl MockForge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_merge_request(&mut self, mr: MergeRequest) {
        self.merge_requests.push(mr);
    }

    pub fn add_issue(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    pub fn set_detail(&mut self, number: u64, detail: MergeRequestDetail) {
        self.details.insert(number, detail);
    }

    /// Make detail lookups for `number` fail with a non-fatal error
    pub fn break_detail(&mut self, number: u64) {
        self.broken_details.insert(number);
    }

    /// Merge request numbers whose detail was requested, in order
    pub fn detail_requests(&self) -> Vec<u64> {
        self.detail_requests.borrow().clone()
    }
}

impl Forge for MockForge {
    fn merge_requests(&self, state: State) -> Result<Vec<MergeRequest>> {
        Ok(self
            .merge_requests
            .iter()
            .filter(|mr| mr.state == state)
            .cloned()
            .collect())
    }

    fn issues(&self, state: Option<State>) -> Result<Vec<Issue>> {
        Ok(self
            .issues
            .iter()
            .filter(|i| state.map_or(true, |s| i.state == s))
            .cloned()
            .collect())
    }

    fn merge_request_detail(&self, number: u64) -> Result<Option<MergeRequestDetail>> {
        self.detail_requests.borrow_mut().push(number);
        if self.broken_details.contains(&number) {
            return Err(BuildInfoError::forge(format!("detail for #{} unavailable", number)));
        }
        Ok(self.details.get(&number).cloned())
    }
}

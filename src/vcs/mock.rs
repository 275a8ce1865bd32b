use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::Result;
use crate::vcs::Vcs;

/// Mock version control for testing without a repository
///
/// Responses are keyed by the space-joined argument list. Unknown queries
/// answer with empty text, like a failed command would. Every invocation is
/// recorded so tests can assert on call counts.
#[derive(Debug, Default)]
pub struct MockVcs {
    responses: RefCell<HashMap<String, String>>,
    calls: RefCell<Vec<String>>,
}

impl MockVcs {
    /// Create a mock that knows no answers
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the output for a query
    pub fn respond(self, args: &str, output: &str) -> Self {
        self.set(args, output);
        self
    }

    /// Change the output for a query after construction
    pub fn set(&self, args: &str, output: &str) {
        self.responses
            .borrow_mut()
            .insert(args.to_string(), output.to_string());
    }

    /// Number of times a query was issued
    pub fn call_count(&self, args: &str) -> usize {
        self.calls.borrow().iter().filter(|c| *c == args).count()
    }

    /// Every invocation, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl Vcs for MockVcs {
    fn query(&self, args: &[&str]) -> Result<String> {
        let key = args.join(" ");
        self.calls.borrow_mut().push(key.clone());
        Ok(self
            .responses
            .borrow()
            .get(&key)
            .map(|s| s.trim().to_string())
            .unwrap_or_default())
    }

    fn run(&self, args: &[&str]) -> Result<bool> {
        self.calls.borrow_mut().push(args.join(" "));
        Ok(true)
    }
}

//! Lax semantic version model
//!
//! Parses anything that looks remotely like a version string and coerces it to
//! the closest canonical form instead of failing. Ordering follows the
//! precedence rules of https://semver.org/#spec-item-11; build metadata never
//! takes part in ordering.

use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Prefix used when formatting versions unless told otherwise
pub const DEFAULT_PREFIX: &str = "v";

/// One dot-separated pre-release or build identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    Numeric(u64),
    Alpha(String),
}

impl Identifier {
    /// Normalize a raw fragment.
    ///
    /// Characters outside `[A-Za-z0-9-]` are stripped. All-digit text becomes
    /// numeric (leading zeroes accepted); anything else stays textual. Returns
    /// `None` when nothing is left after stripping.
    pub fn normalize(fragment: &str) -> Option<Self> {
        let cleaned: String = fragment
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
            .collect();

        if cleaned.is_empty() {
            return None;
        }

        if cleaned.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = cleaned.parse::<u64>() {
                return Some(Identifier::Numeric(n));
            }
        }

        Some(Identifier::Alpha(cleaned))
    }
}

impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Identifier::Numeric(a), Identifier::Numeric(b)) => a.cmp(b),
            (Identifier::Numeric(_), Identifier::Alpha(_)) => Ordering::Less,
            (Identifier::Alpha(_), Identifier::Numeric(_)) => Ordering::Greater,
            (Identifier::Alpha(a), Identifier::Alpha(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Numeric(n) => write!(f, "{}", n),
            Identifier::Alpha(s) => write!(f, "{}", s),
        }
    }
}

impl From<u64> for Identifier {
    fn from(n: u64) -> Self {
        Identifier::Numeric(n)
    }
}

impl From<&str> for Identifier {
    fn from(s: &str) -> Self {
        Identifier::Alpha(s.to_string())
    }
}

/// Semantic version with pre-release and build identifiers
///
/// Equality covers every field, build identifiers included. Use
/// [`SemanticVersion::precedence`] for ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SemanticVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre: Vec<Identifier>,
    pub build: Vec<Identifier>,
}

impl SemanticVersion {
    /// Create a release version with no pre-release or build identifiers
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        SemanticVersion {
            major,
            minor,
            patch,
            pre: Vec::new(),
            build: Vec::new(),
        }
    }

    /// Replace the pre-release identifiers
    pub fn with_pre<I, T>(mut self, pre: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Identifier>,
    {
        self.pre = pre.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the build identifiers
    pub fn with_build<I, T>(mut self, build: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Identifier>,
    {
        self.build = build.into_iter().map(Into::into).collect();
        self
    }

    /// Parse a version string, never failing.
    ///
    /// One leading `v` is stripped. The core is split on `.`, every component
    /// is read as its leading digits (or 0), and the result is padded or
    /// truncated to three components. Build metadata starts at the first `+`
    /// and the pre-release at the first `-` before it. Both fragments go
    /// through [`Identifier::normalize`] and empty ones are dropped.
    ///
    /// # Example
    /// ```
    /// use git_buildinfo::domain::SemanticVersion;
    ///
    /// let v = SemanticVersion::parse("v1.2-rc.1+build");
    /// assert_eq!(v.to_string(), "v1.2.0-rc.1+build");
    /// ```
    pub fn parse(text: &str) -> Self {
        let text = text.strip_prefix('v').unwrap_or(text);
        let (rest, build) = match text.split_once('+') {
            Some((rest, build)) => (rest, build),
            None => (text, ""),
        };
        let (core, pre) = match rest.split_once('-') {
            Some((core, pre)) => (core, pre),
            None => (rest, ""),
        };

        let mut numbers = core.split('.').map(leading_number).chain(std::iter::repeat(0));
        let major = numbers.next().unwrap_or(0);
        let minor = numbers.next().unwrap_or(0);
        let patch = numbers.next().unwrap_or(0);

        SemanticVersion {
            major,
            minor,
            patch,
            pre: identifiers(pre),
            build: identifiers(build),
        }
    }

    /// Format with a custom prefix instead of the default `v`
    pub fn format_with_prefix(&self, prefix: &str) -> String {
        let mut out = format!("{}{}.{}.{}", prefix, self.major, self.minor, self.patch);
        if !self.pre.is_empty() {
            out.push('-');
            out.push_str(&join(&self.pre));
        }
        if !self.build.is_empty() {
            out.push('+');
            out.push_str(&join(&self.build));
        }
        out
    }

    /// Whether this is a plain release (no pre-release identifiers)
    pub fn is_release(&self) -> bool {
        self.pre.is_empty()
    }

    /// Next patch release, dropping pre-release and build identifiers
    pub fn bump_patch(&self) -> Self {
        let patch = self.patch.saturating_add(1);
        SemanticVersion::new(self.major, self.minor, patch)
    }

    /// Compare by semver precedence.
    ///
    /// Cores compare numerically; a release outranks any pre-release of the
    /// same core; pre-release identifiers compare pairwise with numeric ones
    /// sorting before textual ones and a longer sequence winning over its own
    /// prefix. Build identifiers are ignored.
    pub fn precedence(&self, other: &Self) -> Ordering {
        let core = (self.major, self.minor, self.patch).cmp(&(other.major, other.minor, other.patch));
        if core != Ordering::Equal {
            return core;
        }

        match (self.pre.is_empty(), other.pre.is_empty()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            // Slice ordering is pairwise first, then shorter-is-less.
            (false, false) => self.pre.as_slice().cmp(other.pre.as_slice()),
        }
    }
}

/// Compare two version strings by precedence after lax parsing
pub fn compare(a: &str, b: &str) -> Ordering {
    SemanticVersion::parse(a).precedence(&SemanticVersion::parse(b))
}

impl FromStr for SemanticVersion {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(SemanticVersion::parse(s))
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with_prefix(DEFAULT_PREFIX))
    }
}

fn leading_number(part: &str) -> u64 {
    let digits: String = part
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

fn identifiers(text: &str) -> Vec<Identifier> {
    text.split('.').filter_map(Identifier::normalize).collect()
}

fn join(ids: &[Identifier]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

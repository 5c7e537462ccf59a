/// Page status definitions for tracking crawl progress
///
/// Every URL moves through Pending -> Fetching and ends in exactly one of
/// the terminal statuses.
use std::fmt;

/// Represents the current status of a URL in the crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageStatus {
    /// Admitted by the frontier, waiting to be dispatched
    Pending,

    /// Dispatched to the fetch collaborator, response outstanding
    Fetching,

    /// Response processed, record handed to the sink, links scheduled
    Processed,

    /// Fetch or processing failed; no recursion from this URL
    Failed,

    /// Rejected before fetch (scope, dedup, depth, or empty content)
    Skipped,
}

impl PageStatus {
    /// Returns true if this is a terminal status (no further processing)
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending | Self::Fetching)
    }

    /// Returns true if this represents a successful completion
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Processed)
    }

    /// Returns the status as a stable lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fetching => "fetching",
            Self::Processed => "processed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

impl fmt::Display for PageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a URL was rejected before it was fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SkipReason {
    /// Scheme, domain, or path placed the URL outside the crawl scope
    OutOfScope,

    /// The frontier had already admitted this URL
    AlreadyVisited,

    /// Following the link would exceed the configured depth limit
    DepthExceeded,

    /// The response carried no usable textual content
    NoTextualContent,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OutOfScope => "out_of_scope",
            Self::AlreadyVisited => "already_visited",
            Self::DepthExceeded => "depth_exceeded",
            Self::NoTextualContent => "no_textual_content",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which stage of processing failed for a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The fetch collaborator reported an error
    Fetch,

    /// The persistence collaborator rejected the record
    Persist,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fetch => "fetch",
            Self::Persist => "persist",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

use std::fmt;

/// Errors raised by graph construction and the rank estimators.
///
/// Every variant is a deterministic input-validation failure (or the
/// iteration safety cap firing). Nothing here is transient, so callers
/// should not retry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RankError {
    /// The corpus has no pages.
    #[error("corpus is empty")]
    EmptyCorpus,

    /// A page links to something that is not itself a page of the corpus.
    #[error("page {page:?} links to {target:?}, which is not in the corpus")]
    UnknownLinkTarget { page: String, target: String },

    /// A lookup named a page that is not in the corpus.
    #[error("page {0:?} is not in the corpus")]
    UnknownPage(String),

    /// Damping factor outside `[0, 1]` (or NaN).
    #[error("damping factor must be within [0, 1], got {0}")]
    InvalidDamping(f64),

    /// The sampling estimator needs at least one sample.
    #[error("sample count must be at least 1, got {0}")]
    InvalidSampleCount(usize),

    /// The iterative estimator hit its safety cap before the ranks settled.
    #[error("pagerank did not converge after {iterations} sweeps (last delta {delta})")]
    DidNotConverge { iterations: usize, delta: f64 },
}

impl RankError {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::EmptyCorpus => ErrorCode::EmptyCorpus,
            Self::UnknownLinkTarget { .. } => ErrorCode::UnknownLinkTarget,
            Self::UnknownPage(_) => ErrorCode::UnknownPage,
            Self::InvalidDamping(_) => ErrorCode::InvalidDamping,
            Self::InvalidSampleCount(_) => ErrorCode::InvalidSampleCount,
            Self::DidNotConverge { .. } => ErrorCode::DidNotConverge,
        }
    }
}

/// Machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    EmptyCorpus,
    UnknownLinkTarget,
    UnknownPage,
    InvalidDamping,
    InvalidSampleCount,
    DidNotConverge,
}

impl ErrorCode {
    /// Stable code identifier (`E####`).
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::EmptyCorpus => "E1001",
            Self::UnknownLinkTarget => "E1002",
            Self::UnknownPage => "E1003",
            Self::InvalidDamping => "E2001",
            Self::InvalidSampleCount => "E2002",
            Self::DidNotConverge => "E3001",
        }
    }

    /// Optional remediation hint for terminal output.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::EmptyCorpus => Some("Point the loader at a directory containing .html pages."),
            Self::UnknownLinkTarget => {
                Some("Drop links to pages outside the corpus, or build the graph leniently.")
            }
            Self::UnknownPage => None,
            Self::InvalidDamping => Some("Use a damping factor between 0 and 1 (e.g. 0.85)."),
            Self::InvalidSampleCount => Some("Use a sample count of 1 or more (e.g. 10000)."),
            Self::DidNotConverge => Some("Raise max_iter; the default cap is 10000 sweeps."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Reject damping factors outside `[0, 1]`. NaN fails the range check too.
pub(crate) fn check_damping(damping: f64) -> Result<(), RankError> {
    if (0.0..=1.0).contains(&damping) {
        Ok(())
    } else {
        Err(RankError::InvalidDamping(damping))
    }
}

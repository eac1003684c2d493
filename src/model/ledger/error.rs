use thiserror::Error;

/// Why an operation against the ledger was rejected.
///
/// Every variant is a caller error: the operation was refused as a whole and
/// the ledger is exactly as it was before the call.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("invalid config: {0}")]
    InvalidConfig(ConfigIssue),
    #[error("not admin")]
    NotAdmin,
    #[error("already started")]
    AlreadyStarted,
    #[error("not open")]
    NotOpen,
    #[error("registration closed")]
    RegistrationClosed,
    #[error("not in voting window")]
    NotInWindow,
    #[error("not registered")]
    NotRegistered,
    #[error("already voted")]
    AlreadyVoted,
    #[error("bad option")]
    BadOption,
    #[error("receipt used")]
    ReceiptUsed,
}

impl LedgerError {
    /// Stable name of the failure kind, for callers that branch on it.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidConfig(_) => "InvalidConfig",
            Self::NotAdmin => "NotAdmin",
            Self::AlreadyStarted => "AlreadyStarted",
            Self::NotOpen => "NotOpen",
            Self::RegistrationClosed => "RegistrationClosed",
            Self::NotInWindow => "NotInWindow",
            Self::NotRegistered => "NotRegistered",
            Self::AlreadyVoted => "AlreadyVoted",
            Self::BadOption => "BadOption",
            Self::ReceiptUsed => "ReceiptUsed",
        }
    }
}

/// What exactly was wrong with a proposed configuration.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum ConfigIssue {
    #[error("at least two candidates are required, got {0}")]
    TooFewCandidates(usize),
    #[error("end must be after start")]
    EmptyWindow,
}

impl From<ConfigIssue> for LedgerError {
    fn from(issue: ConfigIssue) -> Self {
        Self::InvalidConfig(issue)
    }
}

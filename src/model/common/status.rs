use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where an election is in its lifecycle.
///
/// Always computed from the clock and the voting window, never stored.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ElectionStatus {
    /// Before the window opens; configuration and registration are allowed.
    Pending,
    /// Inside the window, both ends inclusive; voting is allowed.
    Open,
    /// After the window.
    Closed,
}

impl ElectionStatus {
    /// Evaluate the status at `now` for the window `[start, end]`.
    pub fn at(now: DateTime<Utc>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        if now < start {
            Self::Pending
        } else if now <= end {
            Self::Open
        } else {
            Self::Closed
        }
    }
}

impl Display for ElectionStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Pending => "PENDING",
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
        })
    }
}

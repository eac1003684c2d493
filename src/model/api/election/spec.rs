use chrono::{serde::ts_seconds, DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{
    common::Address,
    ledger::{self, ElectionLedger},
};

/// An election specification, as submitted by its creator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionSpec {
    /// Election title.
    pub title: String,
    /// Candidate names, in ballot order.
    pub candidates: Vec<String>,
    /// Voting opens at this instant.
    #[serde(with = "ts_seconds")]
    pub start: DateTime<Utc>,
    /// Voting closes after this instant.
    #[serde(with = "ts_seconds")]
    pub end: DateTime<Utc>,
}

impl ElectionSpec {
    /// Build a ledger for this spec, administered by `creator`.
    pub fn into_ledger(self, creator: Address, now: DateTime<Utc>) -> ledger::Result<ElectionLedger> {
        ElectionLedger::create(
            self.title,
            self.candidates,
            self.start,
            self.end,
            creator,
            now,
        )
    }
}

/// A replacement voting window.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSpec {
    #[serde(with = "ts_seconds")]
    pub start: DateTime<Utc>,
    #[serde(with = "ts_seconds")]
    pub end: DateTime<Utc>,
}

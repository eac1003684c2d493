use chrono::{serde::ts_seconds, DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{
    common::{Address, ElectionStatus},
    ledger::ElectionLedger,
};

/// An API-friendly election description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionDescription {
    /// Election title.
    pub title: String,
    /// Candidate names, in ballot order.
    pub candidates: Vec<String>,
    /// Voting window start.
    #[serde(with = "ts_seconds")]
    pub start: DateTime<Utc>,
    /// Voting window end.
    #[serde(with = "ts_seconds")]
    pub end: DateTime<Utc>,
    /// The account allowed to manage this election.
    pub admin: Address,
    /// Status at the time this description was taken.
    pub status: ElectionStatus,
}

impl ElectionDescription {
    pub fn of(ledger: &ElectionLedger, now: DateTime<Utc>) -> Self {
        let info = ledger.info();
        Self {
            title: info.title,
            candidates: ledger.candidates().to_vec(),
            start: info.start,
            end: info.end,
            admin: *ledger.admin(),
            status: ledger.status(now),
        }
    }
}

/// The three headline fields, in the order clients historically read them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionSummary {
    pub title: String,
    #[serde(with = "ts_seconds")]
    pub start: DateTime<Utc>,
    #[serde(with = "ts_seconds")]
    pub end: DateTime<Utc>,
}

impl From<&ElectionLedger> for ElectionSummary {
    fn from(ledger: &ElectionLedger) -> Self {
        let info = ledger.info();
        Self {
            title: info.title,
            start: info.start,
            end: info.end,
        }
    }
}

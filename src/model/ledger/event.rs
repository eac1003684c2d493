use chrono::{serde::ts_seconds, DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::common::{Address, Receipt};

/// Something that happened to the ledger, for external indexers and audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LedgerEvent {
    /// The election was created, or its window changed.
    ElectionConfigured {
        title: String,
        #[serde(with = "ts_seconds")]
        start: DateTime<Utc>,
        #[serde(with = "ts_seconds")]
        end: DateTime<Utc>,
    },
    /// An address appeared in a registration request.
    VoterRegistered { voter: Address },
    /// A vote was accepted.
    VoteCast { voter: Address, receipt: Receipt },
}

/// An event together with its position in the log and when it was appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedEvent {
    /// Zero-based, gapless.
    pub seq: u64,
    #[serde(with = "ts_seconds")]
    pub at: DateTime<Utc>,
    #[serde(flatten)]
    pub event: LedgerEvent,
}

/// Append-only, totally ordered event log.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<LoggedEvent>,
}

impl EventLog {
    pub fn append(&mut self, at: DateTime<Utc>, event: LedgerEvent) {
        let seq = self.events.len() as u64;
        self.events.push(LoggedEvent { seq, at, event });
    }

    /// Up to `limit` events starting from sequence number `since`.
    pub fn page(&self, since: u64, limit: usize) -> &[LoggedEvent] {
        let start = usize::try_from(since)
            .unwrap_or(usize::MAX)
            .min(self.events.len());
        let end = start.saturating_add(limit).min(self.events.len());
        &self.events[start..end]
    }

    pub fn all(&self) -> &[LoggedEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rocket::serde::json::serde_json;

    use super::*;

    fn log_of(n: u8) -> EventLog {
        let at = Utc.timestamp_opt(100, 0).unwrap();
        let mut log = EventLog::default();
        for i in 0..n {
            log.append(
                at,
                LedgerEvent::VoterRegistered {
                    voter: Address::example(i),
                },
            );
        }
        log
    }

    #[test]
    fn sequence_numbers_are_gapless() {
        let log = log_of(4);
        let seqs: Vec<u64> = log.all().iter().map(|e| e.seq).collect();
        assert_eq!(seqs, vec![0, 1, 2, 3]);
    }

    #[test]
    fn paging_clamps_to_the_log() {
        let log = log_of(5);
        assert_eq!(log.page(0, 2).len(), 2);
        assert_eq!(log.page(3, 10).len(), 2);
        assert_eq!(log.page(3, 10)[0].seq, 3);
        assert!(log.page(5, 10).is_empty());
        assert!(log.page(u64::MAX, usize::MAX).is_empty());
    }

    #[test]
    fn serialized_form_is_flat_and_tagged() {
        let mut log = EventLog::default();
        log.append(
            Utc.timestamp_opt(100, 0).unwrap(),
            LedgerEvent::VoteCast {
                voter: Address::example(1),
                receipt: Receipt::example(1),
            },
        );
        let value = serde_json::to_value(&log.all()[0]).unwrap();
        assert_eq!(value["seq"], 0);
        assert_eq!(value["at"], 100);
        assert_eq!(value["type"], "VoteCast");
        assert_eq!(value["receipt"], Receipt::example(1).to_string());

        let back: LoggedEvent = serde_json::from_value(value).unwrap();
        assert_eq!(&back, &log.all()[0]);
    }
}

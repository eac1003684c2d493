use std::collections::HashSet;

use chrono::{serde::ts_seconds, DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{
    common::{Address, ElectionStatus, Receipt},
    ledger::{ElectionLedger, LedgerEvent, LoggedEvent},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    /// The tally does not have one counter per candidate.
    #[error("{counters} tally counters for {candidates} candidates")]
    WrongCandidates { candidates: usize, counters: usize },
    /// The tallied votes do not add up to the accepted receipts.
    #[error("tally sums to {tallied} but {receipts} receipts were accepted")]
    Tally { tallied: u64, receipts: usize },
    /// The same receipt was accepted twice.
    #[error("receipt {receipt} appears more than once")]
    DuplicateReceipt { receipt: Receipt },
    /// A vote event names a receipt that is not in the receipt list.
    #[error("vote event {seq} names receipt {receipt}, which is not in the receipt list")]
    UnlistedReceipt { seq: u64, receipt: Receipt },
    /// The number of vote events differs from the number of receipts.
    #[error("{vote_events} vote events but {receipts} receipts")]
    VoteEvents { vote_events: usize, receipts: usize },
    /// The event log has a gap or is out of order.
    #[error("expected event {expected}, found event {found}")]
    EventSequence { expected: u64, found: u64 },
    /// A vote event names a voter with no earlier registration event.
    #[error("vote event {seq} was cast by unregistered voter {voter}")]
    UnregisteredVoter { seq: u64, voter: Address },
    /// A voter has more than one vote event.
    #[error("vote event {seq} is a second vote by {voter}")]
    DoubleVote { seq: u64, voter: Address },
}

/// A public snapshot of the whole ledger, sufficient for independent
/// verification of receipts and of the tally's consistency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionDump {
    pub title: String,
    pub admin: Address,
    pub status: ElectionStatus,
    #[serde(with = "ts_seconds")]
    pub start: DateTime<Utc>,
    #[serde(with = "ts_seconds")]
    pub end: DateTime<Utc>,
    pub candidates: Vec<String>,
    pub tally: Vec<u64>,
    pub registered_voters: usize,
    /// Accepted receipts, in the order their votes were cast.
    pub receipts: Vec<Receipt>,
    pub events: Vec<LoggedEvent>,
}

impl ElectionDump {
    pub fn of(ledger: &ElectionLedger, now: DateTime<Utc>) -> Self {
        let info = ledger.info();
        Self {
            title: info.title,
            admin: *ledger.admin(),
            status: ledger.status(now),
            start: info.start,
            end: info.end,
            candidates: ledger.candidates().to_vec(),
            tally: ledger.tally().counts().to_vec(),
            registered_voters: ledger.registered_count(),
            receipts: ledger.receipts().to_vec(),
            events: ledger.events().all().to_vec(),
        }
    }

    /// Is this receipt among the accepted ones?
    pub fn includes(&self, receipt: &Receipt) -> bool {
        self.receipts.contains(receipt)
    }

    /// Check that the snapshot is internally consistent.
    pub fn verify(&self) -> Result<(), VerificationError> {
        if self.tally.len() != self.candidates.len() {
            return Err(VerificationError::WrongCandidates {
                candidates: self.candidates.len(),
                counters: self.tally.len(),
            });
        }

        let mut receipts = HashSet::with_capacity(self.receipts.len());
        for receipt in &self.receipts {
            if !receipts.insert(*receipt) {
                return Err(VerificationError::DuplicateReceipt { receipt: *receipt });
            }
        }

        let tallied: u64 = self.tally.iter().sum();
        if tallied != self.receipts.len() as u64 {
            return Err(VerificationError::Tally {
                tallied,
                receipts: self.receipts.len(),
            });
        }

        // Replay the audit log.
        let mut registered = HashSet::new();
        let mut voted = HashSet::new();
        let mut vote_events = 0;
        for (expected, logged) in (0u64..).zip(&self.events) {
            if logged.seq != expected {
                return Err(VerificationError::EventSequence {
                    expected,
                    found: logged.seq,
                });
            }
            match &logged.event {
                LedgerEvent::ElectionConfigured { .. } => {}
                LedgerEvent::VoterRegistered { voter } => {
                    registered.insert(*voter);
                }
                LedgerEvent::VoteCast { voter, receipt } => {
                    if !registered.contains(voter) {
                        return Err(VerificationError::UnregisteredVoter {
                            seq: logged.seq,
                            voter: *voter,
                        });
                    }
                    if !voted.insert(*voter) {
                        return Err(VerificationError::DoubleVote {
                            seq: logged.seq,
                            voter: *voter,
                        });
                    }
                    if !receipts.contains(receipt) {
                        return Err(VerificationError::UnlistedReceipt {
                            seq: logged.seq,
                            receipt: *receipt,
                        });
                    }
                    vote_events += 1;
                }
            }
        }
        if vote_events != self.receipts.len() {
            return Err(VerificationError::VoteEvents {
                vote_events,
                receipts: self.receipts.len(),
            });
        }

        Ok(())
    }
}

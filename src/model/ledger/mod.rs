//! The election ledger: one owned aggregate holding the election's
//! configuration, voter registry, vote record, receipt set, tally and event
//! log. Every operation validates first and mutates only once all of its
//! checks have passed, so a rejected operation leaves no trace.

mod ballot_box;
mod error;
mod event;
mod registry;
mod tally;

use chrono::{DateTime, Duration, Utc};
use log::{debug, info};

use crate::model::common::{Address, ElectionStatus, OptionIndex, Receipt};

use ballot_box::BallotBox;
use registry::VoterRegistry;

pub use error::{ConfigIssue, LedgerError};
pub use event::{EventLog, LedgerEvent, LoggedEvent};
pub use tally::Tally;

pub type Result<T> = std::result::Result<T, LedgerError>;

/// The voting window, both ends inclusive.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Window {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Window {
    /// A window must end strictly after it starts.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if end <= start {
            return Err(ConfigIssue::EmptyWindow.into());
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn status_at(&self, now: DateTime<Utc>) -> ElectionStatus {
        ElectionStatus::at(now, self.start, self.end)
    }

    /// Pull the end in to `now`, keeping at least one second of window.
    /// Returns the new end.
    fn close_at(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.end = now.max(self.start + Duration::seconds(1));
        self.end
    }
}

/// The election record proper.
#[derive(Debug)]
struct Election {
    title: String,
    candidates: Vec<String>,
    window: Window,
    admin: Address,
}

/// A read-only projection of the election's headline details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElectionInfo {
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug)]
pub struct ElectionLedger {
    election: Election,
    registry: VoterRegistry,
    ballot_box: BallotBox,
    tally: Tally,
    events: EventLog,
    /// Ledger time never runs backwards past this instant.
    horizon: DateTime<Utc>,
}

impl ElectionLedger {
    /// Configure a new election administered by `creator`.
    pub fn create(
        title: String,
        candidates: Vec<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        creator: Address,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        if candidates.len() < 2 {
            return Err(ConfigIssue::TooFewCandidates(candidates.len()).into());
        }
        let window = Window::new(start, end)?;

        let tally = Tally::zeroed(candidates.len());
        let mut ledger = Self {
            election: Election {
                title,
                candidates,
                window,
                admin: creator,
            },
            registry: VoterRegistry::default(),
            ballot_box: BallotBox::default(),
            tally,
            events: EventLog::default(),
            horizon: now,
        };
        ledger.configured(now);
        info!(
            "Election '{}' created by {creator} with {} candidates, window {start} to {end}",
            ledger.election.title,
            ledger.election.candidates.len(),
        );
        Ok(ledger)
    }

    /// Replace the voting window. Only the admin may do this, and only before
    /// voting has started.
    pub fn update_window(
        &mut self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        caller: &Address,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let now = self.observe(now);
        self.ensure_admin(caller)?;
        if self.status(now) != ElectionStatus::Pending {
            return reject("update_window", caller, LedgerError::AlreadyStarted);
        }
        let window = Window::new(start, end).or_else(|e| reject("update_window", caller, e))?;

        self.election.window = window;
        self.configured(now);
        self.horizon = now;
        info!("Voting window moved to {start} to {end}");
        Ok(())
    }

    /// End voting now. Only the admin may do this, and only while open.
    ///
    /// The new end is `now`, or one second after the start when closing in
    /// the first second. Ledger time then moves past the new end, so the
    /// election reads CLOSED straight away, even within the same second.
    pub fn close_early(&mut self, caller: &Address, now: DateTime<Utc>) -> Result<()> {
        let now = self.observe(now);
        self.ensure_admin(caller)?;
        if self.status(now) != ElectionStatus::Open {
            return reject("close_early", caller, LedgerError::NotOpen);
        }

        let end = self.election.window.close_at(now);
        self.configured(now);
        self.horizon = end + Duration::seconds(1);
        info!("Election closed early at {now}, window now ends {end}");
        Ok(())
    }

    /// Add voters to the allow-list. Re-registering is a no-op on state, but
    /// every listed occurrence is still logged as an event.
    pub fn register_voters(
        &mut self,
        voters: &[Address],
        caller: &Address,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let now = self.observe(now);
        self.ensure_admin(caller)?;
        if self.status(now) != ElectionStatus::Pending {
            return reject("register_voters", caller, LedgerError::RegistrationClosed);
        }

        let mut added = 0;
        for voter in voters {
            if self.registry.register(*voter) {
                added += 1;
            }
            debug!("Registered voter {voter}");
            self.events
                .append(now, LedgerEvent::VoterRegistered { voter: *voter });
        }
        self.horizon = now;
        info!(
            "Registered {added} new voters ({} listed, {} total)",
            voters.len(),
            self.registry.len()
        );
        Ok(())
    }

    /// Cast `caller`'s one vote.
    ///
    /// Checks run in a fixed order and the first failure wins: window,
    /// registration, double voting, option range, then receipt reuse.
    pub fn vote(
        &mut self,
        option: OptionIndex,
        receipt: Receipt,
        caller: &Address,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let now = self.observe(now);
        if self.status(now) != ElectionStatus::Open {
            return reject("vote", caller, LedgerError::NotInWindow);
        }
        if !self.registry.contains(caller) {
            return reject("vote", caller, LedgerError::NotRegistered);
        }
        if self.ballot_box.has_voted(caller) {
            return reject("vote", caller, LedgerError::AlreadyVoted);
        }
        let index = match usize::try_from(option) {
            Ok(index) if index < self.election.candidates.len() => index,
            _ => return reject("vote", caller, LedgerError::BadOption),
        };
        if self.ballot_box.has_receipt(&receipt) {
            return reject("vote", caller, LedgerError::ReceiptUsed);
        }

        self.ballot_box.record(*caller, receipt);
        self.tally.increment(index);
        self.events.append(
            now,
            LedgerEvent::VoteCast {
                voter: *caller,
                receipt,
            },
        );
        self.horizon = now;
        info!("Vote cast by {caller} with receipt {receipt}");
        Ok(())
    }

    pub fn status(&self, now: DateTime<Utc>) -> ElectionStatus {
        self.election.window.status_at(self.observe(now))
    }

    pub fn info(&self) -> ElectionInfo {
        ElectionInfo {
            title: self.election.title.clone(),
            start: self.election.window.start(),
            end: self.election.window.end(),
        }
    }

    pub fn window(&self) -> Window {
        self.election.window
    }

    pub fn title(&self) -> &str {
        &self.election.title
    }

    pub fn admin(&self) -> &Address {
        &self.election.admin
    }

    pub fn candidates(&self) -> &[String] {
        &self.election.candidates
    }

    pub fn candidate_count(&self) -> usize {
        self.election.candidates.len()
    }

    pub fn tally(&self) -> &Tally {
        &self.tally
    }

    pub fn is_registered(&self, voter: &Address) -> bool {
        self.registry.contains(voter)
    }

    pub fn registered_count(&self) -> usize {
        self.registry.len()
    }

    pub fn has_voted(&self, voter: &Address) -> bool {
        self.ballot_box.has_voted(voter)
    }

    pub fn has_receipt(&self, receipt: &Receipt) -> bool {
        self.ballot_box.has_receipt(receipt)
    }

    /// Accepted receipts, in the order their votes were cast.
    pub fn receipts(&self) -> &[Receipt] {
        self.ballot_box.receipts()
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// The instant an operation arriving at `now` takes effect.
    fn observe(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.max(self.horizon)
    }

    fn ensure_admin(&self, caller: &Address) -> Result<()> {
        if caller != &self.election.admin {
            return reject("admin operation", caller, LedgerError::NotAdmin);
        }
        Ok(())
    }

    fn configured(&mut self, now: DateTime<Utc>) {
        let event = LedgerEvent::ElectionConfigured {
            title: self.election.title.clone(),
            start: self.election.window.start(),
            end: self.election.window.end(),
        };
        self.events.append(now, event);
    }
}

fn reject<T>(operation: &str, caller: &Address, error: LedgerError) -> Result<T> {
    debug!("Rejected {operation} from {caller}: {error}");
    Err(error)
}

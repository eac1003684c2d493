use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::model::{
    api::election::ElectionSpec,
    clock::Clock,
    common::Address,
    ledger::{self, ElectionLedger},
};

/// Owns the one election ledger this server runs, and serialises every
/// operation against it.
///
/// Each operation takes the lock, reads the clock while holding it, then
/// checks and mutates without releasing it, so operations apply one at a
/// time in a single order and the instants they observe never decrease
/// along that order.
pub struct LedgerHost {
    ledger: Mutex<Option<ElectionLedger>>,
    clock: Box<dyn Clock>,
}

impl LedgerHost {
    pub fn new(clock: impl Clock + 'static) -> Self {
        Self {
            ledger: Mutex::new(None),
            clock: Box::new(clock),
        }
    }

    /// Configure the election, then read it back under the same lock. Only
    /// possible once per host.
    pub fn create<T>(
        &self,
        spec: ElectionSpec,
        creator: Address,
        read: impl FnOnce(&ElectionLedger, DateTime<Utc>) -> T,
    ) -> Result<T> {
        let mut slot = self.lock();
        if slot.is_some() {
            return Err(Error::Conflict("election already configured".to_string()));
        }
        let now = self.clock.now();
        let ledger = slot.insert(spec.into_ledger(creator, now)?);
        Ok(read(ledger, now))
    }

    /// Run a mutating operation against the configured ledger.
    pub fn update<T>(
        &self,
        operation: impl FnOnce(&mut ElectionLedger, DateTime<Utc>) -> ledger::Result<T>,
    ) -> Result<T> {
        let mut slot = self.lock();
        let ledger = slot.as_mut().ok_or_else(not_configured)?;
        let now = self.clock.now();
        Ok(operation(ledger, now)?)
    }

    /// Take a consistent read of the configured ledger.
    pub fn view<T>(&self, read: impl FnOnce(&ElectionLedger, DateTime<Utc>) -> T) -> Result<T> {
        let slot = self.lock();
        let ledger = slot.as_ref().ok_or_else(not_configured)?;
        let now = self.clock.now();
        Ok(read(ledger, now))
    }

    pub fn is_configured(&self) -> bool {
        self.lock().is_some()
    }

    fn lock(&self) -> MutexGuard<'_, Option<ElectionLedger>> {
        // Ledger operations validate before mutating and never panic midway,
        // so a poisoned lock still guards a consistent ledger.
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn not_configured() -> Error {
    Error::not_found("Election (not configured yet)")
}

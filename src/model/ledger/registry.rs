use std::collections::HashSet;

use crate::model::common::Address;

/// The admin-maintained allow-list of voters. Entries are never removed.
#[derive(Debug, Default)]
pub struct VoterRegistry {
    registered: HashSet<Address>,
}

impl VoterRegistry {
    /// Returns whether the address was newly added.
    pub fn register(&mut self, voter: Address) -> bool {
        self.registered.insert(voter)
    }

    pub fn contains(&self, voter: &Address) -> bool {
        self.registered.contains(voter)
    }

    pub fn len(&self) -> usize {
        self.registered.len()
    }
}

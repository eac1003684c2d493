use std::collections::HashSet;

use crate::model::common::{Address, Receipt};

/// Who has voted, and every receipt ever accepted.
#[derive(Debug, Default)]
pub struct BallotBox {
    voted: HashSet<Address>,
    receipts: HashSet<Receipt>,
    /// Accepted receipts in acceptance order.
    accepted: Vec<Receipt>,
}

impl BallotBox {
    pub fn has_voted(&self, voter: &Address) -> bool {
        self.voted.contains(voter)
    }

    pub fn has_receipt(&self, receipt: &Receipt) -> bool {
        self.receipts.contains(receipt)
    }

    /// Record an accepted vote. The caller has already checked that neither
    /// the voter nor the receipt has been seen.
    pub fn record(&mut self, voter: Address, receipt: Receipt) {
        debug_assert!(!self.has_voted(&voter) && !self.has_receipt(&receipt));
        self.voted.insert(voter);
        self.receipts.insert(receipt);
        self.accepted.push(receipt);
    }

    pub fn receipts(&self) -> &[Receipt] {
        &self.accepted
    }
}

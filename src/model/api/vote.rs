use serde::{Deserialize, Serialize};

use crate::model::common::{Address, OptionIndex, Receipt};

/// A vote as submitted by a voter: which candidate, and the receipt they
/// committed to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRequest {
    pub option: OptionIndex,
    pub receipt: Receipt,
}

/// What the ledger knows about one address.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterStatus {
    pub address: Address,
    pub registered: bool,
    pub has_voted: bool,
}

/// Whether a receipt has been accepted.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptStatus {
    pub receipt: Receipt,
    pub included: bool,
}

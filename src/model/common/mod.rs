mod address;
mod hex;
mod receipt;
mod status;

pub use address::{Address, ADDRESS_LEN};
pub use hex::ParseError;
pub use receipt::{Nonce, Receipt, RECEIPT_LEN};
pub use status::ElectionStatus;

/// Our candidates are identified by their position in the candidate list.
pub type OptionIndex = u64;

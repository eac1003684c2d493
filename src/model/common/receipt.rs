use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

use rand::{CryptoRng, RngCore};
use rocket::{
    http::{
        impl_from_uri_param_identity,
        uri::fmt::{Path, UriDisplay},
    },
    request::FromParam,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::address::Address;
use super::hex::{self, ParseError};
use super::OptionIndex;

/// Length of a receipt (and of a nonce) in bytes.
pub const RECEIPT_LEN: usize = 32;

/// An opaque, caller-supplied token proving that a specific vote was cast.
///
/// The ledger never inspects the contents; it only enforces that each value
/// is accepted at most once across all voters.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Receipt([u8; RECEIPT_LEN]);

impl Receipt {
    pub const fn from_bytes(bytes: [u8; RECEIPT_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; RECEIPT_LEN] {
        &self.0
    }

    /// Derive the conventional commitment for a vote:
    /// `SHA-256(voter ‖ option as 32-byte big-endian ‖ nonce)`.
    ///
    /// Voters compute this client-side before casting, keep the nonce, and
    /// can later recompute the receipt to check inclusion.
    pub fn commit(voter: &Address, option: OptionIndex, nonce: &Nonce) -> Self {
        let mut option_word = [0u8; 32];
        option_word[24..].copy_from_slice(&option.to_be_bytes());

        let mut hasher = Sha256::new();
        hasher.update(voter.as_bytes());
        hasher.update(option_word);
        hasher.update(nonce.0);
        Self(hasher.finalize().into())
    }
}

impl Debug for Receipt {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Receipt({self})")
    }
}

impl Display for Receipt {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

impl FromStr for Receipt {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex::decode(s).map(Self)
    }
}

impl TryFrom<String> for Receipt {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Receipt> for String {
    fn from(receipt: Receipt) -> Self {
        receipt.to_string()
    }
}

impl<'a> FromParam<'a> for Receipt {
    type Error = ParseError;

    fn from_param(param: &'a str) -> Result<Self, Self::Error> {
        param.parse()
    }
}

impl UriDisplay<Path> for Receipt {
    fn fmt(&self, formatter: &mut rocket::http::uri::fmt::Formatter<'_, Path>) -> std::fmt::Result {
        formatter.write_value(self.to_string())
    }
}

impl_from_uri_param_identity!([Path] Receipt);

/// A voter's secret salt for a receipt commitment.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Nonce([u8; RECEIPT_LEN]);

impl Nonce {
    pub fn random(mut rng: impl RngCore + CryptoRng) -> Self {
        let mut bytes = [0u8; RECEIPT_LEN];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub const fn from_bytes(bytes: [u8; RECEIPT_LEN]) -> Self {
        Self(bytes)
    }
}

impl Debug for Nonce {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // Nonces are secret until the voter chooses to reveal them.
        f.write_str("Nonce(..)")
    }
}

impl Display for Nonce {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

impl FromStr for Nonce {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex::decode(s).map(Self)
    }
}

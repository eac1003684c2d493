use data_encoding::{HEXLOWER, HEXLOWER_PERMISSIVE};
use thiserror::Error;

/// Every fixed-size value we print as hex carries this prefix.
pub const PREFIX: &str = "0x";

/// Render bytes as `0x`-prefixed lowercase hex.
pub fn encode(bytes: &[u8]) -> String {
    format!("{PREFIX}{}", HEXLOWER.encode(bytes))
}

/// Parse `0x`-prefixed hex of exactly `N` bytes. Either case is accepted.
pub fn decode<const N: usize>(string: &str) -> Result<[u8; N], ParseError> {
    let digits = string
        .strip_prefix(PREFIX)
        .or_else(|| string.strip_prefix("0X"))
        .ok_or(ParseError::MissingPrefix)?;
    if digits.len() != N * 2 {
        return Err(ParseError::InvalidLength {
            expected: N * 2,
            found: digits.len(),
        });
    }
    let bytes = HEXLOWER_PERMISSIVE
        .decode(digits.as_bytes())
        .map_err(|_| ParseError::InvalidDigit)?;
    bytes.try_into().map_err(|_| ParseError::InvalidDigit)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("value must start with `0x`")]
    MissingPrefix,
    #[error("expected {expected} hex digits, found {found}")]
    InvalidLength { expected: usize, found: usize },
    #[error("value must contain only hex digits")]
    InvalidDigit,
}

//! API-compatible types.
//!
//! The types in this module are serialised in an API-friendly way, e.g.:
//!
//! - Addresses and receipts are serialised as `0x`-prefixed hex strings.
//! - Datetimes are serialised as Unix timestamps in seconds.

pub mod auth;
pub mod election;
pub mod pagination;
pub mod vote;

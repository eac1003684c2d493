pub mod api;
pub mod clock;
pub mod common;
pub mod host;
pub mod ledger;

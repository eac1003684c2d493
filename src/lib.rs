#[macro_use]
extern crate rocket;

#[cfg(test)]
#[macro_use]
extern crate backend_test;

use rocket::{Build, Rocket};

use crate::config::{ConfigFairing, LedgerFairing};
use crate::logging::LoggerFairing;
use crate::model::clock::{Clock, SystemClock};

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;

pub use config::Config;

/// Build the server, reading the time from the system clock.
pub fn build() -> Rocket<Build> {
    rocket_with_clock(rocket::build(), SystemClock)
}

/// Build a server from the given base, with the ledger driven by `clock`.
pub(crate) fn rocket_with_clock<C: Clock + Clone + 'static>(
    rocket: Rocket<Build>,
    clock: C,
) -> Rocket<Build> {
    rocket
        .mount("/", api::routes())
        .attach(ConfigFairing)
        .attach(LedgerFairing::with_clock(clock))
        .attach(LoggerFairing)
}

/// A server with the test secret and a manually driven clock.
#[cfg(test)]
pub(crate) fn test_rocket(clock: model::clock::ManualClock) -> Rocket<Build> {
    let figment = rocket::Config::figment()
        .merge(("jwt_secret", config::TEST_JWT_SECRET))
        .merge(("log_level", "off"));
    rocket_with_clock(rocket::custom(figment), clock)
}

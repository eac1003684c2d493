use log::{error, info};
use rocket::{
    fairing::{Fairing, Info, Kind},
    Build, Rocket,
};
use serde::Deserialize;

use crate::model::{
    clock::Clock,
    host::LedgerHost,
};

/// Largest event page returned when `max_page_size` is not configured.
const DEFAULT_MAX_PAGE_SIZE: usize = 100;

/// Application configuration, derived from `Rocket.toml` and `ROCKET_*`
/// environment variables. This struct becomes managed state and can be
/// inspected by any endpoint.
#[derive(Deserialize)]
pub struct Config {
    // non-secrets
    #[serde(default = "default_max_page_size")]
    max_page_size: usize,
    // secrets
    jwt_secret: String,
}

impl Config {
    /// Largest number of events returned in one page.
    pub fn max_page_size(&self) -> usize {
        self.max_page_size
    }

    /// Secret key used to verify caller JWTs.
    pub fn jwt_secret(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }
}

fn default_max_page_size() -> usize {
    DEFAULT_MAX_PAGE_SIZE
}

/// A fairing that loads the application config and puts it in managed state.
pub struct ConfigFairing;

#[rocket::async_trait]
impl Fairing for ConfigFairing {
    fn info(&self) -> Info {
        Info {
            name: "Config",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<Config>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load application config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };
        if config.jwt_secret.is_empty() {
            error!("`jwt_secret` must not be empty");
            return Err(rocket);
        }

        // Manage the state.
        rocket = rocket.manage(config);
        Ok(rocket)
    }
}

/// A fairing that places an empty [`LedgerHost`] into managed state, backed
/// by the given clock. The election itself is created through the API.
pub struct LedgerFairing<C> {
    clock: C,
}

impl<C: Clock + Clone> LedgerFairing<C> {
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }
}

#[rocket::async_trait]
impl<C: Clock + Clone + 'static> Fairing for LedgerFairing<C> {
    fn info(&self) -> Info {
        Info {
            name: "Election ledger",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, rocket: Rocket<Build>) -> rocket::fairing::Result {
        info!("Election ledger ready, awaiting configuration");
        Ok(rocket.manage(LedgerHost::new(self.clock.clone())))
    }
}


#[cfg(test)]
pub use examples::TEST_JWT_SECRET;

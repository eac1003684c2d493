use chrono::{serde::ts_seconds, DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation};
use log::debug;
use rocket::{
    http::{Cookie, SameSite, Status},
    request::{FromRequest, Outcome},
    Request, State,
};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::Error;
use crate::model::common::Address;

pub const AUTH_TOKEN_COOKIE: &str = "auth_token";

/// Proof of who is calling: the caller's address, asserted by a JWT signed
/// with the shared secret. Tokens are issued by whatever manages the
/// callers' keys; this server only verifies them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken {
    #[serde(rename = "sub")]
    address: Address,
}

impl AuthToken {
    pub fn new(address: Address) -> Self {
        Self { address }
    }

    /// The authenticated caller.
    pub fn address(&self) -> &Address {
        &self.address
    }

    #[allow(clippy::missing_panics_doc)]
    /// Sign this token, valid for `ttl` from now.
    pub fn encode(&self, config: &Config, ttl: Duration) -> String {
        let claims = Claims {
            token: self.clone(),
            expire_at: Utc::now() + ttl,
        };

        jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret()),
        )
        .expect("JWT encoding is infallible with default settings")
    }

    /// Sign this token into a cookie valid for `ttl` from now.
    pub fn into_cookie(self, config: &Config, ttl: Duration) -> Cookie<'static> {
        Cookie::build(AUTH_TOKEN_COOKIE, self.encode(config, ttl))
            .max_age(rocket::time::Duration::seconds(ttl.num_seconds()))
            .http_only(true)
            .same_site(SameSite::Strict)
            .finish()
    }

    /// Verify and decode a signed token.
    pub fn decode(token: &str, config: &Config) -> Result<Self, Error> {
        let token = jsonwebtoken::decode(
            token,
            &DecodingKey::from_secret(config.jwt_secret()),
            &Validation::default(),
        )
        .map(|claims: TokenData<Claims>| claims.claims.token)?;
        Ok(token)
    }
}

/// Token claims: the token itself plus an expiry datetime.
#[derive(Serialize, Deserialize)]
struct Claims {
    #[serde(flatten)]
    token: AuthToken,
    #[serde(rename = "exp", with = "ts_seconds")]
    expire_at: DateTime<Utc>,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthToken {
    type Error = Error;

    /// Get an [`AuthToken`] from the cookie and verify its signature and expiry.
    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let config = req.guard::<&State<Config>>().await.unwrap(); // Valid as `Config` is always managed

        let cookie = match req.cookies().get(AUTH_TOKEN_COOKIE) {
            Some(cookie) => cookie,
            None => {
                let err = Error::Unauthorized("missing auth token".to_string());
                return Outcome::Failure((Status::Unauthorized, err));
            }
        };

        match Self::decode(cookie.value(), config) {
            Ok(token) => Outcome::Success(token),
            Err(err) => {
                debug!("Rejected auth token: {err}");
                Outcome::Failure((Status::Unauthorized, err))
            }
        }
    }
}

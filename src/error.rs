use jsonwebtoken::errors::{Error as JwtError, ErrorKind as JwtErrorKind};
use log::debug;
use rocket::{
    http::Status,
    response::{status::Custom, Responder},
    serde::json::Json,
    Request,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ledger::LedgerError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Jwt(#[from] JwtError),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl Error {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// The HTTP status this error maps to.
    pub fn status(&self) -> Status {
        match self {
            Self::Ledger(err) => match err {
                LedgerError::InvalidConfig(_) | LedgerError::BadOption => {
                    Status::UnprocessableEntity
                }
                LedgerError::NotAdmin | LedgerError::NotRegistered => Status::Forbidden,
                LedgerError::AlreadyStarted
                | LedgerError::NotOpen
                | LedgerError::RegistrationClosed
                | LedgerError::NotInWindow
                | LedgerError::AlreadyVoted
                | LedgerError::ReceiptUsed => Status::Conflict,
            },
            Self::Jwt(err) => match err.kind() {
                JwtErrorKind::ExpiredSignature | JwtErrorKind::ImmatureSignature => {
                    Status::Unauthorized
                }
                _ => Status::BadRequest,
            },
            Self::BadRequest(_) => Status::BadRequest,
            Self::Unauthorized(_) => Status::Unauthorized,
            Self::NotFound(_) => Status::NotFound,
            Self::Conflict(_) => Status::Conflict,
        }
    }

    /// Stable name of the failure kind, reported to API clients.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Ledger(err) => err.kind(),
            Self::Jwt(_) => "InvalidToken",
            Self::BadRequest(_) => "BadRequest",
            Self::Unauthorized(_) => "Unauthorized",
            Self::NotFound(_) => "NotFound",
            Self::Conflict(_) => "Conflict",
        }
    }
}

/// The JSON body sent alongside every error status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, req: &'r Request<'_>) -> rocket::response::Result<'o> {
        let status = self.status();
        debug!("Responding {status}: {self}");
        let body = ErrorBody {
            kind: self.kind().to_string(),
            message: self.to_string(),
        };
        Custom(status, Json(body)).respond_to(req)
    }
}

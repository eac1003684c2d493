use rocket::{serde::json::Json, Route, State};

use crate::error::Result;
use crate::model::{
    api::{
        auth::AuthToken,
        vote::{ReceiptStatus, VoteRequest},
    },
    host::LedgerHost,
};

pub fn routes() -> Vec<Route> {
    routes![cast_vote]
}

/// Cast the caller's vote. The receipt is chosen by the voter, typically a
/// commitment to their choice, and can later be looked up to confirm
/// inclusion.
#[post("/election/votes", data = "<vote>", format = "json")]
pub fn cast_vote(
    token: AuthToken,
    vote: Json<VoteRequest>,
    host: &State<LedgerHost>,
) -> Result<Json<ReceiptStatus>> {
    let VoteRequest { option, receipt } = vote.into_inner();
    host.update(|ledger, now| ledger.vote(option, receipt, token.address(), now))?;
    Ok(Json(ReceiptStatus {
        receipt,
        included: true,
    }))
}

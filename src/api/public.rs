use rocket::{serde::json::Json, Route, State};

use crate::config::Config;
use crate::error::Result;
use crate::model::{
    api::{
        election::{ElectionDescription, ElectionDump, ElectionSummary},
        pagination::{Paginated, PaginationRequest},
        vote::{ReceiptStatus, VoterStatus},
    },
    common::{Address, ElectionStatus, Receipt},
    host::LedgerHost,
    ledger::LoggedEvent,
};

pub fn routes() -> Vec<Route> {
    routes![
        election_description,
        election_info,
        election_status,
        candidates,
        candidate_count,
        tally,
        receipt_status,
        voter_status,
        events,
        dump,
    ]
}

#[get("/election")]
fn election_description(host: &State<LedgerHost>) -> Result<Json<ElectionDescription>> {
    Ok(Json(host.view(ElectionDescription::of)?))
}

/// Title and voting window.
#[get("/election/info")]
fn election_info(host: &State<LedgerHost>) -> Result<Json<ElectionSummary>> {
    Ok(Json(host.view(|ledger, _| ElectionSummary::from(ledger))?))
}

#[get("/election/status")]
fn election_status(host: &State<LedgerHost>) -> Result<Json<ElectionStatus>> {
    Ok(Json(host.view(|ledger, now| ledger.status(now))?))
}

#[get("/election/candidates")]
fn candidates(host: &State<LedgerHost>) -> Result<Json<Vec<String>>> {
    Ok(Json(host.view(|ledger, _| ledger.candidates().to_vec())?))
}

#[get("/election/candidates/count")]
fn candidate_count(host: &State<LedgerHost>) -> Result<Json<usize>> {
    Ok(Json(host.view(|ledger, _| ledger.candidate_count())?))
}

/// Votes per candidate, in ballot order.
#[get("/election/tally")]
fn tally(host: &State<LedgerHost>) -> Result<Json<Vec<u64>>> {
    Ok(Json(host.view(|ledger, _| ledger.tally().counts().to_vec())?))
}

#[get("/election/receipts/<receipt>")]
pub fn receipt_status(receipt: Receipt, host: &State<LedgerHost>) -> Result<Json<ReceiptStatus>> {
    let included = host.view(|ledger, _| ledger.has_receipt(&receipt))?;
    Ok(Json(ReceiptStatus { receipt, included }))
}

#[get("/election/voters/<address>")]
pub fn voter_status(address: Address, host: &State<LedgerHost>) -> Result<Json<VoterStatus>> {
    let status = host.view(|ledger, _| VoterStatus {
        address,
        registered: ledger.is_registered(&address),
        has_voted: ledger.has_voted(&address),
    })?;
    Ok(Json(status))
}

/// Walk the audit log a page at a time.
#[get("/election/events?<page..>")]
fn events(
    page: PaginationRequest,
    host: &State<LedgerHost>,
    config: &State<Config>,
) -> Result<Json<Paginated<LoggedEvent>>> {
    let max = config.max_page_size();
    let paginated = host.view(|ledger, _| {
        let log = ledger.events();
        let items = log.page(page.since(), page.page_size(max)).to_vec();
        page.to_paginated(max, log.len(), items)
    })?;
    Ok(Json(paginated))
}

/// Everything needed to check the result independently.
#[get("/election/dump")]
fn dump(host: &State<LedgerHost>) -> Result<Json<ElectionDump>> {
    Ok(Json(host.view(ElectionDump::of)?))
}

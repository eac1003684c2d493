use rocket::{http::Status, serde::json::Json, Route, State};

use crate::error::Result;
use crate::model::{
    api::{
        auth::AuthToken,
        election::{ElectionDescription, ElectionSpec, WindowSpec},
    },
    common::Address,
    host::LedgerHost,
};

pub fn routes() -> Vec<Route> {
    routes![create_election, update_window, close_election, register_voters]
}

/// Configure the election. The caller becomes its admin.
#[post("/election", data = "<spec>", format = "json")]
pub fn create_election(
    token: AuthToken,
    spec: Json<ElectionSpec>,
    host: &State<LedgerHost>,
) -> Result<Json<ElectionDescription>> {
    let description = host.create(spec.into_inner(), *token.address(), ElectionDescription::of)?;
    Ok(Json(description))
}

#[put("/election/window", data = "<window>", format = "json")]
fn update_window(
    token: AuthToken,
    window: Json<WindowSpec>,
    host: &State<LedgerHost>,
) -> Result<Json<ElectionDescription>> {
    let description = host.update(|ledger, now| {
        ledger.update_window(window.start, window.end, token.address(), now)?;
        Ok(ElectionDescription::of(ledger, now))
    })?;
    Ok(Json(description))
}

/// End voting now.
#[post("/election/close")]
fn close_election(token: AuthToken, host: &State<LedgerHost>) -> Result<Json<ElectionDescription>> {
    let description = host.update(|ledger, now| {
        ledger.close_early(token.address(), now)?;
        Ok(ElectionDescription::of(ledger, now))
    })?;
    Ok(Json(description))
}

#[post("/election/voters", data = "<voters>", format = "json")]
pub fn register_voters(
    token: AuthToken,
    voters: Json<Vec<Address>>,
    host: &State<LedgerHost>,
) -> Result<Status> {
    host.update(|ledger, now| ledger.register_voters(&voters, token.address(), now))?;
    Ok(Status::NoContent)
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use rocket::{
        http::{ContentType, Status},
        local::asynchronous::{Client, LocalResponse},
        serde::json::serde_json,
    };

    use crate::api::test_helpers::{
        admin_cookie, cookie_for, create_example_election, failure, register,
    };
    use crate::model::{
        api::{
            election::ElectionSummary,
            vote::{VoteRequest, VoterStatus},
        },
        clock::{Clock, ManualClock},
        common::{ElectionStatus, Receipt},
    };

    use super::*;

    async fn cast(client: &Client, voter: Address) -> LocalResponse<'_> {
        let vote = VoteRequest {
            option: 0,
            receipt: Receipt::example(1),
        };
        client
            .post(uri!(crate::api::voting::cast_vote))
            .header(ContentType::JSON)
            .cookie(cookie_for(voter))
            .body(serde_json::to_string(&vote).unwrap())
            .dispatch()
            .await
    }

    async fn put_window(client: &Client, caller: Address, window: WindowSpec) -> LocalResponse<'_> {
        client
            .put(uri!(update_window))
            .header(ContentType::JSON)
            .cookie(cookie_for(caller))
            .body(serde_json::to_string(&window).unwrap())
            .dispatch()
            .await
    }

    #[backend_test]
    async fn create_makes_caller_admin(client: Client, clock: ManualClock) {
        let description = create_example_election(&client, &clock).await;

        let spec = ElectionSpec::example(clock.now());
        assert_eq!(description.title, spec.title);
        assert_eq!(description.candidates, spec.candidates);
        assert_eq!(description.start, spec.start);
        assert_eq!(description.end, spec.end);
        assert_eq!(description.admin, Address::admin_example());
        assert_eq!(description.status, ElectionStatus::Pending);
    }

    #[backend_test]
    async fn create_needs_auth(client: Client, clock: ManualClock) {
        let response = client
            .post(uri!(create_election))
            .header(ContentType::JSON)
            .body(serde_json::to_string(&ElectionSpec::example(clock.now())).unwrap())
            .dispatch()
            .await;
        assert_eq!(Status::Unauthorized, response.status());
    }

    #[backend_test]
    async fn create_rejects_bad_config(client: Client, clock: ManualClock) {
        let response = client
            .post(uri!(create_election))
            .header(ContentType::JSON)
            .cookie(admin_cookie())
            .body(serde_json::to_string(&ElectionSpec::single_candidate_example(clock.now())).unwrap())
            .dispatch()
            .await;
        assert_eq!(
            (Status::UnprocessableEntity, "InvalidConfig".to_string()),
            failure(response).await
        );

        let mut spec = ElectionSpec::example(clock.now());
        spec.end = spec.start;
        let response = client
            .post(uri!(create_election))
            .header(ContentType::JSON)
            .cookie(admin_cookie())
            .body(serde_json::to_string(&spec).unwrap())
            .dispatch()
            .await;
        assert_eq!(
            (Status::UnprocessableEntity, "InvalidConfig".to_string()),
            failure(response).await
        );
    }

    #[backend_test(election)]
    async fn create_only_once(client: Client, clock: ManualClock) {
        let response = client
            .post(uri!(create_election))
            .header(ContentType::JSON)
            .cookie(cookie_for(Address::example(1)))
            .body(serde_json::to_string(&ElectionSpec::example(clock.now())).unwrap())
            .dispatch()
            .await;
        assert_eq!(
            (Status::Conflict, "Conflict".to_string()),
            failure(response).await
        );
    }

    #[backend_test(election)]
    async fn update_window_before_start(client: Client, clock: ManualClock) {
        let start = clock.now() + Duration::hours(1);
        let window = WindowSpec {
            start,
            end: start + Duration::hours(2),
        };

        let response = put_window(&client, Address::admin_example(), window).await;
        assert_eq!(Status::Ok, response.status());
        let description: ElectionDescription = response.into_json().await.unwrap();
        assert_eq!(description.start, window.start);
        assert_eq!(description.end, window.end);

        let response = client.get("/election/info").dispatch().await;
        let summary: ElectionSummary = response.into_json().await.unwrap();
        assert_eq!(summary.start, window.start);
        assert_eq!(summary.end, window.end);
    }

    #[backend_test(election)]
    async fn update_window_failures(client: Client, clock: ManualClock) {
        let start = clock.now() + Duration::hours(1);
        let good = WindowSpec {
            start,
            end: start + Duration::hours(1),
        };

        let response = put_window(&client, Address::example(1), good).await;
        assert_eq!(
            (Status::Forbidden, "NotAdmin".to_string()),
            failure(response).await
        );

        let empty = WindowSpec { start, end: start };
        let response = put_window(&client, Address::admin_example(), empty).await;
        assert_eq!(
            (Status::UnprocessableEntity, "InvalidConfig".to_string()),
            failure(response).await
        );

        clock.advance(Duration::seconds(60));
        let response = put_window(&client, Address::admin_example(), good).await;
        assert_eq!(
            (Status::Conflict, "AlreadyStarted".to_string()),
            failure(response).await
        );
    }

    #[backend_test(election)]
    async fn close_while_open(client: Client, clock: ManualClock) {
        // Not open yet.
        let response = client
            .post(uri!(close_election))
            .cookie(admin_cookie())
            .dispatch()
            .await;
        assert_eq!(
            (Status::Conflict, "NotOpen".to_string()),
            failure(response).await
        );

        clock.advance(Duration::seconds(120));
        let response = client
            .post(uri!(close_election))
            .cookie(cookie_for(Address::example(1)))
            .dispatch()
            .await;
        assert_eq!(
            (Status::Forbidden, "NotAdmin".to_string()),
            failure(response).await
        );

        let response = client
            .post(uri!(close_election))
            .cookie(admin_cookie())
            .dispatch()
            .await;
        assert_eq!(Status::Ok, response.status());
        let description: ElectionDescription = response.into_json().await.unwrap();
        assert_eq!(description.end, clock.now());
        assert_eq!(description.status, ElectionStatus::Closed);

        // Same second: already closed, to everyone.
        let response = client.get("/election/status").dispatch().await;
        let status: ElectionStatus = response.into_json().await.unwrap();
        assert_eq!(status, ElectionStatus::Closed);

        let response = client
            .post(uri!(close_election))
            .cookie(admin_cookie())
            .dispatch()
            .await;
        assert_eq!(
            (Status::Conflict, "NotOpen".to_string()),
            failure(response).await
        );

        let response = cast(&client, Address::example(1)).await;
        assert_eq!(
            (Status::Conflict, "NotInWindow".to_string()),
            failure(response).await
        );

        clock.advance(Duration::seconds(1));
        let response = client
            .post(uri!(close_election))
            .cookie(admin_cookie())
            .dispatch()
            .await;
        assert_eq!(
            (Status::Conflict, "NotOpen".to_string()),
            failure(response).await
        );
    }

    #[backend_test(election)]
    async fn close_at_start(client: Client, clock: ManualClock) {
        register(&client, &[Address::example(1)]).await;
        clock.advance(Duration::seconds(60));

        let response = client
            .post(uri!(close_election))
            .cookie(admin_cookie())
            .dispatch()
            .await;
        assert_eq!(Status::Ok, response.status());
        let description: ElectionDescription = response.into_json().await.unwrap();
        assert_eq!(description.start, clock.now());
        assert_eq!(description.end, description.start + Duration::seconds(1));
        assert_eq!(description.status, ElectionStatus::Closed);

        let response = cast(&client, Address::example(1)).await;
        assert_eq!(
            (Status::Conflict, "NotInWindow".to_string()),
            failure(response).await
        );

        let response = client.get("/election/status").dispatch().await;
        let status: ElectionStatus = response.into_json().await.unwrap();
        assert_eq!(status, ElectionStatus::Closed);
    }

    #[backend_test(election)]
    async fn register_until_start(client: Client, clock: ManualClock) {
        let voters = [Address::example(1), Address::example(2), Address::example(1)];
        register(&client, &voters).await;

        let response = client
            .get(uri!(crate::api::public::voter_status(Address::example(2))))
            .dispatch()
            .await;
        let status: VoterStatus = response.into_json().await.unwrap();
        assert!(status.registered);
        assert!(!status.has_voted);

        let response = client
            .post(uri!(register_voters))
            .header(ContentType::JSON)
            .cookie(cookie_for(Address::example(1)))
            .body(serde_json::to_string(&[Address::example(4)]).unwrap())
            .dispatch()
            .await;
        assert_eq!(
            (Status::Forbidden, "NotAdmin".to_string()),
            failure(response).await
        );

        clock.advance(Duration::seconds(60));
        let response = client
            .post(uri!(register_voters))
            .header(ContentType::JSON)
            .cookie(admin_cookie())
            .body(serde_json::to_string(&[Address::example(4)]).unwrap())
            .dispatch()
            .await;
        assert_eq!(
            (Status::Conflict, "RegistrationClosed".to_string()),
            failure(response).await
        );
    }

    #[backend_test]
    async fn admin_routes_need_an_election(client: Client) {
        let response = client
            .post(uri!(close_election))
            .cookie(admin_cookie())
            .dispatch()
            .await;
        assert_eq!(
            (Status::NotFound, "NotFound".to_string()),
            failure(response).await
        );
    }
}

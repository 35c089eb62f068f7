//! Scheduler hook for the overdue-payment sweep.
//!
//! When a cron secret is configured the caller must present it as
//! `Authorization: Bearer {secret}`; otherwise the endpoint is open.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{HttpRequest, get, web};
use tracing::warn;

use crate::domain::{Error, OverdueSweepReport};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

fn presented_secret(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

/// Compare without short-circuiting on the first differing byte.
fn secrets_match(presented: &str, expected: &str) -> bool {
    let (a, b) = (presented.as_bytes(), expected.as_bytes());
    a.len() == b.len() && a.iter().zip(b).fold(0_u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Run the overdue sweep once.
#[utoipa::path(
    get,
    path = "/api/cron/overdue",
    responses(
        (status = 200, description = "Sweep finished", body = OverdueSweepReport),
        (status = 401, description = "Missing or wrong cron secret", body = Error),
        (status = 503, description = "Document store unavailable", body = Error)
    ),
    tags = ["cron"],
    operation_id = "overdueSweep",
    security([])
)]
#[get("/cron/overdue")]
pub async fn overdue_sweep(
    req: HttpRequest,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<OverdueSweepReport>> {
    if let Some(expected) = &state.cron_secret {
        let authorised = presented_secret(&req)
            .is_some_and(|presented| secrets_match(presented, expected.as_str()));
        if !authorised {
            warn!("cron request rejected");
            return Err(Error::unauthorized("Unauthorized"));
        }
    }
    state.sweep.run().await.map(web::Json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{LiveEventKind, PaymentRepository};
    use crate::domain::{DocumentId, PaymentRecord, PaymentStatus};
    use crate::inbound::http::test_utils::{bearer, test_app};
    use crate::test_support::{TestHarness, harness_now};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use chrono::NaiveDate;
    use rstest::rstest;
    use serde_json::{Value, json};
    use zeroize::Zeroizing;

    async fn seed_overdue(harness: &TestHarness) {
        let record = PaymentRecord {
            customer: "Asha Verma".into(),
            customer_id: DocumentId::new("cust-1").expect("id"),
            amount: 1500.0,
            date: NaiveDate::from_ymd_opt(2026, 3, 1).expect("date"),
            status: PaymentStatus::Pending,
            created_at: harness_now(),
        };
        harness.payments.insert(&record).await.expect("seed");
    }

    #[actix_web::test]
    async fn open_endpoint_reports_nothing_overdue() {
        let harness = TestHarness::new();
        let app = test::init_service(test_app(harness.state.clone())).await;
        let body: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/api/cron/overdue").to_request(),
        )
        .await;
        assert_eq!(body, json!({ "success": true, "message": "No overdue payments." }));
        assert!(harness.publisher.events().is_empty());
    }

    #[actix_web::test]
    async fn publishes_one_warning_per_overdue_payment_without_storing() {
        let harness = TestHarness::new();
        seed_overdue(&harness).await;
        let app = test::init_service(test_app(harness.state.clone())).await;
        let body: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/api/cron/overdue").to_request(),
        )
        .await;
        assert_eq!(body, json!({ "success": true, "count": 1 }));
        assert_eq!(
            harness.publisher.names(),
            vec![(
                LiveEventKind::NewNotification.channel(),
                LiveEventKind::NewNotification.name()
            )]
        );
        assert!(harness.notifications.all().is_empty());
    }

    #[rstest]
    #[case(None, StatusCode::UNAUTHORIZED)]
    #[case(Some("wrong"), StatusCode::UNAUTHORIZED)]
    #[case(Some("cron-secret"), StatusCode::OK)]
    #[actix_web::test]
    async fn configured_secret_is_enforced(
        #[case] presented: Option<&str>,
        #[case] expected: StatusCode,
    ) {
        let harness = TestHarness::new();
        let state = harness
            .state
            .clone()
            .with_cron_secret(Some(Zeroizing::new("cron-secret".to_owned())));
        let app = test::init_service(test_app(state)).await;
        let mut req = test::TestRequest::get().uri("/api/cron/overdue");
        if let Some(secret) = presented {
            req = req.insert_header(bearer(secret));
        }
        let res = test::call_service(&app, req.to_request()).await;
        assert_eq!(res.status(), expected);
    }

    #[rstest]
    #[::core::prelude::v1::test]
    #[case("abc", "abc", true)]
    #[case("abc", "abd", false)]
    #[case("abc", "abcd", false)]
    fn secret_comparison(#[case] a: &str, #[case] b: &str, #[case] same: bool) {
        assert_eq!(secrets_match(a, b), same);
    }
}

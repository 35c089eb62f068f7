//! Read-only payment figures for the dashboard widgets.

use actix_web::{get, web};

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::{CollectionRate, OverdueAmount, RecentPayments, TotalCollected};
use crate::inbound::http::state::HttpState;

/// Sum of pending payments dated before today.
#[utoipa::path(
    get,
    path = "/api/dashboard/payments/overdue",
    responses(
        (status = 200, description = "Overdue total", body = OverdueAmount),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["dashboard"],
    operation_id = "overdueAmount"
)]
#[get("/dashboard/payments/overdue")]
pub async fn overdue_amount(
    _user: AuthenticatedUser,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<OverdueAmount>> {
    let overdue_amount = state.dashboard.overdue_amount().await?;
    Ok(web::Json(OverdueAmount { overdue_amount }))
}

/// Sum of paid payments.
#[utoipa::path(
    get,
    path = "/api/dashboard/payments/total-collected",
    responses(
        (status = 200, description = "Collected total", body = TotalCollected),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["dashboard"],
    operation_id = "totalCollected"
)]
#[get("/dashboard/payments/total-collected")]
pub async fn total_collected(
    _user: AuthenticatedUser,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<TotalCollected>> {
    let total_collected = state.dashboard.total_collected().await?;
    Ok(web::Json(TotalCollected { total_collected }))
}

/// The five newest payments.
#[utoipa::path(
    get,
    path = "/api/dashboard/payments/recent-payments",
    responses(
        (status = 200, description = "Recent payments", body = RecentPayments),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["dashboard"],
    operation_id = "recentPayments"
)]
#[get("/dashboard/payments/recent-payments")]
pub async fn recent_payments(
    _user: AuthenticatedUser,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<RecentPayments>> {
    let payments = state.dashboard.recent_payments().await?;
    Ok(web::Json(RecentPayments { payments }))
}

/// Paid amount as a percentage of all amounts.
#[utoipa::path(
    get,
    path = "/api/dashboard/payments/collection-rate",
    responses(
        (status = 200, description = "Collection rate", body = CollectionRate),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["dashboard"],
    operation_id = "collectionRate"
)]
#[get("/dashboard/payments/collection-rate")]
pub async fn collection_rate(
    _user: AuthenticatedUser,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<CollectionRate>> {
    let collection_rate = state.dashboard.collection_rate().await?;
    Ok(web::Json(CollectionRate { collection_rate }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::PaymentRepository;
    use crate::domain::{DocumentId, PaymentRecord, PaymentStatus};
    use crate::inbound::http::test_utils::{bearer, test_app};
    use crate::test_support::{TestHarness, harness_now};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use chrono::NaiveDate;
    use rstest::rstest;
    use serde_json::{Value, json};

    async fn seed(harness: &TestHarness, amount: f64, date: (i32, u32, u32), status: PaymentStatus) {
        let record = PaymentRecord {
            customer: "Asha Verma".into(),
            customer_id: DocumentId::new("cust-1").expect("id"),
            amount,
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).expect("date"),
            status,
            created_at: harness_now(),
        };
        harness.payments.insert(&record).await.expect("seed payment");
    }

    #[actix_web::test]
    async fn figures_reflect_stored_payments() {
        let harness = TestHarness::new();
        seed(&harness, 1000.0, (2026, 3, 1), PaymentStatus::Pending).await;
        seed(&harness, 500.0, (2026, 4, 1), PaymentStatus::Pending).await;
        seed(&harness, 1500.0, (2026, 2, 1), PaymentStatus::Paid).await;
        let token = harness.sign_in().await;
        let app = test::init_service(test_app(harness.state.clone())).await;

        let get = |uri: &'static str| {
            test::TestRequest::get()
                .uri(uri)
                .insert_header(bearer(&token))
                .to_request()
        };

        let overdue: Value =
            test::call_and_read_body_json(&app, get("/api/dashboard/payments/overdue")).await;
        assert_eq!(overdue, json!({ "overdueAmount": 1000.0 }));

        let collected: Value =
            test::call_and_read_body_json(&app, get("/api/dashboard/payments/total-collected"))
                .await;
        assert_eq!(collected, json!({ "totalCollected": 1500.0 }));

        let rate: Value =
            test::call_and_read_body_json(&app, get("/api/dashboard/payments/collection-rate"))
                .await;
        assert_eq!(rate, json!({ "collectionRate": 50.0 }));

        let recent: Value =
            test::call_and_read_body_json(&app, get("/api/dashboard/payments/recent-payments"))
                .await;
        let rows = recent["payments"].as_array().expect("payments array");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["date"], "3/15/2026");
        assert!(rows[0]["amount"].as_str().expect("amount").starts_with('₹'));
    }

    #[rstest]
    #[case("/api/dashboard/payments/overdue")]
    #[case("/api/dashboard/payments/total-collected")]
    #[case("/api/dashboard/payments/recent-payments")]
    #[case("/api/dashboard/payments/collection-rate")]
    #[actix_web::test]
    async fn figures_require_a_session(#[case] uri: &str) {
        let harness = TestHarness::new();
        let app = test::init_service(test_app(harness.state.clone())).await;
        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn empty_store_reports_zero_rate() {
        let harness = TestHarness::new();
        let token = harness.sign_in().await;
        let app = test::init_service(test_app(harness.state.clone())).await;
        let req = test::TestRequest::get()
            .uri("/api/dashboard/payments/collection-rate")
            .insert_header(bearer(&token))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "collectionRate": 0.0 }));
    }
}

//! End-to-end walk through the collections workflow over HTTP.

#[path = "support/http.rs"]
mod http_support;

use actix_web::http::StatusCode;
use actix_web::test;
use backend::domain::ports::LiveEventKind;
use backend::test_support::TestHarness;
use http_support::{api_app, bearer};
use serde_json::{Value, json};

fn event(kind: LiveEventKind) -> (&'static str, &'static str) {
    (kind.channel(), kind.name())
}

#[actix_web::test]
async fn agent_records_and_collects_a_payment() {
    let harness = TestHarness::new();
    let app = test::init_service(api_app(harness.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "username": "field_agent",
            "email": "agent@example.com",
            "password": "s3cret!",
            "confirmPassword": "s3cret!"
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "agent@example.com", "password": "s3cret!" }))
        .to_request();
    let login: Value = test::call_and_read_body_json(&app, req).await;
    let token = login["token"].as_str().expect("token").to_owned();

    let req = test::TestRequest::post()
        .uri("/api/dashboard/customers")
        .insert_header(bearer(&token))
        .set_json(json!({
            "name": "Asha Verma",
            "phoneNumber": "9876543210",
            "email": "asha@example.com",
            "outstandingPayment": 1500.0,
            "paymentDueDate": "2026-03-20",
            "paymentStatus": "Pending"
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let customer: Value = test::read_body_json(res).await;
    let customer_id = customer["id"].as_str().expect("customer id").to_owned();

    let req = test::TestRequest::post()
        .uri("/api/dashboard/payments")
        .insert_header(bearer(&token))
        .set_json(json!({
            "customer": "Asha Verma",
            "customerId": customer_id,
            "amount": 1500,
            "date": "2026-03-20",
            "status": "Pending"
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let payment: Value = test::read_body_json(res).await;
    let payment_id = payment["id"].as_str().expect("payment id").to_owned();

    harness.clock.advance_days(6);

    let req = test::TestRequest::get().uri("/api/cron/overdue").to_request();
    let sweep: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(sweep, json!({ "success": true, "count": 1 }));

    let req = test::TestRequest::get()
        .uri("/api/dashboard/payments/overdue")
        .insert_header(bearer(&token))
        .to_request();
    let overdue: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(overdue, json!({ "overdueAmount": 1500.0 }));

    let req = test::TestRequest::put()
        .uri(&format!("/api/dashboard/payments/{payment_id}"))
        .insert_header(bearer(&token))
        .set_json(json!({ "status": "Paid" }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["message"], "Payment status updated successfully");
    assert_eq!(updated["payment"]["status"], "Paid");

    let req = test::TestRequest::get()
        .uri("/api/dashboard/payments/collection-rate")
        .insert_header(bearer(&token))
        .to_request();
    let rate: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(rate, json!({ "collectionRate": 100.0 }));

    // Customer, payment and status change are logged; the sweep is not.
    let stored = harness.notifications.all();
    assert_eq!(stored.len(), 3);
    assert_eq!(
        harness.publisher.names(),
        vec![
            event(LiveEventKind::NewNotification),
            event(LiveEventKind::NewNotification),
            event(LiveEventKind::NewPayment),
            event(LiveEventKind::NewNotification),
            event(LiveEventKind::NewNotification),
            event(LiveEventKind::PaymentUpdated),
        ]
    );

    let req = test::TestRequest::put()
        .uri(&format!("/api/dashboard/notifications/{}", stored[0].id.as_str()))
        .insert_header(bearer(&token))
        .set_json(json!({ "read": true }))
        .to_request();
    let marked: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(marked["message"], "Notification marked as read");

    let req = test::TestRequest::get()
        .uri("/api/dashboard/notifications/unread")
        .insert_header(bearer(&token))
        .to_request();
    let unread: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(unread, json!({ "unreadCount": 2 }));
    assert_eq!(
        harness.publisher.names().last().copied(),
        Some(event(LiveEventKind::NotificationUpdated))
    );
}

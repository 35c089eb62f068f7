//! Tests for the customer endpoints.

use super::*;
use crate::domain::NotificationType;
use crate::domain::ports::LiveEventKind;
use crate::inbound::http::test_utils::{bearer, test_app};
use crate::test_support::TestHarness;
use actix_web::http::StatusCode;
use actix_web::test;
use rstest::rstest;
use rust_xlsxwriter::Workbook;
use serde_json::{Value, json};

const BOUNDARY: &str = "collections-test-boundary";

fn customer_json(name: &str) -> Value {
    json!({
        "name": name,
        "phoneNumber": "9876543210",
        "email": "asha@example.com",
        "outstandingPayment": 2500.0,
        "paymentDueDate": "2026-04-01",
        "paymentStatus": "Pending"
    })
}

fn workbook(rows: &[[&str; 6]]) -> Vec<u8> {
    let headers = [
        "name",
        "phoneNumber",
        "email",
        "outstandingPayment",
        "paymentDueDate",
        "paymentStatus",
    ];
    let mut book = Workbook::new();
    let sheet = book.add_worksheet();
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).expect("header");
    }
    for (row, cells) in rows.iter().enumerate() {
        let row = row as u32 + 1;
        for (col, cell) in cells.iter().enumerate() {
            let written = match cell.parse::<f64>() {
                Ok(number) if col == 3 => sheet.write_number(row, col as u16, number),
                _ => sheet.write_string(row, col as u16, *cell),
            };
            written.expect("cell");
        }
    }
    book.save_to_buffer().expect("xlsx buffer")
}

fn multipart(field: &str, bytes: &[u8]) -> test::TestRequest {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"customers.xlsx\"\r\n\
         Content-Type: application/vnd.openxmlformats-officedocument.spreadsheetml.sheet\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    test::TestRequest::post()
        .uri("/api/dashboard/customers/upload-bulk")
        .insert_header((
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(body)
}

#[actix_web::test]
async fn create_stores_and_announces() {
    let harness = TestHarness::new();
    let token = harness.sign_in().await;
    let app = test::init_service(test_app(harness.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/dashboard/customers")
        .insert_header(bearer(&token))
        .set_json(customer_json("Asha Verma"))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["name"], "Asha Verma");
    assert_eq!(body["paymentDueDate"], "2026-04-01");
    let id = body["id"].as_str().expect("id").to_owned();

    let notifications = harness.notifications.all();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].draft.kind, NotificationType::NewCustomer);
    assert_eq!(notifications[0].draft.message, "New customer Asha Verma added");
    assert_eq!(
        notifications[0].draft.customer_id.as_ref().map(|id| id.as_str()),
        Some(id.as_str())
    );
    assert_eq!(
        harness.publisher.names(),
        vec![(
            LiveEventKind::NewNotification.channel(),
            LiveEventKind::NewNotification.name()
        )]
    );
}

#[actix_web::test]
async fn invalid_customer_is_rejected_without_side_effects() {
    let harness = TestHarness::new();
    let token = harness.sign_in().await;
    let app = test::init_service(test_app(harness.state.clone())).await;
    let mut payload = customer_json("Asha Verma");
    payload["phoneNumber"] = json!("123");
    payload["paymentDueDate"] = json!("2020-01-01");

    let req = test::TestRequest::post()
        .uri("/api/dashboard/customers")
        .insert_header(bearer(&token))
        .set_json(payload)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["details"]["errors"][0]["field"], "phoneNumber");
    assert_eq!(body["details"]["errors"][1]["field"], "paymentDueDate");
    assert!(harness.customers.all().is_empty());
    assert!(harness.notifications.all().is_empty());
    assert!(harness.publisher.events().is_empty());
}

#[actix_web::test]
async fn read_update_delete_cycle() {
    let harness = TestHarness::new();
    let token = harness.sign_in().await;
    let app = test::init_service(test_app(harness.state.clone())).await;

    let created: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/dashboard/customers")
            .insert_header(bearer(&token))
            .set_json(customer_json("Asha Verma"))
            .to_request(),
    )
    .await;
    let uri = format!("/api/dashboard/customers/{}", created["id"].as_str().expect("id"));

    let listed: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/dashboard/customers")
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));

    let count: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/dashboard/customers/count")
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(count, json!({ "totalCustomers": 1 }));

    let fetched: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&uri)
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(fetched["message"], "Customer retrieved successfully");
    assert_eq!(fetched["customer"]["email"], "asha@example.com");

    let updated: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::put()
            .uri(&uri)
            .insert_header(bearer(&token))
            .set_json(json!({ "paymentStatus": "Paid" }))
            .to_request(),
    )
    .await;
    assert_eq!(updated["message"], "Customer updated successfully");
    assert_eq!(updated["customer"]["paymentStatus"], "Paid");
    assert_eq!(updated["customer"]["name"], "Asha Verma");

    let deleted: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::delete()
            .uri(&uri)
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(deleted, json!({ "message": "Customer deleted successfully" }));
    assert!(harness.customers.all().is_empty());
    assert_eq!(harness.notifications.all().len(), 1);
}

#[rstest]
#[case(test::TestRequest::get())]
#[case(test::TestRequest::put().set_json(json!({ "name": "Someone" })))]
#[case(test::TestRequest::delete())]
#[actix_web::test]
async fn unknown_customer_is_not_found(#[case] req: test::TestRequest) {
    let harness = TestHarness::new();
    let token = harness.sign_in().await;
    let app = test::init_service(test_app(harness.state.clone())).await;
    let req = req
        .uri("/api/dashboard/customers/missing")
        .insert_header(bearer(&token))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "Customer not found");
}

#[actix_web::test]
async fn listing_requires_a_session() {
    let harness = TestHarness::new();
    let app = test::init_service(test_app(harness.state.clone())).await;
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/dashboard/customers")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn bulk_upload_stores_every_row() {
    let harness = TestHarness::new();
    let token = harness.sign_in().await;
    let app = test::init_service(test_app(harness.state.clone())).await;
    let bytes = workbook(&[
        ["Asha Verma", "9876543210", "asha@example.com", "2500", "2026-04-01", "Pending"],
        ["Ravi Kumar", "9123456780", "ravi@example.com", "0", "2026-05-01", "Paid"],
    ]);

    let res = test::call_service(
        &app,
        multipart("file", &bytes).insert_header(bearer(&token)).to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "Bulk upload successful");
    let names: Vec<_> = body["data"]
        .as_array()
        .expect("data")
        .iter()
        .map(|c| c["name"].as_str().expect("name").to_owned())
        .collect();
    assert_eq!(names, ["Asha Verma", "Ravi Kumar"]);
    assert_eq!(harness.customers.all().len(), 2);
    assert_eq!(harness.notifications.all().len(), 2);
    assert_eq!(harness.publisher.events().len(), 2);
}

#[actix_web::test]
async fn bulk_upload_rejects_the_first_invalid_row() {
    let harness = TestHarness::new();
    let token = harness.sign_in().await;
    let app = test::init_service(test_app(harness.state.clone())).await;
    let bytes = workbook(&[
        ["Asha Verma", "9876543210", "asha@example.com", "2500", "2026-04-01", "Pending"],
        ["Ravi Kumar", "9123456780", "not-an-email", "0", "2026-05-01", "Paid"],
    ]);

    let res = test::call_service(
        &app,
        multipart("file", &bytes).insert_header(bearer(&token)).to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "Invalid data in row 2");
    assert!(harness.customers.all().is_empty());
    assert!(harness.notifications.all().is_empty());
}

#[rstest]
#[case("attachment", b"irrelevant".as_slice(), "No file uploaded")]
#[case("file", b"".as_slice(), "No file uploaded")]
#[case("file", b"definitely not xlsx".as_slice(), "Invalid spreadsheet")]
#[actix_web::test]
async fn bulk_upload_needs_a_readable_file(
    #[case] field: &str,
    #[case] bytes: &[u8],
    #[case] message: &str,
) {
    let harness = TestHarness::new();
    let token = harness.sign_in().await;
    let app = test::init_service(test_app(harness.state.clone())).await;
    let res = test::call_service(
        &app,
        multipart(field, bytes).insert_header(bearer(&token)).to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], message);
}

#[actix_web::test]
async fn bulk_upload_caps_the_file_size() {
    let harness = TestHarness::new();
    let token = harness.sign_in().await;
    let app = test::init_service(test_app(harness.state.clone())).await;
    let oversized = vec![b'x'; UPLOAD_LIMIT_BYTES + 1];
    let res = test::call_service(
        &app,
        multipart("file", &oversized)
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "Uploaded file is too large");
    assert_eq!(body["details"]["limit"], UPLOAD_LIMIT_BYTES);
    assert!(harness.customers.all().is_empty());
}

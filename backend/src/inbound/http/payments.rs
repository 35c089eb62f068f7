//! Payment endpoints.
//!
//! ```text
//! GET  /api/dashboard/payments?customerId=cust-1
//! POST /api/dashboard/payments {"customer":"Asha Verma","customerId":"cust-1","amount":1500,"date":"2026-11-01","status":"Pending"}
//! PUT  /api/dashboard/payments/{id} {"status":"Paid"}
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Error, Payment, PaymentInput};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::{PaymentEnvelope, PaymentList};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::document_id;

/// `GET /api/dashboard/payments` filter.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct PaymentListQuery {
    /// Only payments for this customer.
    pub customer_id: Option<String>,
}

/// `PUT /api/dashboard/payments/{id}` body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct StatusUpdate {
    /// `Paid` or `Pending`.
    #[schema(example = "Paid")]
    pub status: Option<String>,
}

/// List payments, optionally for one customer.
#[utoipa::path(
    get,
    path = "/api/dashboard/payments",
    params(PaymentListQuery),
    responses(
        (status = 200, description = "Up to 1000 payments", body = PaymentList),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["payments"],
    operation_id = "listPayments"
)]
#[get("/dashboard/payments")]
pub async fn list_payments(
    _user: AuthenticatedUser,
    state: web::Data<HttpState>,
    query: web::Query<PaymentListQuery>,
) -> ApiResult<web::Json<PaymentList>> {
    let customer_id = query
        .into_inner()
        .customer_id
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| document_id(&raw, "Invalid customerId"))
        .transpose()?;
    let payments = state.payments.list(customer_id).await?;
    Ok(web::Json(PaymentList { payments }))
}

/// Record a payment.
#[utoipa::path(
    post,
    path = "/api/dashboard/payments",
    request_body = PaymentInput,
    responses(
        (status = 201, description = "Payment stored", body = Payment),
        (status = 400, description = "Validation failed", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["payments"],
    operation_id = "createPayment"
)]
#[post("/dashboard/payments")]
pub async fn create_payment(
    _user: AuthenticatedUser,
    state: web::Data<HttpState>,
    payload: web::Json<PaymentInput>,
) -> ApiResult<HttpResponse> {
    let payment = state.payments.create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(payment))
}

/// Change a payment's status.
#[utoipa::path(
    put,
    path = "/api/dashboard/payments/{id}",
    params(("id" = String, Path, description = "Payment identifier")),
    request_body = StatusUpdate,
    responses(
        (status = 200, description = "Updated payment", body = PaymentEnvelope),
        (status = 400, description = "Missing or invalid status", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Payment not found", body = Error)
    ),
    tags = ["payments"],
    operation_id = "updatePaymentStatus"
)]
#[put("/dashboard/payments/{id}")]
pub async fn update_payment_status(
    _user: AuthenticatedUser,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<StatusUpdate>,
) -> ApiResult<web::Json<PaymentEnvelope>> {
    let id = document_id(&path, "Payment ID and status are required")?;
    let payment = state
        .payments
        .update_status(&id, payload.into_inner().status)
        .await?;
    Ok(web::Json(PaymentEnvelope {
        message: "Payment status updated successfully".to_owned(),
        payment,
    }))
}

#[cfg(test)]
#[path = "payments_tests.rs"]
mod tests;

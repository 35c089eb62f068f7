//! Customer management endpoints.
//!
//! ```text
//! GET    /api/dashboard/customers
//! POST   /api/dashboard/customers {"name":"Asha Verma","phoneNumber":"9876543210",...}
//! GET    /api/dashboard/customers/count
//! POST   /api/dashboard/customers/upload-bulk   (multipart, field `file`)
//! GET    /api/dashboard/customers/{id}
//! PUT    /api/dashboard/customers/{id} {"paymentStatus":"Paid"}
//! DELETE /api/dashboard/customers/{id}
//! ```

use actix_multipart::Multipart;
use actix_web::{HttpResponse, delete, get, post, put, web};
use futures_util::TryStreamExt;
use serde_json::json;
use tracing::warn;
use utoipa::ToSchema;

use crate::domain::{Customer, CustomerInput, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::{
    BulkUploadResponse, CustomerCount, CustomerEnvelope, MessageResponse,
};
use crate::inbound::http::spreadsheet::customer_rows;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::document_id;

/// Largest accepted spreadsheet upload.
pub const UPLOAD_LIMIT_BYTES: usize = 5 * 1024 * 1024;

const CUSTOMER_ID_REQUIRED: &str = "Customer ID is required";

/// Multipart form accepted by the bulk upload.
#[derive(ToSchema)]
pub struct BulkUploadForm {
    /// `.xlsx` workbook; the first row holds field names.
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

fn multipart_error(err: impl std::fmt::Display) -> Error {
    Error::invalid_request("Invalid multipart body").with_details(json!({
        "code": "malformed_multipart",
        "reason": err.to_string(),
    }))
}

/// Contents of the `file` field, or `None` when it is absent or empty.
async fn uploaded_file(mut payload: Multipart) -> ApiResult<Option<Vec<u8>>> {
    while let Some(mut field) = payload.try_next().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }
        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(multipart_error)? {
            if bytes.len() + chunk.len() > UPLOAD_LIMIT_BYTES {
                return Err(Error::invalid_request("Uploaded file is too large")
                    .with_details(json!({ "limit": UPLOAD_LIMIT_BYTES })));
            }
            bytes.extend_from_slice(&chunk);
        }
        return Ok((!bytes.is_empty()).then_some(bytes));
    }
    Ok(None)
}

/// List customers.
#[utoipa::path(
    get,
    path = "/api/dashboard/customers",
    responses(
        (status = 200, description = "Up to 1000 customers", body = [Customer]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Document store unavailable", body = Error)
    ),
    tags = ["customers"],
    operation_id = "listCustomers"
)]
#[get("/dashboard/customers")]
pub async fn list_customers(
    _user: AuthenticatedUser,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<Customer>>> {
    state.customers.list().await.map(web::Json)
}

/// Create a customer.
#[utoipa::path(
    post,
    path = "/api/dashboard/customers",
    request_body = CustomerInput,
    responses(
        (status = 201, description = "Customer stored", body = Customer),
        (status = 400, description = "Validation failed", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["customers"],
    operation_id = "createCustomer"
)]
#[post("/dashboard/customers")]
pub async fn create_customer(
    _user: AuthenticatedUser,
    state: web::Data<HttpState>,
    payload: web::Json<CustomerInput>,
) -> ApiResult<HttpResponse> {
    let customer = state.customers.create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(customer))
}

/// Number of stored customers.
#[utoipa::path(
    get,
    path = "/api/dashboard/customers/count",
    responses(
        (status = 200, description = "Customer count", body = CustomerCount),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["customers"],
    operation_id = "countCustomers"
)]
#[get("/dashboard/customers/count")]
pub async fn count_customers(
    _user: AuthenticatedUser,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<CustomerCount>> {
    let total_customers = state.customers.count().await?;
    Ok(web::Json(CustomerCount { total_customers }))
}

/// Import customers from a spreadsheet.
///
/// Every row is validated before anything is stored.
#[utoipa::path(
    post,
    path = "/api/dashboard/customers/upload-bulk",
    request_body(content = BulkUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Customers stored", body = BulkUploadResponse),
        (status = 400, description = "Missing file, unreadable workbook, or invalid row", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["customers"],
    operation_id = "uploadCustomers"
)]
#[post("/dashboard/customers/upload-bulk")]
pub async fn upload_customers(
    _user: AuthenticatedUser,
    state: web::Data<HttpState>,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    let bytes = uploaded_file(payload)
        .await?
        .ok_or_else(|| Error::invalid_request("No file uploaded"))?;
    let rows = customer_rows(bytes).map_err(|err| {
        warn!(error = %err, "rejected bulk upload workbook");
        Error::invalid_request("Invalid spreadsheet").with_details(json!({
            "code": "unreadable_workbook",
            "reason": err.to_string(),
        }))
    })?;
    let data = state.customers.import(rows).await?;
    Ok(HttpResponse::Created().json(BulkUploadResponse {
        message: "Bulk upload successful".to_owned(),
        data,
    }))
}

/// Fetch one customer.
#[utoipa::path(
    get,
    path = "/api/dashboard/customers/{id}",
    params(("id" = String, Path, description = "Customer identifier")),
    responses(
        (status = 200, description = "Customer", body = CustomerEnvelope),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Customer not found", body = Error)
    ),
    tags = ["customers"],
    operation_id = "getCustomer"
)]
#[get("/dashboard/customers/{id}")]
pub async fn get_customer(
    _user: AuthenticatedUser,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<CustomerEnvelope>> {
    let id = document_id(&path, CUSTOMER_ID_REQUIRED)?;
    let customer = state.customers.get(&id).await?;
    Ok(web::Json(CustomerEnvelope {
        message: "Customer retrieved successfully".to_owned(),
        customer,
    }))
}

/// Update the fields present in the body.
#[utoipa::path(
    put,
    path = "/api/dashboard/customers/{id}",
    params(("id" = String, Path, description = "Customer identifier")),
    request_body = CustomerInput,
    responses(
        (status = 200, description = "Updated customer", body = CustomerEnvelope),
        (status = 400, description = "Validation failed", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Customer not found", body = Error)
    ),
    tags = ["customers"],
    operation_id = "updateCustomer"
)]
#[put("/dashboard/customers/{id}")]
pub async fn update_customer(
    _user: AuthenticatedUser,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<CustomerInput>,
) -> ApiResult<web::Json<CustomerEnvelope>> {
    let id = document_id(&path, CUSTOMER_ID_REQUIRED)?;
    let customer = state.customers.update(&id, payload.into_inner()).await?;
    Ok(web::Json(CustomerEnvelope {
        message: "Customer updated successfully".to_owned(),
        customer,
    }))
}

/// Remove a customer.
#[utoipa::path(
    delete,
    path = "/api/dashboard/customers/{id}",
    params(("id" = String, Path, description = "Customer identifier")),
    responses(
        (status = 200, description = "Customer removed", body = MessageResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Customer not found", body = Error)
    ),
    tags = ["customers"],
    operation_id = "deleteCustomer"
)]
#[delete("/dashboard/customers/{id}")]
pub async fn delete_customer(
    _user: AuthenticatedUser,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id = document_id(&path, CUSTOMER_ID_REQUIRED)?;
    state.customers.delete(&id).await?;
    Ok(web::Json(MessageResponse::new("Customer deleted successfully")))
}

#[cfg(test)]
#[path = "customers_tests.rs"]
mod tests;

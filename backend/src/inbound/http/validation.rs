//! Shared request-decoding helpers for inbound HTTP adapters.
//!
//! Extractor failures are mapped onto the domain error so malformed bodies
//! and query strings get the same JSON envelope as validation failures.

use actix_web::{HttpRequest, error::JsonPayloadError, error::QueryPayloadError, web};
use serde_json::json;

use crate::domain::{DocumentId, Error};

/// Largest accepted JSON body.
pub const JSON_LIMIT_BYTES: usize = 256 * 1024;

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let code = match &err {
        JsonPayloadError::ContentType => "unsupported_content_type",
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            "payload_too_large"
        }
        _ => "malformed_json",
    };
    Error::invalid_request("Invalid request body")
        .with_details(json!({ "code": code, "reason": err.to_string() }))
        .into()
}

fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request("Invalid query string")
        .with_details(json!({ "code": "malformed_query", "reason": err.to_string() }))
        .into()
}

/// JSON extractor configuration used by every route.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT_BYTES)
        .error_handler(json_error)
}

/// Query extractor configuration used by every route.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(query_error)
}

/// Interpret a path or query value as a document identifier.
pub(crate) fn document_id(raw: &str, message: &'static str) -> Result<DocumentId, Error> {
    DocumentId::new(raw).map_err(|_| Error::invalid_request(message))
}

/// Require an optional, non-blank query or body value.
pub(crate) fn required_value(
    value: Option<String>,
    message: &'static str,
) -> Result<String, Error> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|raw| !raw.is_empty())
        .ok_or_else(|| Error::invalid_request(message))
}

//! WebSocket inbound adapter streaming live updates to dashboards.
//!
//! Responsibilities:
//! - validate upgrade requests against the configured origin allow-list
//! - attach each connection to the in-process event relay
//! - keep WebSocket-specific concerns at the edge of the system

use actix_web::web::{self, Payload};
use actix_web::{
    HttpRequest, HttpResponse, get,
    http::header::{HeaderValue, ORIGIN},
};
use tracing::{error, warn};
use url::Url;

mod session;

pub mod state;

/// Handle WebSocket upgrade for the `/ws` endpoint.
#[utoipa::path(
    get,
    path = "/ws",
    tags = ["live"],
    security([]),
    responses(
        (status = 101, description = "Switching to the live-update socket"),
        (status = 400, description = "Malformed Origin header"),
        (status = 403, description = "Origin not allowed")
    )
)]
#[get("/ws")]
pub async fn ws_entry(
    state: web::Data<state::WsState>,
    req: HttpRequest,
    stream: Payload,
) -> actix_web::Result<HttpResponse> {
    let mut origin_iter = req.headers().get_all(ORIGIN);
    let origin_header = origin_iter.next().ok_or_else(|| {
        error!("Missing Origin header on WebSocket upgrade");
        actix_web::error::ErrorForbidden("Origin not allowed")
    })?;
    if origin_iter.next().is_some() {
        error!("Multiple Origin headers on WebSocket upgrade");
        return Err(actix_web::error::ErrorBadRequest("Invalid Origin header"));
    }

    validate_origin(origin_header, &state.allowed_origins)?;

    let (response, session, stream) = actix_ws::handle(&req, stream).map_err(|error| {
        error!(error = %error, "WebSocket upgrade failed");
        actix_web::error::ErrorInternalServerError("WebSocket upgrade failed")
    })?;
    let events = state.events.subscribe();
    actix_web::rt::spawn(session::handle_ws_session(events, session, stream));
    Ok(response)
}

fn validate_origin(origin_header: &HeaderValue, allowed: &[String]) -> actix_web::Result<()> {
    let origin_value = match origin_header.to_str() {
        Ok(value) => value,
        Err(error) => {
            error!(error = %error, "Failed to parse Origin header as string");
            return Err(actix_web::error::ErrorBadRequest("Invalid Origin header"));
        }
    };

    let origin = Url::parse(origin_value).map_err(|error| {
        error!(error = %error, "Failed to parse Origin header as URL");
        actix_web::error::ErrorBadRequest("Invalid Origin header")
    })?;

    if is_allowed_origin(&origin, allowed) {
        Ok(())
    } else {
        warn!(
            origin = origin_value,
            "Rejected WS upgrade due to disallowed Origin"
        );
        Err(actix_web::error::ErrorForbidden("Origin not allowed"))
    }
}

/// Returns true when the parsed Origin matches an allow-list entry by
/// scheme, host and port.
fn is_allowed_origin(origin: &Url, allowed: &[String]) -> bool {
    if !matches!(origin.scheme(), "http" | "https") {
        return false;
    }
    let candidate = origin.origin().ascii_serialization();
    allowed.iter().any(|entry| {
        Url::parse(entry)
            .map(|url| url.origin().ascii_serialization() == candidate)
            .unwrap_or(false)
    })
}

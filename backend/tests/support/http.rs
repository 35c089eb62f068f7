//! HTTP helpers shared by the integration test crates.
//!
//! Each file under `backend/tests/` compiles as its own crate, so the app
//! factory and request helpers live here instead of being copied around.

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use backend::Trace;
use backend::inbound::http::configure;
use backend::inbound::http::state::HttpState;

/// The `/api` surface exactly as the server mounts it.
pub fn api_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(Trace)
        .configure(configure)
}

/// `Authorization` header carrying `token`.
pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

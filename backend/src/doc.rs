//! OpenAPI documentation for the dashboard API.
//!
//! [`ApiDoc`] registers every handler under `/api`, the health probes and the
//! WebSocket upgrade, plus two equivalent security schemes: a bearer JWT and
//! the `jwt` cookie set by `POST /api/auth/login`. The document is served at
//! `/api/swagger`, browsed through Swagger UI at `/docs` in debug builds, and
//! printed by the `openapi-dump` binary.

use actix_web::{HttpResponse, get};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    Customer, CustomerInput, Error, ErrorCode, LoginInput, Notification, NotificationType,
    OverdueSweepReport, Payment, PaymentInput, PaymentStatus, RecentPayment, RegistrationInput,
    UserProfile,
};
use crate::inbound::http::auth::{EmailLookupRequest, TokenResponse};
use crate::inbound::http::customers::BulkUploadForm;
use crate::inbound::http::notifications::ReadFlag;
use crate::inbound::http::payments::StatusUpdate;
use crate::inbound::http::schemas::{
    BulkUploadResponse, CollectionRate, CustomerCount, CustomerEnvelope, MarkReadResponse,
    MessageResponse, NotificationList, OverdueAmount, PaymentEnvelope, PaymentList,
    RecentPayments, TotalCollected, UnreadCount,
};

/// Name of the bearer token security scheme.
pub const BEARER_SCHEME: &str = "BearerJwt";
/// Name of the cookie security scheme.
pub const COOKIE_SCHEME: &str = "JwtCookie";

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token returned by POST /api/auth/login."))
                    .build(),
            ),
        );
        components.add_security_scheme(
            COOKIE_SCHEME,
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "jwt",
                "Cookie set by POST /api/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Payment collection API",
        description = "Customers, payments, notifications and live updates for the collections dashboard."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerJwt" = []), ("JwtCookie" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::user_by_id,
        crate::inbound::http::auth::user_by_email,
        crate::inbound::http::auth::user_details,
        crate::inbound::http::auth::current_user,
        crate::inbound::http::customers::list_customers,
        crate::inbound::http::customers::create_customer,
        crate::inbound::http::customers::count_customers,
        crate::inbound::http::customers::upload_customers,
        crate::inbound::http::customers::get_customer,
        crate::inbound::http::customers::update_customer,
        crate::inbound::http::customers::delete_customer,
        crate::inbound::http::payments::list_payments,
        crate::inbound::http::payments::create_payment,
        crate::inbound::http::payments::update_payment_status,
        crate::inbound::http::dashboard::overdue_amount,
        crate::inbound::http::dashboard::total_collected,
        crate::inbound::http::dashboard::recent_payments,
        crate::inbound::http::dashboard::collection_rate,
        crate::inbound::http::notifications::list_notifications,
        crate::inbound::http::notifications::unread_count,
        crate::inbound::http::notifications::mark_notification,
        crate::inbound::http::cron::overdue_sweep,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
        crate::inbound::ws::ws_entry,
    ),
    components(schemas(
        Error,
        ErrorCode,
        UserProfile,
        RegistrationInput,
        LoginInput,
        TokenResponse,
        EmailLookupRequest,
        MessageResponse,
        Customer,
        CustomerInput,
        CustomerEnvelope,
        CustomerCount,
        BulkUploadForm,
        BulkUploadResponse,
        Payment,
        PaymentInput,
        PaymentStatus,
        PaymentList,
        PaymentEnvelope,
        StatusUpdate,
        RecentPayment,
        RecentPayments,
        OverdueAmount,
        TotalCollected,
        CollectionRate,
        Notification,
        NotificationType,
        NotificationList,
        UnreadCount,
        ReadFlag,
        MarkReadResponse,
        OverdueSweepReport,
    )),
    tags(
        (name = "auth", description = "Accounts and sessions"),
        (name = "customers", description = "Customer records"),
        (name = "payments", description = "Payment records"),
        (name = "dashboard", description = "Aggregate payment figures"),
        (name = "notifications", description = "Notification log"),
        (name = "cron", description = "Scheduler hooks"),
        (name = "health", description = "Liveness and readiness probes"),
        (name = "live", description = "WebSocket live updates")
    )
)]
pub struct ApiDoc;

/// Serve the OpenAPI document; mounted under `/api`.
#[get("/swagger")]
pub async fn swagger_document() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

//! Account endpoints and request authentication.
//!
//! ```text
//! POST /api/auth/register {"username":"collections_admin","email":"admin@example.com","password":"s3cret!","confirmPassword":"s3cret!"}
//! POST /api/auth/login {"email":"admin@example.com","password":"s3cret!"}
//! GET  /api/auth/me
//! ```
//!
//! Protected handlers take an [`AuthenticatedUser`], which reads the token
//! from `Authorization: Bearer` or, failing that, the `jwt` cookie.

use std::future::{Ready, ready};

use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Error, LoginInput, RegistrationInput, SessionClaims, UserId, UserProfile};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::MessageResponse;
use crate::inbound::http::state::{CookieSettings, HttpState};
use crate::inbound::http::validation::required_value;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "jwt";

/// Identity proven by a valid session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    claims: SessionClaims,
}

impl AuthenticatedUser {
    /// Authenticated account.
    pub fn user_id(&self) -> &UserId {
        &self.claims.user_id
    }

    /// Email captured when the token was issued.
    pub fn email(&self) -> &str {
        &self.claims.email
    }
}

fn presented_token(req: &HttpRequest) -> Option<String> {
    let bearer = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| {
            value
                .strip_prefix("Bearer ")
                .or_else(|| value.strip_prefix("bearer "))
        })
        .map(str::trim)
        .filter(|token| !token.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_owned());
    }
    req.cookie(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_owned())
        .filter(|token| !token.is_empty())
}

fn authenticate_request(req: &HttpRequest) -> Result<AuthenticatedUser, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state not configured"))?;
    let token = presented_token(req).ok_or_else(|| Error::unauthorized("Unauthorized"))?;
    let claims = state.auth.authenticate(&token)?;
    Ok(AuthenticatedUser { claims })
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate_request(req))
    }
}

fn session_cookie(token: String, max_age_secs: i64, settings: CookieSettings) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(settings.secure)
        .max_age(CookieDuration::seconds(max_age_secs))
        .finish()
}

fn expired_session_cookie(settings: CookieSettings) -> Cookie<'static> {
    let mut cookie = session_cookie(String::new(), 0, settings);
    cookie.make_removal();
    cookie
}

/// Successful login body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// Signed session token.
    pub token: String,
}

/// `GET /api/auth` query.
#[derive(Debug, Deserialize, IntoParams)]
pub struct UserIdQuery {
    /// Account identifier.
    pub id: Option<String>,
}

/// `GET /api/auth/user` query.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct UserDetailsQuery {
    /// Account identifier.
    pub user_id: Option<String>,
}

/// `POST /api/auth` body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct EmailLookupRequest {
    /// Login email.
    #[schema(example = "admin@example.com")]
    pub email: Option<String>,
}

async fn lookup_by_raw_id(state: &HttpState, raw: String) -> ApiResult<UserProfile> {
    // Anything that is not a UUID cannot name an account.
    let id = UserId::new(&raw).map_err(|_| Error::not_found("User not found"))?;
    state.auth.user_by_id(&id).await
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegistrationInput,
    responses(
        (status = 200, description = "Account created", body = MessageResponse),
        (status = 400, description = "Validation failed", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegistrationInput>,
) -> ApiResult<web::Json<MessageResponse>> {
    state.auth.register(payload.into_inner()).await?;
    Ok(web::Json(MessageResponse::new("User registered successfully")))
}

/// Exchange credentials for a session token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginInput,
    responses(
        (status = 200, description = "Login success", body = TokenResponse,
            headers(("Set-Cookie" = String, description = "`jwt` session cookie"))),
        (status = 400, description = "Validation failed", body = Error),
        (status = 401, description = "Invalid email or password", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginInput>,
) -> ApiResult<HttpResponse> {
    let issued = state.auth.login(payload.into_inner()).await?;
    let cookie = session_cookie(issued.token.clone(), issued.max_age_secs, state.cookie);
    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(TokenResponse {
            token: issued.token,
        }))
}

/// Clear the session cookie.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses((status = 200, description = "Cookie cleared", body = MessageResponse)),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/auth/logout")]
pub async fn logout(state: web::Data<HttpState>) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(expired_session_cookie(state.cookie))
        .json(MessageResponse::new("Logged out successfully"))
}

/// Look up an account by identifier.
#[utoipa::path(
    get,
    path = "/api/auth",
    params(UserIdQuery),
    responses(
        (status = 200, description = "Account", body = UserProfile),
        (status = 400, description = "Missing id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No such account", body = Error)
    ),
    tags = ["auth"],
    operation_id = "userById"
)]
#[get("/auth")]
pub async fn user_by_id(
    _user: AuthenticatedUser,
    state: web::Data<HttpState>,
    query: web::Query<UserIdQuery>,
) -> ApiResult<web::Json<UserProfile>> {
    let raw = required_value(query.into_inner().id, "ID is required")?;
    lookup_by_raw_id(&state, raw).await.map(web::Json)
}

/// Look up an account by email.
#[utoipa::path(
    post,
    path = "/api/auth",
    request_body = EmailLookupRequest,
    responses(
        (status = 200, description = "Account", body = UserProfile),
        (status = 400, description = "Missing email", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No such account", body = Error)
    ),
    tags = ["auth"],
    operation_id = "userByEmail"
)]
#[post("/auth")]
pub async fn user_by_email(
    _user: AuthenticatedUser,
    state: web::Data<HttpState>,
    payload: web::Json<EmailLookupRequest>,
) -> ApiResult<web::Json<UserProfile>> {
    let email = required_value(payload.into_inner().email, "Email is required")?;
    state.auth.user_by_email(&email).await.map(web::Json)
}

/// Account details for a user id.
#[utoipa::path(
    get,
    path = "/api/auth/user",
    params(UserDetailsQuery),
    responses(
        (status = 200, description = "Account", body = UserProfile),
        (status = 400, description = "Missing userId", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No such account", body = Error)
    ),
    tags = ["auth"],
    operation_id = "userDetails"
)]
#[get("/auth/user")]
pub async fn user_details(
    _user: AuthenticatedUser,
    state: web::Data<HttpState>,
    query: web::Query<UserDetailsQuery>,
) -> ApiResult<web::Json<UserProfile>> {
    let raw = required_value(query.into_inner().user_id, "User ID is required")?;
    lookup_by_raw_id(&state, raw).await.map(web::Json)
}

/// The signed-in account.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Account", body = UserProfile),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Account removed", body = Error)
    ),
    tags = ["auth"],
    operation_id = "currentUser"
)]
#[get("/auth/me")]
pub async fn current_user(
    user: AuthenticatedUser,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<UserProfile>> {
    state.auth.user_by_id(user.user_id()).await.map(web::Json)
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;

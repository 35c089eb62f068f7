//! Notification log endpoints.

use actix_web::{get, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::validation::{ValidationErrors, required};
use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::{MarkReadResponse, NotificationList, UnreadCount};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::document_id;

/// `PUT /api/dashboard/notifications/{id}` body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ReadFlag {
    /// New read state.
    pub read: Option<bool>,
}

/// The 100 most recent notifications.
#[utoipa::path(
    get,
    path = "/api/dashboard/notifications",
    responses(
        (status = 200, description = "Notifications, newest first", body = NotificationList),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "listNotifications"
)]
#[get("/dashboard/notifications")]
pub async fn list_notifications(
    _user: AuthenticatedUser,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<NotificationList>> {
    let notifications = state.notifications.list().await?;
    Ok(web::Json(NotificationList { notifications }))
}

/// Number of unread notifications.
#[utoipa::path(
    get,
    path = "/api/dashboard/notifications/unread",
    responses(
        (status = 200, description = "Unread count", body = UnreadCount),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "unreadNotifications"
)]
#[get("/dashboard/notifications/unread")]
pub async fn unread_count(
    _user: AuthenticatedUser,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<UnreadCount>> {
    let unread_count = state.notifications.unread_count().await?;
    Ok(web::Json(UnreadCount { unread_count }))
}

/// Set a notification's read flag.
#[utoipa::path(
    put,
    path = "/api/dashboard/notifications/{id}",
    params(("id" = String, Path, description = "Notification identifier")),
    request_body = ReadFlag,
    responses(
        (status = 200, description = "Flag updated", body = MarkReadResponse),
        (status = 400, description = "Missing read flag", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Notification not found", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "markNotification"
)]
#[put("/dashboard/notifications/{id}")]
pub async fn mark_notification(
    _user: AuthenticatedUser,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<ReadFlag>,
) -> ApiResult<web::Json<MarkReadResponse>> {
    let id = document_id(&path, "Notification ID is required")?;
    let mut errors = ValidationErrors::new();
    let read = errors.check(required("read", payload.into_inner().read));
    let read = errors.finish(|| read)?;

    state.notifications.mark_read(&id, read).await?;
    let message = if read {
        "Notification marked as read"
    } else {
        "Notification marked as unread"
    };
    Ok(web::Json(MarkReadResponse {
        message: message.to_owned(),
        notification_id: id.to_string(),
    }))
}

#[cfg(test)]
#[path = "notifications_tests.rs"]
mod tests;

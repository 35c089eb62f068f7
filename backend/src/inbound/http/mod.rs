//! HTTP inbound adapter exposing the dashboard REST API under `/api`.

pub mod auth;
pub mod cron;
pub mod customers;
pub mod dashboard;
pub mod error;
pub mod health;
pub mod notifications;
pub mod payments;
pub mod schemas;
pub mod spreadsheet;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api` route plus the JSON and query extractor settings.
///
/// Literal paths are registered ahead of the `{id}` routes that share their
/// prefix.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(validation::json_config())
        .app_data(validation::query_config())
        .service(
            web::scope("/api")
                .service(auth::register)
                .service(auth::login)
                .service(auth::logout)
                .service(auth::current_user)
                .service(auth::user_details)
                .service(auth::user_by_id)
                .service(auth::user_by_email)
                .service(customers::count_customers)
                .service(customers::upload_customers)
                .service(customers::list_customers)
                .service(customers::create_customer)
                .service(customers::get_customer)
                .service(customers::update_customer)
                .service(customers::delete_customer)
                .service(dashboard::overdue_amount)
                .service(dashboard::total_collected)
                .service(dashboard::recent_payments)
                .service(dashboard::collection_rate)
                .service(payments::list_payments)
                .service(payments::create_payment)
                .service(payments::update_payment_status)
                .service(notifications::unread_count)
                .service(notifications::list_notifications)
                .service(notifications::mark_notification)
                .service(cron::overdue_sweep)
                .service(crate::doc::swagger_document),
        );
}

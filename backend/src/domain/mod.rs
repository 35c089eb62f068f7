//! Domain entities, validation rules, services, and driven ports.
//!
//! Purpose: keep the collection workflow independent of HTTP, the document
//! store, and the live-update relay. Inbound adapters parse untrusted input
//! into the `*Input` types; services validate, persist through the ports,
//! and fan out notifications.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Customer, Payment, Notification, User: stored entities.
//! - CustomerService, PaymentService, NotificationService, DashboardService,
//!   OverdueSweep, AuthService: the operations exposed over HTTP.

pub mod auth;
mod auth_service;
pub mod customer;
mod customer_service;
mod dashboard_service;
pub mod dates;
pub mod document;
pub mod error;
pub mod money;
pub mod notification;
mod notification_service;
mod overdue_sweep;
pub mod payment;
mod payment_service;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod validation;

pub use self::auth::{
    IssuedToken, LoginCredentials, LoginInput, Registration, RegistrationInput, SessionClaims,
};
pub use self::auth_service::{AuthService, INVALID_CREDENTIALS};
pub use self::customer::{Customer, CustomerInput, CustomerPatch, CustomerRecord, NewCustomer};
pub use self::customer_service::{CUSTOMER_LIST_LIMIT, CustomerService};
pub use self::dashboard_service::{DashboardService, RECENT_PAYMENTS_LIMIT, RecentPayment};
pub use self::document::{DocumentId, DocumentIdError};
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::notification::{Notification, NotificationDraft, NotificationType};
pub use self::notification_service::{NOTIFICATION_LIST_LIMIT, NotificationService};
pub use self::overdue_sweep::{OverdueSweep, OverdueSweepReport};
pub use self::payment::{NewPayment, Payment, PaymentInput, PaymentRecord, PaymentStatus};
pub use self::payment_service::{PAYMENT_LIST_LIMIT, PaymentService};
pub use self::trace_id::TraceId;
pub use self::user::{User, UserId, UserIdError, UserProfile};
pub use self::validation::{FieldViolation, ValidationErrors};

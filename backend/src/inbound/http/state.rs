//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain services, which in turn depend on ports. Tests assemble it from
//! in-memory adapters.

use std::sync::Arc;

use zeroize::Zeroizing;

use crate::domain::{
    AuthService, CustomerService, DashboardService, NotificationService, OverdueSweep,
    PaymentService,
};

/// `jwt` cookie attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookieSettings {
    /// Whether the cookie is marked `Secure`.
    pub secure: bool,
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self { secure: true }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub auth: AuthService,
    pub customers: CustomerService,
    pub payments: PaymentService,
    pub dashboard: DashboardService,
    pub notifications: NotificationService,
    pub sweep: OverdueSweep,
    pub cron_secret: Option<Arc<Zeroizing<String>>>,
    pub cookie: CookieSettings,
}

/// Services backing the HTTP adapter.
#[derive(Clone)]
pub struct HttpStateServices {
    pub auth: AuthService,
    pub customers: CustomerService,
    pub payments: PaymentService,
    pub dashboard: DashboardService,
    pub notifications: NotificationService,
    pub sweep: OverdueSweep,
}

impl HttpState {
    /// Construct state with secure cookies and an open cron endpoint.
    pub fn new(services: HttpStateServices) -> Self {
        let HttpStateServices {
            auth,
            customers,
            payments,
            dashboard,
            notifications,
            sweep,
        } = services;
        Self {
            auth,
            customers,
            payments,
            dashboard,
            notifications,
            sweep,
            cron_secret: None,
            cookie: CookieSettings::default(),
        }
    }

    /// Require `Authorization: Bearer {secret}` on the cron endpoint.
    #[must_use]
    pub fn with_cron_secret(mut self, secret: Option<Zeroizing<String>>) -> Self {
        self.cron_secret = secret.map(Arc::new);
        self
    }

    /// Override the `jwt` cookie attributes.
    #[must_use]
    pub fn with_cookie(mut self, cookie: CookieSettings) -> Self {
        self.cookie = cookie;
        self
    }
}

//! Adapter wiring shared by the server and the `sweep-overdue` binary.

use std::sync::Arc;
use std::time::Duration;

use mockable::Clock;
use thiserror::Error;
use tracing::info;

use crate::config::AppConfig;
use crate::domain::ports::{DocumentStoreError, EventPublisher, EventPublisherError};
use crate::domain::{
    AuthService, CustomerService, DashboardService, NotificationService, OverdueSweep,
    PaymentService,
};
use crate::inbound::http::state::HttpStateServices;
use crate::outbound::broadcast::BroadcastPublisher;
use crate::outbound::elasticsearch::{
    ElasticsearchClient, ElasticsearchConfig, ElasticsearchCustomerRepository,
    ElasticsearchNotificationRepository, ElasticsearchPaymentRepository,
    ElasticsearchUserRepository, ensure_indices,
};
use crate::outbound::fanout::FanoutPublisher;
use crate::outbound::pusher::{PusherConfig, PusherPublisher};
use crate::outbound::security::{Argon2PasswordHasher, JwtSessionTokens};

/// Request timeout for the Pusher HTTP API.
pub const PUSHER_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors raised while connecting adapters at startup.
#[derive(Debug, Error)]
pub enum StartupError {
    /// The HTTP client for the document store could not be built.
    #[error("failed to build document store client: {0}")]
    Client(#[from] reqwest::Error),
    /// The document store rejected index creation or is unreachable.
    #[error("document store not ready: {0}")]
    Store(#[from] DocumentStoreError),
    /// The Pusher publisher could not be built.
    #[error("failed to build Pusher publisher: {0}")]
    Publisher(#[from] EventPublisherError),
}

/// Build the document store client and create any missing index.
///
/// # Errors
///
/// Returns [`StartupError`] when the client cannot be built or the cluster
/// refuses the index requests.
pub async fn connect_store(config: &ElasticsearchConfig) -> Result<ElasticsearchClient, StartupError> {
    let client = ElasticsearchClient::new(config.clone())?;
    ensure_indices(&client).await?;
    info!(url = %config.url, "document store ready");
    Ok(client)
}

/// Compose the live-update publisher from the configured relays.
///
/// # Errors
///
/// Returns [`StartupError::Publisher`] when the Pusher cluster name does not
/// form a valid URL.
pub fn live_publisher(
    pusher: Option<&PusherConfig>,
    local: Option<&BroadcastPublisher>,
    clock: Arc<dyn Clock>,
) -> Result<Arc<dyn EventPublisher>, StartupError> {
    let mut fanout = FanoutPublisher::default();
    if let Some(local) = local {
        fanout = fanout.with(Arc::new(local.clone()));
    }
    if let Some(config) = pusher {
        let publisher = PusherPublisher::new(config.clone(), PUSHER_TIMEOUT, clock)?;
        info!(app_id = %config.app_id, cluster = %config.cluster, "Pusher relay enabled");
        fanout = fanout.with(Arc::new(publisher));
    }
    Ok(Arc::new(fanout))
}

/// Assemble every domain service over the document store.
pub fn build_services(
    config: &AppConfig,
    client: &ElasticsearchClient,
    publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
) -> HttpStateServices {
    let payments = Arc::new(ElasticsearchPaymentRepository::new(client.clone()));
    let notifications = notification_service(client, publisher.clone());
    HttpStateServices {
        auth: AuthService::new(
            Arc::new(ElasticsearchUserRepository::new(client.clone())),
            Arc::new(Argon2PasswordHasher::new()),
            Arc::new(JwtSessionTokens::new(&config.jwt.secret, clock.clone())),
            clock.clone(),
            config.jwt.ttl,
        ),
        customers: CustomerService::new(
            Arc::new(ElasticsearchCustomerRepository::new(client.clone())),
            notifications.clone(),
            clock.clone(),
        ),
        payments: PaymentService::new(
            payments.clone(),
            notifications.clone(),
            publisher,
            clock.clone(),
        ),
        dashboard: DashboardService::new(payments, clock.clone()),
        sweep: overdue_sweep(client, notifications.clone(), clock),
        notifications,
    }
}

/// Build a standalone overdue sweep over the document store.
pub fn overdue_sweep(
    client: &ElasticsearchClient,
    notifications: NotificationService,
    clock: Arc<dyn Clock>,
) -> OverdueSweep {
    OverdueSweep::new(
        Arc::new(ElasticsearchPaymentRepository::new(client.clone())),
        notifications,
        clock,
    )
}

/// Notification service writing to the document store.
pub fn notification_service(
    client: &ElasticsearchClient,
    publisher: Arc<dyn EventPublisher>,
) -> NotificationService {
    NotificationService::new(
        Arc::new(ElasticsearchNotificationRepository::new(client.clone())),
        publisher,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{LiveEvent, LiveEventKind};
    use mockable::DefaultClock;
    use serde_json::json;
    use zeroize::Zeroizing;

    #[tokio::test]
    async fn local_only_publisher_reaches_subscribers() {
        let local = BroadcastPublisher::default();
        let mut rx = local.subscribe();
        let publisher =
            live_publisher(None, Some(&local), Arc::new(DefaultClock)).expect("publisher");

        let event = LiveEvent::new(LiveEventKind::NewPayment, &json!({ "id": "pay-1" }))
            .expect("event");
        publisher.publish(&event).await.expect("publish");
        assert_eq!(rx.recv().await.expect("event").payload(), event.payload());
    }

    #[test]
    fn rejects_unusable_pusher_cluster() {
        let config = PusherConfig {
            app_id: "1".into(),
            key: "key".into(),
            secret: Zeroizing::new("secret".into()),
            cluster: "bad cluster/..".into(),
        };
        assert!(matches!(
            live_publisher(Some(&config), None, Arc::new(DefaultClock)),
            Err(StartupError::Publisher(_))
        ));
    }
}

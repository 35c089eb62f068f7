//! Reqwest-backed Pusher Channels publisher.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockable::Clock;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use zeroize::Zeroizing;

use super::signature::signed_query;
use crate::domain::ports::{EventPublisher, EventPublisherError, LiveEvent};

/// Credentials for one Pusher Channels app.
#[derive(Clone)]
pub struct PusherConfig {
    /// Numeric app id.
    pub app_id: String,
    /// Public app key.
    pub key: String,
    /// App secret used for signing.
    pub secret: Zeroizing<String>,
    /// Cluster name, e.g. `ap2`.
    pub cluster: String,
}

impl std::fmt::Debug for PusherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PusherConfig")
            .field("app_id", &self.app_id)
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .field("cluster", &self.cluster)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct TriggerBody<'a> {
    name: &'a str,
    channels: [&'a str; 1],
    data: String,
}

/// [`EventPublisher`] that triggers events through the Pusher HTTP API.
pub struct PusherPublisher {
    client: Client,
    endpoint: Url,
    key: String,
    secret: Zeroizing<String>,
    clock: Arc<dyn Clock>,
}

impl PusherPublisher {
    /// Build a publisher for the app's cluster endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed or
    /// the cluster does not form a valid host name.
    pub fn new(
        config: PusherConfig,
        timeout: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, EventPublisherError> {
        let base = Url::parse(&format!("https://api-{}.pusher.com", config.cluster))
            .map_err(|error| EventPublisherError::transport(format!("invalid cluster: {error}")))?;
        Self::with_base_url(config, base, timeout, clock)
    }

    /// Build a publisher against an explicit base URL.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed or
    /// `base` cannot carry a path.
    fn with_base_url(
        config: PusherConfig,
        base: Url,
        timeout: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, EventPublisherError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| EventPublisherError::transport(error.to_string()))?;
        let mut endpoint = base;
        endpoint
            .path_segments_mut()
            .map_err(|()| EventPublisherError::transport("base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(["apps", config.app_id.as_str(), "events"]);
        Ok(Self {
            client,
            endpoint,
            key: config.key,
            secret: config.secret,
            clock,
        })
    }

    fn signed_url(&self, body: &[u8]) -> Result<Url, EventPublisherError> {
        let mut url = self.endpoint.clone();
        let query = signed_query(
            &self.key,
            self.secret.as_bytes(),
            url.path(),
            self.clock.utc().timestamp(),
            body,
        )
        .map_err(|error| EventPublisherError::encode(format!("signing key rejected: {error}")))?;
        url.set_query(Some(&query));
        Ok(url)
    }
}

pub(super) fn trigger_body(event: &LiveEvent) -> Result<Vec<u8>, EventPublisherError> {
    let data = serde_json::to_string(event.payload())
        .map_err(|error| EventPublisherError::encode(error.to_string()))?;
    serde_json::to_vec(&TriggerBody {
        name: event.name(),
        channels: [event.channel()],
        data,
    })
    .map_err(|error| EventPublisherError::encode(error.to_string()))
}

fn map_status_error(status: StatusCode, body: &[u8]) -> EventPublisherError {
    let message = String::from_utf8_lossy(body).trim().to_owned();
    EventPublisherError::rejected(status.as_u16(), message)
}

#[async_trait]
impl EventPublisher for PusherPublisher {
    async fn publish(&self, event: &LiveEvent) -> Result<(), EventPublisherError> {
        let body = trigger_body(event)?;
        let url = self.signed_url(&body)?;
        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|error| EventPublisherError::transport(error.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response
            .bytes()
            .await
            .map_err(|error| EventPublisherError::transport(error.to_string()))?;
        Err(map_status_error(status, body.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::LiveEventKind;
    use crate::test_support::MutableClock;
    use chrono::{TimeZone, Utc};
    use serde_json::{Value, json};

    fn publisher() -> PusherPublisher {
        publisher_for_app("42")
    }

    fn publisher_for_app(app_id: &str) -> PusherPublisher {
        let clock = MutableClock::new(
            Utc.timestamp_opt(1_700_000_000, 0)
                .single()
                .expect("timestamp"),
        );
        PusherPublisher::new(
            PusherConfig {
                app_id: app_id.into(),
                key: "app-key".into(),
                secret: Zeroizing::new("app-secret".into()),
                cluster: "ap2".into(),
            },
            Duration::from_secs(1),
            Arc::new(clock),
        )
        .expect("publisher")
    }

    #[test]
    fn body_carries_payload_as_json_string() {
        let event = LiveEvent::new(LiveEventKind::NewPayment, &json!({"id": "pay-1"}))
            .expect("event");
        let body: Value = serde_json::from_slice(&trigger_body(&event).expect("body"))
            .expect("json");
        assert_eq!(
            body,
            json!({
                "name": "new-payment",
                "channels": ["dashboard-updates"],
                "data": "{\"id\":\"pay-1\"}"
            })
        );
    }

    #[test]
    fn url_targets_cluster_and_is_signed() {
        let url = publisher().signed_url(b"{}").expect("url");
        assert_eq!(url.host_str(), Some("api-ap2.pusher.com"));
        assert_eq!(url.path(), "/apps/42/events");
        let query = url.query().expect("query");
        assert!(query.starts_with("auth_key=app-key&auth_timestamp=1700000000&auth_version=1.0"));
        assert!(query.contains("&auth_signature="));
    }

    #[test]
    fn app_id_stays_within_its_path_segment() {
        let url = publisher_for_app("42/../admin?x").signed_url(b"{}").expect("url");
        assert_eq!(url.path(), "/apps/42%2F..%2Fadmin%3Fx/events");
        assert!(url.query().expect("query").starts_with("auth_key=app-key&"));
    }

    #[test]
    fn debug_output_hides_secret() {
        let config = PusherConfig {
            app_id: "42".into(),
            key: "app-key".into(),
            secret: Zeroizing::new("app-secret".into()),
            cluster: "ap2".into(),
        };
        assert!(!format!("{config:?}").contains("app-secret"));
    }

    #[test]
    fn non_success_statuses_are_rejections() {
        let error = map_status_error(StatusCode::FORBIDDEN, b"Invalid signature\n");
        assert_eq!(
            error,
            EventPublisherError::rejected(403_u16, "Invalid signature")
        );
    }
}

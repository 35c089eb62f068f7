//! Builders for HTTP and WebSocket state over the live adapters.

use std::sync::Arc;

use mockable::Clock;

use backend::config::AppConfig;
use backend::inbound::http::state::{CookieSettings, HttpState};
use backend::inbound::ws::state::WsState;
use backend::outbound::broadcast::BroadcastPublisher;
use backend::startup::{StartupError, build_services, connect_store, live_publisher};

/// Connect the document store and relays, then assemble handler state.
///
/// Both states share one in-process relay so WebSocket clients see every
/// event the services publish.
pub async fn build_states(
    config: &AppConfig,
    clock: Arc<dyn Clock>,
) -> Result<(HttpState, WsState), StartupError> {
    let client = connect_store(&config.elasticsearch).await?;
    let local = BroadcastPublisher::default();
    let publisher = live_publisher(config.pusher.as_ref(), Some(&local), clock.clone())?;
    let services = build_services(config, &client, publisher, clock);

    let http_state = HttpState::new(services)
        .with_cron_secret(config.cron_secret.clone())
        .with_cookie(CookieSettings {
            secure: config.jwt.cookie_secure,
        });
    let ws_state = WsState::new(local, config.ws_allowed_origins.clone());
    Ok((http_state, ws_state))
}

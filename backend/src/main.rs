//! Backend entry-point: loads configuration, connects adapters, and serves
//! the REST API, WebSocket entry, and OpenAPI docs.

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::WrapErr;
use mockable::{DefaultClock, DefaultEnv};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::config::{BuildMode, config_from_env};
use backend::inbound::http::health::HealthState;

mod server;

use server::{ServerConfig, build_states, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = config_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("invalid configuration")?;
    let (http_state, ws_state) = build_states(&config, Arc::new(DefaultClock))
        .await
        .wrap_err("failed to connect adapters")?;

    let sweep = if config.sweep.enabled {
        info!(interval_secs = config.sweep.interval.as_secs(), "overdue sweep scheduled");
        Some(actix_web::rt::spawn(
            http_state.sweep.clone().run_every(config.sweep.interval),
        ))
    } else {
        info!("overdue sweep disabled");
        None
    };

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(
        health_state.clone(),
        ServerConfig::new(config.bind_addr, http_state, ws_state),
    )
    .wrap_err_with(|| format!("failed to bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "listening");

    let outcome = server.await;
    health_state.mark_unhealthy();
    if let Some(sweep) = sweep {
        sweep.abort();
    }
    outcome.wrap_err("server terminated")
}

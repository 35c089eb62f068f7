//! Run the overdue-payment sweep once and print its outcome.
//!
//! Intended for an external scheduler when the in-process sweep is disabled.
//!
//! # Examples
//! ```sh
//! cargo run --manifest-path backend/Cargo.toml --bin sweep-overdue -- --pretty
//! ```
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::sync::Arc;

use backend::TraceId;
use backend::config::{BuildMode, config_from_env};
use backend::startup::{connect_store, live_publisher, notification_service, overdue_sweep};
use clap::Parser;
use color_eyre::eyre::WrapErr;
use mockable::{DefaultClock, DefaultEnv};
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// `sweep-overdue` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "sweep-overdue",
    about = "Publish a warning for every pending payment dated before today",
    version
)]
struct CliArgs {
    /// Pretty-print the JSON outcome.
    #[arg(long)]
    pretty: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(std::io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(async_main(args))
}

async fn async_main(args: CliArgs) -> color_eyre::Result<()> {
    let config = config_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("invalid configuration")?;
    let clock = Arc::new(DefaultClock);
    let client = connect_store(&config.elasticsearch).await?;
    let publisher = live_publisher(config.pusher.as_ref(), None, clock.clone())?;
    let sweep = overdue_sweep(&client, notification_service(&client, publisher), clock);

    let report = TraceId::fresh(sweep.run())
        .await
        .wrap_err("overdue sweep failed")?;
    let rendered = if args.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .wrap_err("serialise sweep report")?;
    println!("{rendered}");
    Ok(())
}

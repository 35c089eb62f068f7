//! Payment-collection dashboard backend.
//!
//! Hexagonal layout: [`domain`] holds entities, validation and services;
//! [`inbound`] adapts HTTP and WebSocket traffic onto them; [`outbound`]
//! implements the driven ports over Elasticsearch, Pusher and an in-process
//! relay. [`startup`] wires the adapters for the binaries.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod startup;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;

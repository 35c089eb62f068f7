//! Inbound adapters translating external requests into domain service calls.
//!
//! [`http`] serves the REST API under `/api` plus the health probes; [`ws`]
//! streams live updates to dashboards that cannot reach the hosted relay.

pub mod http;
pub mod ws;

//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **elasticsearch**: document repositories over the Elasticsearch REST API
//! - **pusher**: live updates through Pusher Channels
//! - **broadcast**: in-process relay feeding WebSocket sessions
//! - **fanout**: composite publisher over the relays above
//! - **security**: Argon2 password hashing and JWT session tokens
//!
//! Adapters translate between domain types and wire representations. They
//! contain no business logic.

pub mod broadcast;
pub mod elasticsearch;
pub mod fanout;
pub mod pusher;
pub mod security;

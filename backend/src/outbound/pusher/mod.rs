//! Pusher Channels live-update relay.

mod publisher;
pub mod signature;

pub use publisher::{PusherConfig, PusherPublisher};

//! HTTP server configuration object.

use std::net::SocketAddr;

use backend::inbound::http::state::HttpState;
use backend::inbound::ws::state::WsState;

/// Everything [`super::create_server`] needs to start listening.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) http_state: HttpState,
    pub(crate) ws_state: WsState,
}

impl ServerConfig {
    /// Bundle the listener address with pre-built adapter state.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, http_state: HttpState, ws_state: WsState) -> Self {
        Self {
            bind_addr,
            http_state,
            ws_state,
        }
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

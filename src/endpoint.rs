//! Network endpoints and the canonical transport label format.

use std::net::IpAddr;

use crate::ident::SessionId;

/// One side of a TCP flow: an address and port pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Endpoint {
    /// Network address of the endpoint.
    pub addr: IpAddr,
    /// TCP port of the endpoint.
    pub port: u16,
}

impl Endpoint {
    /// Create an endpoint from an address and port.
    #[must_use]
    pub const fn new(addr: IpAddr, port: u16) -> Self { Self { addr, port } }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.addr, self.port)
    }
}

/// Source and destination endpoints of a single packet, as captured.
///
/// Orientation is the packet's own: `src` is whoever sent it. Role
/// classification decides which side is the transport source; see
/// [`Role`](crate::classify::Role).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PacketEndpoints {
    /// Sender of the packet.
    pub src: Endpoint,
    /// Receiver of the packet.
    pub dst: Endpoint,
}

impl PacketEndpoints {
    /// Pair up the packet's source and destination endpoints.
    #[must_use]
    pub const fn new(src: Endpoint, dst: Endpoint) -> Self { Self { src, dst } }

    /// Return the same pair with source and destination exchanged.
    #[must_use]
    pub const fn swapped(self) -> Self {
        Self {
            src: self.dst,
            dst: self.src,
        }
    }
}

/// Format the canonical human-readable identity of a transport source.
///
/// Produces `TCP:<addr>:<port>` when no session id is known, and
/// `TCP:<addr>:<port>:<session id as 8 lowercase hex digits>` otherwise.
#[must_use]
pub fn source_label(source: Endpoint, session_id: SessionId) -> String {
    if session_id.is_known() {
        format!("TCP:{}:{}:{session_id}", source.addr, source.port)
    } else {
        format!("TCP:{}:{}", source.addr, source.port)
    }
}

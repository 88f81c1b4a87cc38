//! Per-packet resolution state machine.
//!
//! Ties classification, the registries, and the channel allocator together
//! to produce the `(channel, client)` identity downstream stages rely on.
//! Resolution is two-phase: on the first pass over a capture a packet
//! whose transport cannot be found gets a provisional channel and nothing
//! is created, because the real session id may only become knowable from
//! frames dissected later. The revisit pass has full-file visibility and
//! performs the authoritative binding.

use bytes::Bytes;

use crate::{
    channel::{ChannelAllocator, ChannelKind},
    classify::{Classification, Role, RoleClassifier},
    decoder::PayloadDecoder,
    endpoint::{Endpoint, PacketEndpoints},
    ident::{ChannelId, ClientId, FrameNumber, SessionId, TransportId},
    session::AnalysisSession,
};

/// Which sweep over the capture this packet belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassKind {
    /// Initial forward pass; the packet has not been dissected before.
    First,
    /// A later pass; the packet was already dissected at least once.
    Revisit,
}

/// The per-packet facts the state machine needs.
#[derive(Clone, Copy, Debug)]
pub struct PacketInfo {
    /// Source and destination of the packet as captured.
    pub endpoints: PacketEndpoints,
    /// Position of the packet within the capture.
    pub frame: FrameNumber,
    /// Whether this is a first-pass or revisit dissection.
    pub pass: PassKind,
}

/// Outcome of resolving one packet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// The packet is not this protocol; it carries the generic unknown
    /// stream channel.
    NotTransport {
        /// Sentinel channel for the opaque stream.
        channel: ChannelId,
    },
    /// First-pass packet whose transport could not be found. Nothing was
    /// created; the identity will be established on the revisit.
    Provisional {
        /// Role-specific provisional channel.
        channel: ChannelId,
        /// Role the packet played.
        role: Role,
    },
    /// The packet belongs to a known transport and client.
    Resolved {
        /// Owning transport.
        transport: TransportId,
        /// Client the packet maps to.
        client: ClientId,
        /// The transport's channel.
        channel: ChannelId,
    },
}

impl Resolution {
    /// Channel assigned to the packet, provisional or not.
    #[must_use]
    pub const fn channel(&self) -> ChannelId {
        match self {
            Self::NotTransport { channel }
            | Self::Provisional { channel, .. }
            | Self::Resolved { channel, .. } => *channel,
        }
    }

    /// Client id when the packet was fully resolved.
    #[must_use]
    pub const fn client(&self) -> Option<ClientId> {
        match self {
            Self::Resolved { client, .. } => Some(*client),
            Self::NotTransport { .. } | Self::Provisional { .. } => None,
        }
    }

    /// True when a transport and client were bound.
    #[must_use]
    pub const fn is_resolved(&self) -> bool { matches!(self, Self::Resolved { .. }) }
}

/// Resolve one packet against the session state.
///
/// Implements the two-phase policy: transport lookups first try the
/// unknown session id, then retry with a retroactively resolved one; on a
/// miss, the first pass only assigns a provisional channel while a revisit
/// creates the transport and client authoritatively.
pub fn resolve<A: ChannelAllocator>(
    session: &mut AnalysisSession<A>,
    classifier: &RoleClassifier,
    packet: &PacketInfo,
) -> Resolution {
    let Classification { role, .. } = classifier.classify(&packet.endpoints);
    tracing::trace!(frame = %packet.frame, ?role, ?packet.pass, "resolving packet");

    // Orient the 4-tuple by role and pick the sentinel to fall back on
    // should the transport stay unresolved on the first pass.
    let (source, receiver, miss_kind) = match role {
        Role::FromSource => (
            packet.endpoints.src,
            packet.endpoints.dst,
            ChannelKind::UnknownTransportSource,
        ),
        Role::FromClient => (
            packet.endpoints.dst,
            packet.endpoints.src,
            ChannelKind::UnknownTransportClient,
        ),
        Role::NotTransport => {
            let channel = session.allocator_mut().assign(ChannelKind::UnknownStream);
            return Resolution::NotTransport { channel };
        }
    };

    if let Some(transport) = locate_transport(session, source, packet.frame) {
        let client = session
            .client_find(transport, receiver, packet.frame)
            .unwrap_or_else(|| session.client_add(transport, receiver, packet.frame));
        return Resolution::Resolved {
            transport,
            client,
            channel: session.channel_of(transport),
        };
    }

    match packet.pass {
        PassKind::Revisit => {
            // Authoritative, final binding: no later information can still
            // change this identity.
            let transport = session.transport_add(source, SessionId::UNKNOWN, packet.frame);
            let client = session.client_add(transport, receiver, packet.frame);
            Resolution::Resolved {
                transport,
                client,
                channel: session.channel_of(transport),
            }
        }
        PassKind::First => {
            let channel = session.allocator_mut().assign(miss_kind);
            Resolution::Provisional { channel, role }
        }
    }
}

/// Look up the transport for `source` active at `frame`.
///
/// Tries the unknown session id first; on a miss, retries with whatever
/// session id the frame index retroactively resolves for this frame.
fn locate_transport<A: ChannelAllocator>(
    session: &AnalysisSession<A>,
    source: Endpoint,
    frame: FrameNumber,
) -> Option<TransportId> {
    session
        .transport_find(source, SessionId::UNKNOWN, frame)
        .or_else(|| {
            session
                .sid_find(source, frame)
                .and_then(|sid| session.transport_find(source, sid, frame))
        })
}

/// Resolve one packet and hand its payload to the decoder.
///
/// Returns the number of payload bytes the decoder consumed.
pub fn dissect<A: ChannelAllocator, D: PayloadDecoder>(
    session: &mut AnalysisSession<A>,
    classifier: &RoleClassifier,
    decoder: &mut D,
    packet: &PacketInfo,
    payload: &Bytes,
) -> usize {
    let resolution = resolve(session, classifier, packet);
    let tag = classifier.locate_tag(&packet.endpoints);
    decoder.decode(resolution.channel(), resolution.client(), tag, payload)
}

//! The analysis-session context object.
//!
//! [`AnalysisSession`] owns every piece of correlation state for one
//! capture: the transport arena, both registries, and the channel
//! allocator. It replaces process-wide registries with an explicit value
//! whose lifetime bounds the arena; dropping the session releases all
//! transports and clients at once. One session serves one dissection
//! thread, so no interior locking is needed.

use crate::{
    channel::{ChannelAllocator, SequentialAllocator},
    endpoint::Endpoint,
    ident::{ChannelId, ClientId, FrameNumber, SessionId, TransportId},
    registry::{ClientRegistry, TransportRegistry},
    transport::{Client, Transport, TransportArena},
};

/// Correlation state for one capture analysis session.
#[derive(Debug, Default)]
pub struct AnalysisSession<A: ChannelAllocator = SequentialAllocator> {
    arena: TransportArena,
    transports: TransportRegistry,
    clients: ClientRegistry,
    allocator: A,
}

impl AnalysisSession<SequentialAllocator> {
    /// Create a session using the in-crate sequential allocator.
    #[must_use]
    pub fn new() -> Self { Self::default() }
}

impl<A: ChannelAllocator> AnalysisSession<A> {
    /// Create a session over an externally supplied channel allocator.
    #[must_use]
    pub fn with_allocator(allocator: A) -> Self {
        Self {
            arena: TransportArena::default(),
            transports: TransportRegistry::default(),
            clients: ClientRegistry::default(),
            allocator,
        }
    }

    /// Locate the transport for `source` under `session_id`.
    #[must_use]
    pub fn transport_find(
        &self,
        source: Endpoint,
        session_id: SessionId,
        frame: FrameNumber,
    ) -> Option<TransportId> {
        self.transports.find(source, session_id, frame)
    }

    /// Find or create the transport for `source` under `session_id`.
    pub fn transport_add(
        &mut self,
        source: Endpoint,
        session_id: SessionId,
        frame: FrameNumber,
    ) -> TransportId {
        self.transports
            .add(&mut self.arena, &mut self.allocator, source, session_id, frame)
    }

    /// Retroactively resolve the session id active at `frame`.
    #[must_use]
    pub fn sid_find(&self, source: Endpoint, frame: FrameNumber) -> Option<SessionId> {
        self.transports.sid_find(&self.arena, source, frame)
    }

    /// Bind `session_id` as the identity active from `frame` onward.
    pub fn sid_add(
        &mut self,
        source: Endpoint,
        frame: FrameNumber,
        session_id: SessionId,
    ) -> TransportId {
        self.transports
            .sid_add(&mut self.arena, &mut self.allocator, source, frame, session_id)
    }

    /// Locate the client of `transport` at `receiver`.
    #[must_use]
    pub fn client_find(
        &self,
        transport: TransportId,
        receiver: Endpoint,
        frame: FrameNumber,
    ) -> Option<ClientId> {
        self.clients.find(&self.arena, transport, receiver, frame)
    }

    /// Find or create the client of `transport` at `receiver`.
    pub fn client_add(
        &mut self,
        transport: TransportId,
        receiver: Endpoint,
        frame: FrameNumber,
    ) -> ClientId {
        self.clients.add(&mut self.arena, transport, receiver, frame)
    }

    /// Resolve a transport handle minted by this session.
    #[must_use]
    pub fn transport(&self, id: TransportId) -> &Transport { self.arena.get(id) }

    /// Resolve a client by its owning transport and id.
    #[must_use]
    pub fn client(&self, transport: TransportId, id: ClientId) -> Option<&Client> {
        self.arena.get(transport).client(id)
    }

    /// Channel handle of a resolved transport.
    #[must_use]
    pub fn channel_of(&self, id: TransportId) -> ChannelId { self.arena.get(id).channel() }

    /// Iterate over all transports created so far, in creation order.
    pub fn transports(&self) -> impl Iterator<Item = &Transport> { self.arena.iter() }

    /// Shared access to the channel allocator.
    #[must_use]
    pub fn allocator(&self) -> &A { &self.allocator }

    /// Exclusive access to the channel allocator.
    pub fn allocator_mut(&mut self) -> &mut A { &mut self.allocator }
}

//! Transport and client records, and the session-scoped arena owning them.
//!
//! A [`Transport`] is one logical publisher endpoint; a [`Client`] is one
//! distinct peer talking to it. Records are created lazily by the
//! registries, never mutated afterwards apart from the client-id counter
//! bump and client-list append, and are only released when the whole
//! [`TransportArena`] is dropped. Callers outside the arena hold
//! [`TransportId`]/[`ClientId`] handles rather than references.

use crate::{
    endpoint::{Endpoint, source_label},
    ident::{ChannelId, ClientId, SessionId, TransportId},
};

/// One distinct peer communicating with a transport.
#[derive(Clone, Copy, Debug)]
pub struct Client {
    receiver: Endpoint,
    id: ClientId,
    transport: TransportId,
}

impl Client {
    /// Peer address and port.
    #[must_use]
    pub const fn receiver(&self) -> Endpoint { self.receiver }

    /// Id assigned from the owning transport's counter; never reused.
    #[must_use]
    pub const fn id(&self) -> ClientId { self.id }

    /// Handle of the owning transport.
    #[must_use]
    pub const fn transport(&self) -> TransportId { self.transport }
}

/// One logical protocol publisher endpoint.
#[derive(Debug)]
pub struct Transport {
    source: Endpoint,
    session_id: SessionId,
    channel: ChannelId,
    id: TransportId,
    next_client_id: ClientId,
    clients: Vec<Client>,
}

impl Transport {
    /// Network identity of the publisher endpoint.
    #[must_use]
    pub const fn source(&self) -> Endpoint { self.source }

    /// Session id this transport was bound under; zero when unknown.
    #[must_use]
    pub const fn session_id(&self) -> SessionId { self.session_id }

    /// Channel handle assigned by the external allocator at creation.
    #[must_use]
    pub const fn channel(&self) -> ChannelId { self.channel }

    /// Arena handle of this transport.
    #[must_use]
    pub const fn id(&self) -> TransportId { self.id }

    /// Clients observed on this transport, in creation order.
    #[must_use]
    pub fn clients(&self) -> &[Client] { &self.clients }

    /// Look up one of this transport's clients by id.
    #[must_use]
    pub fn client(&self, id: ClientId) -> Option<&Client> {
        // Ids are assigned densely from 1 in list order.
        let index = usize::try_from(id.get()).ok()?.checked_sub(1)?;
        self.clients.get(index)
    }

    /// Canonical `TCP:<addr>:<port>[:<sid>]` identity string.
    #[must_use]
    pub fn label(&self) -> String { source_label(self.source, self.session_id) }

    /// Record a new client for `receiver`, assigning the next client id.
    pub(crate) fn admit_client(&mut self, receiver: Endpoint) -> ClientId {
        let id = self.next_client_id;
        self.next_client_id = id.saturating_next();
        self.clients.push(Client {
            receiver,
            id,
            transport: self.id,
        });
        log::debug!("transport {} admitted client {id} at {receiver}", self.label());
        id
    }
}

/// Owner of every [`Transport`] (and therefore every [`Client`]) created
/// during one analysis session.
///
/// Handles minted by [`insert`](Self::insert) index into the arena and stay
/// valid until the arena is dropped; nothing is freed individually.
#[derive(Debug, Default)]
pub struct TransportArena {
    transports: Vec<Transport>,
}

impl TransportArena {
    pub(crate) fn insert(
        &mut self,
        source: Endpoint,
        session_id: SessionId,
        channel: ChannelId,
    ) -> TransportId {
        let id = TransportId::from_index(self.transports.len());
        self.transports.push(Transport {
            source,
            session_id,
            channel,
            id,
            next_client_id: ClientId::FIRST,
            clients: Vec::new(),
        });
        id
    }

    /// Resolve a handle minted by this arena.
    #[must_use]
    pub fn get(&self, id: TransportId) -> &Transport { &self.transports[id.index()] }

    pub(crate) fn get_mut(&mut self, id: TransportId) -> &mut Transport {
        &mut self.transports[id.index()]
    }

    /// Number of transports created so far.
    #[must_use]
    pub fn len(&self) -> usize { self.transports.len() }

    /// True when no transport has been created yet.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.transports.is_empty() }

    /// Iterate over all transports in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Transport> { self.transports.iter() }
}

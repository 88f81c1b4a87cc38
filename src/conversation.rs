//! Conversation keys and the per-session conversation store.
//!
//! A conversation is tracked under one of two key flavours: a
//! [`ListenerKey`] wildcards the peer so a transport can be located no
//! matter which client sent the packet, while a [`FullKey`] pins the full
//! 4-tuple to locate one specific client. Keeping the flavours as distinct
//! types avoids sentinel "any" fields in a single key.
//!
//! [`ConversationStore`] is a minimal generic map standing in for the host
//! dissector's conversation tracker; registries attach their own side-data
//! type `D` per conversation.

use std::{collections::HashMap, hash::Hash, net::IpAddr};

use crate::endpoint::Endpoint;

/// Listener-style conversation key: transport source with wildcarded peer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerKey {
    /// Transport source address.
    pub addr: IpAddr,
    /// Transport source port.
    pub port: u16,
}

impl ListenerKey {
    /// Key the listener conversation for a transport source endpoint.
    #[must_use]
    pub const fn new(source: Endpoint) -> Self {
        Self {
            addr: source.addr,
            port: source.port,
        }
    }
}

/// Peer-specific conversation key: the full TCP 4-tuple.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FullKey {
    /// Transport source address.
    pub addr: IpAddr,
    /// Transport source port.
    pub port: u16,
    /// Peer (client) address.
    pub peer_addr: IpAddr,
    /// Peer (client) port.
    pub peer_port: u16,
}

impl FullKey {
    /// Key the conversation between a transport source and one peer.
    #[must_use]
    pub const fn new(source: Endpoint, peer: Endpoint) -> Self {
        Self {
            addr: source.addr,
            port: source.port,
            peer_addr: peer.addr,
            peer_port: peer.port,
        }
    }
}

/// Map from conversation key to attached side-data.
///
/// Conversations are created lazily via [`ensure`](Self::ensure) and live
/// until the owning analysis session is dropped; nothing is removed
/// individually.
#[derive(Debug)]
pub struct ConversationStore<K, D> {
    entries: HashMap<K, D>,
}

impl<K, D> Default for ConversationStore<K, D> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, D> ConversationStore<K, D> {
    /// Look up the side-data attached to `key`, if the conversation exists.
    #[must_use]
    pub fn lookup(&self, key: &K) -> Option<&D> { self.entries.get(key) }

    /// Number of tracked conversations.
    #[must_use]
    pub fn len(&self) -> usize { self.entries.len() }

    /// True when no conversation has been created yet.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

impl<K: Eq + Hash, D: Default> ConversationStore<K, D> {
    /// Return the side-data for `key`, creating the conversation on first
    /// use.
    pub fn ensure(&mut self, key: K) -> &mut D { self.entries.entry(key).or_default() }
}

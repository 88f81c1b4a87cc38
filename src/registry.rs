//! Transport and client registries.
//!
//! [`TransportRegistry`] tracks, per listener conversation, which
//! transports exist under which session id and at which frame each
//! identity first became known. [`ClientRegistry`] tracks, per full-key
//! conversation, the clients observed for each session. Both are owned by
//! an [`AnalysisSession`](crate::session::AnalysisSession) and operate on
//! its arena; lookups never fail fatally, they return `None`.

use crate::{
    channel::{ChannelAllocator, ChannelKind},
    conversation::{ConversationStore, FullKey, ListenerKey},
    endpoint::{Endpoint, source_label},
    ident::{ClientId, FrameNumber, SessionId, TransportId},
    index::{FrameOrderedIndex, SessionIndex},
    transport::TransportArena,
};

/// Per-listener-conversation state: the session-id and frame-number views
/// of the same set of transports.
#[derive(Debug, Default)]
struct ListenerState {
    by_session: SessionIndex<TransportId>,
    by_frame: FrameOrderedIndex<TransportId>,
}

/// Registry of transports keyed by listener conversation.
#[derive(Debug, Default)]
pub struct TransportRegistry {
    conversations: ConversationStore<ListenerKey, ListenerState>,
}

impl TransportRegistry {
    /// Locate the transport bound under `session_id` for the listener
    /// conversation of `source`, if both exist.
    ///
    /// No side effects; `frame` identifies the packet being dissected and
    /// is reported in trace output only, since a listener conversation
    /// spans the whole capture.
    #[must_use]
    pub fn find(
        &self,
        source: Endpoint,
        session_id: SessionId,
        frame: FrameNumber,
    ) -> Option<TransportId> {
        tracing::trace!(%source, %session_id, %frame, "transport lookup");
        self.conversations
            .lookup(&ListenerKey::new(source))
            .and_then(|state| state.by_session.get(session_id))
            .copied()
    }

    /// Return the transport bound under `session_id` for `source`,
    /// creating it on first use.
    ///
    /// Idempotent: when the session id is already bound the existing
    /// transport is returned unchanged and no frame binding is added.
    /// Otherwise a new transport is created with a fresh channel from
    /// `allocator` and indexed both by `session_id` and by `frame`, the
    /// frame at which this identity first became known.
    pub fn add<A: ChannelAllocator>(
        &mut self,
        arena: &mut TransportArena,
        allocator: &mut A,
        source: Endpoint,
        session_id: SessionId,
        frame: FrameNumber,
    ) -> TransportId {
        if let Some(existing) = self.find(source, session_id, frame) {
            return existing;
        }
        self.create(arena, allocator, source, session_id, frame)
    }

    /// Construct a transport and bind it in both indices at `frame`.
    ///
    /// Repoints the session index at the new transport when the id was
    /// bound before; earlier frame bindings stay in place.
    fn create<A: ChannelAllocator>(
        &mut self,
        arena: &mut TransportArena,
        allocator: &mut A,
        source: Endpoint,
        session_id: SessionId,
        frame: FrameNumber,
    ) -> TransportId {
        let channel = allocator.assign(ChannelKind::Transport);
        let id = arena.insert(source, session_id, channel);
        let state = self.conversations.ensure(ListenerKey::new(source));
        state.by_session.insert(session_id, id);
        state.by_frame.insert(frame, id);
        log::debug!(
            "created transport {} ({channel}) at frame {frame}",
            source_label(source, session_id),
        );
        id
    }

    /// Retroactively resolve the session id active at `frame` for the
    /// listener conversation of `source`.
    ///
    /// Queries the frame index for the binding with the largest frame
    /// number at or before `frame`. Returns `None` when the conversation
    /// does not exist or nothing was bound that early.
    #[must_use]
    pub fn sid_find(
        &self,
        arena: &TransportArena,
        source: Endpoint,
        frame: FrameNumber,
    ) -> Option<SessionId> {
        let state = self.conversations.lookup(&ListenerKey::new(source))?;
        let (_, id) = state.by_frame.floor(frame)?;
        Some(arena.get(*id).session_id())
    }

    /// Bind `session_id` as the identity active from `frame` onward.
    ///
    /// When the transport already active at `frame` carries the same
    /// session id this is a no-op returning it. Otherwise a brand-new
    /// transport is created and bound at `frame`, even when the id was
    /// bound before at some other frame: a returning session id gets a
    /// fresh transport, and the session index is repointed at it. Stale
    /// bindings are left in place for earlier frames; no retroactive
    /// rewrite occurs, so transports may coexist under one listener
    /// conversation with overlapping frame ranges.
    pub fn sid_add<A: ChannelAllocator>(
        &mut self,
        arena: &mut TransportArena,
        allocator: &mut A,
        source: Endpoint,
        frame: FrameNumber,
        session_id: SessionId,
    ) -> TransportId {
        let active = self
            .conversations
            .lookup(&ListenerKey::new(source))
            .and_then(|state| state.by_frame.floor(frame))
            .map(|(bound_at, id)| (bound_at, *id));
        if let Some((bound_at, id)) = active {
            let bound_sid = arena.get(id).session_id();
            if bound_sid == session_id {
                return id;
            }
            log::debug!(
                "stale session id {bound_sid} bound at frame {bound_at} for {source}; \
                 binding {session_id} from frame {frame}",
            );
        }
        self.create(arena, allocator, source, session_id, frame)
    }
}

/// Registry of clients keyed by full-peer conversation.
///
/// The nested index is keyed by the owning transport's session id rather
/// than by transport identity: one address/port pair can host several
/// sessions over a conversation's lifetime, and the session id is what
/// disambiguates their clients.
#[derive(Debug, Default)]
pub struct ClientRegistry {
    conversations: ConversationStore<FullKey, SessionIndex<ClientId>>,
}

impl ClientRegistry {
    /// Locate the client of `transport` at `receiver`, if one was already
    /// observed.
    #[must_use]
    pub fn find(
        &self,
        arena: &TransportArena,
        transport: TransportId,
        receiver: Endpoint,
        frame: FrameNumber,
    ) -> Option<ClientId> {
        let owner = arena.get(transport);
        tracing::trace!(source = %owner.source(), %receiver, %frame, "client lookup");
        self.conversations
            .lookup(&FullKey::new(owner.source(), receiver))
            .and_then(|clients| clients.get(owner.session_id()))
            .copied()
    }

    /// Return the client of `transport` at `receiver`, creating it on
    /// first observation.
    ///
    /// Idempotent via [`find`](Self::find). A new client takes the
    /// transport's next id and is appended to its client list.
    pub fn add(
        &mut self,
        arena: &mut TransportArena,
        transport: TransportId,
        receiver: Endpoint,
        frame: FrameNumber,
    ) -> ClientId {
        if let Some(existing) = self.find(arena, transport, receiver, frame) {
            return existing;
        }
        let owner = arena.get_mut(transport);
        let key = FullKey::new(owner.source(), receiver);
        let session_id = owner.session_id();
        let id = owner.admit_client(receiver);
        self.conversations.ensure(key).insert(session_id, id);
        id
    }
}

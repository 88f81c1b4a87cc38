//! Newtype identifiers used throughout the correlation engine.
//!
//! Each identifier wraps a primitive integer so that session ids, frame
//! numbers, channel handles, and client ids cannot be confused for one
//! another at call sites. Construction is cheap and `Copy`; the wrappers
//! carry no behaviour beyond accessors and ordering where ordering is
//! meaningful.

/// Protocol-level session identifier.
///
/// A value of zero means "no session id known or applicable"; the engine
/// uses [`SessionId::UNKNOWN`] as the speculative key until control traffic
/// reveals the real identifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SessionId(u32);

impl SessionId {
    /// The sentinel "no session id" value.
    pub const UNKNOWN: SessionId = SessionId(0);

    /// Create a session id from its wire representation.
    #[must_use]
    pub const fn new(value: u32) -> Self { Self(value) }

    /// Return the underlying 32-bit value.
    #[must_use]
    pub const fn get(self) -> u32 { self.0 }

    /// True when this id carries a real session identifier.
    #[must_use]
    pub const fn is_known(self) -> bool { self.0 != 0 }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

/// Sequence number of a packet within a capture.
///
/// Frame numbers are the ordering key for retroactive session-id
/// resolution: within a pass they strictly increase, and indices built in
/// an earlier pass remain queryable in later passes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameNumber(u32);

impl FrameNumber {
    /// Create a frame number.
    #[must_use]
    pub const fn new(value: u32) -> Self { Self(value) }

    /// Return the underlying numeric value.
    #[must_use]
    pub const fn get(self) -> u32 { self.0 }
}

impl std::fmt::Display for FrameNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque channel handle produced by a [`ChannelAllocator`].
///
/// Downstream stages group packets by channel; the engine never inspects
/// the value beyond equality and the allocator's
/// [`is_known`](crate::channel::ChannelAllocator::is_known) predicate.
///
/// [`ChannelAllocator`]: crate::channel::ChannelAllocator
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChannelId(u64);

impl ChannelId {
    /// Create a channel id with the provided value.
    #[must_use]
    pub const fn new(value: u64) -> Self { Self(value) }

    /// Return the inner `u64` representation.
    #[must_use]
    pub const fn get(self) -> u64 { self.0 }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ChannelId({})", self.0)
    }
}

/// Identifier of a client within its owning transport.
///
/// Assigned from the transport's monotonically increasing counter,
/// starting at 1; an id is never reused for the lifetime of the analysis
/// session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClientId(u32);

impl ClientId {
    /// The id assigned to the first client of a transport.
    pub const FIRST: ClientId = ClientId(1);

    /// Create a client id with the provided value.
    #[must_use]
    pub const fn new(value: u32) -> Self { Self(value) }

    /// Return the underlying numeric value.
    #[must_use]
    pub const fn get(self) -> u32 { self.0 }

    /// Return the next id in sequence, saturating at the type's maximum.
    #[must_use]
    pub const fn saturating_next(self) -> Self { Self(self.0.saturating_add(1)) }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Non-owning handle to a [`Transport`](crate::transport::Transport) in the
/// session arena.
///
/// Handles are minted only by the arena and remain valid for the lifetime
/// of the [`AnalysisSession`](crate::session::AnalysisSession) that issued
/// them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TransportId(usize);

impl TransportId {
    pub(crate) const fn from_index(index: usize) -> Self { Self(index) }

    pub(crate) const fn index(self) -> usize { self.0 }
}

impl std::fmt::Display for TransportId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TransportId({})", self.0)
    }
}

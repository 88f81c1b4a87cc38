//! Channel allocation seam.
//!
//! Downstream payload decoding and display logic group packets by an
//! opaque [`ChannelId`]. The engine obtains these from a
//! [`ChannelAllocator`], an external collaborator in the host dissector;
//! [`SequentialAllocator`] is a self-contained implementation for tests
//! and stand-alone embedders.

use crate::ident::ChannelId;

/// Sentinel channel for a stream whose transport source could not yet be
/// resolved on the first pass.
pub const UNKNOWN_TRANSPORT_SOURCE: ChannelId = ChannelId::new(0xFFFF_FFFF_FFFF_FFFD);

/// Sentinel channel for a stream whose transport client could not yet be
/// resolved on the first pass.
pub const UNKNOWN_TRANSPORT_CLIENT: ChannelId = ChannelId::new(0xFFFF_FFFF_FFFF_FFFE);

/// Sentinel channel for traffic not recognised as this protocol at all.
pub const UNKNOWN_STREAM: ChannelId = ChannelId::new(0xFFFF_FFFF_FFFF_FFFF);

/// What a channel is being allocated for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelKind {
    /// A resolved transport; the allocator must hand out a fresh known id.
    Transport,
    /// First-pass placeholder for an unresolved transport-source stream.
    UnknownTransportSource,
    /// First-pass placeholder for an unresolved transport-client stream.
    UnknownTransportClient,
    /// Traffic outside the protocol's port ranges.
    UnknownStream,
}

/// External channel allocator consumed by the engine.
pub trait ChannelAllocator {
    /// Produce a channel id for `kind`.
    ///
    /// For [`ChannelKind::Transport`] the id must be fresh and known; the
    /// unknown kinds may map to shared sentinel values.
    fn assign(&mut self, kind: ChannelKind) -> ChannelId;

    /// True when `channel` identifies a resolved transport rather than one
    /// of the provisional sentinels.
    fn is_known(&self, channel: ChannelId) -> bool;
}

/// Allocator handing out known channel ids from a simple counter.
///
/// Known ids start at 1; the unknown kinds map to the fixed sentinel
/// constants in this module.
#[derive(Debug, Default)]
pub struct SequentialAllocator {
    next: u64,
}

impl SequentialAllocator {
    /// Create an allocator with no channels assigned yet.
    #[must_use]
    pub fn new() -> Self { Self::default() }
}

impl ChannelAllocator for SequentialAllocator {
    fn assign(&mut self, kind: ChannelKind) -> ChannelId {
        match kind {
            ChannelKind::Transport => {
                self.next += 1;
                ChannelId::new(self.next)
            }
            ChannelKind::UnknownTransportSource => UNKNOWN_TRANSPORT_SOURCE,
            ChannelKind::UnknownTransportClient => UNKNOWN_TRANSPORT_CLIENT,
            ChannelKind::UnknownStream => UNKNOWN_STREAM,
        }
    }

    fn is_known(&self, channel: ChannelId) -> bool {
        !matches!(
            channel,
            UNKNOWN_TRANSPORT_SOURCE | UNKNOWN_TRANSPORT_CLIENT | UNKNOWN_STREAM
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_channels_are_fresh_and_known() {
        let mut allocator = SequentialAllocator::new();
        let first = allocator.assign(ChannelKind::Transport);
        let second = allocator.assign(ChannelKind::Transport);
        assert_ne!(first, second);
        assert!(allocator.is_known(first));
        assert!(allocator.is_known(second));
    }

    #[test]
    fn unknown_kinds_map_to_sentinels() {
        let mut allocator = SequentialAllocator::new();
        let source = allocator.assign(ChannelKind::UnknownTransportSource);
        let client = allocator.assign(ChannelKind::UnknownTransportClient);
        let stream = allocator.assign(ChannelKind::UnknownStream);
        assert_eq!(source, UNKNOWN_TRANSPORT_SOURCE);
        assert_eq!(client, UNKNOWN_TRANSPORT_CLIENT);
        assert_eq!(stream, UNKNOWN_STREAM);
        assert!(!allocator.is_known(source));
        assert!(!allocator.is_known(client));
        assert!(!allocator.is_known(stream));
    }
}

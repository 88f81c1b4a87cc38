//! Payload decoding seam.
//!
//! Once a packet's channel and client are resolved, the encapsulated
//! application payload is handed to an external decoder. Parsing that
//! payload is outside this crate; only the hand-off contract lives here.

use bytes::Bytes;

use crate::{
    classify::Tag,
    ident::{ChannelId, ClientId},
};

/// External decoder for the encapsulated application payload.
pub trait PayloadDecoder {
    /// Decode `payload` in the context of the resolved identities.
    ///
    /// `client` is `None` for provisional or non-transport channels; `tag`
    /// is the tag that drove classification, when tag mode matched one.
    /// Returns the number of bytes consumed.
    fn decode(
        &mut self,
        channel: ChannelId,
        client: Option<ClientId>,
        tag: Option<&Tag>,
        payload: &Bytes,
    ) -> usize;
}

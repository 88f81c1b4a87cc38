//! Shared utilities for integration tests.
//!
//! Provides endpoint and packet constructors plus a recording payload
//! decoder so test modules do not repeat the same plumbing.

// Items in this shared module may not be used by all test binaries that import it.
#![allow(
    dead_code,
    reason = "shared test utilities are not used by all test binaries"
)]

use std::net::{IpAddr, Ipv4Addr};

use bytes::Bytes;
use lbtcp::{
    ChannelId,
    ClientId,
    Endpoint,
    FrameNumber,
    PacketEndpoints,
    PacketInfo,
    PassKind,
    PayloadDecoder,
    Tag,
};

/// Endpoint in the 10.0.0.0/24 test network.
pub fn ep(host: u8, port: u16) -> Endpoint {
    Endpoint::new(IpAddr::V4(Ipv4Addr::new(10, 0, 0, host)), port)
}

/// Frame number shorthand.
pub fn frame(n: u32) -> FrameNumber { FrameNumber::new(n) }

/// Packet from `src` to `dst` at `frame_no` in the given pass.
pub fn packet(src: Endpoint, dst: Endpoint, frame_no: u32, pass: PassKind) -> PacketInfo {
    PacketInfo {
        endpoints: PacketEndpoints::new(src, dst),
        frame: frame(frame_no),
        pass,
    }
}

/// One recorded hand-off to the payload decoder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodeCall {
    pub channel: ChannelId,
    pub client: Option<ClientId>,
    pub tag: Option<String>,
    pub payload_len: usize,
}

/// Payload decoder that records every call and consumes the whole payload.
#[derive(Debug, Default)]
pub struct RecordingDecoder {
    pub calls: Vec<DecodeCall>,
}

impl PayloadDecoder for RecordingDecoder {
    fn decode(
        &mut self,
        channel: ChannelId,
        client: Option<ClientId>,
        tag: Option<&Tag>,
        payload: &Bytes,
    ) -> usize {
        self.calls.push(DecodeCall {
            channel,
            client,
            tag: tag.map(|tag| tag.name.clone()),
            payload_len: payload.len(),
        });
        payload.len()
    }
}

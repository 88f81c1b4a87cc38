//! Transport and session correlation engine for LBT-TCP capture
//! dissection.
//!
//! Given TCP packets of a session-oriented protocol layered over plain
//! TCP, this crate recovers which logical transport (publisher endpoint)
//! and client (peer connection) each packet belongs to, and assigns the
//! stable `(channel, client)` identity that payload decoding and display
//! logic rely on across multiple dissection passes of the same capture.
//!
//! All state lives in an [`AnalysisSession`]: an arena whose lifetime is
//! the analysis of one capture. Packets are fed to [`resolve()`] (or
//! [`dissect()`] when a payload decoder is attached) in increasing frame
//! order per pass; retroactive session-id binding across passes goes
//! through [`AnalysisSession::sid_add`] and
//! [`AnalysisSession::sid_find`].

pub mod channel;
pub mod classify;
pub mod conversation;
pub mod decoder;
pub mod endpoint;
pub mod error;
pub mod ident;
pub mod index;
pub mod registry;
pub mod resolve;
pub mod session;
pub mod transport;

pub use channel::{ChannelAllocator, ChannelKind, SequentialAllocator};
pub use classify::{
    Classification,
    ClassifierConfig,
    PortRange,
    Role,
    RoleClassifier,
    RolePorts,
    Tag,
};
pub use decoder::PayloadDecoder;
pub use endpoint::{Endpoint, PacketEndpoints, source_label};
pub use error::ConfigError;
pub use ident::{ChannelId, ClientId, FrameNumber, SessionId, TransportId};
pub use registry::{ClientRegistry, TransportRegistry};
pub use resolve::{PacketInfo, PassKind, Resolution, dissect, resolve};
pub use session::AnalysisSession;
pub use transport::{Client, Transport, TransportArena};

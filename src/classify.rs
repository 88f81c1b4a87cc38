//! Role classification from configured port ranges.
//!
//! A packet plays the "source" role when its source port falls inside the
//! active source range, the "client" role when its destination port does,
//! and is otherwise not this protocol at all. The active ranges come
//! either from the global configuration or, when tag mode is enabled and a
//! tag matches, from that tag.

use serde::{Deserialize, Serialize};

use crate::{endpoint::PacketEndpoints, error::ConfigError};

/// Inclusive TCP port range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRange {
    low: u16,
    high: u16,
}

impl PortRange {
    /// Create a range from inclusive bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPortRange`] when `low` exceeds `high`.
    pub fn new(low: u16, high: u16) -> Result<Self, ConfigError> {
        if low > high {
            return Err(ConfigError::InvalidPortRange { low, high });
        }
        Ok(Self { low, high })
    }

    /// Inclusive low bound.
    #[must_use]
    pub const fn low(self) -> u16 { self.low }

    /// Inclusive high bound.
    #[must_use]
    pub const fn high(self) -> u16 { self.high }

    /// True when `port` falls inside the range, bounds included.
    #[must_use]
    pub const fn contains(self, port: u16) -> bool { port >= self.low && port <= self.high }

    /// Re-check the invariant after deserialization.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPortRange`] when the bounds are
    /// inverted.
    pub fn validate(self) -> Result<(), ConfigError> {
        if self.low > self.high {
            return Err(ConfigError::InvalidPortRange {
                low: self.low,
                high: self.high,
            });
        }
        Ok(())
    }
}

/// The three port ranges driving role classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePorts {
    /// Ports transport sources listen on.
    pub source: PortRange,
    /// Ports used for unicast retransmission requests.
    pub request: PortRange,
    /// Ports persistent stores listen on.
    pub store: PortRange,
}

impl RolePorts {
    fn validate(&self) -> Result<(), ConfigError> {
        self.source.validate()?;
        self.request.validate()?;
        self.store.validate()
    }

    /// True when any of the three ranges contains `port`.
    #[must_use]
    pub const fn any_contains(&self, port: u16) -> bool {
        self.source.contains(port) || self.request.contains(port) || self.store.contains(port)
    }
}

impl Default for RolePorts {
    fn default() -> Self {
        // Protocol defaults; overridable per deployment.
        Self {
            source: PortRange {
                low: 14371,
                high: 14390,
            },
            request: PortRange {
                low: 14391,
                high: 14395,
            },
            store: PortRange {
                low: 14396,
                high: 14399,
            },
        }
    }
}

/// A named bundle of port ranges used instead of the global configuration
/// when tag mode is enabled.
///
/// Tags are plain values with structural equality; validation is a
/// re-check of the range invariants after external deserialization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Display name of the tag.
    pub name: String,
    /// Ranges this tag classifies with.
    pub ports: RolePorts,
}

impl Tag {
    /// Create a named tag over the given ranges.
    #[must_use]
    pub fn new(name: impl Into<String>, ports: RolePorts) -> Self {
        Self {
            name: name.into(),
            ports,
        }
    }

    /// Re-check the tag's range invariants.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found among the tag's ranges.
    pub fn validate(&self) -> Result<(), ConfigError> { self.ports.validate() }
}

/// Which role a packet plays for this protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// Sent by a transport source towards a client.
    FromSource,
    /// Sent by a client towards a transport source.
    FromClient,
    /// Neither port matches; treat as an opaque stream.
    NotTransport,
}

/// A classification outcome: the role plus the tag that decided it.
#[derive(Clone, Copy, Debug)]
pub struct Classification<'a> {
    /// Role the packet plays.
    pub role: Role,
    /// Matching tag when tag mode decided the role; `None` in global mode.
    pub tag: Option<&'a Tag>,
}

/// Classifier configuration: global ranges, optional tags, and the mode
/// switch between them.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Ranges used when tag mode is off or no tag matches.
    pub ports: RolePorts,
    /// Ordered tag list consulted first-match when tag mode is on.
    pub tags: Vec<Tag>,
    /// Whether tag-based classification is enabled.
    pub use_tags: bool,
}

/// Decides the protocol role of each packet.
///
/// Configuration updates that fail validation are dropped: the previous
/// valid configuration stays in force and a warning is logged, matching
/// the forgiving behaviour of the rest of the engine.
#[derive(Clone, Debug, Default)]
pub struct RoleClassifier {
    config: ClassifierConfig,
}

impl RoleClassifier {
    /// Create a classifier over an already validated configuration.
    #[must_use]
    pub fn new(config: ClassifierConfig) -> Self { Self { config } }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &ClassifierConfig { &self.config }

    /// Replace the global source range, keeping the previous one when the
    /// bounds are inverted.
    pub fn set_source_range(&mut self, low: u16, high: u16) {
        Self::apply_range(&mut self.config.ports.source, low, high, "source");
    }

    /// Replace the global request range, keeping the previous one when the
    /// bounds are inverted.
    pub fn set_request_range(&mut self, low: u16, high: u16) {
        Self::apply_range(&mut self.config.ports.request, low, high, "request");
    }

    /// Replace the global store range, keeping the previous one when the
    /// bounds are inverted.
    pub fn set_store_range(&mut self, low: u16, high: u16) {
        Self::apply_range(&mut self.config.ports.store, low, high, "store");
    }

    fn apply_range(slot: &mut PortRange, low: u16, high: u16, which: &str) {
        match PortRange::new(low, high) {
            Ok(range) => *slot = range,
            Err(error) => {
                log::warn!("ignoring {which} range update: {error}; previous range retained");
            }
        }
    }

    /// Replace the tag list, keeping the previous list when any tag fails
    /// validation.
    pub fn set_tags(&mut self, tags: Vec<Tag>) {
        for tag in &tags {
            if let Err(error) = tag.validate() {
                log::warn!(
                    "ignoring tag table update: tag \"{}\": {error}; previous tags retained",
                    tag.name,
                );
                return;
            }
        }
        self.config.tags = tags;
    }

    /// Switch between tag-based and global classification.
    pub fn set_use_tags(&mut self, use_tags: bool) { self.config.use_tags = use_tags; }

    /// Return the first configured tag matching either of the packet's
    /// ports, or `None` when tag mode is off or nothing matches.
    #[must_use]
    pub fn locate_tag(&self, packet: &PacketEndpoints) -> Option<&Tag> {
        if !self.config.use_tags {
            return None;
        }
        self.config.tags.iter().find(|tag| {
            tag.ports.any_contains(packet.src.port) || tag.ports.any_contains(packet.dst.port)
        })
    }

    /// True when the packet's source port falls in the active source
    /// range (the tag's when given, the global one otherwise).
    #[must_use]
    pub fn is_from_transport_source(&self, packet: &PacketEndpoints, tag: Option<&Tag>) -> bool {
        self.active_ports(tag).source.contains(packet.src.port)
    }

    /// True when the packet's destination port falls in the active source
    /// range.
    #[must_use]
    pub fn is_from_transport_client(&self, packet: &PacketEndpoints, tag: Option<&Tag>) -> bool {
        self.active_ports(tag).source.contains(packet.dst.port)
    }

    /// Classify a packet, resolving the tag first when tag mode is on.
    ///
    /// Precedence: source role wins over client role; packets matching
    /// neither are [`Role::NotTransport`].
    #[must_use]
    pub fn classify(&self, packet: &PacketEndpoints) -> Classification<'_> {
        let tag = self.locate_tag(packet);
        let role = if self.is_from_transport_source(packet, tag) {
            Role::FromSource
        } else if self.is_from_transport_client(packet, tag) {
            Role::FromClient
        } else {
            Role::NotTransport
        };
        Classification { role, tag }
    }

    fn active_ports(&self, tag: Option<&Tag>) -> RolePorts {
        tag.map_or(self.config.ports, |tag| tag.ports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Deserialization can smuggle in bounds `PortRange::new` would refuse;
    // build one the same way to exercise the validation path.
    fn inverted_range() -> PortRange { PortRange { low: 20, high: 10 } }

    #[test]
    fn inverted_range_contains_nothing() {
        let range = inverted_range();
        assert!(!range.contains(10));
        assert!(!range.contains(15));
        assert!(!range.contains(20));
    }

    #[test]
    fn validate_catches_deserialized_inverted_bounds() {
        assert_eq!(
            inverted_range().validate(),
            Err(ConfigError::InvalidPortRange { low: 20, high: 10 })
        );
    }

    #[test]
    fn tag_table_update_with_an_invalid_tag_is_dropped_whole() {
        let mut classifier = RoleClassifier::default();
        let good = Tag::new("good", RolePorts::default());
        classifier.set_tags(vec![good.clone()]);

        let bad_ports = RolePorts {
            request: inverted_range(),
            ..RolePorts::default()
        };
        classifier.set_tags(vec![good.clone(), Tag::new("bad", bad_ports)]);

        assert_eq!(classifier.config().tags, vec![good]);
    }
}

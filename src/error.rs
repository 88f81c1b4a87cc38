//! Configuration error type.
//!
//! The correlation engine itself has no fatal paths: every lookup returns
//! an `Option` and a missing binding degrades to a provisional channel.
//! Errors arise only when validating externally supplied classifier
//! configuration.

/// Error raised when classifier configuration fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A port range whose low bound exceeds its high bound.
    InvalidPortRange {
        /// Supplied low bound.
        low: u16,
        /// Supplied high bound.
        high: u16,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPortRange { low, high } => {
                write!(f, "invalid port range: low bound {low} exceeds high bound {high}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

use std::fmt;

/// Malformed configuration. Callers should report and fall back to
/// documented defaults rather than treating this as fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Top-level error for the simulation core. `core` performs no I/O, so an
/// output write failure only ever appears at the `frontend` boundary as a
/// plain `std::io::Error` and has no variant here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RocError {
    Config(ConfigError),
    /// A requested physics event index was absent from the payload table.
    PayloadMissing(String),
}

impl fmt::Display for RocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "{e}"),
            Self::PayloadMissing(msg) => write!(f, "payload missing: {msg}"),
        }
    }
}

impl std::error::Error for RocError {}

impl From<ConfigError> for RocError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

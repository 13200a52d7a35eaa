//! Error types for wire decoding, catalog configuration and the scheduler.

use thiserror::Error;

/// Rejection of a malformed wire payload.
///
/// The payload is dropped; the connection stays usable for following frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("payload of {len} bytes is shorter than the {min} byte header")]
    TooShort { len: usize, min: usize },
    #[error("unknown command code {0}")]
    UnknownCommand(u16),
    #[error("payload declares {declared} bytes but only {available} are present")]
    Truncated { declared: usize, available: usize },
    #[error("declared payload length overflows")]
    LengthOverflow,
    #[error("peak data carries {count} bands, at most {max} are supported")]
    TooManyBands { count: usize, max: usize },
}

/// Failure to build an effect catalog.
///
/// The caller is expected to fall back to [`crate::default_catalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("catalog document is malformed")]
    Malformed,
    #[error("catalog document has no effect array")]
    MissingEffects,
    #[error("catalog document has no usable effects")]
    NoUsableEffects,
    #[error("effect catalog is empty")]
    EmptyCatalog,
    #[error("effect catalog exceeds {max} entries")]
    TooManyEffects { max: usize },
    #[error("failed to serialize the effect catalog")]
    Serialize,
}

/// An effect index outside of the loaded catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("effect index {index} is out of range for {count} effects")]
pub struct IndexError {
    pub index: usize,
    pub count: usize,
}

/// An effect could not be prepared for the attached drawing surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InitError {
    #[error("no drawing surfaces attached")]
    NoSurfaces,
    #[error("surface has no LEDs")]
    EmptySurface,
    #[error("{count} LEDs exceed the effect capacity of {max}")]
    TooManyLeds { count: usize, max: usize },
}

/// Failure of an administrative command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AdminError {
    #[error(transparent)]
    Index(#[from] IndexError),
    #[error(transparent)]
    Init(#[from] InitError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

//! Error type shared by the physics core, its configuration and scene persistence.
//!
//! Narrow phase and resolution never produce errors; degenerate geometry is
//! guarded where it occurs. Errors only surface at the boundaries: shape
//! validation, handle lookup, config files and scene files.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhysicsError {
    /// Shape geometry that cannot be simulated (negative radius, NaN, ...).
    #[error("invalid shape: {0}")]
    InvalidShape(String),

    /// A body property outside its valid range (non-positive mass, NaN drag, ...).
    #[error("invalid property: {0}")]
    InvalidProperty(String),

    /// A body or trigger handle that no longer refers to a live slot.
    #[error("unknown handle: {0}")]
    UnknownHandle(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The INI configuration could not be read or holds a bad value.
    #[error("config error: {0}")]
    Config(String),

    /// A scene file parsed but describes something that cannot be rebuilt.
    #[error("malformed scene: {0}")]
    MalformedScene(String),
}

pub type Result<T> = std::result::Result<T, PhysicsError>;

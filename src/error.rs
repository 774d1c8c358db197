//! Error types for the flocking engine.
//!
//! Uses `Box<dyn std::error::Error>`-style idioms at I/O boundaries, but
//! gives the startup path — config loading, the one place a conforming run
//! can fail before any tick executes — a concrete, matchable type instead
//! of a trait object.

use std::fmt;

/// Errors surfaced before or during a run that a caller can reasonably act on.
///
/// Contract violations (invalid flock consulted, layout unset, empty
/// bounding box) are *not* represented here — those are programmer errors
/// caught with `assert!`/`debug_assert!`, not recoverable conditions.
#[derive(Debug)]
pub enum EngineError {
    /// The configuration file could not be read or did not parse as TOML.
    Config(String),
    /// An I/O failure unrelated to configuration (frame export, trace dump).
    Io(std::io::Error),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Config(msg) => write!(f, "configuration error: {msg}"),
            EngineError::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Config(_) => None,
            EngineError::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::Io(err)
    }
}

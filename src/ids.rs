//! Stable identifiers for boids and flocks.
//!
//! A plain `usize` would thread just as easily through `HashMap` keys, but
//! the ids here are load-bearing — a `BoidId` must never be confused with a
//! `FlockId` when both appear as keys in the same function — so they're
//! newtypes instead.

use std::fmt;

/// Unique, dense identifier assigned to a boid at construction. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct BoidId(pub usize);

/// Stable identifier for a flock. Flocks may be removed (by `CleanUp`) but a
/// live `FlockId` is never reassigned to a different flock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct FlockId(pub usize);

impl fmt::Display for BoidId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "boid#{}", self.0)
    }
}

impl fmt::Display for FlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "flock#{}", self.0)
    }
}

impl From<usize> for BoidId {
    fn from(value: usize) -> Self {
        BoidId(value)
    }
}

impl From<usize> for FlockId {
    fn from(value: usize) -> Self {
        FlockId(value)
    }
}

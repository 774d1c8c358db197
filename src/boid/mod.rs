//! # Boid Module - Flocking Simulation Particles
//!
//! Defines the `Boid` struct: the base particle of the flocking simulation.
//! Each boid occupies a point on a flat toroidal plane and updates once per
//! tick via the sense/plan/act cycle implemented in [`physics`].
//!
//! ## Submodules
//!
//! - [`physics`]: `sense_and_plan`/`act` and the distance predicates that
//!   drive them
//! - [`tests`]: unit tests for boid physics

use crate::ids::{BoidId, FlockId};
use crate::vector::Vec2;

pub mod physics;
pub mod tests;

/// A single flocking particle.
///
/// `BoidId` is assigned once at construction and never changes; `flock_id`
/// is mutated by `Flock::assign_to_flock` as membership changes across
/// ticks. `a1`, `a2`, `a3` are the cohesion/separation/alignment partial
/// accelerations computed by `sense_and_plan` and consumed by `act` in the
/// same tick — they are not meaningful between the two calls.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Boid {
    pub id: BoidId,
    pub flock_id: FlockId,
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub a1: Vec2,
    pub a2: Vec2,
    pub a3: Vec2,
}

impl Boid {
    /// Creates a new boid at `position` with `velocity`, owned by `flock_id`.
    /// Acceleration and the rule accumulators start at zero.
    pub fn new(id: BoidId, flock_id: FlockId, position: Vec2, velocity: Vec2) -> Self {
        Boid {
            id,
            flock_id,
            position,
            velocity,
            acceleration: Vec2::zero(),
            a1: Vec2::zero(),
            a2: Vec2::zero(),
            a3: Vec2::zero(),
        }
    }
}

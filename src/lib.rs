//! # flocking_lib — a parallel, agent-based flocking simulator
//!
//! Point-like "boids" update once per discrete tick on a toroidal 2D world
//! by sensing neighbours, planning a velocity change from three local rules
//! (cohesion, separation, alignment), and acting on the plan. Boids are
//! grouped into dynamic flocks that exchange members every tick based on
//! proximity. See `DESIGN.md` for the grounding ledger.
//!
//! ## Module map
//!
//! - [`boid`]: per-agent state and the sense/plan/act cycle
//! - [`flock`]: flock membership layouts, the five flock-level phases, and
//!   bounding boxes
//! - [`simulator`]: the phase orchestrator driving the tick loop over a
//!   `rayon` worker pool
//! - [`tracer`]: per-tick timing and inter-flock/inter-thread communication
//!   telemetry
//! - [`collaborators`]: the random source, frame sink, and clock interfaces
//!   the core consumes without depending on their implementations
//! - [`config`]: the TOML-backed parameter bag and the immutable
//!   `EngineContext` every phase reads
//! - [`ids`]: stable `BoidId`/`FlockId` newtypes
//! - [`error`]: the crate's error type
//! - [`vector`]: the 2D vector/colour arithmetic primitive

pub mod boid;
pub mod collaborators;
pub mod config;
pub mod error;
pub mod flock;
pub mod ids;
pub mod simulator;
pub mod tracer;
pub mod vector;

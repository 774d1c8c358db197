//! # Physics Module for Boid Movement and Flocking Rules
//!
//! Implements the sense/plan/act cycle: `sense_and_plan` scans a caller-
//! supplied set of peers and accumulates the three rule forces, and `act`
//! integrates them into a new velocity and position. The two are split
//! because a barrier must separate them — every boid in the system
//! finishes planning from the pre-tick positions before any boid moves.

use crate::boid::Boid;
use crate::config::EngineContext;
use crate::tracer::{TraceOp, Tracer};

impl Boid {
    /// Squared distance to `other`. Used in the hot neighbour-scan loop to
    /// avoid a square root per comparison.
    #[inline]
    fn distance_squared_to(&self, other: &Boid) -> f64 {
        self.position.distance_squared(&other.position)
    }

    /// `true` if `other` is strictly farther than `radius`.
    pub fn distance_gt(&self, other: &Boid, radius: f64) -> bool {
        self.distance_squared_to(other) > radius * radius
    }

    /// `true` if `other` is strictly closer than `radius`.
    pub fn distance_lt(&self, other: &Boid, radius: f64) -> bool {
        self.distance_squared_to(other) < radius * radius
    }

    /// Euclidean distance to `other`. Only used where an exact distance is
    /// needed (delegate scoring); everywhere else prefer `distance_gt`/`_lt`.
    pub fn distance_to(&self, other: &Boid) -> f64 {
        self.position.distance_to(&other.position)
    }

    /// Resets the rule accumulators, then scans `peers` and accumulates the
    /// cohesion, separation, and alignment contributions.
    ///
    /// `peers` is whatever the caller has already filtered down to boids in
    /// bounding-box-overlapping flocks — `Boid` itself stays agnostic of
    /// layout (Local vs. Global) and parallel axis; it only knows how to
    /// fold a peer into the running totals. Every peer visited is logged to
    /// `tracer` as a read of that peer's flock by `self`'s flock, even the
    /// self-boid and out-of-radius peers, matching the reference
    /// implementation's read accounting.
    pub fn sense_and_plan<'a>(
        &mut self,
        thread_id: usize,
        peers: impl Iterator<Item = &'a Boid>,
        ctx: &EngineContext,
        tracer: &Tracer,
    ) {
        let _ = thread_id; // ThreadID bookkeeping lives on Flock, not Boid.
        self.a1 = crate::vector::Vec2::zero();
        self.a2 = crate::vector::Vec2::zero();
        self.a3 = crate::vector::Vec2::zero();

        let cfg = &ctx.config;
        let mut relative_com = crate::vector::Vec2::zero();
        let mut relative_cov = crate::vector::Vec2::zero();
        let mut separation = crate::vector::Vec2::zero();
        let mut num_closeby: usize = 0;

        for peer in peers {
            tracer.add_read(self.flock_id, peer.flock_id, TraceOp::SenseAndPlan);

            if peer.id == self.id {
                continue;
            }
            if self.distance_gt(peer, cfg.neighbourhood_radius) {
                continue;
            }

            relative_com += peer.position;
            relative_cov += peer.velocity;
            if self.distance_lt(peer, cfg.collision_radius) {
                separation -= peer.position - self.position;
            }
            num_closeby += 1;
        }

        if num_closeby > 0 {
            let n = num_closeby as f64;
            self.a1 = ((relative_com / n) - self.position) * cfg.cohesion;
            self.a2 = separation * cfg.separation;
            self.a3 = ((relative_cov / n) - self.velocity) * cfg.alignment;
        }
    }

    /// Integrates the rule accumulators into a new velocity (clamped to
    /// `max_vel`) and position. Edge-wrap is deliberately not applied here —
    /// see `to_window_space` in `crate::collaborators::frame_sink` for where
    /// positions are wrapped, at the render boundary only.
    pub fn act(&mut self, dt: f64, ctx: &EngineContext) {
        self.acceleration = self.a1 + self.a2 + self.a3;
        self.velocity = (self.velocity + self.acceleration).clamp_magnitude(ctx.config.max_vel);
        self.position += self.velocity * dt;
    }

    /// Pushes `self` directly away from every peer whose centre lies within
    /// `2 * boid_radius` (a physical overlap, not the softer cohesion
    /// separation rule), proportionally to how much they overlap. Optional:
    /// only called when a run enables hard-body pushback on top of the
    /// cohesion/separation/alignment rules.
    pub fn collision_pushback<'a>(&mut self, peers: impl Iterator<Item = &'a Boid>, boid_radius: f64) {
        let contact_radius = 2.0 * boid_radius;
        for peer in peers {
            if peer.id == self.id {
                continue;
            }
            let delta = peer.position - self.position;
            let dist_sqr = delta.norm_squared();
            if dist_sqr >= contact_radius * contact_radius {
                continue;
            }
            let dist = dist_sqr.sqrt();
            if dist < f64::EPSILON {
                continue;
            }
            let overlap = 1.0 - (dist / contact_radius);
            self.position -= delta * overlap;
        }
    }
}

//! # Flock Module
//!
//! A `Flock` is a group of boids that currently act as one neighbourhood
//! unit: they share a bounding box used to prune which other flocks can
//! contribute neighbours, and they migrate members to other flocks once per
//! tick via the `Delegate` -> `AssignToFlock` hand-off — a race-free,
//! two-phase replacement for recruiting boids mid-tick.
//!
//! ## Submodules
//!
//! - [`neighbourhood`]: the `Local`/`Global` membership layouts
//! - [`bounding_box`]: the axis-aligned pruning box
//! - [`tests`]: unit tests for the five flock-level phases

pub mod bounding_box;
pub mod neighbourhood;
pub mod tests;

use crate::boid::Boid;
use crate::config::EngineContext;
use crate::ids::{BoidId, FlockId};
use crate::tracer::{TraceOp, Tracer};
use bounding_box::BoundingBox;
use neighbourhood::{GlobalBoidStore, Neighbourhood};
use std::collections::HashMap;

/// Which worker last executed each of a flock's three flock-level phases in
/// the most recent tick. Consumed by `Tracer::save_flock_matrix` to project
/// the per-flock read matrix onto a per-thread matrix.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlockThreadIds {
    pub sense_and_plan: usize,
    pub delegate: usize,
    pub assign_to_flock: usize,
}

/// A read-only view of every flock's bounding box and size, and (for `Local`
/// layout only) a clone of every flock's member boids, taken once at the
/// start of a parallel region.
///
/// Phases that read other flocks' state (`sense_and_plan`, `delegate`) may
/// run concurrently with phases that mutate `self`'s own state, but never
/// concurrently with anything that mutates *other* flocks' state in the same
/// region — the preceding barrier guarantees the snapshot is still accurate
/// for the duration of the region.
pub struct WorldSnapshot {
    pub bboxes: HashMap<FlockId, BoundingBox>,
    pub sizes: HashMap<FlockId, usize>,
    pub local_members: HashMap<FlockId, Vec<Boid>>,
}

impl WorldSnapshot {
    pub fn capture(flocks: &HashMap<FlockId, Flock>, global: Option<&GlobalBoidStore>) -> Self {
        let bboxes = flocks.iter().map(|(id, f)| (*id, f.bbox)).collect();
        let sizes = flocks.iter().map(|(id, f)| (*id, f.member_count(global))).collect();
        let local_members = flocks
            .iter()
            .filter_map(|(id, f)| match &f.neighbourhood {
                Neighbourhood::Local(boids) => Some((*id, boids.clone())),
                Neighbourhood::Global => None,
            })
            .collect();
        WorldSnapshot { bboxes, sizes, local_members }
    }

    fn peers_of(&self, flock: FlockId, global: Option<&GlobalBoidStore>) -> Vec<Boid> {
        match global {
            Some(store) => store.member_ids(flock).into_iter().map(|id| store.get(id)).collect(),
            None => self.local_members.get(&flock).cloned().unwrap_or_default(),
        }
    }

    /// Flocks (including `flock` itself) whose bounding box overlaps
    /// `flock`'s own, after inflating the candidate by `radius`.
    fn candidates(&self, flock: FlockId, radius: f64) -> Vec<FlockId> {
        let own = self.bboxes[&flock];
        self.bboxes
            .iter()
            .filter(|(_, bb)| own.intersects(bb, radius))
            .map(|(id, _)| *id)
            .collect()
    }
}

/// A group of boids sharing a bounding box and a stable id.
///
/// `emigrants` is rebuilt by `delegate` every tick and fully drained by
/// `assign_to_flock` in the same tick.
pub struct Flock {
    pub id: FlockId,
    neighbourhood: Neighbourhood,
    pub bbox: BoundingBox,
    pub valid: bool,
    pub emigrants: HashMap<FlockId, Vec<Boid>>,
    pub tids: FlockThreadIds,
}

impl Flock {
    /// Builds the singleton flock the simulator seeds at construction: one
    /// boid, bounding box inflated by `boid_radius` around its position.
    pub fn new_singleton(boid: Boid, boid_radius: f64, neighbourhood: Neighbourhood) -> Self {
        let id = boid.flock_id;
        let bbox = BoundingBox::enclosing(std::iter::once(boid.position), boid_radius)
            .expect("a singleton flock always has one member");
        let neighbourhood = match neighbourhood {
            Neighbourhood::Local(_) => Neighbourhood::Local(vec![boid]),
            Neighbourhood::Global => Neighbourhood::Global,
        };
        Flock {
            id,
            neighbourhood,
            bbox,
            valid: true,
            emigrants: HashMap::new(),
            tids: FlockThreadIds::default(),
        }
    }

    /// Direct access to the membership container, for tests that need to
    /// seed a flock with more than one member without going through a full
    /// tick.
    pub(crate) fn neighbourhood_mut(&mut self) -> &mut Neighbourhood {
        &mut self.neighbourhood
    }

    /// Local-layout member records, read-only. Used by the `ParallelBoids`
    /// axis in `Simulator` to build a whole-population snapshot; panics if
    /// this flock is `Global`-backed (asserted by `Neighbourhood::local_boids`),
    /// which never happens since layout is fixed process-wide.
    pub(crate) fn local_boids(&self) -> &[Boid] {
        self.neighbourhood.local_boids()
    }

    /// Local-layout member records, mutable. See [`Self::local_boids`].
    pub(crate) fn local_boids_mut(&mut self) -> &mut Vec<Boid> {
        self.neighbourhood.local_boids_mut()
    }

    pub fn member_count(&self, global: Option<&GlobalBoidStore>) -> usize {
        match &self.neighbourhood {
            Neighbourhood::Local(boids) => boids.len(),
            Neighbourhood::Global => global.expect("Global layout requires a GlobalBoidStore").size_of(self.id),
        }
    }

    fn member_ids(&self, global: Option<&GlobalBoidStore>) -> Vec<BoidId> {
        match &self.neighbourhood {
            Neighbourhood::Local(boids) => boids.iter().map(|b| b.id).collect(),
            Neighbourhood::Global => global.expect("Global layout requires a GlobalBoidStore").member_ids(self.id),
        }
    }

    /// Flock-level sense-and-plan phase, used only by the `ParallelFlocks`
    /// axis — `ParallelBoids` runs `Boid::sense_and_plan` directly over the whole
    /// population and never calls this. Records `thread_id`, then for every
    /// candidate flock (bounding-box overlap after inflation by
    /// `neighbourhood_radius`), scans its members as peers for every one of
    /// this flock's own boids.
    pub fn sense_and_plan(
        &mut self,
        thread_id: usize,
        snapshot: &WorldSnapshot,
        global: Option<&GlobalBoidStore>,
        ctx: &EngineContext,
        tracer: &Tracer,
    ) {
        self.tids.sense_and_plan = thread_id;
        let candidates = snapshot.candidates(self.id, ctx.config.neighbourhood_radius);
        let peers: Vec<Boid> = candidates
            .into_iter()
            .flat_map(|other| {
                tracer.add_read(self.id, other, TraceOp::SenseAndPlan);
                snapshot.peers_of(other, global)
            })
            .collect();

        match &mut self.neighbourhood {
            Neighbourhood::Local(boids) => {
                for boid in boids.iter_mut() {
                    boid.sense_and_plan(thread_id, peers.iter(), ctx, tracer);
                }
            }
            Neighbourhood::Global => {
                let store = global.expect("Global layout requires a GlobalBoidStore");
                for id in store.member_ids(self.id) {
                    store.with_mut(id, |b| b.sense_and_plan(thread_id, peers.iter(), ctx, tracer));
                }
            }
        }
    }

    /// Flock-level act phase, used only by the `ParallelFlocks` axis. Writes
    /// only this flock's own boids.
    pub fn act(&mut self, dt: f64, ctx: &EngineContext, global: Option<&GlobalBoidStore>) {
        match &mut self.neighbourhood {
            Neighbourhood::Local(boids) => {
                for boid in boids.iter_mut() {
                    boid.act(dt, ctx);
                }
            }
            Neighbourhood::Global => {
                let store = global.expect("Global layout requires a GlobalBoidStore");
                for id in store.member_ids(self.id) {
                    store.with_mut(id, |b| b.act(dt, ctx));
                }
            }
        }
    }

    /// Computes a destination flock for every member boid and buckets a copy
    /// of the boid (with `flock_id` already set to the winning destination)
    /// into `self.emigrants`. Every boid lands in exactly one bucket — its
    /// own flock's bucket if nothing else wins.
    pub fn delegate(
        &mut self,
        thread_id: usize,
        snapshot: &WorldSnapshot,
        global: Option<&GlobalBoidStore>,
        ctx: &EngineContext,
        tracer: &Tracer,
    ) {
        self.tids.delegate = thread_id;
        self.emigrants.clear();

        let cfg = &ctx.config;
        let candidates = snapshot.candidates(self.id, cfg.neighbourhood_radius);
        let members: Vec<Boid> = match &self.neighbourhood {
            Neighbourhood::Local(boids) => boids.clone(),
            Neighbourhood::Global => self
                .member_ids(global)
                .into_iter()
                .map(|id| global.expect("Global layout requires a GlobalBoidStore").get(id))
                .collect(),
        };

        // `max_flock_delegation` bounds how many of this flock's members a
        // single Delegate call considers for migration; any member past the
        // bound defaults to staying, same as a member that loses every
        // scoring comparison.
        let considered = members.len().min(cfg.max_flock_delegation);
        for (i, boid) in members.iter().enumerate() {
            let mut best_dest = self.id;

            if i < considered {
                let mut best_score = f64::NEG_INFINITY;
                for &other in &candidates {
                    tracer.add_read(self.id, other, TraceOp::Delegate);
                    let other_size = snapshot.sizes[&other] as f64;
                    // `max_size` bounds how large a destination flock may
                    // grow via delegation; a flock already at or above the
                    // bound is never chosen (a boid's own flock is always
                    // still a legal destination, capped or not).
                    if other != self.id && other_size >= cfg.max_size as f64 {
                        continue;
                    }
                    for peer in snapshot.peers_of(other, global) {
                        if peer.id == boid.id {
                            continue;
                        }
                        let distance = boid.distance_to(&peer);
                        if distance >= cfg.collision_radius {
                            continue;
                        }
                        let score = cfg.weight_flock_size * other_size + cfg.weight_flock_dist / distance;
                        if score > best_score {
                            best_score = score;
                            best_dest = other;
                        }
                    }
                }
            }

            let mut routed = *boid;
            routed.flock_id = best_dest;
            self.emigrants.entry(best_dest).or_default().push(routed);
        }
    }

    /// Rebuilds membership from every flock's `emigrants` bucket addressed
    /// to this flock (including this flock's own bucket, which holds the
    /// boids that stayed). A no-op when only one flock is alive.
    pub fn assign_to_flock(
        &mut self,
        thread_id: usize,
        num_live_flocks: usize,
        all_emigrants: &HashMap<FlockId, HashMap<FlockId, Vec<Boid>>>,
        global: Option<&GlobalBoidStore>,
    ) {
        self.tids.assign_to_flock = thread_id;
        if num_live_flocks <= 1 {
            return;
        }

        self.neighbourhood.clear_local();
        for (&source, emigrants) in all_emigrants {
            let Some(records) = emigrants.get(&self.id) else { continue };
            match &mut self.neighbourhood {
                Neighbourhood::Local(_) => self.neighbourhood.append_local(records),
                Neighbourhood::Global => {
                    let store = global.expect("Global layout requires a GlobalBoidStore");
                    for boid in records {
                        store.migrate(boid.id, source, self.id);
                    }
                }
            }
        }
        self.valid = self.member_count(global) > 0;
    }

    /// Current member positions, read-only. Shared by `compute_bounding_box`
    /// and by the frame sink's per-flock render pass.
    pub fn positions(&self, global: Option<&GlobalBoidStore>) -> Vec<crate::vector::Vec2> {
        match &self.neighbourhood {
            Neighbourhood::Local(boids) => boids.iter().map(|b| b.position).collect(),
            Neighbourhood::Global => {
                let store = global.expect("Global layout requires a GlobalBoidStore");
                store.member_ids(self.id).into_iter().map(|id| store.get(id).position).collect()
            }
        }
    }

    /// Recomputes the bounding box from current member positions, inflated
    /// by `boid_radius`. An empty flock is left invalid rather than given a
    /// degenerate box, which also sidesteps a division by zero in any
    /// downstream centroid calculation.
    pub fn compute_bounding_box(&mut self, boid_radius: f64, global: Option<&GlobalBoidStore>) {
        let positions = self.positions(global);
        match BoundingBox::enclosing(positions.into_iter(), boid_radius) {
            Some(bbox) => self.bbox = bbox,
            None => self.valid = false,
        }
    }

    /// Removes every invalid flock from `flocks`, and (for `Global` layout)
    /// drops its now-empty id set from `global`.
    pub fn clean_up(flocks: &mut HashMap<FlockId, Flock>, mut global: Option<&mut GlobalBoidStore>) {
        let dead: Vec<FlockId> = flocks.iter().filter(|(_, f)| !f.valid).map(|(id, _)| *id).collect();
        for id in dead {
            flocks.remove(&id);
            if let Some(store) = global.as_deref_mut() {
                store.remove_flock(id);
            }
        }
    }
}

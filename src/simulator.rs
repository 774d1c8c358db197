//! # Simulator — phase orchestrator and worker-pool driver
//!
//! Builds the initial singleton-flock population, then drives the six-step
//! tick chain over a dedicated `rayon::ThreadPool`: optional `Render` →
//! `(ParallelBoids | ParallelFlocks)` → `Delegate` → `AssignToFlock` →
//! `ComputeBoundingBox` → tick-metrics recording. OpenMP's `#pragma omp
//! for`/`#pragma omp barrier` are replaced by `rayon`'s parallel iterators
//! — a `par_iter`/`par_iter_mut` call does not return until every item is
//! processed, which is exactly the fork-join barrier an `omp barrier` would
//! enforce.

use crate::boid::Boid;
use crate::collaborators::clock::{Clock, SystemClock};
use crate::collaborators::frame_sink::{id_colour, to_window_space, Colour, FrameSink, PpmFrameSink};
use crate::collaborators::random::{RandomSource, SeededRandom};
use crate::config::{EngineContext, NeighbourhoodLayout};
use crate::flock::neighbourhood::{GlobalBoidStore, Neighbourhood};
use crate::flock::{Flock, WorldSnapshot};
use crate::ids::{BoidId, FlockId};
use crate::tracer::{TraceOp, Tracer};
use crate::vector::Vec2;
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::Path;

/// The fixed seed a `std::srand(0)`-style call would pass — a consistent
/// seed for reproducible runs.
pub const DEFAULT_SEED: u64 = 0;

/// Owns the entire live simulation: the world map, the optional global boid
/// store, the tracer, and the worker pool every phase runs on.
pub struct Simulator {
    ctx: EngineContext,
    num_boids: usize,
    flocks: HashMap<FlockId, Flock>,
    global: Option<GlobalBoidStore>,
    tracer: Tracer,
    pool: rayon::ThreadPool,
    frame_sink: Option<PpmFrameSink>,
    clock: Box<dyn Clock + Send + Sync>,
    ticks_run: usize,
    total_elapsed: f64,
}

impl Simulator {
    /// Builds `num_boids` singleton flocks (one boid each), seeded with
    /// [`DEFAULT_SEED`].
    pub fn new(ctx: EngineContext) -> Self {
        Self::with_seed(ctx, DEFAULT_SEED)
    }

    /// Same as [`Self::new`] but with an explicit seed — used by the
    /// determinism tests in `tests/` to confirm two runs with the same seed
    /// produce bit-identical trajectories.
    pub fn with_seed(ctx: EngineContext, seed: u64) -> Self {
        Self::with_seed_and_clock(ctx, seed, Box::new(SystemClock::new()))
    }

    /// Same as [`Self::with_seed`], but with an explicit [`Clock`] — lets
    /// callers (e.g. tests) swap in a fake timing source instead of
    /// `SystemClock`, which is exactly the collaborator seam C6 describes.
    pub fn with_seed_and_clock(ctx: EngineContext, seed: u64, clock: Box<dyn Clock + Send + Sync>) -> Self {
        let mut rng = SeededRandom::new(seed);
        let num_boids = ctx.config.num_boids;

        let mut initial_boids = Vec::with_capacity(num_boids);
        for i in 0..num_boids {
            let id = BoidId(i);
            let flock_id = FlockId(i);
            let position = Vec2::new(
                rng.uniform(0.0, ctx.config.window_x),
                rng.uniform(0.0, ctx.config.window_y),
            );
            let half_vel = ctx.config.max_vel / 2.0;
            let velocity = Vec2::new(rng.uniform(-half_vel, half_vel), rng.uniform(-half_vel, half_vel));
            initial_boids.push(Boid::new(id, flock_id, position, velocity));
        }

        let mut global = match ctx.layout {
            NeighbourhoodLayout::Local => None,
            NeighbourhoodLayout::Global => Some(GlobalBoidStore::new(initial_boids.clone())),
        };

        let mut flocks = HashMap::with_capacity(num_boids);
        for boid in initial_boids {
            let flock_id = boid.flock_id;
            if let Some(store) = global.as_mut() {
                store.register_flock(flock_id);
            }
            let neighbourhood = Neighbourhood::new(ctx.layout);
            flocks.insert(flock_id, Flock::new_singleton(boid, ctx.config.boid_radius, neighbourhood));
        }

        let tracer = Tracer::new(num_boids, ctx.config.num_threads, ctx.config.track_mem);

        let pool_size = ctx.config.num_threads;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(pool_size)
            .build()
            .expect("failed to build the simulator's worker pool");

        let frame_sink = if ctx.config.render {
            Some(PpmFrameSink::new(ctx.config.window_x, ctx.config.window_y))
        } else {
            None
        };

        log::info!(
            "running {} boids for {} iterations in a ({}, {}) world with {} threads",
            num_boids,
            ctx.config.num_iters,
            ctx.config.window_x,
            ctx.config.window_y,
            pool.current_num_threads()
        );

        Simulator {
            ctx,
            num_boids,
            flocks,
            global,
            tracer,
            pool,
            frame_sink,
            clock,
            ticks_run: 0,
            total_elapsed: 0.0,
        }
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn tracer(&self) -> &Tracer {
        &self.tracer
    }

    pub fn num_live_flocks(&self) -> usize {
        self.flocks.len()
    }

    pub fn flock_sizes(&self) -> Vec<(FlockId, usize)> {
        self.flocks.iter().map(|(id, f)| (*id, f.member_count(self.global.as_ref()))).collect()
    }

    fn total_boid_count(&self) -> usize {
        self.flocks.iter().map(|(_, f)| f.member_count(self.global.as_ref())).sum()
    }

    /// Runs `num_iters` ticks.
    pub fn simulate(&mut self) {
        let num_iters = self.ctx.config.num_iters;
        for i in 0..num_iters {
            self.tick();
            log::debug!("tick: {i}");
        }
        log::info!("finished simulation! took {}s", self.total_elapsed);
    }

    /// Advances the simulation by exactly one tick through the six-step
    /// phase chain. Returns the wall-clock seconds the tick took.
    pub fn tick(&mut self) -> f64 {
        debug_assert_eq!(
            self.total_boid_count(),
            self.num_boids,
            "mass conservation: every boid must belong to exactly one flock at tick start"
        );

        let start = self.clock.now();

        if self.ctx.config.render {
            self.render();
        }

        if self.ctx.config.par_flocks {
            self.run_sense_and_plan_and_act_per_flock();
        } else {
            self.run_sense_and_plan_and_act_per_boid();
        }

        if self.ctx.config.soft_collision {
            self.run_collision_pushback();
        }

        if self.ctx.config.use_flocks {
            self.delegate_and_assign();
        }
        self.recompute_bounding_boxes();

        let elapsed = self.clock.now() - start;

        let tids_snapshot: HashMap<FlockId, crate::flock::FlockThreadIds> =
            self.flocks.iter().map(|(id, f)| (*id, f.tids)).collect();
        self.tracer.save_flock_matrix(|flock_id, op| {
            let tids = tids_snapshot.get(&flock_id).copied().unwrap_or_default();
            match op {
                TraceOp::SenseAndPlan => tids.sense_and_plan,
                TraceOp::Delegate => tids.delegate,
                TraceOp::AssignToFlock => tids.assign_to_flock,
            }
        });
        self.tracer.add_tick_time(elapsed);

        let total_boids: usize = self.flocks.iter().map(|(_, f)| f.member_count(self.global.as_ref())).sum();
        let average_size = if self.flocks.is_empty() { 0.0 } else { total_boids as f64 / self.flocks.len() as f64 };
        self.tracer.add_flock_size(average_size);

        Flock::clean_up(&mut self.flocks, self.global.as_mut());

        debug_assert_eq!(
            self.total_boid_count(),
            self.num_boids,
            "mass conservation: every boid must belong to exactly one flock at tick end"
        );

        self.ticks_run += 1;
        self.total_elapsed += elapsed;
        elapsed
    }

    /// `ParallelBoids` axis: gathers every live boid across every flock into
    /// one flat mutable sequence and runs `Boid::sense_and_plan`/`Boid::act`
    /// over that sequence via `rayon`, so work balances per-boid even when
    /// flock sizes are skewed. This is the default (`par_flocks = false`).
    fn run_sense_and_plan_and_act_per_boid(&mut self) {
        let ctx = &self.ctx;
        let tracer = &self.tracer;
        let dt = ctx.config.timestep;
        let pool = &self.pool;

        if let Some(store) = self.global.as_mut() {
            let snapshot = store.snapshot();
            let ids: Vec<BoidId> = (0..store.len()).map(BoidId).collect();
            pool.install(|| {
                ids.par_iter().for_each(|&id| {
                    let tid = rayon::current_thread_index().unwrap_or(0);
                    store.with_mut(id, |b| b.sense_and_plan(tid, snapshot.iter(), ctx, tracer));
                });
                ids.par_iter().for_each(|&id| {
                    store.with_mut(id, |b| b.act(dt, ctx));
                });
            });
        } else {
            let flocks = &mut self.flocks;
            let snapshot: Vec<Boid> = flocks.values().flat_map(|f| f.local_boids().iter().copied()).collect();
            let mut all_boids: Vec<&mut Boid> =
                flocks.values_mut().flat_map(|f| f.local_boids_mut().iter_mut()).collect();
            pool.install(|| {
                all_boids.par_iter_mut().for_each(|b| {
                    let tid = rayon::current_thread_index().unwrap_or(0);
                    b.sense_and_plan(tid, snapshot.iter(), ctx, tracer);
                });
                all_boids.par_iter_mut().for_each(|b| b.act(dt, ctx));
            });
        }
    }

    /// `ParallelFlocks` axis: runs `Flock::sense_and_plan`/`Flock::act` over
    /// the flock map via `rayon`. A single giant flock can starve other
    /// workers under this axis — that trade-off is accepted since the
    /// config flag exists precisely to let a caller choose.
    fn run_sense_and_plan_and_act_per_flock(&mut self) {
        let snapshot = WorldSnapshot::capture(&self.flocks, self.global.as_ref());
        let ctx = &self.ctx;
        let tracer = &self.tracer;
        let global = self.global.as_ref();
        let pool = &self.pool;
        let flocks = &mut self.flocks;

        pool.install(|| {
            flocks.par_iter_mut().for_each(|(_, flock)| {
                let tid = rayon::current_thread_index().unwrap_or(0);
                flock.sense_and_plan(tid, &snapshot, global, ctx, tracer);
            });
        });
        pool.install(|| {
            flocks.par_iter_mut().for_each(|(_, flock)| {
                flock.act(ctx.config.timestep, ctx, global);
            });
        });
    }

    /// Optional hard-body pass run after `Act`, regardless of which
    /// parallel axis produced the post-act positions: every boid is pushed
    /// directly away from any peer whose centre is still within
    /// `2 * boid_radius`. Uses a whole-population snapshot taken after
    /// `Act`, the same pattern the `ParallelBoids` axis uses for
    /// sense-and-plan, so every boid reacts to the same instant in time
    /// regardless of scheduling order.
    fn run_collision_pushback(&mut self) {
        let boid_radius = self.ctx.config.boid_radius;
        let pool = &self.pool;

        if let Some(store) = self.global.as_mut() {
            let snapshot = store.snapshot();
            let ids: Vec<BoidId> = (0..store.len()).map(BoidId).collect();
            pool.install(|| {
                ids.par_iter().for_each(|&id| {
                    store.with_mut(id, |b| b.collision_pushback(snapshot.iter(), boid_radius));
                });
            });
        } else {
            let flocks = &mut self.flocks;
            let snapshot: Vec<Boid> = flocks.values().flat_map(|f| f.local_boids().iter().copied()).collect();
            let mut all_boids: Vec<&mut Boid> =
                flocks.values_mut().flat_map(|f| f.local_boids_mut().iter_mut()).collect();
            pool.install(|| {
                all_boids.par_iter_mut().for_each(|b| b.collision_pushback(snapshot.iter(), boid_radius));
            });
        }
    }

    /// `Delegate` → `AssignToFlock`, each its own `rayon` barrier. Skipped
    /// entirely when `use_flocks` is `false`; `ComputeBoundingBox` is a
    /// separate, unconditional step (see `recompute_bounding_boxes`) since
    /// §4.4 runs it every tick regardless of whether flocks exchange members.
    fn delegate_and_assign(&mut self) {
        let snapshot = WorldSnapshot::capture(&self.flocks, self.global.as_ref());
        let ctx = &self.ctx;
        let tracer = &self.tracer;
        let global = self.global.as_ref();
        let pool = &self.pool;
        let flocks = &mut self.flocks;

        pool.install(|| {
            flocks.par_iter_mut().for_each(|(_, flock)| {
                let tid = rayon::current_thread_index().unwrap_or(0);
                flock.delegate(tid, &snapshot, global, ctx, tracer);
            });
        });

        let all_emigrants: HashMap<FlockId, HashMap<FlockId, Vec<Boid>>> =
            flocks.iter().map(|(id, f)| (*id, f.emigrants.clone())).collect();
        let num_live = flocks.len();

        pool.install(|| {
            flocks.par_iter_mut().for_each(|(_, flock)| {
                let tid = rayon::current_thread_index().unwrap_or(0);
                flock.assign_to_flock(tid, num_live, &all_emigrants, global);
            });
        });
    }

    /// Step 5 of the tick chain (§4.4): recompute every live flock's
    /// bounding box from its members' current positions. Runs every tick,
    /// independent of `use_flocks` — with `use_flocks = false` the flocks
    /// never gain or lose members, but their boids still move under `Act`,
    /// so a box left stale at its construction value would make the
    /// `ParallelFlocks` axis's neighbour-candidate prune (`WorldSnapshot::candidates`)
    /// diverge from `ParallelBoids`, which always scans every boid directly.
    fn recompute_bounding_boxes(&mut self) {
        let boid_radius = self.ctx.config.boid_radius;
        let global = self.global.as_ref();
        let pool = &self.pool;
        let flocks = &mut self.flocks;
        pool.install(|| {
            flocks.par_iter_mut().for_each(|(_, flock)| {
                flock.compute_bounding_box(boid_radius, global);
            });
        });
    }

    /// Draws every live boid into the frame sink and exports it. Export
    /// failure is non-fatal: the frame is skipped with a logged warning.
    fn render(&mut self) {
        let cfg = self.ctx.config.clone();
        let global = self.global.as_ref();
        let flocks = &self.flocks;
        let Some(sink) = self.frame_sink.as_mut() else { return };

        sink.blank();
        for flock in flocks.values() {
            let colour: Colour = if cfg.colour_mode {
                id_colour(flock.tids.sense_and_plan)
            } else {
                id_colour(flock.id.0)
            };
            for position in flock.positions(global) {
                let wrapped = to_window_space(position, cfg.window_x, cfg.window_y);
                sink.draw_solid_circle(wrapped, cfg.boid_radius, colour);
            }
            if cfg.render_flock_bounding_box {
                draw_bounding_box_outline(sink, &flock.bbox, Colour::WHITE);
            }
        }

        if let Err(e) = sink.export(Path::new(&cfg.output_dir)) {
            log::warn!("frame export failed: {e}");
        }
    }
}

fn draw_bounding_box_outline(sink: &mut PpmFrameSink, bbox: &crate::flock::bounding_box::BoundingBox, colour: Colour) {
    let top_right = Vec2::new(bbox.bottom_right.x, bbox.top_left.y);
    let bottom_left = Vec2::new(bbox.top_left.x, bbox.bottom_right.y);
    sink.draw_line(bbox.top_left, top_right, colour);
    sink.draw_line(top_right, bbox.bottom_right, colour);
    sink.draw_line(bbox.bottom_right, bottom_left, colour);
    sink.draw_line(bottom_left, bbox.top_left, colour);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    fn ctx(mut cfg: EngineConfig) -> EngineContext {
        cfg.track_tick_t = false;
        cfg.track_flock_sizes = false;
        EngineContext::new(cfg).unwrap()
    }

    fn base_config() -> EngineConfig {
        let mut cfg = EngineConfig::default();
        cfg.num_threads = 2;
        cfg.render = false;
        cfg
    }

    #[test]
    fn s1_static_singletons_have_no_migration() {
        let mut cfg = base_config();
        cfg.num_boids = 3;
        cfg.num_iters = 1;
        cfg.use_flocks = false;
        let mut sim = Simulator::new(ctx(cfg));
        sim.simulate();
        assert_eq!(sim.num_live_flocks(), 3);
        for (_, size) in sim.flock_sizes() {
            assert_eq!(size, 1);
        }
    }

    #[test]
    fn s4_mass_conservation_under_load() {
        let mut cfg = base_config();
        cfg.num_boids = 200;
        cfg.num_iters = 10;
        cfg.num_threads = 4;
        let mut sim = Simulator::new(ctx(cfg));
        for _ in 0..10 {
            sim.tick();
            let total: usize = sim.flock_sizes().iter().map(|(_, n)| n).sum();
            assert_eq!(total, 200);
        }
    }

    #[test]
    fn idempotent_empty_tick() {
        let mut cfg = base_config();
        cfg.num_boids = 0;
        let mut sim = Simulator::new(ctx(cfg));
        sim.tick();
        assert_eq!(sim.num_live_flocks(), 0);
    }

    #[test]
    fn s5_axis_equivalence_without_flocking() {
        let mut cfg = base_config();
        cfg.num_boids = 30;
        cfg.num_iters = 5;
        cfg.use_flocks = false;
        cfg.num_threads = 3;

        cfg.par_flocks = false;
        let mut per_boid = Simulator::with_seed(ctx(cfg.clone()), 7);
        per_boid.simulate();

        cfg.par_flocks = true;
        let mut per_flock = Simulator::with_seed(ctx(cfg), 7);
        per_flock.simulate();

        let mut a: Vec<_> = per_boid.flocks.values().flat_map(|f| f.positions(None)).collect();
        let mut b: Vec<_> = per_flock.flocks.values().flat_map(|f| f.positions(None)).collect();
        a.sort_by(|p, q| p.x.partial_cmp(&q.x).unwrap().then(p.y.partial_cmp(&q.y).unwrap()));
        b.sort_by(|p, q| p.x.partial_cmp(&q.x).unwrap().then(p.y.partial_cmp(&q.y).unwrap()));
        for (p, q) in a.iter().zip(b.iter()) {
            assert!(p.approx_eq(q, 1e-9), "{p:?} != {q:?}");
        }
    }

    #[test]
    fn soft_collision_conserves_mass_and_does_not_panic() {
        let mut cfg = base_config();
        cfg.num_boids = 60;
        cfg.num_iters = 10;
        cfg.soft_collision = true;
        cfg.boid_radius = 6.0;
        let mut sim = Simulator::new(ctx(cfg));
        sim.simulate();
        assert_eq!(sim.flock_sizes().iter().map(|(_, n)| n).sum::<usize>(), 60);
    }
}

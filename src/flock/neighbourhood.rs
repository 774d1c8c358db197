//! The two membership layouts a [`Flock`](super::Flock) can be built with.
//!
//! A naive port would keep a `Boid`<->`Flock` back-pointer; this design
//! eliminates cross-flock aliasing entirely instead. `Local` flocks own their boids
//! directly (`Vec<Boid>`), so two flocks can be mutated concurrently with no
//! shared state at all. `Global` flocks instead hold a set of ids into a
//! single [`GlobalBoidStore`] shared by every flock in the simulation; that
//! store wraps each boid (and each flock's id set) in its own lock so that
//! `AssignToFlock` can migrate a boid between two flocks without a single
//! simulation-wide mutex.

use crate::boid::Boid;
use crate::config::NeighbourhoodLayout;
use crate::ids::{BoidId, FlockId};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// A flock's membership container.
///
/// `Local` carries the boid records inline. `Global` carries nothing — the
/// actual id set lives in the [`GlobalBoidStore`] shared by the whole
/// simulation, keyed by this flock's id, so that migration can lock the
/// source and destination sets independently of which `Flock` happens to be
/// `&mut` at the time.
#[derive(Debug)]
pub enum Neighbourhood {
    Local(Vec<Boid>),
    Global,
}

impl Neighbourhood {
    pub fn new(layout: NeighbourhoodLayout) -> Self {
        match layout {
            NeighbourhoodLayout::Local => Neighbourhood::Local(Vec::new()),
            NeighbourhoodLayout::Global => Neighbourhood::Global,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Neighbourhood::Local(_))
    }

    /// Local members, for layouts that carry them inline. Calling this on a
    /// `Global` neighbourhood is a programmer error and panics.
    pub fn local_boids(&self) -> &[Boid] {
        match self {
            Neighbourhood::Local(boids) => boids,
            Neighbourhood::Global => panic!("local_boids called on a Global neighbourhood"),
        }
    }

    pub fn local_boids_mut(&mut self) -> &mut Vec<Boid> {
        match self {
            Neighbourhood::Local(boids) => boids,
            Neighbourhood::Global => panic!("local_boids_mut called on a Global neighbourhood"),
        }
    }

    /// Empties the local sequence. No-op for `Global`, whose membership
    /// lives in the shared store instead.
    pub fn clear_local(&mut self) {
        if let Neighbourhood::Local(boids) = self {
            boids.clear();
        }
    }

    /// Appends `records` to a `Local` neighbourhood directly. `Global`
    /// migration is handled by [`GlobalBoidStore::migrate`] instead, since it
    /// needs the source flock's id too.
    pub fn append_local(&mut self, records: &[Boid]) {
        match self {
            Neighbourhood::Local(boids) => boids.extend_from_slice(records),
            Neighbourhood::Global => panic!("append_local called on a Global neighbourhood"),
        }
    }
}

/// The single shared store backing every `Global`-layout flock.
///
/// `boids` is frozen in length after construction — a boid's index is its
/// `BoidId` for the lifetime of the simulation; positions in the sequence
/// never move. Each entry is individually locked so the whole-population
/// scan in sense-and-plan (read-only, safe to run unlocked in spirit but
/// still `Sync`-checked by the type system) and act's per-boid writes never
/// contend beyond the single entry involved.
///
/// `membership` holds one id set per flock, each behind its own `Mutex` —
/// a per-flock mutex rather than a single global one, so migrating a boid
/// between two flocks' sets only ever blocks those two flocks.
#[derive(Debug)]
pub struct GlobalBoidStore {
    boids: Vec<Mutex<Boid>>,
    membership: HashMap<FlockId, Mutex<HashSet<BoidId>>>,
}

impl GlobalBoidStore {
    /// Builds the store from the initial (singleton) boid population. Every
    /// boid starts in the flock named by its own `flock_id`.
    pub fn new(initial: Vec<Boid>) -> Self {
        let mut membership: HashMap<FlockId, Mutex<HashSet<BoidId>>> = HashMap::new();
        for boid in &initial {
            membership
                .entry(boid.flock_id)
                .or_insert_with(|| Mutex::new(HashSet::new()))
                .lock()
                .unwrap()
                .insert(boid.id);
        }
        let boids = initial.into_iter().map(Mutex::new).collect();
        GlobalBoidStore { boids, membership }
    }

    pub fn len(&self) -> usize {
        self.boids.len()
    }

    /// Registers a (normally empty) id set for a newly created flock, so
    /// later migrations into it have somewhere to land.
    pub fn register_flock(&mut self, id: FlockId) {
        self.membership.entry(id).or_insert_with(|| Mutex::new(HashSet::new()));
    }

    /// A read-only snapshot of every boid, in `BoidId` order. Used for the
    /// whole-population peer scan in the `ParallelBoids` axis: callers must
    /// take this snapshot before `Act` runs, so every boid senses the
    /// population as it stood at tick start rather than mid-update.
    pub fn snapshot(&self) -> Vec<Boid> {
        self.boids.iter().map(|cell| *cell.lock().unwrap()).collect()
    }

    pub fn get(&self, id: BoidId) -> Boid {
        *self.boids[id.0].lock().unwrap()
    }

    pub fn with_mut<R>(&self, id: BoidId, f: impl FnOnce(&mut Boid) -> R) -> R {
        let mut guard = self.boids[id.0].lock().unwrap();
        f(&mut guard)
    }

    pub fn member_ids(&self, flock: FlockId) -> Vec<BoidId> {
        self.membership[&flock].lock().unwrap().iter().copied().collect()
    }

    pub fn size_of(&self, flock: FlockId) -> usize {
        self.membership[&flock].lock().unwrap().len()
    }

    /// Moves `boid_id` from `source`'s id set into `dest`'s id set and
    /// updates the boid's `flock_id`, locking the two flocks' sets in
    /// ascending `FlockId` order to avoid the classic lock-order deadlock.
    ///
    /// A no-op (but still flock_id-consistent) when `source == dest`: a
    /// boid that stays in its own flock is still routed through here because
    /// `Flock::delegate` always buckets every boid, including stayers, into
    /// an emigrants entry.
    pub fn migrate(&self, boid_id: BoidId, source: FlockId, dest: FlockId) {
        self.with_mut(boid_id, |b| b.flock_id = dest);
        if source == dest {
            // still make sure the id is present; construction already put it there.
            self.membership[&dest].lock().unwrap().insert(boid_id);
            return;
        }
        let (first, second) = if source.0 < dest.0 { (source, dest) } else { (dest, source) };
        let mut first_set = self.membership[&first].lock().unwrap();
        let mut second_set = self.membership[&second].lock().unwrap();
        let (source_set, dest_set) = if first == source {
            (&mut *first_set, &mut *second_set)
        } else {
            (&mut *second_set, &mut *first_set)
        };
        source_set.remove(&boid_id);
        dest_set.insert(boid_id);
    }

    pub fn remove_flock(&mut self, id: FlockId) {
        self.membership.remove(&id);
    }
}

//! # Tracer Module
//!
//! Records per-tick timings, per-tick average flock sizes, and an inter-flock
//! communication matrix, then projects the latter onto a per-thread matrix at
//! the end of every tick. Counters use `AtomicU64`, generalized from a single
//! flag to a bank of counters, so `add_read` is callable concurrently from
//! every worker with no lock.
//!
//! Rather than a process-wide singleton, the `Tracer` here is owned by the
//! `Simulator` and passed by reference — there is no `Tracer::instance()`,
//! so two simulators in the same process (as happens routinely in the test
//! suite) never share counters.

use crate::ids::FlockId;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// The three flock-level phases that record a `ThreadID` and are tracked by
/// the communication matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceOp {
    SenseAndPlan,
    Delegate,
    AssignToFlock,
}

const NUM_OPS: usize = 3;

fn op_index(op: TraceOp) -> usize {
    match op {
        TraceOp::SenseAndPlan => 0,
        TraceOp::Delegate => 1,
        TraceOp::AssignToFlock => 2,
    }
}

/// A flat `num_flocks x num_flocks` matrix of atomic counters, one per
/// [`TraceOp`] kind. Indexed by `FlockId`, which is dense in `[0, num_flocks)`
/// only at construction time — flocks that die and are removed by `CleanUp`
/// leave their row/column unused for the rest of the run, which is harmless.
struct FlockMatrix {
    num_flocks: usize,
    cells: [Vec<AtomicU64>; NUM_OPS],
}

impl FlockMatrix {
    fn new(num_flocks: usize) -> Self {
        let make = || (0..num_flocks * num_flocks).map(|_| AtomicU64::new(0)).collect();
        FlockMatrix {
            num_flocks,
            cells: [make(), make(), make()],
        }
    }

    fn index(&self, requester: FlockId, holder: FlockId) -> usize {
        requester.0 * self.num_flocks + holder.0
    }

    fn add(&self, requester: FlockId, holder: FlockId, op: TraceOp) {
        let idx = self.index(requester, holder);
        self.cells[op_index(op)][idx].fetch_add(1, Ordering::Relaxed);
    }

    /// Reads and resets every cell for `op`, returning `(requester, holder, count)`
    /// triples for non-zero cells only.
    fn drain(&self, op: TraceOp) -> Vec<(FlockId, FlockId, u64)> {
        let mut out = Vec::new();
        for requester in 0..self.num_flocks {
            for holder in 0..self.num_flocks {
                let idx = requester * self.num_flocks + holder;
                let count = self.cells[op_index(op)][idx].swap(0, Ordering::Relaxed);
                if count > 0 {
                    out.push((FlockId(requester), FlockId(holder), count));
                }
            }
        }
        out
    }
}

/// Per-tick timing, flock-size, and inter-worker communication telemetry.
///
/// When constructed with `enabled: false` every recording method is a no-op,
/// so tracing can be switched off without branching at every call site.
pub struct Tracer {
    enabled: bool,
    num_threads: usize,
    flock_matrix: FlockMatrix,
    thread_matrix: Mutex<Vec<u64>>,
    tick_times: Mutex<Vec<f64>>,
    flock_size_avgs: Mutex<Vec<f64>>,
}

impl Tracer {
    pub fn new(num_flocks: usize, num_threads: usize, enabled: bool) -> Self {
        let num_threads = num_threads.max(1);
        Tracer {
            enabled,
            num_threads,
            flock_matrix: FlockMatrix::new(num_flocks),
            thread_matrix: Mutex::new(vec![0; num_threads * num_threads]),
            tick_times: Mutex::new(Vec::new()),
            flock_size_avgs: Mutex::new(Vec::new()),
        }
    }

    /// Records one logical read of `holder`'s state by `requester` during
    /// phase `op`. Safe to call concurrently from any worker.
    pub fn add_read(&self, requester: FlockId, holder: FlockId, op: TraceOp) {
        if !self.enabled {
            return;
        }
        self.flock_matrix.add(requester, holder, op);
    }

    /// Projects the per-flock communication matrix onto the per-thread
    /// matrix using each flock's recorded `ThreadID` slots, then resets the
    /// per-flock matrix to zero. Must run single-threaded — it takes the
    /// thread-matrix lock only to satisfy `Sync`, not for real contention.
    ///
    /// `thread_id_of` maps a flock id and a phase to the worker thread that
    /// executed that phase for that flock in the last tick.
    pub fn save_flock_matrix(&self, thread_id_of: impl Fn(FlockId, TraceOp) -> usize) {
        if !self.enabled {
            return;
        }
        let mut thread_matrix = self.thread_matrix.lock().unwrap();
        for &op in &[TraceOp::SenseAndPlan, TraceOp::Delegate, TraceOp::AssignToFlock] {
            for (requester, holder, count) in self.flock_matrix.drain(op) {
                let requester_thread = thread_id_of(requester, op) % self.num_threads;
                let holder_thread = thread_id_of(holder, op) % self.num_threads;
                let idx = requester_thread * self.num_threads + holder_thread;
                thread_matrix[idx] += count;
            }
        }
    }

    pub fn add_tick_time(&self, seconds: f64) {
        if !self.enabled {
            return;
        }
        self.tick_times.lock().unwrap().push(seconds);
    }

    pub fn add_flock_size(&self, average_size: f64) {
        if !self.enabled {
            return;
        }
        self.flock_size_avgs.lock().unwrap().push(average_size);
    }

    /// Computes the mean of the recorded per-tick average flock sizes.
    /// Returns `0.0` if nothing has been recorded yet.
    pub fn compute_flock_average_size(&self) -> f64 {
        let sizes = self.flock_size_avgs.lock().unwrap();
        if sizes.is_empty() {
            0.0
        } else {
            sizes.iter().sum::<f64>() / sizes.len() as f64
        }
    }

    /// Writes the thread communication matrix (one row per line), the
    /// per-tick elapsed seconds, and the per-tick average flock sizes to
    /// `out`, in that order.
    pub fn dump(&self, out: &mut impl std::io::Write) -> std::io::Result<()> {
        let thread_matrix = self.thread_matrix.lock().unwrap();
        for row in thread_matrix.chunks(self.num_threads) {
            let cells: Vec<String> = row.iter().map(|c| c.to_string()).collect();
            writeln!(out, "{{ {} }}", cells.join(" "))?;
        }
        let tick_times = self.tick_times.lock().unwrap();
        writeln!(
            out,
            "{}",
            tick_times.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(" ")
        )?;
        let flock_sizes = self.flock_size_avgs.lock().unwrap();
        writeln!(
            out,
            "{}",
            flock_sizes.iter().map(|s| s.to_string()).collect::<Vec<_>>().join(" ")
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_tracer_ignores_all_recordings() {
        let tracer = Tracer::new(2, 2, false);
        tracer.add_read(FlockId(0), FlockId(1), TraceOp::SenseAndPlan);
        tracer.add_tick_time(1.0);
        tracer.save_flock_matrix(|_, _| 0);
        let mut buf = Vec::new();
        tracer.dump(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("{ 0 0 }"));
    }

    #[test]
    fn add_read_is_concurrency_safe_and_projects_to_thread_matrix() {
        let tracer = Tracer::new(2, 2, true);
        for _ in 0..5 {
            tracer.add_read(FlockId(0), FlockId(1), TraceOp::SenseAndPlan);
        }
        // flock 0 ran on thread 0, flock 1 ran on thread 1
        tracer.save_flock_matrix(|flock, _| flock.0);
        let mut buf = Vec::new();
        tracer.dump(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let first_line = text.lines().next().unwrap();
        assert_eq!(first_line, "{ 0 5 }");
    }

    #[test]
    fn projection_identity_matches_invariant_8() {
        let tracer = Tracer::new(3, 2, true);
        tracer.add_read(FlockId(0), FlockId(1), TraceOp::SenseAndPlan);
        tracer.add_read(FlockId(1), FlockId(2), TraceOp::Delegate);
        tracer.add_read(FlockId(2), FlockId(0), TraceOp::AssignToFlock);
        tracer.save_flock_matrix(|flock, _| flock.0 % 2);
        let sum: u64 = tracer.thread_matrix.lock().unwrap().iter().sum();
        assert_eq!(sum, 3);
    }

    #[test]
    fn compute_flock_average_size_averages_recorded_ticks() {
        let tracer = Tracer::new(1, 1, true);
        tracer.add_flock_size(2.0);
        tracer.add_flock_size(4.0);
        assert_eq!(tracer.compute_flock_average_size(), 3.0);
    }
}

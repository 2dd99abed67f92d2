//! Execution context threaded through a single solve call.

use std::fmt;
use std::time::{Duration, Instant};

/// Stages of a solve call, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Validated,
    MatrixBuilt,
    Formulated,
    ConstructedInitial,
    Improving,
    Finalized,
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Validated => "validated",
            Phase::MatrixBuilt => "matrix built",
            Phase::Formulated => "formulated",
            Phase::ConstructedInitial => "constructed initial",
            Phase::Improving => "improving",
            Phase::Finalized => "finalized",
            Phase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Instrumentation hooks invoked during a solve. All methods default to no-ops.
pub trait SearchObserver {
    /// The solve entered a new phase.
    fn on_phase(&mut self, _phase: Phase) {}

    /// A new incumbent was found.
    fn on_new_best(&mut self, _iteration: u64, _distance: i64, _unassigned: usize) {}

    /// The guided search reached a local optimum and is about to penalize it.
    fn on_local_optimum(&mut self, _count: u64, _distance: i64) {}
}

/// Deadline and hooks for one solve call.
pub struct SolveContext<'a> {
    started: Instant,
    deadline: Instant,
    observer: Option<&'a mut dyn SearchObserver>,
}

impl<'a> SolveContext<'a> {
    /// A context whose deadline is `time_limit` from now.
    pub fn new(time_limit: Duration) -> Self {
        let started = Instant::now();
        SolveContext {
            started,
            deadline: started + time_limit,
            observer: None,
        }
    }

    /// Attach an observer.
    pub fn with_observer(mut self, observer: &'a mut dyn SearchObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Whether the deadline has passed.
    pub fn expired(&self) -> bool {
        Instant::now() >= self.deadline
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub(crate) fn enter(&mut self, phase: Phase) {
        if let Some(observer) = self.observer.as_deref_mut() {
            observer.on_phase(phase);
        }
    }

    pub(crate) fn new_best(&mut self, iteration: u64, distance: i64, unassigned: usize) {
        if let Some(observer) = self.observer.as_deref_mut() {
            observer.on_new_best(iteration, distance, unassigned);
        }
    }

    pub(crate) fn local_optimum(&mut self, count: u64, distance: i64) {
        if let Some(observer) = self.observer.as_deref_mut() {
            observer.on_local_optimum(count, distance);
        }
    }
}

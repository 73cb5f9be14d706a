use log::trace;
use std::fmt::Debug;

/// Timer-driven behaviours of a car, in the order they run when due at the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TaskKind {
    Homing,
    Door,
    Motion,
}

#[derive(Debug, Clone)]
struct Pending<S> {
    run: S,
    wake_at: u64,
    delay: u64,
}

/**
 * Slot holding the in-flight run of one task kind.
 *
 * A task is keyed by the tuple of car fields it was started with. When the key
 * changes the slot is restarted: the old run is dropped and the generation is
 * bumped, so a run that was taken out for stepping before the restart is
 * refused when it tries to come back.
 */
#[derive(Debug, Clone)]
pub struct TaskSlot<K, S> {
    kind: TaskKind,
    key: Option<K>,
    pending: Option<Pending<S>>,
    generation: u64,
}

/// A run taken out of its slot to be stepped.
#[derive(Debug)]
pub struct DueRun<S> {
    pub run: S,
    pub generation: u64,
    pub elapsed_ms: u64,
}

impl<K: PartialEq + Debug, S> TaskSlot<K, S> {
    pub fn new(kind: TaskKind) -> TaskSlot<K, S> {
        TaskSlot {
            kind,
            key: None,
            pending: None,
            generation: 0,
        }
    }

    pub fn is_stale(&self, key: &K) -> bool {
        self.key.as_ref() != Some(key)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn run(&self) -> Option<&S> {
        self.pending.as_ref().map(|pending| &pending.run)
    }

    pub fn wake_at(&self) -> Option<u64> {
        self.pending.as_ref().map(|pending| pending.wake_at)
    }

    /// Cancels the current run and starts `run` (if any), first waking `delay` ms after `now`.
    pub fn restart(&mut self, key: K, run: Option<(S, u64)>, now: u64) {
        self.generation += 1;
        trace!(
            "{:?} task restarted with {:?} (generation {}, running: {})",
            self.kind,
            key,
            self.generation,
            run.is_some()
        );
        self.key = Some(key);
        self.pending = run.map(|(run, delay)| Pending {
            run,
            wake_at: now + delay,
            delay,
        });
    }

    /// Takes the run out of the slot if it is due at `now`.
    pub fn take_due(&mut self, now: u64) -> Option<DueRun<S>> {
        match self.pending.take() {
            Some(pending) if pending.wake_at <= now => Some(DueRun {
                run: pending.run,
                generation: self.generation,
                elapsed_ms: pending.delay,
            }),
            other => {
                self.pending = other;
                None
            }
        }
    }

    /// Puts a stepped run back, to wake again after `next_delay` ms. A run from an
    /// earlier generation is discarded. Returns whether the run was accepted.
    pub fn resume(&mut self, due: DueRun<S>, now: u64, next_delay: Option<u64>) -> bool {
        if due.generation != self.generation {
            trace!(
                "{:?} task discarded stale run of generation {} (current {})",
                self.kind,
                due.generation,
                self.generation
            );
            return false;
        }
        self.pending = next_delay.map(|delay| Pending {
            run: due.run,
            wake_at: now + delay,
            delay,
        });
        true
    }
}

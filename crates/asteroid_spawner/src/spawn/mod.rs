//! Spawn timing: the Poisson scheduler and the despawn sweeper, plus startup plumbing.
pub mod events;
pub mod readiness;
pub mod scheduler;
pub mod setup;
pub mod sweeper;

pub use scheduler::{SpawnScheduler, TickReport};
pub use sweeper::sweep;

/// When the scheduler fires next.
///
/// A process with zero total rate never fires; that is [`NextEvent::Never`] rather
/// than an infinite timestamp.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NextEvent {
    /// Absolute simulation time of the next event.
    At(f64),
    Never,
}

impl NextEvent {
    /// Whether the event is strictly in the past at `now`.
    pub fn is_due(&self, now: f64) -> bool {
        match self {
            NextEvent::At(t) => now > *t,
            NextEvent::Never => false,
        }
    }

    pub fn time(&self) -> Option<f64> {
        match self {
            NextEvent::At(t) => Some(*t),
            NextEvent::Never => None,
        }
    }

    /// `at + wait`, or [`NextEvent::Never`] if there is no wait.
    pub fn after(at: f64, wait: Option<f64>) -> Self {
        match wait {
            Some(w) => NextEvent::At(at + w),
            None => NextEvent::Never,
        }
    }
}

/// Scheduler state that survives a save/load cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnState {
    pub next_event: NextEvent,
    /// Custom scheduling flag as last observed at load or construction.
    pub was_enabled: bool,
}

/// Observable phase of the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerPhase {
    /// Custom scheduling is off, or no event will ever fire.
    Idle,
    /// Waiting for the next event.
    Armed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_is_never_due() {
        assert!(!NextEvent::Never.is_due(f64::MAX));
        assert!(NextEvent::At(1.0).is_due(1.5));
        assert!(!NextEvent::At(1.0).is_due(1.0));
    }

    #[test]
    fn after_without_wait_is_never() {
        assert_eq!(NextEvent::after(5.0, None), NextEvent::Never);
        assert_eq!(NextEvent::after(5.0, Some(2.0)), NextEvent::At(7.0));
    }
}

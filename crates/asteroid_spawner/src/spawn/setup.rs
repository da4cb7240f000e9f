//! One-time adjustment of the host's stock spawner.
//!
//! The stock spawner is created by the host some frames after startup, and a stale
//! instance from a previous scene may still be around for a while. The host's locate
//! function returns `None` until the fresh instance is in place; [`SpawnerSetup`] keeps
//! polling it through a [`ReadinessGate`] and applies the settings once.
use tracing::{info, warn};

use crate::host::{FeatureFlags, HostSpawnerControl};
use crate::spawn::readiness::{Readiness, ReadinessGate, ReadinessPolicy};

/// Progress of a [`SpawnerSetup`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetupStatus {
    /// The stock spawner has not been found yet.
    Waiting,
    /// Settings were applied.
    Applied,
    /// The stock spawner never showed up. The host keeps its own settings.
    TimedOut,
}

#[derive(Clone, Debug)]
pub struct SpawnerSetup {
    gate: ReadinessGate,
    status: SetupStatus,
}

impl SpawnerSetup {
    pub fn new(policy: ReadinessPolicy) -> Self {
        Self {
            gate: ReadinessGate::new(policy),
            status: SetupStatus::Waiting,
        }
    }

    pub fn status(&self) -> SetupStatus {
        self.status
    }

    /// Probes made by the underlying gate.
    pub fn attempts(&self) -> u32 {
        self.gate.attempts()
    }

    /// Called once per host frame until it returns something other than
    /// [`SetupStatus::Waiting`].
    ///
    /// Applies the untracked lifetime range and, with custom scheduling on, stops the
    /// host from spawning on its own. The host's cleanup cadence is left alone; it is
    /// what fades old objects.
    pub fn poll<'c, C>(
        &mut self,
        flags: &dyn FeatureFlags,
        locate: impl FnOnce() -> Option<&'c mut C>,
    ) -> SetupStatus
    where
        C: HostSpawnerControl + ?Sized + 'c,
    {
        if self.status != SetupStatus::Waiting {
            return self.status;
        }

        self.status = match self.gate.poll(locate) {
            Readiness::Ready(spawner) => {
                apply(flags, spawner);
                SetupStatus::Applied
            }
            Readiness::Pending => SetupStatus::Waiting,
            Readiness::TimedOut => {
                warn!(
                    "Stock spawner not found after {} probe(s); leaving it unchanged.",
                    self.gate.attempts()
                );
                SetupStatus::TimedOut
            }
        };
        self.status
    }
}

impl Default for SpawnerSetup {
    fn default() -> Self {
        Self::new(ReadinessPolicy::default())
    }
}

/// Applies `flags` to the host spawner immediately.
pub fn apply<C>(flags: &dyn FeatureFlags, spawner: &mut C)
where
    C: HostSpawnerControl + ?Sized,
{
    let (min, max) = flags.untracked_lifetime_range();
    spawner.set_untracked_lifetime(min, max);
    info!("Untracked lifetime set to {}..{} days.", min, max);

    if flags.custom_scheduling_enabled() {
        spawner.suppress_spontaneous_spawns();
        info!("Stock spawner no longer spawns on its own.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::SpawnerOptions;

    #[derive(Debug, Default, PartialEq)]
    struct StockSpawner {
        lifetime: Option<(f64, f64)>,
        suppressed: bool,
    }

    impl HostSpawnerControl for StockSpawner {
        fn set_untracked_lifetime(&mut self, min: f64, max: f64) {
            self.lifetime = Some((min, max));
        }

        fn suppress_spontaneous_spawns(&mut self) {
            self.suppressed = true;
        }
    }

    #[test]
    fn applies_lifetime_and_suppression_when_custom_scheduling_is_on() {
        let flags = SpawnerOptions::new().with_untracked_lifetime(2.0, 8.0);
        let mut stock = StockSpawner::default();
        let mut setup = SpawnerSetup::default();

        assert_eq!(setup.poll(&flags, || Some(&mut stock)), SetupStatus::Applied);
        assert_eq!(stock.lifetime, Some((2.0, 8.0)));
        assert!(stock.suppressed);
    }

    #[test]
    fn leaves_stock_spawning_alone_when_custom_scheduling_is_off() {
        let flags = SpawnerOptions::new().with_custom_scheduling(false);
        let mut stock = StockSpawner::default();
        apply(&flags, &mut stock);
        assert_eq!(stock.lifetime, Some((1.0, 20.0)));
        assert!(!stock.suppressed);
    }

    #[test]
    fn waits_for_the_spawner_then_applies_once() {
        let flags = SpawnerOptions::new();
        let mut stock = StockSpawner::default();
        let mut setup = SpawnerSetup::new(ReadinessPolicy::new(10, 1, 1));

        assert_eq!(
            setup.poll(&flags, || None::<&mut StockSpawner>),
            SetupStatus::Waiting
        );
        // Backoff frame: not probed.
        assert_eq!(
            setup.poll(&flags, || Some(&mut stock)),
            SetupStatus::Waiting
        );
        assert_eq!(stock, StockSpawner::default());

        assert_eq!(setup.poll(&flags, || Some(&mut stock)), SetupStatus::Applied);
        assert_eq!(setup.attempts(), 2);

        // Later polls do not touch the spawner again.
        stock.suppressed = false;
        assert_eq!(setup.poll(&flags, || Some(&mut stock)), SetupStatus::Applied);
        assert!(!stock.suppressed);
    }

    #[test]
    fn times_out_without_touching_anything() {
        let flags = SpawnerOptions::new();
        let mut setup = SpawnerSetup::new(ReadinessPolicy::new(2, 1, 1));

        let mut last = SetupStatus::Waiting;
        for _ in 0..5 {
            last = setup.poll(&flags, || None::<&mut StockSpawner>);
        }
        assert_eq!(last, SetupStatus::TimedOut);
        assert_eq!(setup.status(), SetupStatus::TimedOut);
    }
}

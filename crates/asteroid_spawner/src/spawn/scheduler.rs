//! Poisson-process spawn scheduler.
//!
//! Spawns are modelled as a Poisson process whose rate is the sum of the custom
//! populations' rates. Inter-arrival times are exponential and memoryless, so a freshly
//! constructed scheduler can draw its first wait from "now" without knowing how long
//! ago the last object appeared.
//!
//! The only persisted state is [`SpawnState`]. On every tick where the current time has
//! passed [`SpawnState::next_event`], the scheduler first sweeps expired objects and
//! then emits every event that fell inside the elapsed interval, which may be many
//! after a large time jump.
use rand::Rng;
use tracing::{debug, info, warn};

use crate::host::{Clock, FeatureFlags, HostContext, ObjectId, PersistenceStore};
use crate::persistence::{
    PersistedRecord, PersistedSpawnState, FIELD_ENABLED, FIELD_NEXT_EVENT_TIME, SPAWN_STATE_KEY,
};
use crate::population::Registry;
use crate::sampling::{draw, exponential, total_rate};
use crate::spawn::events::{EventSink, SpawnEvent};
use crate::spawn::{sweep, NextEvent, SchedulerPhase, SpawnState};

/// Draws the time until the next spawn, in simulated seconds.
///
/// `total_rate` is in events per `rate_time_unit` seconds. Returns `None` if the rate is
/// not positive: nothing will ever spawn.
pub fn wait_for_next_event(
    total_rate: f64,
    rate_time_unit: f64,
    rng: &mut dyn Rng,
) -> Option<f64> {
    if total_rate <= 0.0 || !rate_time_unit.is_finite() || rate_time_unit <= 0.0 {
        return None;
    }
    exponential(total_rate / rate_time_unit, rng)
}

/// Outcome of one [`SpawnScheduler::tick`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Spawns handed to the host.
    pub spawned: usize,
    /// Due events that produced no spawn because no population was eligible.
    pub skipped: usize,
    /// Objects removed by the sweep that precedes spawning.
    pub despawned: Vec<ObjectId>,
}

impl TickReport {
    /// Number of scheduled events consumed by the tick.
    pub fn events_fired(&self) -> usize {
        self.spawned + self.skipped
    }
}

#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    state: SpawnState,
    phase: SchedulerPhase,
}

impl SpawnScheduler {
    /// Creates a scheduler with no saved state: the first event is one exponential wait
    /// after `now`.
    pub fn new(
        now: f64,
        registry: &Registry,
        flags: &dyn FeatureFlags,
        rng: &mut dyn Rng,
    ) -> Self {
        let wait = wait_for_next_event(total_rate(registry), flags.rate_time_unit(), rng);
        let state = SpawnState {
            next_event: NextEvent::after(now, wait),
            was_enabled: flags.custom_scheduling_enabled(),
        };
        Self {
            phase: resting_phase(&state, flags),
            state,
        }
    }

    /// Restores a scheduler from a saved record.
    ///
    /// Fields that are absent or malformed keep their construction defaults. If custom
    /// scheduling was switched on since the save, the saved timer is discarded so that
    /// the backlog accumulated while it was off does not fire at once.
    pub fn load(
        record: Option<&PersistedRecord>,
        now: f64,
        registry: &Registry,
        flags: &dyn FeatureFlags,
        rng: &mut dyn Rng,
        sink: &mut dyn EventSink,
    ) -> Self {
        let persisted = match record {
            Some(record) => {
                let persisted = PersistedSpawnState::from_record(record);
                for (field, recovered) in [
                    (FIELD_NEXT_EVENT_TIME, persisted.next_event.is_some()),
                    (FIELD_ENABLED, persisted.was_enabled.is_some()),
                ] {
                    if let (Some(raw), false) = (record.get(field), recovered) {
                        sink.send(SpawnEvent::Warning {
                            context: format!("{SPAWN_STATE_KEY}.{field}"),
                            message: format!("malformed value '{raw}' replaced by default"),
                        });
                    }
                }
                persisted
            }
            None => {
                debug!("No saved spawn state; starting a fresh timer.");
                PersistedSpawnState::default()
            }
        };

        let enabled = flags.custom_scheduling_enabled();
        // Construction defaults are drawn only for fields the record does not supply.
        let mut state = SpawnState {
            next_event: match persisted.next_event {
                Some(next_event) => next_event,
                None => {
                    let wait =
                        wait_for_next_event(total_rate(registry), flags.rate_time_unit(), rng);
                    NextEvent::after(now, wait)
                }
            },
            was_enabled: persisted.was_enabled.unwrap_or(enabled),
        };

        if !state.was_enabled && enabled {
            info!("Custom scheduling was switched on; clearing the spawn queue.");
            let previous = state.next_event;
            let wait = wait_for_next_event(total_rate(registry), flags.rate_time_unit(), rng);
            state.next_event = NextEvent::after(now, wait);
            sink.send(SpawnEvent::TimerReset {
                previous,
                next: state.next_event,
            });
        }
        state.was_enabled = enabled;
        Self {
            phase: resting_phase(&state, flags),
            state,
        }
    }

    /// [`SpawnScheduler::load`] reading the record from `store`.
    pub fn load_from(
        store: &dyn PersistenceStore,
        now: f64,
        registry: &Registry,
        flags: &dyn FeatureFlags,
        rng: &mut dyn Rng,
        sink: &mut dyn EventSink,
    ) -> Self {
        let record = store.read(SPAWN_STATE_KEY);
        Self::load(record.as_ref(), now, registry, flags, rng, sink)
    }

    pub fn save(&self) -> SpawnState {
        self.state
    }

    pub fn save_to(&self, store: &mut dyn PersistenceStore) {
        store.write(SPAWN_STATE_KEY, self.state.to_record());
    }

    pub fn state(&self) -> &SpawnState {
        &self.state
    }

    pub fn next_event(&self) -> NextEvent {
        self.state.next_event
    }

    pub fn phase(&self) -> SchedulerPhase {
        self.phase
    }

    /// Advances the scheduler to `now`.
    ///
    /// Does nothing while custom scheduling is off or the host cannot spawn. Otherwise,
    /// if the next event is due, sweeps expired objects and then fires every event
    /// scheduled before `now`, drawing a population for each.
    pub fn tick<R: Rng>(
        &mut self,
        now: f64,
        registry: &Registry,
        host: &mut HostContext<'_>,
        rng: &mut R,
        sink: &mut dyn EventSink,
    ) -> TickReport {
        let mut report = TickReport::default();

        if !host.flags.custom_scheduling_enabled() {
            self.phase = SchedulerPhase::Idle;
            return report;
        }
        if !host.spawner.is_available() {
            debug!("Host spawner unavailable; holding the spawn timer.");
            return report;
        }
        if !self.state.next_event.is_due(now) {
            self.phase = resting_phase(&self.state, host.flags);
            return report;
        }

        // The host's own cleanup may not have run during a time jump.
        report.despawned = sweep(now, &mut *host.objects, sink);

        let total = total_rate(registry);
        let unit = host.flags.rate_time_unit();
        let mut absorbed = false;

        while let NextEvent::At(scheduled_at) = self.state.next_event {
            if now <= scheduled_at {
                break;
            }

            match draw(registry, &mut *rng) {
                Ok(population) => {
                    info!(
                        "Spawning '{}' object scheduled at {}.",
                        population.name(),
                        scheduled_at
                    );
                    host.spawner.spawn_one(population);
                    sink.send(SpawnEvent::SpawnTriggered {
                        scheduled_at,
                        population: population.name().to_owned(),
                        is_default: population.is_default(),
                    });
                    report.spawned += 1;
                }
                Err(e) => {
                    warn!("No object spawned for event at {}: {}.", scheduled_at, e);
                    sink.send(SpawnEvent::SpawnSkipped {
                        scheduled_at,
                        reason: e.to_string(),
                    });
                    report.skipped += 1;
                }
            }

            let wait = wait_for_next_event(total, unit, &mut *rng);
            self.state.next_event = match NextEvent::after(scheduled_at, wait) {
                // A wait below the float spacing at `scheduled_at` is absorbed.
                NextEvent::At(t) if t <= scheduled_at => {
                    if !absorbed {
                        warn!(
                            "Spawn wait {:?} is below float resolution at {}; stepping one ulp.",
                            wait, scheduled_at
                        );
                        absorbed = true;
                    }
                    NextEvent::At(scheduled_at.next_up())
                }
                next => next,
            };
        }

        self.phase = resting_phase(&self.state, host.flags);
        report
    }

    /// [`SpawnScheduler::tick`] at the time reported by `clock`.
    pub fn update<R: Rng>(
        &mut self,
        clock: &dyn Clock,
        registry: &Registry,
        host: &mut HostContext<'_>,
        rng: &mut R,
        sink: &mut dyn EventSink,
    ) -> TickReport {
        self.tick(clock.now(), registry, host, rng, sink)
    }
}

fn resting_phase(state: &SpawnState, flags: &dyn FeatureFlags) -> SchedulerPhase {
    match state.next_event {
        NextEvent::At(_) if flags.custom_scheduling_enabled() => SchedulerPhase::Armed,
        _ => SchedulerPhase::Idle,
    }
}

#![forbid(unsafe_code)]
//! asteroid_spawner: Poisson-process scheduling of procedurally spawned objects.
//!
//! Modules:
//! - population: declarative population entries, the registry, and hot reload
//! - sampling: rate-weighted population draws and exponential waiting times
//! - spawn: the scheduler, the despawn sweeper, events, and startup setup of the host spawner
//! - host: traits through which the host simulation is reached
//! - persistence: save-game records for scheduler state
//! - options: spawner options and feature flags
//!
//! The crate never touches global state. Everything the scheduler needs from the host is
//! passed in explicitly on each call.
pub mod error;
pub mod host;
pub mod options;
pub mod persistence;
pub mod population;
pub mod sampling;
pub mod spawn;

/// Convenient re-exports for common types. Import with `use asteroid_spawner::prelude::*;`.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::host::{
        Clock, ConfigSource, DiscoveryState, FeatureFlags, HostContext, HostSpawnerControl,
        ObjectId, PersistenceStore, SpawnSink, TrackedObject, TrackedObjectSource,
    };
    pub use crate::options::{SpawnerOptions, SECONDS_PER_DAY};
    pub use crate::persistence::{MemoryStore, PersistedRecord, SPAWN_STATE_KEY};
    #[cfg(feature = "ron")]
    pub use crate::population::entry::RonConfigSource;
    pub use crate::population::{
        ConfigEntry, DefaultPopulation, EntryKind, PopulationRecord, PopulationRef, Registry,
        RegistryHandle,
    };
    pub use crate::sampling::{draw, exponential, total_rate};
    pub use crate::spawn::events::{EventSink, FnSink, MultiSink, SpawnEvent, VecSink};
    pub use crate::spawn::readiness::{Readiness, ReadinessGate, ReadinessPolicy};
    pub use crate::spawn::scheduler::wait_for_next_event;
    pub use crate::spawn::setup::{SetupStatus, SpawnerSetup};
    pub use crate::spawn::{sweep, NextEvent, SchedulerPhase, SpawnScheduler, SpawnState, TickReport};
}

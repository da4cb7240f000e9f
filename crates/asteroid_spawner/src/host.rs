//! Interfaces to the host simulation.
//!
//! The scheduler never reaches into global state: everything it needs from the host is
//! passed in through these traits.
use std::fmt;

use crate::error::Result;
use crate::options::SECONDS_PER_DAY;
use crate::persistence::PersistedRecord;
use crate::population::{ConfigEntry, PopulationRef};

/// Host simulation clock, in simulated seconds.
///
/// Monotonic within a session but free to jump forward by arbitrary amounts.
pub trait Clock {
    fn now(&self) -> f64;
}

impl<F> Clock for F
where
    F: Fn() -> f64,
{
    fn now(&self) -> f64 {
        self()
    }
}

/// Supplies the declarative entries a [`crate::population::Registry`] is built from.
pub trait ConfigSource {
    fn entries(&self) -> Result<Vec<ConfigEntry>>;
}

/// Creates world objects on behalf of the scheduler.
pub trait SpawnSink {
    fn spawn_one(&mut self, population: PopulationRef<'_>);

    /// Whether the host side is currently able to spawn. While this is false the
    /// scheduler holds its timer.
    fn is_available(&self) -> bool {
        true
    }
}

/// Identifier of a host object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What the player knows about an object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiscoveryState {
    /// Seen, but without a recorded trajectory.
    Undiscovered,
    /// A trajectory has been recorded at some point.
    Discovered,
    /// Not subject to discovery at all (ordinary craft).
    NotDiscoverable,
}

/// A live host object as seen by the despawn sweeper.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackedObject {
    pub id: ObjectId,
    pub name: String,
    pub discovery: DiscoveryState,
    /// Simulated time after which an undiscovered object should fade.
    pub fade_deadline: f64,
}

impl TrackedObject {
    pub fn new(
        id: ObjectId,
        name: impl Into<String>,
        discovery: DiscoveryState,
        fade_deadline: f64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            discovery,
            fade_deadline,
        }
    }

    pub fn is_expired(&self, now: f64) -> bool {
        self.discovery == DiscoveryState::Undiscovered && now > self.fade_deadline
    }
}

/// Enumerates and removes live host objects.
pub trait TrackedObjectSource {
    fn tracked_objects(&self) -> Vec<TrackedObject>;
    fn remove(&mut self, id: ObjectId);
}

/// Named key/value records nested in the host's save document.
pub trait PersistenceStore {
    fn read(&self, key: &str) -> Option<PersistedRecord>;
    fn write(&mut self, key: &str, record: PersistedRecord);
}

/// Player-facing switches that shape spawning.
pub trait FeatureFlags {
    /// Whether this crate, rather than the host, decides when objects appear.
    fn custom_scheduling_enabled(&self) -> bool;
    /// Lifetime range `(min, max)` the host applies to untracked objects.
    fn untracked_lifetime_range(&self) -> (f64, f64);
    /// Simulated seconds covered by one unit of spawn rate.
    fn rate_time_unit(&self) -> f64 {
        SECONDS_PER_DAY
    }
}

/// The host's own spawner, adjusted once at startup.
pub trait HostSpawnerControl {
    fn set_untracked_lifetime(&mut self, min: f64, max: f64);
    /// Stops spontaneous spawning without disabling the host's periodic cleanup.
    fn suppress_spontaneous_spawns(&mut self);
}

/// Mutable host collaborators borrowed for the duration of one tick.
pub struct HostContext<'a> {
    pub flags: &'a dyn FeatureFlags,
    pub spawner: &'a mut dyn SpawnSink,
    pub objects: &'a mut dyn TrackedObjectSource,
}

impl<'a> HostContext<'a> {
    pub fn new(
        flags: &'a dyn FeatureFlags,
        spawner: &'a mut dyn SpawnSink,
        objects: &'a mut dyn TrackedObjectSource,
    ) -> Self {
        Self {
            flags,
            spawner,
            objects,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_undiscovered_objects_past_deadline_expire() {
        let undiscovered = TrackedObject::new(ObjectId(1), "a", DiscoveryState::Undiscovered, 10.0);
        let discovered = TrackedObject::new(ObjectId(2), "b", DiscoveryState::Discovered, 10.0);
        let craft = TrackedObject::new(ObjectId(3), "c", DiscoveryState::NotDiscoverable, 10.0);

        assert!(!undiscovered.is_expired(10.0));
        assert!(undiscovered.is_expired(10.5));
        assert!(!discovered.is_expired(100.0));
        assert!(!craft.is_expired(100.0));
    }

    #[test]
    fn closures_act_as_clocks() {
        let clock = || 42.0;
        assert_eq!(clock.now(), 42.0);
    }
}

//! The population registry and its reloadable handle.
//!
//! A [`Registry`] is built wholesale from a [`ConfigSource`] and never mutated after
//! that. [`RegistryHandle`] owns the authoritative snapshot and swaps in a new one on
//! reload.
use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, trace, warn};

use crate::error::{Error, Result};
use crate::host::ConfigSource;
use crate::population::{ConfigEntry, DefaultPopulation, EntryKind, PopulationRecord};

/// One default population plus the custom populations, in load order.
#[derive(Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct Registry {
    pub populations: Vec<PopulationRecord>,
    pub default_population: DefaultPopulation,
}

impl Registry {
    /// An empty registry whose default population never spawns.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default(mut self, default_population: DefaultPopulation) -> Self {
        self.default_population = default_population;
        self
    }

    pub fn with_population(mut self, record: PopulationRecord) -> Self {
        self.populations.push(record);
        self
    }

    /// Loads every population and default entry from `source`.
    ///
    /// Fails only if the source itself fails. Individual bad entries are logged and
    /// skipped by [`Registry::from_entries`].
    pub fn load(source: &dyn ConfigSource) -> Result<Self> {
        let entries = source.entries().map_err(|e| match e {
            Error::ConfigSource(_) => e,
            other => Error::ConfigSource(other.to_string()),
        })?;
        Ok(Self::from_entries(&entries))
    }

    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a ConfigEntry>,
    {
        let mut registry = Registry::new();
        let mut names: HashSet<String> = HashSet::new();
        let mut skipped = 0usize;

        for entry in entries {
            match entry.kind() {
                EntryKind::Population => match PopulationRecord::from_entry(entry) {
                    Ok(record) if !names.insert(record.name.clone()) => {
                        warn!(
                            "Population '{}' is defined more than once; keeping the first.",
                            record.name
                        );
                        skipped += 1;
                    }
                    Ok(record) => {
                        debug!(
                            "Population '{}' loaded (rate {}).",
                            record.name, record.spawn_rate
                        );
                        registry.populations.push(record);
                    }
                    Err(e) => {
                        warn!("Failed to load population: {}.", e);
                        skipped += 1;
                    }
                },
                EntryKind::DefaultPopulation => match DefaultPopulation::from_entry(entry) {
                    Ok(candidate) => {
                        debug!(
                            "Default population '{}' loaded (rate {}).",
                            candidate.name, candidate.spawn_rate
                        );
                        registry.default_population = candidate;
                    }
                    Err(e) => {
                        warn!("Failed to load default population: {}.", e);
                        skipped += 1;
                    }
                },
                EntryKind::Other => trace!("Ignoring config entry '{}'.", entry.tag),
            }
        }

        info!(
            "Loaded {} populations ({} entries skipped).",
            registry.populations.len(),
            skipped
        );
        registry
    }

    pub fn len(&self) -> usize {
        self.populations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.populations.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&PopulationRecord> {
        self.populations.iter().find(|p| p.name == name)
    }

    /// Display name for objects spawned on the default population.
    pub fn default_title(&self) -> &str {
        &self.default_population.title
    }
}

/// Owner of the authoritative [`Registry`] snapshot.
///
/// Readers take an `Arc` with [`RegistryHandle::snapshot`]; a reload replaces the
/// handle's snapshot without touching the ones already handed out.
#[derive(Clone, Debug, Default)]
pub struct RegistryHandle {
    current: Arc<Registry>,
}

impl RegistryHandle {
    pub fn new(registry: Registry) -> Self {
        Self {
            current: Arc::new(registry),
        }
    }

    /// Loads a handle from `source`, failing if the source is unavailable.
    pub fn load(source: &dyn ConfigSource) -> Result<Self> {
        Registry::load(source).map(Self::new)
    }

    pub fn snapshot(&self) -> Arc<Registry> {
        Arc::clone(&self.current)
    }

    pub fn current(&self) -> &Registry {
        &self.current
    }

    /// Rebuilds the registry from `source` and swaps it in.
    ///
    /// On a source failure the previous registry stays authoritative.
    pub fn reload(&mut self, source: &dyn ConfigSource) -> Result<Arc<Registry>> {
        match Registry::load(source) {
            Ok(registry) => {
                self.current = Arc::new(registry);
                Ok(self.snapshot())
            }
            Err(e) => {
                warn!("Population reload failed; keeping previous registry: {}.", e);
                Err(e)
            }
        }
    }
}

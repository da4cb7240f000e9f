//! Population definitions and the registry that holds them.
//!
//! A population is a named, weighted category that decides how a spawned object is
//! further configured. The registry always carries one [`DefaultPopulation`] for
//! stock-like objects plus any number of custom [`PopulationRecord`]s.
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub mod entry;
pub mod registry;

pub use entry::{ConfigEntry, EntryKind};
pub use registry::{Registry, RegistryHandle};

pub const FIELD_NAME: &str = "name";
pub const FIELD_TITLE: &str = "title";
pub const FIELD_SPAWN_RATE: &str = "spawn_rate";

pub const DEFAULT_POPULATION_NAME: &str = "default";
pub const DEFAULT_POPULATION_TITLE: &str = "Ast.";

/// Everything in a population entry that the scheduler does not interpret.
///
/// Orbit and composition settings live here and are handed to the spawn collaborator
/// untouched.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PopulationPayload {
    pub fields: BTreeMap<String, String>,
    pub children: Vec<ConfigEntry>,
}

impl PopulationPayload {
    fn from_entry(entry: &ConfigEntry) -> Self {
        let fields = entry
            .fields
            .iter()
            .filter(|(key, _)| !matches!(key.as_str(), FIELD_NAME | FIELD_TITLE | FIELD_SPAWN_RATE))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Self {
            fields,
            children: entry.children.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.children.is_empty()
    }
}

/// A custom population loaded from configuration.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct PopulationRecord {
    /// Identifier, unique within a registry.
    pub name: String,
    /// Display name for spawned objects, if different from `name`.
    pub title: Option<String>,
    /// Expected spawns per rate unit of simulated time.
    pub spawn_rate: f64,
    pub payload: PopulationPayload,
}

impl PopulationRecord {
    pub fn new(name: impl Into<String>, spawn_rate: f64) -> Self {
        Self {
            name: name.into(),
            title: None,
            spawn_rate,
            payload: PopulationPayload::default(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_payload(mut self, payload: PopulationPayload) -> Self {
        self.payload = payload;
        self
    }

    /// Parses a population entry. `name` and `spawn_rate` are required.
    pub fn from_entry(entry: &ConfigEntry) -> Result<Self> {
        let label = entry.label();
        let name = match entry.field(FIELD_NAME) {
            Some(name) if !name.trim().is_empty() => name.trim().to_owned(),
            Some(_) => return Err(Error::entry(label, FIELD_NAME, "is empty")),
            None => return Err(Error::entry(label, FIELD_NAME, "is missing")),
        };
        let spawn_rate = entry
            .parse_field::<f64>(FIELD_SPAWN_RATE)?
            .ok_or_else(|| Error::entry(&name, FIELD_SPAWN_RATE, "is missing"))?;
        validate_rate(&name, spawn_rate)?;

        Ok(Self {
            title: entry.field(FIELD_TITLE).map(str::to_owned),
            spawn_rate,
            payload: PopulationPayload::from_entry(entry),
            name,
        })
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }
}

/// Settings for objects that keep the host's stock behaviour.
///
/// Always present in a [`Registry`]; with the default rate of zero the default bucket
/// never wins a draw.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct DefaultPopulation {
    pub name: String,
    pub title: String,
    pub spawn_rate: f64,
}

impl Default for DefaultPopulation {
    fn default() -> Self {
        Self {
            name: DEFAULT_POPULATION_NAME.to_owned(),
            title: DEFAULT_POPULATION_TITLE.to_owned(),
            spawn_rate: 0.0,
        }
    }
}

impl DefaultPopulation {
    pub fn with_spawn_rate(mut self, spawn_rate: f64) -> Self {
        self.spawn_rate = spawn_rate;
        self
    }

    /// Parses a default entry. Every field is optional; absent fields keep the stock
    /// values, but a present field must parse.
    pub fn from_entry(entry: &ConfigEntry) -> Result<Self> {
        let mut candidate = Self::default();
        if let Some(name) = entry.field(FIELD_NAME) {
            candidate.name = name.trim().to_owned();
        }
        if let Some(title) = entry.field(FIELD_TITLE) {
            candidate.title = title.to_owned();
        }
        if let Some(rate) = entry.parse_field::<f64>(FIELD_SPAWN_RATE)? {
            validate_rate(&candidate.name, rate)?;
            candidate.spawn_rate = rate;
        }
        Ok(candidate)
    }
}

fn validate_rate(name: &str, rate: f64) -> Result<()> {
    if !rate.is_finite() {
        return Err(Error::entry(name, FIELD_SPAWN_RATE, "is not finite"));
    }
    if rate < 0.0 {
        return Err(Error::entry(name, FIELD_SPAWN_RATE, "is negative"));
    }
    Ok(())
}

/// Reference to one population of a [`Registry`].
///
/// The default population is addressed by variant, never by name, so a custom record
/// named `"default"` cannot shadow it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PopulationRef<'a> {
    Default(&'a DefaultPopulation),
    Custom(&'a PopulationRecord),
}

impl<'a> PopulationRef<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            PopulationRef::Default(d) => &d.name,
            PopulationRef::Custom(r) => &r.name,
        }
    }

    pub fn title(&self) -> &'a str {
        match self {
            PopulationRef::Default(d) => &d.title,
            PopulationRef::Custom(r) => r.display_title(),
        }
    }

    pub fn spawn_rate(&self) -> f64 {
        match self {
            PopulationRef::Default(d) => d.spawn_rate,
            PopulationRef::Custom(r) => r.spawn_rate,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, PopulationRef::Default(_))
    }

    /// Custom payload, or `None` for the default population.
    pub fn payload(&self) -> Option<&'a PopulationPayload> {
        match self {
            PopulationRef::Default(_) => None,
            PopulationRef::Custom(r) => Some(&r.payload),
        }
    }
}

//! Save-game records for scheduler state.
//!
//! The host stores a flat, versionless record under [`SPAWN_STATE_KEY`]:
//!
//! ```text
//! SpawnState
//! {
//!     next_event_time = 12345.6789
//!     enabled = true
//! }
//! ```
//!
//! Times are written with Rust's shortest round-trip float formatting, so a save/load
//! cycle reproduces them bit for bit. A scheduler that will never fire stores `never`.
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Error;
use crate::host::PersistenceStore;
use crate::spawn::{NextEvent, SpawnState};

pub const SPAWN_STATE_KEY: &str = "SpawnState";
pub const FIELD_NEXT_EVENT_TIME: &str = "next_event_time";
pub const FIELD_ENABLED: &str = "enabled";
pub const NEVER: &str = "never";

/// A named set of string fields inside the host's save document.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PersistedRecord {
    pub fields: BTreeMap<String, String>,
}

impl PersistedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }
}

/// Partially recovered fields of a persisted [`SpawnState`].
///
/// `None` means the field was absent or malformed; the caller substitutes its
/// construction-time default.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PersistedSpawnState {
    pub next_event: Option<NextEvent>,
    pub was_enabled: Option<bool>,
}

impl SpawnState {
    pub fn to_record(&self) -> PersistedRecord {
        let next = match self.next_event {
            NextEvent::At(t) => t.to_string(),
            NextEvent::Never => NEVER.to_owned(),
        };
        PersistedRecord::new()
            .with_field(FIELD_NEXT_EVENT_TIME, next)
            .with_field(FIELD_ENABLED, self.was_enabled.to_string())
    }
}

impl PersistedSpawnState {
    /// Reads whatever fields of `record` are usable, logging the ones that are not.
    pub fn from_record(record: &PersistedRecord) -> Self {
        let next_event = record
            .get(FIELD_NEXT_EVENT_TIME)
            .and_then(|raw| recover(FIELD_NEXT_EVENT_TIME, raw, parse_next_event(raw)));
        let was_enabled = record
            .get(FIELD_ENABLED)
            .and_then(|raw| recover(FIELD_ENABLED, raw, parse_bool(raw)));
        Self {
            next_event,
            was_enabled,
        }
    }
}

fn recover<T>(field: &str, raw: &str, parsed: Option<T>) -> Option<T> {
    if parsed.is_none() {
        let err = Error::PersistenceFormat {
            field: field.to_owned(),
            value: raw.to_owned(),
        };
        warn!("{}; using the default.", err);
    }
    parsed
}

fn parse_next_event(raw: &str) -> Option<NextEvent> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case(NEVER) {
        return Some(NextEvent::Never);
    }
    match raw.parse::<f64>() {
        Ok(t) if t.is_finite() => Some(NextEvent::At(t)),
        // Older saves may spell a never-firing timer as infinity.
        Ok(t) if t == f64::INFINITY => Some(NextEvent::Never),
        _ => None,
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// In-memory [`PersistenceStore`], standing in for a save document.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    pub records: BTreeMap<String, PersistedRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PersistenceStore for MemoryStore {
    fn read(&self, key: &str) -> Option<PersistedRecord> {
        self.records.get(key).cloned()
    }

    fn write(&mut self, key: &str, record: PersistedRecord) {
        self.records.insert(key.to_owned(), record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_round_trips_exact_times() {
        for t in [0.0, 12345.6789, 1.0 / 3.0, 9.007_199_254_740_993e15, 1e-300] {
            let state = SpawnState {
                next_event: NextEvent::At(t),
                was_enabled: true,
            };
            let back = PersistedSpawnState::from_record(&state.to_record());
            assert_eq!(back.next_event, Some(NextEvent::At(t)));
            assert_eq!(back.was_enabled, Some(true));
        }
    }

    #[test]
    fn never_is_persisted_as_a_token() {
        let state = SpawnState {
            next_event: NextEvent::Never,
            was_enabled: false,
        };
        let record = state.to_record();
        assert_eq!(record.get(FIELD_NEXT_EVENT_TIME), Some(NEVER));
        let back = PersistedSpawnState::from_record(&record);
        assert_eq!(back.next_event, Some(NextEvent::Never));
        assert_eq!(back.was_enabled, Some(false));
    }

    #[test]
    fn malformed_fields_are_dropped_individually() {
        let record = PersistedRecord::new()
            .with_field(FIELD_NEXT_EVENT_TIME, "soon")
            .with_field(FIELD_ENABLED, "True");
        let back = PersistedSpawnState::from_record(&record);
        assert_eq!(back.next_event, None);
        assert_eq!(back.was_enabled, Some(true));

        let nan = PersistedRecord::new().with_field(FIELD_NEXT_EVENT_TIME, "NaN");
        assert_eq!(PersistedSpawnState::from_record(&nan).next_event, None);

        assert_eq!(
            PersistedSpawnState::from_record(&PersistedRecord::new()),
            PersistedSpawnState::default()
        );
    }

    #[test]
    fn legacy_infinity_reads_as_never() {
        let record = PersistedRecord::new().with_field(FIELD_NEXT_EVENT_TIME, "inf");
        assert_eq!(
            PersistedSpawnState::from_record(&record).next_event,
            Some(NextEvent::Never)
        );
    }

    #[test]
    fn memory_store_reads_back_written_records() {
        let mut store = MemoryStore::new();
        assert!(store.read(SPAWN_STATE_KEY).is_none());
        let record = PersistedRecord::new().with_field("k", "v");
        store.write(SPAWN_STATE_KEY, record.clone());
        assert_eq!(store.read(SPAWN_STATE_KEY), Some(record));
    }
}

//! Opaque configuration entries and the sources that supply them.
use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::host::ConfigSource;

pub const TAG_POPULATION: &str = "population";
pub const TAG_DEFAULT: &str = "default";

/// How the registry treats an entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    Population,
    DefaultPopulation,
    Other,
}

/// A key/value tree as produced by a configuration loader.
///
/// Values stay strings until a consumer asks for a typed field, so one entry with a
/// bad value never prevents its siblings from loading.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigEntry {
    pub tag: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub fields: BTreeMap<String, String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub children: Vec<ConfigEntry>,
}

impl ConfigEntry {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            fields: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: ConfigEntry) -> Self {
        self.children.push(child);
        self
    }

    pub fn kind(&self) -> EntryKind {
        let tag = self.tag.trim();
        if tag.eq_ignore_ascii_case(TAG_POPULATION) {
            EntryKind::Population
        } else if tag.eq_ignore_ascii_case(TAG_DEFAULT)
            || tag.eq_ignore_ascii_case("default_population")
        {
            EntryKind::DefaultPopulation
        } else {
            EntryKind::Other
        }
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Parses `key` as `T`. Absent fields yield `Ok(None)`; unparseable ones a
    /// [`Error::ConfigEntry`] naming this entry and the field.
    pub fn parse_field<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.field(key) {
            None => Ok(None),
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map(Some)
                .map_err(|e| Error::entry(self.label(), key, format!("'{raw}': {e}"))),
        }
    }

    /// Name used in diagnostics.
    pub fn label(&self) -> String {
        match self.field("name") {
            Some(name) if !name.trim().is_empty() => name.trim().to_owned(),
            _ => format!("<unnamed {}>", self.tag),
        }
    }
}

impl ConfigSource for [ConfigEntry] {
    fn entries(&self) -> Result<Vec<ConfigEntry>> {
        Ok(self.to_vec())
    }
}

impl ConfigSource for Vec<ConfigEntry> {
    fn entries(&self) -> Result<Vec<ConfigEntry>> {
        Ok(self.clone())
    }
}

/// Population entries stored as a RON list of [`ConfigEntry`] values.
///
/// ```ron
/// [
///     (tag: "default", fields: {"spawn_rate": "0.2"}),
///     (tag: "population", fields: {"name": "main_belt", "spawn_rate": "1.5"}),
/// ]
/// ```
#[cfg(feature = "ron")]
#[derive(Clone, Debug)]
pub enum RonConfigSource {
    Text(String),
    File(std::path::PathBuf),
}

#[cfg(feature = "ron")]
impl RonConfigSource {
    pub fn from_text(text: impl Into<String>) -> Self {
        RonConfigSource::Text(text.into())
    }

    pub fn from_path(path: impl Into<std::path::PathBuf>) -> Self {
        RonConfigSource::File(path.into())
    }
}

#[cfg(feature = "ron")]
impl ConfigSource for RonConfigSource {
    fn entries(&self) -> Result<Vec<ConfigEntry>> {
        let text = match self {
            RonConfigSource::Text(text) => std::borrow::Cow::Borrowed(text.as_str()),
            RonConfigSource::File(path) => std::fs::read_to_string(path)
                .map(std::borrow::Cow::Owned)
                .map_err(|e| Error::ConfigSource(format!("{}: {e}", path.display())))?,
        };
        ron::from_str::<Vec<ConfigEntry>>(&text).map_err(|e| Error::ConfigSource(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_is_case_insensitive() {
        assert_eq!(ConfigEntry::new("Population").kind(), EntryKind::Population);
        assert_eq!(ConfigEntry::new("DEFAULT").kind(), EntryKind::DefaultPopulation);
        assert_eq!(ConfigEntry::new("options").kind(), EntryKind::Other);
    }

    #[test]
    fn parse_field_distinguishes_absent_from_malformed() {
        let entry = ConfigEntry::new("population")
            .with_field("name", "belt")
            .with_field("spawn_rate", " 3.0 ")
            .with_field("bad", "x");

        assert_eq!(entry.parse_field::<f64>("spawn_rate").unwrap(), Some(3.0));
        assert_eq!(entry.parse_field::<f64>("missing").unwrap(), None);
        let err = entry.parse_field::<f64>("bad").unwrap_err();
        assert!(matches!(err, Error::ConfigEntry { ref entry, .. } if entry == "belt"));
    }

    #[test]
    fn label_falls_back_to_tag() {
        assert_eq!(ConfigEntry::new("population").label(), "<unnamed population>");
    }

    #[cfg(feature = "ron")]
    #[test]
    fn ron_source_parses_entries() {
        let source = RonConfigSource::from_text(
            r#"[
                (tag: "default", fields: {"spawn_rate": "0.2"}),
                (tag: "population", fields: {"name": "belt", "spawn_rate": "1.5"},
                 children: [(tag: "orbit", fields: {"type": "sun"})]),
            ]"#,
        );
        let entries = source.entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].children[0].tag, "orbit");
    }

    #[cfg(feature = "ron")]
    #[test]
    fn ron_source_reports_unavailable_file() {
        let source = RonConfigSource::from_path("/nonexistent/populations.ron");
        assert!(matches!(source.entries(), Err(Error::ConfigSource(_))));
    }
}

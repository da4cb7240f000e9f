//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants
//! cover malformed population entries, unavailable config sources, failed population
//! draws, corrupt persisted state, invalid options, and startup timeouts.
//!
//! None of these are fatal to a running simulation. Most are logged and recovered
//! from where they occur.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// One population or default entry could not be parsed.
    #[error("population entry '{entry}': field '{field}' {reason}")]
    ConfigEntry {
        entry: String,
        field: String,
        reason: String,
    },

    /// The entry source itself failed; nothing was loaded.
    #[error("population source unavailable: {0}")]
    ConfigSource(String),

    #[error("no eligible population (total weight {total_weight})")]
    NoEligiblePopulation { total_weight: f64 },

    #[error("persisted field '{field}' has malformed value '{value}'")]
    PersistenceFormat { field: String, value: String },

    #[error("host not ready after {attempts} attempts")]
    NotReady { attempts: u32 },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub(crate) fn entry(
        entry: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Error::ConfigEntry {
            entry: entry.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_string_uses_other_variant() {
        let err: Error = String::from("boom").into();
        assert!(matches!(err, Error::Other(_)));
    }

    #[test]
    fn entry_error_names_entry_and_field() {
        let err = Error::entry("main_belt", "spawn_rate", "is negative");
        assert_eq!(
            err.to_string(),
            "population entry 'main_belt': field 'spawn_rate' is negative"
        );
    }
}

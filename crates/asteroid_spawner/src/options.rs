//! Spawner options: the feature flags and unit conventions shared by scheduler and setup.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::host::FeatureFlags;

/// Simulated seconds per day; population rates are per day by default.
pub const SECONDS_PER_DAY: f64 = 24.0 * 3600.0;

/// Configuration for the spawner.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnerOptions {
    /// Whether this crate schedules spawns instead of the host's stock spawner.
    pub custom_scheduling: bool,
    /// Minimum lifetime of an untracked object, in days.
    pub min_untracked_lifetime: f64,
    /// Maximum lifetime of an untracked object, in days.
    pub max_untracked_lifetime: f64,
    /// Simulated seconds covered by one unit of a population's spawn rate.
    pub rate_time_unit: f64,
}

impl Default for SpawnerOptions {
    fn default() -> Self {
        Self {
            custom_scheduling: true,
            min_untracked_lifetime: 1.0,
            max_untracked_lifetime: 20.0,
            rate_time_unit: SECONDS_PER_DAY,
        }
    }
}

impl SpawnerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_custom_scheduling(mut self, enabled: bool) -> Self {
        self.custom_scheduling = enabled;
        self
    }

    pub fn with_untracked_lifetime(mut self, min: f64, max: f64) -> Self {
        self.min_untracked_lifetime = min;
        self.max_untracked_lifetime = max;
        self
    }

    pub fn with_rate_time_unit(mut self, seconds: f64) -> Self {
        self.rate_time_unit = seconds;
        self
    }

    /// Validates the options, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if !self.rate_time_unit.is_finite() || self.rate_time_unit <= 0.0 {
            return Err(Error::InvalidConfig(
                "rate_time_unit must be finite and > 0".into(),
            ));
        }
        if !self.min_untracked_lifetime.is_finite() || self.min_untracked_lifetime < 0.0 {
            return Err(Error::InvalidConfig(
                "min_untracked_lifetime must be finite and >= 0".into(),
            ));
        }
        if !self.max_untracked_lifetime.is_finite()
            || self.max_untracked_lifetime < self.min_untracked_lifetime
        {
            return Err(Error::InvalidConfig(
                "max_untracked_lifetime must be finite and >= min_untracked_lifetime".into(),
            ));
        }
        Ok(())
    }

    #[cfg(feature = "ron")]
    pub fn from_ron_str(text: &str) -> Result<Self> {
        let options: Self =
            ron::from_str(text).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }
}

impl FeatureFlags for SpawnerOptions {
    fn custom_scheduling_enabled(&self) -> bool {
        self.custom_scheduling
    }

    fn untracked_lifetime_range(&self) -> (f64, f64) {
        (self.min_untracked_lifetime, self.max_untracked_lifetime)
    }

    fn rate_time_unit(&self) -> f64 {
        self.rate_time_unit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let options = SpawnerOptions::default();
        assert!(options.validate().is_ok());
        assert!(options.custom_scheduling_enabled());
        assert_eq!(options.untracked_lifetime_range(), (1.0, 20.0));
    }

    #[test]
    fn validate_rejects_inverted_lifetime_and_bad_unit() {
        let inverted = SpawnerOptions::new().with_untracked_lifetime(5.0, 2.0);
        assert!(matches!(inverted.validate(), Err(Error::InvalidConfig(_))));

        let zero_unit = SpawnerOptions::new().with_rate_time_unit(0.0);
        assert!(zero_unit.validate().is_err());

        let nan_unit = SpawnerOptions::new().with_rate_time_unit(f64::NAN);
        assert!(nan_unit.validate().is_err());
    }

    #[cfg(feature = "ron")]
    #[test]
    fn ron_options_fill_missing_fields_with_defaults() {
        let options = SpawnerOptions::from_ron_str("(custom_scheduling: false)").unwrap();
        assert!(!options.custom_scheduling);
        assert_eq!(options.rate_time_unit, SECONDS_PER_DAY);
    }
}

#![allow(dead_code)]

use std::time::Duration;

use asteroid_spawner::persistence::{PersistedRecord, FIELD_ENABLED, FIELD_NEXT_EVENT_TIME};
use asteroid_spawner::prelude::{DefaultPopulation, PopulationRecord, Registry};
use criterion::{Criterion, Throughput};

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(2);

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}

/// `count` populations whose rates add up to `total_rate`, with uneven shares.
pub fn registry(count: usize, total_rate: f64, default_rate: f64) -> Registry {
    let shares: Vec<f64> = (0..count).map(|i| 1.0 + (i % 7) as f64).collect();
    let sum: f64 = shares.iter().sum();
    shares.iter().enumerate().fold(
        Registry::new().with_default(DefaultPopulation::default().with_spawn_rate(default_rate)),
        |r, (i, share)| {
            r.with_population(PopulationRecord::new(format!("P{}", i), total_rate * share / sum))
        },
    )
}

/// Saved state with the next event at `at` and custom scheduling on.
pub fn armed_record(at: f64) -> PersistedRecord {
    PersistedRecord::new()
        .with_field(FIELD_NEXT_EVENT_TIME, at.to_string())
        .with_field(FIELD_ENABLED, "true")
}

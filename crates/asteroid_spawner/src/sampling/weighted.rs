//! Rate-weighted selection of a population from a [`Registry`].
//!
//! Bins are rebuilt from the registry on every draw so that a reloaded registry takes
//! effect immediately. The default population is always the first bin.
use rand::Rng;

use crate::error::{Error, Result};
use crate::population::{PopulationRef, Registry};
use crate::sampling::rand01;

/// A population paired with its current selection weight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeightedBin<'a> {
    pub population: PopulationRef<'a>,
    pub weight: f64,
}

/// Bins for `registry`: the default population first, then each custom record in order.
pub fn bins(registry: &Registry) -> Vec<WeightedBin<'_>> {
    let default = &registry.default_population;
    std::iter::once(WeightedBin {
        population: PopulationRef::Default(default),
        weight: default.spawn_rate,
    })
    .chain(registry.populations.iter().map(|p| WeightedBin {
        population: PopulationRef::Custom(p),
        weight: p.spawn_rate,
    }))
    .collect()
}

/// Draws one population with probability proportional to its spawn rate.
///
/// Fails with [`Error::NoEligiblePopulation`] if any weight is negative or not finite,
/// or if the weights sum to zero.
pub fn draw<'a>(registry: &'a Registry, rng: &mut dyn Rng) -> Result<PopulationRef<'a>> {
    let bins = bins(registry);

    let mut total_weight = 0.0;
    for bin in &bins {
        if !bin.weight.is_finite() || bin.weight < 0.0 {
            return Err(Error::NoEligiblePopulation {
                total_weight: bin.weight,
            });
        }
        total_weight += bin.weight;
    }
    // Finite weights can still overflow the sum.
    if !total_weight.is_finite() || total_weight <= 0.0 {
        return Err(Error::NoEligiblePopulation { total_weight });
    }

    let roll = rand01(rng) * total_weight;
    let mut cumulative = 0.0;
    for bin in &bins {
        cumulative += bin.weight;
        if roll < cumulative {
            return Ok(bin.population);
        }
    }

    // Rounding can leave the roll at the very top of the range.
    bins.iter()
        .rev()
        .find(|b| b.weight > 0.0)
        .map(|b| b.population)
        .ok_or(Error::NoEligiblePopulation { total_weight })
}

/// Sum of the custom populations' rates. The default population is not included.
pub fn total_rate(registry: &Registry) -> f64 {
    registry.populations.iter().map(|p| p.spawn_rate).sum()
}

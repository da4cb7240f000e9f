//! Random draws used by the scheduler.
//!
//! - [`weighted`]: picks a population with probability proportional to its rate.
//! - [`exponential`]: inter-arrival times of a Poisson process.
use rand::Rng;

pub mod weighted;

pub use weighted::{bins, draw, total_rate, WeightedBin};

/// Generate a random float in the range [0, 1).
#[inline]
pub fn rand01(rng: &mut dyn Rng) -> f64 {
    // 53 random mantissa bits.
    (rng.next_u64() >> 11) as f64 / (1u64 << 53) as f64
}

/// Draws an exponentially distributed waiting time with mean `1 / rate`.
///
/// Returns `None` when `rate` is not a positive finite number: such a process never
/// produces an event.
pub fn exponential(rate: f64, rng: &mut dyn Rng) -> Option<f64> {
    if !rate.is_finite() || rate <= 0.0 {
        return None;
    }
    // 1 - u lies in (0, 1], so the logarithm is finite.
    let u = rand01(rng);
    Some(-(1.0 - u).ln() / rate)
}

#[cfg(test)]
pub(crate) mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    /// Always returns `value`; every uniform draw is `value / 2^64`.
    pub(crate) struct FixedRng {
        pub value: u64,
    }

    impl rand::TryRng for FixedRng {
        type Error = core::convert::Infallible;

        fn try_next_u32(&mut self) -> Result<u32, Self::Error> {
            Ok((self.value >> 32) as u32)
        }

        fn try_next_u64(&mut self) -> Result<u64, Self::Error> {
            Ok(self.value)
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Self::Error> {
            let bytes = self.value.to_le_bytes();
            for (i, b) in dest.iter_mut().enumerate() {
                *b = bytes[i % 8];
            }
            Ok(())
        }
    }

    #[test]
    fn rand01_stays_in_half_open_range() {
        let mut low = FixedRng { value: 0 };
        assert_eq!(rand01(&mut low), 0.0);

        let mut high = FixedRng { value: u64::MAX };
        let result = rand01(&mut high);
        assert!(result < 1.0);
        assert!(result > 0.999_999);
    }

    #[test]
    fn exponential_mean_converges_to_inverse_rate() {
        let mut rng = StdRng::seed_from_u64(7);
        for &rate in &[0.5, 2.0, 10.0] {
            let n = 200_000;
            let sum: f64 = (0..n).map(|_| exponential(rate, &mut rng).unwrap()).sum();
            let mean = sum / n as f64;
            let expected = 1.0 / rate;
            assert!(
                (mean - expected).abs() < 0.02 * expected,
                "rate {rate}: mean {mean} vs {expected}"
            );
        }
    }

    #[test]
    fn exponential_never_fires_for_non_positive_rates() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(exponential(0.0, &mut rng), None);
        assert_eq!(exponential(-3.0, &mut rng), None);
        assert_eq!(exponential(f64::NAN, &mut rng), None);
        assert_eq!(exponential(f64::INFINITY, &mut rng), None);
    }

    #[test]
    fn exponential_is_finite_at_extreme_draws() {
        let mut high = FixedRng { value: u64::MAX };
        let wait = exponential(1.0, &mut high).unwrap();
        assert!(wait.is_finite() && wait > 0.0);

        let mut low = FixedRng { value: 0 };
        assert_eq!(exponential(1.0, &mut low), Some(0.0));
    }
}

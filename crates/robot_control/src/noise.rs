//! Gaussian measurement noise

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::error::{ControlError, Result};

/// Per-robot noise source.
///
/// `std_dev` is the standard deviation applied to distance targets; each
/// robot owns its generator so seeded runs are reproducible per robot.
#[derive(Debug, Clone)]
pub struct MeasurementNoise {
    std_dev: f64,
    rng: StdRng,
}

impl MeasurementNoise {
    /// Noise seeded from the OS, or deterministically when `seed` is set
    pub fn new(std_dev: f64, seed: Option<u64>) -> Result<Self> {
        validate(std_dev)?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self { std_dev, rng })
    }

    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    pub fn set_std_dev(&mut self, std_dev: f64) -> Result<()> {
        validate(std_dev)?;
        self.std_dev = std_dev;
        Ok(())
    }

    /// Draw from `N(mean, std_dev)`
    pub fn sample(&mut self, mean: f64) -> f64 {
        if self.std_dev == 0.0 {
            return mean;
        }
        match Normal::new(mean, self.std_dev) {
            Ok(normal) => normal.sample(&mut self.rng),
            // std_dev is validated on every write
            Err(_) => mean,
        }
    }
}

fn validate(std_dev: f64) -> Result<()> {
    if std_dev.is_finite() && std_dev >= 0.0 {
        Ok(())
    } else {
        Err(ControlError::InvalidStandardDeviation { value: std_dev })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_std_dev_is_exact() {
        let mut noise = MeasurementNoise::new(0.0, None).unwrap();
        assert_eq!(noise.sample(1.5), 1.5);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = MeasurementNoise::new(0.1, Some(7)).unwrap();
        let mut b = MeasurementNoise::new(0.1, Some(7)).unwrap();
        for _ in 0..5 {
            assert_eq!(a.sample(1.0), b.sample(1.0));
        }
    }

    #[test]
    fn test_samples_stay_near_mean() {
        let mut noise = MeasurementNoise::new(0.01, Some(1)).unwrap();
        let mean = (0..1000).map(|_| noise.sample(2.0)).sum::<f64>() / 1000.0;
        assert!((mean - 2.0).abs() < 0.01);
    }

    #[test]
    fn test_rejects_invalid_std_dev() {
        assert!(matches!(
            MeasurementNoise::new(-0.1, None),
            Err(ControlError::InvalidStandardDeviation { .. })
        ));
        let mut noise = MeasurementNoise::new(0.01, None).unwrap();
        assert!(noise.set_std_dev(f64::NAN).is_err());
        assert_eq!(noise.std_dev(), 0.01);
        noise.set_std_dev(0.5).unwrap();
        assert_eq!(noise.std_dev(), 0.5);
    }
}

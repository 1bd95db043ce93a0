use crate::error::{DashboardError, Result};

/// Streaming count/sum/mean/M2 accumulator (Welford). Each category gets a
/// private instance.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningStats {
    n: usize,
    sum: f64,
    mean: f64,
    m2: f64,
}

impl RunningStats {
    pub fn push(&mut self, x: f64) {
        self.n += 1;
        self.sum += x;
        let delta = x - self.mean;
        self.mean += delta / self.n as f64;
        let delta2 = x - self.mean;
        self.m2 += delta * delta2;
    }

    pub fn count(&self) -> usize {
        self.n
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn mean(&self) -> Option<f64> {
        (self.n > 0).then(|| self.sum / self.n as f64)
    }

    /// Population standard deviation (denominator `n`).
    pub fn std_pop(&self) -> Option<f64> {
        (self.n > 0).then(|| (self.m2 / self.n as f64).max(0.0).sqrt())
    }
}

impl FromIterator<f64> for RunningStats {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut stats = RunningStats::default();
        for x in iter {
            stats.push(x);
        }
        stats
    }
}

pub fn standard_error(sd: f64, count: usize) -> Result<f64> {
    if count == 0 {
        return Err(DashboardError::Division);
    }
    Ok(sd / (count as f64).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn population_sd_of_two_values() {
        let stats: RunningStats = [100.0, 300.0].into_iter().collect();
        assert_eq!(stats.count(), 2);
        assert_eq!(stats.sum(), 400.0);
        assert_eq!(stats.mean(), Some(200.0));
        assert!((stats.std_pop().unwrap() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn empty_accumulator_has_no_moments() {
        let stats = RunningStats::default();
        assert_eq!(stats.mean(), None);
        assert_eq!(stats.std_pop(), None);
    }

    #[test]
    fn stable_for_large_offsets() {
        // Naive sum-of-squares loses every digit here.
        let stats: RunningStats = [1e9 + 4.0, 1e9 + 7.0, 1e9 + 13.0, 1e9 + 16.0]
            .into_iter()
            .collect();
        assert!((stats.std_pop().unwrap() - 4.743416490252569).abs() < 1e-6);
    }

    #[test]
    fn standard_error_divides_by_root_n() {
        assert!((standard_error(100.0, 2).unwrap() - 70.71067811865476).abs() < 1e-9);
        assert_eq!(standard_error(0.0, 1).unwrap(), 0.0);
        assert!(matches!(standard_error(1.0, 0), Err(DashboardError::Division)));
    }
}

use crate::BenchError;

/// Per-call latencies in milliseconds, in the order the calls were made.
#[derive(Clone, Debug, PartialEq)]
pub struct LatencySamples(Vec<f64>);

impl LatencySamples {
    pub fn from_millis(samples: Vec<f64>) -> Result<Self, BenchError> {
        if samples.is_empty() {
            return Err(BenchError::InvalidIterationCount(0));
        }
        if let Some((index, &value)) = samples
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(BenchError::InvalidSample { index, value });
        }
        Ok(Self(samples))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Ascending copy for order statistics; the call-order sequence is untouched.
    pub fn sorted(&self) -> Vec<f64> {
        let mut sorted = self.0.clone();
        sorted.sort_by(f64::total_cmp);
        sorted
    }
}

/// Summary of one completed benchmark run.
///
/// Conventions: `median_ms` is the element at index `count / 2` of the
/// sorted samples (upper median, no averaging for even counts), and
/// `std_dev_ms` is the population standard deviation (divides by `count`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BenchmarkReport {
    pub count: usize,
    pub total_ms: f64,
    pub mean_ms: f64,
    pub median_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub std_dev_ms: f64,
    pub throughput_per_sec: f64,
}

impl BenchmarkReport {
    pub fn from_samples(samples: &LatencySamples) -> Result<Self, BenchError> {
        let values = samples.as_slice();
        let count = values.len();
        let n = count as f64;

        let total_ms = compensated_sum(values.iter().copied());

        let sorted = samples.sorted();
        let min_ms = sorted[0];
        let max_ms = sorted[count - 1];
        let median_ms = sorted[count / 2];

        // Rounding in the division can land a hair outside [min, max] for near-constant samples.
        let mean_ms = (total_ms / n).clamp(min_ms, max_ms);

        let sq_dev = compensated_sum(values.iter().map(|x| (x - mean_ms).powi(2)));
        let std_dev_ms = (sq_dev / n).sqrt();

        if mean_ms <= 0.0 {
            return Err(BenchError::DegenerateTiming { mean_ms });
        }
        let throughput_per_sec = 1000.0 / mean_ms;

        Ok(Self {
            count,
            total_ms,
            mean_ms,
            median_ms,
            min_ms,
            max_ms,
            std_dev_ms,
            throughput_per_sec,
        })
    }
}

/// Neumaier summation, left to right.
fn compensated_sum(values: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0_f64;
    let mut compensation = 0.0_f64;
    for v in values {
        let t = sum + v;
        if sum.abs() >= v.abs() {
            compensation += (sum - t) + v;
        } else {
            compensation += (v - t) + sum;
        }
        sum = t;
    }
    sum + compensation
}

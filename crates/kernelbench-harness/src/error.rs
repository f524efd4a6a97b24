use std::fmt;

use thiserror::Error;

/// Where in a run an engine call failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    InputStaging,
    WarmUp,
    /// Zero-based index of the timed iteration; displayed one-based.
    Iteration(usize),
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::InputStaging => f.write_str("input staging"),
            Phase::WarmUp => f.write_str("warm-up"),
            Phase::Iteration(i) => write!(f, "iteration {}", i + 1),
        }
    }
}

/// Every way a benchmark run can abort. None of these are retried.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("invalid iteration count {0}: at least one timed iteration is required")]
    InvalidIterationCount(i64),

    #[error("model introspection failed: {0}")]
    ModelIntrospection(String),

    #[error("invalid input shape {shape:?}: {reason}")]
    InvalidShape { shape: Vec<i64>, reason: String },

    #[error("inference failed during {phase}: {message}")]
    InferenceExecution { phase: Phase, message: String },

    #[error("invalid latency sample {value} at index {index}")]
    InvalidSample { index: usize, value: f64 },

    #[error("degenerate timing: mean latency is {mean_ms} ms, throughput is undefined")]
    DegenerateTiming { mean_ms: f64 },
}

impl BenchError {
    pub(crate) fn introspection(context: &str, err: anyhow::Error) -> Self {
        Self::ModelIntrospection(format!("{context}: {err:#}"))
    }

    pub(crate) fn execution(phase: Phase, err: anyhow::Error) -> Self {
        Self::InferenceExecution {
            phase,
            message: format!("{err:#}"),
        }
    }

    /// Timed iteration at which the engine failed, if any.
    pub fn failed_iteration(&self) -> Option<usize> {
        match self {
            Self::InferenceExecution {
                phase: Phase::Iteration(i),
                ..
            } => Some(*i),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iteration_phase_reads_one_based() {
        assert_eq!(Phase::Iteration(0).to_string(), "iteration 1");
        assert_eq!(Phase::Iteration(3).to_string(), "iteration 4");
        assert_eq!(Phase::WarmUp.to_string(), "warm-up");
    }
}

//! Latency benchmark harness for single-input inference engines.
//!
//! A run probes the model's first input, synthesizes a random f32 buffer for
//! it, makes one untimed warm-up call and then `N` timed calls, and reduces
//! the per-call latencies to a [`BenchmarkReport`]. Everything happens on the
//! calling thread; calls never overlap.

pub mod clock;
pub mod error;
pub mod probe;
pub mod report;
pub mod runner;
pub mod stats;
pub mod synth;

use std::num::NonZeroUsize;

use kernelbench_core::InferenceEngine;
use tracing::info;

pub use clock::{Clock, MonotonicClock};
pub use error::{BenchError, Phase};
pub use probe::{probe_model, ModelInputSpec, ModelProbe};
pub use report::ReportDisplay;
pub use runner::{Bindings, Runner, WarmRunner, PROGRESS_INTERVAL};
pub use stats::{BenchmarkReport, LatencySamples};
pub use synth::{resolve_shape, InputBuffer, InputSynthesizer};

pub const DEFAULT_ITERATIONS: i64 = 10;

#[derive(Clone, Debug)]
pub struct BenchmarkConfig {
    /// Number of timed calls. Must be at least 1.
    pub iterations: i64,
    /// Fixed seed for input synthesis; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            seed: None,
        }
    }
}

/// Everything a completed run produced.
#[derive(Clone, Debug)]
pub struct BenchmarkRun {
    pub probe: ModelProbe,
    pub samples: LatencySamples,
    pub report: BenchmarkReport,
}

pub fn validate_iterations(requested: i64) -> Result<NonZeroUsize, BenchError> {
    usize::try_from(requested)
        .ok()
        .and_then(NonZeroUsize::new)
        .ok_or(BenchError::InvalidIterationCount(requested))
}

pub fn run_benchmark<E: InferenceEngine>(
    engine: &mut E,
    config: &BenchmarkConfig,
) -> Result<BenchmarkRun, BenchError> {
    run_benchmark_with_clock(engine, config, MonotonicClock::new())
}

pub fn run_benchmark_with_clock<E: InferenceEngine, C: Clock>(
    engine: &mut E,
    config: &BenchmarkConfig,
    clock: C,
) -> Result<BenchmarkRun, BenchError> {
    let iterations = validate_iterations(config.iterations)?;

    let probe = probe_model(engine)?;
    info!(
        input = %probe.input.name(),
        dims = ?probe.input.shape(),
        output = %probe.output_name,
        "model probed"
    );

    let buffer = InputSynthesizer::new(config.seed).synthesize(&probe.input)?;
    info!(elements = buffer.len(), "generated random input data");

    let tensor = buffer
        .to_tensor()
        .map_err(|err| BenchError::execution(Phase::InputStaging, err))?;
    let staged = engine
        .stage_input(&tensor)
        .map_err(|err| BenchError::execution(Phase::InputStaging, err))?;
    let bindings = Bindings {
        inputs: vec![(probe.input.name().clone(), staged)],
        outputs: vec![probe.output_name.clone()],
    };

    let samples = Runner::new(engine, bindings, clock)
        .warm_up()?
        .measure(iterations)?;
    let report = BenchmarkReport::from_samples(&samples)?;

    Ok(BenchmarkRun {
        probe,
        samples,
        report,
    })
}

use std::num::NonZeroUsize;

use kernelbench_core::{IOName, InferenceEngine};
use tracing::{debug, info};

use crate::clock::{duration_ms, Clock};
use crate::{BenchError, LatencySamples, Phase};

/// Progress is logged after every this many timed iterations.
pub const PROGRESS_INTERVAL: usize = 10;

/// Input values and output names resolved once, before anything is timed.
pub struct Bindings<I> {
    pub inputs: Vec<(IOName, I)>,
    pub outputs: Vec<IOName>,
}

/// A runner that has not touched the engine yet.
pub struct Runner<'e, E: InferenceEngine, C: Clock> {
    engine: &'e mut E,
    bindings: Bindings<E::Input>,
    clock: C,
}

/// A runner whose warm-up call has completed.
pub struct WarmRunner<'e, E: InferenceEngine, C: Clock> {
    engine: &'e mut E,
    bindings: Bindings<E::Input>,
    clock: C,
    // Held between calls so the engine's output storage outlives the timed region.
    _retained: Vec<E::Output>,
}

impl<'e, E: InferenceEngine, C: Clock> Runner<'e, E, C> {
    pub fn new(engine: &'e mut E, bindings: Bindings<E::Input>, clock: C) -> Self {
        Self {
            engine,
            bindings,
            clock,
        }
    }

    /// One untimed call to absorb first-call costs (lazy allocation, kernel selection).
    pub fn warm_up(self) -> Result<WarmRunner<'e, E, C>, BenchError> {
        let Self {
            engine,
            bindings,
            clock,
        } = self;

        let output = engine
            .run(&bindings.inputs, &bindings.outputs)
            .map_err(|err| BenchError::execution(Phase::WarmUp, err))?;
        debug!("warm-up call finished");

        Ok(WarmRunner {
            engine,
            bindings,
            clock,
            _retained: output,
        })
    }
}

impl<'e, E: InferenceEngine, C: Clock> WarmRunner<'e, E, C> {
    /// Issue `iterations` timed calls; samples come back in call order.
    pub fn measure(mut self, iterations: NonZeroUsize) -> Result<LatencySamples, BenchError> {
        let n = iterations.get();
        let mut samples = Vec::with_capacity(n);
        info!(iterations = n, "running timed iterations");

        for i in 0..n {
            let start = self.clock.now();
            let result = self.engine.run(&self.bindings.inputs, &self.bindings.outputs);
            let end = self.clock.now();

            // Previous outputs are dropped here, outside the timed region.
            self._retained = result.map_err(|err| BenchError::execution(Phase::Iteration(i), err))?;
            samples.push(duration_ms(end.saturating_sub(start)));

            let completed = i + 1;
            if completed % PROGRESS_INTERVAL == 0 {
                info!(completed, total = n, "completed {completed} iterations");
            }
        }

        LatencySamples::from_millis(samples)
    }
}

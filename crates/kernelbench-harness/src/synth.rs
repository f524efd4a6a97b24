use kernelbench_core::{Shape, Tensor};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::{BenchError, ModelInputSpec};

/// Dense f32 buffer matching a model input, filled once per run.
#[derive(Clone, Debug)]
pub struct InputBuffer {
    shape: Shape,
    values: Vec<f32>,
}

impl InputBuffer {
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn to_tensor(&self) -> anyhow::Result<Tensor> {
        Tensor::from_f32(self.shape.clone(), &self.values)
    }
}

/// Concrete shape used for synthesis: every dynamic axis (`<= 0`) becomes 1.
pub fn resolve_shape(dims: &[i64]) -> Shape {
    Shape(dims.iter().map(|d| if *d > 0 { *d as usize } else { 1 }).collect())
}

/// Fills input buffers with values drawn uniformly from `[0, 1)`.
///
/// Owns its generator; nothing is shared between synthesizers.
pub struct InputSynthesizer {
    rng: StdRng,
}

impl InputSynthesizer {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn new(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::seeded)
    }

    pub fn synthesize(&mut self, spec: &ModelInputSpec) -> Result<InputBuffer, BenchError> {
        let shape = resolve_shape(spec.shape());
        let numel = shape
            .dims()
            .iter()
            .try_fold(1usize, |acc, d| acc.checked_mul(*d))
            .ok_or_else(|| BenchError::InvalidShape {
                shape: spec.shape().to_vec(),
                reason: "element count overflows".to_string(),
            })?;
        if numel == 0 {
            return Err(BenchError::InvalidShape {
                shape: spec.shape().to_vec(),
                reason: "resolved element count is zero".to_string(),
            });
        }

        debug!(input = %spec.name(), dims = ?shape.dims(), numel, "synthesizing random input");
        let values = (0..numel).map(|_| self.rng.gen::<f32>()).collect();
        Ok(InputBuffer { shape, values })
    }
}

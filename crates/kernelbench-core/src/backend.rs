use anyhow::Result;

use crate::{Device, IOName, ModelArtifact, Tensor, TensorSpec};

pub trait Backend {
    type Engine: InferenceEngine;

    fn name(&self) -> &'static str;
    fn load(&self, artifact: &ModelArtifact, device: Device) -> Result<Self::Engine>;
}

/// A loaded model that can be described and executed.
///
/// The benchmark harness only ever talks to a model through this trait.
/// Calls are synchronous and block until the engine returns.
pub trait InferenceEngine {
    /// Engine-native input value, produced once by [`InferenceEngine::stage_input`]
    /// and passed by reference to every [`InferenceEngine::run`].
    type Input;
    /// Engine-native output value. Callers hold on to it without inspecting it.
    type Output;

    fn input_count(&self) -> usize;
    fn output_count(&self) -> usize;

    /// Fails when `index` is out of range or the metadata cannot be expressed.
    fn input_descriptor(&self, index: usize) -> Result<TensorSpec>;
    fn output_name(&self, index: usize) -> Result<IOName>;

    /// Convert a host tensor into the engine's native input representation.
    fn stage_input(&self, tensor: &Tensor) -> Result<Self::Input>;

    /// Run one inference and return the requested outputs, in request order.
    fn run(
        &mut self,
        inputs: &[(IOName, Self::Input)],
        outputs: &[IOName],
    ) -> Result<Vec<Self::Output>>;
}

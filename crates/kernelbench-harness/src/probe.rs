use kernelbench_core::{DType, IOName, InferenceEngine};
use tracing::{debug, info, warn};

use crate::BenchError;

/// Name, shape and element type of the input being benchmarked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelInputSpec {
    name: IOName,
    shape: Vec<i64>,
    dtype: DType,
}

impl ModelInputSpec {
    pub fn new(name: IOName, shape: Vec<i64>, dtype: DType) -> Self {
        Self { name, shape, dtype }
    }

    pub fn name(&self) -> &IOName {
        &self.name
    }

    /// Declared dimensions; `<= 0` marks a dynamic axis.
    pub fn shape(&self) -> &[i64] {
        &self.shape
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }
}

/// What the probe learned about a loaded model.
#[derive(Clone, Debug)]
pub struct ModelProbe {
    pub input: ModelInputSpec,
    pub output_name: IOName,
}

/// Read the first input descriptor and first output name from `engine`.
///
/// Every input is logged at info level; only input 0 and output 0 are used.
pub fn probe_model<E: InferenceEngine>(engine: &E) -> Result<ModelProbe, BenchError> {
    let input_count = engine.input_count();
    let output_count = engine.output_count();
    info!(input_count, output_count, "probing model");

    if input_count == 0 {
        return Err(BenchError::ModelIntrospection(
            "model declares no inputs".to_string(),
        ));
    }
    if output_count == 0 {
        return Err(BenchError::ModelIntrospection(
            "model declares no outputs".to_string(),
        ));
    }

    let first = engine
        .input_descriptor(0)
        .map_err(|err| BenchError::introspection("input 0", err))?;
    info!(index = 0, name = %first.name, dims = ?first.dims, dtype = %first.dtype, "model input");
    for index in 1..input_count {
        match engine.input_descriptor(index) {
            Ok(spec) => info!(index, name = %spec.name, dims = ?spec.dims, dtype = %spec.dtype, "model input"),
            Err(err) => warn!(index, error = %format!("{err:#}"), "model input not describable"),
        }
    }

    if first.is_dynamic() {
        debug!(input = %first.name, "dynamic axes will be synthesized with size 1");
    }
    if first.dtype != DType::F32 {
        warn!(
            input = %first.name,
            dtype = %first.dtype,
            "benchmark input is synthesized as f32; the engine may reject it"
        );
    }

    let output_name = engine
        .output_name(0)
        .map_err(|err| BenchError::introspection("output 0", err))?;

    Ok(ModelProbe {
        input: ModelInputSpec::new(first.name, first.dims.to_vec(), first.dtype),
        output_name,
    })
}

use std::path::Path;

use anyhow::{bail, ensure, Context, Result};
use bytes::Bytes;
use kernelbench_core::{
    Backend, DType, Device, IOName, InferenceEngine, ModelArtifact, Tensor, TensorSpec,
};
use ort::{
    session::{
        builder::{GraphOptimizationLevel, SessionBuilder},
        run_options::OutputSelector,
        HasSelectedOutputs, RunOptions, Session, SessionInputValue,
    },
    tensor::TensorElementType,
    value::{DynValue, ValueType},
};
use tracing::{debug, info};

/// Session settings applied when a model is loaded.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub intra_op_threads: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            intra_op_threads: 1,
        }
    }
}

pub struct OrtBackend {
    config: SessionConfig,
}

impl OrtBackend {
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    pub fn with_config(config: SessionConfig) -> Self {
        Self { config }
    }
}

impl Default for OrtBackend {
    fn default() -> Self {
        Self::new()
    }
}

pub struct OrtEngine {
    session: Session,
    /// Run options restricted to the last requested output set.
    selection: Option<(Vec<IOName>, RunOptions<HasSelectedOutputs>)>,
}

impl Backend for OrtBackend {
    type Engine = OrtEngine;

    fn name(&self) -> &'static str {
        "onnxruntime"
    }

    fn load(&self, artifact: &ModelArtifact, device: Device) -> Result<Self::Engine> {
        let ModelArtifact::OnnxPath(path) = artifact;
        info!(model = %path.display(), %device, "loading ONNX model");
        OrtEngine::load(path, &device, &self.config)
    }
}

impl OrtEngine {
    pub fn load(path: &Path, device: &Device, config: &SessionConfig) -> Result<Self> {
        let builder = Session::builder()
            .context("failed to create ORT session builder")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("failed to configure ORT graph optimization")?
            .with_intra_threads(config.intra_op_threads)
            .context("failed to configure ORT intra-op threads")?;

        let builder = configure_session_builder(builder, device)?;

        let session = builder
            .commit_from_file(path)
            .with_context(|| format!("failed to load ONNX model {}", path.display()))?;

        debug!(
            inputs = session.inputs.len(),
            outputs = session.outputs.len(),
            "ORT session ready"
        );
        Ok(Self {
            session,
            selection: None,
        })
    }

    /// Build run options that compute only `outputs`. Rebuilt only when the set changes,
    /// which the harness does once, on the untimed warm-up call.
    fn select_outputs(&mut self, outputs: &[IOName]) -> Result<()> {
        if matches!(&self.selection, Some((names, _)) if names.as_slice() == outputs) {
            return Ok(());
        }

        for name in outputs {
            ensure!(
                self.session.outputs.iter().any(|o| o.name == name.as_str()),
                "model has no output named {name}"
            );
        }
        let selector = outputs
            .iter()
            .fold(OutputSelector::no_default(), |sel, name| sel.with(name.as_str()));
        let options = RunOptions::new()
            .context("failed to create ORT run options")?
            .with_outputs(selector);

        debug!(outputs = ?outputs, "selected session outputs");
        self.selection = Some((outputs.to_vec(), options));
        Ok(())
    }
}

impl InferenceEngine for OrtEngine {
    type Input = DynValue;
    type Output = DynValue;

    fn input_count(&self) -> usize {
        self.session.inputs.len()
    }

    fn output_count(&self) -> usize {
        self.session.outputs.len()
    }

    fn input_descriptor(&self, index: usize) -> Result<TensorSpec> {
        let input = self.session.inputs.get(index).with_context(|| {
            format!(
                "input index {index} out of range (model has {})",
                self.session.inputs.len()
            )
        })?;
        tensor_spec_from_value_type(&input.name, &input.input_type)
    }

    fn output_name(&self, index: usize) -> Result<IOName> {
        let output = self.session.outputs.get(index).with_context(|| {
            format!(
                "output index {index} out of range (model has {})",
                self.session.outputs.len()
            )
        })?;
        Ok(IOName(output.name.clone()))
    }

    fn stage_input(&self, tensor: &Tensor) -> Result<DynValue> {
        tensor_to_ort_value(tensor)
    }

    fn run(&mut self, inputs: &[(IOName, DynValue)], outputs: &[IOName]) -> Result<Vec<DynValue>> {
        let ort_inputs: Vec<(&str, SessionInputValue<'_>)> = inputs
            .iter()
            .map(|(name, value)| (name.as_str(), SessionInputValue::from(value.view())))
            .collect();

        self.select_outputs(outputs)?;
        let Some((_, options)) = &self.selection else {
            bail!("output selection missing after configuration");
        };

        let mut results = self.session.run_with_options(ort_inputs, options)?;
        ensure!(
            results.len() == outputs.len(),
            "session returned {} outputs, {} requested",
            results.len(),
            outputs.len()
        );
        outputs
            .iter()
            .map(|name| {
                results
                    .remove(name.as_str())
                    .with_context(|| format!("session produced no output named {name}"))
            })
            .collect()
    }
}

fn configure_session_builder(builder: SessionBuilder, device: &Device) -> Result<SessionBuilder> {
    match device {
        Device::Cpu => Ok(builder),
        Device::Cuda { device_id } => configure_cuda(builder, *device_id),
    }
}

fn configure_cuda(builder: SessionBuilder, device_id: u32) -> Result<SessionBuilder> {
    #[cfg(feature = "cuda")]
    {
        use ort::execution_providers::cuda::CUDAExecutionProvider;
        let ep = CUDAExecutionProvider::default()
            .with_device_id(device_id as i32)
            .build();
        builder
            .with_execution_providers([ep])
            .context("failed to enable ORT CUDA execution provider")
    }
    #[cfg(not(feature = "cuda"))]
    {
        let _ = (builder, device_id);
        bail!("CUDA requested but kernelbench-backend-ort was built without the `cuda` feature")
    }
}

fn tensor_spec_from_value_type(name: &str, value_type: &ValueType) -> Result<TensorSpec> {
    let ValueType::Tensor { ty, shape, .. } = value_type else {
        bail!("input {name} is not a tensor");
    };

    Ok(TensorSpec {
        name: IOName(name.to_string()),
        dtype: ort_tensor_element_to_dtype(*ty)?,
        dims: shape.iter().copied().collect(),
    })
}

fn ort_tensor_element_to_dtype(ty: TensorElementType) -> Result<DType> {
    match ty {
        TensorElementType::Float32 => Ok(DType::F32),
        TensorElementType::Float64 => Ok(DType::F64),
        TensorElementType::Float16 => Ok(DType::F16),
        TensorElementType::Int64 => Ok(DType::I64),
        TensorElementType::Int32 => Ok(DType::I32),
        TensorElementType::Int8 => Ok(DType::I8),
        TensorElementType::Uint8 => Ok(DType::U8),
        TensorElementType::Bool => Ok(DType::Bool),
        _ => bail!("unsupported tensor element type: {ty}"),
    }
}

fn tensor_to_ort_value(tensor: &Tensor) -> Result<DynValue> {
    let shape: Vec<usize> = tensor.shape.dims().to_vec();
    let bytes = &tensor.data;

    let value = match tensor.dtype {
        DType::F32 => {
            let data = decode_le::<4, f32>(bytes, f32::from_le_bytes)?;
            ort::value::Tensor::from_array((shape, data))?.into_dyn()
        }
        DType::F64 => {
            let data = decode_le::<8, f64>(bytes, f64::from_le_bytes)?;
            ort::value::Tensor::from_array((shape, data))?.into_dyn()
        }
        DType::I64 => {
            let data = decode_le::<8, i64>(bytes, i64::from_le_bytes)?;
            ort::value::Tensor::from_array((shape, data))?.into_dyn()
        }
        DType::I32 => {
            let data = decode_le::<4, i32>(bytes, i32::from_le_bytes)?;
            ort::value::Tensor::from_array((shape, data))?.into_dyn()
        }
        DType::U8 => ort::value::Tensor::from_array((shape, bytes.to_vec()))?.into_dyn(),
        other => bail!("{other} inputs are not supported yet"),
    };

    Ok(value)
}

fn decode_le<const N: usize, T>(bytes: &Bytes, from_le: fn([u8; N]) -> T) -> Result<Vec<T>> {
    ensure!(
        bytes.len() % N == 0,
        "input byte length {} is not a multiple of {N}",
        bytes.len()
    );
    Ok(bytes
        .chunks_exact(N)
        .map(|chunk| {
            let mut raw = [0u8; N];
            raw.copy_from_slice(chunk);
            from_le(raw)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_little_endian_words() -> Result<()> {
        let raw: Vec<u8> = [1.5_f32, -2.0].iter().flat_map(|v| v.to_le_bytes()).collect();
        let decoded = decode_le::<4, f32>(&Bytes::from(raw), f32::from_le_bytes)?;
        assert_eq!(decoded, vec![1.5, -2.0]);
        Ok(())
    }

    #[test]
    fn rejects_truncated_buffers() {
        let err = decode_le::<8, i64>(&Bytes::from_static(&[0u8; 12]), i64::from_le_bytes)
            .unwrap_err();
        assert!(err.to_string().contains("multiple of 8"));
    }

    #[test]
    fn maps_supported_element_types() -> Result<()> {
        assert_eq!(ort_tensor_element_to_dtype(TensorElementType::Float32)?, DType::F32);
        assert_eq!(ort_tensor_element_to_dtype(TensorElementType::Int64)?, DType::I64);
        assert!(ort_tensor_element_to_dtype(TensorElementType::String).is_err());
        Ok(())
    }
}

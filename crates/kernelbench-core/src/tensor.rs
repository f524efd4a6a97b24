use std::fmt;

use anyhow::{ensure, Result};
use bytes::Bytes;
use smallvec::SmallVec;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Device {
    Cpu,
    Cuda { device_id: u32 },
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => f.write_str("cpu"),
            Device::Cuda { device_id } => write!(f, "cuda:{device_id}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DType {
    F32,
    F64,
    F16,
    I64,
    I32,
    I8,
    U8,
    Bool,
}

impl DType {
    pub fn byte_size(self) -> usize {
        match self {
            DType::F64 | DType::I64 => 8,
            DType::F32 | DType::I32 => 4,
            DType::F16 => 2,
            DType::I8 | DType::U8 | DType::Bool => 1,
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DType::F32 => "f32",
            DType::F64 => "f64",
            DType::F16 => "f16",
            DType::I64 => "i64",
            DType::I32 => "i32",
            DType::I8 => "i8",
            DType::U8 => "u8",
            DType::Bool => "bool",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Shape(pub SmallVec<[usize; 6]>);

impl Shape {
    pub fn from_slice(d: &[usize]) -> Self {
        Self(d.iter().copied().collect())
    }
    pub fn numel(&self) -> usize {
        self.0.iter().product::<usize>()
    }
    pub fn dims(&self) -> &[usize] {
        &self.0
    }
}

/// Dense host tensor in little-endian byte layout.
#[derive(Clone, Debug)]
pub struct Tensor {
    pub dtype: DType,
    pub shape: Shape,
    pub data: Bytes,
}

impl Tensor {
    pub fn from_cpu_bytes(dtype: DType, shape: Shape, data: Bytes) -> Result<Self> {
        let expected = shape.numel() * dtype.byte_size();
        ensure!(
            data.len() == expected,
            "tensor byte size mismatch: got {}, expected {} for {dtype} {:?}",
            data.len(),
            expected,
            shape.dims()
        );
        Ok(Self { dtype, shape, data })
    }

    pub fn from_f32(shape: Shape, values: &[f32]) -> Result<Self> {
        let data: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        Self::from_cpu_bytes(DType::F32, shape, Bytes::from(data))
    }

    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    pub fn to_f32_vec(&self) -> Result<Vec<f32>> {
        ensure!(self.dtype == DType::F32, "expected f32 tensor, got {}", self.dtype);
        Ok(self
            .data
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f32_tensor_keeps_values() -> Result<()> {
        let values = [0.25_f32, 0.5, 0.75, 1.0, -2.0, 3.5];
        let tensor = Tensor::from_f32(Shape::from_slice(&[2, 3]), &values)?;
        assert_eq!(tensor.byte_len(), 24);
        assert_eq!(tensor.to_f32_vec()?, values);
        Ok(())
    }

    #[test]
    fn rejects_mismatched_byte_length() {
        let err = Tensor::from_cpu_bytes(
            DType::I64,
            Shape::from_slice(&[4]),
            Bytes::from_static(&[0u8; 16]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("expected 32"));
    }

    #[test]
    fn scalar_shape_has_one_element() {
        assert_eq!(Shape::from_slice(&[]).numel(), 1);
        assert_eq!(Shape::from_slice(&[1, 3, 224, 224]).numel(), 150_528);
    }
}

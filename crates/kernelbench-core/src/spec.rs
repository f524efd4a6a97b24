use std::fmt;

use smallvec::SmallVec;

use crate::DType;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IOName(pub String);

impl IOName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for IOName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl fmt::Display for IOName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Declared metadata of a model input or output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TensorSpec {
    pub name: IOName,
    pub dtype: DType,
    /// Dimension sizes as reported by the runtime; `<= 0` = dynamic.
    pub dims: SmallVec<[i64; 6]>,
}

impl TensorSpec {
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    pub fn is_dynamic(&self) -> bool {
        self.dims.iter().any(|d| *d <= 0)
    }
}

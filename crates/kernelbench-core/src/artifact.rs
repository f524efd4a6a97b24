use std::fmt;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub enum ModelArtifact {
    OnnxPath(PathBuf),
}

impl fmt::Display for ModelArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelArtifact::OnnxPath(path) => write!(f, "{}", path.display()),
        }
    }
}

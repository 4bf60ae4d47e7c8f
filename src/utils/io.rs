use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

use crate::error::{Error, Result};

/// On-disk encoding, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactEncoding {
    Bincode,
    Json,
}

impl ArtifactEncoding {
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Bincode,
        }
    }
}

pub fn save_artifact<T: Serialize>(path: &Path, artifact: &T) -> Result<()> {
    let data = match ArtifactEncoding::for_path(path) {
        ArtifactEncoding::Bincode => {
            bincode::serialize(artifact).map_err(|e| Error::artifact_format(path, e.to_string()))?
        }
        ArtifactEncoding::Json => {
            serde_json::to_vec_pretty(artifact)
                .map_err(|e| Error::artifact_format(path, e.to_string()))?
        }
    };
    std::fs::write(path, data).map_err(|e| Error::io(format!("writing {}", path.display()), e))?;
    Ok(())
}

pub fn load_artifact<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = std::fs::read(path).map_err(|e| Error::artifact_load(path, e))?;
    let artifact = match ArtifactEncoding::for_path(path) {
        ArtifactEncoding::Bincode => {
            bincode::deserialize(&data).map_err(|e| Error::artifact_load(path, e))?
        }
        ArtifactEncoding::Json => {
            serde_json::from_slice(&data).map_err(|e| Error::artifact_load(path, e))?
        }
    };
    Ok(artifact)
}

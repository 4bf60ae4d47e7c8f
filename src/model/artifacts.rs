use std::path::{Path, PathBuf};
use tracing::info;

use crate::data::features::FeatureVector;
use crate::error::{Error, Result};
use crate::model::{FeatureScaler, Regressor, StandardScaler, UsageModel};
use crate::utils::io::load_artifact;

/// Where the two artifacts live on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub scaler: PathBuf,
}

impl ArtifactPaths {
    pub fn in_dir(dir: &Path, model: &str, scaler: &str) -> Self {
        Self {
            model: dir.join(model),
            scaler: dir.join(scaler),
        }
    }
}

/// The loaded scaler and model, immutable for the life of the process.
pub struct Artifacts {
    scaler: Box<dyn FeatureScaler>,
    model: Box<dyn UsageModel>,
}

impl Artifacts {
    pub fn new(scaler: Box<dyn FeatureScaler>, model: Box<dyn UsageModel>) -> Self {
        Self { scaler, model }
    }

    pub fn load(paths: &ArtifactPaths) -> Result<Self> {
        let model: Regressor = load_artifact(&paths.model)?;
        model
            .validate()
            .map_err(|msg| Error::artifact_format(&paths.model, msg))?;

        let scaler: StandardScaler = load_artifact(&paths.scaler)?;
        scaler
            .validate()
            .map_err(|msg| Error::artifact_format(&paths.scaler, msg))?;

        if scaler.n_features() != model.n_features() {
            return Err(Error::artifact_format(
                &paths.scaler,
                format!(
                    "scaler covers {} features but model expects {}",
                    scaler.n_features(),
                    model.n_features()
                ),
            ));
        }

        info!(
            model = %paths.model.display(),
            scaler = %paths.scaler.display(),
            features = model.n_features(),
            "model and scaler loaded"
        );
        Ok(Self::new(Box::new(scaler), Box::new(model)))
    }

    pub fn scaler(&self) -> &dyn FeatureScaler {
        self.scaler.as_ref()
    }

    pub fn model(&self) -> &dyn UsageModel {
        self.model.as_ref()
    }

    /// Column names to align inputs to: the model's, else the scaler's,
    /// else the vector's own columns.
    pub fn expected_features(&self, vector: &FeatureVector) -> Vec<String> {
        self.model
            .feature_names()
            .or_else(|| self.scaler.feature_names())
            .map(<[String]>::to_vec)
            .unwrap_or_else(|| vector.names().map(str::to_owned).collect())
    }

    /// Scales then predicts one already-aligned vector.
    pub fn scale_and_predict(&self, vector: &FeatureVector) -> Result<f64> {
        let expected = self.scaler.n_features();
        if vector.len() != expected {
            return Err(Error::incompatible_schema(
                format!("{expected} features"),
                format!("{} features [{}]", vector.len(), vector.column_list()),
                "scale and predict",
            ));
        }
        let scaled = self.scaler.transform(vector.to_array().view())?;
        self.model.predict(scaled.view())
    }
}

impl std::fmt::Debug for Artifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Artifacts")
            .field("scaler", &self.scaler.describe())
            .field("model", &self.model.describe())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::io::save_artifact;
    use ndarray::array;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn load_reads_bincode_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let model = Regressor::linear(array![1.0, 2.0], 3.0).with_feature_names(names(&["a", "b"]));
        let scaler = StandardScaler::new(array![0.0, 0.0], array![1.0, 1.0]);
        save_artifact(&dir.path().join("model.bin"), &model).unwrap();
        save_artifact(&dir.path().join("scaler.json"), &scaler).unwrap();

        let paths = ArtifactPaths::in_dir(dir.path(), "model.bin", "scaler.json");
        let artifacts = Artifacts::load(&paths).unwrap();
        let v: FeatureVector = [("a", 1.0), ("b", 1.0)].into_iter().collect();
        assert_eq!(artifacts.scale_and_predict(&v).unwrap(), 6.0);
        assert_eq!(artifacts.expected_features(&v), names(&["a", "b"]));
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path(), "absent.bin", "scaler.bin");
        let err = Artifacts::load(&paths).unwrap_err();
        assert!(matches!(err, Error::ArtifactLoad { .. }));
        assert!(err.to_string().contains("absent.bin"));
    }

    #[test]
    fn mismatched_artifacts_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        save_artifact(&dir.path().join("m.json"), &Regressor::linear(array![1.0], 0.0)).unwrap();
        save_artifact(
            &dir.path().join("s.json"),
            &StandardScaler::new(array![0.0, 0.0], array![1.0, 1.0]),
        )
        .unwrap();
        let paths = ArtifactPaths::in_dir(dir.path(), "m.json", "s.json");
        let err = Artifacts::load(&paths).unwrap_err();
        assert!(matches!(err, Error::ArtifactFormat { .. }));
    }

    #[test]
    fn expected_features_fall_back_to_scaler_then_vector() {
        let scaler =
            StandardScaler::new(array![0.0], array![1.0]).with_feature_names(names(&["s"]));
        let model = Regressor::linear(array![1.0], 0.0);
        let with_scaler_names = Artifacts::new(Box::new(scaler), Box::new(model));
        let v: FeatureVector = [("v", 1.0)].into_iter().collect();
        assert_eq!(with_scaler_names.expected_features(&v), names(&["s"]));

        let anonymous = Artifacts::new(
            Box::new(StandardScaler::new(array![0.0], array![1.0])),
            Box::new(Regressor::linear(array![1.0], 0.0)),
        );
        assert_eq!(anonymous.expected_features(&v), names(&["v"]));
    }
}

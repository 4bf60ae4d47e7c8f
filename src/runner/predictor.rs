use tracing::debug;

use crate::data::features::{reindex, FeatureVector, Reindexed, SchemaPolicy};
use crate::error::Result;
use crate::model::Artifacts;

/// Scale-and-predict over a loaded artifact pair.
///
/// Stateless apart from the borrowed artifacts: identical vectors always give
/// identical predictions.
#[derive(Debug, Clone, Copy)]
pub struct Predictor<'a> {
    artifacts: &'a Artifacts,
    policy: SchemaPolicy,
}

impl<'a> Predictor<'a> {
    pub fn new(artifacts: &'a Artifacts, policy: SchemaPolicy) -> Self {
        Self { artifacts, policy }
    }

    pub fn artifacts(&self) -> &'a Artifacts {
        self.artifacts
    }

    pub fn policy(&self) -> SchemaPolicy {
        self.policy
    }

    /// Aligns `features` to the columns the artifacts were fitted with.
    pub fn prepare(&self, features: &FeatureVector) -> Result<Reindexed> {
        let expected = self.artifacts.expected_features(features);
        reindex(features, &expected, self.policy)
    }

    pub fn predict(&self, features: &FeatureVector) -> Result<f64> {
        let prepared = self.prepare(features)?;
        let prediction = self.artifacts.scale_and_predict(&prepared.vector)?;
        debug!(prediction, degraded = prepared.was_degraded(), "scaled and predicted");
        Ok(prediction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Regressor, StandardScaler};
    use ndarray::array;

    fn artifacts() -> Artifacts {
        let names = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        Artifacts::new(
            Box::new(StandardScaler::new(array![1.0, 1.0, 1.0], array![2.0, 2.0, 2.0])),
            Box::new(Regressor::linear(array![10.0, 20.0, 30.0], 500.0).with_feature_names(names)),
        )
    }

    #[test]
    fn missing_columns_are_zero_filled_before_scaling() {
        let artifacts = artifacts();
        let predictor = Predictor::new(&artifacts, SchemaPolicy::FillZero);
        let v: FeatureVector = [("c", 3.0), ("a", 5.0)].into_iter().collect();

        // scaled: a=2, b=-0.5, c=1
        assert_eq!(predictor.predict(&v).unwrap(), 500.0 + 20.0 - 10.0 + 30.0);
    }

    #[test]
    fn fail_policy_surfaces_incompatible_schema() {
        let artifacts = artifacts();
        let predictor = Predictor::new(&artifacts, SchemaPolicy::Fail);
        let v: FeatureVector = [("a", 5.0)].into_iter().collect();
        assert!(predictor.predict(&v).unwrap_err().is_schema_error());
    }

    #[test]
    fn unnamed_artifacts_reject_wrong_width() {
        let artifacts = Artifacts::new(
            Box::new(StandardScaler::new(array![0.0, 0.0], array![1.0, 1.0])),
            Box::new(Regressor::linear(array![1.0, 1.0], 0.0)),
        );
        let predictor = Predictor::new(&artifacts, SchemaPolicy::FillZero);
        let v: FeatureVector = [("x", 1.0), ("y", 1.0), ("z", 1.0)].into_iter().collect();
        let err = predictor.predict(&v).unwrap_err();
        assert!(err.is_schema_error());
        assert!(err.to_string().contains("x, y, z"));
    }

    #[test]
    fn repeated_predictions_are_identical() {
        let artifacts = artifacts();
        let predictor = Predictor::new(&artifacts, SchemaPolicy::FillZero);
        let v: FeatureVector = [("a", 1.3), ("b", 7.1), ("c", -2.4)].into_iter().collect();
        assert_eq!(predictor.predict(&v).unwrap(), predictor.predict(&v).unwrap());
    }
}

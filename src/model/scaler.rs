use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::FeatureScaler;

/// Per-column standardization: `(x - mean) / scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub mean: Array1<f64>,
    pub scale: Array1<f64>,
}

impl StandardScaler {
    pub fn new(mean: Array1<f64>, scale: Array1<f64>) -> Self {
        Self {
            feature_names: None,
            mean,
            scale,
        }
    }

    pub fn with_feature_names(mut self, names: Vec<String>) -> Self {
        self.feature_names = Some(names);
        self
    }

    /// Checks that the statistics agree with each other and with the names.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.mean.len() != self.scale.len() {
            return Err(format!(
                "mean has {} entries but scale has {}",
                self.mean.len(),
                self.scale.len()
            ));
        }
        if let Some(names) = &self.feature_names {
            if names.len() != self.mean.len() {
                return Err(format!(
                    "{} feature names for {} columns",
                    names.len(),
                    self.mean.len()
                ));
            }
        }
        Ok(())
    }
}

impl FeatureScaler for StandardScaler {
    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn n_features(&self) -> usize {
        self.mean.len()
    }

    fn transform(&self, x: ArrayView1<'_, f64>) -> Result<Array1<f64>> {
        if x.len() != self.mean.len() {
            return Err(Error::incompatible_schema(
                format!("{} features", self.mean.len()),
                format!("{} features", x.len()),
                "scaler transform",
            ));
        }
        // constant columns were fitted with zero variance
        let scale = self.scale.mapv(|s| if s == 0.0 { 1.0 } else { s });
        Ok((&x - &self.mean) / &scale)
    }

    fn describe(&self) -> String {
        format!("StandardScaler over {} features", self.mean.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn transform_standardizes_each_column() {
        let scaler = StandardScaler::new(array![10.0, 0.0], array![2.0, 4.0]);
        let out = scaler.transform(array![14.0, -8.0].view()).unwrap();
        assert_eq!(out, array![2.0, -2.0]);
    }

    #[test]
    fn zero_scale_is_treated_as_unit() {
        let scaler = StandardScaler::new(array![5.0], array![0.0]);
        let out = scaler.transform(array![7.0].view()).unwrap();
        assert_eq!(out, array![2.0]);
    }

    #[test]
    fn wrong_width_is_a_schema_error() {
        let scaler = StandardScaler::new(array![0.0, 0.0], array![1.0, 1.0]);
        let err = scaler.transform(array![1.0, 2.0, 3.0].view()).unwrap_err();
        assert!(err.is_schema_error());
    }

    #[test]
    fn validate_catches_mismatched_names() {
        let scaler = StandardScaler::new(array![0.0], array![1.0])
            .with_feature_names(vec!["a".into(), "b".into()]);
        assert!(scaler.validate().is_err());
    }
}

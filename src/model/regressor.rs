use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::UsageModel;

/// Fully connected layer, `weights` shaped `(inputs, outputs)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseLayer {
    pub weights: Array2<f64>,
    pub bias: Array1<f64>,
}

impl DenseLayer {
    fn forward(&self, x: &Array1<f64>) -> Array1<f64> {
        x.dot(&self.weights) + &self.bias
    }
}

/// Regression artifact formats understood by the runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regressor {
    Linear {
        #[serde(default)]
        feature_names: Option<Vec<String>>,
        coefficients: Array1<f64>,
        intercept: f64,
    },
    /// ReLU hidden layers, identity output with a single unit.
    Mlp {
        #[serde(default)]
        feature_names: Option<Vec<String>>,
        layers: Vec<DenseLayer>,
    },
}

impl Regressor {
    pub fn linear(coefficients: Array1<f64>, intercept: f64) -> Self {
        Self::Linear {
            feature_names: None,
            coefficients,
            intercept,
        }
    }

    pub fn with_feature_names(mut self, names: Vec<String>) -> Self {
        match &mut self {
            Self::Linear { feature_names, .. } | Self::Mlp { feature_names, .. } => {
                *feature_names = Some(names);
            }
        }
        self
    }

    /// Checks layer chaining and the single-output shape.
    pub fn validate(&self) -> std::result::Result<(), String> {
        match self {
            Self::Linear { .. } => {}
            Self::Mlp { layers, .. } => {
                if layers.is_empty() {
                    return Err("network has no layers".into());
                }
                for (i, layer) in layers.iter().enumerate() {
                    if layer.weights.ncols() != layer.bias.len() {
                        return Err(format!(
                            "layer {i}: {} outputs but {} biases",
                            layer.weights.ncols(),
                            layer.bias.len()
                        ));
                    }
                }
                for (i, pair) in layers.windows(2).enumerate() {
                    if pair[0].weights.ncols() != pair[1].weights.nrows() {
                        return Err(format!(
                            "layer {} emits {} values, layer {} expects {}",
                            i,
                            pair[0].weights.ncols(),
                            i + 1,
                            pair[1].weights.nrows()
                        ));
                    }
                }
                let outputs = layers.last().map_or(0, |l| l.weights.ncols());
                if outputs != 1 {
                    return Err(format!("network must emit one value, emits {outputs}"));
                }
            }
        }
        if let Some(names) = self.names() {
            if names.len() != self.n_features() {
                return Err(format!(
                    "{} feature names for {} inputs",
                    names.len(),
                    self.n_features()
                ));
            }
        }
        Ok(())
    }

    fn names(&self) -> Option<&[String]> {
        match self {
            Self::Linear { feature_names, .. } | Self::Mlp { feature_names, .. } => {
                feature_names.as_deref()
            }
        }
    }
}

fn relu(x: Array1<f64>) -> Array1<f64> {
    x.mapv_into(|v| if v > 0.0 { v } else { 0.0 })
}

impl UsageModel for Regressor {
    fn feature_names(&self) -> Option<&[String]> {
        self.names()
    }

    fn n_features(&self) -> usize {
        match self {
            Self::Linear { coefficients, .. } => coefficients.len(),
            Self::Mlp { layers, .. } => layers.first().map_or(0, |l| l.weights.nrows()),
        }
    }

    fn predict(&self, x: ArrayView1<'_, f64>) -> Result<f64> {
        if x.len() != self.n_features() {
            return Err(Error::incompatible_schema(
                format!("{} features", self.n_features()),
                format!("{} features", x.len()),
                "model predict",
            ));
        }
        match self {
            Self::Linear {
                coefficients,
                intercept,
                ..
            } => Ok(x.dot(coefficients) + intercept),
            Self::Mlp { layers, .. } => {
                let mut activation = x.to_owned();
                let last = layers.len().saturating_sub(1);
                for (i, layer) in layers.iter().enumerate() {
                    activation = layer.forward(&activation);
                    if i < last {
                        activation = relu(activation);
                    }
                }
                activation.first().copied().ok_or_else(|| Error::Runtime {
                    message: "network produced no output".into(),
                })
            }
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Linear { coefficients, .. } => {
                format!("linear regressor over {} features", coefficients.len())
            }
            Self::Mlp { layers, .. } => format!(
                "MLP regressor over {} features ({} layers)",
                self.n_features(),
                layers.len()
            ),
        }
    }
}

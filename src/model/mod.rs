//! Pre-fitted artifacts: a feature scaler and a usage regressor.
//!
//! Both are opaque to the runner beyond the two traits below; the concrete
//! formats exist so artifacts can be read from disk.

pub mod artifacts;
pub mod regressor;
pub mod scaler;

use ndarray::{Array1, ArrayView1};

use crate::error::Result;

pub use artifacts::{ArtifactPaths, Artifacts};
pub use regressor::{DenseLayer, Regressor};
pub use scaler::StandardScaler;

/// Normalizes a raw feature row with statistics fixed at load time.
pub trait FeatureScaler: Send + Sync {
    /// Column names the scaler was fitted with, if they were recorded.
    fn feature_names(&self) -> Option<&[String]>;

    fn n_features(&self) -> usize;

    fn transform(&self, x: ArrayView1<'_, f64>) -> Result<Array1<f64>>;

    fn describe(&self) -> String {
        format!("scaler over {} features", self.n_features())
    }
}

/// Maps a normalized feature row to a scalar usage estimate.
pub trait UsageModel: Send + Sync {
    fn feature_names(&self) -> Option<&[String]>;

    fn n_features(&self) -> usize;

    fn predict(&self, x: ArrayView1<'_, f64>) -> Result<f64>;

    fn describe(&self) -> String {
        format!("model over {} features", self.n_features())
    }
}

//! Machine Learning Module
//!
//! The generation model is pre-trained elsewhere and consumed read-only:
//! - `RegressionModel` is the seam every model implementation plugs into
//! - `Predictor` runs one batched inference per request and clamps the output
//! - `LinearRegressionModel` ships as the default, config-driven model
//! - a SmartCore random forest adapter is available behind the `ml` feature

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub mod inference;
pub mod models;

#[cfg(feature = "ml")]
pub mod smartcore;

pub use inference::*;
pub use models::*;

/// ML Model Type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ModelType {
    LinearRegression,
    RandomForest,
    GradientBoosting,
}

/// ML Model Metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_id: String,
    pub model_type: ModelType,
    pub version: String,
    pub feature_names: Vec<String>,
}

/// Feature Vector for ML models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub features: Vec<f64>,
    pub feature_names: Vec<String>,
}

impl FeatureVector {
    pub fn new(features: Vec<f64>, feature_names: Vec<String>) -> Result<Self> {
        if features.len() != feature_names.len() {
            anyhow::bail!(
                "Feature count mismatch: {} features, {} names",
                features.len(),
                feature_names.len()
            );
        }
        Ok(Self {
            features,
            feature_names,
        })
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Look up a feature by name
    pub fn get(&self, name: &str) -> Option<f64> {
        self.feature_names
            .iter()
            .position(|n| n == name)
            .map(|i| self.features[i])
    }
}

/// A pre-fit regression model
///
/// Implementations must be deterministic and return exactly one value per
/// input vector, in input order.
#[cfg_attr(test, mockall::automock)]
pub trait RegressionModel: Send + Sync {
    /// Predict one value per feature vector in a single batched call
    fn predict_batch(&self, batch: &[FeatureVector]) -> Result<Vec<f64>>;

    /// Get model metadata
    fn metadata(&self) -> &ModelMetadata;

    /// Get model type
    fn model_type(&self) -> ModelType {
        self.metadata().model_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_vector_creation() {
        let features = vec![1.0, 2.0, 3.0];
        let names = vec!["f1".to_string(), "f2".to_string(), "f3".to_string()];

        let fv = FeatureVector::new(features, names).unwrap();
        assert_eq!(fv.len(), 3);
        assert!(!fv.is_empty());
        assert_eq!(fv.get("f2"), Some(2.0));
        assert_eq!(fv.get("f4"), None);
    }

    #[test]
    fn test_feature_vector_name_mismatch() {
        let result = FeatureVector::new(vec![1.0, 2.0], vec!["f1".to_string()]);
        assert!(result.is_err());
    }
}

//! ML Model Definitions

use super::{FeatureVector, ModelMetadata, ModelType, RegressionModel};
use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::config::ModelConfig;
use crate::forecast::FEATURE_NAMES;

/// Simple Linear Regression Model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegressionModel {
    pub metadata: ModelMetadata,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearRegressionModel {
    pub fn new(coefficients: Vec<f64>, intercept: f64, metadata: ModelMetadata) -> Self {
        Self {
            metadata,
            coefficients,
            intercept,
        }
    }

    /// Build the generation model from its configured coefficients
    pub fn from_config(config: &ModelConfig) -> Result<Self> {
        if config.coefficients.len() != FEATURE_NAMES.len() {
            anyhow::bail!(
                "Model needs {} coefficients, config has {}",
                FEATURE_NAMES.len(),
                config.coefficients.len()
            );
        }

        let metadata = ModelMetadata {
            model_id: config.model_id.clone(),
            model_type: ModelType::LinearRegression,
            version: config.version.clone(),
            feature_names: FEATURE_NAMES.iter().map(|n| n.to_string()).collect(),
        };

        Ok(Self::new(
            config.coefficients.clone(),
            config.intercept,
            metadata,
        ))
    }

    fn evaluate(&self, features: &FeatureVector) -> Result<f64> {
        if features.len() != self.coefficients.len() {
            anyhow::bail!(
                "Feature count mismatch: expected {}, got {}",
                self.coefficients.len(),
                features.len()
            );
        }

        Ok(features
            .features
            .iter()
            .zip(self.coefficients.iter())
            .map(|(f, c)| f * c)
            .sum::<f64>()
            + self.intercept)
    }
}

impl RegressionModel for LinearRegressionModel {
    fn predict_batch(&self, batch: &[FeatureVector]) -> Result<Vec<f64>> {
        batch.iter().map(|f| self.evaluate(f)).collect()
    }

    fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}

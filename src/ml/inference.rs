//! ML Model Inference
//!
//! Runs the generation model over a request's feature rows.

use std::sync::Arc;
use tracing::debug;

use super::{FeatureVector, RegressionModel};
use crate::error::{ForecastError, Result};
use crate::forecast::FeatureRow;

/// Generation cannot be negative
pub fn clamp_non_negative(value: f64) -> f64 {
    value.max(0.0)
}

/// Batched inference over feature rows
#[derive(Clone)]
pub struct Predictor {
    model: Arc<dyn RegressionModel>,
}

impl Predictor {
    pub fn new(model: Arc<dyn RegressionModel>) -> Self {
        Self { model }
    }

    /// One clamped prediction per row, in row order
    ///
    /// Rows with a missing feature are rejected before the model is called,
    /// and a non-finite model output fails the batch instead of being clamped.
    pub fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let batch = rows
            .iter()
            .map(FeatureRow::to_feature_vector)
            .collect::<Result<Vec<FeatureVector>>>()?;

        let raw = self
            .model
            .predict_batch(&batch)
            .map_err(ForecastError::Model)?;

        if raw.len() != rows.len() {
            return Err(ForecastError::ModelOutputMismatch {
                expected: rows.len(),
                actual: raw.len(),
            });
        }

        if let Some(index) = raw.iter().position(|value| !value.is_finite()) {
            return Err(ForecastError::Model(anyhow::anyhow!(
                "non-finite prediction {} for row at {}",
                raw[index],
                rows[index].timestamp
            )));
        }

        debug!(
            model_id = %self.model.metadata().model_id,
            rows = rows.len(),
            "model inference complete"
        );

        Ok(raw.into_iter().map(clamp_non_negative).collect())
    }
}

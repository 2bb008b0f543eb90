//! SmartCore model adapter
//!
//! Wraps an already fitted SmartCore `RandomForestRegressor` so it can stand
//! in as the generation model.

use super::{FeatureVector, ModelMetadata, ModelType, RegressionModel};
use anyhow::Result;

use smartcore::ensemble::random_forest_regressor::RandomForestRegressor;
use smartcore::linalg::basic::matrix::DenseMatrix;

pub type FittedForest = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Fitted random forest behind the `RegressionModel` seam
pub struct SmartcoreRandomForest {
    metadata: ModelMetadata,
    model: FittedForest,
}

impl SmartcoreRandomForest {
    pub fn new(model: FittedForest, model_id: impl Into<String>, feature_names: Vec<String>) -> Self {
        Self {
            metadata: ModelMetadata {
                model_id: model_id.into(),
                model_type: ModelType::RandomForest,
                version: "1.0.0".to_string(),
                feature_names,
            },
            model,
        }
    }
}

impl RegressionModel for SmartcoreRandomForest {
    fn predict_batch(&self, batch: &[FeatureVector]) -> Result<Vec<f64>> {
        let Some(first) = batch.first() else {
            return Ok(Vec::new());
        };

        let n_features = first.len();
        let mut flat_data = Vec::with_capacity(batch.len() * n_features);
        for row in batch {
            if row.len() != n_features {
                anyhow::bail!("All feature vectors must have the same length");
            }
            flat_data.extend_from_slice(&row.features);
        }

        let x = DenseMatrix::new(batch.len(), n_features, flat_data, false);
        self.model
            .predict(&x)
            .map_err(|e| anyhow::anyhow!("RandomForest prediction failed: {:?}", e))
    }

    fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartcore::ensemble::random_forest_regressor::RandomForestRegressorParameters;

    #[test]
    fn test_forest_behind_regression_seam() {
        // y = 2x1 + 3x2
        let x: Vec<f64> = vec![
            1.0, 1.0, 2.0, 1.0, 1.0, 2.0, 2.0, 2.0, 3.0, 3.0, 4.0, 2.0, 2.0, 4.0, 3.0, 1.0, 1.0,
            3.0, 4.0, 4.0,
        ];
        let y: Vec<f64> = vec![5.0, 7.0, 8.0, 10.0, 15.0, 14.0, 14.0, 9.0, 11.0, 20.0];
        let params = RandomForestRegressorParameters {
            max_depth: Some(5),
            min_samples_leaf: 1,
            min_samples_split: 2,
            n_trees: 10,
            m: None,
            keep_samples: false,
            seed: 42,
        };
        let matrix = DenseMatrix::new(10, 2, x, false);
        let fitted = RandomForestRegressor::fit(&matrix, &y, params).unwrap();

        let names = vec!["x1".to_string(), "x2".to_string()];
        let model = SmartcoreRandomForest::new(fitted, "rf_test", names.clone());

        let batch = vec![
            FeatureVector::new(vec![2.0, 2.0], names.clone()).unwrap(),
            FeatureVector::new(vec![4.0, 4.0], names).unwrap(),
        ];
        let out = model.predict_batch(&batch).unwrap();

        assert_eq!(out.len(), 2);
        assert!(out[0] < out[1]);
        assert_eq!(model.model_type(), ModelType::RandomForest);
        assert!(model.predict_batch(&[]).unwrap().is_empty());
    }
}

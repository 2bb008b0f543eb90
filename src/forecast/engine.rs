use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    parse_observations, CalibrationTable, ClearSkyCalculator, DirectionDecoder, FeatureBuilder,
    IrradianceAdapter, ResultCalibrator, SkyCalculator,
};
use crate::config::Config;
use crate::domain::{
    InputRejection, Observation, PredictOutcome, PredictionResult, OBSERVATIONS_PER_REQUEST,
};
use crate::error::{ForecastError, Result};
use crate::ml::{Predictor, RegressionModel};

/// Runs a request through decoding, feature building, inference and calibration
///
/// Holds no per-request state; one engine can serve any number of requests.
pub struct ForecastEngine<C = ClearSkyCalculator> {
    features: FeatureBuilder<C>,
    predictor: Predictor,
    calibrator: ResultCalibrator,
}

impl ForecastEngine {
    pub fn new(
        model: Arc<dyn RegressionModel>,
        calibration: CalibrationTable,
        decoder: DirectionDecoder,
    ) -> Self {
        Self::with_calculator(ClearSkyCalculator::default(), model, calibration, decoder)
    }

    pub fn from_config(config: &Config, model: Arc<dyn RegressionModel>) -> Self {
        Self::new(
            model,
            config.calibration.table(),
            DirectionDecoder::from_limit(config.direction.max_terms),
        )
    }
}

impl<C: SkyCalculator> ForecastEngine<C> {
    pub fn with_calculator(
        calculator: C,
        model: Arc<dyn RegressionModel>,
        calibration: CalibrationTable,
        decoder: DirectionDecoder,
    ) -> Self {
        Self {
            features: FeatureBuilder::new(decoder, IrradianceAdapter::new(calculator)),
            predictor: Predictor::new(model),
            calibrator: ResultCalibrator::new(calibration),
        }
    }

    /// Forecast from a raw request payload
    ///
    /// A payload that is not two-dimensional yields `PredictOutcome::Rejected`
    /// without touching the model. Every other failure aborts the request.
    #[instrument(skip(self, data))]
    pub fn predict(&self, data: &serde_json::Value, site_id: i64) -> Result<PredictOutcome> {
        let observations = match parse_observations(data) {
            Err(ForecastError::InvalidInputShape) => {
                warn!("rejecting request: data is not a 2D list");
                return Ok(PredictOutcome::Rejected(InputRejection::not_two_dimensional()));
            }
            parsed => parsed?,
        };

        self.predict_observations(&observations, site_id)
            .map(PredictOutcome::Forecast)
    }

    /// Forecast from already parsed observations
    pub fn predict_observations(
        &self,
        observations: &[Observation],
        site_id: i64,
    ) -> Result<PredictionResult> {
        // Unknown sites fail before any model work is done
        self.calibrator.table().coefficient(site_id)?;

        if observations.len() != OBSERVATIONS_PER_REQUEST {
            warn!(
                count = observations.len(),
                expected = OBSERVATIONS_PER_REQUEST,
                "unexpected observation count"
            );
        }

        let rows = self.features.build(observations);
        let raw = self.predictor.predict(&rows)?;
        let result = self.calibrator.calibrate(site_id, &raw)?;

        info!(site_id, buckets = result.len(), "forecast complete");
        Ok(result)
    }
}

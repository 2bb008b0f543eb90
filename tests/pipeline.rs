//! End-to-end forecast pipeline tests
//!
//! Run against the reference day of readings for site 6.

use anyhow::Result;
use chrono::{DateTime, Timelike, Utc};
use mockall::mock;
use pv_forecast_features::config::ModelConfig;
use pv_forecast_features::domain::{
    ForecastRequest, InputRejection, PredictOutcome, SiteLocation, TimeBucket,
};
use pv_forecast_features::forecast::{
    CalibrationTable, ClearSkyCalculator, ClearSkyIrradiance, DirectionDecoder, SkyCalculator,
    SolarPosition,
};
use pv_forecast_features::ml::{
    FeatureVector, LinearRegressionModel, ModelMetadata, ModelType, RegressionModel,
};
use pv_forecast_features::{ForecastEngine, ForecastError};
use serde_json::json;
use std::sync::Arc;

mock! {
    Model {}

    impl RegressionModel for Model {
        fn predict_batch(&self, batch: &[FeatureVector]) -> Result<Vec<f64>>;
        fn metadata(&self) -> &ModelMetadata;
    }
}

/// Reference sky calculator with one local hour knocked out
struct GappySky {
    inner: ClearSkyCalculator,
    missing_local_hour: u32,
}

impl SkyCalculator for GappySky {
    fn solar_position(&self, site: &SiteLocation, at: DateTime<Utc>) -> Result<SolarPosition> {
        let local = at.with_timezone(&site.timezone);
        if local.hour() == self.missing_local_hour {
            anyhow::bail!("calculator offline");
        }
        self.inner.solar_position(site, at)
    }

    fn clear_sky(
        &self,
        site: &SiteLocation,
        at: DateTime<Utc>,
        position: &SolarPosition,
    ) -> Result<ClearSkyIrradiance> {
        self.inner.clear_sky(site, at, position)
    }
}

fn mock_model() -> MockModel {
    let mut model = MockModel::new();
    model.expect_metadata().return_const(ModelMetadata {
        model_id: "mock".to_string(),
        model_type: ModelType::GradientBoosting,
        version: "0".to_string(),
        feature_names: Vec::new(),
    });
    model
}

fn linear_engine() -> ForecastEngine {
    let model = LinearRegressionModel::from_config(&ModelConfig::default()).unwrap();
    ForecastEngine::new(
        Arc::new(model),
        CalibrationTable::default(),
        DirectionDecoder::new(),
    )
}

#[test]
fn reference_day_produces_five_labelled_buckets() {
    let request = ForecastRequest::reference_sample();
    let outcome = linear_engine().predict(&request.data, request.id).unwrap();
    let result = outcome.forecast().expect("reference request should forecast");

    let labels: Vec<&str> = result.iter().map(|(bucket, _)| bucket.label()).collect();
    assert_eq!(labels, vec!["5-8点", "8-11点", "11-14点", "14-17点", "17-20点"]);
    assert!(result.values().iter().all(|v| *v >= 0.0 && v.is_finite()));

    // Midday clear-sky irradiance dominates the early morning
    assert!(result.get(TimeBucket::Morning).unwrap() > result.get(TimeBucket::Dawn).unwrap());
}

#[test]
fn reference_day_serializes_in_bucket_order() {
    let request = ForecastRequest::reference_sample();
    let outcome = linear_engine().predict(&request.data, request.id).unwrap();
    let json = serde_json::to_string(&outcome).unwrap();

    let positions: Vec<usize> = ["5-8点", "8-11点", "11-14点", "14-17点", "17-20点"]
        .iter()
        .map(|label| json.find(label).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{json}");
}

#[test]
fn calibration_scales_raw_output_per_site() {
    let raw = [0.5, 1.5, 2.5, 3.5, 4.5];

    for site_id in 6..=10 {
        let mut model = mock_model();
        model.expect_predict_batch().returning(move |_| Ok(raw.to_vec()));

        let engine = ForecastEngine::new(
            Arc::new(model),
            CalibrationTable::default(),
            DirectionDecoder::new(),
        );
        let request = ForecastRequest::reference_sample();
        let outcome = engine.predict(&request.data, site_id).unwrap();
        let result = outcome.forecast().unwrap();

        let coefficient = CalibrationTable::default().coefficient(site_id).unwrap();
        let expected: Vec<f64> = raw.iter().map(|v| v * coefficient).collect();
        assert_eq!(result.values(), expected);
    }
}

#[test]
fn repeated_requests_are_identical() {
    let engine = linear_engine();
    let request = ForecastRequest::reference_sample();

    let first = engine.predict(&request.data, request.id).unwrap();
    let second = engine.predict(&request.data, request.id).unwrap();
    assert_eq!(first, second);
}

#[test]
fn malformed_payloads_are_rejected_without_inference() {
    let payloads = [
        json!([4.7, 93.0, 3.0, 6.0, "北风", 1018.2, "2024-02-24 05:00:00"]),
        json!([
            [4.7, 93.0, 3.0, 6.0, "北风", 1018.2, "2024-02-24 05:00:00"],
            [5.5, 89.0, 1.0, 5.0]
        ]),
        json!("not a list"),
        json!([
            [[4.7], [93.0], [3.0], [6.0], ["北风"], [1018.2], ["2024-02-24 05:00:00"]],
            [[5.5], [89.0], [1.0], [5.0], ["北风"], [1014.64], ["2024-02-24 08:00:00"]]
        ]),
    ];

    for data in payloads {
        let mut model = mock_model();
        model.expect_predict_batch().never();

        let engine = ForecastEngine::new(
            Arc::new(model),
            CalibrationTable::default(),
            DirectionDecoder::new(),
        );
        let outcome = engine.predict(&data, 6).unwrap();
        assert_eq!(
            outcome,
            PredictOutcome::Rejected(InputRejection::not_two_dimensional())
        );
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"msg": "Invalid input: Data should be a 2D list.", "code": 400})
        );
    }
}

#[test]
fn non_finite_readings_never_reach_the_model() {
    for bad in ["NaN", "inf", "-inf"] {
        let mut model = mock_model();
        model.expect_predict_batch().never();

        let engine = ForecastEngine::new(
            Arc::new(model),
            CalibrationTable::default(),
            DirectionDecoder::new(),
        );
        let mut request = ForecastRequest::reference_sample();
        request.data[1][0] = json!(bad);

        let err = engine.predict(&request.data, request.id).unwrap_err();
        assert!(matches!(
            err,
            ForecastError::InvalidObservation { row: 1, field: "temperature", .. }
        ));
    }
}

#[test]
fn unknown_site_aborts() {
    let request = ForecastRequest::reference_sample();
    let err = linear_engine().predict(&request.data, 5).unwrap_err();
    assert!(matches!(err, ForecastError::UnknownSite(5)));
}

#[test]
fn missing_irradiance_is_fatal() {
    let model = LinearRegressionModel::from_config(&ModelConfig::default()).unwrap();
    let engine = ForecastEngine::with_calculator(
        GappySky {
            inner: ClearSkyCalculator::default(),
            missing_local_hour: 14,
        },
        Arc::new(model),
        CalibrationTable::default(),
        DirectionDecoder::new(),
    );

    let request = ForecastRequest::reference_sample();
    let err = engine.predict(&request.data, request.id).unwrap_err();
    assert!(matches!(
        err,
        ForecastError::IncompleteFeatureRow { feature: "irradiance", .. }
    ));
}

#[test]
fn term_limit_changes_direction_features() {
    let captured = Arc::new(std::sync::Mutex::new(Vec::new()));

    let mut model = mock_model();
    let sink = Arc::clone(&captured);
    model.expect_predict_batch().returning(move |batch| {
        sink.lock()
            .unwrap()
            .extend(batch.iter().map(|f| f.get("wind_east_west").unwrap()));
        Ok(vec![0.0; batch.len()])
    });

    let engine = ForecastEngine::new(
        Arc::new(model),
        CalibrationTable::default(),
        DirectionDecoder::with_term_limit(2),
    );
    let request = ForecastRequest::reference_sample();
    engine.predict(&request.data, request.id).unwrap();

    // 从西北偏西方向吹来的风: only 西 and 北 count
    assert_eq!(captured.lock().unwrap()[0], -1.0);
}

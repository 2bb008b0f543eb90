//! Feature engineering for the generation model
//!
//! Observations are decoded, joined with plane-of-array irradiance on their
//! timestamp and paired with the reading that precedes them. The first
//! observation of a request only ever serves as the lag of the second.

use chrono::{NaiveDateTime, Timelike};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use super::direction::DirectionDecoder;
use super::irradiance::{ClearSkyCalculator, IrradianceAdapter, SkyCalculator};
use crate::domain::{floor_to_minute, Observation, PanelGeometry, SiteLocation};
use crate::error::{ForecastError, Result};
use crate::ml::FeatureVector;

/// Model input order. Changing it invalidates every trained model.
pub const FEATURE_NAMES: [&str; 17] = [
    "temperature",
    "humidity",
    "wind_speed",
    "precipitation",
    "wind_east_west",
    "wind_north_south",
    "irradiance",
    "pressure",
    "hour",
    "temperature_previous",
    "humidity_previous",
    "wind_speed_previous",
    "precipitation_previous",
    "wind_east_west_previous",
    "wind_north_south_previous",
    "irradiance_previous",
    "pressure_previous",
];

/// The eight lagged quantities of one observation after decoding and join
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub temperature_c: f64,
    pub humidity_percent: f64,
    pub wind_speed_ms: f64,
    pub precipitation_mm: f64,
    pub wind_east_west: f64,
    pub wind_north_south: f64,
    pub pressure_hpa: f64,
    /// Plane-of-array irradiance (W/m²), `None` when no sample matched
    pub irradiance_w_m2: Option<f64>,
}

impl Reading {
    /// Values in model order (without hour)
    ///
    /// A missing irradiance or any non-finite value is reported by feature name.
    fn model_values(&self, timestamp: NaiveDateTime, lagged: bool) -> Result<[f64; 8]> {
        let values = [
            self.temperature_c,
            self.humidity_percent,
            self.wind_speed_ms,
            self.precipitation_mm,
            self.wind_east_west,
            self.wind_north_south,
            self.irradiance_w_m2.unwrap_or(f64::NAN),
            self.pressure_hpa,
        ];

        // Lagged names start after the 8 current values and hour
        let offset = if lagged { 9 } else { 0 };
        match values.iter().position(|value| !value.is_finite()) {
            Some(index) => Err(ForecastError::IncompleteFeatureRow {
                timestamp,
                feature: FEATURE_NAMES[offset + index],
            }),
            None => Ok(values),
        }
    }
}

/// One model input row: a reading, its hour of day and the reading before it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub timestamp: NaiveDateTime,
    pub hour: u32,
    pub current: Reading,
    pub previous: Reading,
}

impl FeatureRow {
    /// Flatten into the 17 model features
    ///
    /// Fails with `IncompleteFeatureRow` rather than feeding a gap to the model.
    pub fn to_feature_vector(&self) -> Result<FeatureVector> {
        let current = self.current.model_values(self.timestamp, false)?;
        let previous = self.previous.model_values(self.timestamp, true)?;

        let features: Vec<f64> = current
            .into_iter()
            .chain(std::iter::once(self.hour as f64))
            .chain(previous)
            .collect();

        Ok(FeatureVector {
            features,
            feature_names: FEATURE_NAMES.iter().map(|n| n.to_string()).collect(),
        })
    }
}

/// Builds feature rows for one request window
#[derive(Debug, Clone)]
pub struct FeatureBuilder<C = ClearSkyCalculator> {
    decoder: DirectionDecoder,
    irradiance: IrradianceAdapter<C>,
    site: SiteLocation,
    geometry: PanelGeometry,
}

impl<C: SkyCalculator> FeatureBuilder<C> {
    /// Builder for the reference site and panel geometry
    pub fn new(decoder: DirectionDecoder, irradiance: IrradianceAdapter<C>) -> Self {
        Self {
            decoder,
            irradiance,
            site: SiteLocation::reference(),
            geometry: PanelGeometry::reference(),
        }
    }

    /// One row per observation except the first, in input order
    ///
    /// Observations are expected in chronological order. Fewer than two
    /// observations yield no rows.
    pub fn build(&self, observations: &[Observation]) -> Vec<FeatureRow> {
        if observations.len() < 2 {
            return Vec::new();
        }
        let start = floor_to_minute(observations[0].timestamp);
        let end = floor_to_minute(observations[observations.len() - 1].timestamp);

        let irradiance: HashMap<NaiveDateTime, f64> = self
            .irradiance
            .irradiance(&self.site, start, end, &self.geometry)
            .into_iter()
            .map(|sample| (sample.timestamp, sample.poa_global))
            .collect();

        let rows: Vec<FeatureRow> = observations
            .iter()
            .map(|obs| (obs, self.reading(obs, &irradiance)))
            .tuple_windows()
            .map(|((_, previous), (obs, current))| {
                let timestamp = floor_to_minute(obs.timestamp);
                FeatureRow {
                    timestamp,
                    hour: timestamp.hour(),
                    current,
                    previous,
                }
            })
            .collect();

        debug!(
            observations = observations.len(),
            rows = rows.len(),
            irradiance_samples = irradiance.len(),
            "built feature rows"
        );
        rows
    }

    fn reading(&self, obs: &Observation, irradiance: &HashMap<NaiveDateTime, f64>) -> Reading {
        let direction = self.decoder.decode(obs.wind_direction.as_deref());
        Reading {
            temperature_c: obs.temperature_c,
            humidity_percent: obs.humidity_percent,
            wind_speed_ms: obs.wind_speed_ms,
            precipitation_mm: obs.precipitation_mm,
            wind_east_west: direction.east_west as f64,
            wind_north_south: direction.north_south as f64,
            pressure_hpa: obs.pressure_hpa,
            irradiance_w_m2: irradiance.get(&floor_to_minute(obs.timestamp)).copied(),
        }
    }
}

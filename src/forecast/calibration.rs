//! Site calibration and time-bucket labelling

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{EnumCount, IntoEnumIterator};
use tracing::debug;

use crate::domain::{PredictionResult, TimeBucket};
use crate::error::{ForecastError, Result};

/// Correction factor for one deployed site
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SiteCalibration {
    pub id: i64,
    pub coefficient: f64,
}

/// Multiplicative bias correction per site, read-only once built
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationTable {
    coefficients: BTreeMap<i64, f64>,
}

impl CalibrationTable {
    pub fn new(sites: impl IntoIterator<Item = SiteCalibration>) -> Self {
        Self {
            coefficients: sites
                .into_iter()
                .map(|site| (site.id, site.coefficient))
                .collect(),
        }
    }

    /// Fitted coefficients of the five reference sites
    pub fn reference_sites() -> Vec<SiteCalibration> {
        [
            (6, 0.959014404167615),
            (7, 0.9857749303856512),
            (8, 0.9521389470967903),
            (9, 1.1665365077382621),
            (10, 0.9365352106116819),
        ]
        .into_iter()
        .map(|(id, coefficient)| SiteCalibration { id, coefficient })
        .collect()
    }

    pub fn coefficient(&self, site_id: i64) -> Result<f64> {
        self.coefficients
            .get(&site_id)
            .copied()
            .ok_or(ForecastError::UnknownSite(site_id))
    }

    pub fn site_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.coefficients.keys().copied()
    }
}

impl Default for CalibrationTable {
    fn default() -> Self {
        Self::new(Self::reference_sites())
    }
}

/// Scales raw model output for a site and labels it by time bucket
#[derive(Debug, Clone, Default)]
pub struct ResultCalibrator {
    table: CalibrationTable,
}

impl ResultCalibrator {
    pub fn new(table: CalibrationTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &CalibrationTable {
        &self.table
    }

    /// Buckets are independent; values are not accumulated across the day.
    pub fn calibrate(&self, site_id: i64, raw: &[f64]) -> Result<PredictionResult> {
        let coefficient = self.table.coefficient(site_id)?;
        let calibrated: Vec<f64> = raw.iter().map(|value| value * coefficient).collect();

        if calibrated.len() != TimeBucket::COUNT {
            return Err(ForecastError::ShapeMismatch {
                expected: TimeBucket::COUNT,
                actual: calibrated.len(),
            });
        }

        debug!(site_id, coefficient, "calibrated predictions");
        Ok(PredictionResult::new(TimeBucket::iter().zip(calibrated)))
    }
}

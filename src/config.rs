use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::forecast::{CalibrationTable, SiteCalibration};

pub const CONFIG_FILE: &str = "config/default.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub calibration: CalibrationConfig,
    pub direction: DirectionConfig,
    pub model: ModelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationConfig {
    pub sites: Vec<SiteCalibration>,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            sites: CalibrationTable::reference_sites(),
        }
    }
}

impl CalibrationConfig {
    pub fn table(&self) -> CalibrationTable {
        CalibrationTable::new(self.sites.iter().copied())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirectionConfig {
    /// Count only the first N direction terms of a text; unset counts all
    pub max_terms: Option<usize>,
}

/// Coefficients of the linear generation model, in feature order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub model_id: String,
    pub version: String,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_id: "pv_generation_linear".to_string(),
            version: "1.0.0".to_string(),
            coefficients: vec![
                0.04,   // temperature
                -0.01,  // humidity
                -0.02,  // wind_speed
                -0.05,  // precipitation
                0.0,    // wind_east_west
                0.0,    // wind_north_south
                0.012,  // irradiance
                0.0,    // pressure
                0.0,    // hour
                0.01,   // temperature_previous
                -0.005, // humidity_previous
                0.0,    // wind_speed_previous
                -0.02,  // precipitation_previous
                0.0,    // wind_east_west_previous
                0.0,    // wind_north_south_previous
                0.004,  // irradiance_previous
                0.0,    // pressure_previous
            ],
            intercept: 0.5,
        }
    }
}

impl Config {
    /// Built-in defaults, then `config/default.toml`, then `PVF__` env vars
    pub fn figment() -> Figment {
        Self::figment_with(CONFIG_FILE)
    }

    pub fn figment_with(path: impl AsRef<Path>) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("PVF__").split("__"))
    }

    pub fn load() -> Result<Self> {
        Ok(Self::figment().extract()?)
    }
}

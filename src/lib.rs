//! Feature pipeline for short-horizon solar generation forecasts
//!
//! Turns a day of 3-hourly weather readings into model features, runs a
//! pre-trained regression model over them and returns calibrated
//! generation estimates per time bucket.

pub mod config;
pub mod domain;
pub mod error;
pub mod forecast;
pub mod ml;
pub mod telemetry;

pub use error::{ForecastError, Result};
pub use forecast::ForecastEngine;

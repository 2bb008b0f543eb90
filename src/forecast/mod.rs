//! Forecast pipeline
//!
//! raw rows -> observations -> feature rows -> model output -> calibrated buckets

pub mod calibration;
pub mod direction;
pub mod engine;
pub mod features;
pub mod input;
pub mod irradiance;

pub use calibration::*;
pub use direction::*;
pub use engine::*;
pub use features::*;
pub use input::*;
pub use irradiance::*;

//! Plane-of-array irradiance for the panel array
//!
//! Solar position and clear-sky irradiance come from a [`SkyCalculator`];
//! this module walks the request window in 3-hour steps, handles the
//! timezone round trip and transposes the clear-sky components onto the
//! tilted panel surface.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Duration, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use spa_sra::spa::{Function, Input, SpaData};
use tracing::{debug, warn};

use crate::domain::{PanelGeometry, SiteLocation};

/// Spacing of irradiance samples, matching the observation cadence
pub const SAMPLE_INTERVAL_HOURS: i64 = 3;

/// Longest window sampled for one request
pub const MAX_WINDOW_HOURS: i64 = 24;

/// Sun position as seen from the site
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolarPosition {
    /// Angle from the vertical (degrees)
    pub zenith_deg: f64,
    /// Degrees clockwise from North
    pub azimuth_deg: f64,
}

/// Clear-sky irradiance components (W/m²)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClearSkyIrradiance {
    /// Global horizontal
    pub ghi: f64,
    /// Direct normal
    pub dni: f64,
    /// Diffuse horizontal
    pub dhi: f64,
}

/// Irradiance on the panel surface at one site-local timestamp
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IrradianceSample {
    pub timestamp: NaiveDateTime,
    /// Total plane-of-array irradiance (W/m²)
    pub poa_global: f64,
}

/// Astronomical calculator consulted for each sample
#[cfg_attr(test, mockall::automock)]
pub trait SkyCalculator: Send + Sync {
    fn solar_position(&self, site: &SiteLocation, at: DateTime<Utc>) -> Result<SolarPosition>;

    fn clear_sky(
        &self,
        site: &SiteLocation,
        at: DateTime<Utc>,
        position: &SolarPosition,
    ) -> Result<ClearSkyIrradiance>;
}

/// Clear-sky calculator on top of NREL SPA
///
/// Solar position comes from the NREL Solar Position Algorithm, with the
/// zenith corrected for atmospheric refraction. Direct normal irradiance
/// follows the Meinel attenuation with Kasten-Young air mass; diffuse is a
/// fixed fraction of the direct beam.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClearSkyCalculator {
    /// Clear-sky atmospheric transmittance (typically 0.7)
    pub transmittance: f64,
    /// Diffuse horizontal as a fraction of direct normal
    pub diffuse_ratio: f64,
    /// Mean annual pressure used for refraction (hPa)
    pub pressure_hpa: f64,
    /// Mean annual temperature used for refraction (Celsius)
    pub temperature_c: f64,
}

impl Default for ClearSkyCalculator {
    fn default() -> Self {
        Self {
            transmittance: 0.7,
            diffuse_ratio: 0.1,
            pressure_hpa: 1013.25,
            temperature_c: 12.0,
        }
    }
}

impl ClearSkyCalculator {
    const SOLAR_CONSTANT: f64 = 1367.0; // W/m²

    /// Kasten-Young relative optical air mass
    fn air_mass(zenith_deg: f64) -> f64 {
        1.0 / (zenith_deg.to_radians().cos() + 0.50572 * (96.07995 - zenith_deg).powf(-1.6364))
    }
}

impl SkyCalculator for ClearSkyCalculator {
    fn solar_position(&self, site: &SiteLocation, at: DateTime<Utc>) -> Result<SolarPosition> {
        let mut input = Input::from_date_time(at.with_timezone(&Local));
        input.latitude = site.latitude;
        input.longitude = site.longitude;
        input.pressure = self.pressure_hpa;
        input.temperature = self.temperature_c;
        input.elevation = 0.0;
        input.slope = 0.0;
        input.azm_rotation = 0.0;
        input.function = Function::SpaZaInc;

        let mut spa = SpaData::new(input);
        spa.spa_calculate()
            .map_err(|e| anyhow!("solar position at {at}: {e}"))?;

        // Topocentric zenith already includes the refraction correction
        Ok(SolarPosition {
            zenith_deg: spa.spa_za.zenith,
            azimuth_deg: spa.spa_za.azimuth,
        })
    }

    fn clear_sky(
        &self,
        _site: &SiteLocation,
        _at: DateTime<Utc>,
        position: &SolarPosition,
    ) -> Result<ClearSkyIrradiance> {
        if position.zenith_deg >= 90.0 {
            return Ok(ClearSkyIrradiance::default());
        }

        let air_mass = Self::air_mass(position.zenith_deg);
        let dni = Self::SOLAR_CONSTANT * self.transmittance.powf(air_mass.powf(0.678));
        let dhi = self.diffuse_ratio * dni;
        let ghi = dni * position.zenith_deg.to_radians().cos() + dhi;

        Ok(ClearSkyIrradiance { ghi, dni, dhi })
    }
}

/// Total irradiance on a tilted surface, isotropic sky model
///
/// Sum of the beam component projected onto the panel normal, the sky
/// diffuse seen by the panel and the ground-reflected component.
pub fn plane_of_array(
    geometry: &PanelGeometry,
    position: &SolarPosition,
    sky: &ClearSkyIrradiance,
) -> f64 {
    let tilt = geometry.tilt_deg.to_radians();
    let zenith = position.zenith_deg.to_radians();

    let cos_incidence = zenith.cos() * tilt.cos()
        + zenith.sin()
            * tilt.sin()
            * (position.azimuth_deg - geometry.azimuth_deg).to_radians().cos();

    let beam = (sky.dni * cos_incidence).max(0.0);
    let sky_diffuse = sky.dhi * (1.0 + tilt.cos()) / 2.0;
    let ground_reflected = sky.ghi * geometry.albedo * (1.0 - tilt.cos()) / 2.0;

    beam + sky_diffuse + ground_reflected
}

/// Produces the irradiance series the feature builder joins against
#[derive(Debug, Clone, Default)]
pub struct IrradianceAdapter<C = ClearSkyCalculator> {
    calculator: C,
}

impl<C: SkyCalculator> IrradianceAdapter<C> {
    pub fn new(calculator: C) -> Self {
        Self { calculator }
    }

    /// One sample every 3 hours from `start` through `end`, both site-local
    ///
    /// Timestamps the calculator cannot serve are left out of the series,
    /// so the join downstream sees them as missing. A window longer than
    /// [`MAX_WINDOW_HOURS`] yields no samples at all.
    pub fn irradiance(
        &self,
        site: &SiteLocation,
        start: NaiveDateTime,
        end: NaiveDateTime,
        geometry: &PanelGeometry,
    ) -> Vec<IrradianceSample> {
        if end.signed_duration_since(start) > Duration::hours(MAX_WINDOW_HOURS) {
            warn!(%start, %end, "irradiance window too long, not sampling");
            return Vec::new();
        }

        let step = Duration::hours(SAMPLE_INTERVAL_HOURS);
        let mut samples = Vec::new();
        let mut next = Some(start);

        while let Some(local) = next.filter(|local| *local <= end) {
            match self.sample_at(site, local, geometry) {
                Ok(sample) => samples.push(sample),
                Err(err) => warn!(timestamp = %local, error = %err, "irradiance unavailable"),
            }
            next = local.checked_add_signed(step);
        }

        debug!(count = samples.len(), %start, %end, "computed irradiance samples");
        samples
    }

    fn sample_at(
        &self,
        site: &SiteLocation,
        local: NaiveDateTime,
        geometry: &PanelGeometry,
    ) -> Result<IrradianceSample> {
        let zoned = site
            .timezone
            .from_local_datetime(&local)
            .single()
            .with_context(|| format!("{local} does not map to a single instant in {}", site.timezone))?;
        let at = zoned.with_timezone(&Utc);

        let position = self
            .calculator
            .solar_position(site, at)
            .context("solar position")?;
        let sky = self
            .calculator
            .clear_sky(site, at, &position)
            .context("clear-sky irradiance")?;

        Ok(IrradianceSample {
            timestamp: zoned.naive_local(),
            poa_global: plane_of_array(geometry, &position, &sky),
        })
    }
}

use chrono_tz::Tz;

/// Geographic location of a PV installation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SiteLocation {
    /// Latitude (degrees, positive = North)
    pub latitude: f64,
    /// Longitude (degrees, positive = East)
    pub longitude: f64,
    /// Zone the observation timestamps are expressed in
    pub timezone: Tz,
}

impl SiteLocation {
    /// The single deployed plant
    pub fn reference() -> Self {
        Self {
            latitude: 27.962847,
            longitude: 120.736522,
            timezone: chrono_tz::Asia::Shanghai,
        }
    }
}

/// Orientation of the panel array
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelGeometry {
    /// Tilt from horizontal (degrees)
    pub tilt_deg: f64,
    /// Surface azimuth (degrees, 0 = North, 180 = South)
    pub azimuth_deg: f64,
    /// Ground reflectance used for the reflected component
    pub albedo: f64,
}

impl PanelGeometry {
    /// 25 degree tilt, south facing
    pub fn reference() -> Self {
        Self {
            tilt_deg: 25.0,
            azimuth_deg: 180.0,
            albedo: 0.25,
        }
    }
}

//! GPS fix source

use roverlink_shared::GpsFix;

/// Simplified GPS receiver holding the last fix
#[derive(Debug, Clone)]
pub struct GpsModule {
    last_fix: GpsFix,
}

impl Default for GpsModule {
    fn default() -> Self {
        Self {
            last_fix: GpsFix {
                lat: 55.751244,
                lon: 37.618423,
                speed_mps: 0.0,
                hdop: 0.8,
            },
        }
    }
}

impl GpsModule {
    pub fn read_fix(&self) -> GpsFix {
        self.last_fix
    }

    /// Take the first parsed point as the new fix
    pub fn update_from_points<I>(&mut self, points: I) -> Option<GpsFix>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let (lat, lon) = points.into_iter().next()?;
        self.last_fix = GpsFix {
            lat,
            lon,
            speed_mps: 0.8,
            hdop: 1.2,
        };
        Some(self.last_fix)
    }
}

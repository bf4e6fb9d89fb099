use serde::{Deserialize, Serialize};

/// A constant wind vector in east/north components (m/s).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub east: f64,
    pub north: f64,
}

/// Polar form of a wind vector for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindSpeedDirection {
    /// Wind speed (m/s).
    pub speed: f64,
    /// Direction the wind blows from, in degrees in `[0, 360)`.
    /// Wind from due north is 0, wind from due east is 90.
    pub direction: f64,
}

impl Wind {
    pub fn new(east: f64, north: f64) -> Self {
        Wind { east, north }
    }

    /// Converts the vector into speed and meteorological "from" direction.
    pub fn speed_direction(&self) -> WindSpeedDirection {
        let speed = self.east.hypot(self.north);
        let mut direction = (-self.east).atan2(-self.north).to_degrees();
        if direction < 0.0 {
            direction += 360.0;
        }
        WindSpeedDirection { speed, direction }
    }
}

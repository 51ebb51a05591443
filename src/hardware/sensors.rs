//! Ultrasonic proximity sensor

/// One distance sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleReading {
    pub distance_cm: f64,
    pub is_blocked: bool,
}

#[derive(Debug, Clone)]
pub struct UltrasonicSensor {
    stop_distance_cm: f64,
    distance_cm: f64,
}

impl Default for UltrasonicSensor {
    fn default() -> Self {
        Self::new(70.0)
    }
}

impl UltrasonicSensor {
    pub fn new(stop_distance_cm: f64) -> Self {
        Self {
            stop_distance_cm,
            distance_cm: 120.0,
        }
    }

    pub fn read_distance(&self) -> ObstacleReading {
        ObstacleReading {
            distance_cm: self.distance_cm,
            is_blocked: self.distance_cm <= self.stop_distance_cm,
        }
    }

    pub fn set_simulated_distance(&mut self, distance_cm: f64) {
        self.distance_cm = distance_cm;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocked_at_threshold() {
        let mut sonar = UltrasonicSensor::default();
        assert!(!sonar.read_distance().is_blocked);

        sonar.set_simulated_distance(70.0);
        assert!(sonar.read_distance().is_blocked);
    }
}

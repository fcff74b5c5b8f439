use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    calibration::{CalibrationPoint, ServoCalibration},
    error::CalibrationError,
    servo::ServoConverter,
};

/// Calibration for one servo as it appears in a config file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServoConfig {
    pub pin: u8,
    pub min: CalibrationPoint,
    pub mid: CalibrationPoint,
    pub max: CalibrationPoint,
}

impl ServoConfig {
    pub fn calibration(&self) -> Result<ServoCalibration, CalibrationError> {
        ServoCalibration::new(self.min, self.mid, self.max)
    }

    pub fn build(&self) -> Result<ServoConverter<u8>, CalibrationError> {
        Ok(ServoConverter::with_calibration(
            self.pin,
            self.calibration()?,
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanTiltConfig {
    pub pan: ServoConfig,
    pub tilt: ServoConfig,
}

impl PanTiltConfig {
    /// Parses and validates both servos' calibration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: PanTiltConfig = serde_json::from_str(json).map_err(ConfigError::Parse)?;
        cfg.pan
            .calibration()
            .map_err(|e| ConfigError::Calibration("pan", e))?;
        cfg.tilt
            .calibration()
            .map_err(|e| ConfigError::Calibration("tilt", e))?;
        log::info!("loaded pan/tilt config: pan pin {}, tilt pin {}", cfg.pan.pin, cfg.tilt.pin);
        Ok(cfg)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(ConfigError::Parse)
    }

    pub fn build(&self) -> Result<(ServoConverter<u8>, ServoConverter<u8>), CalibrationError> {
        Ok((self.pan.build()?, self.tilt.build()?))
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    /// Axis name and the calibration problem found on it.
    Calibration(&'static str, CalibrationError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "Error in parsing config: {}", e),
            Self::Calibration(axis, e) => write!(f, "Invalid {} calibration: {}", axis, e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            Self::Calibration(_, e) => Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::fake::RecordingDriver;

    const CONFIG: &str = r#"{
        "pan": {
            "pin": 17,
            "min": { "angle_deg": 0.0, "pulse_width_us": 600.0 },
            "mid": { "angle_deg": 90.0, "pulse_width_us": 1500.0 },
            "max": { "angle_deg": 180.0, "pulse_width_us": 2400.0 }
        },
        "tilt": {
            "pin": 18,
            "min": { "angle_deg": 40.0, "pulse_width_us": 1000.0 },
            "mid": { "angle_deg": 90.0, "pulse_width_us": 1450.0 },
            "max": { "angle_deg": 140.0, "pulse_width_us": 1900.0 }
        }
    }"#;

    #[test]
    fn test_from_json() {
        let cfg = PanTiltConfig::from_json(CONFIG).unwrap();
        assert_eq!(cfg.pan.pin, 17);
        assert_eq!(cfg.tilt.mid, CalibrationPoint::new(90.0, 1450.0));
    }

    #[test]
    fn test_build_and_drive() {
        let (mut pan, mut tilt) = PanTiltConfig::from_json(CONFIG).unwrap().build().unwrap();
        let mut driver = RecordingDriver::new(10.0);

        pan.issue_command(&mut driver, 45.0).unwrap();
        tilt.issue_command(&mut driver, 0.0).unwrap();

        assert_eq!(pan.last_pulse_width_us(), Some(1050.0));
        // below tilt's calibrated range, saturates to its min
        assert_eq!(tilt.last_pulse_width_us(), Some(1000.0));
        assert_eq!(driver.writes[1].pin, 18);
    }

    #[test]
    fn test_invalid_calibration_rejected_at_load() {
        let bad = CONFIG.replace("\"angle_deg\": 140.0", "\"angle_deg\": 190.0");
        match PanTiltConfig::from_json(&bad) {
            Err(ConfigError::Calibration(axis, e)) => {
                assert_eq!(axis, "tilt");
                assert_eq!(e, CalibrationError::MaxAboveLimit);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_malformed_json() {
        let err = PanTiltConfig::from_json("{ \"pan\": 3 }").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("Error in parsing config"));
    }

    #[test]
    fn test_round_trip() {
        let cfg = PanTiltConfig::from_json(CONFIG).unwrap();
        let again = PanTiltConfig::from_json(&cfg.to_json().unwrap()).unwrap();
        assert_eq!(cfg, again);
    }
}

#[cfg(feature = "std")]
use serde::{Deserialize, Serialize};

use crate::{error::CalibrationError, MAX_ANGLE_DEG, MIN_ANGLE_DEG};

/// A measured angle <-> pulse width correspondence for one servo.
#[cfg_attr(feature = "no_std", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationPoint {
    pub angle_deg: f32,
    pub pulse_width_us: f32,
}

impl CalibrationPoint {
    pub const fn new(angle_deg: f32, pulse_width_us: f32) -> Self {
        Self {
            angle_deg,
            pulse_width_us,
        }
    }
}

impl From<(f32, f32)> for CalibrationPoint {
    fn from((angle_deg, pulse_width_us): (f32, f32)) -> Self {
        Self::new(angle_deg, pulse_width_us)
    }
}

/// Three anchor points for a two segment piecewise linear angle to pulse
/// width map. Only constructible through [`ServoCalibration::new`], so a held
/// value always satisfies `0 <= min < mid < max <= 180` on the angle axis.
#[cfg_attr(feature = "no_std", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServoCalibration {
    min: CalibrationPoint,
    mid: CalibrationPoint,
    max: CalibrationPoint,
}

impl ServoCalibration {
    pub fn new(
        min: CalibrationPoint,
        mid: CalibrationPoint,
        max: CalibrationPoint,
    ) -> Result<Self, CalibrationError> {
        // written as negated comparisons so NaN angles are refused too
        if !(min.angle_deg >= MIN_ANGLE_DEG) {
            return Err(CalibrationError::NegativeMinAngle);
        }
        if !(mid.angle_deg > min.angle_deg) {
            return Err(CalibrationError::MidNotAboveMin);
        }
        if !(mid.angle_deg < max.angle_deg) {
            return Err(CalibrationError::MidNotBelowMax);
        }
        if !(max.angle_deg <= MAX_ANGLE_DEG) {
            return Err(CalibrationError::MaxAboveLimit);
        }

        Ok(Self { min, mid, max })
    }

    pub fn min(&self) -> CalibrationPoint {
        self.min
    }

    pub fn mid(&self) -> CalibrationPoint {
        self.mid
    }

    pub fn max(&self) -> CalibrationPoint {
        self.max
    }

    pub fn angle_range(&self) -> (f32, f32) {
        (self.min.angle_deg, self.max.angle_deg)
    }

    /// Converts an angle to a pulse width in microseconds.
    ///
    /// Angles outside the calibrated range are saturated to the nearest end
    /// rather than rejected. The result is not limited to the absolute
    /// hardware pulse range; that happens at dispatch.
    pub fn pulse_width_for_angle(&self, angle: f32) -> f32 {
        let mut angle = angle;
        if angle < self.min.angle_deg {
            angle = self.min.angle_deg;
        }
        if angle > self.max.angle_deg {
            angle = self.max.angle_deg;
        }

        let (start, end) = if angle < self.mid.angle_deg {
            (self.min, self.mid)
        } else {
            (self.mid, self.max)
        };

        let t = (angle - start.angle_deg) / (end.angle_deg - start.angle_deg);
        start.pulse_width_us + t * (end.pulse_width_us - start.pulse_width_us)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> ServoCalibration {
        ServoCalibration::new(
            CalibrationPoint::new(0.0, 600.0),
            CalibrationPoint::new(90.0, 1500.0),
            CalibrationPoint::new(180.0, 2400.0),
        )
        .unwrap()
    }

    #[test]
    fn test_exact_at_anchor_points() {
        let cal = reference();
        assert_eq!(cal.pulse_width_for_angle(0.0), 600.0);
        assert_eq!(cal.pulse_width_for_angle(90.0), 1500.0);
        assert_eq!(cal.pulse_width_for_angle(180.0), 2400.0);
    }

    #[test]
    fn test_interpolates_lower_segment() {
        assert_eq!(reference().pulse_width_for_angle(45.0), 1050.0);
    }

    #[test]
    fn test_segments_use_own_slope() {
        let cal = ServoCalibration::new(
            CalibrationPoint::new(10.0, 700.0),
            CalibrationPoint::new(60.0, 1200.0),
            CalibrationPoint::new(160.0, 1400.0),
        )
        .unwrap();
        // 10 us/deg below mid, 2 us/deg above
        assert_eq!(cal.pulse_width_for_angle(35.0), 950.0);
        assert_eq!(cal.pulse_width_for_angle(110.0), 1300.0);
    }

    #[test]
    fn test_saturates_outside_range() {
        let cal = ServoCalibration::new(
            CalibrationPoint::new(20.0, 800.0),
            CalibrationPoint::new(90.0, 1500.0),
            CalibrationPoint::new(150.0, 2100.0),
        )
        .unwrap();
        assert_eq!(cal.pulse_width_for_angle(-30.0), 800.0);
        assert_eq!(cal.pulse_width_for_angle(5.0), 800.0);
        assert_eq!(cal.pulse_width_for_angle(170.0), 2100.0);
        assert_eq!(cal.pulse_width_for_angle(f32::INFINITY), 2100.0);
    }

    #[test]
    fn test_upper_segment_monotonic_with_slope() {
        // reversed servo: pulse width falls as angle rises
        let cal = ServoCalibration::new(
            CalibrationPoint::new(0.0, 2400.0),
            CalibrationPoint::new(90.0, 1500.0),
            CalibrationPoint::new(180.0, 600.0),
        )
        .unwrap();
        let mut prev = cal.pulse_width_for_angle(90.0);
        for i in 91..=180 {
            let pw = cal.pulse_width_for_angle(i as f32);
            assert!(pw < prev, "not decreasing at {}", i);
            prev = pw;
        }

        let cal = reference();
        let mut prev = cal.pulse_width_for_angle(90.0);
        for i in 91..=180 {
            let pw = cal.pulse_width_for_angle(i as f32);
            assert!(pw > prev, "not increasing at {}", i);
            prev = pw;
        }
    }

    #[test]
    fn test_rejects_bad_ordering() {
        let p = CalibrationPoint::new;
        assert_eq!(
            ServoCalibration::new(p(-1.0, 600.0), p(90.0, 1500.0), p(180.0, 2400.0)),
            Err(CalibrationError::NegativeMinAngle)
        );
        assert_eq!(
            ServoCalibration::new(p(90.0, 600.0), p(90.0, 1500.0), p(180.0, 2400.0)),
            Err(CalibrationError::MidNotAboveMin)
        );
        assert_eq!(
            ServoCalibration::new(p(100.0, 600.0), p(90.0, 1500.0), p(180.0, 2400.0)),
            Err(CalibrationError::MidNotAboveMin)
        );
        assert_eq!(
            ServoCalibration::new(p(0.0, 600.0), p(180.0, 1500.0), p(180.0, 2400.0)),
            Err(CalibrationError::MidNotBelowMax)
        );
        assert_eq!(
            ServoCalibration::new(p(0.0, 600.0), p(90.0, 1500.0), p(181.0, 2400.0)),
            Err(CalibrationError::MaxAboveLimit)
        );
    }

    #[test]
    fn test_rejects_nan_angles() {
        let p = CalibrationPoint::new;
        assert_eq!(
            ServoCalibration::new(p(f32::NAN, 600.0), p(90.0, 1500.0), p(180.0, 2400.0)),
            Err(CalibrationError::NegativeMinAngle)
        );
        assert_eq!(
            ServoCalibration::new(p(0.0, 600.0), p(f32::NAN, 1500.0), p(180.0, 2400.0)),
            Err(CalibrationError::MidNotAboveMin)
        );
    }

    #[test]
    fn test_rejection_is_deterministic() {
        let p = CalibrationPoint::new;
        for _ in 0..10 {
            assert!(
                ServoCalibration::new(p(90.0, 600.0), p(45.0, 1500.0), p(180.0, 2400.0)).is_err()
            );
        }
    }

    #[test]
    fn test_accepts_full_range_bounds() {
        let cal = reference();
        assert_eq!(cal.angle_range(), (0.0, 180.0));
        assert_eq!(cal.mid(), CalibrationPoint::from((90.0, 1500.0)));
    }
}

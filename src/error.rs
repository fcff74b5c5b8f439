use core::fmt;

/// Reasons a set of calibration points is refused. Checked in declaration
/// order; the first violated invariant is the one reported.
#[cfg_attr(feature = "no_std", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalibrationError {
    NegativeMinAngle,
    MidNotAboveMin,
    MidNotBelowMax,
    MaxAboveLimit,
}

impl CalibrationError {
    pub fn code(&self) -> u8 {
        match self {
            CalibrationError::NegativeMinAngle => 0x01,
            CalibrationError::MidNotAboveMin => 0x02,
            CalibrationError::MidNotBelowMax => 0x03,
            CalibrationError::MaxAboveLimit => 0x04,
        }
    }
}

impl fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeMinAngle => write!(f, "min angle must be >= {}", crate::MIN_ANGLE_DEG),
            Self::MidNotAboveMin => write!(f, "mid angle must be greater than min angle"),
            Self::MidNotBelowMax => write!(f, "mid angle must be less than max angle"),
            Self::MaxAboveLimit => write!(f, "max angle must be <= {}", crate::MAX_ANGLE_DEG),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CalibrationError {}

#![cfg_attr(feature = "no_std", no_std)]

pub mod calibration;
pub mod cmd;
#[cfg(feature = "std")]
pub mod config;
pub mod driver;
pub mod error;
pub mod explore;
pub mod servo;

pub use calibration::{CalibrationPoint, ServoCalibration};
pub use cmd::Command;
pub use driver::PulseDriver;
pub use error::CalibrationError;
pub use explore::ExploreSweep;
pub use servo::ServoConverter;

use static_assertions::const_assert;

/// Shortest pulse the servos will ever be sent. Commands at or above this
/// value are read as pulse widths, below it as angles.
pub const ABSOLUTE_MIN_PULSE_WIDTH_US: f32 = 500.0;
/// Longest pulse the servos will ever be sent.
pub const ABSOLUTE_MAX_PULSE_WIDTH_US: f32 = 2500.0;

pub const MIN_ANGLE_DEG: f32 = 0.0;
pub const MAX_ANGLE_DEG: f32 = 180.0;

// Period: 20 ms (50 Hz).
pub const PWM_FREQUENCY_HZ: u32 = 50;
pub const PWM_PERIOD_US: u32 = 1_000_000 / PWM_FREQUENCY_HZ;
pub const PWM_DMA_CHANNEL: u8 = 0;

pub const EXPLORE_PAN_START_ANGLE: f32 = 45.0;
pub const EXPLORE_PAN_END_ANGLE: f32 = 135.0;
pub const EXPLORE_TILT_START_ANGLE: f32 = 130.0;
pub const EXPLORE_TILT_END_ANGLE: f32 = 50.0;

pub const EXPLORE_ABS_PAN_STEP: f32 = 1.0;
pub const EXPLORE_ABS_TILT_STEP: f32 = 5.0;

const_assert!(ABSOLUTE_MIN_PULSE_WIDTH_US < ABSOLUTE_MAX_PULSE_WIDTH_US);
// no legal angle can be mistaken for a pulse width
const_assert!(MAX_ANGLE_DEG < ABSOLUTE_MIN_PULSE_WIDTH_US);
const_assert!(PWM_PERIOD_US as f32 > ABSOLUTE_MAX_PULSE_WIDTH_US);

use hoticam_common::{CalibrationPoint, PWM_FREQUENCY_HZ};
use pwm_pca9685::Channel;
use static_assertions::const_assert;

use crate::pwm::pca9685::prescale_for;

// clocks, v1 board crystal
pub const HSE_MHZ: u32 = 16;
pub const SYSCLK_MHZ: u32 = 64;

// STM32F401: 4-26 MHz crystal, 84 MHz core
const_assert!(HSE_MHZ >= 4 && HSE_MHZ <= 26);
const_assert!(SYSCLK_MHZ <= 84);

// PCA9685 breakout, no address jumpers
pub const PCA9685_ADDR: u8 = 0x40;
pub const PCA9685_PRESCALE: u8 = prescale_for(PWM_FREQUENCY_HZ);
pub const I2C_FREQ_KHZ: u32 = 400;

// chip minimum
const_assert!(PCA9685_PRESCALE >= 3);

// Pan servo, measured on the mount. Full travel, centre at 90.
pub const PAN_CHANNEL: Channel = Channel::C0;
pub const PAN_MIN: CalibrationPoint = CalibrationPoint::new(0.0, 600.0);
pub const PAN_MID: CalibrationPoint = CalibrationPoint::new(90.0, 1500.0);
pub const PAN_MAX: CalibrationPoint = CalibrationPoint::new(180.0, 2400.0);

// Tilt servo. The bracket hits the base below 30 and above 160 degrees.
pub const TILT_CHANNEL: Channel = Channel::C1;
pub const TILT_MIN: CalibrationPoint = CalibrationPoint::new(30.0, 850.0);
pub const TILT_MID: CalibrationPoint = CalibrationPoint::new(90.0, 1450.0);
pub const TILT_MAX: CalibrationPoint = CalibrationPoint::new(160.0, 2150.0);

// task periods
pub const EXPLORE_STEP_MS: u32 = 40;
pub const HEARTBEAT_MS: u32 = 500;

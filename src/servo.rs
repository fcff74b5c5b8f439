use crate::{
    calibration::{CalibrationPoint, ServoCalibration},
    cmd::Command,
    driver::PulseDriver,
    error::CalibrationError,
    ABSOLUTE_MAX_PULSE_WIDTH_US, ABSOLUTE_MIN_PULSE_WIDTH_US, PWM_DMA_CHANNEL,
};

/// Angle to pulse width converter for a single servo axis.
///
/// Holds the servo's calibration and the last pulse width written to the
/// driver, so repeated commands that quantize to the same width do not touch
/// the hardware again.
#[derive(Debug, Clone)]
pub struct ServoConverter<P> {
    pin: P,
    calibration: ServoCalibration,
    last_pulse_width_us: Option<f32>,
}

/// Rounds a pulse width down to a whole number of driver increments.
///
/// # Returns
/// - The increment count and the width it actually represents, or `None`
///   when the increment is not positive or the count does not fit a `u16`.
pub fn quantize(pulse_width_us: f32, increment_us: f32) -> Option<(u16, f32)> {
    if !(increment_us > 0.0) {
        return None;
    }
    let n = libm::floorf(pulse_width_us / increment_us);
    if !(n >= 0.0 && n <= u16::MAX as f32) {
        return None;
    }
    let n = n as u16;
    Some((n, n as f32 * increment_us))
}

impl<P: Copy> ServoConverter<P> {
    /// Creates a new `ServoConverter`. Does no I/O.
    ///
    /// # Parameters
    /// - `pin`: Output the servo is wired to, passed through to the driver.
    /// - `min`, `mid`, `max`: Calibration anchors, strictly increasing in
    ///   angle within 0..=180 degrees.
    pub fn new(
        pin: P,
        min: CalibrationPoint,
        mid: CalibrationPoint,
        max: CalibrationPoint,
    ) -> Result<Self, CalibrationError> {
        let calibration = ServoCalibration::new(min, mid, max)?;
        Ok(Self::with_calibration(pin, calibration))
    }

    pub fn with_calibration(pin: P, calibration: ServoCalibration) -> Self {
        Self {
            pin,
            calibration,
            last_pulse_width_us: None,
        }
    }

    pub fn pin(&self) -> P {
        self.pin
    }

    pub fn calibration(&self) -> &ServoCalibration {
        &self.calibration
    }

    /// Pulse width most recently written to the driver, if any.
    pub fn last_pulse_width_us(&self) -> Option<f32> {
        self.last_pulse_width_us
    }

    /// Drops the cached pulse width so the next command is always written,
    /// e.g. after the driver has been reset.
    pub fn forget_last_pulse_width(&mut self) {
        self.last_pulse_width_us = None;
    }

    pub fn issue<D>(&mut self, driver: &mut D, command: Command) -> Result<(), D::Error>
    where
        D: PulseDriver<Pin = P>,
    {
        match command {
            Command::Angle(angle) => self.set_angle(driver, angle),
            Command::PulseWidth(pulse_width_us) => self.set_pulse_width(driver, pulse_width_us),
        }
    }

    /// Untagged entry point; see [`Command::from_raw`] for how `value` is
    /// classified.
    pub fn issue_command<D>(&mut self, driver: &mut D, value: f32) -> Result<(), D::Error>
    where
        D: PulseDriver<Pin = P>,
    {
        self.issue(driver, Command::from_raw(value))
    }

    pub fn set_angle<D>(&mut self, driver: &mut D, angle: f32) -> Result<(), D::Error>
    where
        D: PulseDriver<Pin = P>,
    {
        let pulse_width_us = self.calibration.pulse_width_for_angle(angle);

        #[cfg(feature = "no_std")]
        defmt::debug!("angle {} -> pulse width {}", angle, pulse_width_us);
        #[cfg(feature = "std")]
        log::debug!("angle {} -> pulse width {}", angle, pulse_width_us);

        self.set_pulse_width(driver, pulse_width_us)
    }

    /// Clamps to the absolute hardware range, quantizes to the driver's
    /// increment and writes it unless it matches the last written width.
    /// The cache is only updated once the driver accepts the write.
    pub fn set_pulse_width<D>(&mut self, driver: &mut D, pulse_width_us: f32) -> Result<(), D::Error>
    where
        D: PulseDriver<Pin = P>,
    {
        if pulse_width_us.is_nan() {
            #[cfg(feature = "no_std")]
            defmt::warn!("dropping NaN pulse width");
            #[cfg(feature = "std")]
            log::warn!("dropping NaN pulse width");
            return Ok(());
        }

        let pulse_width_us =
            pulse_width_us.clamp(ABSOLUTE_MIN_PULSE_WIDTH_US, ABSOLUTE_MAX_PULSE_WIDTH_US);
        let increment_us = driver.pulse_increment_us();
        let (n, quantized_us) = match quantize(pulse_width_us, increment_us) {
            Some(q) => q,
            None => {
                #[cfg(feature = "no_std")]
                defmt::warn!(
                    "dropping {} us, not representable at {} us/increment",
                    pulse_width_us,
                    increment_us
                );
                #[cfg(feature = "std")]
                log::warn!(
                    "dropping {} us, not representable at {} us/increment",
                    pulse_width_us,
                    increment_us
                );
                return Ok(());
            }
        };

        if self.last_pulse_width_us == Some(quantized_us) {
            return Ok(());
        }

        driver.set_channel_pulse(PWM_DMA_CHANNEL, self.pin, 0, n)?;
        self.last_pulse_width_us = Some(quantized_us);

        #[cfg(feature = "no_std")]
        defmt::debug!("wrote {} increments ({} us)", n, quantized_us);
        #[cfg(feature = "std")]
        log::debug!("wrote {} increments ({} us)", n, quantized_us);

        Ok(())
    }
}

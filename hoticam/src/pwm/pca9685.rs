use embedded_hal::i2c::I2c;
use hoticam_common::{PulseDriver, PWM_DMA_CHANNEL};
use pwm_pca9685::{Channel, Error, Pca9685};

/// PCA9685 internal oscillator.
pub const OSC_HZ: u32 = 25_000_000;
/// Counts per PWM frame.
pub const COUNTS: u32 = 4096;
const MAX_COUNT: u16 = 4095;

/// Prescale register value for a frame rate, rounded to nearest.
/// (25 MHz / (4096 * f)) - 1, i.e. 121 at 50 Hz.
pub const fn prescale_for(freq_hz: u32) -> u8 {
    let div = COUNTS * freq_hz;
    ((OSC_HZ + div / 2) / div - 1) as u8
}

/// Width of one counter tick in microseconds for a given prescale.
pub fn increment_us(prescale: u8) -> f32 {
    (prescale as f32 + 1.0) * 1_000_000.0 / OSC_HZ as f32
}

/// [`PulseDriver`] on a PCA9685. One chip drives every servo; each channel
/// is a pin.
pub struct Pca9685Driver<I2C> {
    pwm: Pca9685<I2C>,
    increment_us: f32,
}

impl<I2C, E> Pca9685Driver<I2C>
where
    I2C: I2c<Error = E>,
{
    /// Wakes the chip and sets its frame rate.
    ///
    /// # Parameters
    /// - `address`: 7 bit I2C address (0x40 with no solder jumpers).
    /// - `prescale`: See [`prescale_for`].
    pub fn new(i2c: I2C, address: u8, prescale: u8) -> Result<Self, Error<E>> {
        let mut pwm = Pca9685::new(i2c, address)?;
        pwm.enable()?;
        pwm.set_prescale(prescale)?;
        defmt::info!(
            "pca9685 at {:x}, prescale {}, {} us/count",
            address,
            prescale,
            increment_us(prescale)
        );
        Ok(Self {
            pwm,
            increment_us: increment_us(prescale),
        })
    }

    /// Stops all outputs and hands back the bus.
    pub fn destroy(mut self) -> Result<I2C, Error<E>> {
        self.pwm.set_channel_full_off(Channel::All)?;
        self.pwm.disable()?;
        Ok(self.pwm.destroy())
    }
}

impl<I2C, E> PulseDriver for Pca9685Driver<I2C>
where
    I2C: I2c<Error = E>,
{
    type Pin = Channel;
    type Error = Error<E>;

    fn pulse_increment_us(&self) -> f32 {
        self.increment_us
    }

    fn set_channel_pulse(
        &mut self,
        dma_channel: u8,
        pin: Channel,
        start_offset: u16,
        increments: u16,
    ) -> Result<(), Self::Error> {
        // single chip, there is nothing else to address
        if dma_channel != PWM_DMA_CHANNEL {
            return Err(Error::InvalidInputData);
        }
        let off = match start_offset.checked_add(increments) {
            Some(off) if off <= MAX_COUNT => off,
            _ => return Err(Error::InvalidInputData),
        };
        self.pwm.set_channel_on_off(pin, start_offset, off)
    }
}

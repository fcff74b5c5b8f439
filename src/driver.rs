/// A PWM pulse generator with a fixed frame period, shared by every servo
/// wired to it.
///
/// Implementations own their own peripheral setup and teardown. Converters
/// borrow the driver mutably for the duration of one write only.
pub trait PulseDriver {
    /// Output identifier, forwarded untouched from the converter.
    type Pin: Copy;
    type Error;

    /// Smallest schedulable time step in microseconds. Every pulse is an
    /// integer number of these.
    fn pulse_increment_us(&self) -> f32;

    /// Schedules a repeating pulse on `pin`, starting `start_offset`
    /// increments into each frame and lasting `increments` increments.
    fn set_channel_pulse(
        &mut self,
        dma_channel: u8,
        pin: Self::Pin,
        start_offset: u16,
        increments: u16,
    ) -> Result<(), Self::Error>;
}

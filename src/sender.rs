//! Built-in sender
//! If you want to create a new sender, you will need to implement [`SendCommand`] trait

use embedded_hal::delay::DelayNs;

use crate::command::{Command, State};

mod i2c_sender;

pub use i2c_sender::I2cSender;

/// [`SendCommand`] is the trait a sender should implement to communicate with the hardware
pub trait SendCommand<Delayer: DelayNs> {
    /// Error of the underlying bus transport
    type Error;

    /// Parse a [`Command`] and push it onto the bus, transfer by transfer,
    /// driving the latch signal and the settle delays in between
    fn send(&mut self, command: Command, delayer: &mut Delayer) -> Result<(), Self::Error>;

    /// Wait specific duration, and send command
    fn delay_and_send(
        &mut self,
        command: Command,
        delayer: &mut Delayer,
        delay_us: u32,
    ) -> Result<(), Self::Error> {
        delayer.delay_us(delay_us);
        self.send(command, delayer)
    }

    /// Get the backlight flag merged into every outgoing transfer
    ///
    /// Note:
    /// If a driver doesn't support backlight control, just silently bypass it
    fn get_backlight(&mut self) -> State {
        State::default()
    }

    /// Set the backlight flag merged into every outgoing transfer
    ///
    /// Note:
    /// If a driver doesn't support backlight control, just silently bypass it
    #[allow(unused_variables)]
    fn set_backlight(&mut self, backlight: State) {}
}

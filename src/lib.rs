/*!
# LCD I2C Driver

Driver for HD44780-compatible character LCDs wired through a PCF8574-style
I2C-to-parallel backpack.

Basic Usage:

1. Wrap an I2C bus implementing [`embedded_hal::i2c::I2c`] in a
   [`sender::I2cSender`], together with the backpack address (usually `0x27`)
<br/>
<br/>
2. Use [`lcd::Lcd::new()`] with a [`lcd::Config`] to run the power-on
   handshake and create a [`lcd::Lcd`]
<br/>
<br/>
3. use any methods provide by [`lcd::Lcd`] to control the display

Every operation blocks until its bus transfers and settle delays are done,
and returns a [`Result`]; a failed bus write surfaces as [`Error::Bus`].
One [`lcd::Lcd`] exclusively borrows its sender, so access to one physical
display has to be serialized outside the driver.
*/

#![no_std]
#![warn(missing_docs)]

pub mod command;
pub mod lcd;
pub mod sender;
mod state;
pub mod utils;

/// Everything that can go wrong while driving the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<BusError> {
    /// The underlying I2C write failed
    Bus(BusError),
    /// CGRAM glyph slot outside of `0..=7`
    GlyphSlotOutOfRange,
}

#[cfg(feature = "defmt")]
impl<BusError> defmt::Format for Error<BusError> {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Error::Bus(_) => defmt::write!(fmt, "I2C bus write failed"),
            Error::GlyphSlotOutOfRange => {
                defmt::write!(fmt, "CGRAM glyph slot out of range")
            }
        }
    }
}

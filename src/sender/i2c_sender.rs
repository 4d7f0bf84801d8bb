use embedded_hal::{
    delay::DelayNs,
    i2c::{AddressMode, I2c},
};

use crate::{
    command::{Bits, Command, RegisterSelection, State},
    sender::SendCommand,
    utils::BitOps,
};

// I2C to parallel:
// P7 -> P0
// DB7/DB6/DB5/DB4/BL/EN/RW/RS
const RS_POS: u8 = 0;
const EN_POS: u8 = 2;
const BL_POS: u8 = 3;

// Enable has to stay high long enough for the controller to notice, and
// after the falling edge the controller needs time to execute what it
// latched. Both values sit above the datasheet minimums.
const ENABLE_SETTLE_US: u32 = 5;
const EXECUTE_SETTLE_US: u32 = 80;

/// Sender for the ubiquitous PCF8574 I2C backpack.
///
/// Holds the bus handle and the backpack address for its whole lifetime,
/// together with the backlight flag that rides along in every transfer.
pub struct I2cSender<'a, I2cLcd: I2c<A>, A: AddressMode + Clone> {
    i2c: &'a mut I2cLcd,
    addr: A,
    backlight: State,
}

impl<'a, I2cLcd: I2c<A>, A: AddressMode + Clone> I2cSender<'a, I2cLcd, A> {
    /// Take exclusive hold of the bus handle and the backpack address
    pub fn new(i2c: &'a mut I2cLcd, addr: A) -> Self {
        Self {
            i2c,
            addr,
            backlight: State::default(),
        }
    }

    fn write_byte(&mut self, raw_byte: u8) -> Result<(), I2cLcd::Error> {
        self.i2c.write(self.addr.clone(), &[raw_byte])
    }

    // One latched transfer: present the byte, raise enable, hold, drop
    // enable, hold again. The controller samples the data lines on the
    // falling edge, so this sequence must not be reordered or shortened.
    fn latch_transfer(
        &mut self,
        transfer: u8,
        delayer: &mut impl DelayNs,
    ) -> Result<(), I2cLcd::Error> {
        self.write_byte(transfer)?;

        let mut enabled = transfer;
        enabled.set_bit(EN_POS);
        self.write_byte(enabled)?;
        delayer.delay_us(ENABLE_SETTLE_US);

        let mut disabled = transfer;
        disabled.clear_bit(EN_POS);
        self.write_byte(disabled)?;
        delayer.delay_us(EXECUTE_SETTLE_US);

        Ok(())
    }

    fn merge_backlight(&self, transfer: u8) -> u8 {
        let mut transfer = transfer;
        match self.backlight {
            State::On => transfer.set_bit(BL_POS),
            State::Off => transfer.clear_bit(BL_POS),
        };
        transfer
    }
}

impl<'a, I2cLcd, A, Delayer> SendCommand<Delayer> for I2cSender<'a, I2cLcd, A>
where
    I2cLcd: I2c<A>,
    A: AddressMode + Clone,
    Delayer: DelayNs,
{
    type Error = I2cLcd::Error;

    fn send(&mut self, command: Command, delayer: &mut Delayer) -> Result<(), Self::Error> {
        let TransferPair(high, low) = TransferPair::from(&command);

        let high = self.merge_backlight(high);
        self.latch_transfer(high, delayer)?;

        if let Some(low) = low {
            let low = self.merge_backlight(low);
            self.latch_transfer(low, delayer)?;
        }

        Ok(())
    }

    fn get_backlight(&mut self) -> State {
        self.backlight
    }

    fn set_backlight(&mut self, backlight: State) {
        self.backlight = backlight;
    }
}

// One command becomes one (4-bit handshake) or two (8-bit) bus transfers,
// high nibble first; the register-select bit rides along in every transfer.
struct TransferPair(u8, Option<u8>);

impl From<&Command> for TransferPair {
    fn from(command: &Command) -> Self {
        let mut base = 0u8;

        if command.get_register_selection() == RegisterSelection::Data {
            base.set_bit(RS_POS);
        }

        match command.get_data() {
            Bits::Bit4(raw_data) => {
                assert!(raw_data < (1 << 4), "data is overflow 4 bit");
                TransferPair(base | (raw_data << 4), None)
            }

            Bits::Bit8(raw_data) => TransferPair(
                base | (raw_data & 0b1111_0000),
                Some(base | ((raw_data & 0b0000_1111) << 4)),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use embedded_hal_mock::eh1::{
        delay::NoopDelay,
        i2c::{Mock as I2cMock, Transaction as I2cTransaction},
    };
    use std::vec;
    use std::vec::Vec;

    use super::*;
    use crate::command::CommandSet;

    const ADDR: u8 = 0x27;
    const EN: u8 = 1 << EN_POS;

    // present / enable high / enable low, all carrying the same payload
    fn latch_group(transfer: u8) -> Vec<I2cTransaction> {
        vec![
            I2cTransaction::write(ADDR, vec![transfer]),
            I2cTransaction::write(ADDR, vec![transfer | EN]),
            I2cTransaction::write(ADDR, vec![transfer & !EN]),
        ]
    }

    #[test]
    fn data_byte_splits_into_high_then_low_transfer() {
        // 'A' = 0x41, register select + default backlight in both transfers
        let mut expected = latch_group(0b0100_1001);
        expected.extend(latch_group(0b0001_1001));

        let mut i2c = I2cMock::new(&expected);
        let mut delayer = NoopDelay;
        {
            let mut sender = I2cSender::new(&mut i2c, ADDR);
            sender
                .send(CommandSet::WriteDataToRAM(0x41).into(), &mut delayer)
                .unwrap();
        }
        i2c.done();
    }

    #[test]
    fn handshake_nibble_is_a_single_transfer() {
        let expected = latch_group(0b0010_1000);

        let mut i2c = I2cMock::new(&expected);
        let mut delayer = NoopDelay;
        {
            let mut sender = I2cSender::new(&mut i2c, ADDR);
            sender
                .send(CommandSet::HalfFunctionSet.into(), &mut delayer)
                .unwrap();
        }
        i2c.done();
    }

    #[test]
    fn backlight_flag_is_merged_into_both_transfers() {
        let mut expected = latch_group(0b0100_0001);
        expected.extend(latch_group(0b0001_0001));

        let mut i2c = I2cMock::new(&expected);
        let mut delayer = NoopDelay;
        {
            let mut sender = I2cSender::new(&mut i2c, ADDR);
            SendCommand::<NoopDelay>::set_backlight(&mut sender, State::Off);
            sender
                .send(CommandSet::WriteDataToRAM(0x41).into(), &mut delayer)
                .unwrap();
        }
        i2c.done();
    }

    #[test]
    fn command_byte_keeps_register_select_clear() {
        let mut expected = latch_group(0b0000_1000);
        expected.extend(latch_group(0b0001_1000));

        let mut i2c = I2cMock::new(&expected);
        let mut delayer = NoopDelay;
        {
            let mut sender = I2cSender::new(&mut i2c, ADDR);
            sender
                .send(CommandSet::ClearDisplay.into(), &mut delayer)
                .unwrap();
        }
        i2c.done();
    }
}

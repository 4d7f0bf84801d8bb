//! The [`Lcd`] driver itself, and all display operations

use embedded_hal::delay::DelayNs;

use crate::{
    command::{CommandSet, MoveDirection, ShiftType, State},
    sender::SendCommand,
    state::LcdState,
    Error,
};

mod init;

pub use init::Config;

// DDRAM base address of each line. Four entries so 4-line panels address
// correctly; on a 16x2 the last two entries alias the right half of the
// first two lines.
const LINE_OFFSETS: [u8; 4] = [0x00, 0x40, 0x14, 0x54];

// Clear and ReturnHome execute inside the controller; without a busy-flag
// line to poll, a fixed wait above the datasheet maximum is the only option.
const CLEAR_EXECUTE_US: u32 = 3_000;

/// Driver for one physical display.
///
/// An [`Lcd`] exclusively borrows its sender, and with it the bus-address
/// pair, for its whole lifetime. To share one display between tasks, wrap
/// the whole [`Lcd`] in a mutex; issuing operations from two places at once
/// would interleave latched transfers and corrupt the controller state.
pub struct Lcd<'a, 'b, Sender, Delayer>
where
    Sender: SendCommand<Delayer>,
    Delayer: DelayNs,
{
    sender: &'a mut Sender,
    delayer: &'b mut Delayer,
    state: LcdState,
}

impl<'a, 'b, Sender, Delayer> Lcd<'a, 'b, Sender, Delayer>
where
    Sender: SendCommand<Delayer>,
    Delayer: DelayNs,
{
    fn send(&mut self, command: CommandSet) -> Result<(), Error<Sender::Error>> {
        self.sender
            .send(command.into(), self.delayer)
            .map_err(Error::Bus)
    }

    /// Blank the whole display and move the cursor back to the origin
    pub fn clean_display(&mut self) -> Result<(), Error<Sender::Error>> {
        self.send(CommandSet::ClearDisplay)?;
        self.delayer.delay_us(CLEAR_EXECUTE_US);
        Ok(())
    }

    /// Move the cursor back to the origin, DDRAM content untouched
    pub fn return_home(&mut self) -> Result<(), Error<Sender::Error>> {
        self.send(CommandSet::ReturnHome)?;
        self.delayer.delay_us(CLEAR_EXECUTE_US);
        Ok(())
    }

    /// Move the cursor to `offset` characters into `line`
    pub fn set_cursor_pos(&mut self, line: u8, offset: u8) -> Result<(), Error<Sender::Error>> {
        self.send(CommandSet::SetDDRAM(LINE_OFFSETS[line as usize] + offset))
    }

    /// Write a string at the cursor, one data byte per character
    pub fn write_str_to_cur(&mut self, str: &str) -> Result<(), Error<Sender::Error>> {
        for &byte in str.as_bytes() {
            self.write_byte_to_cur(byte)?;
        }
        Ok(())
    }

    /// Write one raw byte at the cursor
    pub fn write_byte_to_cur(&mut self, byte: impl Into<u8>) -> Result<(), Error<Sender::Error>> {
        self.send(CommandSet::WriteDataToRAM(byte.into()))
    }

    /// Render the custom glyph from CGRAM slot `index` at the cursor
    pub fn write_graph_to_cur(&mut self, index: u8) -> Result<(), Error<Sender::Error>> {
        if index >= 8 {
            #[cfg(feature = "defmt")]
            defmt::error!("CGRAM slot {} out of range, only 8 glyphs fit", index);
            return Err(Error::GlyphSlotOutOfRange);
        }

        self.write_byte_to_cur(index)
    }

    /// Program an 8-row glyph into CGRAM slot `index`.
    ///
    /// Only the lower 5 bits of each row reach the dot matrix. When the
    /// slot is outside of `0..=7` nothing is transmitted at all.
    pub fn write_graph_to_cgram(
        &mut self,
        index: u8,
        graph_data: &[u8; 8],
    ) -> Result<(), Error<Sender::Error>> {
        if index >= 8 {
            #[cfg(feature = "defmt")]
            defmt::error!("CGRAM slot {} out of range, only 8 glyphs fit", index);
            return Err(Error::GlyphSlotOutOfRange);
        }

        self.send(CommandSet::SetCGRAM(index << 3))?;
        for &row in graph_data {
            self.send(CommandSet::WriteDataToRAM(row))?;
        }
        Ok(())
    }

    /// Flip the backlight flag, then push a no-op command so the new flag
    /// reaches the expander immediately.
    ///
    /// The controller ignores the empty payload, the control-line bits of
    /// the transfer still latch; keep it this way instead of inventing a
    /// shorter backlight-only write.
    pub fn set_backlight(&mut self, backlight: State) -> Result<(), Error<Sender::Error>> {
        self.sender.set_backlight(backlight);
        self.state.set_backlight(backlight);
        self.send(CommandSet::NoOp)
    }

    /// Backlight flag as of the last [`Lcd::set_backlight`]
    pub fn get_backlight(&self) -> State {
        self.state.get_backlight()
    }

    /// Shift the cursor alone, or the whole display content, one position.
    /// The cursor address register is unaffected by a display shift.
    pub fn shift_cursor_or_display(
        &mut self,
        shift_type: ShiftType,
        dir: MoveDirection,
    ) -> Result<(), Error<Sender::Error>> {
        self.send(CommandSet::CursorOrDisplayShift(shift_type, dir))
    }

    /// Set the direction the cursor advances after every written byte
    pub fn set_direction(&mut self, dir: MoveDirection) -> Result<(), Error<Sender::Error>> {
        self.state.set_direction(dir);

        let dir = self.state.get_direction();
        let shift = self.state.get_shift_type();
        self.send(CommandSet::EntryModeSet(dir, shift))
    }

    /// Current cursor advance direction
    pub fn get_direction(&self) -> MoveDirection {
        self.state.get_direction()
    }

    /// Choose whether every written byte also shifts the display content
    pub fn set_shift_type(&mut self, shift: ShiftType) -> Result<(), Error<Sender::Error>> {
        self.state.set_shift_type(shift);

        let dir = self.state.get_direction();
        let shift = self.state.get_shift_type();
        self.send(CommandSet::EntryModeSet(dir, shift))
    }

    /// Current auto-shift behavior
    pub fn get_shift_type(&self) -> ShiftType {
        self.state.get_shift_type()
    }

    /// Turn the whole display on or off (backlight is separate)
    pub fn set_display_state(&mut self, display: State) -> Result<(), Error<Sender::Error>> {
        self.state.set_display_state(display);
        self.send_display_on_off()
    }

    #[allow(missing_docs)]
    pub fn get_display_state(&self) -> State {
        self.state.get_display_state()
    }

    /// Show or hide the cursor underline
    pub fn set_cursor_state(&mut self, cursor: State) -> Result<(), Error<Sender::Error>> {
        self.state.set_cursor_state(cursor);
        self.send_display_on_off()
    }

    #[allow(missing_docs)]
    pub fn get_cursor_state(&self) -> State {
        self.state.get_cursor_state()
    }

    /// Let the cursor cell blink
    pub fn set_cursor_blink_state(&mut self, blink: State) -> Result<(), Error<Sender::Error>> {
        self.state.set_cursor_blink(blink);
        self.send_display_on_off()
    }

    #[allow(missing_docs)]
    pub fn get_cursor_blink_state(&self) -> State {
        self.state.get_cursor_blink()
    }

    fn send_display_on_off(&mut self) -> Result<(), Error<Sender::Error>> {
        let display = self.state.get_display_state();
        let cursor = self.state.get_cursor_state();
        let cursor_blink = self.state.get_cursor_blink();
        self.send(CommandSet::DisplayOnOff {
            display,
            cursor,
            cursor_blink,
        })
    }

    /// Manually delay, between commands
    pub fn delay_ms(&mut self, ms: u32) {
        self.delayer.delay_ms(ms);
    }

    /// Manually delay, between commands
    pub fn delay_us(&mut self, us: u32) {
        self.delayer.delay_us(us);
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
    use crate::sender::I2cSender;

    const ADDR: u8 = 0x27;
    const EN: u8 = 0b0000_0100;
    const RS: u8 = 0b0000_0001;
    const BL: u8 = 0b0000_1000;

    // present / enable high / enable low, all carrying the same payload
    fn latch_group(transfer: u8) -> Vec<I2cTransaction> {
        vec![
            I2cTransaction::write(ADDR, vec![transfer]),
            I2cTransaction::write(ADDR, vec![transfer | EN]),
            I2cTransaction::write(ADDR, vec![transfer & !EN]),
        ]
    }

    // full byte: high nibble group, then low nibble group
    fn byte_groups(value: u8, base: u8) -> Vec<I2cTransaction> {
        let mut out = latch_group(base | (value & 0xF0));
        out.extend(latch_group(base | ((value & 0x0F) << 4)));
        out
    }

    // the whole power-on handshake with default config
    fn init_transactions() -> Vec<I2cTransaction> {
        let mut out = Vec::new();
        // three wake-up nibbles, then the switch to 4-bit transfers
        out.extend(latch_group(0x30 | BL));
        out.extend(latch_group(0x30 | BL));
        out.extend(latch_group(0x30 | BL));
        out.extend(latch_group(0x20 | BL));
        out.extend(byte_groups(0x28, BL)); // function set: 4-bit, 2 lines, 5x8
        out.extend(byte_groups(0x0C, BL)); // display on, cursor off, blink off
        out.extend(byte_groups(0x01, BL)); // clear
        out.extend(byte_groups(0x06, BL)); // entry mode: left to right, no shift
        out
    }

    fn expect_after_init(extra: Vec<I2cTransaction>) -> I2cMock {
        let mut expected = init_transactions();
        expected.extend(extra);
        I2cMock::new(&expected)
    }

    #[test]
    fn init_then_write_matches_documented_sequence() {
        // ASCII 'A' = 0x41: character-mode transfers 0x4 then 0x1,
        // both in the upper nibble
        let mut i2c = expect_after_init(byte_groups(0x41, RS | BL));
        let mut delayer = NoopDelay;
        {
            let mut sender = I2cSender::new(&mut i2c, ADDR);
            let mut lcd = Lcd::new(&mut sender, &mut delayer, Config::default()).unwrap();
            lcd.write_str_to_cur("A").unwrap();
        }
        i2c.done();
    }

    #[test]
    fn backlight_flag_rides_every_following_byte() {
        let mut extra = byte_groups(0x00, 0); // no-op, flag now clear
        extra.extend(byte_groups(0x41, RS)); // data without backlight
        extra.extend(byte_groups(0x00, BL)); // no-op, flag restored
        extra.extend(byte_groups(0x41, RS | BL));

        let mut i2c = expect_after_init(extra);
        let mut delayer = NoopDelay;
        {
            let mut sender = I2cSender::new(&mut i2c, ADDR);
            let mut lcd = Lcd::new(&mut sender, &mut delayer, Config::default()).unwrap();

            lcd.set_backlight(State::Off).unwrap();
            assert!(lcd.get_backlight() == State::Off);
            lcd.write_byte_to_cur(0x41u8).unwrap();

            lcd.set_backlight(State::On).unwrap();
            assert!(lcd.get_backlight() == State::On);
            lcd.write_byte_to_cur(0x41u8).unwrap();
        }
        i2c.done();
    }

    #[test]
    fn direction_setters_are_exact_inverses() {
        let mut extra = byte_groups(0x04, BL); // right to left
        extra.extend(byte_groups(0x06, BL)); // back to left to right
        extra.extend(byte_groups(0x06, BL)); // repeating is idempotent

        let mut i2c = expect_after_init(extra);
        let mut delayer = NoopDelay;
        {
            let mut sender = I2cSender::new(&mut i2c, ADDR);
            let mut lcd = Lcd::new(&mut sender, &mut delayer, Config::default()).unwrap();

            lcd.set_direction(MoveDirection::RightToLeft).unwrap();
            assert!(lcd.get_direction() == MoveDirection::RightToLeft);

            lcd.set_direction(MoveDirection::LeftToRight).unwrap();
            lcd.set_direction(MoveDirection::LeftToRight).unwrap();
            assert!(lcd.get_direction() == MoveDirection::LeftToRight);
        }
        i2c.done();
    }

    #[test]
    fn auto_shift_toggles_entry_mode_bit() {
        let mut extra = byte_groups(0x07, BL);
        extra.extend(byte_groups(0x06, BL));

        let mut i2c = expect_after_init(extra);
        let mut delayer = NoopDelay;
        {
            let mut sender = I2cSender::new(&mut i2c, ADDR);
            let mut lcd = Lcd::new(&mut sender, &mut delayer, Config::default()).unwrap();

            lcd.set_shift_type(ShiftType::CursorAndDisplay).unwrap();
            lcd.set_shift_type(ShiftType::CursorOnly).unwrap();
        }
        i2c.done();
    }

    #[test]
    fn cursor_addresses_follow_line_offset_table() {
        let mut extra = byte_groups(0x80, BL); // line 0, offset 0
        extra.extend(byte_groups(0xC0, BL)); // line 1, offset 0
        extra.extend(byte_groups(0x97, BL)); // line 2, offset 3

        let mut i2c = expect_after_init(extra);
        let mut delayer = NoopDelay;
        {
            let mut sender = I2cSender::new(&mut i2c, ADDR);
            let mut lcd = Lcd::new(&mut sender, &mut delayer, Config::default()).unwrap();

            lcd.set_cursor_pos(0, 0).unwrap();
            lcd.set_cursor_pos(1, 0).unwrap();
            lcd.set_cursor_pos(2, 3).unwrap();
        }
        i2c.done();
    }

    #[test]
    fn display_shift_encodes_both_directions() {
        let mut extra = byte_groups(0x18, BL);
        extra.extend(byte_groups(0x1C, BL));

        let mut i2c = expect_after_init(extra);
        let mut delayer = NoopDelay;
        {
            let mut sender = I2cSender::new(&mut i2c, ADDR);
            let mut lcd = Lcd::new(&mut sender, &mut delayer, Config::default()).unwrap();

            lcd.shift_cursor_or_display(ShiftType::CursorAndDisplay, MoveDirection::RightToLeft)
                .unwrap();
            lcd.shift_cursor_or_display(ShiftType::CursorAndDisplay, MoveDirection::LeftToRight)
                .unwrap();
        }
        i2c.done();
    }

    #[test]
    fn glyph_programming_addresses_its_cgram_slot() {
        let heart: [u8; 8] = [
            0b00000, 0b00000, 0b01010, 0b11111, 0b01110, 0b00100, 0b00000, 0b00000,
        ];

        let mut extra = byte_groups(0x50, BL); // CGRAM base of slot 2
        for &row in heart.iter() {
            extra.extend(byte_groups(row, RS | BL));
        }
        extra.extend(byte_groups(0x02, RS | BL)); // render it

        let mut i2c = expect_after_init(extra);
        let mut delayer = NoopDelay;
        {
            let mut sender = I2cSender::new(&mut i2c, ADDR);
            let mut lcd = Lcd::new(&mut sender, &mut delayer, Config::default()).unwrap();

            lcd.write_graph_to_cgram(2, &heart).unwrap();
            lcd.write_graph_to_cur(2).unwrap();
        }
        i2c.done();
    }

    #[test]
    fn out_of_range_glyph_slot_transmits_nothing() {
        let glyph = [0u8; 8];

        // no transactions beyond the handshake are expected
        let mut i2c = expect_after_init(Vec::new());
        let mut delayer = NoopDelay;
        {
            let mut sender = I2cSender::new(&mut i2c, ADDR);
            let mut lcd = Lcd::new(&mut sender, &mut delayer, Config::default()).unwrap();

            assert!(matches!(
                lcd.write_graph_to_cgram(8, &glyph),
                Err(Error::GlyphSlotOutOfRange)
            ));
            assert!(matches!(
                lcd.write_graph_to_cur(9),
                Err(Error::GlyphSlotOutOfRange)
            ));
        }
        i2c.done();
    }
}

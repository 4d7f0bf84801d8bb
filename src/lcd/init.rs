use embedded_hal::delay::DelayNs;

use crate::{
    command::{CommandSet, DataWidth, Font, LineMode, MoveDirection, ShiftType, State},
    lcd::Lcd,
    sender::SendCommand,
    state::LcdState,
    Error,
};

/// [`Config`] is the init config of a [`Lcd`]
#[derive(Default)]
pub struct Config {
    state: LcdState,
}

#[allow(missing_docs)]
impl Config {
    pub fn get_backlight(&self) -> State {
        self.state.get_backlight()
    }

    pub fn set_backlight(mut self, backlight: State) -> Self {
        self.state.set_backlight(backlight);
        self
    }

    pub fn get_line_mode(&self) -> LineMode {
        self.state.get_line_mode()
    }

    pub fn set_line_mode(mut self, line: LineMode) -> Self {
        self.state.set_line_mode(line);
        self
    }

    pub fn get_font(&self) -> Font {
        self.state.get_font()
    }

    pub fn set_font(mut self, font: Font) -> Self {
        self.state.set_font(font);
        self
    }

    pub fn get_display_state(&self) -> State {
        self.state.get_display_state()
    }

    pub fn set_display_state(mut self, display: State) -> Self {
        self.state.set_display_state(display);
        self
    }

    pub fn get_cursor_state(&self) -> State {
        self.state.get_cursor_state()
    }

    pub fn set_cursor_state(mut self, cursor: State) -> Self {
        self.state.set_cursor_state(cursor);
        self
    }

    pub fn get_cursor_blink(&self) -> State {
        self.state.get_cursor_blink()
    }

    pub fn set_cursor_blink(mut self, blink: State) -> Self {
        self.state.set_cursor_blink(blink);
        self
    }

    pub fn get_direction(&self) -> MoveDirection {
        self.state.get_direction()
    }

    pub fn set_direction(mut self, dir: MoveDirection) -> Self {
        self.state.set_direction(dir);
        self
    }

    pub fn get_shift_type(&self) -> ShiftType {
        self.state.get_shift_type()
    }

    pub fn set_shift_type(mut self, shift: ShiftType) -> Self {
        self.state.set_shift_type(shift);
        self
    }
}

impl<'a, 'b, Sender, Delayer> Lcd<'a, 'b, Sender, Delayer>
where
    Sender: SendCommand<Delayer>,
    Delayer: DelayNs,
{
    /// Create a [`Lcd`] driver, and init the LCD hardware.
    ///
    /// The handshake order comes straight from the controller's power-on
    /// reset procedure: after power-on stabilization, three wake-up nibbles
    /// force the controller through its reset states no matter which width
    /// mode it woke up in, and only then can it be switched to the 4-bit
    /// interface. Reordering any of this risks a controller stuck in 8-bit
    /// mode.
    ///
    /// A failed bus write aborts the handshake; no [`Lcd`] is handed out.
    pub fn new(
        sender: &'a mut Sender,
        delayer: &'b mut Delayer,
        config: Config,
    ) -> Result<Self, Error<Sender::Error>> {
        let state = config.state;

        // every handshake byte already has to carry the configured
        // backlight flag
        sender.set_backlight(state.get_backlight());

        sender
            .delay_and_send(CommandSet::WakeUp.into(), delayer, 300_000)
            .map_err(Error::Bus)?;

        sender
            .delay_and_send(CommandSet::WakeUp.into(), delayer, 5_000)
            .map_err(Error::Bus)?;

        sender
            .send(CommandSet::WakeUp.into(), delayer)
            .map_err(Error::Bus)?;

        // from here on the controller reads nibble pairs
        sender
            .send(CommandSet::HalfFunctionSet.into(), delayer)
            .map_err(Error::Bus)?;

        sender
            .send(
                CommandSet::FunctionSet(DataWidth::Bit4, state.get_line_mode(), state.get_font())
                    .into(),
                delayer,
            )
            .map_err(Error::Bus)?;

        sender
            .send(
                CommandSet::DisplayOnOff {
                    display: state.get_display_state(),
                    cursor: state.get_cursor_state(),
                    cursor_blink: state.get_cursor_blink(),
                }
                .into(),
                delayer,
            )
            .map_err(Error::Bus)?;

        sender
            .send(CommandSet::ClearDisplay.into(), delayer)
            .map_err(Error::Bus)?;

        // clear executes inside the controller, give it time to finish
        // before the entry mode goes out
        sender
            .delay_and_send(
                CommandSet::EntryModeSet(state.get_direction(), state.get_shift_type()).into(),
                delayer,
                5_000,
            )
            .map_err(Error::Bus)?;

        Ok(Lcd {
            sender,
            delayer,
            state,
        })
    }
}

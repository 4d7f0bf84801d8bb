//! The controller instruction set, and its encoding into raw command bytes

use crate::utils::BitOps;

/// Named instructions of the controller instruction set
#[derive(Clone, Copy)]
pub enum CommandSet {
    /// Raw `0x3` nibble of the power-on reset handshake.
    /// This is not a command from the datasheet's instruction table,
    /// it's the forced-reset transfer sent while the controller may
    /// still be in 8-bit mode; we name it, to make things tidy
    WakeUp,
    /// Raw `0x2` nibble that switches the controller to the 4-bit interface
    HalfFunctionSet,
    /// Blank the whole display and move the cursor to the origin
    ClearDisplay,
    /// Move the cursor to the origin without touching DDRAM
    ReturnHome,
    /// Set cursor advance direction and auto-shift behavior
    EntryModeSet(MoveDirection, ShiftType),
    /// Turn display, cursor and cursor blinking on or off
    DisplayOnOff {
        #[allow(missing_docs)]
        display: State,
        #[allow(missing_docs)]
        cursor: State,
        #[allow(missing_docs)]
        cursor_blink: State,
    },
    /// Shift the cursor, or the whole display content, one position
    CursorOrDisplayShift(ShiftType, MoveDirection),
    /// Configure bus width, line count and font
    FunctionSet(DataWidth, LineMode, Font),
    /// Point the address counter into CGRAM
    SetCGRAM(u8),
    /// Point the address counter into DDRAM
    SetDDRAM(u8),
    /// Write one byte at the address counter
    WriteDataToRAM(u8),
    /// Command with an empty payload; the controller ignores it, but the
    /// control-line bits of the transfer still reach the expander
    NoOp,
}

/// Cursor advance / shift direction
#[derive(Clone, Copy, PartialEq, Default)]
pub enum MoveDirection {
    #[allow(missing_docs)]
    RightToLeft,
    #[allow(missing_docs)]
    #[default]
    LeftToRight,
}

/// What a shift operation (or entry-mode auto-shift) moves
#[derive(Clone, Copy, PartialEq, Default)]
pub enum ShiftType {
    #[allow(missing_docs)]
    #[default]
    CursorOnly,
    #[allow(missing_docs)]
    CursorAndDisplay,
}

/// On/off state of a toggleable feature
#[derive(Clone, Copy, PartialEq, Default)]
pub enum State {
    #[allow(missing_docs)]
    Off,
    #[allow(missing_docs)]
    #[default]
    On,
}

/// Width of the data bus between expander and controller
#[derive(Clone, Copy, Default)]
pub enum DataWidth {
    #[allow(missing_docs)]
    #[default]
    Bit4,
    #[allow(missing_docs)]
    Bit8,
}

/// Line count of the panel
#[derive(Clone, Copy, Default, PartialEq)]
pub enum LineMode {
    #[allow(missing_docs)]
    OneLine,
    #[allow(missing_docs)]
    #[default]
    TwoLine,
}

/// Dot matrix size of a character cell
#[derive(Clone, Copy, Default, PartialEq)]
pub enum Font {
    #[allow(missing_docs)]
    #[default]
    Font5x8,
    #[allow(missing_docs)]
    Font5x11,
}

/// One encoded controller instruction, ready to hand to a sender
pub struct Command {
    rs: RegisterSelection,
    data: Bits,
}

#[derive(Clone, Copy, PartialEq)]
pub(crate) enum RegisterSelection {
    Command,
    Data,
}

#[derive(Clone, Copy, PartialEq)]
pub(crate) enum Bits {
    Bit4(u8),
    Bit8(u8),
}

impl Command {
    pub(crate) fn new(rs: RegisterSelection, data: Bits) -> Self {
        Self { rs, data }
    }

    pub(crate) fn get_register_selection(&self) -> RegisterSelection {
        self.rs
    }

    pub(crate) fn get_data(&self) -> Bits {
        self.data
    }
}

impl From<CommandSet> for Command {
    fn from(command: CommandSet) -> Self {
        match command {
            CommandSet::WakeUp => {
                Self::new(RegisterSelection::Command, Bits::Bit4(0b0011))
            }

            CommandSet::HalfFunctionSet => {
                Self::new(RegisterSelection::Command, Bits::Bit4(0b0010))
            }

            CommandSet::ClearDisplay => {
                let raw_bits: u8 = 0b0000_0001;
                Self::new(RegisterSelection::Command, Bits::Bit8(raw_bits))
            }

            CommandSet::ReturnHome => {
                let raw_bits: u8 = 0b0000_0010;
                Self::new(RegisterSelection::Command, Bits::Bit8(raw_bits))
            }

            CommandSet::EntryModeSet(dir, st) => {
                let mut raw_bits: u8 = 0b0000_0100;

                match dir {
                    MoveDirection::RightToLeft => raw_bits.clear_bit(1),
                    MoveDirection::LeftToRight => raw_bits.set_bit(1),
                };

                match st {
                    ShiftType::CursorOnly => raw_bits.clear_bit(0),
                    ShiftType::CursorAndDisplay => raw_bits.set_bit(0),
                };

                Self::new(RegisterSelection::Command, Bits::Bit8(raw_bits))
            }

            CommandSet::DisplayOnOff {
                display,
                cursor,
                cursor_blink,
            } => {
                let mut raw_bits = 0b0000_1000;

                match display {
                    State::Off => raw_bits.clear_bit(2),
                    State::On => raw_bits.set_bit(2),
                };
                match cursor {
                    State::Off => raw_bits.clear_bit(1),
                    State::On => raw_bits.set_bit(1),
                };
                match cursor_blink {
                    State::Off => raw_bits.clear_bit(0),
                    State::On => raw_bits.set_bit(0),
                };

                Self::new(RegisterSelection::Command, Bits::Bit8(raw_bits))
            }

            CommandSet::CursorOrDisplayShift(st, dir) => {
                let mut raw_bits = 0b0001_0000;

                match st {
                    ShiftType::CursorOnly => raw_bits.clear_bit(3),
                    ShiftType::CursorAndDisplay => raw_bits.set_bit(3),
                };

                match dir {
                    MoveDirection::RightToLeft => raw_bits.clear_bit(2),
                    MoveDirection::LeftToRight => raw_bits.set_bit(2),
                };

                Self::new(RegisterSelection::Command, Bits::Bit8(raw_bits))
            }

            CommandSet::FunctionSet(width, line, font) => {
                let mut raw_bits = 0b0010_0000;

                match width {
                    DataWidth::Bit4 => raw_bits.clear_bit(4),
                    DataWidth::Bit8 => raw_bits.set_bit(4),
                };

                match line {
                    LineMode::OneLine => raw_bits.clear_bit(3),
                    LineMode::TwoLine => raw_bits.set_bit(3),
                };

                match font {
                    Font::Font5x8 => raw_bits.clear_bit(2),
                    Font::Font5x11 => raw_bits.set_bit(2),
                };

                Self::new(RegisterSelection::Command, Bits::Bit8(raw_bits))
            }

            CommandSet::SetCGRAM(addr) => {
                let mut raw_bits = 0b0100_0000;

                assert!(addr < 2u8.pow(6), "CGRAM address out of range");

                raw_bits += addr;

                Self::new(RegisterSelection::Command, Bits::Bit8(raw_bits))
            }

            CommandSet::SetDDRAM(addr) => {
                let mut raw_bits = 0b1000_0000;

                assert!(addr < 2u8.pow(7), "DDRAM address out of range");

                raw_bits += addr;

                Self::new(RegisterSelection::Command, Bits::Bit8(raw_bits))
            }

            CommandSet::WriteDataToRAM(data) => {
                Self::new(RegisterSelection::Data, Bits::Bit8(data))
            }

            CommandSet::NoOp => Self::new(RegisterSelection::Command, Bits::Bit8(0)),
        }
    }
}

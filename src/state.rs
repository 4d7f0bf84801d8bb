use crate::command::{Font, LineMode, MoveDirection, ShiftType, State};

// The controller cannot be queried over this write-only wiring, so this
// struct is the only authoritative copy of the sticky flags; every encoded
// transfer re-asserts them.
pub(crate) struct LcdState {
    line: LineMode,
    font: Font,
    display_on: State,
    cursor_on: State,
    cursor_blink: State,
    direction: MoveDirection,
    shift_type: ShiftType,
    backlight: State,
}

impl Default for LcdState {
    fn default() -> Self {
        Self {
            line: LineMode::default(),
            font: Font::default(),
            display_on: State::On,
            cursor_on: State::Off,
            cursor_blink: State::Off,
            direction: MoveDirection::default(),
            shift_type: ShiftType::default(),
            backlight: State::On,
        }
    }
}

impl LcdState {
    pub(crate) fn get_backlight(&self) -> State {
        self.backlight
    }

    pub(crate) fn set_backlight(&mut self, backlight: State) {
        self.backlight = backlight;
    }

    pub(crate) fn get_line_mode(&self) -> LineMode {
        self.line
    }

    pub(crate) fn set_line_mode(&mut self, line: LineMode) {
        if line == LineMode::TwoLine {
            assert!(
                self.get_font() == Font::Font5x8,
                "font is 5x11, line cannot be 2"
            );
        }

        self.line = line;
    }

    pub(crate) fn get_font(&self) -> Font {
        self.font
    }

    pub(crate) fn set_font(&mut self, font: Font) {
        if font == Font::Font5x11 {
            assert!(
                self.get_line_mode() == LineMode::OneLine,
                "there is 2 line, font cannot be 5x11"
            );
        }

        self.font = font;
    }

    pub(crate) fn get_display_state(&self) -> State {
        self.display_on
    }

    pub(crate) fn set_display_state(&mut self, display: State) {
        self.display_on = display;
    }

    pub(crate) fn get_cursor_state(&self) -> State {
        self.cursor_on
    }

    pub(crate) fn set_cursor_state(&mut self, cursor: State) {
        self.cursor_on = cursor;
    }

    pub(crate) fn get_cursor_blink(&self) -> State {
        self.cursor_blink
    }

    pub(crate) fn set_cursor_blink(&mut self, blink: State) {
        self.cursor_blink = blink;
    }

    pub(crate) fn get_direction(&self) -> MoveDirection {
        self.direction
    }

    pub(crate) fn set_direction(&mut self, dir: MoveDirection) {
        self.direction = dir;
    }

    pub(crate) fn get_shift_type(&self) -> ShiftType {
        self.shift_type
    }

    pub(crate) fn set_shift_type(&mut self, shift: ShiftType) {
        self.shift_type = shift;
    }
}

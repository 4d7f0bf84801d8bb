#![no_std]
#![no_main]

use panic_rtt_target as _;
use rtt_target::{rprintln, rtt_init_print};
use stm32f4xx_hal::{
    i2c::{self, I2c},
    pac,
    prelude::*,
};

use lcd_i2c_driver::{
    command::{MoveDirection, ShiftType, State},
    lcd::{Config, Lcd},
    sender::I2cSender,
};

// a heart shape
const HEART: [u8; 8] = [
    0b00000, 0b00000, 0b01010, 0b11111, 0b01110, 0b00100, 0b00000, 0b00000,
];

// a smiley
const SMILEY: [u8; 8] = [
    0b00000, 0b00000, 0b01010, 0b00000, 0b10001, 0b01110, 0b00000, 0b00000,
];

#[cortex_m_rt::entry]
fn main() -> ! {
    rtt_init_print!();

    let dp = pac::Peripherals::take().expect("Cannot take device peripherals");
    let cp = pac::CorePeripherals::take().expect("Cannot take core peripherals");

    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.use_hse(12.MHz()).freeze();

    let mut delayer = cp.SYST.delay(&clocks);

    // init needed digital pins

    let gpiob = dp.GPIOB.split();

    let mut i2c = I2c::new(
        dp.I2C1,
        (gpiob.pb6, gpiob.pb7),
        i2c::Mode::standard(100.kHz()), // The PCF8574T max I2C speed
        &clocks,
    );

    // put bus and backpack address together
    let mut sender = I2cSender::new(&mut i2c, 0x27u8);

    // run the power-on handshake with default settings
    // (backlight on, 2 lines, 5x8 font, cursor left to right)
    let mut lcd = Lcd::new(&mut sender, &mut delayer, Config::default())
        .expect("LCD did not answer on the bus");

    rprintln!("LCD initialized");

    // put custom glyphs into CGRAM slots 1 and 2
    lcd.write_graph_to_cgram(1, &HEART).unwrap();
    lcd.write_graph_to_cgram(2, &SMILEY).unwrap();

    lcd.set_cursor_pos(0, 1).unwrap();
    lcd.write_str_to_cur("hello, world ").unwrap();
    lcd.write_graph_to_cur(1).unwrap();

    // second line, written in reverse from its right end
    lcd.set_direction(MoveDirection::RightToLeft).unwrap();
    lcd.set_cursor_pos(1, 15).unwrap();
    lcd.write_str_to_cur("!tsur").unwrap();
    lcd.set_direction(MoveDirection::LeftToRight).unwrap();

    // blink the backlight a few times
    for _ in 0..4 {
        lcd.set_backlight(State::Off).unwrap();
        lcd.delay_ms(500);
        lcd.set_backlight(State::On).unwrap();
        lcd.delay_ms(500);
    }

    // let the display window follow a few writes, then settle back
    lcd.set_shift_type(ShiftType::CursorAndDisplay).unwrap();
    lcd.set_cursor_pos(1, 0).unwrap();
    lcd.write_str_to_cur("auto").unwrap();
    lcd.set_shift_type(ShiftType::CursorOnly).unwrap();

    lcd.delay_ms(2_000);
    lcd.clean_display().unwrap();
    lcd.write_str_to_cur("scrolling ").unwrap();
    lcd.write_graph_to_cur(2).unwrap();
    lcd.return_home().unwrap();

    rprintln!("demo running, scrolling forever");

    // bounce the whole display content back and forth
    loop {
        for _ in 0..4 {
            lcd.delay_ms(500);
            lcd.shift_cursor_or_display(ShiftType::CursorAndDisplay, MoveDirection::RightToLeft)
                .unwrap();
        }
        for _ in 0..4 {
            lcd.delay_ms(500);
            lcd.shift_cursor_or_display(ShiftType::CursorAndDisplay, MoveDirection::LeftToRight)
                .unwrap();
        }
    }
}

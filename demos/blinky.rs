//! Blinks an LED
//!
//! This assumes that an LED is connected to pa5, as on the NUCLEO-G491RE board.

#![no_std]
#![no_main]

use panic_halt as _;

use cortex_m_rt::entry;
use stm32g491_hal::{
    chip::Stm32g491,
    gpio::{Gpio, Mode, PinConfig, Port, Pull, Speed},
};

#[entry]
fn main() -> ! {
    // Take the device registers; this only succeeds once.
    let chip = Stm32g491::take().unwrap();
    let gpio = Gpio::new(&chip);

    // The port must be clocked before any of its registers respond.
    gpio.enable_port_clock(Port::A);

    let pa5 = Port::A.pin(5).unwrap();
    gpio.configure(
        pa5,
        &PinConfig {
            mode: Mode::Output,
            speed: Speed::VeryHigh,
            pull: Pull::Down,
            ..PinConfig::default()
        },
    );

    let mut led = gpio.pin(pa5);
    led.set_low();

    loop {
        led.toggle();
        cortex_m::asm::delay(8_000_000);
    }
}

// Copyright 2023 The stm32g491-hal authors.
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Register banks in ordinary memory, for testing code that drives GPIO
//!
//! [`MockChip`] has the same register layout as the device, so every driver operation lands in
//! the same bits it would on hardware. Two hardware side effects have to be triggered by hand:
//! [`MockChip::update_bsrr`] applies pending `GPIOx_BSRR` writes to `GPIOx_ODR`, and
//! [`MockChip::set_input`] stands in for an external signal on a pin.

use crate::chip::RegisterMap;
use crate::gpio::{Pin, PinState, Port};
use crate::hal::{self, Field};
use crate::pac::{gpio, rcc};

/// Seven GPIO ports and an RCC block, all registers initially zero
#[derive(Default)]
pub struct MockChip {
    gpio: [gpio::RegisterBlock; 7],
    rcc: rcc::RegisterBlock,
}

impl MockChip {
    pub const fn new() -> Self {
        Self {
            gpio: [
                gpio::RegisterBlock::new(),
                gpio::RegisterBlock::new(),
                gpio::RegisterBlock::new(),
                gpio::RegisterBlock::new(),
                gpio::RegisterBlock::new(),
                gpio::RegisterBlock::new(),
                gpio::RegisterBlock::new(),
            ],
            rcc: rcc::RegisterBlock::new(),
        }
    }

    /// Register block of `port`, for inspecting what a driver wrote.
    #[inline]
    pub fn port(&self, port: Port) -> &gpio::RegisterBlock {
        &self.gpio[usize::from(port.index())]
    }

    /// Applies every pending bit set/reset request to the output data registers and clears
    /// `GPIOx_BSRR`, as the hardware does on each write.
    ///
    /// When both the set and the reset bit of a pin are pending, set wins (RM0440 9.4.7).
    ///
    /// Each `GPIOx_BSRR` store replaces the previous one, so only the last store before each
    /// call is applied. Call this after every [`Gpio::set`](crate::gpio::Gpio::set) or
    /// [`Gpio::clear`](crate::gpio::Gpio::clear) whose effect should be observed.
    pub fn update_bsrr(&self) {
        for port in self.gpio.iter() {
            let requests = hal::read_register(&port.bsrr);
            let set = requests & 0xFFFF;
            let reset = (requests >> 16) & !set;
            hal::clear_register(&port.odr, reset);
            hal::set_register(&port.odr, set);
            hal::write_register(&port.bsrr, 0);
        }
    }

    /// Drives the `GPIOx_IDR` bit of `pin` as an external signal would.
    pub fn set_input(&self, pin: Pin, state: PinState) {
        let idr = &self.port(pin.port()).idr;
        // A 1-bit field at a pin slot always fits.
        let field = Field::slot(pin.number(), 1);
        field.replace(idr, state as u32);
    }
}

impl RegisterMap for MockChip {
    #[inline]
    fn gpio(&self, port: Port) -> &gpio::RegisterBlock {
        self.port(port)
    }

    #[inline]
    fn rcc(&self) -> &rcc::RegisterBlock {
        &self.rcc
    }
}

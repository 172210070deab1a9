// Copyright 2023 The stm32g491-hal authors.
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # General purpose I/O
//!
//! Pins are identified by a [`Pin`] value (port + number) and configured through a [`Gpio`]
//! handle that borrows a [`RegisterMap`]. The handle keeps no state of its own: every setting
//! lives in the port's registers, so two handles over the same map see the same pins.
//!
//! ```
//! # #[cfg(feature = "mock")] {
//! use stm32g491_hal::gpio::{Gpio, Mode, Pin, PinState, Port, Pull, Speed};
//! use stm32g491_hal::mock::MockChip;
//!
//! let chip = MockChip::new();
//! let gpio = Gpio::new(&chip);
//! let pa5 = Pin::new(Port::A, 5).unwrap();
//!
//! gpio.enable_port_clock(Port::A);
//! gpio.set_mode(pa5, Mode::Output);
//! gpio.set_output_speed(pa5, Speed::VeryHigh);
//! gpio.set_pull(pa5, Pull::Down);
//!
//! gpio.set(pa5);
//! chip.update_bsrr();
//! assert_eq!(gpio.read(pa5), PinState::High);
//! # }
//! ```
//!
//! Configuration setters clear the pin's field and then OR in the new value. That is a
//! read-modify-write of a register shared by all 16 pins of the port, so it must not race with
//! another context configuring a different pin of the same port. [`Gpio::set`] and
//! [`Gpio::clear`] are single writes to the bit set/reset register and are safe to use from
//! several contexts at once.

use core::convert::{Infallible, TryFrom};
use core::fmt;

use embedded_hal::digital::v2::{InputPin, OutputPin, StatefulOutputPin, ToggleableOutputPin};
use log::{trace, warn};

use crate::chip::RegisterMap;
use crate::hal::{self, Field};
use crate::pac::gpio::RegisterBlock;
use crate::pac::Reg;

/// Pins per port
pub const PINS_PER_PORT: u8 = 16;

/// GPIO port (RM0440 9.3)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Port {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl Port {
    /// Every port, in index order
    pub const ALL: [Port; 7] = [
        Port::A,
        Port::B,
        Port::C,
        Port::D,
        Port::E,
        Port::F,
        Port::G,
    ];

    /// Index of the port: its bit in `RCC_AHB2ENR` and its block number in the memory map.
    #[inline]
    pub const fn index(self) -> u8 {
        match self {
            Port::A => 0,
            Port::B => 1,
            Port::C => 2,
            Port::D => 3,
            Port::E => 4,
            Port::F => 5,
            Port::G => 6,
        }
    }

    #[inline]
    pub const fn letter(self) -> char {
        (b'A' + self.index()) as char
    }

    /// Pin `number` of this port
    pub fn pin(self, number: u8) -> Result<Pin, Error> {
        Pin::new(self, number)
    }
}

impl TryFrom<char> for Port {
    type Error = Error;

    fn try_from(letter: char) -> Result<Self, Error> {
        Port::ALL
            .iter()
            .copied()
            .find(|port| port.letter() == letter.to_ascii_uppercase())
            .ok_or(Error::UnknownPort(letter))
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GPIO{}", self.letter())
    }
}

/// A pin location: port plus a number in `0..16`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pin {
    port: Port,
    number: u8,
}

impl Pin {
    pub fn new(port: Port, number: u8) -> Result<Self, Error> {
        if number < PINS_PER_PORT {
            Ok(Self { port, number })
        } else {
            Err(Error::InvalidPin(number))
        }
    }

    #[inline]
    pub const fn port(&self) -> Port {
        self.port
    }

    #[inline]
    pub const fn number(&self) -> u8 {
        self.number
    }

    #[inline]
    fn field(&self, width: u16) -> Field {
        Field::slot(self.number, width)
    }

    /// Pins that double as BOOT0 and NRST (RM0440 9.3.15-9.3.16)
    fn system_role(&self) -> Option<&'static str> {
        match (self.port, self.number) {
            (Port::B, 8) => Some("BOOT0"),
            (Port::G, 10) => Some("NRST"),
            _ => None,
        }
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}{}", self.port.letter(), self.number)
    }
}

/// Values for `GPIOx_MODER` (RM0440 9.4.1)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Mode {
    Input = 0b00,
    Output = 0b01,
    Alternate = 0b10,
    Analog = 0b11,
}

impl Mode {
    fn from_bits(bits: u32) -> Self {
        match bits & 0b11 {
            0b00 => Mode::Input,
            0b01 => Mode::Output,
            0b10 => Mode::Alternate,
            _ => Mode::Analog,
        }
    }
}

/// Values for `GPIOx_OTYPER` (RM0440 9.4.2)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputType {
    PushPull = 0,
    OpenDrain = 1,
}

/// Slew rates for `GPIOx_OSPEEDR` (RM0440 9.4.3)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Speed {
    VeryLow = 0b00,
    Low = 0b01,
    High = 0b10,
    VeryHigh = 0b11,
}

/// Values for `GPIOx_PUPDR` (RM0440 9.4.4). `0b11` is reserved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Pull {
    None = 0b00,
    Up = 0b01,
    Down = 0b10,
}

/// Values for `GPIOx_AFRL` and `GPIOx_AFRH` (RM0440 9.4.9-9.4.10)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum AltFn {
    Af0 = 0,
    Af1 = 1,
    Af2 = 2,
    Af3 = 3,
    Af4 = 4,
    Af5 = 5,
    Af6 = 6,
    Af7 = 7,
    Af8 = 8,
    Af9 = 9,
    Af10 = 10,
    Af11 = 11,
    Af12 = 12,
    Af13 = 13,
    Af14 = 14,
    Af15 = 15,
}

impl AltFn {
    const ALL: [AltFn; 16] = [
        AltFn::Af0,
        AltFn::Af1,
        AltFn::Af2,
        AltFn::Af3,
        AltFn::Af4,
        AltFn::Af5,
        AltFn::Af6,
        AltFn::Af7,
        AltFn::Af8,
        AltFn::Af9,
        AltFn::Af10,
        AltFn::Af11,
        AltFn::Af12,
        AltFn::Af13,
        AltFn::Af14,
        AltFn::Af15,
    ];
}

impl TryFrom<u8> for AltFn {
    type Error = Error;

    fn try_from(af: u8) -> Result<Self, Error> {
        AltFn::ALL
            .get(usize::from(af))
            .copied()
            .ok_or(Error::InvalidAlternateFunction(af))
    }
}

/// Digital pin state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum PinState {
    Low = 0,
    High = 1,
}

impl From<bool> for PinState {
    fn from(high: bool) -> Self {
        if high {
            PinState::High
        } else {
            PinState::Low
        }
    }
}

/// Port clock gate in `RCC_AHB2ENR` (RM0440 7.4.15)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum ClockStatus {
    Disabled = 0,
    Enabled = 1,
}

/// Every per-pin setting, applied together by [`Gpio::configure`]
///
/// The default matches the reset state of most pins: floating input, push-pull, lowest speed,
/// AF0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PinConfig {
    pub mode: Mode,
    pub output_type: OutputType,
    pub speed: Speed,
    pub pull: Pull,
    pub alternate_function: AltFn,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Input,
            output_type: OutputType::PushPull,
            speed: Speed::VeryLow,
            pull: Pull::None,
            alternate_function: AltFn::Af0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// Pin number is 16 or above
    InvalidPin(u8),
    /// No GPIO port with this letter
    UnknownPort(char),
    /// Alternate function number is 16 or above
    InvalidAlternateFunction(u8),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::InvalidPin(number) => write!(f, "pin {} is outside 0..16", number),
            Error::UnknownPort(letter) => write!(f, "no GPIO port {:?}", letter),
            Error::InvalidAlternateFunction(af) => {
                write!(f, "alternate function {} is outside 0..16", af)
            }
        }
    }
}

/// Stateless access to the GPIO ports of a register map
pub struct Gpio<'a, C> {
    chip: &'a C,
}

impl<'a, C> Clone for Gpio<'a, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, C> Copy for Gpio<'a, C> {}

impl<'a, C: RegisterMap> Gpio<'a, C> {
    pub fn new(chip: &'a C) -> Self {
        Self { chip }
    }

    #[inline]
    fn regs(&self, port: Port) -> &'a RegisterBlock {
        self.chip.gpio(port)
    }

    /// Binds `pin` to this register map, for use through the `embedded-hal` traits.
    pub fn pin(&self, pin: Pin) -> GpioPin<'a, C> {
        GpioPin { gpio: *self, pin }
    }

    pub fn set_mode(&self, pin: Pin, mode: Mode) {
        if let Some(role) = pin.system_role() {
            warn!("{} doubles as {}; switching it to {:?}", pin, role, mode);
        }
        trace!("{} mode {:?}", pin, mode);
        pin.field(2).replace(&self.regs(pin.port).moder, mode as u32);
    }

    /// Current mode of `pin`, as read back from `GPIOx_MODER`.
    pub fn mode(&self, pin: Pin) -> Mode {
        Mode::from_bits(pin.field(2).read(&self.regs(pin.port).moder))
    }

    pub fn set_output_type(&self, pin: Pin, output_type: OutputType) {
        pin.field(1)
            .replace(&self.regs(pin.port).otyper, output_type as u32);
    }

    pub fn set_output_speed(&self, pin: Pin, speed: Speed) {
        pin.field(2).replace(&self.regs(pin.port).ospeedr, speed as u32);
    }

    pub fn set_pull(&self, pin: Pin, pull: Pull) {
        pin.field(2).replace(&self.regs(pin.port).pupdr, pull as u32);
    }

    pub fn set_alternate_function(&self, pin: Pin, af: AltFn) {
        let (afr, slot) = self.regs(pin.port).afr(pin.number);
        Field::slot(slot, 4).replace(afr, af as u32);
    }

    /// Current alternate function of `pin`, as read back from `GPIOx_AFRL`/`GPIOx_AFRH`.
    pub fn alternate_function(&self, pin: Pin) -> AltFn {
        let (afr, slot) = self.regs(pin.port).afr(pin.number);
        // A 4-bit field always indexes the table.
        AltFn::ALL[Field::slot(slot, 4).read(afr) as usize]
    }

    /// Applies every setting in `config` to `pin`.
    pub fn configure(&self, pin: Pin, config: &PinConfig) {
        self.set_mode(pin, config.mode);
        self.set_output_type(pin, config.output_type);
        self.set_output_speed(pin, config.speed);
        self.set_pull(pin, config.pull);
        self.set_alternate_function(pin, config.alternate_function);
    }

    /// Digital level of `pin`.
    ///
    /// Inputs report `GPIOx_IDR`, outputs report `GPIOx_ODR`. Pins in alternate or analog mode
    /// report [`PinState::Low`].
    pub fn read(&self, pin: Pin) -> PinState {
        let regs = self.regs(pin.port);
        let data = match self.mode(pin) {
            Mode::Input => &regs.idr,
            Mode::Output => &regs.odr,
            Mode::Alternate | Mode::Analog => return PinState::Low,
        };
        PinState::from(pin.field(1).read(data) != 0)
    }

    /// Drives `pin` high through `GPIOx_BSRR`, without touching any other pin.
    #[inline]
    pub fn set(&self, pin: Pin) {
        // NOTE a single store; BSRR ignores zero bits
        hal::write_register(&self.regs(pin.port).bsrr, 1 << pin.number);
    }

    /// Drives `pin` low through the reset half (bits 16-31) of `GPIOx_BSRR`.
    #[inline]
    pub fn clear(&self, pin: Pin) {
        hal::write_register(&self.regs(pin.port).bsrr, 1 << (pin.number + 16));
    }

    pub fn set_port_clock(&self, port: Port, status: ClockStatus) {
        trace!("{} clock {:?}", port, status);
        Field::slot(port.index(), 1).replace(&self.chip.rcc().ahb2enr, status as u32);
    }

    #[inline]
    pub fn enable_port_clock(&self, port: Port) {
        self.set_port_clock(port, ClockStatus::Enabled)
    }

    #[inline]
    pub fn disable_port_clock(&self, port: Port) {
        self.set_port_clock(port, ClockStatus::Disabled)
    }

    /// Whether the clock of `port` is gated on.
    pub fn port_clock(&self, port: Port) -> ClockStatus {
        match Field::slot(port.index(), 1).read(&self.chip.rcc().ahb2enr) {
            0 => ClockStatus::Disabled,
            _ => ClockStatus::Enabled,
        }
    }
}

/// A pin bound to a register map
///
/// Implements the `embedded-hal` digital traits. Unlike [`Gpio::read`], the trait methods do
/// not look at the pin's mode: [`InputPin`] always reports `GPIOx_IDR` and
/// [`StatefulOutputPin`] always reports `GPIOx_ODR`.
pub struct GpioPin<'a, C> {
    gpio: Gpio<'a, C>,
    pin: Pin,
}

impl<'a, C: RegisterMap> GpioPin<'a, C> {
    #[inline]
    pub fn pin(&self) -> Pin {
        self.pin
    }

    #[inline]
    fn data_bit(&self, data: &Reg) -> bool {
        self.pin.field(1).read(data) != 0
    }

    #[inline]
    pub fn set_high(&mut self) {
        self.gpio.set(self.pin)
    }

    #[inline]
    pub fn set_low(&mut self) {
        self.gpio.clear(self.pin)
    }

    #[inline]
    pub fn set_state(&mut self, state: PinState) {
        match state {
            PinState::High => self.set_high(),
            PinState::Low => self.set_low(),
        }
    }

    #[inline]
    pub fn is_high(&self) -> bool {
        self.data_bit(&self.gpio.regs(self.pin.port).idr)
    }

    #[inline]
    pub fn is_low(&self) -> bool {
        !self.is_high()
    }

    #[inline]
    pub fn is_set_high(&self) -> bool {
        self.data_bit(&self.gpio.regs(self.pin.port).odr)
    }

    #[inline]
    pub fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }

    /// Inverts the output through `GPIOx_BSRR`, so other pins of the port are never rewritten.
    #[inline]
    pub fn toggle(&mut self) {
        if self.is_set_high() {
            self.set_low()
        } else {
            self.set_high()
        }
    }
}

impl<'a, C: RegisterMap> OutputPin for GpioPin<'a, C> {
    type Error = Infallible;

    #[inline]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        GpioPin::set_high(self);
        Ok(())
    }

    #[inline]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        GpioPin::set_low(self);
        Ok(())
    }
}

impl<'a, C: RegisterMap> StatefulOutputPin for GpioPin<'a, C> {
    #[inline]
    fn is_set_high(&self) -> Result<bool, Self::Error> {
        Ok(GpioPin::is_set_high(self))
    }

    #[inline]
    fn is_set_low(&self) -> Result<bool, Self::Error> {
        Ok(GpioPin::is_set_low(self))
    }
}

impl<'a, C: RegisterMap> ToggleableOutputPin for GpioPin<'a, C> {
    type Error = Infallible;

    #[inline]
    fn toggle(&mut self) -> Result<(), Self::Error> {
        GpioPin::toggle(self);
        Ok(())
    }
}

impl<'a, C: RegisterMap> InputPin for GpioPin<'a, C> {
    type Error = Infallible;

    #[inline]
    fn is_high(&self) -> Result<bool, Self::Error> {
        Ok(GpioPin::is_high(self))
    }

    #[inline]
    fn is_low(&self) -> Result<bool, Self::Error> {
        Ok(GpioPin::is_low(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::read_field;
    use crate::mock::MockChip;

    const MODES: [Mode; 4] = [Mode::Input, Mode::Output, Mode::Alternate, Mode::Analog];

    fn all_pins() -> Vec<Pin> {
        Port::ALL
            .iter()
            .flat_map(|&port| (0..PINS_PER_PORT).map(move |number| Pin::new(port, number).unwrap()))
            .collect()
    }

    #[test]
    fn pin_numbers_stop_at_fifteen() {
        assert!(Pin::new(Port::C, 15).is_ok());
        assert_eq!(Pin::new(Port::C, 16), Err(Error::InvalidPin(16)));
        assert_eq!(Port::D.pin(200), Err(Error::InvalidPin(200)));
    }

    #[test]
    fn port_letters_and_indices() {
        for (index, port) in Port::ALL.iter().enumerate() {
            assert_eq!(usize::from(port.index()), index);
            assert_eq!(Port::try_from(port.letter()), Ok(*port));
        }
        assert_eq!(Port::try_from('g'), Ok(Port::G));
        assert_eq!(Port::try_from('H'), Err(Error::UnknownPort('H')));
    }

    #[test]
    fn alternate_function_numbers() {
        assert_eq!(AltFn::try_from(15), Ok(AltFn::Af15));
        assert_eq!(AltFn::try_from(16), Err(Error::InvalidAlternateFunction(16)));
    }

    #[test]
    fn pin_display() {
        let pin = Pin::new(Port::A, 5).unwrap();
        assert_eq!(format!("{}", pin), "PA5");
        assert_eq!(format!("{}", Port::G), "GPIOG");
    }

    #[test]
    fn set_mode_writes_two_bit_slot() {
        let chip = MockChip::new();
        let gpio = Gpio::new(&chip);
        for pin in all_pins() {
            for &mode in MODES.iter() {
                gpio.set_mode(pin, mode);
                let moder = &chip.port(pin.port()).moder;
                assert_eq!(
                    read_field(moder, u16::from(pin.number()), 2),
                    Ok(mode as u32)
                );
                assert_eq!(gpio.mode(pin), mode);
            }
        }
    }

    #[test]
    fn configuration_leaves_neighbours_alone() {
        let chip = MockChip::new();
        let gpio = Gpio::new(&chip);
        let pb3 = Pin::new(Port::B, 3).unwrap();
        let regs = chip.port(Port::B);
        regs.moder.set(0xFFFF_FFFF);
        regs.ospeedr.set(0xFFFF_FFFF);

        gpio.set_mode(pb3, Mode::Output);
        gpio.set_output_speed(pb3, Speed::Low);

        assert_eq!(regs.moder.get(), 0xFFFF_FFFF & !(0b10 << 6));
        assert_eq!(regs.ospeedr.get(), 0xFFFF_FFFF & !(0b10 << 6));
    }

    #[test]
    fn output_type_speed_and_pull() {
        let chip = MockChip::new();
        let gpio = Gpio::new(&chip);
        for pin in all_pins() {
            let regs = chip.port(pin.port());
            let slot = u16::from(pin.number());

            for &ty in [OutputType::OpenDrain, OutputType::PushPull].iter() {
                gpio.set_output_type(pin, ty);
                assert_eq!(read_field(&regs.otyper, slot, 1), Ok(ty as u32));
            }
            for &speed in [Speed::VeryLow, Speed::Low, Speed::High, Speed::VeryHigh].iter() {
                gpio.set_output_speed(pin, speed);
                assert_eq!(read_field(&regs.ospeedr, slot, 2), Ok(speed as u32));
            }
            for &pull in [Pull::Up, Pull::Down, Pull::None].iter() {
                gpio.set_pull(pin, pull);
                assert_eq!(read_field(&regs.pupdr, slot, 2), Ok(pull as u32));
            }
        }
    }

    #[test]
    fn alternate_function_register_split() {
        let chip = MockChip::new();
        let gpio = Gpio::new(&chip);
        let regs = chip.port(Port::A);

        gpio.set_alternate_function(Pin::new(Port::A, 7).unwrap(), AltFn::Af9);
        assert_eq!(read_field(&regs.afr[0], 7, 4), Ok(9));
        assert_eq!(regs.afr[1].get(), 0);

        gpio.set_alternate_function(Pin::new(Port::A, 8).unwrap(), AltFn::Af12);
        assert_eq!(read_field(&regs.afr[1], 0, 4), Ok(12));
        assert_eq!(regs.afr[0].get(), 9 << 28);
    }

    #[test]
    fn alternate_function_every_value() {
        let chip = MockChip::new();
        let gpio = Gpio::new(&chip);
        for pin in all_pins() {
            for &af in AltFn::ALL.iter() {
                gpio.set_alternate_function(pin, af);
                assert_eq!(gpio.alternate_function(pin), af);
            }
        }
    }

    #[test]
    fn configure_applies_every_setting() {
        let chip = MockChip::new();
        let gpio = Gpio::new(&chip);
        let pc13 = Pin::new(Port::C, 13).unwrap();
        let config = PinConfig {
            mode: Mode::Alternate,
            output_type: OutputType::OpenDrain,
            speed: Speed::High,
            pull: Pull::Up,
            alternate_function: AltFn::Af4,
        };

        gpio.configure(pc13, &config);

        let regs = chip.port(Port::C);
        assert_eq!(gpio.mode(pc13), Mode::Alternate);
        assert_eq!(read_field(&regs.otyper, 13, 1), Ok(1));
        assert_eq!(read_field(&regs.ospeedr, 13, 2), Ok(0b10));
        assert_eq!(read_field(&regs.pupdr, 13, 2), Ok(0b01));
        assert_eq!(gpio.alternate_function(pc13), AltFn::Af4);

        gpio.configure(pc13, &PinConfig::default());
        assert_eq!(regs.moder.get(), 0);
        assert_eq!(regs.otyper.get(), 0);
        assert_eq!(regs.afr[1].get(), 0);
    }

    #[test]
    fn read_set_clear_by_mode() {
        let chip = MockChip::new();
        let gpio = Gpio::new(&chip);
        for pin in all_pins() {
            for &mode in MODES.iter() {
                gpio.set_mode(pin, mode);
                match mode {
                    Mode::Output => {
                        gpio.set(pin);
                        chip.update_bsrr();
                        assert_eq!(gpio.read(pin), PinState::High);

                        gpio.clear(pin);
                        chip.update_bsrr();
                        assert_eq!(gpio.read(pin), PinState::Low);
                    }
                    Mode::Input | Mode::Alternate | Mode::Analog => {
                        assert_eq!(gpio.read(pin), PinState::Low);
                    }
                }
            }
        }
    }

    #[test]
    fn input_reads_idr_and_other_modes_read_low() {
        let chip = MockChip::new();
        let gpio = Gpio::new(&chip);
        let pd2 = Pin::new(Port::D, 2).unwrap();

        chip.set_input(pd2, PinState::High);
        gpio.set_mode(pd2, Mode::Input);
        assert_eq!(gpio.read(pd2), PinState::High);

        gpio.set_mode(pd2, Mode::Analog);
        assert_eq!(gpio.read(pd2), PinState::Low);
        gpio.set_mode(pd2, Mode::Alternate);
        assert_eq!(gpio.read(pd2), PinState::Low);
    }

    #[test]
    fn set_and_clear_are_idempotent() {
        let chip = MockChip::new();
        let gpio = Gpio::new(&chip);
        let pe1 = Pin::new(Port::E, 1).unwrap();
        gpio.set_mode(pe1, Mode::Output);

        gpio.clear(pe1);
        chip.update_bsrr();
        gpio.clear(pe1);
        chip.update_bsrr();
        assert_eq!(gpio.read(pe1), PinState::Low);

        gpio.set(pe1);
        chip.update_bsrr();
        gpio.set(pe1);
        chip.update_bsrr();
        assert_eq!(gpio.read(pe1), PinState::High);
    }

    #[test]
    fn set_is_independent_per_pin() {
        let chip = MockChip::new();
        let gpio = Gpio::new(&chip);
        for pin in (0..PINS_PER_PORT).map(|n| Pin::new(Port::F, n).unwrap()) {
            gpio.set_mode(pin, Mode::Output);
        }
        let a = Pin::new(Port::F, 2).unwrap();
        let b = Pin::new(Port::F, 11).unwrap();

        gpio.set(a);
        chip.update_bsrr();
        gpio.set(b);
        chip.update_bsrr();

        assert_eq!(gpio.read(a), PinState::High);
        assert_eq!(gpio.read(b), PinState::High);
        assert_eq!(chip.port(Port::F).odr.get(), (1 << 2) | (1 << 11));
    }

    #[test]
    fn boot_and_reset_pins_have_system_roles() {
        assert_eq!(Pin::new(Port::B, 8).unwrap().system_role(), Some("BOOT0"));
        assert_eq!(Pin::new(Port::G, 10).unwrap().system_role(), Some("NRST"));
        assert_eq!(Pin::new(Port::A, 8).unwrap().system_role(), None);
        assert_eq!(Pin::new(Port::B, 9).unwrap().system_role(), None);

        // Reconfiguring a system pin only warns; the write still happens.
        let chip = MockChip::new();
        let gpio = Gpio::new(&chip);
        let boot0 = Pin::new(Port::B, 8).unwrap();
        gpio.set_mode(boot0, Mode::Output);
        assert_eq!(gpio.mode(boot0), Mode::Output);
    }

    #[test]
    fn set_and_clear_write_bsrr_without_read_modify_write() {
        let chip = MockChip::new();
        let gpio = Gpio::new(&chip);
        let bsrr = &chip.port(Port::A).bsrr;

        gpio.set(Pin::new(Port::A, 4).unwrap());
        assert_eq!(bsrr.get(), 1 << 4);
        gpio.clear(Pin::new(Port::A, 9).unwrap());
        assert_eq!(bsrr.get(), 1 << 25);
    }

    #[test]
    fn blinky_scenario() {
        let chip = MockChip::new();
        let gpio = Gpio::new(&chip);
        let pa5 = Pin::new(Port::A, 5).unwrap();

        gpio.set_mode(pa5, Mode::Output);
        gpio.set_output_speed(pa5, Speed::VeryHigh);
        gpio.set_pull(pa5, Pull::Down);

        gpio.clear(pa5);
        chip.update_bsrr();
        assert_eq!(gpio.read(pa5), PinState::Low);

        gpio.set(pa5);
        chip.update_bsrr();
        assert_eq!(gpio.read(pa5), PinState::High);
    }

    #[test]
    fn port_clock_gating() {
        let chip = MockChip::new();
        let gpio = Gpio::new(&chip);
        let ahb2enr = &chip.rcc().ahb2enr;
        ahb2enr.set(0xFFFF_0000);

        for &port in Port::ALL.iter() {
            gpio.enable_port_clock(port);
            assert_eq!(
                read_field(ahb2enr, u16::from(port.index()), 1),
                Ok(ClockStatus::Enabled as u32)
            );
        }
        assert_eq!(ahb2enr.get(), 0xFFFF_007F);

        gpio.set_port_clock(Port::C, ClockStatus::Disabled);
        assert_eq!(gpio.port_clock(Port::C), ClockStatus::Disabled);
        assert_eq!(gpio.port_clock(Port::B), ClockStatus::Enabled);
        assert_eq!(ahb2enr.get(), 0xFFFF_007B);

        gpio.disable_port_clock(Port::G);
        assert_eq!(ahb2enr.get(), 0xFFFF_003B);
    }

    #[test]
    fn embedded_hal_output_and_toggle() {
        let chip = MockChip::new();
        let gpio = Gpio::new(&chip);
        let pb0 = Pin::new(Port::B, 0).unwrap();
        gpio.set_mode(pb0, Mode::Output);
        let mut led = gpio.pin(pb0);

        OutputPin::set_high(&mut led).unwrap();
        chip.update_bsrr();
        assert_eq!(StatefulOutputPin::is_set_high(&led), Ok(true));

        ToggleableOutputPin::toggle(&mut led).unwrap();
        chip.update_bsrr();
        assert_eq!(StatefulOutputPin::is_set_low(&led), Ok(true));
        assert_eq!(gpio.read(pb0), PinState::Low);

        led.set_state(PinState::High);
        chip.update_bsrr();
        assert!(led.is_set_high());
    }

    #[test]
    fn embedded_hal_input() {
        let chip = MockChip::new();
        let gpio = Gpio::new(&chip);
        let pc7 = Pin::new(Port::C, 7).unwrap();
        let button = gpio.pin(pc7);

        assert_eq!(InputPin::is_low(&button), Ok(true));
        chip.set_input(pc7, PinState::High);
        assert_eq!(InputPin::is_high(&button), Ok(true));
        assert_eq!(button.pin(), pc7);
    }
}

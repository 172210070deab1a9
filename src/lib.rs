// Copyright 2023 The stm32g491-hal authors.
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # HAL for the STM32G491 microcontroller
//!
//! Register field access and a GPIO driver for the STM32G491, with an implementation of the
//! [`embedded-hal`] digital pin traits.
//!
//! [`embedded-hal`]: https://crates.io/crates/embedded-hal
//!
//! # Layers
//!
//! - [`hal`]: read/set/clear of whole registers and of fields inside them.
//! - [`gpio`]: pin configuration, digital read, atomic set/clear and port clock gating, built
//!   on [`hal`].
//! - [`chip`]: the [`RegisterMap`](chip::RegisterMap) trait the GPIO driver is generic over,
//!   and its implementation for the real device.
//! - [`pac`]: register block layouts and base addresses.
//!
//! # Usage
//!
//! ```no_run
//! use stm32g491_hal::chip::Stm32g491;
//! use stm32g491_hal::gpio::{Gpio, Mode, PinConfig, Port};
//!
//! // Take ownership of the device registers once, at startup.
//! let chip = Stm32g491::take().unwrap();
//! let gpio = Gpio::new(&chip);
//!
//! gpio.enable_port_clock(Port::A);
//! let pa5 = Port::A.pin(5).unwrap();
//! gpio.configure(pa5, &PinConfig { mode: Mode::Output, ..PinConfig::default() });
//!
//! let mut led = gpio.pin(pa5);
//! led.set_high();
//! ```
//!
//! # Testing
//!
//! With the `mock` feature the `mock` module provides `MockChip`, a register map in ordinary
//! memory, so code built on [`gpio::Gpio`] can be tested on the host.

#![cfg_attr(not(test), no_std)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod chip;
pub mod gpio;
pub mod hal;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod pac;

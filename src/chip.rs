// Copyright 2023 The stm32g491-hal authors.
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Device handles
//!
//! [`RegisterMap`] is the one thing the GPIO model needs from a chip: the register block of each
//! port and of RCC. [`Stm32g491`] implements it over the real memory map; the
//! `mock` module implements it over ordinary memory.

use core::marker::PhantomData;

use crate::gpio::Port;
use crate::pac::{self, gpio, rcc};

/// Source of the register blocks used by [`Gpio`](crate::gpio::Gpio)
pub trait RegisterMap {
    /// Register block of GPIO `port`
    fn gpio(&self, port: Port) -> &gpio::RegisterBlock;

    /// Reset and clock control register block
    fn rcc(&self) -> &rcc::RegisterBlock;
}

static mut TAKEN: bool = false;

/// The STM32G491's peripheral registers at their reference-manual addresses
///
/// Only one instance exists at a time; get it from [`Stm32g491::take`] at startup and pass it by
/// reference to the drivers that need it.
pub struct Stm32g491 {
    _marker: PhantomData<*const ()>,
}

impl Stm32g491 {
    /// Returns the device handles, or `None` if they have already been taken.
    #[inline]
    pub fn take() -> Option<Self> {
        critical_section::with(|_| {
            // NOTE(unsafe) the flag is only touched inside a critical section
            if unsafe { TAKEN } {
                None
            } else {
                Some(unsafe { Self::steal() })
            }
        })
    }

    /// Returns the device handles without checking whether they were already taken.
    ///
    /// # Safety
    ///
    /// Another handle may exist, and its configuration can be changed behind its back.
    #[inline]
    pub unsafe fn steal() -> Self {
        TAKEN = true;
        Self {
            _marker: PhantomData,
        }
    }

    const fn gpio_ptr(port: Port) -> *const gpio::RegisterBlock {
        (pac::GPIO_BASE + pac::GPIO_STRIDE * port.index() as usize) as *const _
    }

    const fn rcc_ptr() -> *const rcc::RegisterBlock {
        pac::RCC_BASE as *const _
    }
}

impl RegisterMap for Stm32g491 {
    #[inline(always)]
    fn gpio(&self, port: Port) -> &gpio::RegisterBlock {
        // NOTE(unsafe) fixed, always-mapped peripheral address; all access is volatile
        unsafe { &*Self::gpio_ptr(port) }
    }

    #[inline(always)]
    fn rcc(&self) -> &rcc::RegisterBlock {
        // NOTE(unsafe) fixed, always-mapped peripheral address; all access is volatile
        unsafe { &*Self::rcc_ptr() }
    }
}

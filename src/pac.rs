// Copyright 2023 The stm32g491-hal authors.
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Register map for the peripherals this crate drives
//!
//! Layouts and base addresses follow the STM32G4 reference manual (RM0440). Every register is a
//! [`Reg`], so a block can live either at its fixed hardware address or in ordinary memory for
//! tests.

use vcell::VolatileCell;

/// A 32-bit memory-mapped register
pub type Reg = VolatileCell<u32>;

/// Base address of GPIOA; the other ports follow at [`GPIO_STRIDE`] intervals
pub const GPIO_BASE: usize = 0x4800_0000;

/// Distance between consecutive GPIO port blocks
pub const GPIO_STRIDE: usize = 0x400;

/// Base address of the reset and clock control block
pub const RCC_BASE: usize = 0x4002_1000;

/// General purpose I/O port (RM0440 9.4)
pub mod gpio {
    use super::Reg;
    use vcell::VolatileCell;

    #[repr(C)]
    pub struct RegisterBlock {
        /// 0x00 - mode
        pub moder: Reg,
        /// 0x04 - output type
        pub otyper: Reg,
        /// 0x08 - output speed
        pub ospeedr: Reg,
        /// 0x0C - pull-up/pull-down
        pub pupdr: Reg,
        /// 0x10 - input data
        pub idr: Reg,
        /// 0x14 - output data
        pub odr: Reg,
        /// 0x18 - bit set/reset
        pub bsrr: Reg,
        /// 0x1C - configuration lock
        pub lckr: Reg,
        /// 0x20 - alternate function low (pins 0-7) and high (pins 8-15)
        pub afr: [Reg; 2],
        /// 0x28 - bit reset
        pub brr: Reg,
    }

    impl RegisterBlock {
        /// A block with every register zeroed, for use outside the hardware address space.
        pub const fn new() -> Self {
            Self {
                moder: VolatileCell::new(0),
                otyper: VolatileCell::new(0),
                ospeedr: VolatileCell::new(0),
                pupdr: VolatileCell::new(0),
                idr: VolatileCell::new(0),
                odr: VolatileCell::new(0),
                bsrr: VolatileCell::new(0),
                lckr: VolatileCell::new(0),
                afr: [VolatileCell::new(0), VolatileCell::new(0)],
                brr: VolatileCell::new(0),
            }
        }

        /// Alternate function register holding `pin`, and the pin's 4-bit slot within it.
        ///
        /// Pins 0-7 live in `AFR[0]`, pins 8-15 in `AFR[1]` at slot `pin - 8`.
        #[inline]
        pub fn afr(&self, pin: u8) -> (&Reg, u8) {
            if pin < 8 {
                (&self.afr[0], pin)
            } else {
                (&self.afr[1], pin - 8)
            }
        }
    }

    impl Default for RegisterBlock {
        fn default() -> Self {
            Self::new()
        }
    }
}

/// Reset and clock control (RM0440 7.4)
pub mod rcc {
    use super::Reg;
    use vcell::VolatileCell;

    #[repr(C)]
    pub struct RegisterBlock {
        /// 0x00 - clock control
        pub cr: Reg,
        /// 0x04 - internal clock sources calibration
        pub icscr: Reg,
        /// 0x08 - clock configuration
        pub cfgr: Reg,
        /// 0x0C - PLL configuration
        pub pllcfgr: Reg,
        _reserved0: [Reg; 2],
        /// 0x18 - clock interrupt enable
        pub cier: Reg,
        /// 0x1C - clock interrupt flag
        pub cifr: Reg,
        /// 0x20 - clock interrupt clear
        pub cicr: Reg,
        _reserved1: Reg,
        /// 0x28 - AHB1 peripheral reset
        pub ahb1rstr: Reg,
        /// 0x2C - AHB2 peripheral reset
        pub ahb2rstr: Reg,
        /// 0x30 - AHB3 peripheral reset
        pub ahb3rstr: Reg,
        _reserved2: Reg,
        /// 0x38 - APB1 peripheral reset 1
        pub apb1rstr1: Reg,
        /// 0x3C - APB1 peripheral reset 2
        pub apb1rstr2: Reg,
        /// 0x40 - APB2 peripheral reset
        pub apb2rstr: Reg,
        _reserved3: Reg,
        /// 0x48 - AHB1 peripheral clock enable
        pub ahb1enr: Reg,
        /// 0x4C - AHB2 peripheral clock enable; bits 0-6 gate GPIOA-GPIOG
        pub ahb2enr: Reg,
        /// 0x50 - AHB3 peripheral clock enable
        pub ahb3enr: Reg,
        _reserved4: Reg,
        /// 0x58 - APB1 peripheral clock enable 1
        pub apb1enr1: Reg,
        /// 0x5C - APB1 peripheral clock enable 2
        pub apb1enr2: Reg,
        /// 0x60 - APB2 peripheral clock enable
        pub apb2enr: Reg,
        _reserved5: Reg,
        /// 0x68 - AHB1 clock enable in sleep and stop modes
        pub ahb1smenr: Reg,
        /// 0x6C - AHB2 clock enable in sleep and stop modes
        pub ahb2smenr: Reg,
        /// 0x70 - AHB3 clock enable in sleep and stop modes
        pub ahb3smenr: Reg,
        _reserved6: Reg,
        /// 0x78 - APB1 clock enable in sleep and stop modes 1
        pub apb1smenr1: Reg,
        /// 0x7C - APB1 clock enable in sleep and stop modes 2
        pub apb1smenr2: Reg,
        /// 0x80 - APB2 clock enable in sleep and stop modes
        pub apb2smenr: Reg,
        _reserved7: Reg,
        /// 0x88 - peripherals independent clock configuration
        pub ccipr: Reg,
        _reserved8: Reg,
        /// 0x90 - backup domain control
        pub bdcr: Reg,
        /// 0x94 - control and status
        pub csr: Reg,
        /// 0x98 - clock recovery RC
        pub crrcr: Reg,
        /// 0x9C - peripherals independent clock configuration 2
        pub ccipr2: Reg,
    }

    impl RegisterBlock {
        /// A block with every register zeroed, for use outside the hardware address space.
        pub const fn new() -> Self {
            Self {
                cr: VolatileCell::new(0),
                icscr: VolatileCell::new(0),
                cfgr: VolatileCell::new(0),
                pllcfgr: VolatileCell::new(0),
                _reserved0: [VolatileCell::new(0), VolatileCell::new(0)],
                cier: VolatileCell::new(0),
                cifr: VolatileCell::new(0),
                cicr: VolatileCell::new(0),
                _reserved1: VolatileCell::new(0),
                ahb1rstr: VolatileCell::new(0),
                ahb2rstr: VolatileCell::new(0),
                ahb3rstr: VolatileCell::new(0),
                _reserved2: VolatileCell::new(0),
                apb1rstr1: VolatileCell::new(0),
                apb1rstr2: VolatileCell::new(0),
                apb2rstr: VolatileCell::new(0),
                _reserved3: VolatileCell::new(0),
                ahb1enr: VolatileCell::new(0),
                ahb2enr: VolatileCell::new(0),
                ahb3enr: VolatileCell::new(0),
                _reserved4: VolatileCell::new(0),
                apb1enr1: VolatileCell::new(0),
                apb1enr2: VolatileCell::new(0),
                apb2enr: VolatileCell::new(0),
                _reserved5: VolatileCell::new(0),
                ahb1smenr: VolatileCell::new(0),
                ahb2smenr: VolatileCell::new(0),
                ahb3smenr: VolatileCell::new(0),
                _reserved6: VolatileCell::new(0),
                apb1smenr1: VolatileCell::new(0),
                apb1smenr2: VolatileCell::new(0),
                apb2smenr: VolatileCell::new(0),
                _reserved7: VolatileCell::new(0),
                ccipr: VolatileCell::new(0),
                _reserved8: VolatileCell::new(0),
                bdcr: VolatileCell::new(0),
                csr: VolatileCell::new(0),
                crrcr: VolatileCell::new(0),
                ccipr2: VolatileCell::new(0),
            }
        }
    }

    impl Default for RegisterBlock {
        fn default() -> Self {
            Self::new()
        }
    }
}

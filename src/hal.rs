// Copyright 2023 The stm32g491-hal authors.
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Register field access
//!
//! Generic read/set/clear operations on 32-bit memory-mapped registers, both on whole registers
//! and on fields inside them.
//!
//! A field is addressed by a *slot* and a width, not by a bit offset: the field occupies bits
//! `[position * width, position * width + width)`. This matches the layout of the GPIO
//! configuration registers, where pin `n` owns slot `n` of every per-pin field.
//!
//! ```
//! use stm32g491_hal::{hal, pac::Reg};
//!
//! let reg = Reg::new(0);
//! // Slot 5 of a 2-bit field is bits 10 and 11.
//! hal::write_field(&reg, 5, 2, 0b01).unwrap();
//! assert_eq!(reg.get(), 0b01 << 10);
//! assert_eq!(hal::read_field(&reg, 5, 2), Ok(0b01));
//! ```
//!
//! All accesses are volatile. Read-modify-write operations are not atomic with respect to
//! interrupts or other bus masters.

use core::fmt;

use crate::pac::Reg;

/// Widest field supported by [`BITMASKS`]
pub const MAX_WIDTH: u16 = 16;

const REGISTER_BITS: u32 = 32;

/// `(1 << n) - 1`.
///
/// Only `n` in `0..=MAX_WIDTH` is meaningful; larger values saturate to an all-ones mask.
#[inline]
pub const fn generate_bitmask(n: u16) -> u32 {
    if n as u32 >= REGISTER_BITS {
        u32::MAX
    } else {
        (1 << n) - 1
    }
}

const fn bitmask_table() -> [u32; MAX_WIDTH as usize + 1] {
    let mut table = [0; MAX_WIDTH as usize + 1];
    let mut width = 0;
    while width < table.len() {
        table[width] = generate_bitmask(width as u16);
        width += 1;
    }
    table
}

/// Field masks indexed by width: `BITMASKS[w] == (1 << w) - 1`
pub const BITMASKS: [u32; MAX_WIDTH as usize + 1] = bitmask_table();

/// A field descriptor that does not fit in a 32-bit register, or a value that does not fit in
/// its field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldError {
    /// Width is zero or wider than [`MAX_WIDTH`]
    WidthOutOfRange { width: u16 },
    /// `position * width + width` runs past bit 31
    PositionOutOfRange { position: u16, width: u16 },
    /// Value has bits set above the field's width
    ValueTooWide { value: u32, width: u16 },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            FieldError::WidthOutOfRange { width } => {
                write!(f, "field width {} is outside 1..={}", width, MAX_WIDTH)
            }
            FieldError::PositionOutOfRange { position, width } => write!(
                f,
                "slot {} of a {}-bit field does not fit in a 32-bit register",
                position, width
            ),
            FieldError::ValueTooWide { value, width } => {
                write!(f, "value {:#x} does not fit in {} bits", value, width)
            }
        }
    }
}

/// A validated (position, width) pair
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field {
    position: u16,
    width: u16,
}

impl Field {
    /// Describes slot `position` of a `width`-bit field.
    pub const fn new(position: u16, width: u16) -> Result<Self, FieldError> {
        if width == 0 || width > MAX_WIDTH {
            return Err(FieldError::WidthOutOfRange { width });
        }
        if (position as u32 + 1) * width as u32 > REGISTER_BITS {
            return Err(FieldError::PositionOutOfRange { position, width });
        }
        Ok(Self { position, width })
    }

    /// Describes a per-pin slot whose bounds the caller has already established.
    #[inline]
    pub(crate) fn slot(position: u8, width: u16) -> Self {
        debug_assert!(Self::new(position as u16, width).is_ok());
        Self {
            position: position as u16,
            width,
        }
    }

    #[inline]
    pub const fn position(&self) -> u16 {
        self.position
    }

    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Bit offset of the field's least significant bit
    #[inline]
    pub const fn offset(&self) -> u32 {
        self.position as u32 * self.width as u32
    }

    /// The field's bits, in place
    #[inline]
    pub const fn mask(&self) -> u32 {
        BITMASKS[self.width as usize] << self.offset()
    }

    /// Reads the field, right-justified.
    #[inline]
    pub fn read(&self, reg: &Reg) -> u32 {
        (read_register(reg) & self.mask()) >> self.offset()
    }

    /// ORs `value` into the field without clearing it first.
    ///
    /// Bits already set in the field stay set, so the result is only `value` if the field was
    /// zero. Use [`Field::write`] to replace the contents.
    #[inline]
    pub fn set(&self, reg: &Reg, value: u32) -> Result<(), FieldError> {
        self.check(value)?;
        set_register(reg, value << self.offset());
        Ok(())
    }

    /// Zeroes the field, leaving every other bit of the register as it was.
    #[inline]
    pub fn clear(&self, reg: &Reg) {
        clear_register(reg, self.mask());
    }

    /// Clears the field, then sets it to `value`.
    #[inline]
    pub fn write(&self, reg: &Reg, value: u32) -> Result<(), FieldError> {
        self.check(value)?;
        self.replace(reg, value);
        Ok(())
    }

    /// Clear-then-set for values the caller knows fit; excess bits are masked off.
    #[inline]
    pub(crate) fn replace(&self, reg: &Reg, value: u32) {
        self.clear(reg);
        set_register(reg, (value & BITMASKS[self.width as usize]) << self.offset());
    }

    fn check(&self, value: u32) -> Result<(), FieldError> {
        if value & !BITMASKS[self.width as usize] != 0 {
            Err(FieldError::ValueTooWide {
                value,
                width: self.width,
            })
        } else {
            Ok(())
        }
    }
}

/// Returns the current value of `reg`.
#[inline]
pub fn read_register(reg: &Reg) -> u32 {
    reg.get()
}

/// Stores `value` into `reg` with a single write.
#[inline]
pub fn write_register(reg: &Reg, value: u32) {
    reg.set(value)
}

/// `*reg |= value`
#[inline]
pub fn set_register(reg: &Reg, value: u32) {
    reg.set(reg.get() | value)
}

/// `*reg &= !value`
#[inline]
pub fn clear_register(reg: &Reg, value: u32) {
    reg.set(reg.get() & !value)
}

/// Reads slot `position` of a `width`-bit field in `reg`.
pub fn read_field(reg: &Reg, position: u16, width: u16) -> Result<u32, FieldError> {
    Ok(Field::new(position, width)?.read(reg))
}

/// ORs `value` into slot `position` of a `width`-bit field in `reg`.
///
/// The field is not cleared first; see [`Field::set`].
pub fn set_field(reg: &Reg, position: u16, width: u16, value: u32) -> Result<(), FieldError> {
    Field::new(position, width)?.set(reg, value)
}

/// Zeroes slot `position` of a `width`-bit field in `reg`.
pub fn clear_field(reg: &Reg, position: u16, width: u16) -> Result<(), FieldError> {
    Field::new(position, width)?.clear(reg);
    Ok(())
}

/// Replaces slot `position` of a `width`-bit field in `reg` with `value`.
pub fn write_field(reg: &Reg, position: u16, width: u16, value: u32) -> Result<(), FieldError> {
    Field::new(position, width)?.write(reg, value)
}

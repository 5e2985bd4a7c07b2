//! Typed bit-range accessors over plain `u32` register values.
//!
//! Every packed field in the TSN registers is described by a [`Field`]. Static
//! fields are `const`; fields whose width is only known after capability
//! discovery (GCL row address, gate bits) are built at runtime with the same
//! type, so the encode and decode paths always share one mask/shift pair.

/// A contiguous bit range `[shift, shift + width)` inside a 32-bit register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Field {
    shift: u32,
    width: u32,
}

impl Field {
    /// Describe a field of `width` bits starting at bit `shift`
    ///
    /// Panics in const context if the field does not fit in 32 bits.
    pub const fn new(shift: u32, width: u32) -> Self {
        assert!(shift + width <= 32, "field exceeds register width");
        Self { shift, width }
    }

    /// Bit position of the least significant bit
    #[inline(always)]
    pub const fn shift(&self) -> u32 {
        self.shift
    }

    /// Number of bits in the field
    #[inline(always)]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Unshifted all-ones value of the field (e.g. `0xFF` for an 8-bit field)
    #[inline(always)]
    pub const fn max(&self) -> u32 {
        if self.width >= 32 {
            u32::MAX
        } else {
            (1u32 << self.width) - 1
        }
    }

    /// In-register mask of the field
    #[inline(always)]
    pub const fn mask(&self) -> u32 {
        self.max() << self.shift
    }

    /// Extract the field from a register value
    #[inline(always)]
    pub const fn get(&self, reg: u32) -> u32 {
        (reg & self.mask()) >> self.shift
    }

    /// Shift `value` into place, discarding bits that do not fit
    #[inline(always)]
    pub const fn encode(&self, value: u32) -> u32 {
        (value & self.max()) << self.shift
    }

    /// Replace the field inside `reg` with `value`
    #[inline(always)]
    pub const fn insert(&self, reg: u32, value: u32) -> u32 {
        (reg & !self.mask()) | self.encode(value)
    }

    /// Whether `value` fits in the field without truncation
    #[inline(always)]
    pub const fn fits(&self, value: u32) -> bool {
        value <= self.max()
    }
}

//! Memory-mapped register access for the DWMAC5 TSN blocks
//!
//! All TSN registers (MAC, MTL, DMA and MMC blocks) live at fixed byte offsets
//! from a single controller base address. Access goes through the
//! [`RegisterAccess`] trait so the same programming sequences run against real
//! hardware ([`Mmio`]) and against the host-side mock used in tests.

pub mod dma;
pub mod mac;
pub mod mmc;
pub mod mtl;

/// Read a 32-bit register at the given address
///
/// # Safety
/// The caller must ensure the address is valid and properly aligned.
#[inline(always)]
pub unsafe fn read_reg(addr: usize) -> u32 {
    unsafe { core::ptr::read_volatile(addr as *const u32) }
}

/// Write a 32-bit value to a register at the given address
///
/// # Safety
/// The caller must ensure the address is valid and properly aligned.
#[inline(always)]
pub unsafe fn write_reg(addr: usize, value: u32) {
    unsafe { core::ptr::write_volatile(addr as *mut u32, value) }
}

// =============================================================================
// Register Access Trait
// =============================================================================

/// 32-bit register window addressed by byte offset
///
/// Reads take `&self` because a bare read never changes driver state (even
/// read-to-clear counters are modelled as hardware side effects). Every
/// read-modify-write helper is a plain read followed by a plain write; the
/// caller serializes access to the window.
pub trait RegisterAccess {
    /// Read the register at `offset`
    fn read(&self, offset: usize) -> u32;

    /// Write `value` to the register at `offset`
    fn write(&mut self, offset: usize, value: u32);

    /// Modify a register using a read-modify-write operation
    #[inline(always)]
    fn modify<F>(&mut self, offset: usize, f: F)
    where
        F: FnOnce(u32) -> u32,
    {
        let value = self.read(offset);
        self.write(offset, f(value));
    }

    /// Set bits in a register (read-modify-write)
    #[inline(always)]
    fn set_bits(&mut self, offset: usize, bits: u32) {
        self.modify(offset, |v| v | bits);
    }

    /// Clear bits in a register (read-modify-write)
    #[inline(always)]
    fn clear_bits(&mut self, offset: usize, bits: u32) {
        self.modify(offset, |v| v & !bits);
    }
}

impl<T: RegisterAccess + ?Sized> RegisterAccess for &mut T {
    #[inline(always)]
    fn read(&self, offset: usize) -> u32 {
        (**self).read(offset)
    }

    #[inline(always)]
    fn write(&mut self, offset: usize, value: u32) {
        (**self).write(offset, value);
    }
}

// =============================================================================
// Volatile MMIO Window
// =============================================================================

/// Volatile register window at a fixed physical (or mapped) base address
#[derive(Debug)]
pub struct Mmio {
    base: usize,
}

impl Mmio {
    /// Create a register window at `base`
    ///
    /// # Safety
    /// `base` must be the mapped base address of a DWMAC5 controller, valid
    /// for 32-bit volatile access over the whole TSN register range, and no
    /// other `Mmio` may alias it without external serialization.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    /// Base address of this window
    pub const fn base(&self) -> usize {
        self.base
    }
}

impl RegisterAccess for Mmio {
    #[inline(always)]
    fn read(&self, offset: usize) -> u32 {
        // SAFETY: `Mmio::new` guarantees the window is valid for the TSN range.
        unsafe { read_reg(self.base + offset) }
    }

    #[inline(always)]
    fn write(&mut self, offset: usize, value: u32) {
        // SAFETY: `Mmio::new` guarantees the window is valid for the TSN range.
        unsafe { write_reg(self.base + offset, value) }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockRegisters;

    #[test]
    fn modify_reads_then_writes() {
        let mut regs = MockRegisters::new();
        regs.set(0x10, 0x0000_00F0);

        regs.modify(0x10, |v| v | 0x1);

        assert_eq!(regs.get(0x10), 0x0000_00F1);
        assert_eq!(regs.reads(), [0x10]);
        assert_eq!(regs.writes(), [(0x10, 0x0000_00F1)]);
    }

    #[test]
    fn set_and_clear_bits() {
        let mut regs = MockRegisters::new();
        regs.set(0x20, 0b1010);

        regs.set_bits(0x20, 0b0101);
        assert_eq!(regs.get(0x20), 0b1111);

        regs.clear_bits(0x20, 0b0011);
        assert_eq!(regs.get(0x20), 0b1100);
    }

    #[test]
    fn mutable_reference_forwards() {
        fn poke<W: RegisterAccess>(mut window: W) -> u32 {
            window.write(0x4, 7);
            window.read(0x4)
        }

        let mut regs = MockRegisters::new();
        assert_eq!(poke(&mut regs), 7);
        assert_eq!(regs.get(0x4), 7);
    }

    #[test]
    fn mmio_reads_and_writes_backing_memory() {
        let mut backing = [0u32; 4];
        let base = backing.as_mut_ptr() as usize;
        // SAFETY: the window only touches `backing`, which outlives it.
        let mut mmio = unsafe { Mmio::new(base) };

        mmio.write(8, 0xDEAD_BEEF);
        assert_eq!(mmio.read(8), 0xDEAD_BEEF);
        assert_eq!(mmio.base(), base);
        assert_eq!(backing[2], 0xDEAD_BEEF);
    }
}

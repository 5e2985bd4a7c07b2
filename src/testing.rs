//! Testing utilities and mock implementations
//!
//! This module provides mock implementations for exercising the TSN register
//! sequences on the host without hardware access.
//!
//! Only available when running `cargo test`.

// Note: The #[cfg(test)] attribute is applied in lib.rs where this module is declared
#![allow(missing_docs)]
#![allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]

extern crate std;

use core::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::vec::Vec;

use crate::internal::register::RegisterAccess;

// =============================================================================
// Mock Register Window
// =============================================================================

/// Mock register window for testing programming sequences without hardware
///
/// Registers default to 0. Every access through [`RegisterAccess`] is logged;
/// the `set`/`get` helpers used to arrange and inspect state are not.
///
/// Hardware behaviours that matter to the TSN layer can be simulated:
/// - queued read sequences (`queue_reads`), consumed before the stored value
/// - self-clearing bits (`set_self_clearing`), dropped from every write
/// - write-1-to-clear registers (`set_write_one_to_clear`)
///
/// # Example
///
/// ```ignore
/// let mut regs = MockRegisters::new();
/// regs.set_self_clearing(EST_GCL_CTRL_OFFSET, EST_GCL_CTRL_SRWO);
/// regs.write(EST_GCL_CTRL_OFFSET, 0x501);
/// assert_eq!(regs.get(EST_GCL_CTRL_OFFSET), 0x500);
/// ```
#[derive(Debug, Default)]
pub struct MockRegisters {
    /// Register values: offset -> value
    values: RefCell<HashMap<usize, u32>>,
    /// Pending read results: offset -> values returned in order
    queued: RefCell<HashMap<usize, VecDeque<u32>>>,
    /// Bits that hardware clears as soon as they are written
    self_clearing: HashMap<usize, u32>,
    /// Registers with write-1-to-clear semantics
    w1c: HashSet<usize>,
    /// Record of reads, in order
    read_log: RefCell<Vec<usize>>,
    /// Record of writes: (offset, value as written)
    write_log: RefCell<Vec<(usize, u32)>>,
}

impl MockRegisters {
    /// Create a new mock register window
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a register value (not logged)
    pub fn set(&self, offset: usize, value: u32) {
        self.values.borrow_mut().insert(offset, value);
    }

    /// Get the current value of a register (not logged)
    pub fn get(&self, offset: usize) -> u32 {
        self.values.borrow().get(&offset).copied().unwrap_or(0)
    }

    /// Return `values` from the next reads of `offset`, then fall back to the stored value
    pub fn queue_reads(&self, offset: usize, values: &[u32]) {
        self.queued
            .borrow_mut()
            .entry(offset)
            .or_default()
            .extend(values.iter().copied());
    }

    /// Mark `mask` bits of `offset` as self-clearing
    pub fn set_self_clearing(&mut self, offset: usize, mask: u32) {
        self.self_clearing.insert(offset, mask);
    }

    /// Give `offset` write-1-to-clear semantics
    pub fn set_write_one_to_clear(&mut self, offset: usize) {
        self.w1c.insert(offset);
    }

    /// All reads made through [`RegisterAccess`], in order
    pub fn reads(&self) -> Vec<usize> {
        self.read_log.borrow().clone()
    }

    /// All writes made through [`RegisterAccess`], in order
    pub fn writes(&self) -> Vec<(usize, u32)> {
        self.write_log.borrow().clone()
    }

    /// Values written to one register, in order
    pub fn writes_to(&self, offset: usize) -> Vec<u32> {
        self.write_log
            .borrow()
            .iter()
            .filter(|(o, _)| *o == offset)
            .map(|(_, v)| *v)
            .collect()
    }

    /// Whether `offset` was read at least once
    pub fn was_read(&self, offset: usize) -> bool {
        self.read_log.borrow().contains(&offset)
    }

    /// Clear the read and write logs
    pub fn clear_log(&self) {
        self.read_log.borrow_mut().clear();
        self.write_log.borrow_mut().clear();
    }
}

impl RegisterAccess for MockRegisters {
    fn read(&self, offset: usize) -> u32 {
        self.read_log.borrow_mut().push(offset);

        let queued = self
            .queued
            .borrow_mut()
            .get_mut(&offset)
            .and_then(VecDeque::pop_front);
        queued.unwrap_or_else(|| self.get(offset))
    }

    fn write(&mut self, offset: usize, value: u32) {
        self.write_log.borrow_mut().push((offset, value));

        let stored = if self.w1c.contains(&offset) {
            self.get(offset) & !value
        } else {
            value
        };
        let clear = self.self_clearing.get(&offset).copied().unwrap_or(0);
        self.set(offset, stored & !clear);
    }
}

// =============================================================================
// Mock Delay
// =============================================================================

/// Mock delay for testing without actual timing
///
/// Records delays for verification without actually waiting.
#[derive(Debug, Default)]
pub struct MockDelay {
    /// Total nanoseconds delayed
    total_ns: RefCell<u64>,
}

impl MockDelay {
    /// Create a new mock delay
    pub fn new() -> Self {
        Self::default()
    }

    /// Get total nanoseconds that were "delayed"
    pub fn total_ns(&self) -> u64 {
        *self.total_ns.borrow()
    }

    /// Get total microseconds that were "delayed"
    pub fn total_us(&self) -> u64 {
        self.total_ns() / 1_000
    }

    /// Reset the delay counter
    pub fn reset(&self) {
        *self.total_ns.borrow_mut() = 0;
    }
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        *self.total_ns.borrow_mut() += ns as u64;
    }

    fn delay_us(&mut self, us: u32) {
        *self.total_ns.borrow_mut() += us as u64 * 1_000;
    }
}

// =============================================================================
// Capability Register Helpers
// =============================================================================

/// Build a HW_FEATURE3 value with the given TSN presence bits and EST sizing codes
pub fn hw_feature3(est: bool, fpe: bool, tbs: bool, estdep: u32, estwid: u32) -> u32 {
    use crate::internal::register::mac::*;

    let mut value = HW_FEAT3_ESTDEP.encode(estdep) | HW_FEAT3_ESTWID.encode(estwid);
    if est {
        value |= HW_FEAT3_ESTSEL;
    }
    if fpe {
        value |= HW_FEAT3_FPESEL;
    }
    if tbs {
        value |= HW_FEAT3_TBSSEL;
    }
    value
}

/// Build a HW_FEATURE2 value for `txq` TX and `rxq` RX queues
pub fn hw_feature2(txq: u32, rxq: u32) -> u32 {
    use crate::internal::register::mac::*;

    HW_FEAT2_TXQCNT.encode(txq - 1) | HW_FEAT2_RXQCNT.encode(rxq - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::delay::DelayNs;

    #[test]
    fn mock_registers_default_zero() {
        let regs = MockRegisters::new();
        assert_eq!(regs.read(0x100), 0);
        assert_eq!(regs.reads(), [0x100]);
    }

    #[test]
    fn mock_registers_read_write() {
        let mut regs = MockRegisters::new();
        regs.write(0x10, 0x1234);
        assert_eq!(regs.read(0x10), 0x1234);
        assert_eq!(regs.writes(), [(0x10, 0x1234)]);
    }

    #[test]
    fn mock_registers_queued_reads_then_stored() {
        let regs = MockRegisters::new();
        regs.set(0x20, 9);
        regs.queue_reads(0x20, &[1, 2]);

        assert_eq!(regs.read(0x20), 1);
        assert_eq!(regs.read(0x20), 2);
        assert_eq!(regs.read(0x20), 9);
    }

    #[test]
    fn mock_registers_self_clearing() {
        let mut regs = MockRegisters::new();
        regs.set_self_clearing(0x30, 0x1);

        regs.write(0x30, 0x501);

        assert_eq!(regs.get(0x30), 0x500);
        assert_eq!(regs.writes_to(0x30), [0x501]);
    }

    #[test]
    fn mock_registers_write_one_to_clear() {
        let mut regs = MockRegisters::new();
        regs.set_write_one_to_clear(0x40);
        regs.set(0x40, 0b1011);

        regs.write(0x40, 0b0010);

        assert_eq!(regs.get(0x40), 0b1001);
    }

    #[test]
    fn mock_delay_tracking() {
        let mut delay = MockDelay::new();

        delay.delay_ns(1000);
        delay.delay_us(2);

        assert_eq!(delay.total_ns(), 3000);
        assert_eq!(delay.total_us(), 3);

        delay.reset();
        assert_eq!(delay.total_ns(), 0);
    }

    #[test]
    fn capability_helpers_encode_fields() {
        use crate::internal::register::mac::*;

        let cap3 = hw_feature3(true, false, true, 3, 2);
        assert_eq!(HW_FEAT3_ESTDEP.get(cap3), 3);
        assert_eq!(HW_FEAT3_ESTWID.get(cap3), 2);
        assert_ne!(cap3 & HW_FEAT3_ESTSEL, 0);
        assert_eq!(cap3 & HW_FEAT3_FPESEL, 0);
        assert_ne!(cap3 & HW_FEAT3_TBSSEL, 0);

        let cap2 = hw_feature2(4, 2);
        assert_eq!(HW_FEAT2_TXQCNT.get(cap2), 3);
        assert_eq!(HW_FEAT2_RXQCNT.get(cap2), 1);
    }
}

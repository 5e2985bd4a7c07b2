//! DMA Register Definitions (TSN subset)
//!
//! Only the fetch-time control used by Time-Based Scheduling is needed here.

use crate::internal::bitfield::Field;

/// DMA TBS Control register offset
pub const TBS_CTRL_OFFSET: usize = 0x1050;

/// Fetch Time Offset (bits 31:8)
pub const TBS_CTRL_FTOS: Field = Field::new(8, 24);
/// Fetch GSN Slot Offset (bits 6:4)
pub const TBS_CTRL_FGOS: Field = Field::new(4, 3);
/// Fetch Time Offset Valid
pub const TBS_CTRL_FTOV: u32 = 1 << 0;

//! Poll-with-timeout primitive
//!
//! The GCL window signals completion by self-clearing its SRWO bit. This module
//! provides the bounded wait used for that handshake, driven by any
//! `embedded_hal::delay::DelayNs` implementation.

use embedded_hal::delay::DelayNs;

use crate::driver::error::{IoError, IoResult};
use crate::internal::constants::{GCL_POLL_INTERVAL_US, GCL_POLL_TIMEOUT_US};
use crate::internal::register::RegisterAccess;

// =============================================================================
// Poll Timing
// =============================================================================

/// Interval and bound for a self-clearing bit handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollTiming {
    /// Delay between consecutive reads in microseconds
    pub interval_us: u32,
    /// Total time to wait before reporting a timeout in microseconds
    pub timeout_us: u32,
}

impl PollTiming {
    /// Create a timing with the given interval and bound
    pub const fn new(interval_us: u32, timeout_us: u32) -> Self {
        Self {
            interval_us,
            timeout_us,
        }
    }
}

impl Default for PollTiming {
    fn default() -> Self {
        Self::new(GCL_POLL_INTERVAL_US, GCL_POLL_TIMEOUT_US)
    }
}

// =============================================================================
// Poll Primitive
// =============================================================================

/// Read `offset` until every bit in `mask` is clear
///
/// The register is read first, so an already-clear bit returns without any
/// delay. Total delay never exceeds `timing.timeout_us`; a final read is taken
/// at the bound before [`IoError::Timeout`] is reported.
pub fn poll_until_cleared<R, D>(
    regs: &R,
    delay: &mut D,
    offset: usize,
    mask: u32,
    timing: PollTiming,
) -> IoResult<()>
where
    R: RegisterAccess + ?Sized,
    D: DelayNs,
{
    let interval = timing.interval_us.max(1);
    let mut elapsed = 0u32;

    loop {
        if regs.read(offset) & mask == 0 {
            return Ok(());
        }
        if elapsed >= timing.timeout_us {
            return Err(IoError::Timeout);
        }
        let step = interval.min(timing.timeout_us - elapsed);
        delay.delay_us(step);
        elapsed += step;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

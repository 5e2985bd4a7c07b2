//! Configuration types for the DWMAC5 TSN layer

use crate::hal::poll::PollTiming;
use crate::internal::constants::{
    DEFAULT_FPE_RX_QUEUE, FPE_VERIFY_RETRIES, GCL_POLL_INTERVAL_US, GCL_POLL_TIMEOUT_US,
};

/// Complete TSN layer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TsnConfig {
    /// Interval between GCL_CTRL reads while waiting for SRWO (µs)
    pub poll_interval_us: u32,
    /// Bound on the SRWO handshake (µs)
    pub poll_timeout_us: u32,
    /// RX queue that receives express frames, programmed by FPE setup
    pub fpe_rx_queue: u32,
    /// Verify mPackets sent before the FPE handshake gives up
    pub fpe_verify_retries: u8,
    /// Run hardware setup for every discovered feature during initialization
    pub setup_on_init: bool,
}

impl Default for TsnConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TsnConfig {
    /// Create a new configuration with defaults
    #[must_use]
    pub const fn new() -> Self {
        Self {
            poll_interval_us: GCL_POLL_INTERVAL_US,
            poll_timeout_us: GCL_POLL_TIMEOUT_US,
            fpe_rx_queue: DEFAULT_FPE_RX_QUEUE,
            fpe_verify_retries: FPE_VERIFY_RETRIES,
            setup_on_init: true,
        }
    }

    /// Poll timing derived from this configuration
    #[must_use]
    pub const fn poll_timing(&self) -> PollTiming {
        PollTiming::new(self.poll_interval_us, self.poll_timeout_us)
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    /// Set the SRWO poll interval
    #[must_use]
    pub const fn with_poll_interval_us(mut self, interval_us: u32) -> Self {
        self.poll_interval_us = interval_us;
        self
    }

    /// Set the SRWO poll bound
    #[must_use]
    pub const fn with_poll_timeout_us(mut self, timeout_us: u32) -> Self {
        self.poll_timeout_us = timeout_us;
        self
    }

    /// Set the express-frame RX queue
    ///
    /// Only bits 2:0 reach the hardware.
    #[must_use]
    pub const fn with_fpe_rx_queue(mut self, queue: u32) -> Self {
        self.fpe_rx_queue = queue;
        self
    }

    /// Set the number of verify attempts for the FPE handshake
    #[must_use]
    pub const fn with_fpe_verify_retries(mut self, retries: u8) -> Self {
        self.fpe_verify_retries = retries;
        self
    }

    /// Enable or disable hardware setup during initialization
    #[must_use]
    pub const fn with_setup_on_init(mut self, enabled: bool) -> Self {
        self.setup_on_init = enabled;
        self
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

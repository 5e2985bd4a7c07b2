//! Centralized Constants
//!
//! Single source of truth for the TSN layer's timing defaults and the fixed,
//! hardware-defined parameter limits of the DWMAC 5.10 TSN blocks.
//!
//! # Organization
//!
//! - **Timing**: GCL handshake polling
//! - **Statistics**: TSN counter vector size
//! - **EST limits**: PTOV/CTOV/cycle/idle-slope maxima
//! - **FPE limits**: fragment size and hold/release advance maxima
//! - **TBS limits**: launch/fetch offset maxima
//!
//! # Note
//!
//! Register offsets and bit definitions remain in `internal/register/` as they
//! are specific to those hardware blocks.

// =============================================================================
// Timing Constants
// =============================================================================

/// Default interval between reads while waiting for SRWO to self-clear (µs)
pub const GCL_POLL_INTERVAL_US: u32 = 50;

/// Default bound on the SRWO handshake (µs)
pub const GCL_POLL_TIMEOUT_US: u32 = 600;

// =============================================================================
// Statistics
// =============================================================================

/// Number of slots in the TSN statistics vector
pub const TSN_STAT_SIZE: usize = 16;

// =============================================================================
// EST Limits
// =============================================================================

/// Maximum PTP time offset value (8-bit field)
pub const EST_PTOV_MAX: u32 = 0xFF;

/// Maximum current time offset value (12-bit field)
pub const EST_CTOV_MAX: u32 = 0xFFF;

/// Maximum cycle time seconds (CTR high word is 8 bits)
pub const EST_CTR_HI_MAX: u32 = 0xFF;

/// Maximum CBS idle slope
pub const CBS_IDLESLOPE_MAX: u32 = 0x1F_FFFF;

/// Maximum time-interval list size value (3-bit field)
pub const EST_TILS_MAX: u32 = 0x7;

/// Nanoseconds per second, upper bound (exclusive) of BTR/CTR low words
pub const NSEC_PER_SEC: u32 = 1_000_000_000;

// =============================================================================
// FPE Limits
// =============================================================================

/// pMAC bit reported by the FPE capability query (TX queue 0)
pub const FPE_PMAC_BIT: u32 = 1 << 0;

/// Maximum additional fragment size
pub const FPE_AFSZ_MAX: u32 = 0x3;

/// Maximum hold advance
pub const FPE_HADV_MAX: u32 = 0xFFFF;

/// Maximum release advance
pub const FPE_RADV_MAX: u32 = 0xFFFF;

/// Default number of verify mPackets sent before the handshake gives up
pub const FPE_VERIFY_RETRIES: u8 = 3;

// =============================================================================
// TBS Limits
// =============================================================================

/// Maximum launch expiry offset (ns)
pub const TBS_LEOS_MAX: u32 = 0xFF_FFFF;

/// Maximum launch expiry GSN slot offset
pub const TBS_LEGOS_MAX: u32 = 0x7;

/// Maximum fetch time offset
pub const TBS_FTOS_MAX: u32 = 0xFF_FFFF;

/// Maximum fetch GSN slot offset
pub const TBS_FGOS_MAX: u32 = 0x7;

// =============================================================================
// Setup Defaults
// =============================================================================

/// Default RX queue for express frames when FPE is set up
pub const DEFAULT_FPE_RX_QUEUE: u32 = 1;

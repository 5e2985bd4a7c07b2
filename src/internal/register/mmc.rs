//! MMC Register Definitions (frame preemption counters)
//!
//! The FPE counters are read-to-clear with respect to their interrupt status:
//! reading a counter register acknowledges its interrupt bit.

// =============================================================================
// Register Offsets
// =============================================================================

/// FPE TX interrupt status register offset
pub const FPE_TX_INTR_OFFSET: usize = 0x8A0;
/// FPE TX interrupt mask register offset
pub const FPE_TX_INTR_MASK_OFFSET: usize = 0x8A4;
/// TX FPE fragment counter offset
pub const TX_FPE_FRAGMENT_OFFSET: usize = 0x8A8;
/// TX hold request counter offset
pub const TX_HOLD_REQ_OFFSET: usize = 0x8AC;
/// FPE RX interrupt status register offset
pub const FPE_RX_INTR_OFFSET: usize = 0x8C0;
/// FPE RX interrupt mask register offset
pub const FPE_RX_INTR_MASK_OFFSET: usize = 0x8C4;
/// RX packet assembly error counter offset
pub const RX_PACKET_ASSEMBLY_ERR_OFFSET: usize = 0x8C8;
/// RX packet SMD error counter offset
pub const RX_PACKET_SMD_ERR_OFFSET: usize = 0x8CC;
/// RX packet assembly OK counter offset
pub const RX_PACKET_ASSEMBLY_OK_OFFSET: usize = 0x8D0;
/// RX FPE fragment counter offset
pub const RX_FPE_FRAGMENT_OFFSET: usize = 0x8D4;

// =============================================================================
// FPE TX Interrupt Bits
// =============================================================================

/// Hold request counter interrupt
pub const FPE_TX_INTR_HRCIM: u32 = 1 << 1;
/// Fragment counter interrupt
pub const FPE_TX_INTR_FCIM: u32 = 1 << 0;
/// All FPE TX interrupt sources
pub const FPE_TX_INTR_DEFAULT: u32 = FPE_TX_INTR_HRCIM | FPE_TX_INTR_FCIM;

// =============================================================================
// FPE RX Interrupt Bits
// =============================================================================

/// Fragment counter interrupt
pub const FPE_RX_INTR_FCIM: u32 = 1 << 3;
/// Packet assembly OK counter interrupt
pub const FPE_RX_INTR_PAOCIM: u32 = 1 << 2;
/// Packet SMD error counter interrupt
pub const FPE_RX_INTR_PSECIM: u32 = 1 << 1;
/// Packet assembly error counter interrupt
pub const FPE_RX_INTR_PAECIM: u32 = 1 << 0;
/// All FPE RX interrupt sources
pub const FPE_RX_INTR_DEFAULT: u32 =
    FPE_RX_INTR_FCIM | FPE_RX_INTR_PAOCIM | FPE_RX_INTR_PSECIM | FPE_RX_INTR_PAECIM;

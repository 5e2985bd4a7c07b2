//! MAC Core Register Definitions (TSN subset)
//!
//! Version, hardware feature and FPE control/status registers of the MAC block.

use crate::internal::bitfield::Field;

// =============================================================================
// Register Offsets
// =============================================================================

/// RX Queue Control 1 register offset
pub const RXQ_CTRL1_OFFSET: usize = 0xA4;
/// MAC Version register offset
pub const VERSION_OFFSET: usize = 0x110;
/// Hardware Feature 2 register offset (queue counts)
pub const HW_FEATURE2_OFFSET: usize = 0x124;
/// Hardware Feature 3 register offset (TSN presence and sizing)
pub const HW_FEATURE3_OFFSET: usize = 0x128;
/// MAC FPE Control/Status register offset
pub const FPE_CTRL_STS_OFFSET: usize = 0x234;

// =============================================================================
// Version Register
// =============================================================================

/// Synopsys-defined core version (bits 7:0)
pub const VERSION_SNPSVER: Field = Field::new(0, 8);

// =============================================================================
// RX Queue Control 1
// =============================================================================

/// Frame Preemption Residue Queue (bits 26:24)
pub const RXQ_CTRL1_FPRQ: Field = Field::new(24, 3);

// =============================================================================
// Hardware Feature 2
// =============================================================================

/// Number of TX queues minus one (bits 9:6)
pub const HW_FEAT2_TXQCNT: Field = Field::new(6, 4);
/// Number of RX queues minus one (bits 3:0)
pub const HW_FEAT2_RXQCNT: Field = Field::new(0, 4);

// =============================================================================
// Hardware Feature 3
// =============================================================================

/// TBS feature present
pub const HW_FEAT3_TBSSEL: u32 = 1 << 27;
/// FPE feature present
pub const HW_FEAT3_FPESEL: u32 = 1 << 26;
/// EST time-interval width encoding (bits 21:20)
pub const HW_FEAT3_ESTWID: Field = Field::new(20, 2);
/// EST GCL depth encoding (bits 19:17)
pub const HW_FEAT3_ESTDEP: Field = Field::new(17, 3);
/// EST feature present
pub const HW_FEAT3_ESTSEL: u32 = 1 << 16;

// =============================================================================
// MAC FPE Control/Status
// =============================================================================

/// Transmitted Respond mPacket
pub const FPE_CTRL_STS_TRSP: u32 = 1 << 19;
/// Transmitted Verify mPacket
pub const FPE_CTRL_STS_TVER: u32 = 1 << 18;
/// Received Respond mPacket
pub const FPE_CTRL_STS_RRSP: u32 = 1 << 17;
/// Received Verify mPacket
pub const FPE_CTRL_STS_RVER: u32 = 1 << 16;
/// Send Respond mPacket (self-clearing)
pub const FPE_CTRL_STS_SRSP: u32 = 1 << 2;
/// Send Verify mPacket (self-clearing)
pub const FPE_CTRL_STS_SVER: u32 = 1 << 1;
/// Enable Frame Preemption
pub const FPE_CTRL_STS_EFPE: u32 = 1 << 0;

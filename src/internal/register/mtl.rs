//! MTL Register Definitions (TSN subset)
//!
//! The MTL block holds the EST scheduler, its gate control list window, the
//! FPE classification/advance registers and the launch-time TBS control.

use crate::internal::bitfield::Field;

// =============================================================================
// Register Offsets
// =============================================================================

/// MTL TBS Control register offset
pub const TBS_CTRL_OFFSET: usize = 0xC40;
/// MTL EST Control register offset
pub const EST_CTRL_OFFSET: usize = 0xC50;
/// MTL EST Status register offset
pub const EST_STATUS_OFFSET: usize = 0xC58;
/// MTL EST Scheduling Error register offset
pub const EST_SCH_ERR_OFFSET: usize = 0xC60;
/// MTL EST Frame Size Error register offset
pub const EST_FRM_SZ_ERR_OFFSET: usize = 0xC64;
/// MTL EST Frame Size Capture register offset
pub const EST_FRM_SZ_CAP_OFFSET: usize = 0xC68;
/// MTL EST Interrupt Enable register offset
pub const EST_INT_EN_OFFSET: usize = 0xC70;
/// MTL EST GCL Control register offset
pub const EST_GCL_CTRL_OFFSET: usize = 0xC80;
/// MTL EST GCL Data register offset
pub const EST_GCL_DATA_OFFSET: usize = 0xC84;
/// MTL FPE Control/Status register offset
pub const FPE_CTRL_STS_OFFSET: usize = 0xC90;
/// MTL FPE Advance register offset
pub const FPE_ADVANCE_OFFSET: usize = 0xC94;

// =============================================================================
// EST Control
// =============================================================================

/// PTP Time Offset Value (bits 31:24)
pub const EST_CTRL_PTOV: Field = Field::new(24, 8);
/// Current Time Offset Value (bits 23:12)
pub const EST_CTRL_CTOV: Field = Field::new(12, 12);
/// Time Interval List Size (bits 10:8)
pub const EST_CTRL_TILS: Field = Field::new(8, 3);
/// Switch to S/W Owned List (self-clearing on swap)
pub const EST_CTRL_SSWL: u32 = 1 << 1;
/// Enable EST
pub const EST_CTRL_EEST: u32 = 1 << 0;

// =============================================================================
// EST Status
// =============================================================================

/// BTR Error Loop Count (bits 11:8)
pub const EST_STATUS_BTRL: Field = Field::new(8, 4);
/// BTR loop count value reported when the counter saturates
pub const EST_STATUS_BTRL_MAX: u32 = 0xF;
/// S/W Owned List (bank index)
pub const EST_STATUS_SWOL: Field = Field::new(7, 1);
/// Constant Gate Control Error
pub const EST_STATUS_CGCE: u32 = 1 << 4;
/// Head-Of-Line Blocking due to Scheduling
pub const EST_STATUS_HLBS: u32 = 1 << 3;
/// Head-Of-Line Blocking due to Frame Size
pub const EST_STATUS_HLBF: u32 = 1 << 2;
/// BTR Error
pub const EST_STATUS_BTRE: u32 = 1 << 1;
/// Switch to S/W Owned List Complete
pub const EST_STATUS_SWLC: u32 = 1 << 0;

// =============================================================================
// EST Frame Size Capture
// =============================================================================

/// HLBF frame size (bits 14:0)
pub const EST_FRM_SZ_CAP_HBFS: Field = Field::new(0, 15);
/// HLBF queue number shift; the width depends on the TX queue count
pub const EST_FRM_SZ_CAP_HBFQ_SHIFT: u32 = 16;

/// HLBF queue number field for a controller with `txqcnt` TX queues
pub const fn est_frm_sz_cap_hbfq(txqcnt: u32) -> Field {
    let width = if txqcnt > 4 {
        3
    } else if txqcnt > 2 {
        2
    } else {
        1
    };
    Field::new(EST_FRM_SZ_CAP_HBFQ_SHIFT, width)
}

// =============================================================================
// EST Interrupt Enable
// =============================================================================

/// Constant Gate Control Error interrupt enable
pub const EST_INT_EN_CGCE: u32 = 1 << 4;
/// HLB due to scheduling interrupt enable
pub const EST_INT_EN_IEHS: u32 = 1 << 3;
/// HLB due to frame size interrupt enable
pub const EST_INT_EN_IEHF: u32 = 1 << 2;
/// BTR error interrupt enable
pub const EST_INT_EN_IEBE: u32 = 1 << 1;
/// Switch list complete interrupt enable
pub const EST_INT_EN_IECC: u32 = 1 << 0;

// =============================================================================
// EST GCL Control
// =============================================================================

/// GCL row address shift; the width is log2 of the discovered depth
pub const EST_GCL_CTRL_ADDR_SHIFT: u32 = 8;
/// Debug Mode Bank Select (bank 1 when set)
pub const EST_GCL_CTRL_DBGB1: u32 = 1 << 5;
/// Debug Mode
pub const EST_GCL_CTRL_DBGM: u32 = 1 << 4;
/// Gate Control Related Registers select
pub const EST_GCL_CTRL_GCRR: u32 = 1 << 2;
/// Read (1) / Write (0) operation
pub const EST_GCL_CTRL_R1W0: u32 = 1 << 1;
/// Start Read/Write Operation (self-clearing)
pub const EST_GCL_CTRL_SRWO: u32 = 1 << 0;

/// GCL row address field for a list of `1 << depth_log2` rows
pub const fn est_gcl_ctrl_addr(depth_log2: u32) -> Field {
    Field::new(EST_GCL_CTRL_ADDR_SHIFT, depth_log2)
}

/// Gate-control-related row addresses (used with [`EST_GCL_CTRL_GCRR`])
pub mod gcrr {
    /// Base Time Register, nanoseconds
    pub const BTR_LO: u32 = 0x0;
    /// Base Time Register, seconds
    pub const BTR_HI: u32 = 0x1;
    /// Cycle Time Register, nanoseconds
    pub const CTR_LO: u32 = 0x2;
    /// Cycle Time Register, seconds
    pub const CTR_HI: u32 = 0x3;
    /// Time Extension Register
    pub const TER: u32 = 0x4;
    /// List Length Register
    pub const LLR: u32 = 0x5;
}

// =============================================================================
// MTL FPE Control/Status and Advance
// =============================================================================

/// Hold/Release Status
pub const FPE_CTRL_STS_HRS: Field = Field::new(28, 1);
/// Preemption Classification (bits 15:8), one bit per TX queue
pub const FPE_CTRL_STS_PEC: Field = Field::new(8, 8);
/// Additional Fragment Size (bits 1:0)
pub const FPE_CTRL_STS_AFSZ: Field = Field::new(0, 2);

/// Release Advance (bits 31:16)
pub const FPE_ADVANCE_RADV: Field = Field::new(16, 16);
/// Hold Advance (bits 15:0)
pub const FPE_ADVANCE_HADV: Field = Field::new(0, 16);

// =============================================================================
// MTL TBS Control
// =============================================================================

/// Launch Expiry Offset (bits 31:8)
pub const TBS_CTRL_LEOS: Field = Field::new(8, 24);
/// Launch Expiry GSN Offset (bits 6:4)
pub const TBS_CTRL_LEGOS: Field = Field::new(4, 3);
/// Launch Expiry Offset Valid
pub const TBS_CTRL_LEOV: u32 = 1 << 1;
/// EST Mode
pub const TBS_CTRL_ESTM: u32 = 1 << 0;

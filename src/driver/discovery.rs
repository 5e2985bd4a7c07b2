//! Capability discovery for the DWMAC5 TSN blocks.
//!
//! Decodes the version and hardware feature registers into presence flags and
//! size parameters, and reports the fixed hardware-defined limits.

use crate::internal::constants::{
    CBS_IDLESLOPE_MAX, EST_CTOV_MAX, EST_CTR_HI_MAX, EST_PTOV_MAX, EST_TILS_MAX,
};
use crate::internal::register::RegisterAccess;
use crate::internal::register::mac::{
    HW_FEAT2_RXQCNT, HW_FEAT2_TXQCNT, HW_FEAT3_ESTDEP, HW_FEAT3_ESTSEL, HW_FEAT3_ESTWID,
    HW_FEAT3_FPESEL, HW_FEAT3_TBSSEL, HW_FEATURE2_OFFSET, HW_FEATURE3_OFFSET, RXQ_CTRL1_FPRQ,
    RXQ_CTRL1_OFFSET, VERSION_OFFSET, VERSION_SNPSVER,
};
use crate::internal::register::mmc::{
    FPE_RX_INTR_DEFAULT, FPE_RX_INTR_MASK_OFFSET, FPE_TX_INTR_DEFAULT, FPE_TX_INTR_MASK_OFFSET,
};
use crate::internal::register::mtl::{
    EST_INT_EN_CGCE, EST_INT_EN_IEBE, EST_INT_EN_IECC, EST_INT_EN_IEHF, EST_INT_EN_IEHS,
    EST_INT_EN_OFFSET,
};

use super::error::{ConfigError, ConfigResult};

// =============================================================================
// Feature Identifiers
// =============================================================================

/// TSN feature blocks that may be synthesized into the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TsnFeature {
    /// Enhanced Scheduled Traffic (802.1Qbv)
    Est,
    /// Frame Preemption (802.1Qbu)
    Fpe,
    /// Time-Based Scheduling
    Tbs,
}

impl TsnFeature {
    /// All features, in setup order
    pub const ALL: [TsnFeature; 3] = [TsnFeature::Est, TsnFeature::Fpe, TsnFeature::Tbs];

    /// Presence bit in HW_FEATURE3
    pub(crate) const fn hw_feature3_bit(self) -> u32 {
        match self {
            TsnFeature::Est => HW_FEAT3_ESTSEL,
            TsnFeature::Fpe => HW_FEAT3_FPESEL,
            TsnFeature::Tbs => HW_FEAT3_TBSSEL,
        }
    }
}

// =============================================================================
// EST Limits
// =============================================================================

/// Fixed EST parameter limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EstLimits {
    /// Maximum PTP time offset value
    pub ptov_max: u32,
    /// Maximum current time offset value
    pub ctov_max: u32,
    /// Maximum cycle time, seconds part
    pub cycle_max: u32,
    /// Maximum CBS idle slope
    pub idleslope_max: u32,
}

impl EstLimits {
    /// Limits of the DWMAC 5.10 EST block
    pub const DWMAC510: Self = Self {
        ptov_max: EST_PTOV_MAX,
        ctov_max: EST_CTOV_MAX,
        cycle_max: EST_CTR_HI_MAX,
        idleslope_max: CBS_IDLESLOPE_MAX,
    };

    /// Check a PTOV value against [`Self::ptov_max`]
    pub const fn check_ptov(&self, ptov: u32) -> ConfigResult<()> {
        check_max(ptov, self.ptov_max)
    }

    /// Check a CTOV value against [`Self::ctov_max`]
    pub const fn check_ctov(&self, ctov: u32) -> ConfigResult<()> {
        check_max(ctov, self.ctov_max)
    }

    /// Check a TILS value against the width of the field
    pub const fn check_tils(&self, tils: u32) -> ConfigResult<()> {
        check_max(tils, EST_TILS_MAX)
    }

    /// Check a cycle time seconds value against [`Self::cycle_max`]
    pub const fn check_cycle_sec(&self, sec: u32) -> ConfigResult<()> {
        check_max(sec, self.cycle_max)
    }
}

/// `Ok` when `value <= max`, otherwise [`ConfigError::InvalidParameter`]
pub(crate) const fn check_max(value: u32, max: u32) -> ConfigResult<()> {
    if value <= max {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter)
    }
}

// =============================================================================
// Register Decoding
// =============================================================================

/// Read the Synopsys core version
pub fn read_hwid<R: RegisterAccess + ?Sized>(regs: &R) -> u32 {
    VERSION_SNPSVER.get(regs.read(VERSION_OFFSET))
}

/// Check whether `feature` was synthesized into the controller
pub fn has_tsn_cap<R: RegisterAccess + ?Sized>(regs: &R, feature: TsnFeature) -> bool {
    regs.read(HW_FEATURE3_OFFSET) & feature.hw_feature3_bit() != 0
}

/// Map an ESTDEP encoding to a GCL depth; 0 means EST is unusable
pub const fn gcl_depth_from_code(estdep: u32) -> u32 {
    match estdep {
        1 => 64,
        2 => 128,
        3 => 256,
        4 => 512,
        5 => 1024,
        _ => 0,
    }
}

/// Whether `depth` is one of the GCL depths an ESTDEP encoding can report
pub const fn is_gcl_depth(depth: u32) -> bool {
    let mut code = 0;
    while code <= HW_FEAT3_ESTDEP.max() {
        if depth != 0 && gcl_depth_from_code(code) == depth {
            return true;
        }
        code += 1;
    }
    false
}

/// Map an ESTWID encoding to a time-interval width in bits; 0 means unusable
pub const fn ti_width_from_code(estwid: u32) -> u32 {
    match estwid {
        1 => 16,
        2 => 20,
        3 => 24,
        _ => 0,
    }
}

/// Read the GCL depth (rows per bank)
pub fn est_get_gcl_depth<R: RegisterAccess + ?Sized>(regs: &R) -> u32 {
    gcl_depth_from_code(HW_FEAT3_ESTDEP.get(regs.read(HW_FEATURE3_OFFSET)))
}

/// Read the time-interval width in bits
pub fn est_get_ti_width<R: RegisterAccess + ?Sized>(regs: &R) -> u32 {
    ti_width_from_code(HW_FEAT3_ESTWID.get(regs.read(HW_FEATURE3_OFFSET)))
}

/// Read the number of TX queues
pub fn est_get_txqcnt<R: RegisterAccess + ?Sized>(regs: &R) -> u32 {
    HW_FEAT2_TXQCNT.get(regs.read(HW_FEATURE2_OFFSET)) + 1
}

/// Read the number of RX queues
pub fn est_get_rxqcnt<R: RegisterAccess + ?Sized>(regs: &R) -> u32 {
    HW_FEAT2_RXQCNT.get(regs.read(HW_FEATURE2_OFFSET)) + 1
}

// =============================================================================
// Hardware Setup
// =============================================================================

/// One-time setup of a feature block
///
/// - EST: enable every EST interrupt source
/// - FPE: route express frames to RX queue `fprq` and unmask the FPE MMC
///   counter interrupts
/// - TBS: nothing to do
pub fn hw_setup<R: RegisterAccess + ?Sized>(regs: &mut R, feature: TsnFeature, fprq: u32) {
    match feature {
        TsnFeature::Est => {
            let sources = EST_INT_EN_CGCE
                | EST_INT_EN_IEHS
                | EST_INT_EN_IEHF
                | EST_INT_EN_IEBE
                | EST_INT_EN_IECC;
            regs.write(EST_INT_EN_OFFSET, sources);
        }
        TsnFeature::Fpe => {
            regs.modify(RXQ_CTRL1_OFFSET, |v| RXQ_CTRL1_FPRQ.insert(v, fprq));
            regs.write(FPE_TX_INTR_MASK_OFFSET, !FPE_TX_INTR_DEFAULT);
            regs.write(FPE_RX_INTR_MASK_OFFSET, !FPE_RX_INTR_DEFAULT);
        }
        TsnFeature::Tbs => {}
    }
}

// =============================================================================
// Capability Snapshot
// =============================================================================

/// Capabilities discovered once at device setup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TsnCapabilities {
    /// Synopsys core version
    pub hwid: u32,
    /// EST block present
    pub est: bool,
    /// FPE block present
    pub fpe: bool,
    /// TBS block present
    pub tbs: bool,
    /// GCL rows per bank (0 when EST is unusable)
    pub gcl_depth: u32,
    /// Time-interval width in bits (0 when EST is unusable)
    pub ti_width: u32,
    /// Number of TX queues
    pub tx_queues: u32,
    /// Number of RX queues
    pub rx_queues: u32,
}

impl TsnCapabilities {
    /// Whether `feature` is present
    pub const fn has(&self, feature: TsnFeature) -> bool {
        match feature {
            TsnFeature::Est => self.est,
            TsnFeature::Fpe => self.fpe,
            TsnFeature::Tbs => self.tbs,
        }
    }

    /// Whether the GCL can be accessed (EST present with non-zero depth and width)
    pub const fn est_usable(&self) -> bool {
        self.est && self.gcl_depth != 0 && self.ti_width != 0
    }

    /// Bitmask covering every TX queue
    pub const fn tx_queue_mask(&self) -> u32 {
        queue_mask(self.tx_queues)
    }
}

/// Bitmask with one bit per queue for `count` queues
pub(crate) const fn queue_mask(count: u32) -> u32 {
    if count >= 32 {
        u32::MAX
    } else {
        (1u32 << count) - 1
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

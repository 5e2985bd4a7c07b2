//! TSN statistics and EST status decoding
//!
//! EST error conditions are counted in software: each decode of EST_STATUS
//! acknowledges the asserted sources and bumps the matching counter. The FPE
//! counters share the same vector but are mirrored from the MMC block.

use bitflags::bitflags;

use crate::internal::constants::TSN_STAT_SIZE;
use crate::internal::register::RegisterAccess;
use crate::internal::register::mtl::{
    EST_FRM_SZ_CAP_HBFS, EST_FRM_SZ_CAP_OFFSET, EST_FRM_SZ_ERR_OFFSET, EST_SCH_ERR_OFFSET,
    EST_STATUS_BTRE, EST_STATUS_BTRL, EST_STATUS_BTRL_MAX, EST_STATUS_CGCE, EST_STATUS_HLBF,
    EST_STATUS_HLBS, EST_STATUS_OFFSET, EST_STATUS_SWLC, est_frm_sz_cap_hbfq,
};

use super::discovery::queue_mask;

// =============================================================================
// Statistics Vector
// =============================================================================

/// Slot of each counter in [`TsnStats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(usize)]
pub enum TsnStatIndex {
    /// BTR error
    Btre = 0,
    /// BTR maximum loop count error
    Btrlm = 1,
    /// Head-of-line blocking due to frame size
    Hlbf = 2,
    /// Head-of-line blocking due to scheduling
    Hlbs = 3,
    /// Constant gate control error
    Cgce = 4,
    /// TX FPE fragment counter
    TxFfc = 5,
    /// TX hold request counter
    TxHrc = 6,
    /// RX packet assembly error counter
    Paec = 7,
    /// RX packet SMD error counter
    Psec = 8,
    /// RX packet assembly OK counter
    Paoc = 9,
    /// RX FPE fragment counter
    Ffc = 10,
}

impl TsnStatIndex {
    /// Position in the statistics vector
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Name and validity of one statistics slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MmcDesc {
    /// Slot holds a real counter
    pub valid: bool,
    /// Short counter name
    pub name: &'static str,
}

impl MmcDesc {
    const fn new(valid: bool, name: &'static str) -> Self {
        Self { valid, name }
    }
}

/// Counter names for the DWMAC 5.10 statistics layout
pub const MMC_DESC: [MmcDesc; TSN_STAT_SIZE] = [
    MmcDesc::new(true, "BTRE"),
    MmcDesc::new(true, "BTRLM"),
    MmcDesc::new(true, "HLBF"),
    MmcDesc::new(true, "HLBS"),
    MmcDesc::new(true, "CGCE"),
    MmcDesc::new(true, "TXFFC"),
    MmcDesc::new(true, "TXHRC"),
    MmcDesc::new(true, "PAEC"),
    MmcDesc::new(true, "PSEC"),
    MmcDesc::new(true, "PAOC"),
    MmcDesc::new(true, "FFC"),
    MmcDesc::new(false, "RESV"),
    MmcDesc::new(false, "RESV"),
    MmcDesc::new(false, "RESV"),
    MmcDesc::new(false, "RESV"),
    MmcDesc::new(false, "RESV"),
];

/// TSN statistics vector
///
/// Counters only move forward; the vector is cleared only by re-initializing
/// the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TsnStats {
    count: [u64; TSN_STAT_SIZE],
}

impl TsnStats {
    /// Create a zeroed vector
    #[must_use]
    pub const fn new() -> Self {
        Self {
            count: [0; TSN_STAT_SIZE],
        }
    }

    /// Value of one counter
    pub const fn get(&self, index: TsnStatIndex) -> u64 {
        self.count[index.index()]
    }

    /// Raw view of all slots, reserved ones included
    pub const fn as_array(&self) -> &[u64; TSN_STAT_SIZE] {
        &self.count
    }

    /// Valid counters paired with their names from `desc`
    pub fn named<'a>(
        &'a self,
        desc: &'a [MmcDesc; TSN_STAT_SIZE],
    ) -> impl Iterator<Item = (&'static str, u64)> + 'a {
        desc.iter()
            .zip(self.count.iter())
            .filter(|(d, _)| d.valid)
            .map(|(d, v)| (d.name, *v))
    }

    pub(crate) fn increment(&mut self, index: TsnStatIndex) {
        let slot = &mut self.count[index.index()];
        *slot = slot.wrapping_add(1);
    }

    pub(crate) fn store(&mut self, index: TsnStatIndex, value: u32) {
        self.count[index.index()] = u64::from(value);
    }
}

// =============================================================================
// EST Status Decode
// =============================================================================

bitflags! {
    /// EST_STATUS sources handled by [`est_irq_status`]
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EstIrqFlags: u32 {
        /// Constant gate control error
        const CGCE = EST_STATUS_CGCE;
        /// Head-of-line blocking due to scheduling
        const HLBS = EST_STATUS_HLBS;
        /// Head-of-line blocking due to frame size
        const HLBF = EST_STATUS_HLBF;
        /// BTR error
        const BTRE = EST_STATUS_BTRE;
        /// Switch to software-owned list complete
        const SWLC = EST_STATUS_SWLC;
    }
}

/// Outcome of one EST status decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EstStatusReport {
    /// EST_STATUS as read; 0 when no handled source was set
    pub raw: u32,
    /// Queues blocked by scheduling (HLBS)
    pub hlbs_queues: Option<u32>,
    /// Queue and frame size of a frame-size block (HLBF)
    pub hlbf: Option<HlbfInfo>,
    /// BTR error loop count (BTRE)
    pub btr_loop_count: Option<u32>,
}

impl EstStatusReport {
    /// Handled sources that were asserted
    pub const fn flags(&self) -> EstIrqFlags {
        EstIrqFlags::from_bits_truncate(self.raw)
    }

    /// Whether nothing was handled
    pub const fn is_empty(&self) -> bool {
        self.raw == 0
    }
}

/// Frame-size head-of-line blocking details
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HlbfInfo {
    /// Queues that reported a frame-size error
    pub queues: u32,
    /// Queue of the captured frame
    pub queue: u32,
    /// Size of the captured frame
    pub size: u32,
}

/// Decode and acknowledge EST_STATUS
///
/// Returns an empty report without writing anything when none of the handled
/// sources is set. Otherwise each asserted source is acknowledged and
/// counted in `stats`.
pub fn est_irq_status<R: RegisterAccess + ?Sized>(
    regs: &mut R,
    stats: &mut TsnStats,
    txqcnt: u32,
) -> EstStatusReport {
    let status = regs.read(EST_STATUS_OFFSET);
    let flags = EstIrqFlags::from_bits_truncate(status);

    if flags.is_empty() {
        return EstStatusReport::default();
    }

    let txq_mask = queue_mask(txqcnt);
    let mut report = EstStatusReport {
        raw: status,
        ..Default::default()
    };

    if flags.contains(EstIrqFlags::CGCE) {
        regs.write(EST_STATUS_OFFSET, EST_STATUS_CGCE);
        stats.increment(TsnStatIndex::Cgce);
    }

    if flags.contains(EstIrqFlags::HLBS) {
        let queues = regs.read(EST_SCH_ERR_OFFSET) & txq_mask;
        stats.increment(TsnStatIndex::Hlbs);
        regs.write(EST_SCH_ERR_OFFSET, queues);
        report.hlbs_queues = Some(queues);

        #[cfg(feature = "defmt")]
        defmt::warn!("EST: HLB(sched) queues {:#x}", queues);
    }

    if flags.contains(EstIrqFlags::HLBF) {
        let feqn = regs.read(EST_FRM_SZ_ERR_OFFSET) & txq_mask;
        let cap = regs.read(EST_FRM_SZ_CAP_OFFSET);
        let info = HlbfInfo {
            queues: feqn,
            queue: est_frm_sz_cap_hbfq(txqcnt).get(cap),
            size: EST_FRM_SZ_CAP_HBFS.get(cap),
        };
        stats.increment(TsnStatIndex::Hlbf);
        regs.write(EST_FRM_SZ_ERR_OFFSET, feqn);
        report.hlbf = Some(info);

        #[cfg(feature = "defmt")]
        defmt::warn!("EST: HLB(size) queue {} size {}", info.queue, info.size);
    }

    if flags.contains(EstIrqFlags::BTRE) {
        let btrl = EST_STATUS_BTRL.get(status);
        if btrl == EST_STATUS_BTRL_MAX {
            stats.increment(TsnStatIndex::Btrlm);
        } else {
            stats.increment(TsnStatIndex::Btre);
        }
        report.btr_loop_count = Some(btrl);

        #[cfg(feature = "defmt")]
        defmt::info!("EST: BTR error loop count {}", btrl);

        regs.write(EST_STATUS_OFFSET, EST_STATUS_BTRE);
    }

    if flags.contains(EstIrqFlags::SWLC) {
        regs.write(EST_STATUS_OFFSET, EST_STATUS_SWLC);

        #[cfg(feature = "defmt")]
        defmt::info!("EST: SWOL has been switched");
    }

    report
}

// =============================================================================
// Unit Tests
// =============================================================================

//! TSN capability table
//!
//! [`TsnHwif`] is the fixed set of operations a hardware generation exposes to
//! the MAC driver. Implementations carry no state; every operation takes the
//! register window (and, for GCL transfers, a delay provider) explicitly.
//! Dispatch is static: a device is generic over its table.

use embedded_hal::delay::DelayNs;

use crate::hal::poll::PollTiming;
use crate::internal::constants::TSN_STAT_SIZE;
use crate::internal::register::RegisterAccess;

use super::discovery::{self, EstLimits, TsnFeature};
use super::error::Result;
use super::est::{self, GateControlEntry, GclAccess, GclBank, GclCodec};
use super::fpe::{self, FpeConfig, FpeEvent, FpeLimits, FpeMmcIrq, MPacketType};
use super::status::{self, EstStatusReport, MMC_DESC, MmcDesc, TsnStats};
use super::tbs::{self, TbsLimits};

/// Operations exposed by one TSN hardware generation
///
/// FPE and TBS setters never fail; values wider than their field are
/// truncated. Range checking against the `*_get_max`/`*_get_info` limits is
/// the caller's job ([`TsnDevice`](super::device::TsnDevice) does it).
pub trait TsnHwif {
    /// Names and validity of the statistics slots
    const MMC_DESC: &'static [MmcDesc; TSN_STAT_SIZE];

    // -------------------------------------------------------------------------
    // Discovery
    // -------------------------------------------------------------------------

    /// Synopsys core version
    fn read_hwid<R: RegisterAccess + ?Sized>(regs: &R) -> u32;

    /// Whether `feature` was synthesized
    fn has_tsn_cap<R: RegisterAccess + ?Sized>(regs: &R, feature: TsnFeature) -> bool;

    /// One-time setup of a feature block
    fn hw_setup<R: RegisterAccess + ?Sized>(regs: &mut R, feature: TsnFeature, fprq: u32);

    // -------------------------------------------------------------------------
    // EST
    // -------------------------------------------------------------------------

    /// GCL rows per bank; 0 when EST cannot be used
    fn est_get_gcl_depth<R: RegisterAccess + ?Sized>(regs: &R) -> u32;

    /// Time interval width in bits; 0 when EST cannot be used
    fn est_get_ti_width<R: RegisterAccess + ?Sized>(regs: &R) -> u32;

    /// Number of TX queues
    fn est_get_txqcnt<R: RegisterAccess + ?Sized>(regs: &R) -> u32;

    /// Number of RX queues
    fn est_get_rxqcnt<R: RegisterAccess + ?Sized>(regs: &R) -> u32;

    /// Fixed EST limits
    fn est_get_max() -> EstLimits;

    /// Write one GCL or GCRR row
    fn est_write_gcl_config<R, D>(
        regs: &mut R,
        delay: &mut D,
        data: u32,
        access: GclAccess,
        depth: u32,
        timing: PollTiming,
    ) -> Result<()>
    where
        R: RegisterAccess + ?Sized,
        D: DelayNs;

    /// Read one GCL or GCRR row
    fn est_read_gcl_config<R, D>(
        regs: &mut R,
        delay: &mut D,
        access: GclAccess,
        depth: u32,
        timing: PollTiming,
    ) -> Result<u32>
    where
        R: RegisterAccess + ?Sized,
        D: DelayNs;

    /// Read and unpack one gate control entry
    fn est_read_gce<R, D>(
        regs: &mut R,
        delay: &mut D,
        access: GclAccess,
        codec: &GclCodec,
        depth: u32,
        timing: PollTiming,
    ) -> Result<GateControlEntry>
    where
        R: RegisterAccess + ?Sized,
        D: DelayNs;

    /// Set the time interval left shift
    fn est_set_tils<R: RegisterAccess + ?Sized>(regs: &mut R, tils: u32);

    /// Set the PTP time offset
    fn est_set_ptov<R: RegisterAccess + ?Sized>(regs: &mut R, ptov: u32);

    /// Set the current time offset
    fn est_set_ctov<R: RegisterAccess + ?Sized>(regs: &mut R, ctov: u32);

    /// Enable or disable the scheduler
    fn est_set_enable<R: RegisterAccess + ?Sized>(regs: &mut R, enable: bool);

    /// Whether the scheduler is enabled
    fn est_get_enable<R: RegisterAccess + ?Sized>(regs: &R) -> bool;

    /// Bank owned by software (`own`) or by hardware
    fn est_get_bank<R: RegisterAccess + ?Sized>(regs: &R, own: bool) -> GclBank;

    /// Request a bank swap
    fn est_switch_swol<R: RegisterAccess + ?Sized>(regs: &mut R);

    /// Decode and acknowledge EST_STATUS
    fn est_irq_status<R: RegisterAccess + ?Sized>(
        regs: &mut R,
        stats: &mut TsnStats,
        txqcnt: u32,
    ) -> EstStatusReport;

    // -------------------------------------------------------------------------
    // FPE
    // -------------------------------------------------------------------------

    /// Fixed FPE limits
    fn fpe_get_info() -> FpeLimits;

    /// Mark queues as preemptable
    fn fpe_set_txqpec<R: RegisterAccess + ?Sized>(regs: &mut R, txqpec: u32, txqmask: u32);

    /// Enable or disable preemption
    fn fpe_set_enable<R: RegisterAccess + ?Sized>(regs: &mut R, enable: bool);

    /// Preemptable queues and enable state
    fn fpe_get_config<R: RegisterAccess + ?Sized>(regs: &R) -> FpeConfig;

    /// Hold/release status
    fn fpe_get_pmac_sts<R: RegisterAccess + ?Sized>(regs: &R) -> u32;

    /// Set the additional fragment size
    fn fpe_set_afsz<R: RegisterAccess + ?Sized>(regs: &mut R, afsz: u32);

    /// Set the hold advance
    fn fpe_set_hadv<R: RegisterAccess + ?Sized>(regs: &mut R, hadv: u32);

    /// Set the release advance
    fn fpe_set_radv<R: RegisterAccess + ?Sized>(regs: &mut R, radv: u32);

    /// Decode mPacket events
    fn fpe_irq_status<R: RegisterAccess + ?Sized>(regs: &R) -> FpeEvent;

    /// Request an mPacket transmission
    fn fpe_send_mpacket<R: RegisterAccess + ?Sized>(regs: &mut R, kind: MPacketType);

    /// Mirror every FPE MMC counter
    fn fpe_update_mmc_stat<R: RegisterAccess + ?Sized>(regs: &R, stats: &mut TsnStats);

    /// Service the FPE MMC interrupts
    fn fpe_mmc_irq_status<R: RegisterAccess + ?Sized>(regs: &R, stats: &mut TsnStats)
    -> FpeMmcIrq;

    // -------------------------------------------------------------------------
    // TBS
    // -------------------------------------------------------------------------

    /// Fixed TBS limits
    fn tbs_get_max() -> TbsLimits;

    /// Select EST mode for launch time
    fn tbs_set_estm<R: RegisterAccess + ?Sized>(regs: &mut R, estm: bool);

    /// Set the launch expiry offset
    fn tbs_set_leos<R: RegisterAccess + ?Sized>(regs: &mut R, leos: u32, estm: bool);

    /// Set the launch expiry GSN offset
    fn tbs_set_legos<R: RegisterAccess + ?Sized>(regs: &mut R, legos: u32, leos: u32);

    /// Set the fetch time offset
    fn tbs_set_ftos<R: RegisterAccess + ?Sized>(regs: &mut R, ftos: u32, estm: bool, fgos: u32);

    /// Set the fetch GSN offset
    fn tbs_set_fgos<R: RegisterAccess + ?Sized>(regs: &mut R, fgos: u32, ftos: u32);
}

/// Synopsys DWMAC 5.10
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dwmac510;

impl TsnHwif for Dwmac510 {
    const MMC_DESC: &'static [MmcDesc; TSN_STAT_SIZE] = &MMC_DESC;

    fn read_hwid<R: RegisterAccess + ?Sized>(regs: &R) -> u32 {
        discovery::read_hwid(regs)
    }

    fn has_tsn_cap<R: RegisterAccess + ?Sized>(regs: &R, feature: TsnFeature) -> bool {
        discovery::has_tsn_cap(regs, feature)
    }

    fn hw_setup<R: RegisterAccess + ?Sized>(regs: &mut R, feature: TsnFeature, fprq: u32) {
        discovery::hw_setup(regs, feature, fprq);
    }

    fn est_get_gcl_depth<R: RegisterAccess + ?Sized>(regs: &R) -> u32 {
        discovery::est_get_gcl_depth(regs)
    }

    fn est_get_ti_width<R: RegisterAccess + ?Sized>(regs: &R) -> u32 {
        discovery::est_get_ti_width(regs)
    }

    fn est_get_txqcnt<R: RegisterAccess + ?Sized>(regs: &R) -> u32 {
        discovery::est_get_txqcnt(regs)
    }

    fn est_get_rxqcnt<R: RegisterAccess + ?Sized>(regs: &R) -> u32 {
        discovery::est_get_rxqcnt(regs)
    }

    fn est_get_max() -> EstLimits {
        EstLimits::DWMAC510
    }

    fn est_write_gcl_config<R, D>(
        regs: &mut R,
        delay: &mut D,
        data: u32,
        access: GclAccess,
        depth: u32,
        timing: PollTiming,
    ) -> Result<()>
    where
        R: RegisterAccess + ?Sized,
        D: DelayNs,
    {
        est::est_write_gcl_config(regs, delay, data, access, depth, timing)
    }

    fn est_read_gcl_config<R, D>(
        regs: &mut R,
        delay: &mut D,
        access: GclAccess,
        depth: u32,
        timing: PollTiming,
    ) -> Result<u32>
    where
        R: RegisterAccess + ?Sized,
        D: DelayNs,
    {
        est::est_read_gcl_config(regs, delay, access, depth, timing)
    }

    fn est_read_gce<R, D>(
        regs: &mut R,
        delay: &mut D,
        access: GclAccess,
        codec: &GclCodec,
        depth: u32,
        timing: PollTiming,
    ) -> Result<GateControlEntry>
    where
        R: RegisterAccess + ?Sized,
        D: DelayNs,
    {
        est::est_read_gce(regs, delay, access, codec, depth, timing)
    }

    fn est_set_tils<R: RegisterAccess + ?Sized>(regs: &mut R, tils: u32) {
        est::est_set_tils(regs, tils);
    }

    fn est_set_ptov<R: RegisterAccess + ?Sized>(regs: &mut R, ptov: u32) {
        est::est_set_ptov(regs, ptov);
    }

    fn est_set_ctov<R: RegisterAccess + ?Sized>(regs: &mut R, ctov: u32) {
        est::est_set_ctov(regs, ctov);
    }

    fn est_set_enable<R: RegisterAccess + ?Sized>(regs: &mut R, enable: bool) {
        est::est_set_enable(regs, enable);
    }

    fn est_get_enable<R: RegisterAccess + ?Sized>(regs: &R) -> bool {
        est::est_get_enable(regs)
    }

    fn est_get_bank<R: RegisterAccess + ?Sized>(regs: &R, own: bool) -> GclBank {
        est::est_get_bank(regs, own)
    }

    fn est_switch_swol<R: RegisterAccess + ?Sized>(regs: &mut R) {
        est::est_switch_swol(regs);
    }

    fn est_irq_status<R: RegisterAccess + ?Sized>(
        regs: &mut R,
        stats: &mut TsnStats,
        txqcnt: u32,
    ) -> EstStatusReport {
        status::est_irq_status(regs, stats, txqcnt)
    }

    fn fpe_get_info() -> FpeLimits {
        FpeLimits::DWMAC510
    }

    fn fpe_set_txqpec<R: RegisterAccess + ?Sized>(regs: &mut R, txqpec: u32, txqmask: u32) {
        fpe::fpe_set_txqpec(regs, txqpec, txqmask);
    }

    fn fpe_set_enable<R: RegisterAccess + ?Sized>(regs: &mut R, enable: bool) {
        fpe::fpe_set_enable(regs, enable);
    }

    fn fpe_get_config<R: RegisterAccess + ?Sized>(regs: &R) -> FpeConfig {
        fpe::fpe_get_config(regs)
    }

    fn fpe_get_pmac_sts<R: RegisterAccess + ?Sized>(regs: &R) -> u32 {
        fpe::fpe_get_pmac_sts(regs)
    }

    fn fpe_set_afsz<R: RegisterAccess + ?Sized>(regs: &mut R, afsz: u32) {
        fpe::fpe_set_afsz(regs, afsz);
    }

    fn fpe_set_hadv<R: RegisterAccess + ?Sized>(regs: &mut R, hadv: u32) {
        fpe::fpe_set_hadv(regs, hadv);
    }

    fn fpe_set_radv<R: RegisterAccess + ?Sized>(regs: &mut R, radv: u32) {
        fpe::fpe_set_radv(regs, radv);
    }

    fn fpe_irq_status<R: RegisterAccess + ?Sized>(regs: &R) -> FpeEvent {
        fpe::fpe_irq_status(regs)
    }

    fn fpe_send_mpacket<R: RegisterAccess + ?Sized>(regs: &mut R, kind: MPacketType) {
        fpe::fpe_send_mpacket(regs, kind);
    }

    fn fpe_update_mmc_stat<R: RegisterAccess + ?Sized>(regs: &R, stats: &mut TsnStats) {
        fpe::fpe_update_mmc_stat(regs, stats);
    }

    fn fpe_mmc_irq_status<R: RegisterAccess + ?Sized>(
        regs: &R,
        stats: &mut TsnStats,
    ) -> FpeMmcIrq {
        fpe::fpe_mmc_irq_status(regs, stats)
    }

    fn tbs_get_max() -> TbsLimits {
        TbsLimits::DWMAC510
    }

    fn tbs_set_estm<R: RegisterAccess + ?Sized>(regs: &mut R, estm: bool) {
        tbs::tbs_set_estm(regs, estm);
    }

    fn tbs_set_leos<R: RegisterAccess + ?Sized>(regs: &mut R, leos: u32, estm: bool) {
        tbs::tbs_set_leos(regs, leos, estm);
    }

    fn tbs_set_legos<R: RegisterAccess + ?Sized>(regs: &mut R, legos: u32, leos: u32) {
        tbs::tbs_set_legos(regs, legos, leos);
    }

    fn tbs_set_ftos<R: RegisterAccess + ?Sized>(regs: &mut R, ftos: u32, estm: bool, fgos: u32) {
        tbs::tbs_set_ftos(regs, ftos, estm, fgos);
    }

    fn tbs_set_fgos<R: RegisterAccess + ?Sized>(regs: &mut R, fgos: u32, ftos: u32) {
        tbs::tbs_set_fgos(regs, fgos, ftos);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

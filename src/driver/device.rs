//! TSN device binding.
//!
//! [`TsnDevice`] owns a register window and a delay provider, binds them to a
//! capability table, and caches everything discovery reports: GCL depth,
//! interval width and queue counts. Every table operation is exposed with
//! those parameters filled in and with argument checks against the hardware
//! limits, so a rejected call never reaches a register.

use core::marker::PhantomData;

use embedded_hal::delay::DelayNs;

use super::config::TsnConfig;
use super::discovery::{EstLimits, TsnCapabilities, TsnFeature};
use super::error::{ConfigError, ConfigResult, Result};
use super::est::{
    EstSchedule, GateControlEntry, GclAccess, GclBank, GclCodec, est_program_schedule,
};
use super::fpe::{
    FpeAction, FpeConfig, FpeEvent, FpeHandshake, FpeHandshakeState, FpeLimits, FpeMmcIrq,
    MPacketType,
};
use super::hwif::{Dwmac510, TsnHwif};
use super::status::{EstStatusReport, MmcDesc, TsnStats};
use super::tbs::TbsLimits;
use crate::internal::constants::TSN_STAT_SIZE;
use crate::internal::register::RegisterAccess;
use crate::internal::register::mtl::gcrr;

/// Sources serviced by one [`TsnDevice::handle_interrupt`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TsnIrqStatus {
    /// EST status decode
    pub est: EstStatusReport,
    /// mPacket events
    pub fpe: FpeEvent,
    /// FPE MMC counters that fired
    pub mmc: FpeMmcIrq,
}

impl TsnIrqStatus {
    /// Whether no source was pending
    pub const fn is_empty(&self) -> bool {
        self.est.is_empty() && self.fpe.is_empty() && self.mmc.is_empty()
    }
}

/// DWMAC5 TSN device
///
/// # Type Parameters
/// * `R` - Register window ([`Mmio`](crate::Mmio) on hardware)
/// * `D` - Delay provider used for the GCL handshake
/// * `H` - Capability table, [`Dwmac510`] unless another generation is bound
///
/// # Example
/// ```ignore
/// let regs = unsafe { Mmio::new(ETH_BASE) };
/// let mut tsn = TsnDevice::initialize(regs, delay, TsnConfig::default());
///
/// tsn.est_write_gce(0, &GateControlEntry::new(0b0001, 500_000))?;
/// tsn.est_switch_swol()?;
/// ```
pub struct TsnDevice<R, D, H = Dwmac510> {
    regs: R,
    delay: D,
    config: TsnConfig,
    caps: TsnCapabilities,
    /// GCL codec; `None` when EST is absent or unusable
    codec: Option<GclCodec>,
    stats: TsnStats,
    handshake: FpeHandshake,
    _hwif: PhantomData<H>,
}

impl<R, D> TsnDevice<R, D, Dwmac510>
where
    R: RegisterAccess,
    D: DelayNs,
{
    /// Discover a DWMAC 5.10 and bind it
    ///
    /// See [`TsnDevice::initialize_with`].
    pub fn initialize(regs: R, delay: D, config: TsnConfig) -> Self {
        Self::initialize_with(regs, delay, config)
    }
}

impl<R, D, H> TsnDevice<R, D, H>
where
    R: RegisterAccess,
    D: DelayNs,
    H: TsnHwif,
{
    /// Discover the TSN blocks through `H` and bind the device
    ///
    /// Reads the version and feature registers once, builds the GCL codec
    /// when EST is usable, allocates a zeroed statistics vector and, if
    /// `config.setup_on_init` is set, runs hardware setup for every feature
    /// that is present.
    pub fn initialize_with(mut regs: R, delay: D, config: TsnConfig) -> Self {
        let est = H::has_tsn_cap(&regs, TsnFeature::Est);
        let (gcl_depth, ti_width) = if est {
            (H::est_get_gcl_depth(&regs), H::est_get_ti_width(&regs))
        } else {
            (0, 0)
        };

        let caps = TsnCapabilities {
            hwid: H::read_hwid(&regs),
            est,
            fpe: H::has_tsn_cap(&regs, TsnFeature::Fpe),
            tbs: H::has_tsn_cap(&regs, TsnFeature::Tbs),
            gcl_depth,
            ti_width,
            tx_queues: H::est_get_txqcnt(&regs),
            rx_queues: H::est_get_rxqcnt(&regs),
        };

        let codec = if caps.est_usable() {
            GclCodec::new(caps.ti_width, caps.tx_queues).ok()
        } else {
            None
        };

        #[cfg(feature = "defmt")]
        defmt::info!(
            "TSN hwid {:#x}: EST={} FPE={} TBS={} depth={} ti_width={} txq={} rxq={}",
            caps.hwid,
            caps.est,
            caps.fpe,
            caps.tbs,
            caps.gcl_depth,
            caps.ti_width,
            caps.tx_queues,
            caps.rx_queues
        );

        if config.setup_on_init {
            for feature in TsnFeature::ALL {
                if caps.has(feature) {
                    H::hw_setup(&mut regs, feature, config.fpe_rx_queue);
                }
            }
        }

        Self {
            regs,
            delay,
            config,
            caps,
            codec,
            stats: TsnStats::new(),
            handshake: FpeHandshake::new(config.fpe_verify_retries),
            _hwif: PhantomData,
        }
    }

    /// Give back the register window and delay provider
    pub fn release(self) -> (R, D) {
        (self.regs, self.delay)
    }

    // =========================================================================
    // State Accessors
    // =========================================================================

    /// Discovered capabilities
    #[inline(always)]
    pub fn capabilities(&self) -> &TsnCapabilities {
        &self.caps
    }

    /// Configuration the device was bound with
    #[inline(always)]
    pub fn config(&self) -> &TsnConfig {
        &self.config
    }

    /// Register window
    #[inline(always)]
    pub fn regs(&self) -> &R {
        &self.regs
    }

    /// Register window, mutably
    #[inline(always)]
    pub fn regs_mut(&mut self) -> &mut R {
        &mut self.regs
    }

    /// Statistics vector
    #[inline(always)]
    pub fn stats(&self) -> &TsnStats {
        &self.stats
    }

    /// Statistics slot descriptors of the bound table
    #[inline(always)]
    pub fn mmc_desc(&self) -> &'static [MmcDesc; TSN_STAT_SIZE] {
        H::MMC_DESC
    }

    /// Valid statistics with their names
    pub fn named_stats(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        self.stats.named(H::MMC_DESC)
    }

    // =========================================================================
    // Discovery
    // =========================================================================

    /// Synopsys core version, as discovered
    pub fn read_hwid(&self) -> u32 {
        self.caps.hwid
    }

    /// Whether `feature` is present
    pub fn has_tsn_cap(&self, feature: TsnFeature) -> bool {
        self.caps.has(feature)
    }

    /// Run hardware setup for one feature
    pub fn hw_setup(&mut self, feature: TsnFeature) -> ConfigResult<()> {
        self.require(feature)?;
        H::hw_setup(&mut self.regs, feature, self.config.fpe_rx_queue);
        Ok(())
    }

    fn require(&self, feature: TsnFeature) -> ConfigResult<()> {
        if self.caps.has(feature) {
            Ok(())
        } else {
            Err(ConfigError::Unsupported)
        }
    }

    // =========================================================================
    // EST
    // =========================================================================

    /// GCL rows per bank
    pub fn est_get_gcl_depth(&self) -> u32 {
        self.caps.gcl_depth
    }

    /// Time interval width in bits
    pub fn est_get_ti_width(&self) -> u32 {
        self.caps.ti_width
    }

    /// Number of TX queues
    pub fn est_get_txqcnt(&self) -> u32 {
        self.caps.tx_queues
    }

    /// Number of RX queues
    pub fn est_get_rxqcnt(&self) -> u32 {
        self.caps.rx_queues
    }

    /// Fixed EST limits
    pub fn est_get_max(&self) -> EstLimits {
        H::est_get_max()
    }

    /// GCL codec for the discovered layout
    pub fn gcl_codec(&self) -> ConfigResult<GclCodec> {
        self.require(TsnFeature::Est)?;
        self.codec.ok_or(ConfigError::Unsupported)
    }

    /// Check that `access` lands inside the list or the GCRR space
    fn check_gcl_access(&self, access: GclAccess) -> ConfigResult<()> {
        self.gcl_codec()?;
        let limit = if access.gcrr {
            gcrr::LLR + 1
        } else {
            self.caps.gcl_depth
        };
        if access.addr < limit {
            Ok(())
        } else {
            Err(ConfigError::InvalidParameter)
        }
    }

    /// Write one GCL or GCRR row
    pub fn est_write_gcl_config(&mut self, data: u32, access: GclAccess) -> Result<()> {
        self.check_gcl_access(access)?;
        H::est_write_gcl_config(
            &mut self.regs,
            &mut self.delay,
            data,
            access,
            self.caps.gcl_depth,
            self.config.poll_timing(),
        )
    }

    /// Read one GCL or GCRR row
    pub fn est_read_gcl_config(&mut self, access: GclAccess) -> Result<u32> {
        self.check_gcl_access(access)?;
        H::est_read_gcl_config(
            &mut self.regs,
            &mut self.delay,
            access,
            self.caps.gcl_depth,
            self.config.poll_timing(),
        )
    }

    /// Encode and write one gate control entry to row `row` of the software-owned bank
    pub fn est_write_gce(&mut self, row: u32, entry: &GateControlEntry) -> Result<()> {
        let data = self.gcl_codec()?.try_encode(entry)?;
        self.est_write_gcl_config(data, GclAccess::row(row))
    }

    /// Read and unpack one gate control entry
    pub fn est_read_gce(&mut self, access: GclAccess) -> Result<GateControlEntry> {
        let codec = self.gcl_codec()?;
        self.check_gcl_access(access)?;
        H::est_read_gce(
            &mut self.regs,
            &mut self.delay,
            access,
            &codec,
            self.caps.gcl_depth,
            self.config.poll_timing(),
        )
    }

    /// Set the time interval left shift
    pub fn est_set_tils(&mut self, tils: u32) -> ConfigResult<()> {
        self.require(TsnFeature::Est)?;
        H::est_get_max().check_tils(tils)?;
        H::est_set_tils(&mut self.regs, tils);
        Ok(())
    }

    /// Set the PTP time offset
    pub fn est_set_ptov(&mut self, ptov: u32) -> ConfigResult<()> {
        self.require(TsnFeature::Est)?;
        H::est_get_max().check_ptov(ptov)?;
        H::est_set_ptov(&mut self.regs, ptov);
        Ok(())
    }

    /// Set the current time offset
    pub fn est_set_ctov(&mut self, ctov: u32) -> ConfigResult<()> {
        self.require(TsnFeature::Est)?;
        H::est_get_max().check_ctov(ctov)?;
        H::est_set_ctov(&mut self.regs, ctov);
        Ok(())
    }

    /// Enable or disable the scheduler
    pub fn est_set_enable(&mut self, enable: bool) -> ConfigResult<()> {
        self.require(TsnFeature::Est)?;
        H::est_set_enable(&mut self.regs, enable);
        Ok(())
    }

    /// Whether the scheduler is enabled
    pub fn est_get_enable(&self) -> bool {
        self.caps.est && H::est_get_enable(&self.regs)
    }

    /// Bank owned by software (`own`) or by hardware
    pub fn est_get_bank(&self, own: bool) -> ConfigResult<GclBank> {
        self.require(TsnFeature::Est)?;
        Ok(H::est_get_bank(&self.regs, own))
    }

    /// Request a bank swap
    pub fn est_switch_swol(&mut self) -> ConfigResult<()> {
        self.require(TsnFeature::Est)?;
        H::est_switch_swol(&mut self.regs);
        Ok(())
    }

    /// Decode and acknowledge EST_STATUS, updating the statistics
    ///
    /// Returns an empty report without touching the hardware when EST is absent.
    pub fn est_irq_status(&mut self) -> EstStatusReport {
        if !self.caps.est {
            return EstStatusReport::default();
        }
        H::est_irq_status(&mut self.regs, &mut self.stats, self.caps.tx_queues)
    }

    /// Load a schedule into the software-owned bank and request a swap
    pub fn est_program_schedule(&mut self, schedule: &EstSchedule<'_>) -> Result<()> {
        let codec = self.gcl_codec()?;
        est_program_schedule(
            &mut self.regs,
            &mut self.delay,
            schedule,
            &codec,
            self.caps.gcl_depth,
            &H::est_get_max(),
            self.config.poll_timing(),
        )
    }

    // =========================================================================
    // FPE
    // =========================================================================

    /// Fixed FPE limits
    pub fn fpe_get_info(&self) -> FpeLimits {
        H::fpe_get_info()
    }

    /// Mark the queues in `txqpec` as preemptable
    ///
    /// Every bit must name a discovered TX queue.
    pub fn fpe_set_txqpec(&mut self, txqpec: u32) -> ConfigResult<()> {
        self.require(TsnFeature::Fpe)?;
        let txqmask = self.caps.tx_queue_mask();
        if txqpec & !txqmask != 0 {
            return Err(ConfigError::InvalidQueue);
        }
        H::fpe_set_txqpec(&mut self.regs, txqpec, txqmask);
        Ok(())
    }

    /// Enable or disable preemption
    pub fn fpe_set_enable(&mut self, enable: bool) -> ConfigResult<()> {
        self.require(TsnFeature::Fpe)?;
        H::fpe_set_enable(&mut self.regs, enable);
        Ok(())
    }

    /// Preemptable queues and enable state
    pub fn fpe_get_config(&self) -> ConfigResult<FpeConfig> {
        self.require(TsnFeature::Fpe)?;
        Ok(H::fpe_get_config(&self.regs))
    }

    /// Hold/release status
    pub fn fpe_get_pmac_sts(&self) -> ConfigResult<u32> {
        self.require(TsnFeature::Fpe)?;
        Ok(H::fpe_get_pmac_sts(&self.regs))
    }

    /// Set the additional fragment size
    pub fn fpe_set_afsz(&mut self, afsz: u32) -> ConfigResult<()> {
        self.require(TsnFeature::Fpe)?;
        H::fpe_get_info().check_afsz(afsz)?;
        H::fpe_set_afsz(&mut self.regs, afsz);
        Ok(())
    }

    /// Set the hold advance
    pub fn fpe_set_hadv(&mut self, hadv: u32) -> ConfigResult<()> {
        self.require(TsnFeature::Fpe)?;
        H::fpe_get_info().check_hadv(hadv)?;
        H::fpe_set_hadv(&mut self.regs, hadv);
        Ok(())
    }

    /// Set the release advance
    pub fn fpe_set_radv(&mut self, radv: u32) -> ConfigResult<()> {
        self.require(TsnFeature::Fpe)?;
        H::fpe_get_info().check_radv(radv)?;
        H::fpe_set_radv(&mut self.regs, radv);
        Ok(())
    }

    /// Decode mPacket events without feeding the handshake
    pub fn fpe_irq_status(&self) -> FpeEvent {
        if !self.caps.fpe {
            return FpeEvent::empty();
        }
        H::fpe_irq_status(&self.regs)
    }

    /// Request an mPacket transmission
    pub fn fpe_send_mpacket(&mut self, kind: MPacketType) -> ConfigResult<()> {
        self.require(TsnFeature::Fpe)?;
        H::fpe_send_mpacket(&mut self.regs, kind);
        Ok(())
    }

    /// Mirror every FPE MMC counter into the statistics
    pub fn fpe_update_mmc_stat(&mut self) {
        if self.caps.fpe {
            H::fpe_update_mmc_stat(&self.regs, &mut self.stats);
        }
    }

    /// Service the FPE MMC interrupts
    pub fn fpe_mmc_irq_status(&mut self) -> FpeMmcIrq {
        if !self.caps.fpe {
            return FpeMmcIrq::empty();
        }
        H::fpe_mmc_irq_status(&self.regs, &mut self.stats)
    }

    // -------------------------------------------------------------------------
    // Verification handshake
    // -------------------------------------------------------------------------

    /// Handshake tracker
    pub fn fpe_handshake(&self) -> &FpeHandshake {
        &self.handshake
    }

    /// Start a verification round by sending a verify mPacket
    pub fn fpe_start_verification(&mut self) -> ConfigResult<()> {
        self.require(TsnFeature::Fpe)?;
        let action = self.handshake.start();
        self.apply(action);
        Ok(())
    }

    /// Decode mPacket events, advance the handshake and answer a partner verify
    pub fn fpe_handle_events(&mut self) -> FpeEvent {
        let events = self.fpe_irq_status();
        if !events.is_empty() {
            let action = self.handshake.on_events(events);
            self.apply(action);
        }
        events
    }

    /// Report that the verify wait expired; resends or gives up
    pub fn fpe_verify_timeout(&mut self) -> FpeHandshakeState {
        let action = self.handshake.on_verify_timeout();
        self.apply(action);

        #[cfg(feature = "defmt")]
        if self.handshake.state() == FpeHandshakeState::Timeout {
            defmt::warn!("FPE: verification timed out");
        }

        self.handshake.state()
    }

    fn apply(&mut self, action: FpeAction) {
        match action {
            FpeAction::None => {}
            FpeAction::SendVerify => H::fpe_send_mpacket(&mut self.regs, MPacketType::Verify),
            FpeAction::SendRespond => H::fpe_send_mpacket(&mut self.regs, MPacketType::Respond),
        }
    }

    // =========================================================================
    // Interrupt Handling
    // =========================================================================

    /// Service every TSN interrupt source
    ///
    /// Decodes EST status, advances the FPE handshake and reads the FPE MMC
    /// counters that fired. Absent blocks are skipped.
    pub fn handle_interrupt(&mut self) -> TsnIrqStatus {
        TsnIrqStatus {
            est: self.est_irq_status(),
            fpe: self.fpe_handle_events(),
            mmc: self.fpe_mmc_irq_status(),
        }
    }

    // =========================================================================
    // TBS
    // =========================================================================

    /// Fixed TBS limits
    pub fn tbs_get_max(&self) -> TbsLimits {
        H::tbs_get_max()
    }

    /// Select EST mode for launch time
    pub fn tbs_set_estm(&mut self, estm: bool) -> ConfigResult<()> {
        self.require(TsnFeature::Tbs)?;
        H::tbs_set_estm(&mut self.regs, estm);
        Ok(())
    }

    /// Set the launch expiry offset (ns, 256 ns granularity)
    pub fn tbs_set_leos(&mut self, leos: u32, estm: bool) -> ConfigResult<()> {
        self.require(TsnFeature::Tbs)?;
        H::tbs_get_max().check_leos(leos)?;
        H::tbs_set_leos(&mut self.regs, leos, estm);
        Ok(())
    }

    /// Set the launch expiry GSN offset
    pub fn tbs_set_legos(&mut self, legos: u32, leos: u32) -> ConfigResult<()> {
        self.require(TsnFeature::Tbs)?;
        H::tbs_get_max().check_legos(legos)?;
        H::tbs_set_legos(&mut self.regs, legos, leos);
        Ok(())
    }

    /// Set the fetch time offset
    pub fn tbs_set_ftos(&mut self, ftos: u32, estm: bool, fgos: u32) -> ConfigResult<()> {
        self.require(TsnFeature::Tbs)?;
        H::tbs_get_max().check_ftos(ftos)?;
        H::tbs_set_ftos(&mut self.regs, ftos, estm, fgos);
        Ok(())
    }

    /// Set the fetch GSN offset
    pub fn tbs_set_fgos(&mut self, fgos: u32, ftos: u32) -> ConfigResult<()> {
        self.require(TsnFeature::Tbs)?;
        H::tbs_get_max().check_fgos(fgos)?;
        H::tbs_set_fgos(&mut self.regs, fgos, ftos);
        Ok(())
    }
}

impl<R, D, H> core::fmt::Debug for TsnDevice<R, D, H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TsnDevice")
            .field("caps", &self.caps)
            .field("config", &self.config)
            .field("handshake", &self.handshake.state())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::error::{Error, IoError};
    use crate::driver::est::EstTime;
    use crate::driver::status::TsnStatIndex;
    use crate::internal::register::mac::{
        FPE_CTRL_STS_OFFSET as MAC_FPE_CTRL_STS_OFFSET, FPE_CTRL_STS_RRSP, FPE_CTRL_STS_RVER,
        FPE_CTRL_STS_SRSP, FPE_CTRL_STS_SVER, HW_FEATURE2_OFFSET, HW_FEATURE3_OFFSET,
        RXQ_CTRL1_OFFSET, VERSION_OFFSET,
    };
    use crate::internal::register::mmc::{
        FPE_RX_INTR_OFFSET, FPE_RX_INTR_PAECIM, FPE_TX_INTR_OFFSET, RX_PACKET_ASSEMBLY_ERR_OFFSET,
    };
    use crate::internal::register::mtl::{
        EST_CTRL_OFFSET, EST_CTRL_SSWL, EST_GCL_CTRL_OFFSET, EST_GCL_CTRL_SRWO, EST_GCL_DATA_OFFSET,
        EST_INT_EN_OFFSET, EST_STATUS_BTRE, EST_STATUS_OFFSET,
    };
    use crate::testing::{MockDelay, MockRegisters, hw_feature2, hw_feature3};

    type TestDevice = TsnDevice<MockRegisters, MockDelay>;

    /// DWMAC 5.10 with every TSN block, 256-row GCL, 20-bit intervals, 4 TX and 4 RX queues
    fn full_regs() -> MockRegisters {
        let mut regs = MockRegisters::new();
        regs.set(VERSION_OFFSET, 0x5151);
        regs.set(HW_FEATURE3_OFFSET, hw_feature3(true, true, true, 3, 2));
        regs.set(HW_FEATURE2_OFFSET, hw_feature2(4, 4));
        regs.set_self_clearing(EST_GCL_CTRL_OFFSET, EST_GCL_CTRL_SRWO);
        regs.set_write_one_to_clear(EST_STATUS_OFFSET);
        regs
    }

    fn device(regs: MockRegisters) -> TestDevice {
        let dev = TsnDevice::initialize(regs, MockDelay::new(), TsnConfig::default());
        dev.regs().clear_log();
        dev
    }

    // =========================================================================
    // Initialization Tests
    // =========================================================================

    #[test]
    fn initialize_discovers_and_caches_capabilities() {
        let dev = device(full_regs());
        let caps = dev.capabilities();

        assert_eq!(caps.hwid, 0x51);
        assert!(caps.est && caps.fpe && caps.tbs);
        assert_eq!(caps.gcl_depth, 256);
        assert_eq!(caps.ti_width, 20);
        assert_eq!(caps.tx_queues, 4);
        assert_eq!(caps.rx_queues, 4);
        assert_eq!(dev.stats(), &TsnStats::new());
        assert_eq!(dev.mmc_desc()[0].name, "BTRE");
    }

    #[test]
    fn initialize_runs_setup_for_present_features() {
        let dev = TestDevice::initialize(full_regs(), MockDelay::new(), TsnConfig::default());

        assert_eq!(dev.regs().get(EST_INT_EN_OFFSET), 0x1F);
        assert_eq!(dev.regs().get(RXQ_CTRL1_OFFSET), 1 << 24);
    }

    #[test]
    fn initialize_can_skip_setup() {
        let config = TsnConfig::new().with_setup_on_init(false);
        let dev = TestDevice::initialize(full_regs(), MockDelay::new(), config);

        assert!(dev.regs().writes().is_empty());
    }

    #[test]
    fn initialize_without_est_skips_sizing() {
        let regs = MockRegisters::new();
        regs.set(HW_FEATURE3_OFFSET, hw_feature3(false, true, false, 3, 2));
        let dev = device(regs);

        assert_eq!(dev.est_get_gcl_depth(), 0);
        assert_eq!(dev.gcl_codec(), Err(ConfigError::Unsupported));
        assert!(!dev.est_get_enable());
    }

    // =========================================================================
    // EST Tests
    // =========================================================================

    #[test]
    fn gcl_write_end_to_end() {
        let mut dev = device(full_regs());

        dev.est_write_gce(5, &GateControlEntry::new(0b1010, 1000)).unwrap();

        assert_eq!(
            dev.regs().writes(),
            [(EST_GCL_DATA_OFFSET, (0b1010 << 20) | 1000), (EST_GCL_CTRL_OFFSET, 0x501)]
        );
        assert_eq!(dev.regs().reads(), [EST_GCL_CTRL_OFFSET]);
    }

    #[test]
    fn gcl_read_back_through_codec() {
        let mut dev = device(full_regs());
        dev.regs().set(EST_GCL_DATA_OFFSET, (0b0011 << 20) | 250);

        let entry = dev.est_read_gce(GclAccess::row(7)).unwrap();

        assert_eq!(entry, GateControlEntry::new(0b0011, 250));
        assert_eq!(dev.regs().writes_to(EST_GCL_CTRL_OFFSET), [0x703]);
    }

    #[test]
    fn zero_depth_is_unsupported_before_any_access() {
        let regs = full_regs();
        regs.set(HW_FEATURE3_OFFSET, hw_feature3(true, true, true, 0, 2));
        let mut dev = device(regs);

        let result = dev.est_write_gce(0, &GateControlEntry::new(1, 1));

        assert_eq!(result, Err(Error::Config(ConfigError::Unsupported)));
        assert!(dev.regs().reads().is_empty());
        assert!(dev.regs().writes().is_empty());
    }

    #[test]
    fn gcl_row_out_of_range_is_rejected() {
        let mut dev = device(full_regs());

        assert_eq!(
            dev.est_write_gcl_config(0, GclAccess::row(256)),
            Err(Error::Config(ConfigError::InvalidParameter))
        );
        assert_eq!(
            dev.est_write_gcl_config(0, GclAccess { addr: 6, gcrr: true, debug_bank: None }),
            Err(Error::Config(ConfigError::InvalidParameter))
        );
        assert!(dev.regs().writes().is_empty());
    }

    #[test]
    fn gce_wider_than_layout_is_rejected() {
        let mut dev = device(full_regs());

        let result = dev.est_write_gce(0, &GateControlEntry::new(0b1_0000, 1));

        assert_eq!(result, Err(Error::Config(ConfigError::InvalidParameter)));
        assert!(dev.regs().writes().is_empty());
    }

    #[test]
    fn gcl_timeout_propagates() {
        let mut regs = full_regs();
        regs.set_self_clearing(EST_GCL_CTRL_OFFSET, 0);
        let mut dev = device(regs);

        let result = dev.est_write_gce(0, &GateControlEntry::new(1, 1));

        assert_eq!(result, Err(Error::Io(IoError::Timeout)));
    }

    #[test]
    fn est_setters_validate_against_limits() {
        let mut dev = device(full_regs());

        assert_eq!(dev.est_set_ptov(0x100), Err(ConfigError::InvalidParameter));
        assert_eq!(dev.est_set_ctov(0x1000), Err(ConfigError::InvalidParameter));
        assert_eq!(dev.est_set_tils(8), Err(ConfigError::InvalidParameter));
        assert!(dev.regs().writes().is_empty());

        dev.est_set_ptov(0xFF).unwrap();
        dev.est_set_enable(true).unwrap();
        assert!(dev.est_get_enable());
        assert_eq!(dev.regs().writes_to(EST_CTRL_OFFSET).len(), 2);
    }

    #[test]
    fn est_irq_status_updates_device_stats() {
        let mut dev = device(full_regs());
        dev.regs().set(EST_STATUS_OFFSET, EST_STATUS_BTRE | (0xF << 8));

        let report = dev.est_irq_status();

        assert_eq!(report.btr_loop_count, Some(0xF));
        assert_eq!(dev.stats().get(TsnStatIndex::Btrlm), 1);
    }

    #[test]
    fn program_schedule_through_device() {
        let mut dev = device(full_regs());
        let entries = [GateControlEntry::new(0b0001, 500), GateControlEntry::new(0b1110, 500)];
        let schedule = EstSchedule {
            entries: &entries,
            base_time: EstTime::new(1, 0),
            cycle_time: EstTime::new(0, 1000),
            time_extension: 0,
        };

        dev.est_program_schedule(&schedule).unwrap();

        assert_eq!(dev.regs().writes_to(EST_GCL_CTRL_OFFSET).len(), 8);
        assert_ne!(dev.regs().get(EST_CTRL_OFFSET) & EST_CTRL_SSWL, 0);
    }

    // =========================================================================
    // FPE Tests
    // =========================================================================

    #[test]
    fn txqpec_outside_queues_is_invalid_queue() {
        let mut dev = device(full_regs());

        assert_eq!(dev.fpe_set_txqpec(0b1_0000), Err(ConfigError::InvalidQueue));
        assert!(dev.regs().writes().is_empty());

        dev.fpe_set_txqpec(0b1110).unwrap();
        dev.fpe_set_enable(true).unwrap();
        assert_eq!(
            dev.fpe_get_config(),
            Ok(FpeConfig {
                txqpec: 0b1110,
                enabled: true,
            })
        );
    }

    #[test]
    fn fpe_setters_validate_against_limits() {
        let mut dev = device(full_regs());

        assert_eq!(dev.fpe_set_afsz(4), Err(ConfigError::InvalidParameter));
        assert_eq!(dev.fpe_set_hadv(0x1_0000), Err(ConfigError::InvalidParameter));
        assert_eq!(dev.fpe_set_radv(0x1_0000), Err(ConfigError::InvalidParameter));
        assert!(dev.regs().writes().is_empty());
    }

    #[test]
    fn mmc_interrupt_end_to_end() {
        let mut dev = device(full_regs());
        dev.regs().set(FPE_RX_INTR_OFFSET, FPE_RX_INTR_PAECIM);
        dev.regs().set(RX_PACKET_ASSEMBLY_ERR_OFFSET, 9);

        let fired = dev.fpe_mmc_irq_status();

        assert_eq!(fired, FpeMmcIrq::RX_ASSEMBLY_ERR);
        assert_eq!(
            dev.regs().reads(),
            [FPE_TX_INTR_OFFSET, FPE_RX_INTR_OFFSET, RX_PACKET_ASSEMBLY_ERR_OFFSET]
        );
        assert_eq!(dev.stats().get(TsnStatIndex::Paec), 9);
    }

    #[test]
    fn named_stats_follow_table() {
        let mut dev = device(full_regs());
        dev.regs().set(RX_PACKET_ASSEMBLY_ERR_OFFSET, 3);
        dev.fpe_update_mmc_stat();

        let paec = dev.named_stats().find(|(name, _)| *name == "PAEC");

        assert_eq!(paec, Some(("PAEC", 3)));
        assert_eq!(dev.named_stats().count(), 11);
    }

    #[test]
    fn verification_handshake_end_to_end() {
        let mut dev = device(full_regs());

        dev.fpe_start_verification().unwrap();
        assert_ne!(dev.regs().get(MAC_FPE_CTRL_STS_OFFSET) & FPE_CTRL_STS_SVER, 0);

        // Partner verifies us: answer with a respond
        dev.regs().set(MAC_FPE_CTRL_STS_OFFSET, FPE_CTRL_STS_RVER);
        dev.fpe_handle_events();
        assert_ne!(dev.regs().get(MAC_FPE_CTRL_STS_OFFSET) & FPE_CTRL_STS_SRSP, 0);
        assert_eq!(dev.fpe_handshake().state(), FpeHandshakeState::VerifySent);

        // Partner responds to our verify
        dev.regs().set(MAC_FPE_CTRL_STS_OFFSET, FPE_CTRL_STS_RRSP);
        let events = dev.fpe_handle_events();
        assert_eq!(events, FpeEvent::RX_RESPOND);
        assert!(dev.fpe_handshake().is_verified());
    }

    #[test]
    fn verification_gives_up_after_retries() {
        let mut dev = device(full_regs());
        dev.fpe_start_verification().unwrap();

        assert_eq!(dev.fpe_verify_timeout(), FpeHandshakeState::VerifySent);
        assert_eq!(dev.fpe_verify_timeout(), FpeHandshakeState::VerifySent);
        assert_eq!(dev.fpe_verify_timeout(), FpeHandshakeState::Timeout);
        assert_eq!(dev.regs().writes_to(MAC_FPE_CTRL_STS_OFFSET).len(), 3);
    }

    #[test]
    fn absent_feature_is_unsupported() {
        let regs = MockRegisters::new();
        regs.set(HW_FEATURE3_OFFSET, hw_feature3(true, false, false, 1, 1));
        let mut dev = device(regs);

        assert_eq!(dev.fpe_set_enable(true), Err(ConfigError::Unsupported));
        assert_eq!(dev.fpe_start_verification(), Err(ConfigError::Unsupported));
        assert_eq!(dev.tbs_set_estm(true), Err(ConfigError::Unsupported));
        assert_eq!(dev.hw_setup(TsnFeature::Tbs), Err(ConfigError::Unsupported));
        assert!(dev.fpe_mmc_irq_status().is_empty());
        assert!(dev.regs().writes().is_empty());
        assert!(dev.regs().reads().is_empty());
    }

    #[test]
    fn handle_interrupt_services_every_block() {
        let mut dev = device(full_regs());
        dev.regs().set(EST_STATUS_OFFSET, EST_STATUS_BTRE);
        dev.regs().set(MAC_FPE_CTRL_STS_OFFSET, FPE_CTRL_STS_RVER);
        dev.regs().set(FPE_RX_INTR_OFFSET, FPE_RX_INTR_PAECIM);

        let status = dev.handle_interrupt();

        assert_eq!(status.est.btr_loop_count, Some(0));
        assert_eq!(status.fpe, FpeEvent::RX_VERIFY);
        assert_eq!(status.mmc, FpeMmcIrq::RX_ASSEMBLY_ERR);
        assert_ne!(dev.regs().get(MAC_FPE_CTRL_STS_OFFSET) & FPE_CTRL_STS_SRSP, 0);
        assert_eq!(dev.stats().get(TsnStatIndex::Btre), 1);
    }

    #[test]
    fn handle_interrupt_idle_is_empty() {
        let mut dev = device(full_regs());
        assert!(dev.handle_interrupt().is_empty());
        assert!(dev.regs().writes().is_empty());
    }

    // =========================================================================
    // TBS Tests
    // =========================================================================

    #[test]
    fn tbs_setters_validate_against_limits() {
        let mut dev = device(full_regs());

        assert_eq!(dev.tbs_set_leos(0x100_0000, false), Err(ConfigError::InvalidParameter));
        assert_eq!(dev.tbs_set_legos(8, 0), Err(ConfigError::InvalidParameter));
        assert_eq!(dev.tbs_set_ftos(0x100_0000, false, 0), Err(ConfigError::InvalidParameter));
        assert_eq!(dev.tbs_set_fgos(8, 0), Err(ConfigError::InvalidParameter));
        assert!(dev.regs().writes().is_empty());

        dev.tbs_set_estm(true).unwrap();
        dev.tbs_set_leos(0x200, true).unwrap();
        dev.tbs_set_ftos(0x10, true, 0).unwrap();
    }

    #[test]
    fn release_returns_resources() {
        let dev = device(full_regs());
        let (regs, _delay) = dev.release();
        assert_eq!(regs.get(VERSION_OFFSET), 0x5151);
    }
}

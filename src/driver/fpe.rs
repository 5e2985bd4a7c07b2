//! Frame Preemption (802.1Qbu / 802.3br)
//!
//! Preemption is negotiated with the link partner by exchanging verify and
//! respond mPackets. The MAC reports transmitted and received mPackets in
//! MAC_FPE_CTRL_STS; [`FpeHandshake`] turns those events into the next action
//! without ever blocking.
//!
//! Queue classification, fragment size and the hold/release advance live in
//! the MTL block. The MMC block keeps preemption counters that are mirrored
//! into the TSN statistics vector.

use bitflags::bitflags;

use crate::internal::constants::{FPE_AFSZ_MAX, FPE_HADV_MAX, FPE_PMAC_BIT, FPE_RADV_MAX};
use crate::internal::register::RegisterAccess;
use crate::internal::register::mac::{
    FPE_CTRL_STS_EFPE, FPE_CTRL_STS_OFFSET as MAC_FPE_CTRL_STS_OFFSET, FPE_CTRL_STS_RRSP,
    FPE_CTRL_STS_RVER, FPE_CTRL_STS_SRSP, FPE_CTRL_STS_SVER, FPE_CTRL_STS_TRSP,
    FPE_CTRL_STS_TVER,
};
use crate::internal::register::mmc::{
    FPE_RX_INTR_FCIM, FPE_RX_INTR_OFFSET, FPE_RX_INTR_PAECIM, FPE_RX_INTR_PAOCIM,
    FPE_RX_INTR_PSECIM, FPE_TX_INTR_FCIM, FPE_TX_INTR_HRCIM, FPE_TX_INTR_OFFSET,
    RX_FPE_FRAGMENT_OFFSET, RX_PACKET_ASSEMBLY_ERR_OFFSET, RX_PACKET_ASSEMBLY_OK_OFFSET,
    RX_PACKET_SMD_ERR_OFFSET, TX_FPE_FRAGMENT_OFFSET, TX_HOLD_REQ_OFFSET,
};
use crate::internal::register::mtl::{
    FPE_ADVANCE_HADV, FPE_ADVANCE_OFFSET, FPE_ADVANCE_RADV, FPE_CTRL_STS_AFSZ,
    FPE_CTRL_STS_HRS, FPE_CTRL_STS_OFFSET as MTL_FPE_CTRL_STS_OFFSET, FPE_CTRL_STS_PEC,
};

use super::discovery::check_max;
use super::error::ConfigResult;
use super::status::{TsnStatIndex, TsnStats};

// =============================================================================
// Limits and Configuration
// =============================================================================

/// Fixed FPE parameter limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FpeLimits {
    /// pMAC queue bit (TX queue 0)
    pub pmac_bit: u32,
    /// Maximum additional fragment size
    pub afsz_max: u32,
    /// Maximum hold advance
    pub hadv_max: u32,
    /// Maximum release advance
    pub radv_max: u32,
}

impl FpeLimits {
    /// Limits of the DWMAC 5.10 FPE block
    pub const DWMAC510: Self = Self {
        pmac_bit: FPE_PMAC_BIT,
        afsz_max: FPE_AFSZ_MAX,
        hadv_max: FPE_HADV_MAX,
        radv_max: FPE_RADV_MAX,
    };

    /// Check an additional fragment size
    pub const fn check_afsz(&self, afsz: u32) -> ConfigResult<()> {
        check_max(afsz, self.afsz_max)
    }

    /// Check a hold advance
    pub const fn check_hadv(&self, hadv: u32) -> ConfigResult<()> {
        check_max(hadv, self.hadv_max)
    }

    /// Check a release advance
    pub const fn check_radv(&self, radv: u32) -> ConfigResult<()> {
        check_max(radv, self.radv_max)
    }
}

/// Preemption classification and enable state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FpeConfig {
    /// Preemptable TX queues, one bit per queue
    pub txqpec: u32,
    /// Preemption enabled in the MAC
    pub enabled: bool,
}

/// mPacket kinds used in the verification exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MPacketType {
    /// Verify request
    Verify,
    /// Response to a partner verify
    Respond,
}

// =============================================================================
// Field Setters and Readers
// =============================================================================

/// Mark the queues in `txqpec` as preemptable, leaving queues outside `txqmask` alone
pub fn fpe_set_txqpec<R: RegisterAccess + ?Sized>(regs: &mut R, txqpec: u32, txqmask: u32) {
    regs.modify(MTL_FPE_CTRL_STS_OFFSET, |v| {
        (v & !FPE_CTRL_STS_PEC.encode(txqmask)) | FPE_CTRL_STS_PEC.encode(txqpec & txqmask)
    });
}

/// Enable or disable preemption in the MAC
pub fn fpe_set_enable<R: RegisterAccess + ?Sized>(regs: &mut R, enable: bool) {
    if enable {
        regs.set_bits(MAC_FPE_CTRL_STS_OFFSET, FPE_CTRL_STS_EFPE);
    } else {
        regs.clear_bits(MAC_FPE_CTRL_STS_OFFSET, FPE_CTRL_STS_EFPE);
    }
}

/// Read the preemptable queues and the enable state
pub fn fpe_get_config<R: RegisterAccess + ?Sized>(regs: &R) -> FpeConfig {
    FpeConfig {
        txqpec: FPE_CTRL_STS_PEC.get(regs.read(MTL_FPE_CTRL_STS_OFFSET)),
        enabled: regs.read(MAC_FPE_CTRL_STS_OFFSET) & FPE_CTRL_STS_EFPE != 0,
    }
}

/// Read the hold/release status (1 while preemptable traffic is held)
pub fn fpe_get_pmac_sts<R: RegisterAccess + ?Sized>(regs: &R) -> u32 {
    FPE_CTRL_STS_HRS.get(regs.read(MTL_FPE_CTRL_STS_OFFSET))
}

/// Set the additional fragment size
pub fn fpe_set_afsz<R: RegisterAccess + ?Sized>(regs: &mut R, afsz: u32) {
    regs.modify(MTL_FPE_CTRL_STS_OFFSET, |v| FPE_CTRL_STS_AFSZ.insert(v, afsz));
}

/// Set the hold advance
pub fn fpe_set_hadv<R: RegisterAccess + ?Sized>(regs: &mut R, hadv: u32) {
    regs.modify(FPE_ADVANCE_OFFSET, |v| FPE_ADVANCE_HADV.insert(v, hadv));
}

/// Set the release advance
pub fn fpe_set_radv<R: RegisterAccess + ?Sized>(regs: &mut R, radv: u32) {
    regs.modify(FPE_ADVANCE_OFFSET, |v| FPE_ADVANCE_RADV.insert(v, radv));
}

// =============================================================================
// mPacket Events
// =============================================================================

bitflags! {
    /// mPacket events reported by MAC_FPE_CTRL_STS
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FpeEvent: u32 {
        /// Respond mPacket transmitted
        const TX_RESPOND = FPE_CTRL_STS_TRSP;
        /// Verify mPacket transmitted
        const TX_VERIFY = FPE_CTRL_STS_TVER;
        /// Respond mPacket received
        const RX_RESPOND = FPE_CTRL_STS_RRSP;
        /// Verify mPacket received
        const RX_VERIFY = FPE_CTRL_STS_RVER;
    }
}

/// Decode the mPacket events currently reported by the MAC
///
/// Reports every event bit that is set and clears nothing.
pub fn fpe_irq_status<R: RegisterAccess + ?Sized>(regs: &R) -> FpeEvent {
    let event = FpeEvent::from_bits_truncate(regs.read(MAC_FPE_CTRL_STS_OFFSET));

    #[cfg(feature = "defmt")]
    {
        if event.contains(FpeEvent::TX_RESPOND) {
            defmt::info!("FPE: respond mPacket transmitted");
        }
        if event.contains(FpeEvent::TX_VERIFY) {
            defmt::info!("FPE: verify mPacket transmitted");
        }
        if event.contains(FpeEvent::RX_RESPOND) {
            defmt::info!("FPE: respond mPacket received");
        }
        if event.contains(FpeEvent::RX_VERIFY) {
            defmt::info!("FPE: verify mPacket received");
        }
    }

    event
}

/// Request transmission of one mPacket; does not wait for it to go out
pub fn fpe_send_mpacket<R: RegisterAccess + ?Sized>(regs: &mut R, kind: MPacketType) {
    regs.modify(MAC_FPE_CTRL_STS_OFFSET, |v| match kind {
        MPacketType::Verify => (v & !FPE_CTRL_STS_SRSP) | FPE_CTRL_STS_SVER,
        MPacketType::Respond => (v & !FPE_CTRL_STS_SVER) | FPE_CTRL_STS_SRSP,
    });
}

// =============================================================================
// MMC Counters
// =============================================================================

bitflags! {
    /// FPE MMC counters that raised an interrupt
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FpeMmcIrq: u32 {
        /// TX hold request counter
        const TX_HOLD_REQ = 1 << 0;
        /// TX fragment counter
        const TX_FRAGMENT = 1 << 1;
        /// RX packet assembly error counter
        const RX_ASSEMBLY_ERR = 1 << 2;
        /// RX packet SMD error counter
        const RX_SMD_ERR = 1 << 3;
        /// RX packet assembly OK counter
        const RX_ASSEMBLY_OK = 1 << 4;
        /// RX fragment counter
        const RX_FRAGMENT = 1 << 5;
    }
}

/// One FPE MMC counter and where its interrupt is reported
struct MmcCounter {
    intr: usize,
    bit: u32,
    counter: usize,
    stat: TsnStatIndex,
    flag: FpeMmcIrq,
}

const MMC_COUNTERS: [MmcCounter; 6] = [
    MmcCounter {
        intr: FPE_TX_INTR_OFFSET,
        bit: FPE_TX_INTR_HRCIM,
        counter: TX_HOLD_REQ_OFFSET,
        stat: TsnStatIndex::TxHrc,
        flag: FpeMmcIrq::TX_HOLD_REQ,
    },
    MmcCounter {
        intr: FPE_TX_INTR_OFFSET,
        bit: FPE_TX_INTR_FCIM,
        counter: TX_FPE_FRAGMENT_OFFSET,
        stat: TsnStatIndex::TxFfc,
        flag: FpeMmcIrq::TX_FRAGMENT,
    },
    MmcCounter {
        intr: FPE_RX_INTR_OFFSET,
        bit: FPE_RX_INTR_PAECIM,
        counter: RX_PACKET_ASSEMBLY_ERR_OFFSET,
        stat: TsnStatIndex::Paec,
        flag: FpeMmcIrq::RX_ASSEMBLY_ERR,
    },
    MmcCounter {
        intr: FPE_RX_INTR_OFFSET,
        bit: FPE_RX_INTR_PSECIM,
        counter: RX_PACKET_SMD_ERR_OFFSET,
        stat: TsnStatIndex::Psec,
        flag: FpeMmcIrq::RX_SMD_ERR,
    },
    MmcCounter {
        intr: FPE_RX_INTR_OFFSET,
        bit: FPE_RX_INTR_PAOCIM,
        counter: RX_PACKET_ASSEMBLY_OK_OFFSET,
        stat: TsnStatIndex::Paoc,
        flag: FpeMmcIrq::RX_ASSEMBLY_OK,
    },
    MmcCounter {
        intr: FPE_RX_INTR_OFFSET,
        bit: FPE_RX_INTR_FCIM,
        counter: RX_FPE_FRAGMENT_OFFSET,
        stat: TsnStatIndex::Ffc,
        flag: FpeMmcIrq::RX_FRAGMENT,
    },
];

/// Service the FPE MMC interrupts
///
/// Reads both interrupt status registers, then only the counters whose bit is
/// set. Reading a counter acknowledges its interrupt; the value is stored in
/// the matching statistics slot.
pub fn fpe_mmc_irq_status<R: RegisterAccess + ?Sized>(
    regs: &R,
    stats: &mut TsnStats,
) -> FpeMmcIrq {
    let tx_stat = regs.read(FPE_TX_INTR_OFFSET);
    let rx_stat = regs.read(FPE_RX_INTR_OFFSET);
    let mut fired = FpeMmcIrq::empty();

    for mmc in &MMC_COUNTERS {
        let status = if mmc.intr == FPE_TX_INTR_OFFSET { tx_stat } else { rx_stat };
        if status & mmc.bit == 0 {
            continue;
        }

        let value = regs.read(mmc.counter);
        stats.store(mmc.stat, value);
        fired |= mmc.flag;

        #[cfg(feature = "defmt")]
        defmt::debug!("FPE IRQ: {} = {}", super::status::MMC_DESC[mmc.stat.index()].name, value);
    }

    fired
}

/// Mirror every FPE MMC counter into `stats`
pub fn fpe_update_mmc_stat<R: RegisterAccess + ?Sized>(regs: &R, stats: &mut TsnStats) {
    for mmc in &MMC_COUNTERS {
        stats.store(mmc.stat, regs.read(mmc.counter));
    }
}

// =============================================================================
// Verification Handshake
// =============================================================================

/// Progress of the local verification request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FpeHandshakeState {
    /// No verification in progress
    #[default]
    Idle,
    /// Verify sent, waiting for the partner's respond
    VerifySent,
    /// Partner responded; preemption may be enabled
    VerifyAcked,
    /// Partner never responded
    Timeout,
}

/// mPacket the caller should send next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FpeAction {
    /// Nothing to send
    None,
    /// Send a verify mPacket
    SendVerify,
    /// Answer the partner with a respond mPacket
    SendRespond,
}

/// Verification handshake tracker
///
/// Pure state: it never touches registers. Feed it decoded [`FpeEvent`]s and
/// verify timeouts; it returns the mPacket to send next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FpeHandshake {
    state: FpeHandshakeState,
    attempts: u8,
    max_attempts: u8,
}

impl FpeHandshake {
    /// Create a tracker that sends at most `max_attempts` verify mPackets
    #[must_use]
    pub const fn new(max_attempts: u8) -> Self {
        Self {
            state: FpeHandshakeState::Idle,
            attempts: 0,
            max_attempts: if max_attempts == 0 { 1 } else { max_attempts },
        }
    }

    /// Current state
    pub const fn state(&self) -> FpeHandshakeState {
        self.state
    }

    /// Verify mPackets sent so far in this round
    pub const fn attempts(&self) -> u8 {
        self.attempts
    }

    /// Whether the partner acknowledged our verify
    pub const fn is_verified(&self) -> bool {
        matches!(self.state, FpeHandshakeState::VerifyAcked)
    }

    /// Begin a new verification round
    pub fn start(&mut self) -> FpeAction {
        self.state = FpeHandshakeState::VerifySent;
        self.attempts = 1;
        FpeAction::SendVerify
    }

    /// Return to idle
    pub fn reset(&mut self) {
        self.state = FpeHandshakeState::Idle;
        self.attempts = 0;
    }

    /// Consume decoded events
    ///
    /// A partner verify is always answered, whatever the local state. A
    /// partner respond completes a pending local verify.
    pub fn on_events(&mut self, events: FpeEvent) -> FpeAction {
        if events.contains(FpeEvent::RX_RESPOND) && self.state == FpeHandshakeState::VerifySent {
            self.state = FpeHandshakeState::VerifyAcked;
        }

        if events.contains(FpeEvent::RX_VERIFY) {
            FpeAction::SendRespond
        } else {
            FpeAction::None
        }
    }

    /// The verify wait expired without a respond
    pub fn on_verify_timeout(&mut self) -> FpeAction {
        if self.state != FpeHandshakeState::VerifySent {
            return FpeAction::None;
        }
        if self.attempts < self.max_attempts {
            self.attempts += 1;
            FpeAction::SendVerify
        } else {
            self.state = FpeHandshakeState::Timeout;
            FpeAction::None
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::internal::constants::FPE_VERIFY_RETRIES;
    use crate::testing::MockRegisters;

    // =========================================================================
    // Setter Tests
    // =========================================================================

    #[test]
    fn txqpec_updates_only_masked_queues() {
        let mut regs = MockRegisters::new();
        regs.set(MTL_FPE_CTRL_STS_OFFSET, FPE_CTRL_STS_PEC.encode(0b1000_0001) | 0b10);

        fpe_set_txqpec(&mut regs, 0b0110, 0b1111);

        let value = regs.get(MTL_FPE_CTRL_STS_OFFSET);
        assert_eq!(FPE_CTRL_STS_PEC.get(value), 0b1000_0110);
        assert_eq!(FPE_CTRL_STS_AFSZ.get(value), 0b10);
    }

    #[test]
    fn txqpec_ignores_bits_outside_mask() {
        let mut regs = MockRegisters::new();

        fpe_set_txqpec(&mut regs, 0xFF, 0b0011);

        assert_eq!(FPE_CTRL_STS_PEC.get(regs.get(MTL_FPE_CTRL_STS_OFFSET)), 0b0011);
    }

    #[test]
    fn enable_and_get_config() {
        let mut regs = MockRegisters::new();
        fpe_set_txqpec(&mut regs, 0b101, 0xFF);
        fpe_set_enable(&mut regs, true);

        assert_eq!(
            fpe_get_config(&regs),
            FpeConfig {
                txqpec: 0b101,
                enabled: true,
            }
        );

        fpe_set_enable(&mut regs, false);
        assert!(!fpe_get_config(&regs).enabled);
    }

    #[test]
    fn pmac_status_reads_hrs() {
        let regs = MockRegisters::new();
        regs.set(MTL_FPE_CTRL_STS_OFFSET, 1 << 28);
        assert_eq!(fpe_get_pmac_sts(&regs), 1);
    }

    #[test]
    fn advance_setters_are_masked() {
        let mut regs = MockRegisters::new();

        fpe_set_hadv(&mut regs, 0x1_2345);
        fpe_set_radv(&mut regs, 0xABCD);

        assert_eq!(regs.get(FPE_ADVANCE_OFFSET), (0xABCD << 16) | 0x2345);
    }

    #[test]
    fn radv_does_not_leak_into_hadv() {
        let mut regs = MockRegisters::new();
        fpe_set_hadv(&mut regs, 0x0011);

        fpe_set_radv(&mut regs, 0x00FF);

        assert_eq!(FPE_ADVANCE_HADV.get(regs.get(FPE_ADVANCE_OFFSET)), 0x0011);
        assert_eq!(FPE_ADVANCE_RADV.get(regs.get(FPE_ADVANCE_OFFSET)), 0x00FF);
    }

    #[test]
    fn afsz_is_masked() {
        let mut regs = MockRegisters::new();
        regs.set(MTL_FPE_CTRL_STS_OFFSET, FPE_CTRL_STS_PEC.encode(1));

        fpe_set_afsz(&mut regs, 0x7);

        let value = regs.get(MTL_FPE_CTRL_STS_OFFSET);
        assert_eq!(FPE_CTRL_STS_AFSZ.get(value), 0x3);
        assert_eq!(FPE_CTRL_STS_PEC.get(value), 1);
    }

    #[test]
    fn limits_checks() {
        let limits = FpeLimits::DWMAC510;
        assert_eq!(limits.pmac_bit, 1);
        assert!(limits.check_afsz(3).is_ok());
        assert!(limits.check_afsz(4).is_err());
        assert!(limits.check_hadv(0xFFFF).is_ok());
        assert!(limits.check_radv(0x1_0000).is_err());
    }

    // =========================================================================
    // mPacket Tests
    // =========================================================================

    #[test]
    fn send_verify_then_respond() {
        let mut regs = MockRegisters::new();
        regs.set(MAC_FPE_CTRL_STS_OFFSET, FPE_CTRL_STS_EFPE);

        fpe_send_mpacket(&mut regs, MPacketType::Verify);
        assert_eq!(regs.get(MAC_FPE_CTRL_STS_OFFSET), FPE_CTRL_STS_EFPE | FPE_CTRL_STS_SVER);

        fpe_send_mpacket(&mut regs, MPacketType::Respond);
        assert_eq!(regs.get(MAC_FPE_CTRL_STS_OFFSET), FPE_CTRL_STS_EFPE | FPE_CTRL_STS_SRSP);
    }

    #[test]
    fn irq_status_reports_all_set_events_and_clears_nothing() {
        let regs = MockRegisters::new();
        regs.set(
            MAC_FPE_CTRL_STS_OFFSET,
            FPE_CTRL_STS_TVER | FPE_CTRL_STS_RRSP | FPE_CTRL_STS_EFPE,
        );

        let event = fpe_irq_status(&regs);

        assert_eq!(event, FpeEvent::TX_VERIFY | FpeEvent::RX_RESPOND);
        assert!(regs.writes().is_empty());
    }

    // =========================================================================
    // MMC Tests
    // =========================================================================

    #[test]
    fn mmc_irq_reads_only_flagged_counter() {
        let regs = MockRegisters::new();
        regs.set(FPE_RX_INTR_OFFSET, FPE_RX_INTR_PAECIM);
        regs.set(RX_PACKET_ASSEMBLY_ERR_OFFSET, 17);
        regs.set(RX_PACKET_SMD_ERR_OFFSET, 99);
        let mut stats = TsnStats::new();

        let fired = fpe_mmc_irq_status(&regs, &mut stats);

        assert_eq!(fired, FpeMmcIrq::RX_ASSEMBLY_ERR);
        assert_eq!(
            regs.reads(),
            [FPE_TX_INTR_OFFSET, FPE_RX_INTR_OFFSET, RX_PACKET_ASSEMBLY_ERR_OFFSET]
        );
        assert_eq!(stats.get(TsnStatIndex::Paec), 17);
        assert_eq!(stats.get(TsnStatIndex::Psec), 0);
    }

    #[test]
    fn mmc_irq_tx_sources() {
        let regs = MockRegisters::new();
        regs.set(FPE_TX_INTR_OFFSET, FPE_TX_INTR_HRCIM | FPE_TX_INTR_FCIM);
        regs.set(TX_HOLD_REQ_OFFSET, 5);
        regs.set(TX_FPE_FRAGMENT_OFFSET, 6);
        let mut stats = TsnStats::new();

        let fired = fpe_mmc_irq_status(&regs, &mut stats);

        assert_eq!(fired, FpeMmcIrq::TX_HOLD_REQ | FpeMmcIrq::TX_FRAGMENT);
        assert_eq!(stats.get(TsnStatIndex::TxHrc), 5);
        assert_eq!(stats.get(TsnStatIndex::TxFfc), 6);
    }

    #[test]
    fn mmc_irq_idle_reads_only_status() {
        let regs = MockRegisters::new();
        let mut stats = TsnStats::new();

        assert!(fpe_mmc_irq_status(&regs, &mut stats).is_empty());
        assert_eq!(regs.reads(), [FPE_TX_INTR_OFFSET, FPE_RX_INTR_OFFSET]);
    }

    #[test]
    fn update_mmc_stat_mirrors_all_counters() {
        let regs = MockRegisters::new();
        let counters = [
            (TX_HOLD_REQ_OFFSET, TsnStatIndex::TxHrc),
            (TX_FPE_FRAGMENT_OFFSET, TsnStatIndex::TxFfc),
            (RX_PACKET_ASSEMBLY_ERR_OFFSET, TsnStatIndex::Paec),
            (RX_PACKET_SMD_ERR_OFFSET, TsnStatIndex::Psec),
            (RX_PACKET_ASSEMBLY_OK_OFFSET, TsnStatIndex::Paoc),
            (RX_FPE_FRAGMENT_OFFSET, TsnStatIndex::Ffc),
        ];
        for (value, (offset, _)) in (100u32..).zip(counters) {
            regs.set(offset, value);
        }
        let mut stats = TsnStats::new();

        fpe_update_mmc_stat(&regs, &mut stats);

        for (value, (_, index)) in (100u64..).zip(counters) {
            assert_eq!(stats.get(index), value);
        }
        assert_eq!(stats.get(TsnStatIndex::Cgce), 0);
    }

    // =========================================================================
    // Handshake Tests
    // =========================================================================

    #[test]
    fn handshake_completes_on_partner_respond() {
        let mut hs = FpeHandshake::new(FPE_VERIFY_RETRIES);

        assert_eq!(hs.start(), FpeAction::SendVerify);
        assert_eq!(hs.state(), FpeHandshakeState::VerifySent);

        assert_eq!(hs.on_events(FpeEvent::TX_VERIFY), FpeAction::None);
        assert_eq!(hs.on_events(FpeEvent::RX_RESPOND), FpeAction::None);
        assert!(hs.is_verified());
    }

    #[test]
    fn handshake_answers_partner_verify_in_any_state() {
        let mut hs = FpeHandshake::new(3);
        assert_eq!(hs.on_events(FpeEvent::RX_VERIFY), FpeAction::SendRespond);
        assert_eq!(hs.state(), FpeHandshakeState::Idle);

        hs.start();
        assert_eq!(
            hs.on_events(FpeEvent::RX_VERIFY | FpeEvent::RX_RESPOND),
            FpeAction::SendRespond
        );
        assert!(hs.is_verified());
    }

    #[test]
    fn handshake_retries_then_times_out() {
        let mut hs = FpeHandshake::new(3);
        hs.start();

        assert_eq!(hs.on_verify_timeout(), FpeAction::SendVerify);
        assert_eq!(hs.on_verify_timeout(), FpeAction::SendVerify);
        assert_eq!(hs.attempts(), 3);
        assert_eq!(hs.on_verify_timeout(), FpeAction::None);
        assert_eq!(hs.state(), FpeHandshakeState::Timeout);

        // A late respond does not revive a timed-out round
        hs.on_events(FpeEvent::RX_RESPOND);
        assert_eq!(hs.state(), FpeHandshakeState::Timeout);

        assert_eq!(hs.start(), FpeAction::SendVerify);
        assert_eq!(hs.attempts(), 1);
    }

    #[test]
    fn handshake_timeout_outside_round_is_ignored() {
        let mut hs = FpeHandshake::new(0);
        assert_eq!(hs.on_verify_timeout(), FpeAction::None);

        hs.start();
        assert_eq!(hs.on_verify_timeout(), FpeAction::None);
        assert_eq!(hs.state(), FpeHandshakeState::Timeout);

        hs.reset();
        assert_eq!(hs.state(), FpeHandshakeState::Idle);
    }
}

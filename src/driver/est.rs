//! Enhanced Scheduled Traffic (802.1Qbv)
//!
//! The gate control list is reached indirectly: a row is staged in GCL_DATA,
//! an address/opcode word is written to GCL_CTRL with SRWO set, and the
//! hardware clears SRWO once the transfer has happened. The same window
//! reaches the gate-control-related registers (base time, cycle time, time
//! extension, list length) when GCRR is set.
//!
//! EST_CTRL carries both the schedule parameters and the SSWL swap request.
//! Writing any parameter while a swap is pending corrupts the swap, so every
//! parameter setter clears SSWL in the same read-modify-write.

use embedded_hal::delay::DelayNs;

use crate::hal::poll::{PollTiming, poll_until_cleared};
use crate::internal::bitfield::Field;
use crate::internal::constants::NSEC_PER_SEC;
use crate::internal::register::RegisterAccess;
use crate::internal::register::mtl::{
    EST_CTRL_CTOV, EST_CTRL_EEST, EST_CTRL_OFFSET, EST_CTRL_PTOV, EST_CTRL_SSWL, EST_CTRL_TILS,
    EST_GCL_CTRL_DBGB1, EST_GCL_CTRL_DBGM, EST_GCL_CTRL_GCRR, EST_GCL_CTRL_OFFSET,
    EST_GCL_CTRL_R1W0, EST_GCL_CTRL_SRWO, EST_GCL_DATA_OFFSET, EST_STATUS_OFFSET,
    EST_STATUS_SWOL, est_gcl_ctrl_addr, gcrr,
};

use super::discovery::{EstLimits, is_gcl_depth};
use super::error::{ConfigError, ConfigResult, Result};

// =============================================================================
// Gate Control Entries
// =============================================================================

/// One row of the gate control list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GateControlEntry {
    /// Open gates, one bit per TX queue
    pub gate_states: u32,
    /// Interval the row stays active, in nanoseconds
    pub time_interval: u32,
}

impl GateControlEntry {
    /// Create an entry
    #[must_use]
    pub const fn new(gate_states: u32, time_interval: u32) -> Self {
        Self {
            gate_states,
            time_interval,
        }
    }
}

/// Packs and unpacks GCL_DATA words for a discovered interval width and queue count
///
/// The time interval occupies the low `ti_width` bits; the gate bitmask sits
/// directly above it with one bit per TX queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GclCodec {
    interval: Field,
    gates: Field,
}

impl GclCodec {
    /// Build a codec for `ti_width` interval bits and `txqcnt` queues
    ///
    /// A zero interval width means EST cannot be used.
    pub const fn new(ti_width: u32, txqcnt: u32) -> ConfigResult<Self> {
        if ti_width == 0 {
            return Err(ConfigError::Unsupported);
        }
        if txqcnt == 0 || ti_width + txqcnt > 32 {
            return Err(ConfigError::InvalidParameter);
        }
        Ok(Self {
            interval: Field::new(0, ti_width),
            gates: Field::new(ti_width, txqcnt),
        })
    }

    /// Width of the time interval in bits
    pub const fn ti_width(&self) -> u32 {
        self.interval.width()
    }

    /// Number of gate bits
    pub const fn gate_count(&self) -> u32 {
        self.gates.width()
    }

    /// Pack an entry, discarding bits beyond either field
    pub const fn encode(&self, entry: &GateControlEntry) -> u32 {
        self.gates.encode(entry.gate_states) | self.interval.encode(entry.time_interval)
    }

    /// Pack an entry, rejecting values that would be truncated
    pub const fn try_encode(&self, entry: &GateControlEntry) -> ConfigResult<u32> {
        if !self.interval.fits(entry.time_interval) || !self.gates.fits(entry.gate_states) {
            return Err(ConfigError::InvalidParameter);
        }
        Ok(self.encode(entry))
    }

    /// Unpack a GCL_DATA word
    pub const fn decode(&self, data: u32) -> GateControlEntry {
        GateControlEntry {
            gate_states: self.gates.get(data),
            time_interval: self.interval.get(data),
        }
    }
}

// =============================================================================
// GCL Addressing
// =============================================================================

/// One of the two gate control list banks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GclBank {
    /// Bank 0
    Bank0,
    /// Bank 1
    Bank1,
}

impl GclBank {
    /// Bank selected by a one-bit register value
    pub const fn from_bit(bit: u32) -> Self {
        if bit & 1 == 0 {
            GclBank::Bank0
        } else {
            GclBank::Bank1
        }
    }

    /// The other bank
    pub const fn other(self) -> Self {
        match self {
            GclBank::Bank0 => GclBank::Bank1,
            GclBank::Bank1 => GclBank::Bank0,
        }
    }

    /// Bank index, 0 or 1
    pub const fn index(self) -> u32 {
        match self {
            GclBank::Bank0 => 0,
            GclBank::Bank1 => 1,
        }
    }
}

/// Gate-control-related rows, reached with GCRR set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GcrrRow {
    /// Base time, nanoseconds
    BaseTimeLow,
    /// Base time, seconds
    BaseTimeHigh,
    /// Cycle time, nanoseconds
    CycleTimeLow,
    /// Cycle time, seconds
    CycleTimeHigh,
    /// Time extension
    TimeExtension,
    /// List length
    ListLength,
}

impl GcrrRow {
    /// Row address inside the GCRR space
    pub const fn addr(self) -> u32 {
        match self {
            GcrrRow::BaseTimeLow => gcrr::BTR_LO,
            GcrrRow::BaseTimeHigh => gcrr::BTR_HI,
            GcrrRow::CycleTimeLow => gcrr::CTR_LO,
            GcrrRow::CycleTimeHigh => gcrr::CTR_HI,
            GcrrRow::TimeExtension => gcrr::TER,
            GcrrRow::ListLength => gcrr::LLR,
        }
    }
}

/// Target of one GCL window access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GclAccess {
    /// Row address
    pub addr: u32,
    /// Address the gate-control-related registers instead of the list
    pub gcrr: bool,
    /// Debug mode bank; `None` leaves the hardware to pick the software-owned bank
    pub debug_bank: Option<GclBank>,
}

impl GclAccess {
    /// A list row in the software-owned bank
    #[must_use]
    pub const fn row(addr: u32) -> Self {
        Self {
            addr,
            gcrr: false,
            debug_bank: None,
        }
    }

    /// A gate-control-related register
    #[must_use]
    pub const fn related(row: GcrrRow) -> Self {
        Self {
            addr: row.addr(),
            gcrr: true,
            debug_bank: None,
        }
    }

    /// Reach `bank` directly through debug mode
    #[must_use]
    pub const fn with_debug_bank(mut self, bank: GclBank) -> Self {
        self.debug_bank = Some(bank);
        self
    }
}

/// GCL window transfer direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GclOp {
    Read,
    Write,
}

/// Build the GCL_CTRL word for `access` on a list of `depth` rows
///
/// `depth` must satisfy [`is_gcl_depth`]; the address is masked to
/// `log2(depth)` bits starting at bit 8.
pub(crate) const fn gcl_ctrl_word(access: GclAccess, depth: u32, op: GclOp) -> u32 {
    let addr_field = est_gcl_ctrl_addr(depth.trailing_zeros());
    let mut ctrl = (access.addr << addr_field.shift()) & addr_field.mask();

    if let Some(bank) = access.debug_bank {
        ctrl |= EST_GCL_CTRL_DBGM;
        if let GclBank::Bank1 = bank {
            ctrl |= EST_GCL_CTRL_DBGB1;
        }
    }
    if access.gcrr {
        ctrl |= EST_GCL_CTRL_GCRR;
    }
    if let GclOp::Read = op {
        ctrl |= EST_GCL_CTRL_R1W0;
    }

    ctrl | EST_GCL_CTRL_SRWO
}

/// Start a GCL transfer and wait for SRWO to clear
fn gcl_transfer<R, D>(
    regs: &mut R,
    delay: &mut D,
    access: GclAccess,
    depth: u32,
    op: GclOp,
    timing: PollTiming,
) -> Result<()>
where
    R: RegisterAccess + ?Sized,
    D: DelayNs,
{
    regs.write(EST_GCL_CTRL_OFFSET, gcl_ctrl_word(access, depth, op));
    poll_until_cleared(&*regs, delay, EST_GCL_CTRL_OFFSET, EST_GCL_CTRL_SRWO, timing)?;
    Ok(())
}

// =============================================================================
// GCL Read/Write
// =============================================================================

/// Write `data` to the GCL row described by `access`
///
/// Fails with [`ConfigError::Unsupported`] before touching any register when
/// `depth` is not a GCL depth the hardware can report (0 included). A
/// handshake timeout is returned as is.
pub fn est_write_gcl_config<R, D>(
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
    if !is_gcl_depth(depth) {
        return Err(ConfigError::Unsupported.into());
    }

    regs.write(EST_GCL_DATA_OFFSET, data);
    gcl_transfer(regs, delay, access, depth, GclOp::Write, timing)
}

/// Read the GCL row described by `access`
pub fn est_read_gcl_config<R, D>(
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
    if !is_gcl_depth(depth) {
        return Err(ConfigError::Unsupported.into());
    }

    gcl_transfer(regs, delay, access, depth, GclOp::Read, timing)?;
    Ok(regs.read(EST_GCL_DATA_OFFSET))
}

/// Read and unpack one gate control entry
pub fn est_read_gce<R, D>(
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
    let data = est_read_gcl_config(regs, delay, access, depth, timing)?;
    Ok(codec.decode(data))
}

// =============================================================================
// Control State Machine
// =============================================================================

/// Replace `field` in EST_CTRL, dropping any pending SSWL
fn est_ctrl_update<R: RegisterAccess + ?Sized>(regs: &mut R, field: Field, value: u32) {
    regs.modify(EST_CTRL_OFFSET, |v| field.insert(v & !EST_CTRL_SSWL, value));
}

/// Set the time interval left shift
pub fn est_set_tils<R: RegisterAccess + ?Sized>(regs: &mut R, tils: u32) {
    est_ctrl_update(regs, EST_CTRL_TILS, tils);
}

/// Set the PTP time offset
pub fn est_set_ptov<R: RegisterAccess + ?Sized>(regs: &mut R, ptov: u32) {
    est_ctrl_update(regs, EST_CTRL_PTOV, ptov);
}

/// Set the current time offset
pub fn est_set_ctov<R: RegisterAccess + ?Sized>(regs: &mut R, ctov: u32) {
    est_ctrl_update(regs, EST_CTRL_CTOV, ctov);
}

/// Enable or disable the scheduler
pub fn est_set_enable<R: RegisterAccess + ?Sized>(regs: &mut R, enable: bool) {
    regs.modify(EST_CTRL_OFFSET, |v| {
        let v = v & !EST_CTRL_SSWL;
        if enable { v | EST_CTRL_EEST } else { v & !EST_CTRL_EEST }
    });
}

/// Whether the scheduler is enabled
pub fn est_get_enable<R: RegisterAccess + ?Sized>(regs: &R) -> bool {
    regs.read(EST_CTRL_OFFSET) & EST_CTRL_EEST != 0
}

/// Bank owned by software (`own == true`) or by hardware
pub fn est_get_bank<R: RegisterAccess + ?Sized>(regs: &R, own: bool) -> GclBank {
    let swol = GclBank::from_bit(EST_STATUS_SWOL.get(regs.read(EST_STATUS_OFFSET)));
    if own { swol } else { swol.other() }
}

/// Request a bank swap; completion is reported through SWLC
pub fn est_switch_swol<R: RegisterAccess + ?Sized>(regs: &mut R) {
    regs.set_bits(EST_CTRL_OFFSET, EST_CTRL_SSWL);
}

// =============================================================================
// Schedule Programming
// =============================================================================

/// Seconds and nanoseconds, as held by the BTR and CTR register pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EstTime {
    /// Seconds
    pub sec: u32,
    /// Nanoseconds, below one second
    pub nsec: u32,
}

impl EstTime {
    /// Create a time value
    #[must_use]
    pub const fn new(sec: u32, nsec: u32) -> Self {
        Self { sec, nsec }
    }
}

/// A complete gate schedule for the software-owned bank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EstSchedule<'a> {
    /// Gate control list rows, in order
    pub entries: &'a [GateControlEntry],
    /// Absolute start of the first cycle
    pub base_time: EstTime,
    /// Cycle length
    pub cycle_time: EstTime,
    /// Time extension applied to the last cycle before a swap
    pub time_extension: u32,
}

impl EstSchedule<'_> {
    /// Check the schedule against the discovered depth and the EST limits
    pub fn validate(&self, codec: &GclCodec, depth: u32, limits: &EstLimits) -> ConfigResult<()> {
        if !is_gcl_depth(depth) {
            return Err(ConfigError::Unsupported);
        }
        if self.entries.is_empty() || self.entries.len() > depth as usize {
            return Err(ConfigError::InvalidParameter);
        }
        if self.base_time.nsec >= NSEC_PER_SEC || self.cycle_time.nsec >= NSEC_PER_SEC {
            return Err(ConfigError::InvalidParameter);
        }
        limits.check_cycle_sec(self.cycle_time.sec)?;

        for entry in self.entries {
            codec.try_encode(entry)?;
        }
        Ok(())
    }
}

/// Load `schedule` into the software-owned bank and request a swap
///
/// Rows are written first, then base time, cycle time, time extension and
/// list length, and finally SSWL. The schedule is validated before the first
/// register write. A timeout leaves the bank partially written and no swap
/// requested.
pub fn est_program_schedule<R, D>(
    regs: &mut R,
    delay: &mut D,
    schedule: &EstSchedule<'_>,
    codec: &GclCodec,
    depth: u32,
    limits: &EstLimits,
    timing: PollTiming,
) -> Result<()>
where
    R: RegisterAccess + ?Sized,
    D: DelayNs,
{
    schedule.validate(codec, depth, limits)?;

    for (row, entry) in (0u32..).zip(schedule.entries) {
        est_write_gcl_config(regs, delay, codec.encode(entry), GclAccess::row(row), depth, timing)?;
    }

    let related = [
        (GcrrRow::BaseTimeLow, schedule.base_time.nsec),
        (GcrrRow::BaseTimeHigh, schedule.base_time.sec),
        (GcrrRow::CycleTimeLow, schedule.cycle_time.nsec),
        (GcrrRow::CycleTimeHigh, schedule.cycle_time.sec),
        (GcrrRow::TimeExtension, schedule.time_extension),
        (GcrrRow::ListLength, schedule.entries.len() as u32),
    ];
    for (row, value) in related {
        est_write_gcl_config(regs, delay, value, GclAccess::related(row), depth, timing)?;
    }

    est_switch_swol(regs);

    #[cfg(feature = "defmt")]
    defmt::debug!(
        "EST schedule loaded: {} rows, cycle {}s+{}ns",
        schedule.entries.len(),
        schedule.cycle_time.sec,
        schedule.cycle_time.nsec
    );

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

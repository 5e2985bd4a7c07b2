//! Time-Based Scheduling
//!
//! Launch time is configured per queue in MTL_TBS_CTRL; fetch time is
//! configured for the descriptor rings in DMA_TBS_CTRL. The fetch offsets may
//! only change while FTOV is clear, which [`FetchTimeUpdate`] enforces.

use core::marker::PhantomData;

use crate::internal::bitfield::Field;
use crate::internal::constants::{TBS_FGOS_MAX, TBS_FTOS_MAX, TBS_LEGOS_MAX, TBS_LEOS_MAX};
use crate::internal::register::RegisterAccess;
use crate::internal::register::dma::{
    TBS_CTRL_FGOS, TBS_CTRL_FTOS, TBS_CTRL_FTOV, TBS_CTRL_OFFSET as DMA_TBS_CTRL_OFFSET,
};
use crate::internal::register::mtl::{
    TBS_CTRL_ESTM, TBS_CTRL_LEGOS, TBS_CTRL_LEOS, TBS_CTRL_LEOV,
    TBS_CTRL_OFFSET as MTL_TBS_CTRL_OFFSET,
};

use super::discovery::check_max;
use super::error::ConfigResult;

/// Fixed TBS parameter limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TbsLimits {
    /// Maximum launch expiry offset
    pub leos_max: u32,
    /// Maximum launch expiry GSN offset
    pub legos_max: u32,
    /// Maximum fetch time offset
    pub ftos_max: u32,
    /// Maximum fetch GSN offset
    pub fgos_max: u32,
}

impl TbsLimits {
    /// Limits of the DWMAC 5.10 TBS block
    pub const DWMAC510: Self = Self {
        leos_max: TBS_LEOS_MAX,
        legos_max: TBS_LEGOS_MAX,
        ftos_max: TBS_FTOS_MAX,
        fgos_max: TBS_FGOS_MAX,
    };

    /// Check a launch expiry offset
    pub const fn check_leos(&self, leos: u32) -> ConfigResult<()> {
        check_max(leos, self.leos_max)
    }

    /// Check a launch expiry GSN offset
    pub const fn check_legos(&self, legos: u32) -> ConfigResult<()> {
        check_max(legos, self.legos_max)
    }

    /// Check a fetch time offset
    pub const fn check_ftos(&self, ftos: u32) -> ConfigResult<()> {
        check_max(ftos, self.ftos_max)
    }

    /// Check a fetch GSN offset
    pub const fn check_fgos(&self, fgos: u32) -> ConfigResult<()> {
        check_max(fgos, self.fgos_max)
    }
}

// =============================================================================
// Launch Time
// =============================================================================

/// Select whether launch time follows the EST schedule
pub fn tbs_set_estm<R: RegisterAccess + ?Sized>(regs: &mut R, estm: bool) {
    if estm {
        regs.set_bits(MTL_TBS_CTRL_OFFSET, TBS_CTRL_ESTM);
    } else {
        regs.clear_bits(MTL_TBS_CTRL_OFFSET, TBS_CTRL_ESTM);
    }
}

/// Set the launch expiry offset
///
/// `leos` is in nanoseconds with 256 ns granularity; the low 8 bits are
/// dropped. A zero offset marks launch expiry as not valid.
pub fn tbs_set_leos<R: RegisterAccess + ?Sized>(regs: &mut R, leos: u32, estm: bool) {
    let valid = leos != 0 || (estm && leos != 0);

    regs.modify(MTL_TBS_CTRL_OFFSET, |v| {
        let v = with_bit(v, TBS_CTRL_LEOV, valid);
        (v & !TBS_CTRL_LEOS.mask()) | (leos & TBS_CTRL_LEOS.mask())
    });
}

/// Set the launch expiry GSN slot offset
pub fn tbs_set_legos<R: RegisterAccess + ?Sized>(regs: &mut R, legos: u32, leos: u32) {
    let valid = leos != 0 || legos != 0;

    regs.modify(MTL_TBS_CTRL_OFFSET, |v| {
        TBS_CTRL_LEGOS.insert(with_bit(v, TBS_CTRL_LEOV, valid), legos)
    });
}

const fn with_bit(value: u32, bit: u32, set: bool) -> u32 {
    if set { value | bit } else { value & !bit }
}

// =============================================================================
// Fetch Time
// =============================================================================

/// FTOV has been cleared in hardware; fields may now change
#[derive(Debug)]
pub struct Invalid;

/// Fields are being staged
#[derive(Debug)]
pub struct Updating;

/// The staged value has been written back
#[derive(Debug)]
pub struct Valid;

/// Guarded update of DMA_TBS_CTRL
///
/// ```ignore
/// FetchTimeUpdate::invalidate(regs)
///     .update(TBS_CTRL_FTOS, ftos)
///     .commit(regs, ftos != 0);
/// ```
#[derive(Debug)]
pub struct FetchTimeUpdate<S> {
    value: u32,
    _state: PhantomData<S>,
}

impl<S> FetchTimeUpdate<S> {
    const fn with_value(value: u32) -> Self {
        Self {
            value,
            _state: PhantomData,
        }
    }

    /// Register value as staged or written
    pub const fn value(&self) -> u32 {
        self.value
    }
}

impl FetchTimeUpdate<Invalid> {
    /// Clear FTOV and write the register back
    pub fn invalidate<R: RegisterAccess + ?Sized>(regs: &mut R) -> Self {
        let value = regs.read(DMA_TBS_CTRL_OFFSET) & !TBS_CTRL_FTOV;
        regs.write(DMA_TBS_CTRL_OFFSET, value);
        Self::with_value(value)
    }

    /// Stage a new value for `field`
    #[must_use]
    pub const fn update(self, field: Field, value: u32) -> FetchTimeUpdate<Updating> {
        FetchTimeUpdate::with_value(field.insert(self.value, value))
    }
}

impl FetchTimeUpdate<Updating> {
    /// Stage a new value for another field
    #[must_use]
    pub const fn update(self, field: Field, value: u32) -> Self {
        Self::with_value(field.insert(self.value, value))
    }

    /// Write the staged value, setting FTOV when `valid`
    pub fn commit<R: RegisterAccess + ?Sized>(
        self,
        regs: &mut R,
        valid: bool,
    ) -> FetchTimeUpdate<Valid> {
        let value = with_bit(self.value, TBS_CTRL_FTOV, valid);
        regs.write(DMA_TBS_CTRL_OFFSET, value);
        FetchTimeUpdate::with_value(value)
    }
}

impl FetchTimeUpdate<Valid> {
    /// Whether FTOV was set on commit
    pub const fn is_valid(&self) -> bool {
        self.value & TBS_CTRL_FTOV != 0
    }
}

/// Set the fetch time offset
pub fn tbs_set_ftos<R: RegisterAccess + ?Sized>(regs: &mut R, ftos: u32, estm: bool, fgos: u32) {
    let valid = ftos != 0 || (estm && fgos != 0);

    FetchTimeUpdate::invalidate(regs)
        .update(TBS_CTRL_FTOS, ftos)
        .commit(regs, valid);
}

/// Set the fetch GSN slot offset
pub fn tbs_set_fgos<R: RegisterAccess + ?Sized>(regs: &mut R, fgos: u32, ftos: u32) {
    let valid = ftos != 0 || fgos != 0;

    FetchTimeUpdate::invalidate(regs)
        .update(TBS_CTRL_FGOS, fgos)
        .commit(regs, valid);
}

// =============================================================================
// Unit Tests
// =============================================================================

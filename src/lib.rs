//! DWMAC5 TSN Hardware Layer
//!
//! A `no_std`, `no_alloc` implementation of the Time-Sensitive Networking
//! blocks of the Synopsys DesignWare Ethernet QoS MAC, version 5.
//!
//! The crate sits below a MAC driver: it programs and decodes the hardware, it
//! does not compute schedules or talk to a network stack.
//!
//! # Architecture
//!
//! 1. **Register Layer** ([`RegisterAccess`], [`Mmio`]): 32-bit register window
//!    and the MAC, MTL, DMA and MMC register layout
//! 2. **Capability Table** ([`driver::hwif`]): [`TsnHwif`] implemented per
//!    hardware generation ([`Dwmac510`]), statically dispatched
//! 3. **Device** ([`TsnDevice`]): discovery results cached, arguments checked
//!    against hardware limits, statistics owned
//!
//! ## TSN Blocks
//!
//! - **EST** (IEEE 802.1Qbv): gate control list programming through the
//!   indirect GCL window, bank switching, status decoding
//! - **FPE** (IEEE 802.1Qbu / 802.3br): preemptable queue selection, mPacket
//!   verify/respond handshake, MMC fragment counters
//! - **TBS**: launch time and fetch time offsets
//!
//! # Features
//!
//! - `defmt`: Enable defmt logging and formatting
//! - `critical-section`: Enable the ISR-safe [`SharedTsn`] wrapper
//!
//! # Example
//!
//! ```ignore
//! use dwmac5_tsn::{GateControlEntry, Mmio, TsnConfig, TsnDevice, TsnFeature};
//!
//! let regs = unsafe { Mmio::new(ETH_BASE) };
//! let mut tsn = TsnDevice::initialize(regs, delay, TsnConfig::default());
//!
//! if tsn.has_tsn_cap(TsnFeature::Est) {
//!     tsn.est_write_gce(0, &GateControlEntry::new(0b0001, 500_000))?;
//!     tsn.est_write_gce(1, &GateControlEntry::new(0b1110, 500_000))?;
//!     tsn.est_switch_swol()?;
//!     tsn.est_set_enable(true)?;
//! }
//! ```

#![no_std]
#![deny(missing_docs)]
#![allow(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]
// Clippy lint levels live here; the full set mirrors [lints] in Cargo.toml.
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::inconsistent_struct_constructor,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::unnested_or_patterns,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::mod_module_files,
    clippy::self_named_module_files,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    clippy::type_complexity,
    clippy::must_use_candidate,
    clippy::assertions_on_constants,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_lossless,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::module_name_repetitions,
    clippy::wildcard_imports,
    clippy::items_after_statements
)]

// =============================================================================
// Modules
// =============================================================================

pub mod driver;
pub mod hal;

// Internal implementation details (pub(crate) only)
mod internal;

#[cfg(feature = "critical-section")]
#[cfg_attr(docsrs, doc(cfg(feature = "critical-section")))]
pub mod sync;

// Test utilities (only available during testing)
#[cfg(test)]
pub mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use driver::config::TsnConfig;
pub use driver::device::{TsnDevice, TsnIrqStatus};
pub use driver::discovery::{EstLimits, TsnCapabilities, TsnFeature};
pub use driver::error::{ConfigError, ConfigResult, Error, IoError, IoResult, Result};
pub use driver::est::{EstSchedule, EstTime, GateControlEntry, GclAccess, GclBank, GclCodec};
pub use driver::fpe::{FpeConfig, FpeEvent, FpeHandshakeState, FpeLimits, FpeMmcIrq, MPacketType};
pub use driver::hwif::{Dwmac510, TsnHwif};
pub use driver::status::{EstStatusReport, MMC_DESC, TsnStatIndex, TsnStats};
pub use driver::tbs::TbsLimits;
pub use hal::poll::PollTiming;
pub use internal::bitfield::Field;
pub use internal::register::{Mmio, RegisterAccess};

/// Low-level register layout for advanced use.
///
/// These are intentionally separated from the primary facade. Most users should
/// go through [`TsnDevice`] instead of touching registers directly.
///
/// # Safety
///
/// Direct register access bypasses driver invariants, in particular the
/// SSWL handling in MTL_EST_CTRL and the GCL handshake. Use only if you accept
/// responsibility for correct sequencing and synchronization.
pub mod unsafe_registers {
    pub use crate::internal::constants;
    pub use crate::internal::register::{dma, mac, mmc, mtl};
}

// Re-export sync types when critical-section is enabled
#[cfg(feature = "critical-section")]
pub use sync::{CriticalSectionCell, SharedTsn};

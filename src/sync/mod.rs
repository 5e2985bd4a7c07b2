//! Synchronization Support
//!
//! Interrupt-context status decoding and control-path configuration touch the
//! same registers and the same statistics vector, so they must share one
//! exclusion mechanism. This module provides it:
//!
//! - **Primitives** (`primitives`): [`CriticalSectionCell`] - ISR-safe interior mutability
//! - **Shared Wrapper** (`shared`): [`SharedTsn`] - critical-section protected [`TsnDevice`]
//!
//! Requires the `critical-section` feature; the implementation comes from the
//! HAL crate.
//!
//! [`TsnDevice`]: crate::driver::device::TsnDevice
//!
//! # Example
//!
//! ```ignore
//! use dwmac5_tsn::sync::SharedTsn;
//!
//! static TSN: SharedTsn<Mmio, Delay> = SharedTsn::new();
//!
//! fn main() {
//!     TSN.install(TsnDevice::initialize(regs, delay, TsnConfig::default()));
//!     TSN.with(|tsn| tsn.est_set_enable(true));
//! }
//!
//! #[interrupt]
//! fn ETH_IRQ() {
//!     TSN.with(|tsn| tsn.handle_interrupt());
//! }
//! ```

mod primitives;
mod shared;

pub use primitives::CriticalSectionCell;
pub use shared::SharedTsn;

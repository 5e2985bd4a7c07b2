//! TSN driver components for the DWMAC5 controller.
//!
//! - [`discovery`] - Capability probing and per-feature setup
//! - [`est`] - Enhanced Scheduled Traffic: GCL programming and bank switch
//! - [`status`] - EST interrupt decoding and the statistics vector
//! - [`fpe`] - Frame Preemption: mPacket handshake and MMC counters
//! - [`tbs`] - Time Based Scheduling: launch and fetch time offsets
//! - [`hwif`] - Capability table binding the above to one hardware generation
//! - [`device`] - [`TsnDevice`], the validated front end over a table
//! - [`config`] - Driver configuration
//! - [`error`] - Error types and result aliases
//!
//! # Example
//!
//! ```ignore
//! use dwmac5_tsn::driver::{TsnConfig, TsnDevice, TsnFeature};
//!
//! let tsn = TsnDevice::initialize(regs, delay, TsnConfig::default());
//! if tsn.has_tsn_cap(TsnFeature::Est) {
//!     // program a schedule
//! }
//! ```

// Submodules
pub mod config;
pub mod device;
pub mod discovery;
pub mod error;
pub mod est;
pub mod fpe;
pub mod hwif;
pub mod status;
pub mod tbs;

// Re-exports for convenience
pub use config::TsnConfig;
pub use device::{TsnDevice, TsnIrqStatus};
pub use discovery::{EstLimits, TsnCapabilities, TsnFeature};
pub use error::{ConfigError, ConfigResult, Error, IoError, IoResult, Result};
pub use est::{EstSchedule, EstTime, GateControlEntry, GclAccess, GclBank, GclCodec, GcrrRow};
pub use fpe::{
    FpeAction, FpeConfig, FpeEvent, FpeHandshake, FpeHandshakeState, FpeLimits, FpeMmcIrq,
    MPacketType,
};
pub use hwif::{Dwmac510, TsnHwif};
pub use status::{
    EstIrqFlags, EstStatusReport, HlbfInfo, MMC_DESC, MmcDesc, TsnStatIndex, TsnStats,
};
pub use tbs::{FetchTimeUpdate, TbsLimits};

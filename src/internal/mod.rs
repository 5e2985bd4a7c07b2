//! Internal Implementation Details
//!
//! This module contains implementation details that are not part of the public API.
//! Types in this module may change without notice between minor versions.
//!
//! # Contents
//!
//! - [`register`]: Register window trait, MMIO implementation and TSN register layout
//! - [`constants`]: Timing defaults and hardware-defined limits
//! - [`bitfield`]: Typed bit-range accessors shared by encode and decode paths
//!
//! # Stability
//!
//! **WARNING:** Only the items re-exported from the crate root are stable.

pub(crate) mod bitfield;
pub mod constants;
pub(crate) mod register;

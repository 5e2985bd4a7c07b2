//! Hardware Abstraction Layer
//!
//! Helpers shared by the register sequences that are not tied to one TSN
//! block.
//!
//! # Delay Integration
//!
//! Everything that waits on hardware takes `embedded_hal::delay::DelayNs`
//! directly. Pass any delay implementation from your HAL.

pub mod poll;

pub use poll::{PollTiming, poll_until_cleared};

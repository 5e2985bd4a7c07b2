//! ISR-safe TSN device wrapper using critical sections.

use super::primitives::CriticalSectionCell;
use crate::driver::device::TsnDevice;
use crate::driver::hwif::Dwmac510;

/// ISR-safe slot for a [`TsnDevice`].
///
/// The device is built at runtime (it needs the register window and delay),
/// so the slot starts empty and is filled with [`install`](Self::install).
/// All access goes through `critical_section::with()`, disabling interrupts
/// for the duration of the closure.
///
/// # Example
///
/// ```ignore
/// static TSN: SharedTsn<Mmio, Delay> = SharedTsn::new();
///
/// TSN.install(TsnDevice::initialize(regs, delay, TsnConfig::default()));
///
/// #[interrupt]
/// fn ETH_IRQ() {
///     TSN.with(|tsn| tsn.handle_interrupt());
/// }
/// ```
pub struct SharedTsn<R, D, H = Dwmac510> {
    inner: CriticalSectionCell<Option<TsnDevice<R, D, H>>>,
}

impl<R, D, H> SharedTsn<R, D, H> {
    /// Create an empty slot (const, suitable for static initialization).
    pub const fn new() -> Self {
        Self {
            inner: CriticalSectionCell::new(None),
        }
    }

    /// Place `device` in the slot, returning the one it replaces.
    pub fn install(&self, device: TsnDevice<R, D, H>) -> Option<TsnDevice<R, D, H>> {
        self.inner.replace(Some(device))
    }

    /// Remove the device, leaving the slot empty.
    pub fn take(&self) -> Option<TsnDevice<R, D, H>> {
        self.inner.replace(None)
    }

    /// Whether a device is installed.
    pub fn is_installed(&self) -> bool {
        self.inner.with(|slot| slot.is_some())
    }

    /// Execute a closure with exclusive access to the device.
    ///
    /// Returns `None` when no device is installed.
    #[inline]
    pub fn with<T, F>(&self, f: F) -> Option<T>
    where
        F: FnOnce(&mut TsnDevice<R, D, H>) -> T,
    {
        self.inner.with(|slot| slot.as_mut().map(f))
    }

    /// Try to execute a closure, returning `None` if the device is missing or
    /// already borrowed.
    #[inline]
    pub fn try_with<T, F>(&self, f: F) -> Option<T>
    where
        F: FnOnce(&mut TsnDevice<R, D, H>) -> T,
    {
        self.inner.try_with(|slot| slot.as_mut().map(f)).flatten()
    }
}

impl<R, D, H> Default for SharedTsn<R, D, H> {
    fn default() -> Self {
        Self::new()
    }
}

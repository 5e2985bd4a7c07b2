//! Error types for the DWMAC5 TSN layer
//!
//! Errors are organized by domain:
//! - [`ConfigError`]: capability and parameter problems detected before any
//!   register is touched
//! - [`IoError`]: hardware handshake failures
//!
//! The unified [`Error`] enum wraps both and is returned by operations that
//! can fail either way (GCL access, schedule programming).

// =============================================================================
// Configuration Errors
// =============================================================================

/// Capability and parameter errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Feature absent or reported with a zero size (GCL depth, interval width)
    Unsupported,
    /// Value exceeds a hardware-reported maximum or a discovered size
    InvalidParameter,
    /// Queue index beyond the discovered TX queue count
    InvalidQueue,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ConfigError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConfigError::Unsupported => "feature not supported by hardware",
            ConfigError::InvalidParameter => "parameter exceeds hardware limit",
            ConfigError::InvalidQueue => "invalid queue index",
        }
    }
}

// =============================================================================
// I/O Errors
// =============================================================================

/// Hardware handshake errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IoError {
    /// A self-clearing handshake bit did not clear within the poll bound
    Timeout,
}

impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl IoError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            IoError::Timeout => "operation timed out",
        }
    }
}

// =============================================================================
// Unified Error Type
// =============================================================================

/// This enum wraps all domain-specific errors for unified error handling.
///
/// ```ignore
/// match device.est_write_gce(row, entry) {
///     Err(Error::Io(IoError::Timeout)) => { /* re-read GCL_CTRL before retrying */ }
///     Err(Error::Config(ConfigError::Unsupported)) => { /* no EST on this part */ }
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Configuration error
    Config(ConfigError),
    /// I/O error
    Io(IoError),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Config(e) => write!(f, "config: {}", e.as_str()),
            Error::Io(e) => write!(f, "io: {}", e.as_str()),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<IoError> for Error {
    fn from(e: IoError) -> Self {
        Error::Io(e)
    }
}

/// Result type alias for TSN operations
pub type Result<T> = core::result::Result<T, Error>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = core::result::Result<T, ConfigError>;

/// Result type alias for I/O operations
pub type IoResult<T> = core::result::Result<T, IoError>;

// =============================================================================
// Unit Tests
// =============================================================================

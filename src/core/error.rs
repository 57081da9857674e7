//! Host-facing error type.
//!
//! Per §7, nothing a guest can trigger is ever surfaced as a `Result`
//! failure — guest-caused conditions are logged and the affected component
//! degrades gracefully in place. `EmulatorError` only covers host-side
//! initialization failures, which abort before any component runs.

use std::error;
use std::fmt;

/// Errors that can occur while constructing an [`crate::core::emulator::Emulator`].
#[derive(Debug)]
pub enum EmulatorError {
    /// The supplied ROM image does not fit in the configured cartridge
    /// window.
    RomTooLarge { len: usize, max: usize },
    /// `Config` contains a combination of fields the crate cannot honor
    /// (e.g. an unrecognized color RAM mode).
    InvalidConfig(String),
    /// The host did not provide an audio sink and none is available.
    HostAudioUnavailable,
}

impl error::Error for EmulatorError {}

impl fmt::Display for EmulatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmulatorError::RomTooLarge { len, max } => {
                write!(f, "ROM image of {len} bytes exceeds the {max}-byte cartridge window")
            }
            EmulatorError::InvalidConfig(reason) => write!(f, "invalid configuration: {reason}"),
            EmulatorError::HostAudioUnavailable => {
                write!(f, "no host audio sink available for SCSP output")
            }
        }
    }
}

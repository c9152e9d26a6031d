//! Output driver enumeration
//!
//! Thin wrapper over cpal's device list. Enumeration is best-effort: hosts
//! without audio hardware (CI, headless servers) get an empty list, and the
//! deviceless output types never consult it.

use cpal::traits::{DeviceTrait, HostTrait};

/// One enumerable output driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverInfo {
    /// Driver name as reported by the platform backend
    pub name: String,
    /// Whether this is the platform default output
    pub is_default: bool,
}

/// Enumerate output drivers on the default host.
///
/// Any backend failure degrades to an empty list rather than an error;
/// callers fall back to driver index 0.
pub fn output_drivers() -> Vec<DriverInfo> {
    let host = cpal::default_host();
    let default_name = host
        .default_output_device()
        .and_then(|d| d.name().ok());

    let Ok(devices) = host.output_devices() else {
        return Vec::new();
    };

    let mut default_seen = false;
    devices
        .filter_map(|device| device.name().ok())
        .map(|name| {
            let is_default = !default_seen && default_name.as_deref() == Some(name.as_str());
            default_seen |= is_default;
            DriverInfo { name, is_default }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enumeration_does_not_panic() {
        // Headless machines report zero drivers; both outcomes are fine.
        let drivers = output_drivers();
        assert!(drivers.iter().filter(|d| d.is_default).count() <= 1);
    }
}

//! Core and advanced runtime settings
//!
//! All of these are applied by the facade before `initialize`; the runtime
//! rejects changes afterwards.

use aw_core::{OutputType, SpeakerMode};

/// Core mixer/output settings
#[derive(Debug, Clone)]
pub struct CoreSettings {
    /// Real (software-mixed) voice count
    pub software_channels: u32,
    /// DSP block length in samples
    pub dsp_buffer_length: u32,
    /// Number of DSP blocks buffered ahead
    pub dsp_buffer_count: u32,
    /// Mixer sample rate
    pub sample_rate: u32,
    /// Mixer speaker layout
    pub speaker_mode: SpeakerMode,
    /// Output backend
    pub output: OutputType,
    /// Selected output driver index
    pub driver_index: usize,
}

impl Default for CoreSettings {
    fn default() -> Self {
        Self {
            software_channels: 64,
            dsp_buffer_length: 1024,
            dsp_buffer_count: 4,
            sample_rate: 48000,
            speaker_mode: SpeakerMode::Stereo,
            output: OutputType::AutoDetect,
            driver_index: 0,
        }
    }
}

/// Advanced settings applied before `initialize`
#[derive(Debug, Clone, Default)]
pub struct AdvancedSettings {
    /// Studio update period in milliseconds (0 = every tick)
    pub studio_update_period_ms: u32,
    /// Bank encryption key, when banks are authored encrypted
    pub bank_key: Option<String>,
    /// Volume below which voices are virtualized
    pub vol0_virtual_level: f32,
    /// Live-update/profiler port
    pub live_update_port: u16,
}

/// Initialization flags
#[derive(Debug, Clone, Copy, Default)]
pub struct InitFlags {
    /// Allow live-update tool connections
    pub live_update: bool,
    /// Track per-object memory usage
    pub memory_tracking: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_defaults() {
        let settings = CoreSettings::default();

        assert_eq!(settings.software_channels, 64);
        assert_eq!(settings.sample_rate, 48000);
        assert_eq!(settings.speaker_mode, SpeakerMode::Stereo);
        assert_eq!(settings.output, OutputType::AutoDetect);
        assert_eq!(settings.driver_index, 0);
    }
}

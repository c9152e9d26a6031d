//! Output format, output backend, and debug level enumerations
//!
//! Each enum carries a fixed name table used to resolve configuration
//! strings. Resolution is total: unrecognized names return `None` and the
//! caller falls back to the documented default (Stereo / AutoDetect / None).

use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════════
// SPEAKER MODE
// ═══════════════════════════════════════════════════════════════════════════════

/// Speaker layout for the software mixer format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum SpeakerMode {
    #[default]
    Stereo = 0,
    FivePointOne = 1,
    SevenPointOne = 2,
    SevenPointOneFour = 3,
}

impl SpeakerMode {
    /// Resolve a configuration string. Spellings match the config file
    /// ("Stereo", "5.1", "7.1", "7.1.4").
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Stereo" => Some(Self::Stereo),
            "5.1" => Some(Self::FivePointOne),
            "7.1" => Some(Self::SevenPointOne),
            "7.1.4" => Some(Self::SevenPointOneFour),
            _ => None,
        }
    }

    /// Channel count of the layout
    #[inline]
    pub fn channels(self) -> u32 {
        match self {
            Self::Stereo => 2,
            Self::FivePointOne => 6,
            Self::SevenPointOne => 8,
            Self::SevenPointOneFour => 12,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// OUTPUT TYPE
// ═══════════════════════════════════════════════════════════════════════════════

/// Output backend selection
///
/// NoSound and WavWriter run the runtime without a physical device; the NRT
/// variants additionally decouple processing from real time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum OutputType {
    #[default]
    AutoDetect = 0,
    Unknown = 1,
    NoSound = 2,
    WavWriter = 3,
    NoSoundNrt = 4,
    WavWriterNrt = 5,
    Alsa = 6,
    PulseAudio = 7,
    Jack = 8,
    CoreAudio = 9,
    Wasapi = 10,
    Asio = 11,
}

impl OutputType {
    /// Resolve a configuration string
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "AutoDetect" => Some(Self::AutoDetect),
            "Unknown" => Some(Self::Unknown),
            "NoSound" => Some(Self::NoSound),
            "WavWriter" => Some(Self::WavWriter),
            "NoSoundNRT" => Some(Self::NoSoundNrt),
            "WavWriterNRT" => Some(Self::WavWriterNrt),
            "ALSA" => Some(Self::Alsa),
            "PulseAudio" => Some(Self::PulseAudio),
            "JACK" => Some(Self::Jack),
            "CoreAudio" => Some(Self::CoreAudio),
            "WASAPI" => Some(Self::Wasapi),
            "ASIO" => Some(Self::Asio),
            _ => None,
        }
    }

    /// Whether this backend writes to a file instead of a device
    #[inline]
    pub fn is_wav_writer(self) -> bool {
        matches!(self, Self::WavWriter | Self::WavWriterNrt)
    }

    /// Whether this backend opens no physical device at all
    #[inline]
    pub fn is_deviceless(self) -> bool {
        matches!(
            self,
            Self::NoSound | Self::NoSoundNrt | Self::WavWriter | Self::WavWriterNrt
        )
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DEBUG LEVEL
// ═══════════════════════════════════════════════════════════════════════════════

/// Runtime debug-logging threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum DebugLevel {
    #[default]
    None = 0,
    Error = 1,
    Warning = 2,
    Log = 3,
}

impl DebugLevel {
    /// Resolve a configuration string
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "None" => Some(Self::None),
            "Log" => Some(Self::Log),
            "Warning" => Some(Self::Warning),
            "Error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Severity label used by the log sink
    pub fn label(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Log => "Log",
            Self::Warning => "Warning",
            Self::Error => "Error",
        }
    }
}

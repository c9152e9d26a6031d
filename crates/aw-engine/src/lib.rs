//! AudioWorks engine facade
//!
//! The host-facing crate of the AudioWorks middleware stack:
//!
//! - [`AudioConfig`] — the TOML configuration file driving bring-up
//! - [`AudioEngine`] — explicit engine context: initialization sequence,
//!   bank management, playback, mixing control
//!
//! The facade validates and forwards; the studio runtime (`aw-runtime`) owns
//! all state. Failures surface as `false`/`None` at this boundary, with
//! detail routed to the `log` facade via the notification sinks.
//!
//! ```no_run
//! use aw_engine::{AudioEngine, PlayEventParams};
//!
//! let engine = AudioEngine::new();
//! if engine.initialize("audio.toml") {
//!     engine.play_event("event:/SFX/Explosion", PlayEventParams::default());
//!     engine.update();
//! }
//! engine.terminate();
//! ```

pub mod config;
pub mod engine;
pub mod error;
mod sinks;

pub use config::AudioConfig;
pub use engine::{resolve_driver_index, AudioEngine, PlayEventParams, PLATFORM};
pub use error::{EngineError, EngineResult};

// Handle and parameter types hosts need at the call site
pub use aw_core::{Attributes3d, BankId, BusId, InstanceId, PluginHandle, VcaId};
pub use aw_runtime::{CallbackInfo, CallbackMask, CallbackType, EventCallback, UserData};

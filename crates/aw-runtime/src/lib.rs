//! AudioWorks Studio Runtime
//!
//! Control-plane runtime behind the AudioWorks facade:
//! - Bank loading (JSON manifests registering events, buses, VCAs, parameters)
//! - Event descriptions and per-instance playback state
//! - Bus/VCA mixing control and global parameter automation
//! - Native plugin loading
//! - Lock-free notification queue toward the host
//!
//! ## Architecture
//!
//! ```text
//! Host Thread                          Studio Runtime
//! ───────────                          ──────────────
//! StudioSystem::create()       ──────▶ SystemInner (registries, settings)
//! set_* / initialize()                      │
//! load_bank_file()                          │ registers events/buses/VCAs
//! create_instance() / start()               │
//! update()  (once per frame)   ──────▶ advance instances, fire callbacks
//!      ▲                                    │
//!      └──── drain_notifications() ◀── SPSC ring (PreUpdate, ApiError, ...)
//! ```
//!
//! The runtime never spawns threads and never performs I/O from a foreign
//! context: instance callbacks and notifications are delivered during the
//! host-driven `update()` tick.

pub mod bank;
pub mod driver;
pub mod instance;
pub mod notification;
pub mod plugin;
pub mod settings;
pub mod system;

// Re-exports
pub use bank::{BankManifest, BusDefinition, EventDefinition, ParameterDefinition, VcaDefinition};
pub use driver::{output_drivers, DriverInfo};
pub use instance::{
    CallbackInfo, CallbackMask, CallbackType, EventCallback, PlaybackState, StopMode, UserData,
};
pub use notification::SystemNotification;
pub use settings::{AdvancedSettings, CoreSettings, InitFlags};
pub use system::StudioSystem;

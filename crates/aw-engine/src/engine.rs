//! AudioWorks engine facade
//!
//! Host-facing surface over the studio runtime. The engine is an explicit
//! context the host constructs and owns; every operation validates, forwards
//! to the runtime, and collapses failure to `false`/`None`. Diagnostics flow
//! through the notification sinks, not through return values.

use crate::config::AudioConfig;
use crate::error::EngineResult;
use crate::sinks;
use aw_core::{
    Attributes3d, BankId, BusId, DebugLevel, InstanceId, OutputType, PluginHandle, SpeakerMode,
    VcaId,
};
use aw_runtime::{
    output_drivers, AdvancedSettings, CallbackMask, DriverInfo, EventCallback, InitFlags,
    StopMode, StudioSystem, UserData,
};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

/// Platform directory under the bank output directory
pub const PLATFORM: &str = "Desktop";

const DEFAULT_MAX_CHANNELS: i64 = 128;
const DEFAULT_REAL_CHANNELS: i64 = 64;
const DEFAULT_STUDIO_UPDATE_PERIOD_MS: i64 = 20;
const DEFAULT_LIVE_UPDATE_PORT: i64 = 9264;

/// Resolve a configured driver name against the enumerated driver list.
///
/// First case-sensitive exact match wins; an empty name or no match falls
/// back to driver 0 (the system default).
pub fn resolve_driver_index(drivers: &[DriverInfo], name: &str) -> usize {
    if name.is_empty() {
        return 0;
    }
    drivers
        .iter()
        .position(|d| d.name == name)
        .unwrap_or(0)
}

// ═══════════════════════════════════════════════════════════════════════════════
// PLAY PARAMETERS
// ═══════════════════════════════════════════════════════════════════════════════

/// Options for `play_event`.
///
/// The defaults describe fire-and-forget playback: start immediately and
/// hand ownership to the runtime, in which case `play_event` returns `None`.
#[derive(Clone)]
pub struct PlayEventParams {
    pub attributes: Attributes3d,
    pub user_data: Option<UserData>,
    pub callback: Option<EventCallback>,
    pub callback_mask: CallbackMask,
    pub auto_start: bool,
    pub auto_release: bool,
}

impl Default for PlayEventParams {
    fn default() -> Self {
        Self {
            attributes: Attributes3d::default(),
            user_data: None,
            callback: None,
            callback_mask: CallbackMask::ALL,
            auto_start: true,
            auto_release: true,
        }
    }
}

impl PlayEventParams {
    /// Keep the instance handle: no auto start, no auto release
    pub fn held() -> Self {
        Self {
            auto_start: false,
            auto_release: false,
            ..Default::default()
        }
    }

    pub fn with_attributes(mut self, attributes: Attributes3d) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_callback(mut self, callback: EventCallback, mask: CallbackMask) -> Self {
        self.callback = Some(callback);
        self.callback_mask = mask;
        self
    }

    pub fn with_user_data(mut self, data: UserData) -> Self {
        self.user_data = Some(data);
        self
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ENGINE
// ═══════════════════════════════════════════════════════════════════════════════

/// The audio engine context
pub struct AudioEngine {
    system: RwLock<Option<StudioSystem>>,
    /// Master bank and master strings bank both loaded
    main_banks_loaded: AtomicBool,
    /// Prefix for relative bank loads
    bank_root: RwLock<String>,
    /// Successfully loaded plugins by configured name
    plugin_handles: RwLock<HashMap<String, PluginHandle>>,
}

impl Default for AudioEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioEngine {
    /// Empty context; nothing is created until `initialize`
    pub fn new() -> Self {
        Self {
            system: RwLock::new(None),
            main_banks_loaded: AtomicBool::new(false),
            bank_root: RwLock::new(String::new()),
            plugin_handles: RwLock::new(HashMap::new()),
        }
    }

    /// Fully ready: system present, valid, and both master banks loaded
    pub fn is_initialized(&self) -> bool {
        let valid = self
            .system
            .read()
            .as_ref()
            .is_some_and(|s| s.is_valid());
        valid && self.main_banks_loaded.load(Ordering::Acquire)
    }

    /// Valid system, whether or not bring-up has finished. Bank loads use
    /// this gate because the initialization sequence itself loads the master
    /// banks.
    fn valid_system(&self) -> Option<StudioSystem> {
        self.system
            .read()
            .as_ref()
            .filter(|s| s.is_valid())
            .cloned()
    }

    fn ready_system(&self) -> Option<StudioSystem> {
        if self.main_banks_loaded.load(Ordering::Acquire) {
            self.valid_system()
        } else {
            None
        }
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ───────────────────────────────────────────────────────────────────────────

    /// Bring the engine up from a config file. Idempotent: returns true
    /// immediately when already initialized. On any failure the engine logs
    /// the cause and returns false.
    pub fn initialize(&self, config_path: impl AsRef<Path>) -> bool {
        if self.is_initialized() {
            return true;
        }
        if let Err(e) = self.try_initialize(config_path.as_ref()) {
            log::error!("Audio engine initialization failed: {e}");
        }
        self.is_initialized()
    }

    fn try_initialize(&self, config_path: &Path) -> EngineResult<()> {
        // Replace any half-initialized system from a previous attempt.
        let system = StudioSystem::create();
        {
            let mut guard = self.system.write();
            if let Some(old) = guard.take() {
                if old.is_valid() {
                    let _ = old.release();
                }
            }
            *guard = Some(system.clone());
        }
        self.main_banks_loaded.store(false, Ordering::Release);

        let config = AudioConfig::load(config_path)?;

        // Fixed-table resolution with documented fallbacks.
        let speaker_mode = SpeakerMode::from_name(&config.get_string_or(
            "System",
            "OutputFormat",
            "",
        ))
        .unwrap_or_default();
        let output_type =
            OutputType::from_name(&config.get_string_or("System", "OutputType", ""))
                .unwrap_or_default();
        let logging_level =
            DebugLevel::from_name(&config.get_string_or("System", "LoggingLevel", ""))
                .unwrap_or_default();

        // Driver selection by name; empty name skips enumeration entirely.
        let driver_name = config.get_string_or("System", "InitialOutputDriverName", "");
        let driver_index = if driver_name.is_empty() {
            0
        } else {
            resolve_driver_index(&output_drivers(), &driver_name)
        };

        let sample_rate = config.require_int("System", "SampleRate")? as u32;
        let dsp_length = config.require_int("System", "DSPBufferLength")? as u32;
        let dsp_count = config.require_int("System", "DSPBufferCount")? as u32;
        let real_channels =
            config.get_int_or("Advanced", "RealChannelCount", DEFAULT_REAL_CHANNELS) as u32;

        system.set_software_channels(real_channels)?;
        system.set_dsp_buffer_size(dsp_length, dsp_count)?;
        system.set_software_format(sample_rate, speaker_mode)?;
        system.set_output(output_type)?;
        system.set_driver(driver_index)?;

        let wav_path = if output_type.is_wav_writer() {
            config.get_string("System", "WavWriterPath")
        } else {
            None
        };

        // Development facilities only exist in debug builds.
        let flags = InitFlags {
            live_update: cfg!(debug_assertions)
                && config.get_bool_or("System", "EnableLiveUpdate", false),
            memory_tracking: cfg!(debug_assertions)
                && config.get_bool_or("System", "EnableMemoryTracking", false),
        };
        if cfg!(debug_assertions) {
            system.set_debug_level(logging_level);
        }
        system
            .set_error_notifications(config.get_bool_or("System", "EnableAPIErrorLogging", false));

        system.set_advanced_settings(AdvancedSettings {
            studio_update_period_ms: config.get_int_or(
                "Advanced",
                "StudioUpdatePeriodMs",
                DEFAULT_STUDIO_UPDATE_PERIOD_MS,
            ) as u32,
            bank_key: config.get_string("Advanced", "StudioBankKey"),
            vol0_virtual_level: config.get_float_or("Advanced", "Vol0VirtualLevel", 0.0) as f32,
            live_update_port: config.get_int_or(
                "Advanced",
                "LiveUpdatePort",
                DEFAULT_LIVE_UPDATE_PORT,
            ) as u16,
        })?;

        let max_channels =
            config.get_int_or("System", "MaxChannelCount", DEFAULT_MAX_CHANNELS) as u32;
        system.initialize(max_channels, flags, wav_path.as_deref())?;

        // Plugins load best-effort; a missing plugin is not fatal.
        if let Some(root) = config.get_string("Plugins", "AdditionalPluginsRootPath") {
            system.set_plugin_path(root);
        }
        for name in config.get_string_array("Plugins", "AdditionalPlugins") {
            match system.load_plugin(&name) {
                Ok(handle) => {
                    self.plugin_handles.write().insert(name, handle);
                }
                Err(e) => log::warn!("Skipping plugin '{name}': {e}"),
            }
        }

        let bank_dir = config.require_string("Banks", "BankOutputDirectory")?;
        *self.bank_root.write() = format!("{bank_dir}/{PLATFORM}/");

        let master = config.require_string("Banks", "MasterBank")?;
        let strings = config.require_string("Banks", "MasterStringsBank")?;
        let master_ok = self.load_sound_bank(&master);
        let strings_ok = self.load_sound_bank(&strings);
        self.main_banks_loaded
            .store(master_ok && strings_ok, Ordering::Release);

        Ok(())
    }

    /// Release the system and forget it. Safe to call at any time.
    pub fn terminate(&self) {
        if let Some(system) = self.system.write().take() {
            if system.is_valid() {
                let _ = system.release();
            }
        }
        self.main_banks_loaded.store(false, Ordering::Release);
        self.plugin_handles.write().clear();
        self.bank_root.write().clear();
    }

    /// One host tick: forward to the runtime, then drain its notification
    /// queue into the log sinks. No-op unless initialized.
    pub fn update(&self) {
        let Some(system) = self.ready_system() else {
            return;
        };
        let _ = system.update();
        for notification in system.drain_notifications() {
            sinks::dispatch(&notification);
        }
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Banks
    // ───────────────────────────────────────────────────────────────────────────

    /// Prefix for subsequent relative bank loads. Not retroactive.
    pub fn set_sound_bank_root_directory(&self, dir: &str) {
        *self.bank_root.write() = dir.to_string();
    }

    /// Load a bank by path relative to the root directory. The root and the
    /// relative path are concatenated exactly once, with no normalization.
    pub fn load_sound_bank(&self, relative_path: &str) -> bool {
        self.load_sound_bank_handle(relative_path).is_some()
    }

    /// As `load_sound_bank`, returning the bank handle
    pub fn load_sound_bank_handle(&self, relative_path: &str) -> Option<BankId> {
        let system = self.valid_system()?;
        let full_path = format!("{}{relative_path}", self.bank_root.read());
        system.load_bank_file(&full_path).ok()
    }

    /// Unload a bank by studio path (`bank:/<name>`)
    pub fn unload_sound_bank(&self, studio_path: &str) -> bool {
        let Some(system) = self.valid_system() else {
            return false;
        };
        system
            .bank(studio_path)
            .and_then(|id| system.unload_bank(id))
            .is_ok()
    }

    /// Unload a bank by handle
    pub fn unload_sound_bank_handle(&self, bank: BankId) -> bool {
        self.valid_system()
            .map(|system| system.unload_bank(bank).is_ok())
            .unwrap_or(false)
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Playback
    // ───────────────────────────────────────────────────────────────────────────

    /// Play an event by studio path.
    ///
    /// Returns the instance handle, or `None` when the engine is not ready,
    /// any step fails, or the instance was auto-released. Auto-release only
    /// applies right after an auto start: the runtime then owns the instance
    /// until it stops, and there is no handle to misuse. Without auto start
    /// the caller keeps the handle, auto-release or not.
    pub fn play_event(&self, event_path: &str, params: PlayEventParams) -> Option<InstanceId> {
        let system = self.ready_system()?;
        let event = system.event_description(event_path).ok()?;
        let id = system.create_instance(event).ok()?;

        system.set_instance_attributes(id, params.attributes).ok()?;
        if let Some(callback) = params.callback {
            system
                .set_instance_callback(id, callback, params.callback_mask)
                .ok()?;
        }
        if let Some(data) = params.user_data {
            system.set_instance_user_data(id, data).ok()?;
        }
        if params.auto_start {
            system.start_instance(id).ok()?;
            if params.auto_release {
                system.release_instance(id).ok()?;
                return None;
            }
        }
        Some(id)
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Instances
    // ───────────────────────────────────────────────────────────────────────────

    pub fn instance_start(&self, id: InstanceId) -> bool {
        self.ready_system()
            .map(|s| s.start_instance(id).is_ok())
            .unwrap_or(false)
    }

    pub fn instance_stop(&self, id: InstanceId, allow_fadeout: bool) -> bool {
        self.ready_system()
            .map(|s| s.stop_instance(id, stop_mode(allow_fadeout)).is_ok())
            .unwrap_or(false)
    }

    pub fn instance_release(&self, id: InstanceId) -> bool {
        self.ready_system()
            .map(|s| s.release_instance(id).is_ok())
            .unwrap_or(false)
    }

    pub fn instance_set_paused(&self, id: InstanceId, paused: bool) -> bool {
        self.ready_system()
            .map(|s| s.set_instance_paused(id, paused).is_ok())
            .unwrap_or(false)
    }

    pub fn instance_is_paused(&self, id: InstanceId) -> Option<bool> {
        self.ready_system()?.instance_paused(id).ok()
    }

    pub fn instance_set_3d_attributes(&self, id: InstanceId, attributes: Attributes3d) -> bool {
        self.ready_system()
            .map(|s| s.set_instance_attributes(id, attributes).is_ok())
            .unwrap_or(false)
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Parameters
    // ───────────────────────────────────────────────────────────────────────────

    pub fn set_global_parameter(&self, name: &str, value: f32) -> bool {
        self.ready_system()
            .map(|s| s.set_parameter_by_name(name, value, false).is_ok())
            .unwrap_or(false)
    }

    pub fn set_global_parameter_with_label(&self, name: &str, label: &str) -> bool {
        self.ready_system()
            .map(|s| {
                s.set_parameter_by_name_with_label(name, label, false)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    pub fn get_global_parameter(&self, name: &str) -> Option<f32> {
        self.ready_system()?.parameter_by_name(name).ok()
    }

    /// Per-instance parameter
    pub fn set_parameter(&self, id: InstanceId, name: &str, value: f32) -> bool {
        self.ready_system()
            .map(|s| s.set_instance_parameter(id, name, value).is_ok())
            .unwrap_or(false)
    }

    pub fn set_parameter_with_label(&self, id: InstanceId, name: &str, label: &str) -> bool {
        self.ready_system()
            .map(|s| s.set_instance_parameter_with_label(id, name, label).is_ok())
            .unwrap_or(false)
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Buses and VCAs
    // ───────────────────────────────────────────────────────────────────────────

    pub fn get_bus(&self, path: &str) -> Option<BusId> {
        self.ready_system()?.bus(path).ok()
    }

    pub fn bus_set_volume(&self, bus: BusId, volume: f32) -> bool {
        self.ready_system()
            .map(|s| s.set_bus_volume(bus, volume).is_ok())
            .unwrap_or(false)
    }

    pub fn bus_volume(&self, bus: BusId) -> Option<f32> {
        self.bus_volume_with_final(bus).map(|(volume, _)| volume)
    }

    /// `(set, final)` where final folds in mute and the controlling VCA
    pub fn bus_volume_with_final(&self, bus: BusId) -> Option<(f32, f32)> {
        self.ready_system()?.bus_volume(bus).ok()
    }

    pub fn bus_set_mute(&self, bus: BusId, muted: bool) -> bool {
        self.ready_system()
            .map(|s| s.set_bus_muted(bus, muted).is_ok())
            .unwrap_or(false)
    }

    pub fn bus_is_muted(&self, bus: BusId) -> Option<bool> {
        self.ready_system()?.bus_muted(bus).ok()
    }

    pub fn bus_set_paused(&self, bus: BusId, paused: bool) -> bool {
        self.ready_system()
            .map(|s| s.set_bus_paused(bus, paused).is_ok())
            .unwrap_or(false)
    }

    pub fn bus_is_paused(&self, bus: BusId) -> Option<bool> {
        self.ready_system()?.bus_paused(bus).ok()
    }

    pub fn bus_stop_all_events(&self, bus: BusId, allow_fadeout: bool) -> bool {
        self.ready_system()
            .map(|s| s.stop_bus_events(bus, stop_mode(allow_fadeout)).is_ok())
            .unwrap_or(false)
    }

    pub fn get_vca(&self, path: &str) -> Option<VcaId> {
        self.ready_system()?.vca(path).ok()
    }

    pub fn vca_volume(&self, vca: VcaId) -> Option<f32> {
        self.vca_volume_with_final(vca).map(|(volume, _)| volume)
    }

    pub fn vca_volume_with_final(&self, vca: VcaId) -> Option<(f32, f32)> {
        self.ready_system()?.vca_volume(vca).ok()
    }

    pub fn vca_set_volume(&self, vca: VcaId, volume: f32) -> bool {
        self.ready_system()
            .map(|s| s.set_vca_volume(vca, volume).is_ok())
            .unwrap_or(false)
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Plugins
    // ───────────────────────────────────────────────────────────────────────────

    /// Handle of a plugin loaded during initialization, by configured name
    pub fn plugin_handle(&self, name: &str) -> Option<PluginHandle> {
        self.plugin_handles.read().get(name).copied()
    }
}

impl Drop for AudioEngine {
    fn drop(&mut self) {
        self.terminate();
    }
}

#[inline]
fn stop_mode(allow_fadeout: bool) -> StopMode {
    if allow_fadeout {
        StopMode::AllowFadeOut
    } else {
        StopMode::Immediate
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn drivers(names: &[&str]) -> Vec<DriverInfo> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| DriverInfo {
                name: name.to_string(),
                is_default: i == 0,
            })
            .collect()
    }

    #[test]
    fn test_resolve_driver_index_exact_match() {
        let list = drivers(&["Speakers", "Headphones", "HDMI"]);
        assert_eq!(resolve_driver_index(&list, "Headphones"), 1);
        assert_eq!(resolve_driver_index(&list, "Speakers"), 0);
    }

    #[test]
    fn test_resolve_driver_index_fallbacks() {
        let list = drivers(&["Speakers", "Headphones"]);
        // no match falls back to 0
        assert_eq!(resolve_driver_index(&list, "USB DAC"), 0);
        // case-sensitive
        assert_eq!(resolve_driver_index(&list, "headphones"), 0);
        // empty name skips the scan
        assert_eq!(resolve_driver_index(&list, ""), 0);
        // empty list
        assert_eq!(resolve_driver_index(&[], "Speakers"), 0);
    }

    #[test]
    fn test_play_params_defaults_are_fire_and_forget() {
        let params = PlayEventParams::default();
        assert!(params.auto_start);
        assert!(params.auto_release);
        assert!(params.callback.is_none());

        let held = PlayEventParams::held();
        assert!(!held.auto_start);
        assert!(!held.auto_release);
    }
}

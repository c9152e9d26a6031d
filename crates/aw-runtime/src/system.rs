//! Studio system
//!
//! The owning handle over every runtime registry. `StudioSystem` is a cheap
//! clone over an `Arc`; all methods take `&self` and synchronize internally,
//! so one system can be shared across host threads. Mutating calls are
//! expected from a single control thread; `update()` in particular must be
//! ticked by exactly one thread.
//!
//! Objects are addressed by studio path (`event:/...`, `bus:/...`) to resolve
//! a typed handle, and by that handle afterwards. A handle that no longer
//! resolves (bank unloaded, instance reaped, system released) fails with
//! `InvalidHandle`. Registries are small; handle lookups scan.

use crate::bank::{BankManifest, ParameterDefinition};
use crate::instance::{
    CallbackInfo, CallbackMask, EventCallback, InstanceRecord, PlaybackState, StopMode, UserData,
};
use crate::notification::{SystemNotification, NOTIFY_QUEUE_CAPACITY};
use crate::plugin::PluginRegistry;
use crate::settings::{AdvancedSettings, CoreSettings, InitFlags};
use aw_core::{
    generate_instance_id, generate_object_id, Attributes3d, BankId, BusId, DebugLevel, EventId,
    InstanceId, OutputType, PluginHandle, RuntimeError, RuntimeResult, SpeakerMode, VcaId,
};
use parking_lot::{Mutex, RwLock};
use rtrb::{Consumer, Producer, RingBuffer};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

// ═══════════════════════════════════════════════════════════════════════════════
// REGISTRY ENTRIES
// ═══════════════════════════════════════════════════════════════════════════════

struct LoadedBank {
    id: BankId,
    studio_path: String,
    file_path: String,
}

struct EventEntry {
    id: EventId,
    bank: BankId,
    bus: Option<String>,
}

struct BusState {
    id: BusId,
    bank: BankId,
    path: String,
    volume: f32,
    muted: bool,
    paused: bool,
    vca: Option<String>,
}

struct VcaState {
    id: VcaId,
    bank: BankId,
    volume: f32,
}

struct ParameterState {
    bank: BankId,
    def: ParameterDefinition,
    value: f32,
}

/// Master-strings table entry: id → studio path
struct StringEntry {
    bank: BankId,
    path: String,
}

// ═══════════════════════════════════════════════════════════════════════════════
// SYSTEM
// ═══════════════════════════════════════════════════════════════════════════════

struct SystemInner {
    /// Created and not yet released
    valid: AtomicBool,
    /// `initialize` completed
    initialized: AtomicBool,
    /// Update tick counter
    frame: AtomicU64,
    /// Total (virtual) channel budget, fixed at initialize
    max_channels: AtomicU32,

    settings: RwLock<CoreSettings>,
    advanced: RwLock<AdvancedSettings>,
    flags: RwLock<InitFlags>,
    /// Output file for the wav-writer backends
    wav_path: RwLock<Option<String>>,

    // Registries, keyed by studio path (events/buses/vcas) or name (parameters)
    banks: RwLock<HashMap<String, LoadedBank>>,
    events: RwLock<HashMap<String, EventEntry>>,
    buses: RwLock<HashMap<String, BusState>>,
    vcas: RwLock<HashMap<String, VcaState>>,
    parameters: RwLock<HashMap<String, ParameterState>>,
    strings: RwLock<HashMap<String, StringEntry>>,
    instances: RwLock<HashMap<InstanceId, InstanceRecord>>,

    plugins: Mutex<PluginRegistry>,

    notify_tx: Mutex<Producer<SystemNotification>>,
    notify_rx: Mutex<Consumer<SystemNotification>>,
    error_notifications: AtomicBool,
    debug_level: RwLock<DebugLevel>,
}

/// Handle to the studio runtime
#[derive(Clone)]
pub struct StudioSystem {
    inner: Arc<SystemInner>,
}

impl StudioSystem {
    /// Create a valid, uninitialized system
    pub fn create() -> Self {
        let (notify_tx, notify_rx) = RingBuffer::new(NOTIFY_QUEUE_CAPACITY);
        Self {
            inner: Arc::new(SystemInner {
                valid: AtomicBool::new(true),
                initialized: AtomicBool::new(false),
                frame: AtomicU64::new(0),
                max_channels: AtomicU32::new(0),
                settings: RwLock::new(CoreSettings::default()),
                advanced: RwLock::new(AdvancedSettings::default()),
                flags: RwLock::new(InitFlags::default()),
                wav_path: RwLock::new(None),
                banks: RwLock::new(HashMap::new()),
                events: RwLock::new(HashMap::new()),
                buses: RwLock::new(HashMap::new()),
                vcas: RwLock::new(HashMap::new()),
                parameters: RwLock::new(HashMap::new()),
                strings: RwLock::new(HashMap::new()),
                instances: RwLock::new(HashMap::new()),
                plugins: Mutex::new(PluginRegistry::new()),
                notify_tx: Mutex::new(notify_tx),
                notify_rx: Mutex::new(notify_rx),
                error_notifications: AtomicBool::new(false),
                debug_level: RwLock::new(DebugLevel::None),
            }),
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.inner.valid.load(Ordering::Acquire)
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.is_valid() && self.inner.initialized.load(Ordering::Acquire)
    }

    /// Update ticks completed so far
    #[inline]
    pub fn frame(&self) -> u64 {
        self.inner.frame.load(Ordering::Relaxed)
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Guards and notification plumbing
    // ───────────────────────────────────────────────────────────────────────────

    fn require_valid(&self) -> RuntimeResult<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(RuntimeError::InvalidHandle)
        }
    }

    fn require_initialized(&self) -> RuntimeResult<()> {
        self.require_valid()?;
        if self.inner.initialized.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(RuntimeError::NotInitialized)
        }
    }

    fn require_preinit(&self) -> RuntimeResult<()> {
        self.require_valid()?;
        if self.inner.initialized.load(Ordering::Acquire) {
            Err(RuntimeError::AlreadyInitialized)
        } else {
            Ok(())
        }
    }

    fn notify(&self, notification: SystemNotification) {
        // Overflow drops the notification; the queue is advisory.
        let _ = self.inner.notify_tx.lock().push(notification);
    }

    /// Forward an error to the notification queue when error notifications
    /// are enabled, then hand the result back unchanged.
    fn noted<T>(&self, function: &'static str, result: RuntimeResult<T>) -> RuntimeResult<T> {
        if let Err(e) = &result {
            log::debug!("{function} failed: {e}");
            if self.inner.error_notifications.load(Ordering::Relaxed) {
                self.notify(SystemNotification::ApiError {
                    function,
                    detail: e.to_string(),
                });
            }
        }
        result
    }

    /// Enable/disable `ApiError` notifications for failed calls
    pub fn set_error_notifications(&self, enabled: bool) {
        self.inner
            .error_notifications
            .store(enabled, Ordering::Relaxed);
    }

    /// Set the debug-log threshold for `Log` notifications
    pub fn set_debug_level(&self, level: DebugLevel) {
        *self.inner.debug_level.write() = level;
    }

    /// Queue a debug log line, gated by the configured threshold
    pub fn log_message(&self, level: DebugLevel, message: impl Into<String>) {
        if level == DebugLevel::None {
            return;
        }
        if level <= *self.inner.debug_level.read() {
            self.notify(SystemNotification::Log {
                level,
                message: message.into(),
            });
        }
    }

    /// Drain every queued notification, oldest first
    pub fn drain_notifications(&self) -> Vec<SystemNotification> {
        let mut rx = self.inner.notify_rx.lock();
        let mut drained = Vec::new();
        while let Ok(n) = rx.pop() {
            drained.push(n);
        }
        drained
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Pre-initialize configuration
    // ───────────────────────────────────────────────────────────────────────────

    pub fn set_software_channels(&self, channels: u32) -> RuntimeResult<()> {
        let result = self.require_preinit().and_then(|_| {
            if channels == 0 {
                return Err(RuntimeError::InvalidSettings(
                    "software channel count must be non-zero".into(),
                ));
            }
            self.inner.settings.write().software_channels = channels;
            Ok(())
        });
        self.noted("set_software_channels", result)
    }

    pub fn set_dsp_buffer_size(&self, length: u32, count: u32) -> RuntimeResult<()> {
        let result = self.require_preinit().and_then(|_| {
            if length == 0 || count == 0 {
                return Err(RuntimeError::InvalidSettings(
                    "DSP buffer length and count must be non-zero".into(),
                ));
            }
            let mut settings = self.inner.settings.write();
            settings.dsp_buffer_length = length;
            settings.dsp_buffer_count = count;
            Ok(())
        });
        self.noted("set_dsp_buffer_size", result)
    }

    pub fn set_software_format(
        &self,
        sample_rate: u32,
        speaker_mode: SpeakerMode,
    ) -> RuntimeResult<()> {
        let result = self.require_preinit().and_then(|_| {
            if sample_rate == 0 {
                return Err(RuntimeError::InvalidSettings(
                    "sample rate must be non-zero".into(),
                ));
            }
            let mut settings = self.inner.settings.write();
            settings.sample_rate = sample_rate;
            settings.speaker_mode = speaker_mode;
            Ok(())
        });
        self.noted("set_software_format", result)
    }

    pub fn set_output(&self, output: OutputType) -> RuntimeResult<()> {
        let result = self.require_preinit().map(|_| {
            self.inner.settings.write().output = output;
        });
        self.noted("set_output", result)
    }

    pub fn set_driver(&self, index: usize) -> RuntimeResult<()> {
        let result = self.require_preinit().map(|_| {
            self.inner.settings.write().driver_index = index;
        });
        self.noted("set_driver", result)
    }

    pub fn set_advanced_settings(&self, advanced: AdvancedSettings) -> RuntimeResult<()> {
        let result = self.require_preinit().map(|_| {
            *self.inner.advanced.write() = advanced;
        });
        self.noted("set_advanced_settings", result)
    }

    pub fn core_settings(&self) -> CoreSettings {
        self.inner.settings.read().clone()
    }

    pub fn advanced_settings(&self) -> AdvancedSettings {
        self.inner.advanced.read().clone()
    }

    /// Channel budget passed to `initialize`; 0 before initialization
    pub fn max_channels(&self) -> u32 {
        self.inner.max_channels.load(Ordering::Relaxed)
    }

    pub fn init_flags(&self) -> InitFlags {
        *self.inner.flags.read()
    }

    /// Output file path for the wav-writer backends
    pub fn wav_writer_path(&self) -> Option<String> {
        self.inner.wav_path.read().clone()
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ───────────────────────────────────────────────────────────────────────────

    /// Bring the system up.
    ///
    /// `wav_path` is required by the wav-writer output types and ignored by
    /// all others. Settings are frozen after this returns Ok.
    pub fn initialize(
        &self,
        max_channels: u32,
        flags: InitFlags,
        wav_path: Option<&str>,
    ) -> RuntimeResult<()> {
        let result = self.try_initialize(max_channels, flags, wav_path);
        self.noted("initialize", result)
    }

    fn try_initialize(
        &self,
        max_channels: u32,
        flags: InitFlags,
        wav_path: Option<&str>,
    ) -> RuntimeResult<()> {
        self.require_preinit()?;
        if max_channels == 0 {
            return Err(RuntimeError::InvalidSettings(
                "max channel count must be non-zero".into(),
            ));
        }

        let settings = self.inner.settings.read().clone();
        if settings.output.is_wav_writer() && wav_path.is_none() {
            return Err(RuntimeError::InvalidSettings(
                "wav-writer output requires an output path".into(),
            ));
        }

        self.inner
            .max_channels
            .store(max_channels, Ordering::Relaxed);
        *self.inner.flags.write() = flags;
        *self.inner.wav_path.write() = wav_path.map(str::to_string);
        self.inner.initialized.store(true, Ordering::Release);

        log::info!(
            "Studio system initialized: {} channels ({} real), {} Hz, {}x{} DSP blocks, output {:?}",
            max_channels,
            settings.software_channels,
            settings.sample_rate,
            settings.dsp_buffer_length,
            settings.dsp_buffer_count,
            settings.output,
        );
        if flags.live_update {
            let port = self.inner.advanced.read().live_update_port;
            log::info!("Live update enabled on port {port}");
            self.notify(SystemNotification::LiveUpdateConnected);
        }
        Ok(())
    }

    /// One host-driven tick: advance instances, deliver callbacks, reap
    /// released instances, bracket the queue with Pre/PostUpdate.
    pub fn update(&self) -> RuntimeResult<()> {
        let result = self.try_update();
        self.noted("update", result)
    }

    fn try_update(&self) -> RuntimeResult<()> {
        self.require_initialized()?;
        self.inner.frame.fetch_add(1, Ordering::Relaxed);
        self.notify(SystemNotification::PreUpdate);

        // Collect callback invocations under the lock, run them after.
        let mut fired: Vec<(EventCallback, CallbackInfo)> = Vec::new();
        {
            let mut instances = self.inner.instances.write();
            for (id, record) in instances.iter_mut() {
                record.advance();
                for kind in record.pending_callbacks.drain(..) {
                    if let Some(callback) = &record.callback {
                        if record.callback_mask.contains(kind) {
                            fired.push((
                                Arc::clone(callback),
                                CallbackInfo {
                                    callback_type: kind,
                                    instance: *id,
                                    event: record.event,
                                    event_path: record.event_path.clone(),
                                    user_data: record.user_data.clone(),
                                },
                            ));
                        }
                    }
                }
            }
            instances.retain(|_, record| !record.reapable());
        }
        for (callback, info) in fired {
            callback(&info);
        }

        self.notify(SystemNotification::PostUpdate);
        Ok(())
    }

    /// Tear the system down. The handle stays allocated but every call after
    /// this fails with `InvalidHandle`.
    pub fn release(&self) -> RuntimeResult<()> {
        let result = self.require_valid().map(|_| {
            let was_initialized = self.inner.initialized.load(Ordering::Acquire);
            if was_initialized && self.inner.flags.read().live_update {
                self.notify(SystemNotification::LiveUpdateDisconnected);
            }
            self.inner.initialized.store(false, Ordering::Release);
            self.inner.valid.store(false, Ordering::Release);
            self.inner.instances.write().clear();
            self.inner.events.write().clear();
            self.inner.buses.write().clear();
            self.inner.vcas.write().clear();
            self.inner.parameters.write().clear();
            self.inner.strings.write().clear();
            self.inner.banks.write().clear();
            log::info!("Studio system released");
        });
        self.noted("release", result)
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Banks
    // ───────────────────────────────────────────────────────────────────────────

    /// Load a bank manifest from disk and register its contents.
    ///
    /// Allowed on any valid system, initialized or not, because the bring-up
    /// sequence loads the master banks before declaring the system ready.
    pub fn load_bank_file(&self, path: impl AsRef<Path>) -> RuntimeResult<BankId> {
        let result = self.try_load_bank_file(path.as_ref());
        self.noted("load_bank_file", result)
    }

    fn try_load_bank_file(&self, path: &Path) -> RuntimeResult<BankId> {
        self.require_valid()?;
        let json = std::fs::read_to_string(path)?;
        let manifest = BankManifest::from_json(&json)?;
        let studio_path = manifest.studio_path();

        let mut banks = self.inner.banks.write();
        if banks.contains_key(&studio_path) {
            return Err(RuntimeError::BankAlreadyLoaded(studio_path));
        }

        let id = BankId(generate_object_id());
        {
            let mut events = self.inner.events.write();
            for def in &manifest.events {
                events.insert(
                    def.path.clone(),
                    EventEntry {
                        id: EventId(generate_object_id()),
                        bank: id,
                        bus: def.bus.clone(),
                    },
                );
            }
        }
        {
            let mut buses = self.inner.buses.write();
            for def in &manifest.buses {
                buses.insert(
                    def.path.clone(),
                    BusState {
                        id: BusId(generate_object_id()),
                        bank: id,
                        path: def.path.clone(),
                        volume: 1.0,
                        muted: false,
                        paused: false,
                        vca: def.vca.clone(),
                    },
                );
            }
        }
        {
            let mut vcas = self.inner.vcas.write();
            for def in &manifest.vcas {
                vcas.insert(
                    def.path.clone(),
                    VcaState {
                        id: VcaId(generate_object_id()),
                        bank: id,
                        volume: 1.0,
                    },
                );
            }
        }
        {
            let mut parameters = self.inner.parameters.write();
            for def in &manifest.parameters {
                parameters.insert(
                    def.name.clone(),
                    ParameterState {
                        bank: id,
                        def: def.clone(),
                        value: def.default,
                    },
                );
            }
        }
        {
            let mut strings = self.inner.strings.write();
            for (key, path) in &manifest.strings {
                strings.insert(
                    key.clone(),
                    StringEntry {
                        bank: id,
                        path: path.clone(),
                    },
                );
            }
        }

        log::info!(
            "Loaded bank '{}' from {} ({} events, {} buses, {} VCAs, {} parameters)",
            studio_path,
            path.display(),
            manifest.events.len(),
            manifest.buses.len(),
            manifest.vcas.len(),
            manifest.parameters.len(),
        );
        banks.insert(
            studio_path.clone(),
            LoadedBank {
                id,
                studio_path,
                file_path: path.display().to_string(),
            },
        );
        Ok(id)
    }

    /// Resolve a loaded bank by studio path (`bank:/<name>`)
    pub fn bank(&self, studio_path: &str) -> RuntimeResult<BankId> {
        let result = self.require_valid().and_then(|_| {
            self.inner
                .banks
                .read()
                .get(studio_path)
                .map(|b| b.id)
                .ok_or_else(|| RuntimeError::BankNotFound(studio_path.to_string()))
        });
        self.noted("bank", result)
    }

    /// Unload a bank, removing its registrations and stopping live instances
    /// of its events
    pub fn unload_bank(&self, bank: BankId) -> RuntimeResult<()> {
        let result = self.try_unload_bank(bank);
        self.noted("unload_bank", result)
    }

    fn try_unload_bank(&self, bank: BankId) -> RuntimeResult<()> {
        self.require_valid()?;
        let removed = {
            let mut banks = self.inner.banks.write();
            let studio_path = banks
                .values()
                .find(|b| b.id == bank)
                .map(|b| b.studio_path.clone())
                .ok_or(RuntimeError::InvalidHandle)?;
            // key == studio_path by construction
            banks.remove(&studio_path).ok_or(RuntimeError::InvalidHandle)?
        };

        let removed_events: Vec<EventId> = {
            let mut events = self.inner.events.write();
            let ids = events
                .values()
                .filter(|e| e.bank == removed.id)
                .map(|e| e.id)
                .collect();
            events.retain(|_, e| e.bank != removed.id);
            ids
        };
        self.inner.buses.write().retain(|_, b| b.bank != removed.id);
        self.inner.vcas.write().retain(|_, v| v.bank != removed.id);
        self.inner
            .parameters
            .write()
            .retain(|_, p| p.bank != removed.id);
        self.inner
            .strings
            .write()
            .retain(|_, s| s.bank != removed.id);

        // Orphaned instances stop immediately and drop on the next update.
        {
            let mut instances = self.inner.instances.write();
            for record in instances.values_mut() {
                if removed_events.contains(&record.event) {
                    record.stop(StopMode::Immediate);
                    record.released = true;
                }
            }
        }

        log::info!(
            "Unloaded bank '{}' ({})",
            removed.studio_path,
            removed.file_path
        );
        self.notify(SystemNotification::BankUnloaded {
            path: removed.studio_path,
        });
        Ok(())
    }

    pub fn bank_count(&self) -> usize {
        self.inner.banks.read().len()
    }

    /// Resolve a master-strings id to its studio path
    pub fn lookup_path(&self, string_id: &str) -> Option<String> {
        if !self.is_valid() {
            return None;
        }
        self.inner
            .strings
            .read()
            .get(string_id)
            .map(|s| s.path.clone())
    }

    /// Studio paths of every loaded bank
    pub fn bank_paths(&self) -> Vec<String> {
        self.inner.banks.read().keys().cloned().collect()
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Events and instances
    // ───────────────────────────────────────────────────────────────────────────

    /// Resolve an event description by studio path
    pub fn event_description(&self, event_path: &str) -> RuntimeResult<EventId> {
        let result = self.require_valid().and_then(|_| {
            self.inner
                .events
                .read()
                .get(event_path)
                .map(|e| e.id)
                .ok_or_else(|| RuntimeError::EventNotFound(event_path.to_string()))
        });
        self.noted("event_description", result)
    }

    pub fn event_count(&self) -> usize {
        self.inner.events.read().len()
    }

    /// Create an instance of an event, in the Created state
    pub fn create_instance(&self, event: EventId) -> RuntimeResult<InstanceId> {
        let result = self.require_valid().and_then(|_| {
            let events = self.inner.events.read();
            let (path, entry) = events
                .iter()
                .find(|(_, e)| e.id == event)
                .ok_or(RuntimeError::InvalidHandle)?;
            let id = generate_instance_id();
            self.inner.instances.write().insert(
                id,
                InstanceRecord::new(entry.id, path.clone(), entry.bus.clone(), self.frame()),
            );
            Ok(id)
        });
        self.noted("create_instance", result)
    }

    /// True until the instance is reaped (or the system released)
    pub fn is_instance_valid(&self, id: InstanceId) -> bool {
        self.is_valid() && self.inner.instances.read().contains_key(&id)
    }

    fn with_instance<T>(
        &self,
        id: InstanceId,
        f: impl FnOnce(&mut InstanceRecord) -> RuntimeResult<T>,
    ) -> RuntimeResult<T> {
        self.require_valid()?;
        let mut instances = self.inner.instances.write();
        let record = instances.get_mut(&id).ok_or(RuntimeError::InvalidHandle)?;
        f(record)
    }

    pub fn start_instance(&self, id: InstanceId) -> RuntimeResult<()> {
        let frame = self.frame();
        let result = self.with_instance(id, |record| {
            record.start(frame);
            Ok(())
        });
        self.noted("start_instance", result)
    }

    pub fn stop_instance(&self, id: InstanceId, mode: StopMode) -> RuntimeResult<()> {
        let result = self.with_instance(id, |record| {
            record.stop(mode);
            Ok(())
        });
        self.noted("stop_instance", result)
    }

    pub fn set_instance_paused(&self, id: InstanceId, paused: bool) -> RuntimeResult<()> {
        let result = self.with_instance(id, |record| {
            record.paused = paused;
            Ok(())
        });
        self.noted("set_instance_paused", result)
    }

    pub fn instance_paused(&self, id: InstanceId) -> RuntimeResult<bool> {
        let result = self.with_instance(id, |record| Ok(record.paused));
        self.noted("instance_paused", result)
    }

    pub fn playback_state(&self, id: InstanceId) -> RuntimeResult<PlaybackState> {
        let result = self.with_instance(id, |record| Ok(record.state));
        self.noted("playback_state", result)
    }

    pub fn set_instance_attributes(
        &self,
        id: InstanceId,
        attributes: Attributes3d,
    ) -> RuntimeResult<()> {
        let result = self.with_instance(id, |record| {
            record.attributes = attributes;
            Ok(())
        });
        self.noted("set_instance_attributes", result)
    }

    pub fn instance_attributes(&self, id: InstanceId) -> RuntimeResult<Attributes3d> {
        let result = self.with_instance(id, |record| Ok(record.attributes));
        self.noted("instance_attributes", result)
    }

    /// Set a per-instance parameter, clamped against the global definition
    /// when one exists. Parameters unknown globally are instance-local.
    pub fn set_instance_parameter(
        &self,
        id: InstanceId,
        name: &str,
        value: f32,
    ) -> RuntimeResult<()> {
        let clamped = match self.inner.parameters.read().get(name) {
            Some(state) => value.clamp(state.def.min, state.def.max),
            None => value,
        };
        let result = self.with_instance(id, |record| {
            record.parameters.insert(name.to_string(), clamped);
            Ok(())
        });
        self.noted("set_instance_parameter", result)
    }

    /// Labeled variant; the label must exist in the global definition
    pub fn set_instance_parameter_with_label(
        &self,
        id: InstanceId,
        name: &str,
        label: &str,
    ) -> RuntimeResult<()> {
        let result = self
            .resolve_label(name, label)
            .and_then(|value| {
                self.with_instance(id, |record| {
                    record.parameters.insert(name.to_string(), value);
                    Ok(())
                })
            });
        self.noted("set_instance_parameter_with_label", result)
    }

    pub fn instance_parameter(&self, id: InstanceId, name: &str) -> RuntimeResult<f32> {
        let result = self.with_instance(id, |record| {
            record
                .parameters
                .get(name)
                .copied()
                .ok_or_else(|| RuntimeError::ParameterNotFound(name.to_string()))
        });
        self.noted("instance_parameter", result)
    }

    pub fn set_instance_callback(
        &self,
        id: InstanceId,
        callback: EventCallback,
        mask: CallbackMask,
    ) -> RuntimeResult<()> {
        let result = self.with_instance(id, |record| {
            record.callback = Some(callback);
            record.callback_mask = mask;
            Ok(())
        });
        self.noted("set_instance_callback", result)
    }

    pub fn set_instance_user_data(&self, id: InstanceId, data: UserData) -> RuntimeResult<()> {
        let result = self.with_instance(id, |record| {
            record.user_data = Some(data);
            Ok(())
        });
        self.noted("set_instance_user_data", result)
    }

    /// Mark an instance for removal once it has stopped and delivered its
    /// remaining callbacks. A playing instance keeps playing under runtime
    /// ownership; the id stays usable until the instance is reaped.
    pub fn release_instance(&self, id: InstanceId) -> RuntimeResult<()> {
        let result = self.with_instance(id, |record| {
            record.released = true;
            Ok(())
        });
        self.noted("release_instance", result)
    }

    pub fn instance_count(&self) -> usize {
        self.inner.instances.read().len()
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Buses and VCAs
    // ───────────────────────────────────────────────────────────────────────────

    /// Resolve a bus by studio path (`bus:/...`)
    pub fn bus(&self, path: &str) -> RuntimeResult<BusId> {
        let result = self.require_valid().and_then(|_| {
            self.inner
                .buses
                .read()
                .get(path)
                .map(|b| b.id)
                .ok_or_else(|| RuntimeError::BusNotFound(path.to_string()))
        });
        self.noted("bus", result)
    }

    /// Resolve a VCA by studio path (`vca:/...`)
    pub fn vca(&self, path: &str) -> RuntimeResult<VcaId> {
        let result = self.require_valid().and_then(|_| {
            self.inner
                .vcas
                .read()
                .get(path)
                .map(|v| v.id)
                .ok_or_else(|| RuntimeError::VcaNotFound(path.to_string()))
        });
        self.noted("vca", result)
    }

    fn with_bus<T>(&self, id: BusId, f: impl FnOnce(&mut BusState) -> T) -> RuntimeResult<T> {
        self.require_valid()?;
        let mut buses = self.inner.buses.write();
        let bus = buses
            .values_mut()
            .find(|b| b.id == id)
            .ok_or(RuntimeError::InvalidHandle)?;
        Ok(f(bus))
    }

    pub fn set_bus_volume(&self, id: BusId, volume: f32) -> RuntimeResult<()> {
        let result = self.with_bus(id, |bus| bus.volume = volume.max(0.0));
        self.noted("set_bus_volume", result)
    }

    /// Bus volume as `(set, final)`: the final value folds in mute and the
    /// controlling VCA.
    pub fn bus_volume(&self, id: BusId) -> RuntimeResult<(f32, f32)> {
        let result = self.require_valid().and_then(|_| {
            let buses = self.inner.buses.read();
            let bus = buses
                .values()
                .find(|b| b.id == id)
                .ok_or(RuntimeError::InvalidHandle)?;
            let vca_scale = bus
                .vca
                .as_deref()
                .and_then(|v| self.inner.vcas.read().get(v).map(|s| s.volume))
                .unwrap_or(1.0);
            let muted_scale = if bus.muted { 0.0 } else { 1.0 };
            Ok((bus.volume, bus.volume * muted_scale * vca_scale))
        });
        self.noted("bus_volume", result)
    }

    pub fn set_bus_muted(&self, id: BusId, muted: bool) -> RuntimeResult<()> {
        let result = self.with_bus(id, |bus| bus.muted = muted);
        self.noted("set_bus_muted", result)
    }

    pub fn bus_muted(&self, id: BusId) -> RuntimeResult<bool> {
        let result = self.with_bus(id, |bus| bus.muted);
        self.noted("bus_muted", result)
    }

    /// Pause/resume a bus and every live instance routed to it
    pub fn set_bus_paused(&self, id: BusId, paused: bool) -> RuntimeResult<()> {
        let result = self
            .with_bus(id, |bus| {
                bus.paused = paused;
                bus.path.clone()
            })
            .map(|path| {
                let mut instances = self.inner.instances.write();
                for record in instances.values_mut() {
                    if record.bus.as_deref() == Some(path.as_str()) {
                        record.paused = paused;
                    }
                }
            });
        self.noted("set_bus_paused", result)
    }

    pub fn bus_paused(&self, id: BusId) -> RuntimeResult<bool> {
        let result = self.with_bus(id, |bus| bus.paused);
        self.noted("bus_paused", result)
    }

    /// Stop every live instance routed to a bus
    pub fn stop_bus_events(&self, id: BusId, mode: StopMode) -> RuntimeResult<()> {
        let result = self.with_bus(id, |bus| bus.path.clone()).map(|path| {
            let mut instances = self.inner.instances.write();
            for record in instances.values_mut() {
                if record.bus.as_deref() == Some(path.as_str()) {
                    record.stop(mode);
                }
            }
        });
        self.noted("stop_bus_events", result)
    }

    fn with_vca<T>(&self, id: VcaId, f: impl FnOnce(&mut VcaState) -> T) -> RuntimeResult<T> {
        self.require_valid()?;
        let mut vcas = self.inner.vcas.write();
        let vca = vcas
            .values_mut()
            .find(|v| v.id == id)
            .ok_or(RuntimeError::InvalidHandle)?;
        Ok(f(vca))
    }

    pub fn set_vca_volume(&self, id: VcaId, volume: f32) -> RuntimeResult<()> {
        let result = self.with_vca(id, |vca| vca.volume = volume.max(0.0));
        self.noted("set_vca_volume", result)
    }

    /// VCA volume as `(set, final)`. VCAs do not nest, so both values match.
    pub fn vca_volume(&self, id: VcaId) -> RuntimeResult<(f32, f32)> {
        let result = self.with_vca(id, |vca| (vca.volume, vca.volume));
        self.noted("vca_volume", result)
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Global parameters
    // ───────────────────────────────────────────────────────────────────────────

    /// Set a global parameter by name, clamped to its authored range.
    ///
    /// Values apply immediately (nothing ramps in the control plane), so
    /// `ignore_seek_speed` has no observable effect.
    pub fn set_parameter_by_name(
        &self,
        name: &str,
        value: f32,
        _ignore_seek_speed: bool,
    ) -> RuntimeResult<()> {
        let result = self.require_valid().and_then(|_| {
            let mut parameters = self.inner.parameters.write();
            let state = parameters
                .get_mut(name)
                .ok_or_else(|| RuntimeError::ParameterNotFound(name.to_string()))?;
            state.value = value.clamp(state.def.min, state.def.max);
            Ok(())
        });
        self.noted("set_parameter_by_name", result)
    }

    /// Set a labeled global parameter; the label resolves to its index
    pub fn set_parameter_by_name_with_label(
        &self,
        name: &str,
        label: &str,
        _ignore_seek_speed: bool,
    ) -> RuntimeResult<()> {
        let result = self.resolve_label(name, label).and_then(|value| {
            let mut parameters = self.inner.parameters.write();
            let state = parameters
                .get_mut(name)
                .ok_or_else(|| RuntimeError::ParameterNotFound(name.to_string()))?;
            state.value = value.clamp(state.def.min, state.def.max);
            Ok(())
        });
        self.noted("set_parameter_by_name_with_label", result)
    }

    pub fn parameter_by_name(&self, name: &str) -> RuntimeResult<f32> {
        let result = self.require_valid().and_then(|_| {
            self.inner
                .parameters
                .read()
                .get(name)
                .map(|s| s.value)
                .ok_or_else(|| RuntimeError::ParameterNotFound(name.to_string()))
        });
        self.noted("parameter_by_name", result)
    }

    fn resolve_label(&self, name: &str, label: &str) -> RuntimeResult<f32> {
        self.require_valid()?;
        let parameters = self.inner.parameters.read();
        let state = parameters
            .get(name)
            .ok_or_else(|| RuntimeError::ParameterNotFound(name.to_string()))?;
        state
            .def
            .label_value(label)
            .ok_or_else(|| RuntimeError::UnknownLabel {
                parameter: name.to_string(),
                label: label.to_string(),
            })
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Plugins
    // ───────────────────────────────────────────────────────────────────────────

    /// Directory searched for bare plugin names
    pub fn set_plugin_path(&self, root: impl Into<std::path::PathBuf>) {
        self.inner.plugins.lock().set_root(root);
    }

    /// Load a native plugin by name and call its register entry point
    pub fn load_plugin(&self, name: &str) -> RuntimeResult<PluginHandle> {
        let result = self
            .require_valid()
            .and_then(|_| self.inner.plugins.lock().load(name));
        self.noted("load_plugin", result)
    }

    pub fn plugin_name(&self, handle: PluginHandle) -> Option<String> {
        self.inner
            .plugins
            .lock()
            .name_of(handle)
            .map(str::to_string)
    }

    pub fn plugin_count(&self) -> usize {
        self.inner.plugins.lock().count()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::CallbackType;
    use std::io::Write as _;
    use std::sync::atomic::AtomicUsize;

    fn bank_file(dir: &tempfile::TempDir, name: &str, json: &str) -> std::path::PathBuf {
        let path = dir.path().join(format!("{name}.bank.json"));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(json.as_bytes()).unwrap();
        path
    }

    fn ready_system() -> StudioSystem {
        let system = StudioSystem::create();
        system.initialize(512, InitFlags::default(), None).unwrap();
        system
    }

    const SFX_BANK: &str = r#"{
        "name": "SFX",
        "events": [
            { "path": "event:/SFX/Explosion", "bus": "bus:/SFX" },
            { "path": "event:/SFX/Footstep" }
        ],
        "buses": [ { "path": "bus:/SFX", "vca": "vca:/World" } ],
        "vcas": [ { "path": "vca:/World" } ],
        "parameters": [
            { "name": "Intensity", "min": 0.0, "max": 10.0, "default": 1.0 },
            { "name": "Surface", "max": 2.0, "labels": ["Concrete", "Grass", "Metal"] }
        ]
    }"#;

    fn load_sfx(system: &StudioSystem) -> BankId {
        let dir = tempfile::tempdir().unwrap();
        let path = bank_file(&dir, "SFX", SFX_BANK);
        system.load_bank_file(&path).unwrap()
    }

    fn instance_of(system: &StudioSystem, path: &str) -> InstanceId {
        let event = system.event_description(path).unwrap();
        system.create_instance(event).unwrap()
    }

    #[test]
    fn test_lifecycle() {
        let system = StudioSystem::create();
        assert!(system.is_valid());
        assert!(!system.is_initialized());

        // update before initialize fails
        assert!(matches!(
            system.update().unwrap_err(),
            RuntimeError::NotInitialized
        ));

        system.initialize(512, InitFlags::default(), None).unwrap();
        assert!(system.is_initialized());

        // second initialize fails
        assert!(matches!(
            system
                .initialize(512, InitFlags::default(), None)
                .unwrap_err(),
            RuntimeError::AlreadyInitialized
        ));

        system.release().unwrap();
        assert!(!system.is_valid());
        assert!(!system.is_initialized());
        assert!(matches!(
            system.update().unwrap_err(),
            RuntimeError::InvalidHandle
        ));
    }

    #[test]
    fn test_settings_frozen_after_initialize() {
        let system = StudioSystem::create();
        system.set_software_channels(128).unwrap();
        system.set_dsp_buffer_size(512, 2).unwrap();
        system
            .set_software_format(44100, SpeakerMode::FivePointOne)
            .unwrap();

        system.initialize(512, InitFlags::default(), None).unwrap();

        assert!(matches!(
            system.set_software_channels(64).unwrap_err(),
            RuntimeError::AlreadyInitialized
        ));
        let settings = system.core_settings();
        assert_eq!(settings.software_channels, 128);
        assert_eq!(settings.dsp_buffer_length, 512);
        assert_eq!(settings.sample_rate, 44100);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let system = StudioSystem::create();
        assert!(system.set_software_channels(0).is_err());
        assert!(system.set_dsp_buffer_size(0, 4).is_err());
        assert!(system.set_software_format(0, SpeakerMode::Stereo).is_err());
        assert!(system.initialize(0, InitFlags::default(), None).is_err());
    }

    #[test]
    fn test_wav_writer_requires_path() {
        let system = StudioSystem::create();
        system.set_output(OutputType::WavWriter).unwrap();

        assert!(system.initialize(512, InitFlags::default(), None).is_err());
        assert!(system
            .initialize(512, InitFlags::default(), Some("/tmp/out.wav"))
            .is_ok());
        assert_eq!(system.wav_writer_path().as_deref(), Some("/tmp/out.wav"));
        assert_eq!(system.max_channels(), 512);
        assert!(!system.init_flags().live_update);
    }

    #[test]
    fn test_bank_loading_before_initialize() {
        // The bring-up sequence loads master banks before the system is ready.
        let system = StudioSystem::create();
        let id = load_sfx(&system);

        assert_eq!(system.bank_count(), 1);
        assert_eq!(system.bank("bank:/SFX").unwrap(), id);
        assert!(system.event_description("event:/SFX/Explosion").is_ok());
    }

    #[test]
    fn test_strings_lookup_follows_bank() {
        let system = ready_system();
        let dir = tempfile::tempdir().unwrap();
        let path = bank_file(
            &dir,
            "Master.strings",
            r#"{
                "name": "Master.strings",
                "strings": {
                    "a1b2": "event:/SFX/Explosion",
                    "c3d4": "bus:/SFX"
                }
            }"#,
        );
        let bank = system.load_bank_file(&path).unwrap();

        assert_eq!(
            system.lookup_path("a1b2").as_deref(),
            Some("event:/SFX/Explosion")
        );
        assert_eq!(system.lookup_path("c3d4").as_deref(), Some("bus:/SFX"));
        assert_eq!(system.lookup_path("ffff"), None);

        system.unload_bank(bank).unwrap();
        assert_eq!(system.lookup_path("a1b2"), None);
    }

    #[test]
    fn test_duplicate_bank_rejected() {
        let system = ready_system();
        let dir = tempfile::tempdir().unwrap();
        let path = bank_file(&dir, "SFX", SFX_BANK);

        system.load_bank_file(&path).unwrap();
        let err = system.load_bank_file(&path).unwrap_err();
        assert!(matches!(err, RuntimeError::BankAlreadyLoaded(_)));
        assert_eq!(system.bank_count(), 1);
    }

    #[test]
    fn test_unload_bank_stops_instances() {
        let system = ready_system();
        let bank = load_sfx(&system);

        let id = instance_of(&system, "event:/SFX/Explosion");
        system.start_instance(id).unwrap();
        system.unload_bank(bank).unwrap();

        assert_eq!(system.bank_count(), 0);
        assert!(system.event_description("event:/SFX/Explosion").is_err());
        assert_eq!(system.playback_state(id).unwrap(), PlaybackState::Stopped);

        system.update().unwrap();
        assert_eq!(system.instance_count(), 0);
        assert!(!system.is_instance_valid(id));
        assert!(system
            .drain_notifications()
            .contains(&SystemNotification::BankUnloaded {
                path: "bank:/SFX".into()
            }));
    }

    #[test]
    fn test_instance_lifecycle_and_callbacks() {
        let system = ready_system();
        load_sfx(&system);

        let id = instance_of(&system, "event:/SFX/Explosion");
        let counter = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&counter);
        system
            .set_instance_callback(
                id,
                Arc::new(move |info| {
                    assert_eq!(info.event_path, "event:/SFX/Explosion");
                    seen.fetch_add(1, Ordering::SeqCst);
                }),
                CallbackMask::ALL,
            )
            .unwrap();

        system.start_instance(id).unwrap();
        system.update().unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 1); // Started
        assert_eq!(system.playback_state(id).unwrap(), PlaybackState::Playing);

        system.stop_instance(id, StopMode::AllowFadeOut).unwrap();
        assert_eq!(system.playback_state(id).unwrap(), PlaybackState::Stopping);

        system.update().unwrap(); // fade finishes, Stopped queued
        system.update().unwrap(); // Stopped delivered
        assert_eq!(counter.load(Ordering::SeqCst), 2);

        assert!(system.is_instance_valid(id));
        system.release_instance(id).unwrap();
        system.update().unwrap();
        assert!(!system.is_instance_valid(id));
        assert!(matches!(
            system.playback_state(id).unwrap_err(),
            RuntimeError::InvalidHandle
        ));
    }

    #[test]
    fn test_callback_mask_filters() {
        let system = ready_system();
        load_sfx(&system);

        let id = instance_of(&system, "event:/SFX/Footstep");
        let counter = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&counter);
        system
            .set_instance_callback(
                id,
                Arc::new(move |info| {
                    assert_eq!(info.callback_type, CallbackType::Stopped);
                    seen.fetch_add(1, Ordering::SeqCst);
                }),
                CallbackMask::STOPPED,
            )
            .unwrap();

        system.start_instance(id).unwrap();
        system.stop_instance(id, StopMode::Immediate).unwrap();
        system.update().unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_released_instance_keeps_playing_until_stopped() {
        let system = ready_system();
        load_sfx(&system);

        let id = instance_of(&system, "event:/SFX/Footstep");
        system.start_instance(id).unwrap();
        system.release_instance(id).unwrap();

        system.update().unwrap();
        // Still playing under runtime ownership
        assert!(system.is_instance_valid(id));
        assert_eq!(system.playback_state(id).unwrap(), PlaybackState::Playing);

        system.stop_instance(id, StopMode::Immediate).unwrap();
        system.update().unwrap();
        assert!(!system.is_instance_valid(id));
    }

    #[test]
    fn test_bus_volume_folds_mute_and_vca() {
        let system = ready_system();
        load_sfx(&system);

        let bus = system.bus("bus:/SFX").unwrap();
        let vca = system.vca("vca:/World").unwrap();

        system.set_bus_volume(bus, 0.8).unwrap();
        assert_eq!(system.bus_volume(bus).unwrap(), (0.8, 0.8));

        system.set_vca_volume(vca, 0.5).unwrap();
        assert_eq!(system.bus_volume(bus).unwrap(), (0.8, 0.4));
        assert_eq!(system.vca_volume(vca).unwrap(), (0.5, 0.5));

        system.set_bus_muted(bus, true).unwrap();
        assert_eq!(system.bus_volume(bus).unwrap(), (0.8, 0.0));

        assert!(matches!(
            system.bus("bus:/Nope").unwrap_err(),
            RuntimeError::BusNotFound(_)
        ));
    }

    #[test]
    fn test_bus_pause_and_stop_cover_routed_instances() {
        let system = ready_system();
        load_sfx(&system);

        let bus = system.bus("bus:/SFX").unwrap();
        let routed = instance_of(&system, "event:/SFX/Explosion");
        let unrouted = instance_of(&system, "event:/SFX/Footstep");
        system.start_instance(routed).unwrap();
        system.start_instance(unrouted).unwrap();

        system.set_bus_paused(bus, true).unwrap();
        assert!(system.bus_paused(bus).unwrap());
        assert!(system.instance_paused(routed).unwrap());
        assert!(!system.instance_paused(unrouted).unwrap());

        system.set_bus_paused(bus, false).unwrap();
        system.stop_bus_events(bus, StopMode::Immediate).unwrap();
        assert_eq!(
            system.playback_state(routed).unwrap(),
            PlaybackState::Stopped
        );
        assert_eq!(
            system.playback_state(unrouted).unwrap(),
            PlaybackState::Playing
        );
    }

    #[test]
    fn test_global_parameters_clamp_and_labels() {
        let system = ready_system();
        load_sfx(&system);

        assert_eq!(system.parameter_by_name("Intensity").unwrap(), 1.0);

        system
            .set_parameter_by_name("Intensity", 25.0, false)
            .unwrap();
        assert_eq!(system.parameter_by_name("Intensity").unwrap(), 10.0);
        system
            .set_parameter_by_name("Intensity", -3.0, true)
            .unwrap();
        assert_eq!(system.parameter_by_name("Intensity").unwrap(), 0.0);

        system
            .set_parameter_by_name_with_label("Surface", "Metal", false)
            .unwrap();
        assert_eq!(system.parameter_by_name("Surface").unwrap(), 2.0);

        assert!(matches!(
            system
                .set_parameter_by_name_with_label("Surface", "Wood", false)
                .unwrap_err(),
            RuntimeError::UnknownLabel { .. }
        ));
        assert!(matches!(
            system.set_parameter_by_name("Nope", 1.0, false).unwrap_err(),
            RuntimeError::ParameterNotFound(_)
        ));
    }

    #[test]
    fn test_update_brackets_notifications() {
        let system = ready_system();
        system.update().unwrap();

        let drained = system.drain_notifications();
        assert_eq!(
            drained,
            vec![
                SystemNotification::PreUpdate,
                SystemNotification::PostUpdate
            ]
        );
        assert!(system.drain_notifications().is_empty());
        assert_eq!(system.frame(), 1);
    }

    #[test]
    fn test_live_update_session_notifications() {
        let system = StudioSystem::create();
        let flags = InitFlags {
            live_update: true,
            ..Default::default()
        };
        system.initialize(512, flags, None).unwrap();
        assert!(system
            .drain_notifications()
            .contains(&SystemNotification::LiveUpdateConnected));

        system.release().unwrap();
        assert!(system
            .drain_notifications()
            .contains(&SystemNotification::LiveUpdateDisconnected));

        // without the flag, neither end of the session is announced
        let system = StudioSystem::create();
        system.initialize(512, InitFlags::default(), None).unwrap();
        system.release().unwrap();
        assert!(system.drain_notifications().is_empty());
    }

    #[test]
    fn test_error_notifications_opt_in() {
        let system = ready_system();

        let _ = system.event_description("event:/Nope");
        assert!(system.drain_notifications().is_empty());

        system.set_error_notifications(true);
        let _ = system.event_description("event:/Nope");
        let drained = system.drain_notifications();
        assert!(matches!(
            drained.as_slice(),
            [SystemNotification::ApiError { function, .. }] if *function == "event_description"
        ));
    }

    #[test]
    fn test_log_messages_gated_by_level() {
        let system = ready_system();

        system.log_message(DebugLevel::Warning, "dropped");
        assert!(system.drain_notifications().is_empty());

        system.set_debug_level(DebugLevel::Warning);
        system.log_message(DebugLevel::Error, "kept");
        system.log_message(DebugLevel::Warning, "kept");
        system.log_message(DebugLevel::Log, "dropped");
        assert_eq!(system.drain_notifications().len(), 2);
    }

    #[test]
    fn test_instance_parameter_override() {
        let system = ready_system();
        load_sfx(&system);

        let id = instance_of(&system, "event:/SFX/Explosion");
        system
            .set_instance_parameter(id, "Intensity", 99.0)
            .unwrap();
        // clamped against the global definition
        assert_eq!(system.instance_parameter(id, "Intensity").unwrap(), 10.0);
        // global value untouched
        assert_eq!(system.parameter_by_name("Intensity").unwrap(), 1.0);

        // local-only parameters pass through unclamped
        system.set_instance_parameter(id, "Pitch", 2.5).unwrap();
        assert_eq!(system.instance_parameter(id, "Pitch").unwrap(), 2.5);

        system
            .set_instance_parameter_with_label(id, "Surface", "Grass")
            .unwrap();
        assert_eq!(system.instance_parameter(id, "Surface").unwrap(), 1.0);
    }

    #[test]
    fn test_attributes_roundtrip() {
        let system = ready_system();
        load_sfx(&system);

        let id = instance_of(&system, "event:/SFX/Explosion");
        let attributes = Attributes3d::at_position([1.0, 2.0, 3.0]);
        system.set_instance_attributes(id, attributes).unwrap();
        assert_eq!(
            system.instance_attributes(id).unwrap().position,
            [1.0, 2.0, 3.0]
        );
    }
}

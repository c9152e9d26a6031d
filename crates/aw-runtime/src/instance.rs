//! Event instance state
//!
//! One record per live instance. The facade only ever sees `InstanceId`;
//! the record itself stays inside the system registries.

use aw_core::{Attributes3d, EventId, InstanceId};
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

// ═══════════════════════════════════════════════════════════════════════════════
// CALLBACKS / USER DATA
// ═══════════════════════════════════════════════════════════════════════════════

/// Host callback attached to an instance, invoked during `update()` on the
/// host thread, filtered by the registered mask.
pub type EventCallback = Arc<dyn Fn(&CallbackInfo) + Send + Sync>;

/// Opaque user data attached to an instance
pub type UserData = Arc<dyn Any + Send + Sync>;

/// Instance callback event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CallbackType {
    /// Playback started
    Started = 0,
    /// Playback stopped (explicitly or by fade-out completion)
    Stopped = 1,
}

/// Which callback events an instance callback receives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallbackMask(pub u32);

impl CallbackMask {
    pub const STARTED: Self = Self(1 << 0);
    pub const STOPPED: Self = Self(1 << 1);
    pub const ALL: Self = Self(u32::MAX);

    /// Check whether the mask includes a callback type
    #[inline]
    pub fn contains(self, kind: CallbackType) -> bool {
        self.0 & (1 << kind as u32) != 0
    }
}

impl Default for CallbackMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// Payload handed to an instance callback
#[derive(Clone)]
pub struct CallbackInfo {
    pub callback_type: CallbackType,
    pub instance: InstanceId,
    pub event: EventId,
    pub event_path: String,
    pub user_data: Option<UserData>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// PLAYBACK STATE
// ═══════════════════════════════════════════════════════════════════════════════

/// Instance playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum PlaybackState {
    /// Created, never started
    #[default]
    Created = 0,
    /// Playing (or paused while playing)
    Playing = 1,
    /// Fading out toward Stopped
    Stopping = 2,
    /// Stopped
    Stopped = 3,
}

/// How an instance (or a bus's instances) should stop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopMode {
    /// Fade out, then stop on a later update tick
    #[default]
    AllowFadeOut,
    /// Stop on this call
    Immediate,
}

// ═══════════════════════════════════════════════════════════════════════════════
// INSTANCE RECORD
// ═══════════════════════════════════════════════════════════════════════════════

/// Live instance record
pub(crate) struct InstanceRecord {
    pub event: EventId,
    pub event_path: String,
    /// Bus the source event routes to, if any
    pub bus: Option<String>,
    pub state: PlaybackState,
    pub paused: bool,
    /// Released by the caller; reaped once stopped
    pub released: bool,
    pub attributes: Attributes3d,
    pub user_data: Option<UserData>,
    pub callback: Option<EventCallback>,
    pub callback_mask: CallbackMask,
    /// Per-instance parameter overrides
    pub parameters: HashMap<String, f32>,
    /// Callbacks queued for delivery on the next update tick
    pub pending_callbacks: Vec<CallbackType>,
    pub start_frame: u64,
}

impl InstanceRecord {
    pub fn new(event: EventId, event_path: String, bus: Option<String>, frame: u64) -> Self {
        Self {
            event,
            event_path,
            bus,
            state: PlaybackState::Created,
            paused: false,
            released: false,
            attributes: Attributes3d::default(),
            user_data: None,
            callback: None,
            callback_mask: CallbackMask::ALL,
            parameters: HashMap::new(),
            pending_callbacks: Vec::new(),
            start_frame: frame,
        }
    }

    /// Transition into Playing, queueing the Started callback
    pub fn start(&mut self, frame: u64) {
        self.state = PlaybackState::Playing;
        self.start_frame = frame;
        self.pending_callbacks.push(CallbackType::Started);
    }

    /// Transition toward Stopped
    pub fn stop(&mut self, mode: StopMode) {
        match mode {
            StopMode::AllowFadeOut => {
                if self.state == PlaybackState::Playing {
                    self.state = PlaybackState::Stopping;
                } else {
                    self.enter_stopped();
                }
            }
            StopMode::Immediate => self.enter_stopped(),
        }
    }

    fn enter_stopped(&mut self) {
        if self.state != PlaybackState::Stopped {
            self.state = PlaybackState::Stopped;
            self.pending_callbacks.push(CallbackType::Stopped);
        }
    }

    /// One update tick: finish fades. Returns true if the state changed.
    pub fn advance(&mut self) -> bool {
        if self.state == PlaybackState::Stopping && !self.paused {
            self.enter_stopped();
            return true;
        }
        false
    }

    /// Ready for removal: released, stopped (or never started), and no
    /// callbacks left to deliver
    #[inline]
    pub fn reapable(&self) -> bool {
        self.released
            && matches!(
                self.state,
                PlaybackState::Stopped | PlaybackState::Created
            )
            && self.pending_callbacks.is_empty()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> InstanceRecord {
        InstanceRecord::new(EventId(1), "event:/Test".into(), None, 0)
    }

    #[test]
    fn test_start_queues_callback() {
        let mut rec = record();
        assert_eq!(rec.state, PlaybackState::Created);

        rec.start(10);

        assert_eq!(rec.state, PlaybackState::Playing);
        assert_eq!(rec.start_frame, 10);
        assert_eq!(rec.pending_callbacks, vec![CallbackType::Started]);
    }

    #[test]
    fn test_stop_fadeout_takes_a_tick() {
        let mut rec = record();
        rec.start(0);
        rec.pending_callbacks.clear();

        rec.stop(StopMode::AllowFadeOut);
        assert_eq!(rec.state, PlaybackState::Stopping);
        assert!(rec.pending_callbacks.is_empty());

        assert!(rec.advance());
        assert_eq!(rec.state, PlaybackState::Stopped);
        assert_eq!(rec.pending_callbacks, vec![CallbackType::Stopped]);
    }

    #[test]
    fn test_stop_immediate() {
        let mut rec = record();
        rec.start(0);

        rec.stop(StopMode::Immediate);

        assert_eq!(rec.state, PlaybackState::Stopped);
    }

    #[test]
    fn test_paused_instance_holds_fade() {
        let mut rec = record();
        rec.start(0);
        rec.stop(StopMode::AllowFadeOut);
        rec.paused = true;

        assert!(!rec.advance());
        assert_eq!(rec.state, PlaybackState::Stopping);
    }

    #[test]
    fn test_reapable() {
        let mut rec = record();
        assert!(!rec.reapable());

        rec.released = true;
        // Never started: reapable right away
        assert!(rec.reapable());

        let mut rec = record();
        rec.start(0);
        rec.released = true;
        assert!(!rec.reapable());

        rec.stop(StopMode::Immediate);
        // Stopped but callbacks still pending
        assert!(!rec.reapable());

        rec.pending_callbacks.clear();
        assert!(rec.reapable());
    }

    #[test]
    fn test_callback_mask() {
        assert!(CallbackMask::ALL.contains(CallbackType::Started));
        assert!(CallbackMask::ALL.contains(CallbackType::Stopped));
        assert!(CallbackMask::STARTED.contains(CallbackType::Started));
        assert!(!CallbackMask::STARTED.contains(CallbackType::Stopped));
    }
}

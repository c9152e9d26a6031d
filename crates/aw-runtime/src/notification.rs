//! System notifications
//!
//! The runtime reports through a single SPSC ring buffer instead of invoking
//! host callbacks from unspecified contexts. The host drains the queue on its
//! own thread (the facade does this at the end of every update tick).

use aw_core::DebugLevel;

/// Capacity of the notification ring. Overflow drops the newest entry;
/// notifications are advisory, never load-bearing.
pub const NOTIFY_QUEUE_CAPACITY: usize = 1024;

/// Notification pushed by the runtime for the host to drain
#[derive(Debug, Clone, PartialEq)]
pub enum SystemNotification {
    /// Start of an update tick
    PreUpdate,
    /// End of an update tick
    PostUpdate,
    /// A bank was unloaded
    BankUnloaded { path: String },
    /// Live-update session came up (system initialized with the flag set)
    LiveUpdateConnected,
    /// Live-update session went down (system released)
    LiveUpdateDisconnected,
    /// A runtime API call failed (error-callback equivalent)
    ApiError {
        function: &'static str,
        detail: String,
    },
    /// Debug log line, gated by the configured debug level
    Log { level: DebugLevel, message: String },
}

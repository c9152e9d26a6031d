//! Notification sinks
//!
//! The facade drains the runtime's notification queue at the end of every
//! update tick and routes each entry to the `log` facade here, on the host
//! thread.

use aw_core::DebugLevel;
use aw_runtime::SystemNotification;

/// Timestamp format for runtime debug lines
const TIMESTAMP_FORMAT: &str = "%d-%b-%Y %H:%M:%S";

pub(crate) fn dispatch(notification: &SystemNotification) {
    match notification {
        SystemNotification::Log { level, message } => log_line(*level, message),
        SystemNotification::ApiError { function, detail } => {
            log::error!("Runtime call '{function}' failed: {detail}");
        }
        SystemNotification::BankUnloaded { path } => {
            log::debug!("Bank unloaded: {path}");
        }
        SystemNotification::LiveUpdateConnected => {
            log::info!("Live update client connected");
        }
        SystemNotification::LiveUpdateDisconnected => {
            log::info!("Live update client disconnected");
        }
        SystemNotification::PreUpdate | SystemNotification::PostUpdate => {
            log::trace!("{notification:?}");
        }
    }
}

fn log_line(level: DebugLevel, message: &str) {
    let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT);
    let line = format!("[{timestamp}] {}: {message}", level.label());
    match level {
        DebugLevel::Error => log::error!("{line}"),
        DebugLevel::Warning => log::warn!("{line}"),
        DebugLevel::Log | DebugLevel::None => log::info!("{line}"),
    }
}

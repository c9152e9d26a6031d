//! Handle types
//!
//! Every object owned by the studio runtime is addressed through a small
//! copyable handle instead of a raw pointer. Handles say nothing about
//! liveness; the runtime validates them on every call.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

/// Loaded sound bank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BankId(pub u32);

/// Event description (authoring-side definition)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub u32);

/// One playing/paused event instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceId(pub u64);

/// Mixing bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BusId(pub u32);

/// Volume control group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VcaId(pub u32);

/// Loaded native plugin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PluginHandle(pub u32);

// ═══════════════════════════════════════════════════════════════════════════════
// ID GENERATION
// ═══════════════════════════════════════════════════════════════════════════════

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_OBJECT_ID: AtomicU32 = AtomicU32::new(1);

/// Generate a unique instance id (process-wide)
#[inline]
pub fn generate_instance_id() -> InstanceId {
    InstanceId(NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed))
}

/// Generate a unique 32-bit object id (banks, events, buses, VCAs, plugins)
#[inline]
pub fn generate_object_id() -> u32 {
    NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_id_generation() {
        let a = generate_instance_id();
        let b = generate_instance_id();

        assert_ne!(a, b);
        assert!(a.0 > 0);
    }

    #[test]
    fn test_object_id_generation() {
        let a = generate_object_id();
        let b = generate_object_id();

        assert_ne!(a, b);
    }
}

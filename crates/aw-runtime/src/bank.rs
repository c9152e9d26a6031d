//! Sound bank manifests
//!
//! A bank is the authoring unit the facade loads by file path. The manifest
//! registers event descriptions, buses, VCAs, and global parameters; the
//! optional strings table mirrors the master-strings bank (id → studio path).

use aw_core::{RuntimeError, RuntimeResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ═══════════════════════════════════════════════════════════════════════════════
// DEFINITIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// Event description as authored in a bank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDefinition {
    /// Studio path, e.g. `event:/SFX/Explosion`
    pub path: String,
    /// Bus the event routes to (studio path)
    #[serde(default)]
    pub bus: Option<String>,
    /// Authoring notes
    #[serde(default)]
    pub description: Option<String>,
}

/// Mixing bus as authored in a bank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusDefinition {
    /// Studio path, e.g. `bus:/Music`
    pub path: String,
    /// VCA controlling this bus (studio path)
    #[serde(default)]
    pub vca: Option<String>,
}

/// Volume control group as authored in a bank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VcaDefinition {
    /// Studio path, e.g. `vca:/Environment`
    pub path: String,
}

/// Global parameter as authored in a bank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterDefinition {
    pub name: String,
    #[serde(default)]
    pub min: f32,
    #[serde(default = "default_max")]
    pub max: f32,
    #[serde(default)]
    pub default: f32,
    /// Labels for labeled parameters; a label's value is its index
    #[serde(default)]
    pub labels: Vec<String>,
}

fn default_max() -> f32 {
    1.0
}

impl ParameterDefinition {
    /// Resolve a label to its parameter value
    pub fn label_value(&self, label: &str) -> Option<f32> {
        self.labels
            .iter()
            .position(|l| l == label)
            .map(|i| i as f32)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// MANIFEST
// ═══════════════════════════════════════════════════════════════════════════════

/// On-disk bank manifest (JSON)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankManifest {
    /// Bank name; the bank is addressable as `bank:/<name>` once loaded
    pub name: String,
    #[serde(default)]
    pub events: Vec<EventDefinition>,
    #[serde(default)]
    pub buses: Vec<BusDefinition>,
    #[serde(default)]
    pub vcas: Vec<VcaDefinition>,
    #[serde(default)]
    pub parameters: Vec<ParameterDefinition>,
    /// Master-strings table: id → studio path
    #[serde(default)]
    pub strings: HashMap<String, String>,
}

impl BankManifest {
    /// Parse a manifest from JSON
    pub fn from_json(json: &str) -> RuntimeResult<Self> {
        serde_json::from_str(json).map_err(|e| RuntimeError::BadBankManifest(e.to_string()))
    }

    /// Studio path the bank is registered under
    pub fn studio_path(&self) -> String {
        format!("bank:/{}", self.name)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_minimal() {
        let manifest = BankManifest::from_json(r#"{ "name": "Master" }"#).unwrap();

        assert_eq!(manifest.name, "Master");
        assert_eq!(manifest.studio_path(), "bank:/Master");
        assert!(manifest.events.is_empty());
        assert!(manifest.strings.is_empty());
    }

    #[test]
    fn test_manifest_full() {
        let json = r#"{
            "name": "SFX",
            "events": [
                { "path": "event:/SFX/Explosion", "bus": "bus:/SFX" },
                { "path": "event:/SFX/Footstep" }
            ],
            "buses": [ { "path": "bus:/SFX", "vca": "vca:/World" } ],
            "vcas": [ { "path": "vca:/World" } ],
            "parameters": [
                { "name": "Intensity", "min": 0.0, "max": 10.0, "default": 1.0 },
                { "name": "Surface", "labels": ["Concrete", "Grass", "Metal"] }
            ]
        }"#;

        let manifest = BankManifest::from_json(json).unwrap();

        assert_eq!(manifest.events.len(), 2);
        assert_eq!(manifest.events[0].bus.as_deref(), Some("bus:/SFX"));
        assert!(manifest.events[1].bus.is_none());
        assert_eq!(manifest.buses[0].vca.as_deref(), Some("vca:/World"));
        assert_eq!(manifest.parameters[0].max, 10.0);
    }

    #[test]
    fn test_manifest_bad_json() {
        let err = BankManifest::from_json("not json").unwrap_err();
        assert!(matches!(err, RuntimeError::BadBankManifest(_)));
    }

    #[test]
    fn test_label_value() {
        let def = ParameterDefinition {
            name: "Surface".into(),
            min: 0.0,
            max: 2.0,
            default: 0.0,
            labels: vec!["Concrete".into(), "Grass".into(), "Metal".into()],
        };

        assert_eq!(def.label_value("Concrete"), Some(0.0));
        assert_eq!(def.label_value("Metal"), Some(2.0));
        assert_eq!(def.label_value("Wood"), None);
    }
}

//! Audio configuration file
//!
//! TOML with `[Section]` tables and typed accessors, e.g.:
//!
//! ```toml
//! [System]
//! OutputType = "WavWriter"
//! SampleRate = 48000
//!
//! [Banks]
//! BankOutputDirectory = "Assets/Banks"
//! ```
//!
//! Accessors never fail: a missing section, missing key, or wrong type reads
//! as `None`, and the `_or` variants substitute the caller's default.

use crate::error::{EngineError, EngineResult};
use std::path::Path;
use toml::{Table, Value};

/// Parsed configuration file
#[derive(Debug, Clone)]
pub struct AudioConfig {
    root: Table,
}

impl AudioConfig {
    /// Load and parse a config file. Missing file or malformed TOML is an
    /// error; the initialization sequence fails closed on it.
    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| EngineError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_str(&text).map_err(|source| EngineError::ConfigParse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Parse config text
    pub fn from_str(text: &str) -> Result<Self, toml::de::Error> {
        Ok(Self {
            root: text.parse::<Table>()?,
        })
    }

    fn value(&self, section: &str, key: &str) -> Option<&Value> {
        self.root.get(section)?.as_table()?.get(key)
    }

    pub fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.value(section, key)?.as_str().map(str::to_string)
    }

    pub fn get_string_or(&self, section: &str, key: &str, default: &str) -> String {
        self.get_string(section, key)
            .unwrap_or_else(|| default.to_string())
    }

    pub fn get_int(&self, section: &str, key: &str) -> Option<i64> {
        self.value(section, key)?.as_integer()
    }

    pub fn get_int_or(&self, section: &str, key: &str, default: i64) -> i64 {
        self.get_int(section, key).unwrap_or(default)
    }

    /// Floats also accept integer literals (`1` reads as `1.0`)
    pub fn get_float(&self, section: &str, key: &str) -> Option<f64> {
        let value = self.value(section, key)?;
        value
            .as_float()
            .or_else(|| value.as_integer().map(|i| i as f64))
    }

    pub fn get_float_or(&self, section: &str, key: &str, default: f64) -> f64 {
        self.get_float(section, key).unwrap_or(default)
    }

    pub fn get_bool(&self, section: &str, key: &str) -> Option<bool> {
        self.value(section, key)?.as_bool()
    }

    pub fn get_bool_or(&self, section: &str, key: &str, default: bool) -> bool {
        self.get_bool(section, key).unwrap_or(default)
    }

    /// String array; missing key or non-string elements read as empty/skipped
    pub fn get_string_array(&self, section: &str, key: &str) -> Vec<String> {
        self.value(section, key)
            .and_then(Value::as_array)
            .map(|values| {
                values
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Required key: absence is an error naming `[Section] Key`
    pub fn require_string(&self, section: &str, key: &str) -> EngineResult<String> {
        self.get_string(section, key)
            .ok_or_else(|| EngineError::MissingKey(format!("[{section}] {key}")))
    }

    /// Required integer key
    pub fn require_int(&self, section: &str, key: &str) -> EngineResult<i64> {
        self.get_int(section, key)
            .ok_or_else(|| EngineError::MissingKey(format!("[{section}] {key}")))
    }
}

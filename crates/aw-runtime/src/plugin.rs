//! Native plugin loading
//!
//! Plugins are shared libraries exporting an `aw_plugin_register` entry
//! point. The registry keeps each library alive for the lifetime of the
//! system; dropping the registry unloads them.

use aw_core::{generate_object_id, PluginHandle, RuntimeError, RuntimeResult};
use libloading::Library;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Entry point every plugin library must export
const REGISTER_SYMBOL: &[u8] = b"aw_plugin_register\0";

type RegisterFn = unsafe extern "C" fn() -> i32;

struct LoadedPlugin {
    name: String,
    // Held to keep the library mapped
    _library: Library,
}

/// Loaded plugin libraries, keyed by handle
pub(crate) struct PluginRegistry {
    root: PathBuf,
    loaded: HashMap<PluginHandle, LoadedPlugin>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self {
            root: PathBuf::new(),
            loaded: HashMap::new(),
        }
    }

    /// Directory prefixed to bare plugin names
    pub fn set_root(&mut self, root: impl Into<PathBuf>) {
        self.root = root.into();
    }

    /// Load a plugin by name, resolve its register symbol, and call it.
    pub fn load(&mut self, name: &str) -> RuntimeResult<PluginHandle> {
        let path = self.root.join(library_file_name(name));
        let handle = self.load_path(name, &path)?;
        Ok(handle)
    }

    fn load_path(&mut self, name: &str, path: &Path) -> RuntimeResult<PluginHandle> {
        // SAFETY: loading foreign code is inherently unsafe; the host opts in
        // by listing the plugin in its configuration.
        let library = unsafe { Library::new(path) }
            .map_err(|e| RuntimeError::PluginLoad(format!("{}: {e}", path.display())))?;

        let register = unsafe { library.get::<RegisterFn>(REGISTER_SYMBOL) }
            .map_err(|e| RuntimeError::PluginLoad(format!("{name}: missing entry point ({e})")))?;

        let status = unsafe { register() };
        if status != 0 {
            return Err(RuntimeError::PluginLoad(format!(
                "{name}: register returned {status}"
            )));
        }

        let handle = PluginHandle(generate_object_id());
        self.loaded.insert(
            handle,
            LoadedPlugin {
                name: name.to_string(),
                _library: library,
            },
        );
        log::info!("Loaded plugin '{name}' from {}", path.display());
        Ok(handle)
    }

    pub fn name_of(&self, handle: PluginHandle) -> Option<&str> {
        self.loaded.get(&handle).map(|p| p.name.as_str())
    }

    pub fn count(&self) -> usize {
        self.loaded.len()
    }
}

/// Platform library file name for a bare plugin name
pub(crate) fn library_file_name(name: &str) -> String {
    #[cfg(target_os = "windows")]
    {
        format!("{name}.dll")
    }
    #[cfg(target_os = "macos")]
    {
        format!("lib{name}.dylib")
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        format!("lib{name}.so")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_file_name() {
        let file = library_file_name("aw_reverb");
        assert!(file.contains("aw_reverb"));
        #[cfg(target_os = "linux")]
        assert_eq!(file, "libaw_reverb.so");
    }

    #[test]
    fn test_load_missing_plugin_fails() {
        let mut registry = PluginRegistry::new();
        registry.set_root("/nonexistent");

        let err = registry.load("no_such_plugin").unwrap_err();
        assert!(matches!(err, RuntimeError::PluginLoad(_)));
        assert_eq!(registry.count(), 0);
    }
}

// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Persistence of control names, keyed by device id.
//!
//! The YAML file maps each device id to its own name map:
//!
//! ```yaml
//! "port-a":
//!   0x90 0x24: Kick
//!   0xb0 0x4a: Cutoff
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::StoreError;
use crate::recording::ControlNameMap;

type DeviceNames = BTreeMap<String, ControlNameMap>;

/// Load and save control names per device
pub trait ControlNameStore {
    /// Names stored for a device (empty if none)
    fn load_control_names(&self, device_id: &str) -> Result<ControlNameMap, StoreError>;

    /// Replace the names stored for a device, keeping all other devices
    fn save_control_names(&mut self, device_id: &str, names: &ControlNameMap) -> Result<(), StoreError>;
}

/// Control names kept in a YAML file
#[derive(Debug)]
pub struct YamlControlNameStore {
    path: PathBuf,
}

impl YamlControlNameStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<DeviceNames, StoreError> {
        if !self.path.exists() {
            return Ok(DeviceNames::new());
        }
        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(DeviceNames::new());
        }
        Ok(serde_yaml::from_str(&contents)?)
    }
}

impl ControlNameStore for YamlControlNameStore {
    fn load_control_names(&self, device_id: &str) -> Result<ControlNameMap, StoreError> {
        Ok(self.read_all()?.remove(device_id).unwrap_or_default())
    }

    fn save_control_names(&mut self, device_id: &str, names: &ControlNameMap) -> Result<(), StoreError> {
        let mut all = self.read_all()?;
        all.insert(device_id.to_string(), names.clone());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_yaml::to_string(&all)?)?;
        debug!(device = device_id, count = names.len(), "Saved control names");
        Ok(())
    }
}

/// In-memory store, used when no file is wanted
#[derive(Debug, Default)]
pub struct MemoryControlNameStore {
    devices: DeviceNames,
}

impl MemoryControlNameStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ControlNameStore for MemoryControlNameStore {
    fn load_control_names(&self, device_id: &str) -> Result<ControlNameMap, StoreError> {
        Ok(self.devices.get(device_id).cloned().unwrap_or_default())
    }

    fn save_control_names(&mut self, device_id: &str, names: &ControlNameMap) -> Result<(), StoreError> {
        self.devices.insert(device_id.to_string(), names.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::ControlAddress;

    fn names(pairs: &[(&str, &str)]) -> ControlNameMap {
        pairs
            .iter()
            .map(|(a, n)| (ControlAddress::from(*a), n.to_string()))
            .collect()
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = YamlControlNameStore::new(dir.path().join("names.yaml"));
        assert!(store.load_control_names("any").unwrap().is_empty());
    }

    #[test]
    fn test_save_keeps_other_devices() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = YamlControlNameStore::new(dir.path().join("names.yaml"));

        store
            .save_control_names("dev-1", &names(&[("0x90 0x24", "Kick")]))
            .unwrap();
        store
            .save_control_names("dev-2", &names(&[("0xb0 0x4a", "Cutoff")]))
            .unwrap();

        let dev1 = store.load_control_names("dev-1").unwrap();
        assert_eq!(dev1.get(&ControlAddress::from("0x90 0x24")).map(String::as_str), Some("Kick"));
        let dev2 = store.load_control_names("dev-2").unwrap();
        assert_eq!(dev2.len(), 1);
        assert!(store.load_control_names("dev-3").unwrap().is_empty());
    }

    #[test]
    fn test_yaml_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("names.yaml");
        let mut store = YamlControlNameStore::new(&path);
        store
            .save_control_names("port-a", &names(&[("0x90 0x24", "Kick")]))
            .unwrap();

        let raw: BTreeMap<String, BTreeMap<String, String>> =
            serde_yaml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["port-a"]["0x90 0x24"], "Kick");
    }

    #[test]
    fn test_malformed_file_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("names.yaml");
        fs::write(&path, "- just\n- a list\n").unwrap();
        let store = YamlControlNameStore::new(&path);
        assert!(matches!(store.load_control_names("x"), Err(StoreError::Yaml(_))));
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryControlNameStore::new();
        store
            .save_control_names("dev", &names(&[("0xb0 0x1", "Mod")]))
            .unwrap();
        assert_eq!(store.load_control_names("dev").unwrap().len(), 1);
        assert!(store.load_control_names("other").unwrap().is_empty());
    }
}

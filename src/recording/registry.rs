// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Control addresses and their user-assigned names.
//!
//! A control address identifies a distinct controller or note source by the
//! first two bytes of its messages (status + data1). The registry keeps the
//! set of addresses seen on the active recording device together with the
//! names restored for that device.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::midi::{hex_tokens, MidiMessage};

/// Name used for addresses the user has not named yet
pub const UNNAMED_CONTROL: &str = "unnamed";

/// Stable join key between recorded events and control names
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControlAddress(String);

impl ControlAddress {
    /// Derive the address of a message, e.g. `0x90 0x2c`.
    ///
    /// Only the first two bytes contribute; missing bytes are left out.
    pub fn of(message: &MidiMessage) -> Self {
        Self::from_bytes(message.bytes())
    }

    /// Derive an address from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let len = bytes.len().min(2);
        Self(hex_tokens(&bytes[..len]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ControlAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ControlAddress {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Control names for one device
pub type ControlNameMap = BTreeMap<ControlAddress, String>;

/// Name for an address, falling back to the placeholder
pub fn name_in<'a>(names: &'a ControlNameMap, address: &ControlAddress) -> &'a str {
    match names.get(address) {
        Some(name) if !name.is_empty() => name,
        _ => UNNAMED_CONTROL,
    }
}

/// Column/series label: `{name} ({address})`
pub fn label_in(names: &ControlNameMap, address: &ControlAddress) -> String {
    format!("{} ({})", name_in(names, address), address)
}

/// Known control addresses for the active recording device
#[derive(Debug, Clone, Default)]
pub struct ControlRegistry {
    device_id: Option<String>,
    known: BTreeSet<ControlAddress>,
    names: ControlNameMap,
    most_recent: Option<ControlAddress>,
}

impl ControlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Device the registry currently belongs to
    pub fn device_id(&self) -> Option<&str> {
        self.device_id.as_deref()
    }

    /// All addresses seen or named on this device
    pub fn known(&self) -> &BTreeSet<ControlAddress> {
        &self.known
    }

    /// Address of the last recorded message
    pub fn most_recent(&self) -> Option<&ControlAddress> {
        self.most_recent.as_ref()
    }

    /// Name map for this device
    pub fn names(&self) -> &ControlNameMap {
        &self.names
    }

    /// Mark an address as seen. Returns true if it was not known before.
    pub fn register_seen(&mut self, address: ControlAddress) -> bool {
        let added = self.known.insert(address.clone());
        self.most_recent = Some(address);
        added
    }

    pub fn name_for(&self, address: &ControlAddress) -> &str {
        name_in(&self.names, address)
    }

    pub fn label_for(&self, address: &ControlAddress) -> String {
        label_in(&self.names, address)
    }

    /// Assign a display name to an address
    pub fn set_name(&mut self, address: ControlAddress, name: impl Into<String>) -> &ControlNameMap {
        self.known.insert(address.clone());
        self.names.insert(address, name.into());
        &self.names
    }

    /// Replace all state with what was restored for another device.
    ///
    /// The known set becomes exactly the named addresses of the new device.
    pub fn switch_device(&mut self, device_id: Option<String>, names: ControlNameMap) {
        self.known = names.keys().cloned().collect();
        self.names = names;
        self.device_id = device_id;
        self.most_recent = None;
    }
}

// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! MIDI device discovery and input routing.
//!
//! Devices are exposed as plain `DeviceInfo { id, name }` records. The only
//! live handle is the recording input connection owned by `InputRouter`,
//! which guarantees a single active source: the previous connection is
//! closed before the next one is attached, and every delivery carries the
//! generation of the connection that produced it so late arrivals from a
//! detached device can be dropped.

use midir::{Ignore, MidiInput as MidirInput, MidiInputConnection, MidiOutput as MidirOutput};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

use super::MidiMessage;
use crate::error::DeviceError;

const CLIENT_NAME: &str = "midirec";

/// An input or output device as seen by the recorder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Stable port identifier reported by the MIDI backend
    pub id: String,
    /// Display name
    pub name: String,
}

/// A message tagged with the subscription that delivered it
#[derive(Debug, Clone)]
pub struct Delivery {
    pub generation: u64,
    pub message: MidiMessage,
}

/// List all available MIDI inputs.
///
/// Access failures degrade to an empty list.
pub fn list_inputs() -> Vec<DeviceInfo> {
    let midi_in = match MidirInput::new(CLIENT_NAME) {
        Ok(m) => m,
        Err(e) => {
            warn!(error = %e, "MIDI input access unavailable");
            return Vec::new();
        }
    };

    midi_in
        .ports()
        .iter()
        .filter_map(|port| {
            let name = midi_in.port_name(port).ok()?;
            Some(DeviceInfo { id: port.id(), name })
        })
        .collect()
}

/// List all available MIDI outputs.
pub fn list_outputs() -> Vec<DeviceInfo> {
    let midi_out = match MidirOutput::new(CLIENT_NAME) {
        Ok(m) => m,
        Err(e) => {
            warn!(error = %e, "MIDI output access unavailable");
            return Vec::new();
        }
    };

    midi_out
        .ports()
        .iter()
        .filter_map(|port| {
            let name = midi_out.port_name(port).ok()?;
            Some(DeviceInfo { id: port.id(), name })
        })
        .collect()
}

/// Find a device by id, falling back to a numeric index into the list
pub fn resolve_device(devices: &[DeviceInfo], key: &str) -> Option<DeviceInfo> {
    devices
        .iter()
        .find(|d| d.id == key)
        .or_else(|| key.parse::<usize>().ok().and_then(|i| devices.get(i)))
        .cloned()
}

fn print_devices(label: &str, devices: &[DeviceInfo]) {
    if devices.is_empty() {
        println!("No MIDI {} found.", label);
    } else {
        println!("Available MIDI {}:", label);
        for (i, device) in devices.iter().enumerate() {
            println!("  {}: {} [{}]", i, device.name, device.id);
        }
    }
}

/// Print all available MIDI sources to stdout
pub fn print_sources() {
    print_devices("sources (inputs)", &list_inputs());
}

/// Print all available MIDI destinations to stdout
pub fn print_destinations() {
    print_devices("destinations (outputs)", &list_outputs());
}

struct ActiveInput {
    device: DeviceInfo,
    connection: Option<MidiInputConnection<()>>,
}

/// Owns the single live recording input connection
pub struct InputRouter {
    sender: UnboundedSender<Delivery>,
    active: Option<ActiveInput>,
    generation: u64,
}

impl InputRouter {
    /// Create a router forwarding deliveries to `sender`
    pub fn new(sender: UnboundedSender<Delivery>) -> Self {
        Self {
            sender,
            active: None,
            generation: 0,
        }
    }

    /// Currently attached device, if any
    pub fn active_device(&self) -> Option<&DeviceInfo> {
        self.active.as_ref().map(|a| &a.device)
    }

    /// Generation of the current subscription
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Check if a delivery came from the currently attached device
    pub fn is_current(&self, delivery: &Delivery) -> bool {
        self.active.is_some() && delivery.generation == self.generation
    }

    /// Close the current connection, if any.
    pub fn detach(&mut self) {
        if let Some(active) = self.active.take() {
            if let Some(connection) = active.connection {
                connection.close();
            }
            info!(device = %active.device.name, "Detached recording input");
        }
        self.generation += 1;
    }

    /// Attach the input with the given id, detaching the previous one first
    pub fn select(&mut self, device_id: &str) -> Result<DeviceInfo, DeviceError> {
        self.detach();

        let mut midi_in =
            MidirInput::new(CLIENT_NAME).map_err(|e| DeviceError::Init(e.to_string()))?;
        midi_in.ignore(Ignore::None);

        let port = midi_in
            .ports()
            .into_iter()
            .find(|p| p.id() == device_id)
            .ok_or_else(|| DeviceError::PortNotFound(device_id.to_string()))?;
        let name = midi_in
            .port_name(&port)
            .unwrap_or_else(|_| "Unknown".to_string());

        let generation = self.generation;
        let sender = self.sender.clone();
        let connection = midi_in
            .connect(
                &port,
                "midirec-input",
                move |timestamp, bytes, _| {
                    let _ = sender.send(Delivery {
                        generation,
                        message: MidiMessage::from_midir(timestamp, bytes),
                    });
                },
                (),
            )
            .map_err(|e| DeviceError::Connect(e.to_string()))?;

        let device = DeviceInfo {
            id: device_id.to_string(),
            name,
        };
        Ok(self.attach(device, Some(connection)))
    }

    /// Record `device` as active for the current generation.
    ///
    /// Must follow a `detach`; the connection (if any) has to tag its
    /// deliveries with `generation()`.
    pub(crate) fn attach(
        &mut self,
        device: DeviceInfo,
        connection: Option<MidiInputConnection<()>>,
    ) -> DeviceInfo {
        info!(device = %device.name, generation = self.generation, "Attached recording input");
        self.active = Some(ActiveInput {
            device: device.clone(),
            connection,
        });
        device
    }
}

impl Drop for InputRouter {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn devices() -> Vec<DeviceInfo> {
        vec![
            DeviceInfo {
                id: "port-a".to_string(),
                name: "Synth A".to_string(),
            },
            DeviceInfo {
                id: "port-b".to_string(),
                name: "Controller B".to_string(),
            },
        ]
    }

    #[test]
    fn test_resolve_device_by_id() {
        let found = resolve_device(&devices(), "port-b").unwrap();
        assert_eq!(found.name, "Controller B");
    }

    #[test]
    fn test_resolve_device_by_index() {
        let found = resolve_device(&devices(), "0").unwrap();
        assert_eq!(found.id, "port-a");
        assert!(resolve_device(&devices(), "7").is_none());
        assert!(resolve_device(&devices(), "missing").is_none());
    }

    #[test]
    fn test_router_without_device_rejects_deliveries() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let router = InputRouter::new(tx);
        let delivery = Delivery {
            generation: router.generation(),
            message: MidiMessage::new(0.0, vec![0xF8]),
        };
        assert!(router.active_device().is_none());
        assert!(!router.is_current(&delivery));
    }

    #[test]
    fn test_reselect_rejects_previous_generation() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut router = InputRouter::new(tx);
        let [a, b] = <[DeviceInfo; 2]>::try_from(devices()).unwrap();

        router.detach();
        router.attach(a, None);
        let old = Delivery {
            generation: router.generation(),
            message: MidiMessage::new(0.0, vec![0xF8]),
        };
        assert!(router.is_current(&old));

        router.detach();
        router.attach(b, None);
        let new = Delivery {
            generation: router.generation(),
            message: MidiMessage::new(0.0, vec![0xF8]),
        };
        assert!(!router.is_current(&old));
        assert!(router.is_current(&new));
        assert_eq!(router.active_device().map(|d| d.id.as_str()), Some("port-b"));

        router.detach();
        assert!(!router.is_current(&new));
    }

    #[test]
    fn test_detach_bumps_generation() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut router = InputRouter::new(tx);
        let before = router.generation();
        router.detach();
        assert_eq!(router.generation(), before + 1);
    }

    #[test]
    fn test_select_unknown_port_fails() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut router = InputRouter::new(tx);
        // Either MIDI is unavailable here or the port does not exist
        assert!(router.select("no-such-port").is_err());
        assert!(router.active_device().is_none());
    }
}

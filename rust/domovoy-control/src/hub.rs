//! The hub seam and an in-memory hub.
//!
//! [`DeviceControl`] is what the dispatcher needs from a home-automation
//! hub: carry out an action and report human titles. [`MemoryHub`] keeps
//! device state in process and follows the hub's level rules, which makes it
//! usable both as a console simulator and as a test double.

use std::collections::{BTreeMap, HashMap};

use domovoy_nlp::{Command, LocationId, Rgb};
use parking_lot::Mutex;
use tracing::debug;

use crate::action::Action;
use crate::error::ControlError;
use crate::inventory::{Inventory, MAX_LEVEL, MIN_LEVEL};

/// Step applied by dimmer up/down commands.
pub const LEVEL_STEP: u8 = 10;

pub trait DeviceControl: Send + Sync {
    fn apply(&self, action: &Action) -> Result<(), ControlError>;

    /// Title of a device as the hub names it.
    fn device_title(&self, id: &str) -> Option<String>;

    /// Title of a location as the hub names it.
    fn location_title(&self, id: LocationId) -> Option<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceState {
    pub title: String,
    pub device_type: String,
    pub location: LocationId,
    pub level: u8,
    pub color: Option<Rgb>,
}

impl DeviceState {
    /// A toggle button has no persistent state and always counts as off.
    fn is_on(&self) -> bool {
        self.device_type != "toggleButton" && self.level != MIN_LEVEL
    }
}

#[derive(Debug, Default)]
pub struct MemoryHub {
    devices: Mutex<BTreeMap<String, DeviceState>>,
    locations: HashMap<LocationId, String>,
}

impl MemoryHub {
    pub fn from_inventory(inventory: &Inventory) -> Self {
        let devices = inventory
            .controllable_devices()
            .map(|d| {
                (
                    d.id.clone(),
                    DeviceState {
                        title: d.metrics.title.clone(),
                        device_type: d.device_type.clone(),
                        location: d.location,
                        level: d.metrics.level,
                        color: None,
                    },
                )
            })
            .collect();
        let locations = inventory
            .locations
            .iter()
            .map(|l| (l.id, l.title.clone()))
            .collect();

        MemoryHub {
            devices: Mutex::new(devices),
            locations,
        }
    }

    pub fn state(&self, id: &str) -> Option<DeviceState> {
        self.devices.lock().get(id).cloned()
    }

    /// `(id, state)` for every device, in id order.
    pub fn states(&self) -> Vec<(String, DeviceState)> {
        self.devices
            .lock()
            .iter()
            .map(|(id, state)| (id.clone(), state.clone()))
            .collect()
    }

    /// Location titles, in id order.
    pub fn location_titles(&self) -> Vec<String> {
        let mut locations: Vec<_> = self.locations.iter().collect();
        locations.sort_by_key(|(id, _)| **id);
        locations.into_iter().map(|(_, title)| title.clone()).collect()
    }
}

fn step(level: u8, up: bool) -> u8 {
    if up {
        level.saturating_add(LEVEL_STEP).min(MAX_LEVEL)
    } else {
        level.saturating_sub(LEVEL_STEP).max(MIN_LEVEL)
    }
}

impl DeviceControl for MemoryHub {
    fn apply(&self, action: &Action) -> Result<(), ControlError> {
        let mut devices = self.devices.lock();
        let state = devices
            .get_mut(&action.device)
            .ok_or_else(|| ControlError::UnknownDevice(action.device.clone()))?;

        let unsupported = || ControlError::Unsupported {
            device: action.device.clone(),
            command: action.command.to_string(),
        };

        match action.command {
            Command::On => state.level = MAX_LEVEL,
            Command::Off => state.level = MIN_LEVEL,
            Command::Toggle => {
                state.level = if state.is_on() { MIN_LEVEL } else { MAX_LEVEL };
            }
            Command::Rgb(rgb) => {
                if state.device_type != "switchRGBW" {
                    return Err(unsupported());
                }
                state.color = Some(rgb);
            }
            Command::DimmerUp | Command::DimmerDown | Command::DimmerMax => {
                if state.device_type != "switchMultilevel" {
                    return Err(unsupported());
                }
                state.level = match action.command {
                    Command::DimmerUp => step(state.level, true),
                    Command::DimmerDown => step(state.level, false),
                    _ => MAX_LEVEL,
                };
            }
        }

        debug!(device = %action.device, command = %action.command, level = state.level, "applied action");
        Ok(())
    }

    fn device_title(&self, id: &str) -> Option<String> {
        self.devices.lock().get(id).map(|d| d.title.clone())
    }

    fn location_title(&self, id: LocationId) -> Option<String> {
        self.locations.get(&id).cloned()
    }
}

//! Action descriptors — what a resolution asks the hub to do.
//!
//! Planning does not touch the hub. A [`Resolution`] becomes a list of
//! [`Action`]s, one per device, which a [`DeviceControl`] implementation then
//! carries out. A resolution without a recognized command toggles its devices.
//!
//! [`DeviceControl`]: crate::hub::DeviceControl

use std::fmt;

use domovoy_nlp::{Command, DeviceId, Resolution};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub device: DeviceId,
    pub command: Command,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.command, self.device)
    }
}

/// Turn a resolution into per-device actions.
pub fn plan(resolution: &Resolution) -> Vec<Action> {
    let command = resolution
        .command
        .as_ref()
        .map_or(Command::Toggle, |def| def.command);

    resolution
        .devices
        .iter()
        .map(|device| Action {
            device: device.clone(),
            command,
        })
        .collect()
}

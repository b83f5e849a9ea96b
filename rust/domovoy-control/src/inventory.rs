//! Hub inventory — the locations and devices the hub reports.
//!
//! The JSON shape follows the hub's device listing, with a device's title
//! and level nested under `metrics`:
//!
//! ```json
//! {
//!   "locations": [{ "id": 7, "title": "Кухня" }],
//!   "devices": [{
//!     "id": "ZWayVDev_zway_5-0-37",
//!     "deviceType": "switchBinary",
//!     "location": 7,
//!     "metrics": { "title": "Лампа", "level": "on" }
//!   }]
//! }
//! ```

use domovoy_nlp::{Engine, LocationId};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use crate::error::ControlError;

/// Highest level a hub device accepts.
pub const MAX_LEVEL: u8 = 99;

/// Lowest level a hub device accepts.
pub const MIN_LEVEL: u8 = 0;

/// Device types Domovoy knows how to drive.
pub const CONTROLLABLE_TYPES: [&str; 5] = [
    "switchRGBW",
    "switchMultilevel",
    "toggleButton",
    "switchBinary",
    "thermostat",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryLocation {
    pub id: LocationId,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "level")]
    pub level: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryDevice {
    pub id: String,
    pub device_type: String,
    #[serde(default)]
    pub location: LocationId,
    #[serde(default)]
    pub metrics: Metrics,
    #[serde(default = "visible")]
    pub visibility: bool,
    #[serde(default, rename = "permanently_hidden")]
    pub permanently_hidden: bool,
}

fn visible() -> bool {
    true
}

/// Decode a level that the hub reports as a number, `"on"`, `"off"`, `""` or `null`.
fn level<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None => MIN_LEVEL,
        Some(Raw::Number(n)) => n.clamp(MIN_LEVEL as f64, MAX_LEVEL as f64) as u8,
        Some(Raw::Text(text)) => match text.as_str() {
            "on" => MAX_LEVEL,
            "off" | "" => MIN_LEVEL,
            other => other
                .parse::<f64>()
                .map(|n| n.clamp(MIN_LEVEL as f64, MAX_LEVEL as f64) as u8)
                .map_err(serde::de::Error::custom)?,
        },
    })
}

impl InventoryDevice {
    /// Visible, not hidden, and of a type Domovoy can drive.
    pub fn is_controllable(&self) -> bool {
        self.visibility
            && !self.permanently_hidden
            && CONTROLLABLE_TYPES.contains(&self.device_type.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default)]
    pub locations: Vec<InventoryLocation>,
    #[serde(default)]
    pub devices: Vec<InventoryDevice>,
}

impl Inventory {
    pub fn from_json(json: &str) -> Result<Self, ControlError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn controllable_devices(&self) -> impl Iterator<Item = &InventoryDevice> {
        self.devices.iter().filter(|d| d.is_controllable())
    }

    /// Register all locations, then every controllable device, with `engine`.
    ///
    /// A device in a location the listing does not contain is skipped.
    /// Returns the number of devices registered.
    pub fn register_into(&self, engine: &Engine) -> usize {
        for location in &self.locations {
            let title = engine.register_location(location.id, &location.title);
            debug!(id = location.id, %title, name = %location.title, "registered location");
        }

        let mut registered = 0;
        for device in self.controllable_devices() {
            let title = match engine.register_device(
                &device.id,
                &device.metrics.title,
                &device.device_type,
                device.location,
            ) {
                Ok(title) => title,
                Err(error) => {
                    warn!(id = %device.id, location = device.location, %error, "skipping device in unknown location");
                    continue;
                }
            };
            debug!(
                id = %device.id,
                device_type = %device.device_type,
                location = device.location,
                %title,
                name = %device.metrics.title,
                level = device.metrics.level,
                "registered device"
            );
            registered += 1;
        }
        registered
    }
}

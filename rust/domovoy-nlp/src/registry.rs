//! Known locations and devices, keyed by id.
//!
//! The registry is filled from the hub inventory at startup and may be
//! refreshed by re-registering ids; nothing is ever removed. Titles are stored
//! normalized, and a device title never keeps a token that also names a
//! location, so a room word in the phrase is only counted once, against the
//! location.

use std::collections::{BTreeMap, HashMap};

use crate::error::NlpError;
use crate::token::{Tokens, normalize};

/// Hub location identifier.
pub type LocationId = u32;

/// Hub device identifier.
pub type DeviceId = String;

/// The pseudo-location meaning "no constraint, everywhere".
pub const EVERYWHERE: LocationId = 0;

/// Title given to [`EVERYWHERE`] regardless of what the hub reports.
pub const EVERYWHERE_LABEL: &str = "везде";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub id: LocationId,
    pub title: Tokens,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub id: DeviceId,
    /// Normalized title with location tokens removed.
    pub title: Tokens,
    pub device_type: String,
    pub location: LocationId,
}

#[derive(Debug, Clone)]
pub struct Registry {
    locations: BTreeMap<LocationId, Location>,
    devices: BTreeMap<DeviceId, Device>,
    location_names: HashMap<String, LocationId>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Create a registry that already knows the [`EVERYWHERE`] location.
    pub fn new() -> Self {
        let mut registry = Registry {
            locations: BTreeMap::new(),
            devices: BTreeMap::new(),
            location_names: HashMap::new(),
        };
        registry.add_location(EVERYWHERE, EVERYWHERE_LABEL);
        registry
    }

    /// Register (or replace) a location and return its normalized title.
    pub fn add_location(&mut self, id: LocationId, title: &str) -> Tokens {
        let title = if id == EVERYWHERE {
            normalize(EVERYWHERE_LABEL)
        } else {
            normalize(title)
        };

        if let Some(previous) = self.locations.get(&id) {
            let stale = previous.title.to_string();
            if self.location_names.get(&stale) == Some(&id) {
                self.location_names.remove(&stale);
            }
        }

        for device in self.devices.values_mut() {
            device.title.retain(|t| !title.contains(t));
        }

        self.location_names.insert(title.to_string(), id);
        self.locations.insert(
            id,
            Location {
                id,
                title: title.clone(),
            },
        );
        title
    }

    /// Register (or replace) a device and return its matchable title.
    ///
    /// Every token that also appears in a registered location title is
    /// dropped from the device title.
    pub fn add_device(
        &mut self,
        id: &str,
        title: &str,
        device_type: &str,
        location: LocationId,
    ) -> Result<Tokens, NlpError> {
        if !self.locations.contains_key(&location) {
            return Err(NlpError::UnknownLocation {
                device: id.to_string(),
                location,
            });
        }

        let mut title = normalize(title);
        title.retain(|t| !self.is_location_token(t));

        self.devices.insert(
            id.to_string(),
            Device {
                id: id.to_string(),
                title: title.clone(),
                device_type: device_type.to_string(),
                location,
            },
        );
        Ok(title)
    }

    fn is_location_token(&self, token: &str) -> bool {
        self.locations.values().any(|l| l.title.contains(token))
    }

    /// Normalized title of a location, if it is registered.
    pub fn location_title(&self, id: LocationId) -> Option<&Tokens> {
        self.locations.get(&id).map(|l| &l.title)
    }

    /// Resolve a human title through the normalized title index.
    pub fn location_id_by_title(&self, title: &str) -> Option<LocationId> {
        self.location_names.get(&normalize(title).to_string()).copied()
    }

    pub fn location(&self, id: LocationId) -> Option<&Location> {
        self.locations.get(&id)
    }

    pub fn device(&self, id: &str) -> Option<&Device> {
        self.devices.get(id)
    }

    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.locations.values()
    }

    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.devices.values()
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }
}

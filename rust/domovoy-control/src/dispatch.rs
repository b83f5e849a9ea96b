//! Phrase → hub round trip.
//!
//! The dispatcher asks the engine for a resolution, plans actions from it and
//! hands them to a [`DeviceControl`]. The [`Reply`] it returns is what the
//! front end shows the user.

use std::fmt;
use std::sync::Arc;

use domovoy_nlp::Engine;
use tracing::{info, warn};

use crate::action::plan;
use crate::hub::DeviceControl;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// A recognized command was sent to the devices.
    Executed {
        trigger: String,
        devices: Vec<String>,
        locations: Vec<String>,
    },
    /// No command word, so the devices were toggled.
    Toggled { devices: Vec<String> },
    NotUnderstood,
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Executed {
                trigger,
                devices,
                locations,
            } => write!(
                f,
                "Выполняю '{}' на '{}' в '{}'",
                trigger,
                devices.join(", "),
                locations.join(", ")
            ),
            Reply::Toggled { devices } => {
                write!(f, "Переключаю устройство '{}'", devices.join(", "))
            }
            Reply::NotUnderstood => write!(f, "Не понял команду"),
        }
    }
}

pub struct Dispatcher {
    engine: Arc<Engine>,
    hub: Arc<dyn DeviceControl>,
}

impl Dispatcher {
    pub fn new(engine: Arc<Engine>, hub: Arc<dyn DeviceControl>) -> Self {
        Dispatcher { engine, hub }
    }

    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    /// Resolve `phrase` for `sender` and carry out the result.
    ///
    /// A device the hub fails to drive is logged and skipped; the remaining
    /// actions still run.
    pub fn handle(&self, phrase: &str, sender: &str) -> Reply {
        let Some(resolution) = self.engine.process_phrase(phrase, sender) else {
            info!(%sender, %phrase, "phrase not understood");
            return Reply::NotUnderstood;
        };

        for action in plan(&resolution) {
            match self.hub.apply(&action) {
                Ok(()) => info!(%sender, %action, "applied"),
                Err(error) => warn!(%sender, %action, %error, "hub refused action"),
            }
        }

        let devices = resolution
            .devices
            .iter()
            .map(|id| self.hub.device_title(id).unwrap_or_else(|| id.clone()))
            .collect();

        match resolution.command {
            Some(def) => Reply::Executed {
                trigger: def.trigger,
                devices,
                locations: resolution
                    .locations
                    .iter()
                    .map(|id| {
                        self.hub
                            .location_title(*id)
                            .unwrap_or_else(|| id.to_string())
                    })
                    .collect(),
            },
            None => Reply::Toggled { devices },
        }
    }
}

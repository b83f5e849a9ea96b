//! Resolved phrase — the output of the interpretation engine.

use std::fmt;

use crate::command::CommandDef;
use crate::registry::{DeviceId, LocationId};

/// Devices, locations and command a phrase was resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Resolved device ids, in ascending id order.
    pub devices: Vec<DeviceId>,
    pub locations: Vec<LocationId>,
    /// The matched command row. `None` means no verb was recognized and the
    /// caller should fall back to toggling the devices.
    pub command: Option<CommandDef>,
    /// Device score of the accepted round; zero when the devices came from
    /// the sender's context.
    pub score: i64,
}

impl Resolution {
    /// Whether the devices were taken from context instead of phrase words.
    pub fn from_context(&self) -> bool {
        self.score == 0
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.command {
            Some(def) => write!(f, "{}", def.command)?,
            None => write!(f, "default")?,
        }
        write!(f, " [{}]", self.devices.join(", "))?;
        write!(f, " in {:?} (score: {})", self.locations, self.score)
    }
}

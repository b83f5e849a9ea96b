//! Commands and the trigger-word table.
//!
//! A command definition ties a trigger word to the device types it applies
//! to and to the [`Command`] it performs. The table is static data, loaded
//! once; lookup walks it in order and the last matching row wins, so later
//! rows override earlier ones that share a trigger.
//!
//! ```
//! use domovoy_nlp::command::{CommandKind, CommandTable, WILDCARD_TYPE};
//!
//! let table = CommandTable::builtin();
//! let def = table.lookup(&domovoy_nlp::token::normalize("выключи свет"), WILDCARD_TYPE).unwrap();
//! assert_eq!(def.command.kind(), CommandKind::Off);
//! ```

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::NlpError;
use crate::token::{Tokens, stem};

/// Device type that matches every command definition when used as a query.
pub const WILDCARD_TYPE: &str = "*";

/// Colour payload for [`Command::Rgb`], channels in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// What to do with the resolved devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Command {
    On,
    Off,
    Toggle,
    Rgb(Rgb),
    DimmerUp,
    DimmerDown,
    DimmerMax,
}

/// Payload-free discriminant of [`Command`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    On,
    Off,
    Toggle,
    Rgb,
    DimmerUp,
    DimmerDown,
    DimmerMax,
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::On => CommandKind::On,
            Command::Off => CommandKind::Off,
            Command::Toggle => CommandKind::Toggle,
            Command::Rgb(_) => CommandKind::Rgb,
            Command::DimmerUp => CommandKind::DimmerUp,
            Command::DimmerDown => CommandKind::DimmerDown,
            Command::DimmerMax => CommandKind::DimmerMax,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::On => write!(f, "on"),
            Command::Off => write!(f, "off"),
            Command::Toggle => write!(f, "toggle"),
            Command::Rgb(Rgb { r, g, b }) => write!(f, "rgb({r}, {g}, {b})"),
            Command::DimmerUp => write!(f, "dimmer up"),
            Command::DimmerDown => write!(f, "dimmer down"),
            Command::DimmerMax => write!(f, "dimmer max"),
        }
    }
}

/// Device types a command applies to.
///
/// Serialized as a list of type names, where `["*"]` means any type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub enum DeviceTypes {
    Any,
    Only(BTreeSet<String>),
}

impl DeviceTypes {
    /// A non-empty set of concrete types; a `"*"` entry widens it to [`DeviceTypes::Any`].
    pub fn only<I, S>(types: I) -> Result<Self, NlpError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let types: BTreeSet<String> = types.into_iter().map(Into::into).collect();
        if types.contains(WILDCARD_TYPE) {
            Ok(DeviceTypes::Any)
        } else if types.is_empty() {
            Err(NlpError::EmptyDeviceTypes)
        } else {
            Ok(DeviceTypes::Only(types))
        }
    }

    fn single(device_type: &str) -> Self {
        DeviceTypes::Only(BTreeSet::from([device_type.to_string()]))
    }

    /// Whether a query for `device_type` is served by this set.
    pub fn accepts(&self, device_type: &str) -> bool {
        match self {
            DeviceTypes::Any => true,
            DeviceTypes::Only(_) if device_type == WILDCARD_TYPE => true,
            DeviceTypes::Only(types) => types.contains(device_type),
        }
    }
}

impl TryFrom<Vec<String>> for DeviceTypes {
    type Error = NlpError;

    fn try_from(types: Vec<String>) -> Result<Self, Self::Error> {
        DeviceTypes::only(types)
    }
}

impl From<DeviceTypes> for Vec<String> {
    fn from(types: DeviceTypes) -> Self {
        match types {
            DeviceTypes::Any => vec![WILDCARD_TYPE.to_string()],
            DeviceTypes::Only(types) => types.into_iter().collect(),
        }
    }
}

/// One row of the command table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDef {
    /// The trigger as written in the table.
    pub trigger: String,
    pub device_types: DeviceTypes,
    pub command: Command,
}

impl CommandDef {
    pub fn new(trigger: impl Into<String>, device_types: DeviceTypes, command: Command) -> Self {
        CommandDef {
            trigger: trigger.into(),
            device_types,
            command,
        }
    }
}

/// Ordered command table with trigger stems precomputed.
#[derive(Debug, Clone)]
pub struct CommandTable {
    rows: Vec<(String, CommandDef)>,
}

impl CommandTable {
    pub fn from_defs(defs: Vec<CommandDef>) -> Self {
        let rows = defs
            .into_iter()
            .map(|def| (stem(&def.trigger), def))
            .collect();
        CommandTable { rows }
    }

    pub fn defs(&self) -> impl Iterator<Item = &CommandDef> {
        self.rows.iter().map(|(_, def)| def)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Find the command a phrase asks for on a device of `device_type`.
    ///
    /// Every phrase token is checked against every row in table order and the
    /// last match encountered wins. Pass [`WILDCARD_TYPE`] to ask whether the
    /// phrase carries any known command word at all.
    pub fn lookup(&self, phrase: &Tokens, device_type: &str) -> Option<&CommandDef> {
        let mut found = None;
        for token in phrase.iter() {
            for (trigger, def) in &self.rows {
                if def.device_types.accepts(device_type) && trigger == token {
                    found = Some(def);
                }
            }
        }

        match found {
            Some(def) => debug!(trigger = %def.trigger, device_type, "looked up command"),
            None if device_type == WILDCARD_TYPE => debug!(phrase = %phrase, "no command word in phrase"),
            None => {}
        }
        found
    }

    /// The bilingual table shipped with the engine.
    pub fn builtin() -> Self {
        let any = || DeviceTypes::Any;
        let button = || DeviceTypes::single("toggleButton");
        let dimmer = || DeviceTypes::single("switchMultilevel");
        let rgbw = || DeviceTypes::single("switchRGBW");
        let rgb = |r, g, b| Command::Rgb(Rgb { r, g, b });

        Self::from_defs(vec![
            CommandDef::new("run", button(), Command::On),
            CommandDef::new("on", any(), Command::On),
            CommandDef::new("off", any(), Command::Off),
            CommandDef::new("lighter", dimmer(), Command::DimmerUp),
            CommandDef::new("darker", dimmer(), Command::DimmerDown),
            CommandDef::new("maximum", dimmer(), Command::DimmerMax),
            CommandDef::new("red", rgbw(), rgb(100, 0, 0)),
            CommandDef::new("dark blue", rgbw(), rgb(0, 0, 100)),
            CommandDef::new("green", rgbw(), rgb(0, 100, 0)),
            CommandDef::new("blue", rgbw(), rgb(0, 100, 100)),
            CommandDef::new("white", rgbw(), rgb(100, 100, 100)),
            CommandDef::new("yellow", rgbw(), rgb(100, 100, 0)),
            CommandDef::new("violet", rgbw(), rgb(100, 0, 100)),
            CommandDef::new("запуск", button(), Command::On),
            CommandDef::new("включи", any(), Command::On),
            CommandDef::new("зажги", any(), Command::On),
            CommandDef::new("погаси", any(), Command::Off),
            CommandDef::new("отключи", any(), Command::Off),
            CommandDef::new("выключи", any(), Command::Off),
            CommandDef::new("ярче", dimmer(), Command::DimmerUp),
            CommandDef::new("светлее", dimmer(), Command::DimmerUp),
            CommandDef::new("темнее", dimmer(), Command::DimmerDown),
            CommandDef::new("максимум", dimmer(), Command::DimmerMax),
            CommandDef::new("больше", dimmer(), Command::DimmerUp),
            CommandDef::new("меньше", dimmer(), Command::DimmerDown),
            CommandDef::new("красный", rgbw(), rgb(100, 0, 0)),
            CommandDef::new("синий", rgbw(), rgb(0, 0, 100)),
            CommandDef::new("зеленый", rgbw(), rgb(0, 100, 0)),
            CommandDef::new("голубой", rgbw(), rgb(0, 100, 100)),
            CommandDef::new("белый", rgbw(), rgb(100, 100, 100)),
            CommandDef::new("желтый", rgbw(), rgb(100, 100, 0)),
            CommandDef::new("фиолетовый", rgbw(), rgb(100, 0, 100)),
        ])
    }
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::builtin()
    }
}

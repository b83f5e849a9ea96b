//! # Domovoy NLP — phrase interpretation for a smart home
//!
//! Maps free-form phrases, typed into a chat or transcribed from voice, onto
//! an action: which devices, in which rooms, doing what.
//!
//! ## Core Ideas
//!
//! - **Everything is tokens**: titles and phrases are normalized into
//!   stemmed words and compared as multisets.
//! - **Locations first**: room words in a phrase narrow the device search;
//!   devices elsewhere are penalized, not excluded.
//! - **Verbs must fit**: when the recognized command word does not apply to
//!   the best-matching device type, that device is set aside and the next
//!   best candidate is tried.
//! - **Short memory**: each sender's last resolution is reused for about a
//!   minute, so "turn it off" or "brighter" work as follow-ups.
//!
//! ## Architecture
//!
//! ```text
//! Phrase → normalize → locations (score | context | default)
//!   → devices (score − penalty | context) ⇄ command lookup
//!     → context update → Resolution
//! ```
//!
//! ## Example
//!
//! ```
//! use domovoy_nlp::{Engine, command::CommandKind};
//!
//! let engine = Engine::default();
//! engine.register_location(7, "Кухня");
//! engine.register_device("D1", "Лампа", "switchBinary", 7).unwrap();
//!
//! let resolution = engine.process_phrase("включи лампу в кухне", "alice").unwrap();
//! assert_eq!(resolution.devices, vec!["D1".to_string()]);
//! assert_eq!(resolution.command.unwrap().command.kind(), CommandKind::On);
//!
//! let follow_up = engine.process_phrase("выключи", "alice").unwrap();
//! assert_eq!(follow_up.devices, vec!["D1".to_string()]);
//! assert_eq!(follow_up.command.unwrap().command.kind(), CommandKind::Off);
//! ```

pub mod command;
pub mod context;
pub mod engine;
pub mod error;
pub mod registry;
pub mod resolution;
pub mod score;
pub mod token;

pub use command::{Command, CommandDef, CommandKind, CommandTable, DeviceTypes, Rgb, WILDCARD_TYPE};
pub use engine::{Engine, EngineConfig};
pub use error::NlpError;
pub use registry::{DeviceId, EVERYWHERE, LocationId};
pub use resolution::Resolution;

//! # Domovoy Control — the hub side of Domovoy
//!
//! Feeds a hub inventory into a [`domovoy_nlp::Engine`] and turns its
//! resolutions into device actions.
//!
//! ```text
//! Inventory ──register_into──▶ Engine
//! phrase ─▶ Dispatcher ─▶ Engine::process_phrase ─▶ plan ─▶ DeviceControl
//!                │
//!                └─▶ Reply
//! ```

pub mod action;
pub mod dispatch;
pub mod error;
pub mod hub;
pub mod inventory;

pub use action::{Action, plan};
pub use dispatch::{Dispatcher, Reply};
pub use error::ControlError;
pub use hub::{DeviceControl, DeviceState, MemoryHub};
pub use inventory::{Inventory, InventoryDevice, InventoryLocation};

//! # Domovoy CLI
//!
//! A console front end for Domovoy. It loads a hub inventory, keeps device
//! state in memory and answers phrases typed on stdin.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin domovoy -- --inventory demos/home.json \
//!     --default-location console=Кухня
//! ```
//!
//! ## Commands
//!
//! - `/start` - Greeting
//! - `/rooms` - List rooms known to the hub
//! - `/devices` - List devices with their levels
//! - anything else - A phrase such as `включи свет на кухне`

pub mod bootstrap;
pub mod console;

mod cli;
pub use cli::*;

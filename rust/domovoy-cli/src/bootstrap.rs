//! Startup: read data files, build the engine and the hub, bind default rooms.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use domovoy_control::{Inventory, MemoryHub};
use domovoy_nlp::{CommandDef, CommandTable, Engine, EngineConfig};
use tracing::info;

use crate::cli::{DefaultLocation, DomovoyCli};

/// A running home: the engine that reads phrases and the hub it drives.
pub struct Home {
    pub engine: Arc<Engine>,
    pub hub: Arc<MemoryHub>,
}

impl Home {
    /// Register `inventory` with a fresh engine and bind `defaults`.
    ///
    /// A default binding naming an unknown room is an error.
    pub fn build(
        inventory: &Inventory,
        commands: CommandTable,
        config: EngineConfig,
        defaults: &[DefaultLocation],
    ) -> Result<Self> {
        let engine = Arc::new(Engine::with_config(commands, config));
        let registered = inventory.register_into(&engine);
        info!(registered, "registered inventory");

        for binding in defaults {
            let location = engine
                .bind_default_location(&binding.sender, &binding.title)
                .with_context(|| format!("invalid default location for '{}'", binding.sender))?;
            info!(sender = %binding.sender, title = %binding.title, location, "bound default location");
        }

        let hub = Arc::new(MemoryHub::from_inventory(inventory));
        Ok(Home { engine, hub })
    }

    pub fn from_cli(cli: &DomovoyCli) -> Result<Self> {
        let inventory = load_inventory(&cli.inventory)?;
        let commands = match &cli.commands {
            Some(path) => load_commands(path)?,
            None => CommandTable::builtin(),
        };
        let config = EngineConfig {
            context_ttl: Duration::from_secs(cli.context_ttl),
        };

        info!(
            locations = inventory.locations.len(),
            devices = inventory.controllable_devices().count(),
            commands = commands.len(),
            "loaded home"
        );
        Home::build(&inventory, commands, config, &cli.default_locations)
    }
}

pub fn load_inventory(path: &Path) -> Result<Inventory> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read inventory {}", path.display()))?;
    Inventory::from_json(&json).with_context(|| format!("bad inventory {}", path.display()))
}

pub fn load_commands(path: &Path) -> Result<CommandTable> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read commands {}", path.display()))?;
    let defs: Vec<CommandDef> = serde_json::from_str(&json)
        .with_context(|| format!("bad command table {}", path.display()))?;
    Ok(CommandTable::from_defs(defs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use testresult::TestResult;

    const INVENTORY: &str = r#"{
        "locations": [{"id": 7, "title": "Кухня"}],
        "devices": [{"id": "D1", "deviceType": "switchBinary", "location": 7,
                     "metrics": {"title": "Лампа", "level": "off"}}]
    }"#;

    fn binding(sender: &str, title: &str) -> DefaultLocation {
        DefaultLocation {
            sender: sender.into(),
            title: title.into(),
        }
    }

    #[test]
    fn binds_known_default_location() -> TestResult {
        let inventory = Inventory::from_json(INVENTORY)?;
        let home = Home::build(
            &inventory,
            CommandTable::builtin(),
            EngineConfig::default(),
            &[binding("alice", "Кухня")],
        )?;

        let context = home.engine.contexts().snapshot("alice").ok_or("context bound")?;
        assert_eq!(context.default_location, 7);
        assert!(home.hub.state("D1").is_some());
        Ok(())
    }

    #[test]
    fn unknown_default_location_is_fatal() -> TestResult {
        let inventory = Inventory::from_json(INVENTORY)?;
        let result = Home::build(
            &inventory,
            CommandTable::builtin(),
            EngineConfig::default(),
            &[binding("alice", "Чердак")],
        );
        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn device_in_unknown_room_does_not_stop_startup() -> TestResult {
        let inventory = Inventory::from_json(
            r#"{"locations": [{"id": 7, "title": "Кухня"}],
                "devices": [
                {"id": "D9", "deviceType": "switchBinary", "location": 42,
                 "metrics": {"title": "Торшер"}},
                {"id": "D1", "deviceType": "switchBinary", "location": 7,
                 "metrics": {"title": "Лампа"}}
            ]}"#,
        )?;
        let home = Home::build(
            &inventory,
            CommandTable::builtin(),
            EngineConfig::default(),
            &[binding("alice", "Кухня")],
        )?;

        let resolution = home
            .engine
            .process_phrase("включи лампу", "alice")
            .ok_or("lamp should resolve")?;
        assert_eq!(resolution.devices, vec!["D1".to_string()]);
        Ok(())
    }

    #[test]
    fn missing_inventory_file_is_reported() {
        let result = load_inventory(Path::new("/nonexistent/domovoy/home.json"));
        assert!(result.is_err());
    }
}

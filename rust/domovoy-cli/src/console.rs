//! Line-oriented chat with the home.
//!
//! Slash commands inspect the hub. Every other line is a phrase for the
//! dispatcher.

use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::Result;
use domovoy_control::{DeviceControl, Dispatcher, MemoryHub};
use tracing::debug;

use crate::bootstrap::Home;

pub const GREETING: &str = "Привет, я умею управлять умным домом.";

pub struct Console {
    dispatcher: Dispatcher,
    hub: Arc<MemoryHub>,
    sender: String,
}

impl Console {
    pub fn new(home: Home, sender: impl Into<String>) -> Self {
        let hub_control: Arc<dyn DeviceControl> = home.hub.clone();
        Console {
            dispatcher: Dispatcher::new(home.engine, hub_control),
            hub: home.hub,
            sender: sender.into(),
        }
    }

    /// Answer one input line.
    pub fn respond(&self, line: &str) -> String {
        match line.trim() {
            "/start" => GREETING.to_string(),
            "/rooms" => self.hub.location_titles().join("\n"),
            "/devices" => self
                .hub
                .states()
                .iter()
                .map(|(_, state)| format!("{} - {}", state.title, state.level))
                .collect::<Vec<_>>()
                .join("\n"),
            phrase => self.dispatcher.handle(phrase, &self.sender).to_string(),
        }
    }

    /// Answer lines from `input` until it ends.
    pub fn run(&self, input: impl BufRead, mut output: impl Write) -> Result<()> {
        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            debug!(sender = %self.sender, %line, "console input");
            writeln!(output, "{}", self.respond(&line))?;
            output.flush()?;
        }
        Ok(())
    }
}

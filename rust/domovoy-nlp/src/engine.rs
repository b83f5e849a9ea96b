//! The interpretation engine — from a raw phrase to devices and a command.
//!
//! Resolution runs in stages, each logged with what it matched:
//!
//! ```text
//! Normalize → Location match (score, context, default)
//!   → Device match (score, location penalty, context)
//!     → Command lookup (per device type, then wildcard)
//!       ↺ exclude devices the verb does not fit and retry
//!   → Context update
//! ```
//!
//! The engine owns the registry, the command table and the context store.
//! Build it once, wrap it in an `Arc`, and share it between front ends.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::command::{CommandDef, CommandTable, WILDCARD_TYPE};
use crate::context::{Context, ContextStore};
use crate::error::NlpError;
use crate::registry::{DeviceId, EVERYWHERE, LocationId, Registry};
use crate::resolution::Resolution;
use crate::score::title_score;
use crate::token::{Tokens, normalize};

/// Default window during which a sender's last resolution is reused.
pub const DEFAULT_CONTEXT_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// How long a resolution stays usable for follow-up phrases.
    pub context_ttl: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            context_ttl: DEFAULT_CONTEXT_TTL,
        }
    }
}

pub struct Engine {
    registry: RwLock<Registry>,
    commands: CommandTable,
    contexts: ContextStore,
    config: EngineConfig,
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new(CommandTable::builtin())
    }
}

impl Engine {
    pub fn new(commands: CommandTable) -> Self {
        Engine::with_config(commands, EngineConfig::default())
    }

    pub fn with_config(commands: CommandTable, config: EngineConfig) -> Self {
        Engine {
            registry: RwLock::new(Registry::new()),
            commands,
            contexts: ContextStore::new(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn commands(&self) -> &CommandTable {
        &self.commands
    }

    pub fn contexts(&self) -> &ContextStore {
        &self.contexts
    }

    /// Register (or refresh) a location; returns its normalized title.
    pub fn register_location(&self, id: LocationId, title: &str) -> Tokens {
        self.registry.write().add_location(id, title)
    }

    /// Register (or refresh) a device; returns its matchable title.
    pub fn register_device(
        &self,
        id: &str,
        title: &str,
        device_type: &str,
        location: LocationId,
    ) -> Result<Tokens, NlpError> {
        self.registry
            .write()
            .add_device(id, title, device_type, location)
    }

    /// Make `title` the fallback location for `sender`.
    pub fn bind_default_location(&self, sender: &str, title: &str) -> Result<LocationId, NlpError> {
        let location = self.registry.read().location_id_by_title(title).ok_or_else(|| {
            NlpError::UnknownLocationTitle {
                title: title.to_string(),
            }
        })?;
        self.contexts.set_default_location(sender, location);
        Ok(location)
    }

    /// Normalized title of a registered location.
    pub fn location_title(&self, id: LocationId) -> Option<String> {
        self.registry.read().location_title(id).map(Tokens::to_string)
    }

    /// Read access to the registry, e.g. for listing inventory.
    pub fn with_registry<R>(&self, f: impl FnOnce(&Registry) -> R) -> R {
        f(&self.registry.read())
    }

    /// Look up the command a phrase asks of a `device_type` device.
    pub fn lookup_command(&self, phrase: &str, device_type: &str) -> Option<CommandDef> {
        self.commands.lookup(&normalize(phrase), device_type).cloned()
    }

    /// Resolve a phrase from `sender` against the current time.
    pub fn process_phrase(&self, phrase: &str, sender: &str) -> Option<Resolution> {
        self.process_phrase_at(phrase, sender, Instant::now())
    }

    /// Resolve a phrase from `sender` as if it arrived at `now`.
    ///
    /// The sender's context stays locked for the whole call. Returns `None`
    /// when no device can be identified, or when the only candidates come
    /// from context and the phrase has no recognized command word.
    pub fn process_phrase_at(&self, phrase: &str, sender: &str, now: Instant) -> Option<Resolution> {
        let slot = self.contexts.slot(sender);
        let mut context = slot.lock();
        let registry = self.registry.read();

        let tokens = normalize(phrase);
        let fresh = context.is_fresh(now, self.config.context_ttl);
        debug!(sender, phrase = %tokens, fresh, "processing phrase");

        let locations = resolve_locations(&registry, &tokens, &context, fresh);

        let mut excluded = BTreeSet::new();
        let mut accepted = None;
        for _ in 0..=registry.device_count() {
            let (devices, score) =
                resolve_devices(&registry, &tokens, &locations, &excluded, &context, fresh);
            let Some(first) = devices.first() else {
                debug!("no device matched");
                return None;
            };

            let device_type = registry
                .device(first)
                .map_or(WILDCARD_TYPE, |d| d.device_type.as_str());
            let command = self.commands.lookup(&tokens, device_type);
            if command.is_some() || self.commands.lookup(&tokens, WILDCARD_TYPE).is_none() {
                accepted = Some((devices, score, command.cloned()));
                break;
            }

            debug!(?devices, device_type, "command does not fit device type, retrying");
            excluded.extend(devices);
        }

        let (devices, score, command) = accepted?;
        if score == 0 && command.is_none() {
            debug!(?devices, "context guess without a command word, ignoring");
            return None;
        }

        context.record(devices.clone(), locations.clone(), now);
        let resolution = Resolution {
            devices,
            locations,
            command,
            score,
        };
        info!(sender, %resolution, "resolved phrase");
        Some(resolution)
    }
}

fn resolve_locations(
    registry: &Registry,
    tokens: &Tokens,
    context: &Context,
    fresh: bool,
) -> Vec<LocationId> {
    let (best, score) = best_by_score(
        registry
            .locations()
            .map(|l| (l.id, title_score(tokens, &l.title))),
    );

    if score > 0 {
        debug!(locations = ?best, score, "matched locations");
        best
    } else if fresh {
        debug!(locations = ?context.last_locations, "using locations from context");
        context.last_locations.clone()
    } else {
        debug!(location = context.default_location, "using default location");
        vec![context.default_location]
    }
}

fn resolve_devices(
    registry: &Registry,
    tokens: &Tokens,
    locations: &[LocationId],
    excluded: &BTreeSet<DeviceId>,
    context: &Context,
    fresh: bool,
) -> (Vec<DeviceId>, i64) {
    let constrained = locations.iter().any(|l| *l != EVERYWHERE);
    let (best, score) = best_by_score(
        registry
            .devices()
            .filter(|d| !excluded.contains(&d.id))
            .map(|d| {
                let mut score = title_score(tokens, &d.title);
                if constrained && !locations.contains(&d.location) {
                    score -= 1;
                }
                (d.id.clone(), score)
            }),
    );

    if score > 0 {
        debug!(devices = ?best, score, "matched devices");
        return (best, score);
    }

    if fresh {
        let remembered: Vec<DeviceId> = context
            .last_devices
            .iter()
            .filter(|d| !excluded.contains(*d))
            .cloned()
            .collect();
        if !remembered.is_empty() {
            debug!(devices = ?remembered, "using devices from context");
        }
        return (remembered, 0);
    }

    (Vec::new(), 0)
}

/// Items tied at the highest score, kept only when that score is positive.
fn best_by_score<T>(scored: impl Iterator<Item = (T, i64)>) -> (Vec<T>, i64) {
    let mut best = Vec::new();
    let mut best_score = 0;
    for (item, score) in scored {
        if score > best_score {
            best_score = score;
            best.clear();
        }
        if score > 0 && score == best_score {
            best.push(item);
        }
    }
    (best, best_score)
}

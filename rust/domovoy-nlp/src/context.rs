//! Short-lived per-sender memory.
//!
//! Each sender (a chat user name, a caller address, ...) gets a [`Context`]
//! holding what it last resolved. A follow-up phrase without device or
//! location words can then reuse it while it is fresh. Contexts are created
//! on first use and live for the process lifetime; a stale context is simply
//! ignored, never pruned.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use parking_lot::Mutex;

use crate::registry::{DeviceId, EVERYWHERE, LocationId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    pub last_devices: Vec<DeviceId>,
    pub last_locations: Vec<LocationId>,
    pub last_resolved_at: Option<Instant>,
    pub default_location: LocationId,
}

impl Default for Context {
    fn default() -> Self {
        Context {
            last_devices: Vec::new(),
            last_locations: Vec::new(),
            last_resolved_at: None,
            default_location: EVERYWHERE,
        }
    }
}

impl Context {
    /// Whether the last resolution happened no more than `ttl` before `now`.
    pub fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        self.last_resolved_at
            .is_some_and(|at| now.saturating_duration_since(at) <= ttl)
    }

    pub fn record(&mut self, devices: Vec<DeviceId>, locations: Vec<LocationId>, now: Instant) {
        self.last_devices = devices;
        self.last_locations = locations;
        self.last_resolved_at = Some(now);
    }
}

/// Sender id → context, with one lock per sender.
///
/// The map shard is only locked long enough to fetch or create a sender's
/// slot. Callers then hold the slot's own mutex for a whole
/// read-resolve-write cycle, so phrases from one sender are serialized while
/// different senders proceed in parallel.
#[derive(Debug, Default)]
pub struct ContextStore {
    contexts: DashMap<String, Arc<Mutex<Context>>>,
}

impl ContextStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The sender's context slot, created empty on first use.
    pub fn slot(&self, sender: &str) -> Arc<Mutex<Context>> {
        if let Some(slot) = self.contexts.get(sender) {
            return slot.clone();
        }
        self.contexts
            .entry(sender.to_string())
            .or_default()
            .clone()
    }

    pub fn set_default_location(&self, sender: &str, location: LocationId) {
        self.slot(sender).lock().default_location = location;
    }

    /// Copy of the sender's context, if one was ever created.
    pub fn snapshot(&self, sender: &str) -> Option<Context> {
        let slot = self.contexts.get(sender)?.clone();
        let context = slot.lock().clone();
        Some(context)
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}

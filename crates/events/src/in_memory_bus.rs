//! In-memory hook bus for tests/dev.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;
use tracing::debug;

use surveybar_core::{DataBag, TopbarError, TopbarResult};

use crate::bus::PluginHookBus;
use crate::HookEvent;

/// Listener callback: reads the event, returns the fields it contributes.
pub type HookListener = Arc<dyn Fn(&HookEvent) -> TopbarResult<DataBag> + Send + Sync>;

/// In-memory hook bus.
///
/// - No IO / no async
/// - Listeners run in registration order, outside the registry lock (a
///   listener may subscribe to the bus it is called from)
/// - Sequence contributions to the same field are appended; any other value
///   replaces what earlier listeners set
#[derive(Default)]
pub struct InMemoryHookBus {
    listeners: RwLock<HashMap<String, Vec<HookListener>>>,
}

impl InMemoryHookBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for hook `name`.
    pub fn subscribe<F>(&self, name: impl Into<String>, listener: F) -> TopbarResult<()>
    where
        F: Fn(&HookEvent) -> TopbarResult<DataBag> + Send + Sync + 'static,
    {
        let name = name.into();
        let mut listeners = self
            .listeners
            .write()
            .map_err(|_| TopbarError::hook(name.clone(), "listener registry poisoned"))?;
        listeners.entry(name).or_default().push(Arc::new(listener));
        Ok(())
    }

    /// Register a listener that always contributes the same fields.
    pub fn contribute(&self, name: impl Into<String>, fields: DataBag) -> TopbarResult<()> {
        self.subscribe(name, move |_| Ok(fields.clone()))
    }

    pub fn listener_count(&self, name: &str) -> usize {
        self.listeners
            .read()
            .map(|l| l.get(name).map_or(0, Vec::len))
            .unwrap_or(0)
    }
}

impl core::fmt::Debug for InMemoryHookBus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let hooks: Vec<String> = self
            .listeners
            .read()
            .map(|l| l.keys().cloned().collect())
            .unwrap_or_default();
        f.debug_struct("InMemoryHookBus").field("hooks", &hooks).finish()
    }
}

impl PluginHookBus for InMemoryHookBus {
    fn dispatch(&self, event: &HookEvent) -> TopbarResult<DataBag> {
        let registered: Vec<HookListener> = self
            .listeners
            .read()
            .map_err(|_| TopbarError::hook(event.name.clone(), "listener registry poisoned"))?
            .get(&event.name)
            .cloned()
            .unwrap_or_default();

        let mut merged = DataBag::new();
        for listener in &registered {
            for (field, value) in listener(event)? {
                match merged.get_mut(&field) {
                    Some(Value::Array(existing)) if value.is_array() => {
                        if let Value::Array(more) = value {
                            existing.extend(more);
                        }
                    }
                    _ => {
                        merged.insert(field, value);
                    }
                }
            }
        }

        debug!(
            hook = %event.name,
            listeners = registered.len(),
            fields = merged.len(),
            "hook dispatched"
        );
        Ok(merged)
    }
}

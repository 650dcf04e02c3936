//! Shared application state.
//!
//! [`AppState`] bundles the registry with its store, the rule parameters,
//! and the notification hub. Service functions take it the way request
//! handlers take a database pool: reads borrow it, mutations borrow it
//! mutably and finish with [`AppState::commit`].
//!
//! The state is single-threaded. A multi-threaded host must wrap it in one
//! lock held across each whole service call so that validation, mutation,
//! and persistence stay a single critical section.

use groupwise_config::{RulesConfig, StorageConfig};
use groupwise_models::RegistrySnapshot;
use tracing::{error, info, warn};

use crate::events::{EventHub, RegistryEvent};
use crate::persistence::{JsonFileStore, MemoryStore, RegistryStore, StorageError};
use crate::registry::Registry;

#[derive(Debug)]
pub struct AppState {
    pub(crate) registry: Registry,
    pub rules: RulesConfig,
    store: Box<dyn RegistryStore>,
    events: EventHub,
}

impl AppState {
    /// Loads the registry from `store`.
    ///
    /// A missing document yields an empty registry. An unreadable or
    /// malformed one is logged and also yields an empty registry.
    pub fn new(store: Box<dyn RegistryStore>, rules: RulesConfig) -> Self {
        let registry = match store.load() {
            Ok(Some(snapshot)) => restore(snapshot),
            Ok(None) => {
                info!("No stored registry found, starting empty");
                Registry::new()
            }
            Err(e) => {
                error!(error = %e, "Failed to load registry, starting empty");
                Registry::new()
            }
        };

        Self {
            registry,
            rules,
            store,
            events: EventHub::new(),
        }
    }

    /// Read-only view of the registry. Changes go through the services.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Registers a callback invoked after every committed mutation.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: Fn(&RegistryEvent) + 'static,
    {
        self.events.subscribe(callback);
    }

    /// Writes the current registry to the store.
    pub fn save(&self) -> Result<(), StorageError> {
        self.store.save(&self.registry.snapshot())
    }

    /// Persists the registry and notifies subscribers after a mutation.
    ///
    /// A failed write is logged and otherwise ignored: the in-memory change
    /// stands and the next successful write will carry it.
    pub(crate) fn commit(&mut self, event: RegistryEvent) {
        if let Err(e) = self.save() {
            error!(event = event.name(), error = %e, "Failed to persist registry");
        }
        self.events.publish(&event);
    }
}

fn restore(snapshot: RegistrySnapshot) -> Registry {
    let mut registry = Registry::from_snapshot(snapshot);
    let repairs = registry.reconcile();
    if repairs > 0 {
        warn!(repairs, "Repaired inconsistent membership references on load");
    }
    info!(
        students = registry.student_count(),
        groups = registry.group_count(),
        "Registry loaded"
    );
    registry
}

/// Builds the state over the configured JSON file.
///
/// With `dry_run` the file is only read: the registry is copied into a
/// [`MemoryStore`] and later writes stay in memory.
pub fn init_app_state(storage: StorageConfig, rules: RulesConfig, dry_run: bool) -> AppState {
    let file = JsonFileStore::new(storage.data_file);
    if !dry_run {
        return AppState::new(Box::new(file), rules);
    }

    info!(path = %file.path().display(), "Dry run, changes will not be written");
    let store = match file.load() {
        Ok(Some(snapshot)) => MemoryStore::with_snapshot(snapshot),
        Ok(None) => MemoryStore::new(),
        Err(e) => {
            error!(error = %e, "Failed to load registry, starting empty");
            MemoryStore::new()
        }
    };
    AppState::new(Box::new(store), rules)
}

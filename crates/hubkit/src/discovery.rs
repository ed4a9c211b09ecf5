//! Plugin discovery.
//!
//! [`Hub::discover_components`](crate::Hub::discover_components) asks a
//! [`ComponentDiscovery`] for every component class in a named plugin group.
//! The default, [`InventoryDiscovery`], reads link-time registrations made
//! with the `inventory` crate:
//!
//! ```rust
//! use hubkit::{ComponentClass, PluginEntry};
//!
//! fn make_cache() -> ComponentClass {
//!     ComponentClass::named("Cache").doc("In-memory cache")
//! }
//!
//! hubkit::inventory::submit! {
//!     PluginEntry::new("myapp.plugins", make_cache)
//! }
//! ```
//!
//! [`StaticDiscovery`] is an explicit table for embedding and tests.

use std::collections::BTreeMap;

use crate::component::ComponentClass;

/// Resolves a plugin group into component classes.
pub trait ComponentDiscovery {
    /// Every class registered under `group`. Unknown groups are empty.
    fn discover(&self, group: &str) -> anyhow::Result<Vec<ComponentClass>>;
}

/// A link-time plugin registration.
#[derive(Debug, Clone, Copy)]
pub struct PluginEntry {
    group: &'static str,
    factory: fn() -> ComponentClass,
}

impl PluginEntry {
    /// Registers `factory` under `group`. Usable in `inventory::submit!`.
    pub const fn new(group: &'static str, factory: fn() -> ComponentClass) -> Self {
        Self { group, factory }
    }

    /// The plugin group.
    pub fn group(&self) -> &'static str {
        self.group
    }

    /// Builds the component class.
    pub fn class(&self) -> ComponentClass {
        (self.factory)()
    }
}

inventory::collect!(PluginEntry);

/// Discovery over `inventory` registrations.
#[derive(Debug, Default, Clone, Copy)]
pub struct InventoryDiscovery;

impl ComponentDiscovery for InventoryDiscovery {
    fn discover(&self, group: &str) -> anyhow::Result<Vec<ComponentClass>> {
        Ok(inventory::iter::<PluginEntry>
            .into_iter()
            .filter(|entry| entry.group == group)
            .map(PluginEntry::class)
            .collect())
    }
}

/// Discovery over an explicit group table.
#[derive(Debug, Default, Clone)]
pub struct StaticDiscovery {
    groups: BTreeMap<String, Vec<ComponentClass>>,
}

impl StaticDiscovery {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a class to a group.
    pub fn with(mut self, group: impl Into<String>, class: ComponentClass) -> Self {
        self.groups.entry(group.into()).or_default().push(class);
        self
    }
}

impl ComponentDiscovery for StaticDiscovery {
    fn discover(&self, group: &str) -> anyhow::Result<Vec<ComponentClass>> {
        Ok(self.groups.get(group).cloned().unwrap_or_default())
    }
}

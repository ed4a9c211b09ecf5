//! Registry entries and registration options.

use std::collections::BTreeMap;

/// Per-entry extension map.
///
/// Keys are free-form strings; values are JSON so callers can attach
/// structured descriptors without the registry knowing their types.
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// A registered value together with its key, aliases and metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<V> {
    pub(crate) name: String,
    pub(crate) dimension: String,
    pub(crate) value: V,
    pub(crate) metadata: Metadata,
    pub(crate) aliases: Vec<String>,
}

impl<V> Entry<V> {
    /// The canonical name of the entry.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The dimension the entry is registered in.
    pub fn dimension(&self) -> &str {
        &self.dimension
    }

    /// The registered value.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Mutable access to the registered value.
    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// The metadata attached at registration time.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Alternative names that resolve to this entry.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Consumes the entry, returning the value.
    pub fn into_value(self) -> V {
        self.value
    }
}

/// Options for [`Registry::register_with`](crate::Registry::register_with).
///
/// # Example
///
/// ```rust
/// use hubkit_registry::RegisterOptions;
/// use serde_json::json;
///
/// let options = RegisterOptions::new()
///     .alias("db")
///     .meta("version", json!("1.2.0"))
///     .replace(true);
/// assert!(options.is_replace());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RegisterOptions {
    pub(crate) metadata: Metadata,
    pub(crate) aliases: Vec<String>,
    pub(crate) replace: bool,
}

impl RegisterOptions {
    /// Creates options with no aliases, no metadata and `replace` off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single alias.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Adds several aliases.
    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Sets one metadata key.
    pub fn meta(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Replaces the whole metadata map.
    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Allows overwriting an existing entry under the same key.
    pub fn replace(mut self, replace: bool) -> Self {
        self.replace = replace;
        self
    }

    /// Returns whether replacement is allowed.
    pub fn is_replace(&self) -> bool {
        self.replace
    }
}

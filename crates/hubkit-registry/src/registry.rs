//! The [`Registry`] store.
//!
//! Entries are grouped per dimension. Each dimension keeps its canonical
//! names in registration order plus an alias table pointing back at
//! canonical names, so alias lookups never duplicate values.

use std::collections::{BTreeMap, HashMap};

use crate::entry::{Entry, RegisterOptions};
use crate::error::RegistryError;

#[derive(Debug, Clone)]
struct Dimension<V> {
    order: Vec<String>,
    entries: HashMap<String, Entry<V>>,
    /// alias -> canonical name
    aliases: HashMap<String, String>,
}

impl<V> Default for Dimension<V> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            entries: HashMap::new(),
            aliases: HashMap::new(),
        }
    }
}

impl<V> Dimension<V> {
    fn resolve<'a>(&'a self, name: &'a str) -> Option<&'a str> {
        if self.entries.contains_key(name) {
            Some(name)
        } else {
            self.aliases.get(name).map(String::as_str)
        }
    }

    fn lookup(&self, name: &str) -> Option<&Entry<V>> {
        self.resolve(name).and_then(|n| self.entries.get(n))
    }

    /// Returns true if `key` is taken by anything other than `owner`.
    fn is_taken(&self, key: &str, owner: Option<&str>) -> bool {
        let by_name = self.entries.contains_key(key) && owner != Some(key);
        let by_alias = self
            .aliases
            .get(key)
            .is_some_and(|canonical| owner != Some(canonical.as_str()));
        by_name || by_alias
    }

    fn remove(&mut self, name: &str) -> Option<Entry<V>> {
        let entry = self.entries.remove(name)?;
        for alias in &entry.aliases {
            self.aliases.remove(alias);
        }
        self.order.retain(|n| n != name);
        Some(entry)
    }

    fn iter(&self) -> impl Iterator<Item = &Entry<V>> {
        self.order.iter().filter_map(|n| self.entries.get(n))
    }
}

/// Associative store for named, dimensioned entries.
///
/// See the [crate documentation](crate) for an overview.
#[derive(Debug, Clone)]
pub struct Registry<V> {
    dimensions: BTreeMap<String, Dimension<V>>,
}

impl<V> Default for Registry<V> {
    fn default() -> Self {
        Self {
            dimensions: BTreeMap::new(),
        }
    }
}

fn validate_key(kind: &str, key: &str) -> Result<(), RegistryError> {
    if key.trim().is_empty() {
        return Err(RegistryError::invalid_name(
            key,
            format!("{} must not be empty", kind),
        ));
    }
    Ok(())
}

impl<V> Registry<V> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `value` under `(name, dimension)` with default options.
    ///
    /// Fails with [`RegistryError::AlreadyExists`] if the key is taken.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        dimension: impl Into<String>,
        value: V,
    ) -> Result<(), RegistryError> {
        self.register_with(name, dimension, value, RegisterOptions::default())
    }

    /// Registers `value` under `(name, dimension)`.
    ///
    /// Without [`RegisterOptions::replace`], a taken name or alias fails
    /// with [`RegistryError::AlreadyExists`] and leaves the registry as it
    /// was. With it, the previous entry under the same name is overwritten
    /// in place (keeping its position in listings) and its aliases are
    /// dropped. Aliases claimed by *other* entries are always a conflict.
    pub fn register_with(
        &mut self,
        name: impl Into<String>,
        dimension: impl Into<String>,
        value: V,
        options: RegisterOptions,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        let dimension = dimension.into();
        let RegisterOptions {
            metadata,
            aliases,
            replace,
        } = options;

        validate_key("name", &name)?;
        validate_key("dimension", &dimension)?;

        let mut unique_aliases: Vec<String> = Vec::with_capacity(aliases.len());
        for alias in aliases {
            validate_key("alias", &alias)?;
            if alias != name && !unique_aliases.contains(&alias) {
                unique_aliases.push(alias);
            }
        }

        if let Some(dim) = self.dimensions.get(&dimension) {
            let owner = replace.then_some(name.as_str());
            if dim.is_taken(&name, owner) {
                return Err(RegistryError::already_exists(name, dimension));
            }
            if let Some(alias) = unique_aliases.iter().find(|a| dim.is_taken(a, owner)) {
                return Err(RegistryError::already_exists(alias.clone(), dimension));
            }
        }

        let dim = self.dimensions.entry(dimension.clone()).or_default();
        let existed = dim.entries.contains_key(&name);
        if existed {
            if let Some(old) = dim.entries.get(&name) {
                for alias in &old.aliases {
                    dim.aliases.remove(alias);
                }
            }
        } else {
            dim.order.push(name.clone());
        }

        for alias in &unique_aliases {
            dim.aliases.insert(alias.clone(), name.clone());
        }
        dim.entries.insert(
            name.clone(),
            Entry {
                name,
                dimension,
                value,
                metadata,
                aliases: unique_aliases,
            },
        );
        Ok(())
    }

    /// Looks up a value by name or alias.
    ///
    /// With a dimension, only that dimension is searched. Without one, all
    /// dimensions are searched in name order and the first match wins.
    pub fn get(&self, name: &str, dimension: Option<&str>) -> Option<&V> {
        self.entry(name, dimension).map(Entry::value)
    }

    /// Like [`get`](Self::get), returning mutable access to the value.
    pub fn get_mut(&mut self, name: &str, dimension: Option<&str>) -> Option<&mut V> {
        let (dim_name, canonical) = {
            let entry = self.entry(name, dimension)?;
            (entry.dimension.clone(), entry.name.clone())
        };
        self.dimensions
            .get_mut(&dim_name)
            .and_then(|dim| dim.entries.get_mut(&canonical))
            .map(Entry::value_mut)
    }

    /// Looks up the full entry by name or alias.
    pub fn entry(&self, name: &str, dimension: Option<&str>) -> Option<&Entry<V>> {
        match dimension {
            Some(d) => self.dimensions.get(d).and_then(|dim| dim.lookup(name)),
            None => self.dimensions.values().find_map(|dim| dim.lookup(name)),
        }
    }

    /// Returns true if a name or alias resolves in the dimension.
    pub fn contains(&self, name: &str, dimension: &str) -> bool {
        self.entry(name, Some(dimension)).is_some()
    }

    /// Removes an entry (by name or alias) and its aliases.
    pub fn remove(&mut self, name: &str, dimension: &str) -> Option<Entry<V>> {
        let dim = self.dimensions.get_mut(dimension)?;
        let canonical = dim.resolve(name)?.to_string();
        let removed = dim.remove(&canonical);
        if dim.entries.is_empty() {
            self.dimensions.remove(dimension);
        }
        removed
    }

    /// Names registered in a dimension, in registration order.
    pub fn list_dimension(&self, dimension: &str) -> Vec<String> {
        self.dimensions
            .get(dimension)
            .map(|dim| dim.order.clone())
            .unwrap_or_default()
    }

    /// Every dimension mapped to its names.
    pub fn list_all(&self) -> BTreeMap<String, Vec<String>> {
        self.dimensions
            .iter()
            .map(|(d, dim)| (d.clone(), dim.order.clone()))
            .collect()
    }

    /// Names of the dimensions currently holding entries.
    pub fn dimensions(&self) -> impl Iterator<Item = &str> {
        self.dimensions.keys().map(String::as_str)
    }

    /// Clears one dimension, or everything when `dimension` is `None`.
    pub fn clear(&mut self, dimension: Option<&str>) {
        match dimension {
            Some(d) => {
                self.dimensions.remove(d);
            }
            None => self.dimensions.clear(),
        }
    }

    /// Iterates every entry, dimension by dimension in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Entry<V>> {
        self.dimensions.values().flat_map(Dimension::iter)
    }

    /// Total number of entries across all dimensions.
    pub fn len(&self) -> usize {
        self.dimensions.values().map(|d| d.entries.len()).sum()
    }

    /// Returns true if no entries are registered.
    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }
}

impl<'a, V> IntoIterator for &'a Registry<V> {
    type Item = &'a Entry<V>;
    type IntoIter = Box<dyn Iterator<Item = &'a Entry<V>> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_and_get() {
        let mut registry = Registry::new();
        registry.register("db", "component", 1).unwrap();

        assert_eq!(registry.get("db", Some("component")), Some(&1));
        assert_eq!(registry.get("db", Some("command")), None);
        assert_eq!(registry.get("missing", Some("component")), None);
    }

    #[test]
    fn test_duplicate_fails() {
        let mut registry = Registry::new();
        registry.register("db", "component", 1).unwrap();

        let err = registry.register("db", "component", 2).unwrap_err();
        assert_eq!(err, RegistryError::already_exists("db", "component"));
        assert_eq!(registry.get("db", Some("component")), Some(&1));
    }

    #[test]
    fn test_same_name_other_dimension_is_fine() {
        let mut registry = Registry::new();
        registry.register("sync", "component", 1).unwrap();
        registry.register("sync", "command", 2).unwrap();

        assert_eq!(registry.get("sync", Some("component")), Some(&1));
        assert_eq!(registry.get("sync", Some("command")), Some(&2));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_replace_overwrites_in_place() {
        let mut registry = Registry::new();
        registry.register("a", "d", 1).unwrap();
        registry.register("b", "d", 2).unwrap();
        registry
            .register_with("a", "d", 10, RegisterOptions::new().replace(true))
            .unwrap();

        assert_eq!(registry.get("a", Some("d")), Some(&10));
        assert_eq!(registry.list_dimension("d"), vec!["a", "b"]);
    }

    #[test]
    fn test_replace_drops_old_aliases() {
        let mut registry = Registry::new();
        registry
            .register_with("db", "d", 1, RegisterOptions::new().alias("database"))
            .unwrap();
        registry
            .register_with("db", "d", 2, RegisterOptions::new().replace(true))
            .unwrap();

        assert_eq!(registry.get("database", Some("d")), None);
        assert_eq!(registry.get("db", Some("d")), Some(&2));
    }

    #[test]
    fn test_alias_lookup() {
        let mut registry = Registry::new();
        registry
            .register_with(
                "list",
                "command",
                "handler",
                RegisterOptions::new().aliases(["ls", "l"]),
            )
            .unwrap();

        assert_eq!(registry.get("ls", Some("command")), Some(&"handler"));
        assert_eq!(registry.get("l", None), Some(&"handler"));
        let entry = registry.entry("ls", Some("command")).unwrap();
        assert_eq!(entry.name(), "list");
        assert_eq!(entry.aliases(), ["ls".to_string(), "l".to_string()]);
    }

    #[test]
    fn test_alias_conflicts_with_existing_name() {
        let mut registry = Registry::new();
        registry.register("ls", "command", 1).unwrap();

        let err = registry
            .register_with("list", "command", 2, RegisterOptions::new().alias("ls"))
            .unwrap_err();
        assert_eq!(err, RegistryError::already_exists("ls", "command"));
        assert!(!registry.contains("list", "command"));
    }

    #[test]
    fn test_alias_conflict_even_with_replace() {
        let mut registry = Registry::new();
        registry
            .register_with("a", "d", 1, RegisterOptions::new().alias("x"))
            .unwrap();

        let result =
            registry.register_with("b", "d", 2, RegisterOptions::new().alias("x").replace(true));
        assert!(result.is_err());
        assert_eq!(registry.get("x", Some("d")), Some(&1));
    }

    #[test]
    fn test_name_conflicts_with_existing_alias() {
        let mut registry = Registry::new();
        registry
            .register_with("list", "command", 1, RegisterOptions::new().alias("ls"))
            .unwrap();

        assert!(registry.register("ls", "command", 2).is_err());
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut registry: Registry<i32> = Registry::new();
        assert!(matches!(
            registry.register("  ", "d", 1),
            Err(RegistryError::InvalidName { .. })
        ));
        assert!(matches!(
            registry.register("a", "", 1),
            Err(RegistryError::InvalidName { .. })
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_get_without_dimension_searches_all() {
        let mut registry = Registry::new();
        registry.register("only-b", "b", 2).unwrap();
        registry.register("shared", "b", 20).unwrap();
        registry.register("shared", "a", 10).unwrap();

        assert_eq!(registry.get("only-b", None), Some(&2));
        // dimensions are searched in name order
        assert_eq!(registry.get("shared", None), Some(&10));
    }

    #[test]
    fn test_metadata_is_kept() {
        let mut registry = Registry::new();
        registry
            .register_with(
                "db",
                "component",
                (),
                RegisterOptions::new().meta("version", json!("1.0")),
            )
            .unwrap();

        let entry = registry.entry("db", Some("component")).unwrap();
        assert_eq!(entry.metadata()["version"], json!("1.0"));
    }

    #[test]
    fn test_list_all_and_clear() {
        let mut registry = Registry::new();
        registry.register("a", "component", 1).unwrap();
        registry.register("b", "component", 2).unwrap();
        registry.register("run", "command", 3).unwrap();

        let all = registry.list_all();
        assert_eq!(all["component"], vec!["a", "b"]);
        assert_eq!(all["command"], vec!["run"]);

        registry.clear(Some("component"));
        assert!(registry.list_dimension("component").is_empty());
        assert_eq!(registry.len(), 1);

        registry.clear(None);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove_by_alias() {
        let mut registry = Registry::new();
        registry
            .register_with("db", "d", 1, RegisterOptions::new().alias("database"))
            .unwrap();

        let removed = registry.remove("database", "d").unwrap();
        assert_eq!(removed.name(), "db");
        assert!(registry.get("db", None).is_none());
        assert!(registry.get("database", None).is_none());
        assert_eq!(registry.dimensions().count(), 0);
    }

    #[test]
    fn test_iter_order() {
        let mut registry = Registry::new();
        registry.register("z", "b", 1).unwrap();
        registry.register("y", "a", 2).unwrap();
        registry.register("x", "a", 3).unwrap();

        let seen: Vec<(&str, &str, i32)> = registry
            .iter()
            .map(|e| (e.name(), e.dimension(), *e.value()))
            .collect();
        assert_eq!(seen, vec![("y", "a", 2), ("x", "a", 3), ("z", "b", 1)]);
    }

    #[test]
    fn test_get_mut() {
        let mut registry = Registry::new();
        registry
            .register_with("a", "d", 1, RegisterOptions::new().alias("b"))
            .unwrap();
        *registry.get_mut("b", None).unwrap() += 5;
        assert_eq!(registry.get("a", Some("d")), Some(&6));
    }
}

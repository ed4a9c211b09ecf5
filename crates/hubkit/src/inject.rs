//! Dependency injection.
//!
//! Rust has no runtime constructor signatures to inspect, so injectable
//! types declare their own parameter list through [`Injectable`] and build
//! themselves from a [`Resolver`]. Instances live in an [`Injector`], a
//! type-keyed store with optional names for disambiguation.
//!
//! # Lookup Order
//!
//! For a parameter `param` of type `T`, the resolver tries:
//!
//! 1. a per-call override registered under `param` in [`Overrides`]
//! 2. an instance registered as `(T, Some(param))`
//! 3. an instance registered as `(T, None)`
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use hubkit::{Dependency, Hub, Injectable, Overrides, Resolver};
//!
//! struct Config { url: String }
//! struct Client { config: Rc<Config> }
//!
//! impl Injectable for Client {
//!     fn dependencies() -> Vec<Dependency> {
//!         vec![Dependency::required::<Config>("config")]
//!     }
//!
//!     fn construct(deps: &Resolver<'_>) -> anyhow::Result<Self> {
//!         Ok(Client { config: deps.require("config")? })
//!     }
//! }
//!
//! let mut hub = Hub::new();
//! hub.register(Config { url: "https://example.com".into() }, None);
//!
//! let client: Client = hub.resolve(Overrides::new())?;
//! assert_eq!(client.config.url, "https://example.com");
//! # Ok::<(), hubkit::HubError>(())
//! ```

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::error::HubError;

type Key = (TypeId, Option<String>);

/// Type-keyed instance store.
#[derive(Default, Clone)]
pub struct Injector {
    instances: HashMap<Key, Rc<dyn Any>>,
}

impl Injector {
    /// Creates an empty injector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an instance, returning the one it replaced, if any.
    pub fn register<T: 'static>(&mut self, instance: T, name: Option<&str>) -> Option<Rc<T>> {
        self.register_rc(Rc::new(instance), name)
    }

    /// Registers an already shared instance.
    pub fn register_rc<T: 'static>(&mut self, instance: Rc<T>, name: Option<&str>) -> Option<Rc<T>> {
        self.instances
            .insert(key::<T>(name), instance)
            .and_then(|old| old.downcast::<T>().ok())
    }

    /// Gets the instance registered under exactly `(T, name)`.
    pub fn get<T: 'static>(&self, name: Option<&str>) -> Option<Rc<T>> {
        self.instances
            .get(&key::<T>(name))
            .and_then(|rc| rc.clone().downcast::<T>().ok())
    }

    /// Returns true if `(T, name)` is registered.
    pub fn contains<T: 'static>(&self, name: Option<&str>) -> bool {
        self.instances.contains_key(&key::<T>(name))
    }

    fn contains_id(&self, type_id: TypeId, name: Option<&str>) -> bool {
        self.instances
            .contains_key(&(type_id, name.map(String::from)))
    }

    /// Removes `(T, name)`, returning the instance.
    pub fn remove<T: 'static>(&mut self, name: Option<&str>) -> Option<Rc<T>> {
        self.instances
            .remove(&key::<T>(name))
            .and_then(|rc| rc.downcast::<T>().ok())
    }

    /// Number of registered instances.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Removes every instance.
    pub fn clear(&mut self) {
        self.instances.clear();
    }
}

fn key<T: 'static>(name: Option<&str>) -> Key {
    (TypeId::of::<T>(), name.map(String::from))
}

impl fmt::Debug for Injector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Injector")
            .field("len", &self.instances.len())
            .finish_non_exhaustive()
    }
}

/// One declared constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// Parameter name, used for overrides and named registrations
    pub param: &'static str,
    /// Declared type name, for error messages
    pub type_name: &'static str,
    /// Declared type
    pub type_id: TypeId,
    /// Whether resolution fails when nothing matches
    pub required: bool,
}

impl Dependency {
    /// A parameter that must be satisfied.
    pub fn required<T: 'static>(param: &'static str) -> Self {
        Self {
            param,
            type_name: type_name::<T>(),
            type_id: TypeId::of::<T>(),
            required: true,
        }
    }

    /// A parameter with a default value inside `construct`.
    pub fn optional<T: 'static>(param: &'static str) -> Self {
        Self {
            required: false,
            ..Self::required::<T>(param)
        }
    }
}

/// A type that can be built by [`Hub::resolve`](crate::Hub::resolve).
pub trait Injectable: Sized + 'static {
    /// The constructor parameter list.
    fn dependencies() -> Vec<Dependency>;

    /// Builds the value from resolved dependencies.
    fn construct(deps: &Resolver<'_>) -> anyhow::Result<Self>;
}

/// Per-call arguments keyed by parameter name.
#[derive(Default, Clone)]
pub struct Overrides {
    values: HashMap<String, Rc<dyn Any>>,
}

impl Overrides {
    /// No overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Supplies `value` for `param`.
    pub fn with<T: 'static>(self, param: impl Into<String>, value: T) -> Self {
        self.with_rc(param, Rc::new(value))
    }

    /// Supplies an already shared value for `param`.
    pub fn with_rc<T: 'static>(mut self, param: impl Into<String>, value: Rc<T>) -> Self {
        self.values.insert(param.into(), value);
        self
    }

    /// Returns true if `param` is overridden.
    pub fn contains(&self, param: &str) -> bool {
        self.values.contains_key(param)
    }
}

impl fmt::Debug for Overrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut params: Vec<&String> = self.values.keys().collect();
        params.sort();
        f.debug_struct("Overrides").field("params", &params).finish()
    }
}

/// Hands resolved dependencies to [`Injectable::construct`].
pub struct Resolver<'a> {
    injector: &'a Injector,
    overrides: &'a Overrides,
    target: &'static str,
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(injector: &'a Injector, overrides: &'a Overrides, target: &'static str) -> Self {
        Self {
            injector,
            overrides,
            target,
        }
    }

    fn lookup<T: 'static>(&self, param: &str) -> Result<Option<Rc<T>>, HubError> {
        if let Some(value) = self.overrides.values.get(param) {
            return value.clone().downcast::<T>().map(Some).map_err(|_| {
                HubError::validation(format!(
                    "override for parameter '{}' of {} is not a {}",
                    param,
                    self.target,
                    type_name::<T>()
                ))
            });
        }

        Ok(self
            .injector
            .get::<T>(Some(param))
            .or_else(|| self.injector.get::<T>(None)))
    }

    /// Resolves a required parameter.
    pub fn require<T: 'static>(&self, param: &str) -> Result<Rc<T>, HubError> {
        self.lookup::<T>(param)?.ok_or_else(|| HubError::NotFound {
            param: param.to_string(),
            type_name: type_name::<T>().to_string(),
            target: self.target.to_string(),
        })
    }

    /// Resolves an optional parameter.
    pub fn optional<T: 'static>(&self, param: &str) -> Result<Option<Rc<T>>, HubError> {
        self.lookup::<T>(param)
    }

    pub(crate) fn can_satisfy(&self, dep: &Dependency) -> bool {
        self.overrides.contains(dep.param)
            || self.injector.contains_id(dep.type_id, Some(dep.param))
            || self.injector.contains_id(dep.type_id, None)
    }

    /// The type being resolved.
    pub fn target(&self) -> &'static str {
        self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Port(u16);

    #[test]
    fn test_register_and_get() {
        let mut injector = Injector::new();
        assert!(injector.register(Port(80), None).is_none());
        assert_eq!(*injector.get::<Port>(None).unwrap(), Port(80));
        assert!(injector.get::<Port>(Some("admin")).is_none());
        assert!(injector.get::<String>(None).is_none());
    }

    #[test]
    fn test_named_registrations_are_separate() {
        let mut injector = Injector::new();
        injector.register(Port(80), None);
        injector.register(Port(8080), Some("admin"));

        assert_eq!(injector.len(), 2);
        assert_eq!(*injector.get::<Port>(Some("admin")).unwrap(), Port(8080));
    }

    #[test]
    fn test_register_returns_replaced() {
        let mut injector = Injector::new();
        injector.register(Port(1), None);
        let old = injector.register(Port(2), None).unwrap();
        assert_eq!(*old, Port(1));
        assert_eq!(injector.remove::<Port>(None).map(|p| p.0), Some(2));
        assert!(injector.is_empty());
    }

    #[test]
    fn test_resolver_lookup_order() {
        let mut injector = Injector::new();
        injector.register(Port(1), None);
        injector.register(Port(2), Some("admin"));
        let overrides = Overrides::new().with("public", Port(3));
        let resolver = Resolver::new(&injector, &overrides, "Server");

        assert_eq!(*resolver.require::<Port>("other").unwrap(), Port(1));
        assert_eq!(*resolver.require::<Port>("admin").unwrap(), Port(2));
        assert_eq!(*resolver.require::<Port>("public").unwrap(), Port(3));
    }

    #[test]
    fn test_resolver_missing_and_optional() {
        let injector = Injector::new();
        let overrides = Overrides::new();
        let resolver = Resolver::new(&injector, &overrides, "Server");

        let err = resolver.require::<Port>("port").unwrap_err();
        assert!(err.is_not_found());
        assert!(resolver.optional::<Port>("port").unwrap().is_none());
        assert!(!resolver.can_satisfy(&Dependency::required::<Port>("port")));
    }

    #[test]
    fn test_override_with_wrong_type() {
        let injector = Injector::new();
        let overrides = Overrides::new().with("port", "eighty");
        let resolver = Resolver::new(&injector, &overrides, "Server");

        let err = resolver.require::<Port>("port").unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_optional_dependency() {
        let dep = Dependency::optional::<Port>("port");
        assert!(!dep.required);
        assert_eq!(dep.type_id, TypeId::of::<Port>());
    }
}

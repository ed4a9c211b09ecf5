//! Component descriptions and metadata.
//!
//! A component is described to the Hub by a [`ComponentClass`]: a
//! type-erased record of the component type's name, documentation and
//! lifecycle capabilities. Rust types opt in through the [`Component`]
//! trait; plugins that only know a type name use [`ComponentClass::named`].
//!
//! ```rust
//! use hubkit::{Component, ComponentClass};
//!
//! struct Database;
//!
//! impl Component for Database {
//!     fn describe(class: ComponentClass) -> ComponentClass {
//!         class
//!             .doc("Primary datastore")
//!             .on_initialize(|| Ok(()))
//!     }
//! }
//!
//! let class = ComponentClass::of::<Database>();
//! assert_eq!(class.type_name(), "Database");
//! assert!(class.has_initialize());
//! assert!(!class.has_cleanup());
//! ```

use std::any::TypeId;
use std::fmt;
use std::rc::Rc;

use hubkit_registry::Metadata;
use serde::{Deserialize, Serialize};

/// Default dimension for components.
pub const COMPONENT_DIMENSION: &str = "component";

/// A lifecycle capability exposed by a component type.
pub type LifecycleFn = Rc<dyn Fn() -> anyhow::Result<()>>;

/// Implemented by types that can be registered as components.
pub trait Component: 'static {
    /// Attaches documentation and lifecycle capabilities to the class.
    fn describe(class: ComponentClass) -> ComponentClass {
        class
    }
}

/// Type-erased description of a component type.
#[derive(Clone)]
pub struct ComponentClass {
    type_name: String,
    type_id: Option<TypeId>,
    doc: Option<String>,
    initialize: Option<LifecycleFn>,
    cleanup: Option<LifecycleFn>,
}

impl ComponentClass {
    /// Describes a Rust type implementing [`Component`].
    pub fn of<T: Component>() -> Self {
        let class = Self {
            type_name: short_type_name::<T>().to_string(),
            type_id: Some(TypeId::of::<T>()),
            doc: None,
            initialize: None,
            cleanup: None,
        };
        T::describe(class)
    }

    /// Describes a component known only by its type name.
    ///
    /// The name is validated when the class is registered, not here.
    pub fn named(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            type_id: None,
            doc: None,
            initialize: None,
            cleanup: None,
        }
    }

    /// Sets the documentation string.
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Sets the `initialize` capability.
    pub fn on_initialize<F>(mut self, f: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + 'static,
    {
        self.initialize = Some(Rc::new(f));
        self
    }

    /// Sets the `cleanup` capability.
    pub fn on_cleanup<F>(mut self, f: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + 'static,
    {
        self.cleanup = Some(Rc::new(f));
        self
    }

    /// The component type's own name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The `TypeId`, for classes built from a Rust type.
    pub fn type_id(&self) -> Option<TypeId> {
        self.type_id
    }

    /// The documentation string, if any.
    pub fn documentation(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Returns true if the class exposes an `initialize` capability.
    pub fn has_initialize(&self) -> bool {
        self.initialize.is_some()
    }

    /// Returns true if the class exposes a `cleanup` capability.
    pub fn has_cleanup(&self) -> bool {
        self.cleanup.is_some()
    }

    /// Returns true if the type name is a usable Rust type identifier.
    pub fn is_class_like(&self) -> bool {
        is_type_identifier(&self.type_name)
    }

    pub(crate) fn run_initialize(&self) -> Option<anyhow::Result<()>> {
        self.initialize.as_ref().map(|f| f())
    }

    pub(crate) fn run_cleanup(&self) -> Option<anyhow::Result<()>> {
        self.cleanup.as_ref().map(|f| f())
    }
}

impl fmt::Debug for ComponentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentClass")
            .field("type_name", &self.type_name)
            .field("doc", &self.doc)
            .field("has_initialize", &self.has_initialize())
            .field("has_cleanup", &self.has_cleanup())
            .finish_non_exhaustive()
    }
}

/// Last path segment of a type name, without generic arguments.
///
/// `my_app::db::Pool<Conn>` becomes `Pool`.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

fn is_type_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    name != "_" && chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Descriptive record attached to a registered component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentInfo {
    /// Registered name
    pub name: String,
    /// The component type's own name
    pub type_name: String,
    /// Dimension the component lives in
    pub dimension: String,
    /// Component version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Description (defaults to the class documentation)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Author
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Free-form tags
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A registered component: its info and its class.
#[derive(Debug, Clone)]
pub struct ComponentRecord {
    pub(crate) info: ComponentInfo,
    pub(crate) class: ComponentClass,
}

impl ComponentRecord {
    /// The component's descriptive record.
    pub fn info(&self) -> &ComponentInfo {
        &self.info
    }

    /// The component's class.
    pub fn class(&self) -> &ComponentClass {
        &self.class
    }
}

/// Options for [`Hub::add_component_with`](crate::Hub::add_component_with).
///
/// ```rust
/// use hubkit::ComponentOptions;
/// use serde_json::json;
///
/// let options = ComponentOptions::new()
///     .name("primary-db")
///     .version("2.1.0")
///     .tags(["storage", "sql"])
///     .extra("pool_size", json!(8));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ComponentOptions {
    pub(crate) name: Option<String>,
    pub(crate) dimension: Option<String>,
    pub(crate) version: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) author: Option<String>,
    pub(crate) tags: Vec<String>,
    pub(crate) aliases: Vec<String>,
    pub(crate) extra: Metadata,
}

impl ComponentOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers under this name instead of the type name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Registers in this dimension instead of the Hub's default.
    pub fn dimension(mut self, dimension: impl Into<String>) -> Self {
        self.dimension = Some(dimension.into());
        self
    }

    /// Sets the version.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Sets the description, overriding the class documentation.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the author.
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Adds tags.
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Adds an alias the component can also be looked up by.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Stores an extra metadata value on the registry entry.
    pub fn extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain;
    impl Component for Plain {}

    #[allow(dead_code)]
    struct Generic<T>(T);
    impl<T: 'static> Component for Generic<T> {}

    #[test]
    fn test_class_of_uses_short_name() {
        let class = ComponentClass::of::<Plain>();
        assert_eq!(class.type_name(), "Plain");
        assert_eq!(class.type_id(), Some(TypeId::of::<Plain>()));
        assert!(class.is_class_like());
        assert!(!class.has_initialize());
    }

    #[test]
    fn test_generic_arguments_are_stripped() {
        let class = ComponentClass::of::<Generic<String>>();
        assert_eq!(class.type_name(), "Generic");
    }

    #[test]
    fn test_named_classes_are_validated() {
        assert!(ComponentClass::named("Cache").is_class_like());
        assert!(ComponentClass::named("_Internal2").is_class_like());
        assert!(!ComponentClass::named("5").is_class_like());
        assert!(!ComponentClass::named("").is_class_like());
        assert!(!ComponentClass::named("_").is_class_like());
        assert!(!ComponentClass::named("my cache").is_class_like());
        assert!(!ComponentClass::named("a::b").is_class_like());
    }

    #[test]
    fn test_lifecycle_capabilities_run() {
        let class = ComponentClass::named("Svc")
            .on_initialize(|| Ok(()))
            .on_cleanup(|| anyhow::bail!("boom"));

        assert!(matches!(class.run_initialize(), Some(Ok(()))));
        let err = class.run_cleanup().unwrap().unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn test_info_serializes_without_empty_optionals() {
        let info = ComponentInfo {
            name: "db".into(),
            type_name: "Database".into(),
            dimension: "component".into(),
            version: Some("1.0".into()),
            description: None,
            author: None,
            tags: vec!["sql".into()],
        };
        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "name": "db",
                "type_name": "Database",
                "dimension": "component",
                "version": "1.0",
                "tags": ["sql"]
            })
        );
        let back: ComponentInfo = serde_json::from_value(value).unwrap();
        assert_eq!(back, info);
    }
}

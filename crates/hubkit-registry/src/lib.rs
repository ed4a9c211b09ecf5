//! Name and dimension keyed registry.
//!
//! `hubkit-registry` provides [`Registry`], the associative store behind the
//! hubkit `Hub`. Every entry lives under a `(name, dimension)` key. A
//! dimension is a named partition (for example `"component"` or `"command"`)
//! that keeps unrelated kinds of entries from colliding.
//!
//! # Features
//!
//! - **Unique keys**: a `(name, dimension)` pair can only be registered once
//!   unless replacement is explicitly requested
//! - **Aliases**: extra lookup names that resolve to the same entry
//! - **Metadata**: a typed extension map (`serde_json::Value` values) per entry
//! - **Ordered listing**: names come back in registration order
//!
//! # Example
//!
//! ```rust
//! use hubkit_registry::{Registry, RegisterOptions};
//!
//! let mut registry = Registry::new();
//! registry.register("cache", "component", 1)?;
//! registry.register_with(
//!     "db",
//!     "component",
//!     2,
//!     RegisterOptions::new().alias("database"),
//! )?;
//!
//! assert_eq!(registry.get("database", Some("component")), Some(&2));
//! assert!(registry.register("cache", "component", 3).is_err());
//! # Ok::<(), hubkit_registry::RegistryError>(())
//! ```

mod entry;
mod error;
mod registry;

pub use entry::{Entry, Metadata, RegisterOptions};
pub use error::RegistryError;
pub use registry::Registry;

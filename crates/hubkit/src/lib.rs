//! # Hubkit - Application Foundation
//!
//! Hubkit gives an application one place to wire itself up at startup:
//!
//! - a component registry keyed by name and dimension, with metadata and
//!   lifecycle hooks ([`Hub::add_component`], [`Hub::initialize`])
//! - a command registry that assembles into a clap CLI ([`Hub::add_command`],
//!   [`Hub::create_cli`])
//! - type-keyed dependency injection ([`Hub::register`], [`Hub::resolve`])
//! - link-time plugin discovery ([`Hub::discover_components`])
//!
//! Configuration-value parsers live in [`hubkit_parse`] and the underlying
//! store in [`hubkit_registry`]; the commonly used items are re-exported here.
//!
//! ## Quick Start
//!
//! ```rust
//! use clap::ArgMatches;
//! use hubkit::{CliOutcome, Component, ComponentClass, CommandSpec, Hub};
//!
//! struct Cache;
//!
//! impl Component for Cache {
//!     fn describe(class: ComponentClass) -> ComponentClass {
//!         class.doc("In-memory cache").on_cleanup(|| Ok(()))
//!     }
//! }
//!
//! fn warm_up(_matches: &ArgMatches) -> anyhow::Result<()> {
//!     Ok(())
//! }
//!
//! let mut hub = Hub::new();
//! hub.add_component(ComponentClass::of::<Cache>())?;
//! hub.add_command(CommandSpec::from_fn(warm_up))?;
//! hub.create_cli("app", Some("0.1.0"))?;
//!
//! let outcome = hub.scoped(|hub| hub.run_cli(["app", "warm-up"]))?;
//! assert_eq!(outcome, CliOutcome::Handled { command: "warm-up".into() });
//! # Ok::<(), hubkit::HubError>(())
//! ```
//!
//! ## Threading
//!
//! A Hub holds `Rc` handles and is `!Send`. Wire it on one thread.

pub mod cli;
mod command;
mod component;
mod discovery;
mod error;
mod hub;
mod inject;
mod lifecycle;

pub use cli::{ClapBackend, CliBackend, CliGroup, CliOutcome, UnavailableBackend};
pub use command::{
    is_reserved_command, CommandFn, CommandInfo, CommandOptions, CommandRecord, CommandSpec,
    COMMAND_DIMENSION, RESERVED_COMMAND_NAMES, UNKNOWN_COMMAND,
};
pub use component::{
    Component, ComponentClass, ComponentInfo, ComponentOptions, ComponentRecord, LifecycleFn,
    COMPONENT_DIMENSION,
};
pub use discovery::{ComponentDiscovery, InventoryDiscovery, PluginEntry, StaticDiscovery};
pub use error::{BoxError, CliError, HubError};
pub use hub::{Hub, HubBuilder, COMMAND_INFO_KEY, COMPONENT_INFO_KEY};
pub use inject::{Dependency, Injectable, Injector, Overrides, Resolver};
pub use lifecycle::{HubScope, LifecycleFailure, LifecyclePhase};

pub use hubkit_parse::{
    parse_bool, parse_bool_extended, parse_bool_strict, parse_float_with_validation,
    parse_json_dict, parse_json_list, parse_sample_rate, BoolInput, ParseError, Settings,
    SettingsError,
};
pub use hubkit_registry::{Entry, Metadata, RegisterOptions, Registry, RegistryError};

// Re-exported so plugins can call `hubkit::inventory::submit!`.
pub use inventory;

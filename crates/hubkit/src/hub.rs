//! The Hub facade.
//!
//! A [`Hub`] owns two registries, one for components and one for commands,
//! plus the dependency-injection store and the live CLI group, if one has
//! been created. Components may live in any dimension except the reserved
//! [`COMMAND_DIMENSION`]; commands always live there.
//!
//! # Construction
//!
//! [`Hub::new`] uses the clap backend and `inventory`-based discovery.
//! [`Hub::builder`] swaps either collaborator:
//!
//! ```rust
//! use hubkit::{Hub, StaticDiscovery, UnavailableBackend};
//!
//! let hub = Hub::builder()
//!     .cli_backend(UnavailableBackend::default())
//!     .discovery(StaticDiscovery::new())
//!     .component_dimension("service")
//!     .build()?;
//!
//! assert!(hub.list_components(None).is_empty());
//! # Ok::<(), hubkit::HubError>(())
//! ```

use std::any::type_name;
use std::collections::HashSet;
use std::ffi::OsString;
use std::fmt;
use std::rc::Rc;

use hubkit_registry::{Entry, Metadata, RegisterOptions, Registry};

use crate::cli::{ClapBackend, CliBackend, CliGroup, CliOutcome};
use crate::command::{
    is_reserved_command, CommandInfo, CommandOptions, CommandRecord, CommandSpec,
    COMMAND_DIMENSION, UNKNOWN_COMMAND,
};
use crate::component::{
    ComponentClass, ComponentInfo, ComponentOptions, ComponentRecord, COMPONENT_DIMENSION,
};
use crate::discovery::{ComponentDiscovery, InventoryDiscovery};
use crate::error::HubError;
use crate::inject::{Injectable, Injector, Overrides, Resolver};
use crate::lifecycle::{HubScope, LifecycleFailure, LifecyclePhase};

/// Metadata key holding the serialized [`ComponentInfo`].
pub const COMPONENT_INFO_KEY: &str = "component_info";

/// Metadata key holding the serialized [`CommandInfo`].
pub const COMMAND_INFO_KEY: &str = "command_info";

/// Component and command registry with dependency injection and CLI assembly.
pub struct Hub {
    components: Registry<ComponentRecord>,
    commands: Registry<CommandRecord>,
    injector: Injector,
    cli_backend: Box<dyn CliBackend>,
    discovery: Box<dyn ComponentDiscovery>,
    default_dimension: String,
    cli: Option<CliGroup>,
}

impl Default for Hub {
    fn default() -> Self {
        Self::new()
    }
}

impl Hub {
    /// Creates a Hub with the clap backend and inventory discovery.
    pub fn new() -> Self {
        Self {
            components: Registry::new(),
            commands: Registry::new(),
            injector: Injector::new(),
            cli_backend: Box::new(ClapBackend),
            discovery: Box::new(InventoryDiscovery),
            default_dimension: COMPONENT_DIMENSION.to_string(),
            cli: None,
        }
    }

    /// Starts configuring a Hub.
    pub fn builder() -> HubBuilder {
        HubBuilder::new()
    }

    /// The dimension components go to when none is given.
    pub fn default_dimension(&self) -> &str {
        &self.default_dimension
    }

    // ============================================================================
    // Components
    // ============================================================================

    /// Registers a component under its type name in the default dimension.
    pub fn add_component(&mut self, class: ComponentClass) -> Result<String, HubError> {
        self.add_component_with(class, ComponentOptions::default())
    }

    /// Registers a component, returning the name it was registered under.
    ///
    /// # Errors
    ///
    /// - [`HubError::Validation`] if the class's type name is not a usable
    ///   type identifier, the dimension is the command dimension, or any
    ///   other step fails (wrapped as "failed to add component").
    /// - [`HubError::AlreadyExists`] if the name or an alias is taken.
    ///
    /// The registry is unchanged on error.
    pub fn add_component_with(
        &mut self,
        class: ComponentClass,
        options: ComponentOptions,
    ) -> Result<String, HubError> {
        if !class.is_class_like() {
            return Err(HubError::validation(format!(
                "'{}' is not a component type",
                class.type_name()
            )));
        }

        self.register_component(class, options).map_err(|e| match e {
            e @ (HubError::AlreadyExists { .. } | HubError::Validation { .. }) => e,
            other => {
                HubError::validation(format!("failed to add component: {}", other)).with_source(other)
            }
        })
    }

    fn register_component(
        &mut self,
        class: ComponentClass,
        options: ComponentOptions,
    ) -> Result<String, HubError> {
        let ComponentOptions {
            name,
            dimension,
            version,
            description,
            author,
            tags,
            aliases,
            extra,
        } = options;

        let name = name.unwrap_or_else(|| class.type_name().to_string());
        let dimension = dimension.unwrap_or_else(|| self.default_dimension.clone());

        if dimension == COMMAND_DIMENSION {
            return Err(HubError::validation(format!(
                "dimension '{}' is reserved for commands",
                COMMAND_DIMENSION
            )));
        }
        if self.components.contains(&name, &dimension) {
            return Err(HubError::already_exists(name, dimension));
        }

        let info = ComponentInfo {
            name: name.clone(),
            type_name: class.type_name().to_string(),
            dimension: dimension.clone(),
            version,
            description: description.or_else(|| class.documentation().map(String::from)),
            author,
            tags,
        };

        let mut metadata: Metadata = extra;
        metadata.insert(COMPONENT_INFO_KEY.to_string(), serde_json::to_value(&info)?);

        self.components.register_with(
            name.clone(),
            dimension.clone(),
            ComponentRecord { info, class },
            RegisterOptions::new().aliases(aliases).metadata(metadata),
        )?;

        tracing::info!(component = %name, dimension = %dimension, "registered component");
        Ok(name)
    }

    /// Looks up a component by name or alias.
    ///
    /// Without a dimension every component dimension is searched.
    pub fn get_component(&self, name: &str, dimension: Option<&str>) -> Option<&ComponentRecord> {
        self.components.get(name, dimension)
    }

    /// The component's descriptive record.
    pub fn component_info(&self, name: &str, dimension: Option<&str>) -> Option<&ComponentInfo> {
        self.get_component(name, dimension).map(ComponentRecord::info)
    }

    /// The component's registry metadata, including extra values.
    pub fn component_metadata(&self, name: &str, dimension: Option<&str>) -> Option<&Metadata> {
        self.components.entry(name, dimension).map(Entry::metadata)
    }

    /// Component names in one dimension, or in every component dimension.
    pub fn list_components(&self, dimension: Option<&str>) -> Vec<String> {
        match dimension {
            Some(dimension) => self.components.list_dimension(dimension),
            None => self.components.list_all().into_values().flatten().collect(),
        }
    }

    /// The component registry.
    pub fn components(&self) -> &Registry<ComponentRecord> {
        &self.components
    }

    /// Registers every component class found under a plugin group.
    ///
    /// Classes whose name is already taken are skipped with a warning.
    /// Returns the names that were registered.
    pub fn discover_components(
        &mut self,
        group: &str,
        dimension: Option<&str>,
    ) -> Result<Vec<String>, HubError> {
        let classes = self
            .discovery
            .discover(group)
            .map_err(|e| HubError::Discovery {
                group: group.to_string(),
                source: e.into(),
            })?;

        let mut registered = Vec::with_capacity(classes.len());
        for class in classes {
            let mut options = ComponentOptions::new();
            if let Some(dimension) = dimension {
                options = options.dimension(dimension);
            }

            match self.add_component_with(class, options) {
                Ok(name) => registered.push(name),
                Err(e) if e.is_already_exists() => {
                    tracing::warn!(group, error = %e, "skipping discovered component");
                }
                Err(e) => return Err(e),
            }
        }

        tracing::debug!(group, count = registered.len(), "component discovery finished");
        Ok(registered)
    }

    // ============================================================================
    // Commands
    // ============================================================================

    /// Registers a command under its derived name.
    pub fn add_command(&mut self, spec: CommandSpec) -> Result<String, HubError> {
        self.add_command_with(spec, CommandOptions::default())
    }

    /// Registers a command, returning the name it was registered under.
    ///
    /// If a live CLI group exists the command is attached to it as well;
    /// if that fails the registration is rolled back.
    pub fn add_command_with(
        &mut self,
        spec: CommandSpec,
        options: CommandOptions,
    ) -> Result<String, HubError> {
        let CommandOptions {
            name,
            description,
            mut aliases,
            hidden,
            category,
        } = options;

        let name = name
            .or_else(|| spec.derived_name.clone())
            .unwrap_or_else(|| UNKNOWN_COMMAND.to_string());

        for alias in spec.clap_aliases() {
            if !aliases.contains(&alias) {
                aliases.push(alias);
            }
        }
        aliases.retain(|alias| *alias != name);

        // Hidden clap aliases resolve on the CLI too, so the registry has to see them.
        let mut lookup_aliases = aliases.clone();
        for alias in spec.clap_all_aliases() {
            if alias != name && !lookup_aliases.contains(&alias) {
                lookup_aliases.push(alias);
            }
        }

        self.check_command_keys(
            std::iter::once(name.as_str()).chain(lookup_aliases.iter().map(String::as_str)),
            &mut HashSet::new(),
        )?;

        let info = CommandInfo {
            name: name.clone(),
            description: description.or_else(|| spec.about()),
            aliases: aliases.clone(),
            hidden: hidden || spec.cli.as_ref().is_some_and(clap::Command::is_hide_set),
            category,
        };
        let info_value = serde_json::to_value(&info)?;

        self.commands.register_with(
            name.clone(),
            COMMAND_DIMENSION,
            CommandRecord {
                info,
                handler: spec.handler,
                cli: spec.cli,
            },
            RegisterOptions::new()
                .aliases(lookup_aliases)
                .meta(COMMAND_INFO_KEY, info_value),
        )?;

        let attached = match (
            self.cli.as_mut(),
            self.commands.get(&name, Some(COMMAND_DIMENSION)),
        ) {
            (Some(group), Some(record)) => self.cli_backend.attach(group, record),
            _ => Ok(()),
        };
        if let Err(e) = attached {
            self.commands.remove(&name, COMMAND_DIMENSION);
            return Err(e);
        }

        tracing::info!(command = %name, live = self.cli.is_some(), "registered command");
        Ok(name)
    }

    /// Fails if any key is reserved, already registered, or repeated in `seen`.
    fn check_command_keys<'k>(
        &self,
        keys: impl IntoIterator<Item = &'k str>,
        seen: &mut HashSet<String>,
    ) -> Result<(), HubError> {
        for key in keys {
            if is_reserved_command(key) {
                return Err(HubError::validation(format!(
                    "command name '{}' is reserved",
                    key
                )));
            }
            if self.commands.contains(key, COMMAND_DIMENSION) || !seen.insert(key.to_string()) {
                return Err(HubError::already_exists(key, COMMAND_DIMENSION));
            }
        }
        Ok(())
    }

    /// Looks up a command by name or alias.
    pub fn get_command(&self, name: &str) -> Option<&CommandRecord> {
        self.commands.get(name, Some(COMMAND_DIMENSION))
    }

    /// The command's descriptive record.
    pub fn command_info(&self, name: &str) -> Option<&CommandInfo> {
        self.get_command(name).map(CommandRecord::info)
    }

    /// Command names in registration order.
    pub fn list_commands(&self) -> Vec<String> {
        self.commands.list_dimension(COMMAND_DIMENSION)
    }

    // ============================================================================
    // CLI
    // ============================================================================

    /// Builds a CLI group from every registered command and keeps it as the
    /// live group. Commands added later are attached to it.
    ///
    /// # Errors
    ///
    /// [`HubError::DependencyMissing`] when the backend is unavailable.
    pub fn create_cli(&mut self, name: &str, version: Option<&str>) -> Result<&CliGroup, HubError> {
        let records: Vec<&CommandRecord> = self.commands.iter().map(Entry::value).collect();
        let group = self.cli_backend.build_group(name, version, &records)?;

        tracing::info!(
            cli = name,
            backend = self.cli_backend.name(),
            commands = records.len(),
            "created CLI group"
        );
        Ok(self.cli.insert(group))
    }

    /// The live CLI group, if [`create_cli`](Self::create_cli) has run.
    pub fn cli(&self) -> Option<&CliGroup> {
        self.cli.as_ref()
    }

    /// Runs the live CLI group against `args` (program name first).
    pub fn run_cli<I, T>(&self, args: I) -> Result<CliOutcome, HubError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let group = self
            .cli
            .as_ref()
            .ok_or_else(|| HubError::validation("no CLI group has been created"))?;
        Ok(group.run_from(args)?)
    }

    /// Imports every subcommand of an externally built group, with its
    /// handler if it has one. Returns the imported names.
    ///
    /// The import is all or nothing: every name and alias is checked before
    /// anything is registered, and a later failure undoes the commands
    /// imported so far, including their attachment to the live group.
    pub fn add_cli_group(&mut self, group: &CliGroup) -> Result<Vec<String>, HubError> {
        let subcommands: Vec<&clap::Command> = group
            .command()
            .get_subcommands()
            .filter(|sub| sub.get_name() != "help")
            .collect();

        let mut seen = HashSet::new();
        for sub in &subcommands {
            let name = sub.get_name();
            let aliases = sub.get_all_aliases().filter(|alias| *alias != name);
            self.check_command_keys(std::iter::once(name).chain(aliases), &mut seen)?;
        }

        let live_snapshot = self.cli.clone();
        let mut imported = Vec::with_capacity(subcommands.len());
        for sub in subcommands {
            let spec = CommandSpec::from_clap(sub.clone())
                .with_handler_fn(group.handler_for(sub.get_name()));
            match self.add_command(spec) {
                Ok(name) => imported.push(name),
                Err(e) => {
                    for name in &imported {
                        self.commands.remove(name, COMMAND_DIMENSION);
                    }
                    self.cli = live_snapshot;
                    return Err(e);
                }
            }
        }

        tracing::info!(group = group.name(), count = imported.len(), "imported CLI group");
        Ok(imported)
    }

    // ============================================================================
    // Lifecycle
    // ============================================================================

    /// Calls `initialize` on every component that has one.
    pub fn initialize(&self) -> Vec<LifecycleFailure> {
        self.sweep(LifecyclePhase::Initialize)
    }

    /// Calls `cleanup` on every component that has one.
    pub fn cleanup(&self) -> Vec<LifecycleFailure> {
        self.sweep(LifecyclePhase::Cleanup)
    }

    fn sweep(&self, phase: LifecyclePhase) -> Vec<LifecycleFailure> {
        let mut failures = Vec::new();

        for entry in &self.components {
            let class = &entry.value().class;
            let outcome = match phase {
                LifecyclePhase::Initialize => class.run_initialize(),
                LifecyclePhase::Cleanup => class.run_cleanup(),
            };

            match outcome {
                None => {}
                Some(Ok(())) => {
                    tracing::debug!(component = entry.name(), %phase, "lifecycle step finished");
                }
                Some(Err(error)) => {
                    tracing::error!(
                        component = entry.name(),
                        dimension = entry.dimension(),
                        %phase,
                        error = %error,
                        "lifecycle step failed"
                    );
                    failures.push(LifecycleFailure {
                        component: entry.name().to_string(),
                        dimension: entry.dimension().to_string(),
                        phase,
                        error,
                    });
                }
            }
        }

        failures
    }

    /// Clears one dimension, or everything.
    ///
    /// Clearing the command dimension (or everything) also drops the live
    /// CLI group. Injected instances are not affected.
    pub fn clear(&mut self, dimension: Option<&str>) {
        match dimension {
            None => {
                self.components.clear(None);
                self.commands.clear(None);
                self.cli = None;
            }
            Some(dimension) if dimension == COMMAND_DIMENSION => {
                self.commands.clear(None);
                self.cli = None;
            }
            Some(dimension) => self.components.clear(Some(dimension)),
        }
    }

    /// Initializes the Hub and returns a guard that cleans up on drop.
    pub fn scope(&mut self) -> HubScope<'_> {
        HubScope::enter(self)
    }

    /// Runs `f` between `initialize` and `cleanup`.
    ///
    /// Cleanup runs even if `f` panics.
    pub fn scoped<R>(&mut self, f: impl FnOnce(&mut Hub) -> R) -> R {
        let mut scope = self.scope();
        f(&mut scope)
    }

    // ============================================================================
    // Dependency injection
    // ============================================================================

    /// Registers an injectable instance, returning the one it replaced.
    pub fn register<T: 'static>(&mut self, instance: T, name: Option<&str>) -> Option<Rc<T>> {
        self.injector.register(instance, name)
    }

    /// Registers an already shared injectable instance.
    pub fn register_rc<T: 'static>(&mut self, instance: Rc<T>, name: Option<&str>) -> Option<Rc<T>> {
        self.injector.register_rc(instance, name)
    }

    /// The instance registered under exactly `(T, name)`.
    pub fn instance<T: 'static>(&self, name: Option<&str>) -> Option<Rc<T>> {
        self.injector.get(name)
    }

    /// The instance store.
    pub fn injector(&self) -> &Injector {
        &self.injector
    }

    /// Builds a `T` from registered instances and per-call overrides.
    ///
    /// # Errors
    ///
    /// - [`HubError::NotFound`] if a required dependency has no override
    ///   and no matching registration.
    /// - [`HubError::Validation`] if [`Injectable::construct`] fails.
    pub fn resolve<T: Injectable>(&self, overrides: Overrides) -> Result<T, HubError> {
        let target = type_name::<T>();
        let resolver = Resolver::new(&self.injector, &overrides, target);

        for dep in T::dependencies() {
            if dep.required && !resolver.can_satisfy(&dep) {
                return Err(HubError::NotFound {
                    param: dep.param.to_string(),
                    type_name: dep.type_name.to_string(),
                    target: target.to_string(),
                });
            }
        }

        tracing::debug!(ty = target, "resolving dependencies");
        T::construct(&resolver).map_err(|e| match e.downcast::<HubError>() {
            Ok(hub_error) => hub_error,
            Err(e) => HubError::validation(format!("failed to construct {}: {}", target, e))
                .with_source(e),
        })
    }
}

impl fmt::Debug for Hub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hub")
            .field("components", &self.components.len())
            .field("commands", &self.commands.len())
            .field("injector", &self.injector)
            .field("cli_backend", &self.cli_backend.name())
            .field("default_dimension", &self.default_dimension)
            .field("cli", &self.cli)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Hub`].
#[derive(Default)]
pub struct HubBuilder {
    cli_backend: Option<Box<dyn CliBackend>>,
    discovery: Option<Box<dyn ComponentDiscovery>>,
    component_dimension: Option<String>,
}

impl HubBuilder {
    /// Creates a builder with the default collaborators.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the CLI backend.
    pub fn cli_backend(mut self, backend: impl CliBackend + 'static) -> Self {
        self.cli_backend = Some(Box::new(backend));
        self
    }

    /// Sets the component discovery mechanism.
    pub fn discovery(mut self, discovery: impl ComponentDiscovery + 'static) -> Self {
        self.discovery = Some(Box::new(discovery));
        self
    }

    /// Sets the dimension components go to when none is given.
    pub fn component_dimension(mut self, dimension: impl Into<String>) -> Self {
        self.component_dimension = Some(dimension.into());
        self
    }

    /// Builds the Hub.
    ///
    /// Fails with [`HubError::Validation`] if the default dimension is blank
    /// or the reserved command dimension.
    pub fn build(self) -> Result<Hub, HubError> {
        let default_dimension = self
            .component_dimension
            .unwrap_or_else(|| COMPONENT_DIMENSION.to_string());

        if default_dimension.trim().is_empty() {
            return Err(HubError::validation("component dimension must not be empty"));
        }
        if default_dimension == COMMAND_DIMENSION {
            return Err(HubError::validation(format!(
                "dimension '{}' is reserved for commands",
                COMMAND_DIMENSION
            )));
        }

        let mut hub = Hub::new();
        hub.default_dimension = default_dimension;
        if let Some(backend) = self.cli_backend {
            hub.cli_backend = backend;
        }
        if let Some(discovery) = self.discovery {
            hub.discovery = discovery;
        }
        Ok(hub)
    }
}

impl fmt::Debug for HubBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HubBuilder")
            .field("cli_backend", &self.cli_backend.as_ref().map(|b| b.name()))
            .field("has_discovery", &self.discovery.is_some())
            .field("component_dimension", &self.component_dimension)
            .finish()
    }
}

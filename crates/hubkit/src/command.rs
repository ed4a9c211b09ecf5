//! Command descriptions and metadata.
//!
//! A command reaches the Hub as a [`CommandSpec`]: either a plain handler
//! function or an externally built `clap::Command`, optionally with a
//! handler attached.
//!
//! # Naming
//!
//! When no explicit name is given, plain functions are named after
//! themselves with underscores turned into hyphens (`sync_data` becomes
//! `sync-data`). Closures have no name of their own and fall back to
//! [`UNKNOWN_COMMAND`]. Clap commands keep their clap name.

use std::fmt;
use std::rc::Rc;

use clap::ArgMatches;
use serde::{Deserialize, Serialize};

use crate::component::short_type_name;

/// Dimension reserved for commands.
pub const COMMAND_DIMENSION: &str = "command";

/// Name given to commands whose callable has no usable name.
pub const UNKNOWN_COMMAND: &str = "unknown_command";

/// Names clap claims for itself on every command group.
pub const RESERVED_COMMAND_NAMES: &[&str] = &["help"];

/// Returns true if `name` cannot be used as a command name or alias.
pub fn is_reserved_command(name: &str) -> bool {
    RESERVED_COMMAND_NAMES.contains(&name)
}

/// A command handler.
pub type CommandFn = Rc<dyn Fn(&ArgMatches) -> anyhow::Result<()>>;

/// Derives a command name from a callable's own name.
///
/// Returns `None` for closures and other anonymous callables.
pub(crate) fn callable_name<F>() -> Option<String> {
    if std::any::type_name::<F>().contains("{{closure}}") {
        return None;
    }
    let name = short_type_name::<F>();
    let usable = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-');
    usable.then(|| name.replace('_', "-"))
}

/// A command to register: a handler function, a clap command, or both.
#[derive(Clone)]
pub struct CommandSpec {
    pub(crate) derived_name: Option<String>,
    pub(crate) handler: Option<CommandFn>,
    pub(crate) cli: Option<clap::Command>,
}

impl CommandSpec {
    /// A command backed by a plain function.
    ///
    /// ```rust
    /// use hubkit::CommandSpec;
    /// use clap::ArgMatches;
    ///
    /// fn sync_data(_matches: &ArgMatches) -> anyhow::Result<()> {
    ///     Ok(())
    /// }
    ///
    /// let spec = CommandSpec::from_fn(sync_data);
    /// assert_eq!(spec.derived_name(), Some("sync-data"));
    /// ```
    pub fn from_fn<F>(handler: F) -> Self
    where
        F: Fn(&ArgMatches) -> anyhow::Result<()> + 'static,
    {
        Self {
            derived_name: callable_name::<F>(),
            handler: Some(Rc::new(handler)),
            cli: None,
        }
    }

    /// A command built with clap elsewhere.
    pub fn from_clap(command: clap::Command) -> Self {
        Self {
            derived_name: Some(command.get_name().to_string()),
            handler: None,
            cli: Some(command),
        }
    }

    /// Attaches (or replaces) the handler.
    pub fn handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&ArgMatches) -> anyhow::Result<()> + 'static,
    {
        self.handler = Some(Rc::new(handler));
        self
    }

    pub(crate) fn with_handler_fn(mut self, handler: Option<CommandFn>) -> Self {
        if handler.is_some() {
            self.handler = handler;
        }
        self
    }

    /// The name derived from the callable or clap command, if any.
    pub fn derived_name(&self) -> Option<&str> {
        self.derived_name.as_deref()
    }

    /// The clap command's about text.
    pub(crate) fn about(&self) -> Option<String> {
        self.cli
            .as_ref()
            .and_then(|c| c.get_about())
            .map(|about| about.to_string())
    }

    /// Visible aliases declared on the clap command.
    pub(crate) fn clap_aliases(&self) -> Vec<String> {
        self.cli
            .as_ref()
            .map(|c| c.get_visible_aliases().map(String::from).collect())
            .unwrap_or_default()
    }

    /// Every alias declared on the clap command, hidden ones included.
    pub(crate) fn clap_all_aliases(&self) -> Vec<String> {
        self.cli
            .as_ref()
            .map(|c| c.get_all_aliases().map(String::from).collect())
            .unwrap_or_default()
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("derived_name", &self.derived_name)
            .field("has_handler", &self.handler.is_some())
            .field("has_cli", &self.cli.is_some())
            .finish()
    }
}

/// Descriptive record attached to a registered command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandInfo {
    /// Registered name
    pub name: String,
    /// Description (defaults to the clap about text)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Alternative names
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Hidden from help output
    #[serde(default)]
    pub hidden: bool,
    /// Help category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// A registered command.
#[derive(Clone)]
pub struct CommandRecord {
    pub(crate) info: CommandInfo,
    pub(crate) handler: Option<CommandFn>,
    pub(crate) cli: Option<clap::Command>,
}

impl CommandRecord {
    /// The command's descriptive record.
    pub fn info(&self) -> &CommandInfo {
        &self.info
    }

    /// The handler, if one was registered.
    pub fn handler(&self) -> Option<&CommandFn> {
        self.handler.as_ref()
    }

    /// The externally built clap command, if any.
    pub fn cli(&self) -> Option<&clap::Command> {
        self.cli.as_ref()
    }
}

impl fmt::Debug for CommandRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRecord")
            .field("info", &self.info)
            .field("has_handler", &self.handler.is_some())
            .field("has_cli", &self.cli.is_some())
            .finish()
    }
}

/// Options for [`Hub::add_command_with`](crate::Hub::add_command_with).
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    pub(crate) name: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) aliases: Vec<String>,
    pub(crate) hidden: bool,
    pub(crate) category: Option<String>,
}

impl CommandOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers under this name instead of the derived one.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds an alias.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Hides the command from help output.
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Sets the help category.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Command;

    fn sync_data(_m: &ArgMatches) -> anyhow::Result<()> {
        Ok(())
    }

    fn list(_m: &ArgMatches) -> anyhow::Result<()> {
        Ok(())
    }

    #[test]
    fn test_fn_name_is_derived() {
        assert_eq!(CommandSpec::from_fn(sync_data).derived_name(), Some("sync-data"));
        assert_eq!(CommandSpec::from_fn(list).derived_name(), Some("list"));
    }

    #[test]
    fn test_closure_has_no_name() {
        let spec = CommandSpec::from_fn(|_m: &ArgMatches| Ok(()));
        assert_eq!(spec.derived_name(), None);
    }

    #[test]
    fn test_clap_command_name_and_about() {
        let spec = CommandSpec::from_clap(
            Command::new("deploy")
                .about("Ship it")
                .visible_alias("d"),
        );
        assert_eq!(spec.derived_name(), Some("deploy"));
        assert_eq!(spec.about(), Some("Ship it".to_string()));
        assert_eq!(spec.clap_aliases(), vec!["d".to_string()]);
        assert_eq!(spec.clap_all_aliases(), vec!["d".to_string()]);
        assert!(spec.handler.is_none());
    }

    #[test]
    fn test_hidden_aliases_are_collected() {
        let spec = CommandSpec::from_clap(Command::new("show").alias("cat").visible_alias("s"));
        assert_eq!(spec.clap_aliases(), vec!["s".to_string()]);

        let mut all = spec.clap_all_aliases();
        all.sort();
        assert_eq!(all, vec!["cat".to_string(), "s".to_string()]);
    }

    #[test]
    fn test_help_is_reserved() {
        assert!(is_reserved_command("help"));
        assert!(!is_reserved_command("helper"));
    }

    #[test]
    fn test_handler_attaches() {
        let spec = CommandSpec::from_clap(Command::new("deploy")).handler(|_m| Ok(()));
        assert!(spec.handler.is_some());
    }

    #[test]
    fn test_with_handler_fn_keeps_existing_on_none() {
        let spec = CommandSpec::from_fn(list).with_handler_fn(None);
        assert!(spec.handler.is_some());
    }
}

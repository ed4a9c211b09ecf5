//! CLI assembly.
//!
//! The Hub does not build command-line parsers itself; it hands its
//! registered commands to a [`CliBackend`] chosen at construction time.
//!
//! - [`ClapBackend`] (the default) builds a `clap::Command` with one
//!   subcommand per registered command.
//! - [`UnavailableBackend`] stands in when no CLI toolkit should be used;
//!   every call fails with [`HubError::DependencyMissing`].
//!
//! The result is a [`CliGroup`]: the clap command plus a handler table,
//! runnable with [`CliGroup::run_from`].
//!
//! ```rust
//! use hubkit::{CliOutcome, CommandSpec, Hub};
//!
//! let mut hub = Hub::new();
//! hub.add_command(CommandSpec::from_clap(clap::Command::new("ping")).handler(|_m| Ok(())))?;
//! hub.create_cli("tool", Some("1.0.0"))?;
//!
//! let outcome = hub.run_cli(["tool", "ping"])?;
//! assert_eq!(outcome, CliOutcome::Handled { command: "ping".into() });
//! # Ok::<(), hubkit::HubError>(())
//! ```

mod dispatch;

use std::collections::HashMap;
use std::ffi::OsString;
use std::fmt;
use std::rc::Rc;

use clap::error::ErrorKind;
use clap::ArgMatches;

use crate::command::{is_reserved_command, CommandFn, CommandRecord, COMMAND_DIMENSION};
use crate::error::{CliError, HubError};

pub use dispatch::{extract_command_path, path_to_string, top_level};

/// Builds and extends CLI groups from registered commands.
pub trait CliBackend {
    /// Short backend name, for logs.
    fn name(&self) -> &'static str;

    /// Materializes a group containing every given command.
    fn build_group(
        &self,
        name: &str,
        version: Option<&str>,
        commands: &[&CommandRecord],
    ) -> Result<CliGroup, HubError>;

    /// Adds one command to an existing group.
    fn attach(&self, group: &mut CliGroup, command: &CommandRecord) -> Result<(), HubError>;
}

/// The clap-based backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClapBackend;

impl ClapBackend {
    fn subcommand_for(record: &CommandRecord) -> clap::Command {
        let info = &record.info;
        let mut cmd = record
            .cli
            .clone()
            .unwrap_or_else(|| clap::Command::new(info.name.clone()))
            .name(info.name.clone());

        if cmd.get_about().is_none() {
            if let Some(description) = &info.description {
                cmd = cmd.about(description.clone());
            }
        }

        for alias in &info.aliases {
            if !cmd.get_visible_aliases().any(|a| a == alias.as_str()) {
                cmd = cmd.visible_alias(alias.clone());
            }
        }

        cmd.hide(info.hidden)
    }
}

impl CliBackend for ClapBackend {
    fn name(&self) -> &'static str {
        "clap"
    }

    fn build_group(
        &self,
        name: &str,
        version: Option<&str>,
        commands: &[&CommandRecord],
    ) -> Result<CliGroup, HubError> {
        let mut command = clap::Command::new(name.to_string());
        if let Some(version) = version {
            command = command.version(version.to_string());
        }

        let mut group = CliGroup::new(command);
        for record in commands {
            self.attach(&mut group, record)?;
        }
        Ok(group)
    }

    fn attach(&self, group: &mut CliGroup, command: &CommandRecord) -> Result<(), HubError> {
        let sub = Self::subcommand_for(command);

        for key in std::iter::once(sub.get_name()).chain(sub.get_all_aliases()) {
            if is_reserved_command(key) {
                return Err(HubError::validation(format!(
                    "command name '{}' is reserved",
                    key
                )));
            }
            if group.has_command(key) {
                return Err(HubError::already_exists(key, COMMAND_DIMENSION));
            }
        }

        group.add_subcommand(sub, command.handler.clone());
        Ok(())
    }
}

/// Backend used when no CLI toolkit is available.
#[derive(Debug, Clone)]
pub struct UnavailableBackend {
    reason: String,
}

impl UnavailableBackend {
    /// Creates the backend with a reason reported in every error.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for UnavailableBackend {
    fn default() -> Self {
        Self::new("no CLI toolkit is configured for this hub")
    }
}

impl CliBackend for UnavailableBackend {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    fn build_group(
        &self,
        _name: &str,
        _version: Option<&str>,
        _commands: &[&CommandRecord],
    ) -> Result<CliGroup, HubError> {
        Err(HubError::DependencyMissing(self.reason.clone()))
    }

    fn attach(&self, _group: &mut CliGroup, _command: &CommandRecord) -> Result<(), HubError> {
        Err(HubError::DependencyMissing(self.reason.clone()))
    }
}

/// What happened when a [`CliGroup`] ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliOutcome {
    /// A handler ran successfully; `command` is the dot-separated path.
    Handled {
        /// The command path, e.g. `"db.migrate"`
        command: String,
    },
    /// The command exists but has no handler.
    NoHandler(String),
    /// No subcommand was given.
    NoCommand,
    /// Clap rendered help or version text instead of running anything.
    Displayed(String),
}

/// A runnable command-line group.
#[derive(Clone)]
pub struct CliGroup {
    command: clap::Command,
    handlers: HashMap<String, CommandFn>,
}

impl CliGroup {
    /// Wraps a clap command. Existing subcommands have no handlers until
    /// [`with_handler`](Self::with_handler) adds them.
    pub fn new(command: clap::Command) -> Self {
        Self {
            command,
            handlers: HashMap::new(),
        }
    }

    /// Sets the handler for a subcommand.
    pub fn with_handler<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&ArgMatches) -> anyhow::Result<()> + 'static,
    {
        self.handlers.insert(name.into(), Rc::new(handler));
        self
    }

    /// The group's program name.
    pub fn name(&self) -> &str {
        self.command.get_name()
    }

    /// The underlying clap command.
    pub fn command(&self) -> &clap::Command {
        &self.command
    }

    /// Names of the group's subcommands.
    pub fn command_names(&self) -> Vec<String> {
        self.command
            .get_subcommands()
            .map(|c| c.get_name().to_string())
            .collect()
    }

    /// Returns true if a subcommand has this name or alias.
    pub fn has_command(&self, name: &str) -> bool {
        self.command.find_subcommand(name).is_some()
    }

    pub(crate) fn handler_for(&self, name: &str) -> Option<CommandFn> {
        self.handlers.get(name).cloned()
    }

    pub(crate) fn add_subcommand(&mut self, sub: clap::Command, handler: Option<CommandFn>) {
        let name = sub.get_name().to_string();
        let command = std::mem::replace(&mut self.command, clap::Command::new(""));
        self.command = command.subcommand(sub);
        if let Some(handler) = handler {
            self.handlers.insert(name, handler);
        }
    }

    /// Parses `args` (program name first) and runs the matching handler.
    pub fn run_from<I, T>(&self, args: I) -> Result<CliOutcome, CliError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = match self.command.clone().try_get_matches_from(args) {
            Ok(matches) => matches,
            Err(e)
                if matches!(
                    e.kind(),
                    ErrorKind::DisplayHelp
                        | ErrorKind::DisplayVersion
                        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) =>
            {
                return Ok(CliOutcome::Displayed(e.render().to_string()));
            }
            Err(e) => return Err(CliError::Parse(e)),
        };

        let Some((name, sub_matches)) = top_level(&matches) else {
            return Ok(CliOutcome::NoCommand);
        };

        let Some(handler) = self.handlers.get(name) else {
            return Ok(CliOutcome::NoHandler(name.to_string()));
        };

        handler(sub_matches).map_err(|e| CliError::Handler {
            command: name.to_string(),
            source: e.into(),
        })?;

        Ok(CliOutcome::Handled {
            command: path_to_string(&extract_command_path(&matches)),
        })
    }
}

impl fmt::Debug for CliGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CliGroup")
            .field("name", &self.name())
            .field("commands", &self.command_names())
            .field("handler_count", &self.handlers.len())
            .finish()
    }
}

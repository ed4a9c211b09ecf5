//! Error types for Hub operations.

use hubkit_registry::RegistryError;
use thiserror::Error;

/// Boxed error used as a source for wrapped failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by [`Hub`](crate::Hub) operations.
#[derive(Debug, Error)]
pub enum HubError {
    /// A component or command with this name already exists in the dimension.
    #[error("'{name}' already exists in dimension '{dimension}'")]
    AlreadyExists {
        /// The conflicting name
        name: String,
        /// The dimension it conflicts in
        dimension: String,
    },

    /// Malformed input, or an unexpected internal failure re-wrapped for callers.
    #[error("{message}")]
    Validation {
        /// Human-readable error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<BoxError>,
    },

    /// Dependency resolution could not satisfy a required parameter.
    #[error("no registered instance of {type_name} for parameter '{param}' of {target}")]
    NotFound {
        /// The constructor parameter
        param: String,
        /// The parameter's declared type
        type_name: String,
        /// The type being resolved
        target: String,
    },

    /// An optional collaborator (such as the CLI toolkit) is not available.
    #[error("missing dependency: {0}")]
    DependencyMissing(String),

    /// Component discovery failed for a plugin group.
    #[error("component discovery failed for group '{group}'")]
    Discovery {
        /// The plugin group
        group: String,
        /// The discovery failure
        #[source]
        source: BoxError,
    },

    /// Registry metadata could not be serialized.
    #[error("metadata serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The live CLI group failed to run.
    #[error(transparent)]
    Cli(#[from] CliError),
}

impl HubError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            source: None,
        }
    }

    /// Attaches a source to a validation error. Other variants are returned as-is.
    pub fn with_source<E>(self, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        match self {
            Self::Validation { message, .. } => Self::Validation {
                message,
                source: Some(source.into()),
            },
            other => other,
        }
    }

    /// Creates an "already exists" error.
    pub fn already_exists(name: impl Into<String>, dimension: impl Into<String>) -> Self {
        Self::AlreadyExists {
            name: name.into(),
            dimension: dimension.into(),
        }
    }

    /// Returns true for [`HubError::AlreadyExists`].
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }

    /// Returns true for [`HubError::Validation`].
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Returns true for [`HubError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<RegistryError> for HubError {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::AlreadyExists { name, dimension } => {
                HubError::AlreadyExists { name, dimension }
            }
            invalid @ RegistryError::InvalidName { .. } => {
                HubError::validation(invalid.to_string()).with_source(invalid)
            }
        }
    }
}

/// Errors returned when running a [`CliGroup`](crate::CliGroup).
#[derive(Debug, Error)]
pub enum CliError {
    /// Argument parsing failed.
    #[error("argument parsing failed: {0}")]
    Parse(#[from] clap::Error),

    /// A command handler returned an error.
    #[error("command '{command}' failed: {source}")]
    Handler {
        /// The command that failed
        command: String,
        /// The handler's error
        #[source]
        source: BoxError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_registry_error_conversion() {
        let err: HubError = RegistryError::already_exists("db", "component").into();
        assert!(err.is_already_exists());
        assert_eq!(err.to_string(), "'db' already exists in dimension 'component'");

        let err: HubError = RegistryError::invalid_name("", "name must not be empty").into();
        assert!(err.is_validation());
        assert!(err.source().is_some());
    }

    #[test]
    fn test_with_source_only_touches_validation() {
        let err = HubError::DependencyMissing("clap".into()).with_source(std::fmt::Error);
        assert!(matches!(err, HubError::DependencyMissing(_)));

        let err = HubError::validation("bad").with_source(std::fmt::Error);
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "bad");
    }

    #[test]
    fn test_not_found_display() {
        let err = HubError::NotFound {
            param: "db".into(),
            type_name: "Database".into(),
            target: "Service".into(),
        };
        assert_eq!(
            err.to_string(),
            "no registered instance of Database for parameter 'db' of Service"
        );
        assert!(err.is_not_found());
    }
}

//! Error types for registry operations.

use thiserror::Error;

/// Errors returned when registering entries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The `(name, dimension)` key, or one of the requested aliases, is taken.
    #[error("'{name}' already exists in dimension '{dimension}'")]
    AlreadyExists {
        /// The conflicting name (canonical name or alias)
        name: String,
        /// The dimension the conflict was found in
        dimension: String,
    },

    /// The name, alias or dimension cannot be used as a key.
    #[error("invalid registry name '{name}': {reason}")]
    InvalidName {
        /// The rejected value
        name: String,
        /// Why it was rejected
        reason: String,
    },
}

impl RegistryError {
    /// Creates an [`RegistryError::AlreadyExists`] error.
    pub fn already_exists(name: impl Into<String>, dimension: impl Into<String>) -> Self {
        Self::AlreadyExists {
            name: name.into(),
            dimension: dimension.into(),
        }
    }

    /// Creates an [`RegistryError::InvalidName`] error.
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if this is an "already exists" conflict.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_exists_display() {
        let err = RegistryError::already_exists("db", "component");
        assert_eq!(
            err.to_string(),
            "'db' already exists in dimension 'component'"
        );
        assert!(err.is_already_exists());
    }

    #[test]
    fn test_invalid_name_display() {
        let err = RegistryError::invalid_name("", "must not be empty");
        assert_eq!(err.to_string(), "invalid registry name '': must not be empty");
        assert!(!err.is_already_exists());
    }
}

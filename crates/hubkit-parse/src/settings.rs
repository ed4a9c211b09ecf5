//! Typed access to environment-provided settings.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::boolean::{parse_bool_extended, parse_bool_strict};
use crate::env::{EnvReader, RealEnv};
use crate::error::ParseError;
use crate::json::{parse_json_dict, parse_json_list};
use crate::number::{parse_float_with_validation, parse_sample_rate};
use crate::text::trim_value;

/// A setting was present but could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value for {key}: {source}")]
pub struct SettingsError {
    /// Full variable name, prefix included
    pub key: String,
    /// The parser failure
    #[source]
    pub source: ParseError,
}

/// Reads typed settings from an [`EnvReader`].
///
/// Unset and empty variables count as "not configured" and fall back to the
/// caller's default. Set-but-invalid values are errors, except for
/// [`flag`](Self::flag), which is lenient by definition.
///
/// # Example
///
/// ```rust
/// use hubkit_parse::{MockEnv, Settings};
///
/// let env = MockEnv::new()
///     .with_var("HUB_SAMPLE_RATE", "0.2")
///     .with_var("HUB_TAGS", r#"["a", "b"]"#);
/// let settings = Settings::with_reader(env).prefix("HUB_");
///
/// assert_eq!(settings.sample_rate("SAMPLE_RATE", 1.0).unwrap(), 0.2);
/// assert_eq!(settings.json_list("TAGS").unwrap().len(), 2);
/// assert_eq!(settings.string("MISSING"), None);
/// ```
#[derive(Debug, Clone)]
pub struct Settings<R: EnvReader = RealEnv> {
    reader: R,
    prefix: String,
}

impl Settings<RealEnv> {
    /// Settings backed by the process environment.
    pub fn from_env() -> Self {
        Self::with_reader(RealEnv)
    }
}

impl Default for Settings<RealEnv> {
    fn default() -> Self {
        Self::from_env()
    }
}

impl<R: EnvReader> Settings<R> {
    /// Settings backed by a custom reader.
    pub fn with_reader(reader: R) -> Self {
        Self {
            reader,
            prefix: String::new(),
        }
    }

    /// Sets a prefix prepended to every key.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// The full variable name for `name`.
    pub fn key(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    fn raw(&self, name: &str) -> Option<String> {
        self.reader
            .var(&self.key(name))
            .filter(|v| !trim_value(v).is_empty())
    }

    fn wrap(&self, name: &str, source: ParseError) -> SettingsError {
        SettingsError {
            key: self.key(name),
            source,
        }
    }

    /// A raw string setting.
    pub fn string(&self, name: &str) -> Option<String> {
        self.raw(name)
    }

    /// A lenient flag: only `true/yes/1/on` enable it.
    pub fn flag(&self, name: &str, default: bool) -> bool {
        self.raw(name)
            .map(|v| parse_bool_extended(&v))
            .unwrap_or(default)
    }

    /// A strict flag: unrecognised values are errors.
    pub fn strict_flag(&self, name: &str, default: bool) -> Result<bool, SettingsError> {
        match self.raw(name) {
            Some(v) => parse_bool_strict(v).map_err(|e| self.wrap(name, e)),
            None => Ok(default),
        }
    }

    /// A float within optional inclusive bounds.
    pub fn float(
        &self,
        name: &str,
        default: f64,
        min_val: Option<f64>,
        max_val: Option<f64>,
    ) -> Result<f64, SettingsError> {
        match self.raw(name) {
            Some(v) => parse_float_with_validation(&v, min_val, max_val).map_err(|e| self.wrap(name, e)),
            None => Ok(default),
        }
    }

    /// A sampling rate in `[0.0, 1.0]`.
    pub fn sample_rate(&self, name: &str, default: f64) -> Result<f64, SettingsError> {
        match self.raw(name) {
            Some(v) => parse_sample_rate(&v).map_err(|e| self.wrap(name, e)),
            None => Ok(default),
        }
    }

    /// A JSON object; unset means empty.
    pub fn json_dict(&self, name: &str) -> Result<Map<String, Value>, SettingsError> {
        parse_json_dict(&self.raw(name).unwrap_or_default()).map_err(|e| self.wrap(name, e))
    }

    /// A JSON array; unset means empty.
    pub fn json_list(&self, name: &str) -> Result<Vec<Value>, SettingsError> {
        parse_json_list(&self.raw(name).unwrap_or_default()).map_err(|e| self.wrap(name, e))
    }
}

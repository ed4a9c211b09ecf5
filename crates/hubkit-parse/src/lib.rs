//! Parsers for configuration values.
//!
//! Configuration usually arrives as strings (environment variables, CLI
//! flags, config files). This crate turns those strings into typed values
//! with predictable failure modes:
//!
//! - [`parse_bool_extended`]: lenient, never fails
//! - [`parse_bool_strict`] / [`parse_bool`]: strict, with a typed error
//!   listing the accepted literals
//! - [`parse_float_with_validation`] / [`parse_sample_rate`]: bounded floats
//! - [`parse_json_dict`] / [`parse_json_list`]: JSON containers, blank means empty
//!
//! [`Settings`] wraps these parsers around an [`EnvReader`] so an
//! application can read its environment in one place, and tests can swap
//! in a [`MockEnv`].
//!
//! ```rust
//! use hubkit_parse::{parse_bool_extended, parse_sample_rate, Settings, MockEnv};
//!
//! assert!(parse_bool_extended(" Yes "));
//! assert_eq!(parse_sample_rate("0.25").unwrap(), 0.25);
//!
//! let settings = Settings::with_reader(MockEnv::new().with_var("APP_DEBUG", "on"))
//!     .prefix("APP_");
//! assert!(settings.flag("DEBUG", false));
//! ```

mod boolean;
mod env;
mod error;
mod json;
mod number;
mod settings;
mod text;

pub use boolean::{parse_bool, parse_bool_extended, parse_bool_strict, BoolInput, BOOL_LITERALS};
pub use env::{EnvReader, MockEnv, RealEnv};
pub use error::ParseError;
pub use json::{parse_json_dict, parse_json_list};
pub use number::{parse_float_with_validation, parse_sample_rate};
pub use settings::{Settings, SettingsError};

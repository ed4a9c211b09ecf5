//! Boolean coercion.
//!
//! Three flavours, from most to least forgiving:
//!
//! | Function | Unknown string | Unsupported kind |
//! |----------|----------------|------------------|
//! | [`parse_bool_extended`] | `false` | n/a (strings only) |
//! | [`parse_bool`] (`strict = false`) | `false` | [`ParseError::Type`] |
//! | [`parse_bool_strict`] | [`ParseError::Value`] | [`ParseError::Type`] |

use std::fmt;

use crate::error::ParseError;
use crate::text::trim_value;

/// Literals accepted by [`parse_bool_strict`], truthy ones first.
pub const BOOL_LITERALS: &[&str] = &[
    "true", "yes", "1", "on", "enabled", "false", "no", "0", "off", "disabled",
];

const TRUTHY: &[&str] = &["true", "yes", "1", "on", "enabled"];
const FALSY: &[&str] = &["false", "no", "0", "off", "disabled"];

/// Lenient truthy set used by [`parse_bool_extended`].
const EXTENDED_TRUTHY: &[&str] = &["true", "yes", "1", "on"];

/// A value that may be coerced to a boolean.
///
/// Configuration can come from typed sources (JSON, TOML) as well as
/// strings, so the strict parser accepts any of these and decides per kind.
#[derive(Debug, Clone, PartialEq)]
pub enum BoolInput {
    /// Already a boolean.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A float.
    Float(f64),
    /// A string to be interpreted.
    Str(String),
    /// Some other kind of value, named for error messages.
    Other(&'static str),
}

impl BoolInput {
    /// Name of the input kind, as used in type errors.
    pub fn kind(&self) -> &'static str {
        match self {
            BoolInput::Bool(_) => "bool",
            BoolInput::Int(_) => "int",
            BoolInput::Float(_) => "float",
            BoolInput::Str(_) => "str",
            BoolInput::Other(kind) => kind,
        }
    }
}

impl fmt::Display for BoolInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoolInput::Bool(b) => write!(f, "{}", b),
            BoolInput::Int(i) => write!(f, "{}", i),
            BoolInput::Float(x) => write!(f, "{}", x),
            BoolInput::Str(s) => write!(f, "'{}'", s),
            BoolInput::Other(kind) => write!(f, "<{}>", kind),
        }
    }
}

impl From<bool> for BoolInput {
    fn from(b: bool) -> Self {
        BoolInput::Bool(b)
    }
}

macro_rules! int_input {
    ($($t:ty),*) => {
        $(
            impl From<$t> for BoolInput {
                fn from(i: $t) -> Self {
                    BoolInput::Int(i64::from(i))
                }
            }
        )*
    };
}

int_input!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for BoolInput {
    fn from(x: f32) -> Self {
        BoolInput::Float(f64::from(x))
    }
}

impl From<f64> for BoolInput {
    fn from(x: f64) -> Self {
        BoolInput::Float(x)
    }
}

impl From<&str> for BoolInput {
    fn from(s: &str) -> Self {
        BoolInput::Str(s.to_string())
    }
}

impl From<String> for BoolInput {
    fn from(s: String) -> Self {
        BoolInput::Str(s)
    }
}

impl From<&String> for BoolInput {
    fn from(s: &String) -> Self {
        BoolInput::Str(s.clone())
    }
}

impl From<&serde_json::Value> for BoolInput {
    fn from(value: &serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Bool(b) => BoolInput::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => BoolInput::Int(i),
                None => BoolInput::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => BoolInput::Str(s.clone()),
            Value::Null => BoolInput::Other("null"),
            Value::Array(_) => BoolInput::Other("array"),
            Value::Object(_) => BoolInput::Other("object"),
        }
    }
}

/// Lenient boolean coercion. Never fails.
///
/// The input is trimmed (Unicode whitespace and the ASCII separators
/// U+001C..=U+001F) and lowercased; only `true`, `yes`, `1` and `on`
/// give `true`. Everything else, garbage included, is `false`.
///
/// ```rust
/// use hubkit_parse::parse_bool_extended;
///
/// assert!(parse_bool_extended("ON"));
/// assert!(!parse_bool_extended("enabled"));
/// assert!(!parse_bool_extended("garbage"));
/// ```
pub fn parse_bool_extended(value: &str) -> bool {
    let normalized = trim_value(value).to_lowercase();
    EXTENDED_TRUTHY.contains(&normalized.as_str())
}

fn invalid_literal(input: &BoolInput) -> ParseError {
    ParseError::value(format!(
        "invalid boolean value {}; expected one of: {}",
        input,
        BOOL_LITERALS.join(", ")
    ))
}

/// Strict boolean coercion.
///
/// - `bool` passes through
/// - integers and floats must be exactly `0` or `1`
/// - strings must be one of [`BOOL_LITERALS`] (case-insensitive, trimmed)
///
/// Other input kinds fail with [`ParseError::Type`]; unrecognised content
/// fails with [`ParseError::Value`] listing the accepted literals.
///
/// ```rust
/// use hubkit_parse::parse_bool_strict;
///
/// assert_eq!(parse_bool_strict("Disabled").unwrap(), false);
/// assert_eq!(parse_bool_strict(1).unwrap(), true);
/// assert!(parse_bool_strict(42).is_err());
/// ```
pub fn parse_bool_strict(value: impl Into<BoolInput>) -> Result<bool, ParseError> {
    let input = value.into();
    match &input {
        BoolInput::Bool(b) => Ok(*b),
        BoolInput::Int(0) => Ok(false),
        BoolInput::Int(1) => Ok(true),
        BoolInput::Float(x) if *x == 0.0 => Ok(false),
        BoolInput::Float(x) if *x == 1.0 => Ok(true),
        BoolInput::Int(_) | BoolInput::Float(_) => Err(invalid_literal(&input)),
        BoolInput::Str(s) => {
            let normalized = trim_value(s).to_lowercase();
            if TRUTHY.contains(&normalized.as_str()) {
                Ok(true)
            } else if FALSY.contains(&normalized.as_str()) {
                Ok(false)
            } else {
                Err(invalid_literal(&input))
            }
        }
        BoolInput::Other(kind) => Err(ParseError::type_error("bool, int, float or str", *kind)),
    }
}

/// Boolean coercion with a strictness switch.
///
/// With `strict`, only `bool` and string inputs are accepted and the value
/// goes through [`parse_bool_strict`]. Without it, strings use
/// [`parse_bool_extended`] and numbers are true when non-zero.
pub fn parse_bool(value: impl Into<BoolInput>, strict: bool) -> Result<bool, ParseError> {
    let input = value.into();
    if strict {
        return match input {
            BoolInput::Bool(_) | BoolInput::Str(_) => parse_bool_strict(input),
            other => Err(ParseError::type_error("bool or str", other.kind())),
        };
    }

    match input {
        BoolInput::Bool(b) => Ok(b),
        BoolInput::Str(s) => Ok(parse_bool_extended(&s)),
        BoolInput::Int(i) => Ok(i != 0),
        BoolInput::Float(x) => Ok(x != 0.0),
        BoolInput::Other(kind) => Err(ParseError::type_error("bool, int, float or str", kind)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extended_truthy() {
        for s in ["true", "TRUE", " yes ", "1", "On"] {
            assert!(parse_bool_extended(s), "{} should be true", s);
        }
    }

    #[test]
    fn test_extended_everything_else_false() {
        for s in ["false", "no", "0", "off", "", "enabled", "garbage", "2"] {
            assert!(!parse_bool_extended(s), "{} should be false", s);
        }
    }

    #[test]
    fn test_separator_characters_are_trimmed() {
        assert!(parse_bool_extended("\u{1c}true"));
        assert!(parse_bool_extended("yes\u{1f}"));
        assert!(parse_bool_extended("\u{a0}on\u{2003}"));
        assert_eq!(parse_bool_strict("\u{1d}disabled\u{1e}").unwrap(), false);
    }

    #[test]
    fn test_strict_bool_passthrough() {
        assert!(parse_bool_strict(true).unwrap());
        assert!(!parse_bool_strict(false).unwrap());
    }

    #[test]
    fn test_strict_numbers() {
        assert!(parse_bool_strict(1).unwrap());
        assert!(!parse_bool_strict(0).unwrap());
        assert!(parse_bool_strict(1.0).unwrap());
        assert!(!parse_bool_strict(0.0).unwrap());
        assert!(parse_bool_strict(42).unwrap_err().is_value_error());
        assert!(parse_bool_strict(0.5).unwrap_err().is_value_error());
        assert!(parse_bool_strict(-1).is_err());
    }

    #[test]
    fn test_strict_strings() {
        for s in ["true", "YES", "1", "on", "Enabled"] {
            assert!(parse_bool_strict(s).unwrap(), "{}", s);
        }
        for s in ["false", "No", "0", "OFF", "disabled", " off "] {
            assert!(!parse_bool_strict(s).unwrap(), "{}", s);
        }
    }

    #[test]
    fn test_strict_invalid_string_lists_literals() {
        let err = parse_bool_strict("invalid").unwrap_err();
        assert!(err.is_value_error());
        let message = err.to_string();
        assert!(message.contains("'invalid'"));
        for literal in BOOL_LITERALS {
            assert!(message.contains(literal));
        }
    }

    #[test]
    fn test_strict_unsupported_kind() {
        let err = parse_bool_strict(&json!([1, 2])).unwrap_err();
        assert_eq!(err, ParseError::type_error("bool, int, float or str", "array"));
        assert!(parse_bool_strict(&json!(null)).unwrap_err().is_type_error());
    }

    #[test]
    fn test_strict_from_json_scalars() {
        assert!(parse_bool_strict(&json!(true)).unwrap());
        assert!(parse_bool_strict(&json!(1)).unwrap());
        assert!(!parse_bool_strict(&json!("off")).unwrap());
    }

    #[test]
    fn test_parse_bool_strict_mode_rejects_numbers() {
        let err = parse_bool(1, true).unwrap_err();
        assert!(err.is_type_error());
        assert!(parse_bool("yes", true).unwrap());
        assert!(parse_bool("nope", true).unwrap_err().is_value_error());
        assert!(parse_bool(false, true).map(|b| !b).unwrap());
    }

    #[test]
    fn test_parse_bool_lenient_mode() {
        assert!(parse_bool("on", false).unwrap());
        assert!(!parse_bool("nope", false).unwrap());
        assert!(parse_bool(7, false).unwrap());
        assert!(!parse_bool(0.0, false).unwrap());
        assert!(parse_bool(&json!({}), false).unwrap_err().is_type_error());
    }
}

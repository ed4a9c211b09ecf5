//! JSON container parsing.
//!
//! Both parsers treat blank input as "not configured" and return an empty
//! container, so an unset variable and `{}` behave the same.

use serde_json::{Map, Value};

use crate::error::ParseError;
use crate::text::trim_value;

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn decode(value: &str) -> Result<Value, ParseError> {
    serde_json::from_str(value).map_err(|e| ParseError::value(format!("invalid JSON: {}", e)))
}

/// Parses a JSON object.
///
/// ```rust
/// use hubkit_parse::parse_json_dict;
///
/// assert!(parse_json_dict("").unwrap().is_empty());
/// assert_eq!(parse_json_dict(r#"{"a": 1}"#).unwrap()["a"], 1);
/// assert!(parse_json_dict("[1, 2]").is_err());
/// ```
pub fn parse_json_dict(value: &str) -> Result<Map<String, Value>, ParseError> {
    if trim_value(value).is_empty() {
        return Ok(Map::new());
    }

    match decode(value)? {
        Value::Object(map) => Ok(map),
        other => Err(ParseError::value(format!(
            "expected a JSON object, got {}",
            kind_of(&other)
        ))),
    }
}

/// Parses a JSON array.
///
/// ```rust
/// use hubkit_parse::parse_json_list;
///
/// assert!(parse_json_list("  ").unwrap().is_empty());
/// assert_eq!(parse_json_list("[1, 2, 3]").unwrap().len(), 3);
/// assert!(parse_json_list(r#"{"a": 1}"#).is_err());
/// ```
pub fn parse_json_list(value: &str) -> Result<Vec<Value>, ParseError> {
    if trim_value(value).is_empty() {
        return Ok(Vec::new());
    }

    match decode(value)? {
        Value::Array(items) => Ok(items),
        other => Err(ParseError::value(format!(
            "expected a JSON array, got {}",
            kind_of(&other)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dict() {
        let map = parse_json_dict(r#"{"a": 1, "b": {"c": [true]}}"#).unwrap();
        assert_eq!(Value::Object(map), json!({"a": 1, "b": {"c": [true]}}));
    }

    #[test]
    fn test_dict_blank() {
        assert!(parse_json_dict("").unwrap().is_empty());
        assert!(parse_json_dict(" \n").unwrap().is_empty());
    }

    #[test]
    fn test_dict_wrong_kind() {
        let err = parse_json_dict("[1,2]").unwrap_err();
        assert_eq!(err.to_string(), "expected a JSON object, got array");
        assert!(parse_json_dict("\"text\"").is_err());
    }

    #[test]
    fn test_dict_not_json() {
        let err = parse_json_dict("not json").unwrap_err();
        assert!(err.is_value_error());
        assert!(err.to_string().starts_with("invalid JSON"));
    }

    #[test]
    fn test_list() {
        assert_eq!(parse_json_list("[1,2,3]").unwrap(), vec![json!(1), json!(2), json!(3)]);
        assert!(parse_json_list("").unwrap().is_empty());
    }

    #[test]
    fn test_list_wrong_kind() {
        let err = parse_json_list(r#"{"a":1}"#).unwrap_err();
        assert_eq!(err.to_string(), "expected a JSON array, got object");
        assert!(parse_json_list("[1,").is_err());
    }
}

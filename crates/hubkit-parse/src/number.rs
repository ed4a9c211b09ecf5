//! Bounded float parsing.

use crate::error::ParseError;
use crate::text::trim_value;

/// Parses `value` as a float, optionally checking inclusive bounds.
///
/// Surrounding whitespace is ignored. Unparsable input (and `NaN`, which
/// cannot be ordered against bounds) fails with [`ParseError::Value`], as
/// does a result below `min_val` or above `max_val`.
///
/// ```rust
/// use hubkit_parse::parse_float_with_validation;
///
/// assert_eq!(parse_float_with_validation("0.5", Some(0.0), Some(1.0)).unwrap(), 0.5);
/// assert!(parse_float_with_validation("1.5", Some(0.0), Some(1.0)).is_err());
/// assert!(parse_float_with_validation("abc", None, None).is_err());
/// ```
pub fn parse_float_with_validation(
    value: &str,
    min_val: Option<f64>,
    max_val: Option<f64>,
) -> Result<f64, ParseError> {
    let parsed: f64 = trim_value(value)
        .parse()
        .map_err(|_| ParseError::value(format!("invalid float value: '{}'", value)))?;

    if parsed.is_nan() {
        return Err(ParseError::value(format!("invalid float value: '{}'", value)));
    }

    if let Some(min) = min_val {
        if parsed < min {
            return Err(ParseError::value(format!(
                "value {} is below minimum {}",
                parsed, min
            )));
        }
    }

    if let Some(max) = max_val {
        if parsed > max {
            return Err(ParseError::value(format!(
                "value {} is above maximum {}",
                parsed, max
            )));
        }
    }

    Ok(parsed)
}

/// Parses a sampling rate in the closed interval `[0.0, 1.0]`.
pub fn parse_sample_rate(value: &str) -> Result<f64, ParseError> {
    parse_float_with_validation(value, Some(0.0), Some(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded() {
        assert_eq!(parse_float_with_validation("3.25", None, None).unwrap(), 3.25);
        assert_eq!(parse_float_with_validation(" -2 ", None, None).unwrap(), -2.0);
        assert_eq!(parse_float_with_validation("1e3", None, None).unwrap(), 1000.0);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert_eq!(
            parse_float_with_validation("0", Some(0.0), Some(1.0)).unwrap(),
            0.0
        );
        assert_eq!(
            parse_float_with_validation("1", Some(0.0), Some(1.0)).unwrap(),
            1.0
        );
    }

    #[test]
    fn test_out_of_bounds() {
        let err = parse_float_with_validation("1.5", Some(0.0), Some(1.0)).unwrap_err();
        assert_eq!(err.to_string(), "value 1.5 is above maximum 1");

        let err = parse_float_with_validation("-0.1", Some(0.0), None).unwrap_err();
        assert_eq!(err.to_string(), "value -0.1 is below minimum 0");
    }

    #[test]
    fn test_unparsable() {
        for s in ["abc", "", "1.2.3", "NaN"] {
            let err = parse_float_with_validation(s, None, None).unwrap_err();
            assert!(err.is_value_error(), "{}", s);
        }
    }

    #[test]
    fn test_sample_rate() {
        assert_eq!(parse_sample_rate("0.0").unwrap(), 0.0);
        assert_eq!(parse_sample_rate("1.0").unwrap(), 1.0);
        assert_eq!(parse_sample_rate("0.1").unwrap(), 0.1);
        assert!(parse_sample_rate("1.1").is_err());
        assert!(parse_sample_rate("-0.5").is_err());
    }
}

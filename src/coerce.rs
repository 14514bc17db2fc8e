//! Scalar type coercion for query-parameter validation.
//!
//! Query parameters arrive as strings; the coercion engine upgrades them to
//! the schema's declared scalar type when the conversion is unambiguous.
//! Coercion is a best-effort upgrade path: a failed conversion returns `None`
//! and the caller falls through to a normal `type` violation.

use serde_json::{Number, Value};

use crate::schema::DataKind;

/// Whether the evaluator may coerce scalar types.
///
/// The mode is a registry-wide policy, not a per-call option: the body
/// registry is strict, the query registry coercive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoercionMode {
    /// Kind mismatches are always `type` violations.
    Strict,
    /// Scalar kind mismatches may be repaired by [`coerce`].
    Coerce,
}

/// Attempts to convert `value` to the declared `target` kind.
///
/// Rules:
/// - string → number/integer only when the entire string is a numeric
///   literal (no surrounding whitespace, no `inf`/`nan` words; integers also
///   accept integral float literals like `"42.0"`)
/// - string → boolean only for the literal tokens `"true"` and `"false"`
/// - number → string and boolean → string render the scalar
/// - object and array targets are never coerced; structural mismatches are
///   always hard errors
///
/// Returns the converted value, or `None` when no conversion applies.
pub fn coerce(target: DataKind, value: &Value) -> Option<Value> {
    match (target, value) {
        (DataKind::Integer, Value::String(s)) => parse_integer(s).map(Value::Number),
        (DataKind::Number, Value::String(s)) => parse_number(s).map(Value::Number),
        (DataKind::Boolean, Value::String(s)) => match s.as_str() {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },
        (DataKind::String, Value::Number(n)) => Some(Value::String(n.to_string())),
        (DataKind::String, Value::Bool(b)) => Some(Value::String(b.to_string())),
        _ => None,
    }
}

/// True when `s` looks like a numeric literal: only digits, sign, decimal
/// point, and exponent characters. Rules out `str::parse::<f64>` extras such
/// as `"inf"` and `"NaN"`.
fn is_numeric_literal(s: &str) -> bool {
    !s.is_empty()
        && s.bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
}

fn parse_number(s: &str) -> Option<Number> {
    if !is_numeric_literal(s) {
        return None;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Some(Number::from(i));
    }
    let f = s.parse::<f64>().ok().filter(|f| f.is_finite())?;
    Number::from_f64(f)
}

fn parse_integer(s: &str) -> Option<Number> {
    if !is_numeric_literal(s) {
        return None;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Some(Number::from(i));
    }
    // Integral float literals ("42.0", "1e3") coerce to integers too.
    let f = s.parse::<f64>().ok().filter(|f| f.is_finite())?;
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(Number::from(f as i64))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_to_integer() {
        assert_eq!(coerce(DataKind::Integer, &json!("42")), Some(json!(42)));
        assert_eq!(coerce(DataKind::Integer, &json!("-7")), Some(json!(-7)));
        assert_eq!(coerce(DataKind::Integer, &json!("42.0")), Some(json!(42)));
        assert_eq!(coerce(DataKind::Integer, &json!("1e3")), Some(json!(1000)));
        assert_eq!(coerce(DataKind::Integer, &json!("42.5")), None);
        assert_eq!(coerce(DataKind::Integer, &json!("abc")), None);
        assert_eq!(coerce(DataKind::Integer, &json!("4 2")), None);
        assert_eq!(coerce(DataKind::Integer, &json!(" 42")), None);
        assert_eq!(coerce(DataKind::Integer, &json!("")), None);
    }

    #[test]
    fn test_string_to_number() {
        assert_eq!(coerce(DataKind::Number, &json!("3.25")), Some(json!(3.25)));
        assert_eq!(coerce(DataKind::Number, &json!("42")), Some(json!(42)));
        assert_eq!(coerce(DataKind::Number, &json!("-1e2")), Some(json!(-100.0)));
        assert_eq!(coerce(DataKind::Number, &json!("42abc")), None);
        assert_eq!(coerce(DataKind::Number, &json!("inf")), None);
        assert_eq!(coerce(DataKind::Number, &json!("NaN")), None);
        assert_eq!(coerce(DataKind::Number, &json!("")), None);
    }

    #[test]
    fn test_string_to_boolean() {
        assert_eq!(coerce(DataKind::Boolean, &json!("true")), Some(json!(true)));
        assert_eq!(
            coerce(DataKind::Boolean, &json!("false")),
            Some(json!(false))
        );
        assert_eq!(coerce(DataKind::Boolean, &json!("True")), None);
        assert_eq!(coerce(DataKind::Boolean, &json!("1")), None);
        assert_eq!(coerce(DataKind::Boolean, &json!("yes")), None);
    }

    #[test]
    fn test_scalar_to_string() {
        assert_eq!(coerce(DataKind::String, &json!(42)), Some(json!("42")));
        assert_eq!(coerce(DataKind::String, &json!(2.5)), Some(json!("2.5")));
        assert_eq!(coerce(DataKind::String, &json!(true)), Some(json!("true")));
        assert_eq!(coerce(DataKind::String, &json!(null)), None);
    }

    #[test]
    fn test_structural_targets_never_coerce() {
        assert_eq!(coerce(DataKind::Object, &json!("{}")), None);
        assert_eq!(coerce(DataKind::Array, &json!("[1]")), None);
        assert_eq!(coerce(DataKind::Object, &json!(42)), None);
    }

    #[test]
    fn test_null_target_never_coerces() {
        assert_eq!(coerce(DataKind::Null, &json!("null")), None);
        assert_eq!(coerce(DataKind::Null, &json!("")), None);
    }
}

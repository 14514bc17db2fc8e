//! Integration tests for numeric type checks and range keywords.

use reqschema::{CoercionMode, Evaluation, FormatRegistry, SchemaRegistry};
use serde_json::{json, Value};

fn check(schema: Value, data: Value) -> Evaluation {
    let registry = SchemaRegistry::new(CoercionMode::Strict);
    registry.register("test", &schema).unwrap();
    registry
        .validate("test", &data, &FormatRegistry::new())
        .unwrap()
}

#[test]
fn test_integer_accepts_whole_numbers() {
    let schema = json!({"type": "integer"});
    assert!(check(schema.clone(), json!(42)).is_valid());
    assert!(check(schema.clone(), json!(-7)).is_valid());
    assert!(check(schema, json!(0)).is_valid());
}

#[test]
fn test_integer_accepts_integral_floats() {
    // 2.0 has no fractional part, so it satisfies `integer`
    let schema = json!({"type": "integer"});
    assert!(check(schema.clone(), json!(2.0)).is_valid());
    assert!(check(schema, json!(-3.0)).is_valid());
}

#[test]
fn test_integer_rejects_fractional_values() {
    let outcome = check(json!({"type": "integer"}), json!(2.5));
    assert!(!outcome.is_valid());
    assert_eq!(outcome.errors()[0].keyword, "type");
}

#[test]
fn test_number_accepts_integers_and_floats() {
    let schema = json!({"type": "number"});
    assert!(check(schema.clone(), json!(42)).is_valid());
    assert!(check(schema.clone(), json!(3.25)).is_valid());
    assert!(check(schema, json!(-0.5)).is_valid());
}

#[test]
fn test_number_rejects_strings() {
    // Strict mode: a numeric-looking string stays a string
    let outcome = check(json!({"type": "number"}), json!("42"));
    assert!(!outcome.is_valid());
    assert_eq!(outcome.errors()[0].keyword, "type");
}

#[test]
fn test_minimum_is_inclusive() {
    let schema = json!({"type": "number", "minimum": 10});

    assert!(check(schema.clone(), json!(10)).is_valid());
    assert!(check(schema.clone(), json!(10.0)).is_valid());

    let outcome = check(schema, json!(9.999));
    assert!(!outcome.is_valid());
    assert_eq!(outcome.errors()[0].keyword, "minimum");
}

#[test]
fn test_maximum_is_inclusive() {
    let schema = json!({"type": "number", "maximum": 100});

    assert!(check(schema.clone(), json!(100)).is_valid());

    let outcome = check(schema, json!(100.5));
    assert!(!outcome.is_valid());
    assert_eq!(outcome.errors()[0].keyword, "maximum");
}

#[test]
fn test_contradictory_bounds_accumulate_both_errors() {
    // An impossible range reports both violations rather than stopping at one
    let schema = json!({"type": "number", "minimum": 10, "maximum": 5});
    let outcome = check(schema, json!(7));
    assert_eq!(outcome.errors().len(), 2);
    assert_eq!(outcome.errors()[0].keyword, "minimum");
    assert_eq!(outcome.errors()[1].keyword, "maximum");
}

#[test]
fn test_bounds_apply_to_integer_type() {
    let schema = json!({"type": "integer", "minimum": 1, "maximum": 10});
    assert!(check(schema.clone(), json!(5)).is_valid());
    assert!(!check(schema, json!(0)).is_valid());
}

#[test]
fn test_enum_uses_numeric_equality() {
    let schema = json!({"enum": [1, 2, 3]});
    assert!(check(schema.clone(), json!(2)).is_valid());

    let outcome = check(schema, json!(4));
    assert!(!outcome.is_valid());
    assert_eq!(outcome.errors()[0].keyword, "enum");
}

#[test]
fn test_union_type_accepts_either_kind() {
    let schema = json!({"type": ["integer", "string"]});
    assert!(check(schema.clone(), json!(42)).is_valid());
    assert!(check(schema.clone(), json!("forty-two")).is_valid());
    assert!(!check(schema, json!(true)).is_valid());
}

#[test]
fn test_error_carries_got_and_expected() {
    let outcome = check(json!({"type": "number", "minimum": 10}), json!(3));
    let error = &outcome.errors()[0];
    assert_eq!(error.expected.as_deref(), Some(">= 10"));
    assert_eq!(error.got.as_deref(), Some("3"));
}

//! In-memory evaluation of [`Filter`]s against JSON documents.

use std::cmp::Ordering;

use serde_json::Value;

use super::filter::{Condition, Filter, Predicate};

impl Filter {
    /// Returns true if `document` satisfies every predicate.
    pub fn matches(&self, document: &Value) -> bool {
        self.predicates().iter().all(|p| p.matches(document))
    }
}

impl Predicate {
    /// Evaluates this predicate against `document`.
    pub fn matches(&self, document: &Value) -> bool {
        let field = lookup(document, &self.field);
        match &self.condition {
            Condition::Eq(Value::Null) => is_missing(field),
            Condition::Eq(expected) => field.is_some_and(|v| values_equal(v, expected)),
            Condition::Ne(Value::Null) => !is_missing(field),
            Condition::Ne(expected) => field.is_none_or(|v| !values_equal(v, expected)),
            Condition::Gt(bound) => compare(field, bound).is_some_and(Ordering::is_gt),
            Condition::Gte(bound) => compare(field, bound).is_some_and(Ordering::is_ge),
            Condition::Lt(bound) => compare(field, bound).is_some_and(Ordering::is_lt),
            Condition::Lte(bound) => compare(field, bound).is_some_and(Ordering::is_le),
            Condition::In(values) => values.iter().any(|expected| match expected {
                Value::Null => is_missing(field),
                other => field.is_some_and(|v| values_equal(v, other)),
            }),
            Condition::Exists(present) => !is_missing(field) == *present,
        }
    }
}

/// Resolves a dotted path inside nested objects.
pub fn lookup<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(document, |current, segment| current.as_object()?.get(segment))
}

fn is_missing(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

/// Numbers compare by value, so `1` equals `1.0`.
fn values_equal(field: &Value, expected: &Value) -> bool {
    match (field, expected) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => field == expected,
    }
}

/// Orders a field against a bound. Only numbers compare with numbers and
/// strings with strings; any other pairing does not match.
fn compare(field: Option<&Value>, bound: &Value) -> Option<Ordering> {
    match (field?, bound) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.as_str().cmp(b.as_str())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ride() -> Value {
        json!({
            "id": "0190a7a0-0000-7000-8000-000000000001",
            "status": "requested",
            "fare": 12.5,
            "pickup": {"city": "Lisbon"},
            "driverId": null
        })
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(Filter::new().matches(&ride()));
        assert!(Filter::new().matches(&json!({})));
    }

    #[test]
    fn test_eq_and_nested_path() {
        assert!(Filter::new().eq("status", "requested").matches(&ride()));
        assert!(Filter::new().eq("pickup.city", "Lisbon").matches(&ride()));
        assert!(!Filter::new().eq("pickup.city", "Porto").matches(&ride()));
        assert!(!Filter::new().eq("pickup.city.name", "Lisbon").matches(&ride()));
    }

    #[test]
    fn test_eq_null_matches_absent_and_null() {
        assert!(Filter::new().eq("driverId", Value::Null).matches(&ride()));
        assert!(Filter::new().eq("missing", Value::Null).matches(&ride()));
        assert!(!Filter::new().eq("status", Value::Null).matches(&ride()));
    }

    #[test]
    fn test_ne_matches_absent() {
        assert!(Filter::new().ne("missing", "x").matches(&ride()));
        assert!(Filter::new().ne("status", "accepted").matches(&ride()));
        assert!(!Filter::new().ne("status", "requested").matches(&ride()));
    }

    #[test]
    fn test_exists() {
        assert!(Filter::new().exists("status", true).matches(&ride()));
        assert!(Filter::new().exists("deletedAt", false).matches(&ride()));
        assert!(Filter::new().exists("driverId", false).matches(&ride()));
        assert!(!Filter::new().exists("fare", false).matches(&ride()));
    }

    #[test]
    fn test_range_numbers() {
        assert!(Filter::new().gt("fare", 10).matches(&ride()));
        assert!(Filter::new().gte("fare", 12.5).matches(&ride()));
        assert!(Filter::new().lte("fare", 12.5).matches(&ride()));
        assert!(!Filter::new().lt("fare", 12).matches(&ride()));
    }

    #[test]
    fn test_range_strings_are_lexicographic() {
        let doc = ride();
        assert!(Filter::new()
            .gt("id", "0190a7a0-0000-7000-8000-000000000000")
            .matches(&doc));
        assert!(!Filter::new()
            .lt("id", "0190a7a0-0000-7000-8000-000000000001")
            .matches(&doc));
    }

    #[test]
    fn test_range_mixed_types_never_match() {
        assert!(!Filter::new().gt("status", 1).matches(&ride()));
        assert!(!Filter::new().lt("fare", "z").matches(&ride()));
        assert!(!Filter::new().gt("missing", 0).matches(&ride()));
    }

    #[test]
    fn test_in() {
        assert!(Filter::new()
            .is_in("status", ["requested", "accepted"])
            .matches(&ride()));
        assert!(!Filter::new()
            .is_in("status", ["completed"])
            .matches(&ride()));
        assert!(Filter::new()
            .is_in("driverId", [Value::Null])
            .matches(&ride()));
    }

    #[test]
    fn test_integer_equals_float() {
        assert!(Filter::new().eq("fare", 12.5).matches(&ride()));
        assert!(Filter::new().eq("count", 2.0).matches(&json!({"count": 2})));
        assert!(!Filter::new().eq("status", 1).matches(&json!({"status": true})));
    }

    #[test]
    fn test_conjunction() {
        let filter = Filter::new().eq("status", "requested").gt("fare", 20);
        assert!(!filter.matches(&ride()));
    }
}

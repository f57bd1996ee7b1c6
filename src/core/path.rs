//! Dot-path assignment into nested JSON objects

use super::error::{LoggerError, Result};
use serde_json::{Map, Value};

/// Assign `value` at the dot-delimited `path` inside `target`.
///
/// Intermediate objects are created as needed. Only the final segment is
/// written; sibling keys along the way are left untouched. Walking through
/// an existing non-object value is an error rather than a silent overwrite.
pub fn assign_path(target: &mut Map<String, Value>, path: &str, value: Value) -> Result<()> {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(LoggerError::invalid_path(path, "empty path segment"));
    }

    let (last, parents) = match segments.split_last() {
        Some(split) => split,
        None => return Err(LoggerError::invalid_path(path, "empty path")),
    };

    let mut cursor = target;
    for segment in parents {
        let slot = cursor
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        cursor = match slot {
            Value::Object(map) => map,
            _ => {
                return Err(LoggerError::invalid_path(
                    path,
                    format!("'{}' is not an object", segment),
                ))
            }
        };
    }

    cursor.insert(last.to_string(), value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture is not an object"),
        }
    }

    #[test]
    fn test_assign_root() {
        let mut target = Map::new();
        assign_path(&mut target, "a", json!(1)).unwrap();
        assert_eq!(Value::Object(target), json!({"a": 1}));
    }

    #[test]
    fn test_assign_nested_depths() {
        let mut target = Map::new();
        assign_path(&mut target, "a.b", json!(2)).unwrap();
        assign_path(&mut target, "x.y.z", json!(3)).unwrap();
        assign_path(&mut target, "p.q.r.s", json!("deep")).unwrap();
        assert_eq!(
            Value::Object(target),
            json!({"a": {"b": 2}, "x": {"y": {"z": 3}}, "p": {"q": {"r": {"s": "deep"}}}})
        );
    }

    #[test]
    fn test_overwrite_only_target_key() {
        let mut target = object(json!({"a": {"b": 1, "c": 2}}));
        assign_path(&mut target, "a.b", json!(10)).unwrap();
        assert_eq!(Value::Object(target), json!({"a": {"b": 10, "c": 2}}));
    }

    #[test]
    fn test_siblings_preserved() {
        let mut target = Map::new();
        assign_path(&mut target, "event.error", json!({"name": "Error"})).unwrap();
        assign_path(&mut target, "event.http_request", json!({"method": "GET"})).unwrap();
        assert_eq!(
            Value::Object(target),
            json!({"event": {"error": {"name": "Error"}, "http_request": {"method": "GET"}}})
        );
    }

    #[test]
    fn test_rejects_non_object_parent() {
        let mut target = object(json!({"a": "scalar"}));
        let err = assign_path(&mut target, "a.b", json!(1)).unwrap_err();
        assert!(matches!(err, LoggerError::InvalidPath { .. }));
        assert_eq!(Value::Object(target), json!({"a": "scalar"}));
    }

    #[test]
    fn test_rejects_empty_segments() {
        let mut target = Map::new();
        assert!(assign_path(&mut target, "", json!(1)).is_err());
        assert!(assign_path(&mut target, "a..b", json!(1)).is_err());
        assert!(target.is_empty());
    }
}

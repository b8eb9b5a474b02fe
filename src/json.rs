//! JSON rendering of materialized sequences.

use crate::error::Error;
use crate::error::Result;
use crate::value::Value;

/// Render materialized (key, value) pairs as JSON.
///
/// Pairs keyed exactly 0..n-1 in order render as an array; any other key
/// shape renders as an object whose keys are the display renderings, with
/// the last writer winning on collision.
pub fn pairs_to_json(pairs: &[(Value, Value)], pretty: bool) -> Result<String> {
    let json = pairs_to_value(pairs);
    let rendered = if pretty {
        serde_json::to_string_pretty(&json)
    } else {
        serde_json::to_string(&json)
    };
    return rendered.map_err(|e| Error::invalid_argument(e.to_string()));
}

fn pairs_to_value(pairs: &[(Value, Value)]) -> serde_json::Value {
    let sequential = pairs
        .iter()
        .enumerate()
        .all(|(i, (key, _))| *key == Value::Int(i as i64));
    if sequential {
        return serde_json::Value::Array(pairs.iter().map(|(_, v)| to_json_value(v)).collect());
    }
    let mut object = serde_json::Map::new();
    for (key, value) in pairs {
        object.insert(key.to_string(), to_json_value(value));
    }
    return serde_json::Value::Object(object);
}

/// Convert a single value. Non-finite floats and opaque objects have no
/// JSON rendering and become `null`.
pub fn to_json_value(value: &Value) -> serde_json::Value {
    return match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(i) => serde_json::Value::Number((*i).into()),
        Value::Float(f) => match serde_json::Number::from_f64(*f) {
            Some(n) => serde_json::Value::Number(n),
            None => serde_json::Value::Null,
        },
        Value::Str(s) => serde_json::Value::String(s.clone()),
        Value::List(items) => serde_json::Value::Array(items.iter().map(to_json_value).collect()),
        Value::Object(_) => serde_json::Value::Null,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_keys_render_as_an_array() {
        let pairs = vec![
            (Value::Int(0), Value::Int(10)),
            (Value::Int(1), Value::str("x")),
        ];
        assert_eq!(pairs_to_json(&pairs, false).unwrap(), r#"[10,"x"]"#);
    }

    #[test]
    fn gapped_or_named_keys_render_as_an_object() {
        let pairs = vec![
            (Value::Int(0), Value::Int(10)),
            (Value::Int(2), Value::Int(30)),
        ];
        assert_eq!(pairs_to_json(&pairs, false).unwrap(), r#"{"0":10,"2":30}"#);

        let named = vec![(Value::str("a"), Value::Int(1))];
        assert_eq!(pairs_to_json(&named, false).unwrap(), r#"{"a":1}"#);
    }

    #[test]
    fn empty_renders_as_an_array() {
        assert_eq!(pairs_to_json(&[], false).unwrap(), "[]");
    }

    #[test]
    fn nested_lists_recurse() {
        let pairs = vec![(
            Value::Int(0),
            Value::List(vec![Value::Int(1), Value::List(vec![Value::Bool(true)])]),
        )];
        assert_eq!(pairs_to_json(&pairs, false).unwrap(), "[[1,[true]]]");
    }

    #[test]
    fn non_finite_floats_become_null() {
        let pairs = vec![(Value::Int(0), Value::Float(f64::NAN))];
        assert_eq!(pairs_to_json(&pairs, false).unwrap(), "[null]");
    }

    #[test]
    fn pretty_output_is_indented() {
        let pairs = vec![(Value::Int(0), Value::Int(1))];
        let rendered = pairs_to_json(&pairs, true).unwrap();
        assert!(rendered.contains('\n'));
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&rendered).unwrap(),
            serde_json::json!([1])
        );
    }

    #[test]
    fn colliding_display_keys_last_writer_wins() {
        // Int 1 and string "1" display identically.
        let pairs = vec![
            (Value::Int(1), Value::str("int")),
            (Value::str("1"), Value::str("string")),
        ];
        assert_eq!(
            pairs_to_json(&pairs, false).unwrap(),
            r#"{"1":"string"}"#
        );
    }
}

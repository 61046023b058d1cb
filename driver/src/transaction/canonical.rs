// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! Canonical JSON: compact, object keys sorted at every depth, arrays kept
//! in order. Two transactions with the same content serialize to the same
//! string whatever order their keys were inserted in.
//!
//! With serde_json's default features `Map` is a `BTreeMap` and already
//! iterates in key order. The explicit sort keeps the output canonical when
//! feature unification turns on `preserve_order` elsewhere in the build.

use serde_json::Value;

use super::types::Transaction;
use super::verification::TransactionError;

/// Canonical string of a transaction. The input is not modified.
pub fn serialize_transaction_into_canonical_string(
    tx: &Transaction,
) -> Result<String, TransactionError> {
    let value = serde_json::to_value(tx)?;
    Ok(canonical_json(&value))
}

/// Canonical string of an arbitrary JSON value.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => write_object(map.iter(), out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// Write object entries sorted by key, whatever order they arrive in.
fn write_object<'a>(entries: impl Iterator<Item = (&'a String, &'a Value)>, out: &mut String) {
    let mut entries: Vec<(&String, &Value)> = entries.collect();
    entries.sort_by(|(a, _), (b, _)| a.cmp(b));
    out.push('{');
    for (i, (key, item)) in entries.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        // Display on a string Value yields the escaped, quoted form.
        out.push_str(&Value::String(key.clone()).to_string());
        out.push(':');
        write_canonical(item, out);
    }
    out.push('}');
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keys_are_sorted_at_every_level() {
        let v = json!({ "b": 1, "a": { "z": [ { "y": 2, "x": 1 } ], "c": null } });
        assert_eq!(
            canonical_json(&v),
            r#"{"a":{"c":null,"z":[{"x":1,"y":2}]},"b":1}"#
        );
    }

    #[test]
    fn arrays_keep_their_order() {
        assert_eq!(canonical_json(&json!([3, 1, 2])), "[3,1,2]");
    }

    #[test]
    fn strings_are_escaped() {
        let v = json!({ "q\"k": "line\nbreak" });
        assert_eq!(canonical_json(&v), r#"{"q\"k":"line\nbreak"}"#);
    }

    #[test]
    fn object_entries_are_sorted_whatever_order_they_arrive_in() {
        let v = json!({ "alpha": 1, "beta": { "y": 2, "x": 1 }, "gamma": 3 });
        let Value::Object(map) = &v else {
            panic!("expected an object");
        };

        let mut forward = String::new();
        write_object(map.iter(), &mut forward);
        let mut reversed = String::new();
        write_object(map.iter().rev(), &mut reversed);

        assert_eq!(forward, reversed);
        assert_eq!(reversed, r#"{"alpha":1,"beta":{"x":1,"y":2},"gamma":3}"#);
    }
}

//! Merge rules for configuration patches.
//!
//! Both functions take the current tree by reference and return a new tree;
//! neither input is modified.
//!
//! - [`deep_merge`] walks objects recursively and arrays index by index.
//!   Leaves from the patch win, including an explicit `null`. Base array
//!   elements past the end of the patch array are kept.
//! - [`shallow_merge`] only looks at the top level: each key of the patch
//!   replaces the whole value under that key.

use serde_json::{Map, Value};

/// Recursively merge `patch` over `base`.
pub fn deep_merge(base: &Value, patch: &Value) -> Value {
    match (base, patch) {
        (Value::Object(b), Value::Object(p)) => Value::Object(merge_maps(b, p)),
        (Value::Array(b), Value::Array(p)) => {
            let mut out = Vec::with_capacity(b.len().max(p.len()));
            for i in 0..b.len().max(p.len()) {
                match (b.get(i), p.get(i)) {
                    (Some(bv), Some(pv)) => out.push(deep_merge(bv, pv)),
                    (Some(bv), None) => out.push(bv.clone()),
                    (None, Some(pv)) => out.push(pv.clone()),
                    (None, None) => {}
                }
            }
            Value::Array(out)
        }
        (_, p) => p.clone(),
    }
}

fn merge_maps(base: &Map<String, Value>, patch: &Map<String, Value>) -> Map<String, Value> {
    let mut out = base.clone();
    for (k, pv) in patch {
        let merged = match base.get(k) {
            Some(bv) => deep_merge(bv, pv),
            None => pv.clone(),
        };
        out.insert(k.clone(), merged);
    }
    out
}

/// Overwrite the top-level keys of `base` with those of `patch`.
///
/// Non-object inputs are treated as empty objects on the base side; a
/// non-object patch leaves the base untouched.
pub fn shallow_merge(base: &Value, patch: &Value) -> Value {
    let mut out = match base {
        Value::Object(b) => b.clone(),
        _ => Map::new(),
    };
    if let Value::Object(p) = patch {
        for (k, v) in p {
            out.insert(k.clone(), v.clone());
        }
    }
    Value::Object(out)
}

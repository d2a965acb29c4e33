//! Helpers for reading a named key out of an opaque item.
//!
//! Items are `serde_json::Value`s. The reference implementation looks up a
//! key with `item.get(key)` and falls back to `getattr(item, key, None)` for
//! objects that aren't mappings (§3 "using either map-style lookup or
//! attribute-style lookup"). For a typed JSON `Value` the only meaningful
//! analogue is: look the key up as an object field if the item is an
//! object, otherwise treat the item itself as its own key — which is what
//! the Python fallback collapses to once the only two shapes items take
//! are "mapping with the key" or "bare scalar".

use serde_json::Value;

/// Look up `key` on `item`, returning `None` if absent (object missing the
/// field) or not applicable (item is not an object).
pub fn get_key<'a>(item: &'a Value, key: &str) -> Option<&'a Value> {
    item.as_object().and_then(|obj| obj.get(key))
}

/// The identity of `item` under `key`, per §4.8's `dedup_key` rule and the
/// AppendDistribute `distribution_key`/`sorting_key` rules: the value at
/// `item[key]` if `item` is an object and has it, otherwise the item
/// itself (covers bare scalar session items).
pub fn key_or_self<'a>(item: &'a Value, key: &str) -> &'a Value {
    get_key(item, key).unwrap_or(item)
}

/// A hashable/orderable surrogate for a `Value` used as a dedup/bucket key.
/// `Value` does not implement `Hash`, so equal-by-value items are compared
/// via their canonical JSON string instead.
pub fn value_key(value: &Value) -> String {
    value.to_string()
}

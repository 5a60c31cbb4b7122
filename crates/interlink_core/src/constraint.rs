//! Free-form constraints attached to targets and signals.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A free-form JSON object narrowing the data a target accepts.
///
/// Most commonly `{ "layer": { "name": <layer-name> } }`.
///
/// Equality is structural and independent of key order. See [`values_eq`].
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Constraints(Map<String, Value>);

impl Constraints {
    /// Constraints with no entries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Constrain to the layer with the given name.
    ///
    /// A missing name is recorded as the empty string.
    pub fn layer(name: Option<&str>) -> Self {
        let mut layer = Map::new();
        layer.insert("name".into(), Value::from(name.unwrap_or("")));
        let mut map = Map::new();
        map.insert("layer".into(), Value::Object(layer));
        Self(map)
    }

    /// Whether or not these constraints name a layer.
    pub fn has_layer(&self) -> bool {
        self.0.get("layer").is_some_and(|v| !v.is_null())
    }

    /// Look up a single entry.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Insert an entry, returning the previous value if any.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// Whether or not there are no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The underlying JSON object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl PartialEq for Constraints {
    fn eq(&self, other: &Self) -> bool {
        objects_eq(&self.0, &other.0)
    }
}

impl Eq for Constraints {}

impl From<Map<String, Value>> for Constraints {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Canonical structural equality of two JSON values.
///
/// Objects are equal when they hold the same keys with equal values,
/// whatever the order the keys were inserted in. Arrays compare element-wise
/// in order.
pub fn values_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Object(a), Value::Object(b)) => objects_eq(a, b),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| values_eq(a, b))
        }
        (a, b) => a == b,
    }
}

fn objects_eq(a: &Map<String, Value>, b: &Map<String, Value>) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut a_keys: Vec<_> = a.keys().collect();
    let mut b_keys: Vec<_> = b.keys().collect();
    a_keys.sort_unstable();
    b_keys.sort_unstable();
    a_keys == b_keys && a_keys.iter().all(|k| values_eq(&a[k.as_str()], &b[k.as_str()]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn constraints(v: Value) -> Constraints {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn test_key_order_is_irrelevant() {
        let a = constraints(json!({ "layer": { "name": "states", "id": "l1" } }));
        let b = constraints(json!({ "layer": { "id": "l1", "name": "states" } }));
        assert_eq!(a, b);
    }

    #[test]
    fn test_value_change_breaks_equality() {
        let a = Constraints::layer(Some("states"));
        let b = Constraints::layer(Some("counties"));
        assert_ne!(a, b);
        assert_ne!(a, Constraints::new());
    }

    #[test]
    fn test_array_order_matters() {
        assert!(values_eq(&json!([1, 2]), &json!([1, 2])));
        assert!(!values_eq(&json!([1, 2]), &json!([2, 1])));
    }

    #[test]
    fn test_layer_without_name() {
        let c = Constraints::layer(None);
        assert!(c.has_layer());
        assert_eq!(c, constraints(json!({ "layer": { "name": "" } })));
    }
}

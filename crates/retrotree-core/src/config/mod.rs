use crate::{Error, Result};
use serde_json::{Map, Value, json};

/// Render configuration as a JSON object addressed by dotted paths (`theme.path1`).
#[derive(Debug, Clone, PartialEq)]
pub struct TreeConfig(Value);

impl Default for TreeConfig {
    fn default() -> Self {
        Self::empty_object()
    }
}

impl TreeConfig {
    pub fn empty_object() -> Self {
        Self(Value::Object(Map::new()))
    }

    /// Built-in defaults every render starts from.
    pub fn defaults() -> Self {
        Self(json!({
            "width": 928.0,
            "height": 928.0,
            "radiusMargin": 30.0,
            "fontFamily": "sans-serif",
            "fontSize": 10.0,
            "link": {
                "stroke": "#555",
                "strokeOpacity": 0.4,
                "strokeWidth": 1.0
            },
            "node": {
                "leafFill": "#8ecfc9",
                "rootFill": "#beb8dc",
                "innerFill": "#82b0d2"
            },
            "label": {
                "offset": 6.0,
                "fill": "black"
            },
            "blackTree": {
                "radius": 4.25,
                "stroke": "black",
                "strokeWidth": 1.5
            },
            "theme": {
                "highlight": "#9b59b6",
                "path1": "#e74c3c",
                "path1Highlight": "#c0392b",
                "path2": "#f39c12",
                "path2Highlight": "#d35400",
                "highlightStrokeWidth": 2.0
            }
        }))
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text).map_err(|e| Error::InvalidConfig {
            message: e.to_string(),
        })?;
        if !value.is_object() {
            return Err(Error::InvalidConfig {
                message: "config must be a JSON object".to_string(),
            });
        }
        Ok(Self(value))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn as_value_mut(&mut self) -> &mut Value {
        &mut self.0
    }

    fn lookup(&self, dotted_path: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    pub fn get_str(&self, dotted_path: &str) -> Option<&str> {
        self.lookup(dotted_path)?.as_str()
    }

    pub fn get_bool(&self, dotted_path: &str) -> Option<bool> {
        self.lookup(dotted_path)?.as_bool()
    }

    pub fn get_f64(&self, dotted_path: &str) -> Option<f64> {
        let v = self.lookup(dotted_path)?;
        v.as_f64()
            .or_else(|| v.as_str().and_then(|s| s.trim().parse::<f64>().ok()))
    }

    pub fn get_usize(&self, dotted_path: &str) -> Option<usize> {
        let v = self.lookup(dotted_path)?;
        v.as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .or_else(|| v.as_f64().filter(|f| *f >= 0.0).map(|f| f as usize))
    }

    pub fn set_value(&mut self, dotted_path: &str, value: Value) {
        // Configs built via `from_value` may hold any JSON value; coerce to an object so this
        // never panics on user input.
        if !self.0.is_object() {
            self.0 = Value::Object(Map::new());
        }

        let Value::Object(ref mut root) = self.0 else {
            return;
        };
        let mut cur: &mut Map<String, Value> = root;
        let mut segments = dotted_path.split('.').peekable();
        while let Some(seg) = segments.next() {
            if segments.peek().is_none() {
                cur.insert(seg.to_string(), value);
                return;
            }
            let slot = cur.entry(seg).or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            let Some(next) = slot.as_object_mut() else {
                return;
            };
            cur = next;
        }
    }

    pub fn deep_merge(&mut self, other: &Value) {
        deep_merge_value(&mut self.0, other);
    }

    /// Defaults with `overrides` merged on top.
    pub fn with_overrides(overrides: &TreeConfig) -> Self {
        let mut cfg = Self::defaults();
        cfg.deep_merge(overrides.as_value());
        cfg
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}

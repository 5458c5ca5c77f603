use crate::mode::RenderMode;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
#[error("No render mode matches payload with top-level keys: [{keys}]")]
pub struct DetectModeError {
    pub keys: String,
}

/// Picks the render mode whose payload shape matches `value`, richest shape first.
pub fn detect_mode(value: &Value) -> Result<RenderMode, DetectModeError> {
    let Some(obj) = value.as_object() else {
        return Err(DetectModeError {
            keys: String::new(),
        });
    };

    let has = |key: &str| obj.contains_key(key);
    let mode = if has("black_tree") {
        Some(RenderMode::Five)
    } else if has("path2") {
        Some(RenderMode::Quad)
    } else if has("path1") {
        Some(RenderMode::Three)
    } else if has("bigTree") {
        Some(RenderMode::Double)
    } else if has("name") {
        Some(RenderMode::Single)
    } else {
        None
    };

    mode.ok_or_else(|| DetectModeError {
        keys: obj.keys().cloned().collect::<Vec<_>>().join(", "),
    })
}

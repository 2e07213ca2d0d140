//! Height extraction from embed measure messages
//!
//! Embeds post either a JSON string or an object. The height is read from
//! `details.height` when present and truthy, otherwise from `height`.

use serde_json::Value;

/// JavaScript-style truthiness of a JSON value
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Requested height in pixels, or `None` for anything malformed or below `floor`
pub fn parse_height(data: &Value, floor: f64) -> Option<f64> {
    let parsed;
    let data = match data {
        Value::String(text) => {
            parsed = serde_json::from_str::<Value>(text).ok()?;
            &parsed
        }
        other => other,
    };
    let object = data.as_object()?;

    let nested = object
        .get("details")
        .and_then(|details| details.get("height"))
        .filter(|height| truthy(height));
    let height = nested.or_else(|| object.get("height"))?;

    let height = height.as_f64()?;
    if !height.is_finite() || height < floor {
        return None;
    }
    Some(height)
}

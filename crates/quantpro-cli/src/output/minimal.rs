use serde_json::Value;

use super::{format_scalar, result_section};

/// Print just the key answer: both option prices, or the volatility estimate.
pub fn render_minimal(value: &Value) -> String {
    let result = result_section(value);

    let Value::Object(map) = result else {
        return format_scalar(result);
    };

    let price = |side: &str| map.get(side).and_then(|s| s.get("price"));
    if let (Some(call), Some(put)) = (price("call"), price("put")) {
        return format!("call={} put={}", format_scalar(call), format_scalar(put));
    }

    let priority_keys = ["annualized_volatility", "volatility", "price"];
    for key in priority_keys {
        if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
            return format_scalar(val);
        }
    }

    match map.iter().next() {
        Some((key, val)) => format!("{}: {}", key, format_scalar(val)),
        None => String::new(),
    }
}

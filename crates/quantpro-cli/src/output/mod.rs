pub mod csv_out;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Result fields holding one row per spot level.
pub const SERIES_KEYS: [&str; 2] = ["curve", "scatter"];

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(value) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("JSON serialization error: {}", e),
        },
        OutputFormat::Table => print!("{}", table::render_table(value)),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => println!("{}", minimal::render_minimal(value)),
    }
}

/// The `result` object of a computation envelope, or the value itself.
pub fn result_section(value: &Value) -> &Value {
    value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value)
}

/// First series (curve or scatter) present in a result object.
pub fn find_series(result: &Map<String, Value>) -> Option<(&'static str, &[Value])> {
    SERIES_KEYS.iter().find_map(|key| match result.get(*key) {
        Some(Value::Array(rows)) => Some((*key, rows.as_slice())),
        _ => None,
    })
}

/// Scalar fields of a result, nested objects flattened to `parent.child`.
/// Series are left out.
pub fn flatten_fields(result: &Map<String, Value>) -> Vec<(String, Value)> {
    let mut fields = Vec::new();
    for (key, val) in result {
        if SERIES_KEYS.contains(&key.as_str()) {
            continue;
        }
        match val {
            Value::Object(inner) => {
                for (child, v) in inner {
                    fields.push((format!("{}.{}", key, child), v.clone()));
                }
            }
            _ => fields.push((key.clone(), val.clone())),
        }
    }
    fields
}

pub fn format_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

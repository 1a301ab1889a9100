use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{find_series, flatten_fields, format_scalar, result_section};

const GREEK_ROWS: [&str; 6] = ["price", "delta", "gamma", "theta", "vega", "rho"];

/// Render the envelope as tables: a call/put grid for priced options, a
/// field/value table for everything else, then warnings and methodology.
pub fn render_table(value: &Value) -> String {
    let mut out = String::new();
    match result_section(value) {
        Value::Object(result) => {
            if let (Some(Value::Object(call)), Some(Value::Object(put))) =
                (result.get("call"), result.get("put"))
            {
                out.push_str(&sides_table(call, put).to_string());
                out.push('\n');
                let rest: Map<String, Value> = result
                    .iter()
                    .filter(|(k, _)| *k != "call" && *k != "put")
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                push_fields(&mut out, &rest);
            } else {
                push_fields(&mut out, result);
            }
            if let Some((key, rows)) = find_series(result) {
                out.push_str(&format!("\n{}: {}\n", key, summarize_series(rows)));
            }
        }
        other => {
            out.push_str(&format_scalar(other));
            out.push('\n');
        }
    }

    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            out.push_str("\nWarnings:\n");
            for w in warnings.iter().filter_map(Value::as_str) {
                out.push_str(&format!("  - {}\n", w));
            }
        }
    }

    if let Some(Value::String(meth)) = value.get("methodology") {
        out.push_str(&format!("\nMethodology: {}\n", meth));
    }
    out
}

fn sides_table(call: &Map<String, Value>, put: &Map<String, Value>) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["", "Call", "Put"]);
    for row in GREEK_ROWS {
        let cell = |side: &Map<String, Value>| side.get(row).map(format_scalar).unwrap_or_default();
        builder.push_record([row.to_string(), cell(call), cell(put)]);
    }
    Table::from(builder)
}

fn push_fields(out: &mut String, result: &Map<String, Value>) {
    let fields = flatten_fields(result);
    if fields.is_empty() {
        return;
    }
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in &fields {
        builder.push_record([key.clone(), format_scalar(val)]);
    }
    out.push_str(&Table::from(builder).to_string());
    out.push('\n');
}

/// One-line description of a spot series; the full rows go to csv/json.
fn summarize_series(rows: &[Value]) -> String {
    let spots: Vec<f64> = rows
        .iter()
        .filter_map(|r| r.get("spot").and_then(Value::as_f64))
        .collect();
    match (spots.first(), spots.last()) {
        (Some(lo), Some(hi)) => format!(
            "{} points, spot {} to {} (use --output csv for the full series)",
            rows.len(),
            lo,
            hi
        ),
        _ => format!("{} points", rows.len()),
    }
}

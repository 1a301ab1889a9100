use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// Read a JSON file and deserialise into a typed struct.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    let value: T = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?;
    Ok(value)
}

/// Read one numeric column of a CSV file with a header row, in file order.
///
/// `column` defaults to `Close`, the usual name in downloaded price histories.
pub fn read_price_column(
    path: &str,
    column: Option<&str>,
) -> Result<Vec<f64>, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let wanted = column.unwrap_or("Close");
    let mut rdr = csv::Reader::from_path(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;

    let idx = rdr
        .headers()?
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(wanted))
        .ok_or_else(|| format!("Column '{}' not found in '{}'", wanted, canonical.display()))?;

    let mut prices = Vec::new();
    for (line, record) in rdr.records().enumerate() {
        let record = record?;
        let field = record.get(idx).unwrap_or("").trim();
        let price: f64 = field.parse().map_err(|_| {
            format!(
                "Row {} of '{}': '{}' is not a number",
                line + 2,
                canonical.display(),
                field
            )
        })?;
        prices.push(price);
    }
    Ok(prices)
}

/// Resolve and validate the path.
fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }

    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}

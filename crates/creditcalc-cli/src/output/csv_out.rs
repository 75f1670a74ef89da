use serde_json::Value;
use std::error::Error;
use std::io::{self, Write};

/// Write the loan outcome as CSV to stdout.
pub fn print_csv(value: &Value) -> Result<(), Box<dyn Error>> {
    let rendered = render_csv(value)?;
    io::stdout().lock().write_all(rendered.as_bytes())?;
    Ok(())
}

/// One `month,payment` row per month for a schedule, otherwise a two-column
/// `field,value` listing of the result.
pub fn render_csv(value: &Value) -> Result<String, Box<dyn Error>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Object(map) => {
            if let Some(Value::Array(rows)) = map.get("payments") {
                wtr.write_record(["month", "payment"])?;
                for row in rows {
                    wtr.write_record([
                        row.get("month").map(format_csv_value).unwrap_or_default(),
                        row.get("payment").map(format_csv_value).unwrap_or_default(),
                    ])?;
                }
            } else {
                wtr.write_record(["field", "value"])?;
                for (key, val) in map {
                    wtr.write_record([key.as_str(), &format_csv_value(val)])?;
                }
            }
        }
        other => wtr.write_record([&format_csv_value(other)])?,
    }

    let bytes = wtr.into_inner().map_err(|e| e.to_string())?;
    Ok(String::from_utf8(bytes)?)
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

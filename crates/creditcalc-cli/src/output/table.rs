use serde_json::{Map, Value};
use std::fmt::Write;
use tabled::{builder::Builder, Table};

/// Print the loan outcome as tables using the tabled crate.
pub fn print_table(value: &Value) {
    print!("{}", render_table(value));
}

/// Schedule rows first when the outcome has them, then the summary fields,
/// warnings and methodology from the envelope.
pub fn render_table(value: &Value) -> String {
    let mut out = String::new();
    let envelope = value.as_object();
    let result = envelope.and_then(|m| m.get("result")).unwrap_or(value);

    match result {
        Value::Object(res_map) => {
            if let Some(Value::Array(rows)) = res_map.get("payments") {
                let _ = writeln!(out, "{}", schedule_table(rows));
            }
            let _ = writeln!(out, "{}", summary_table(res_map));
        }
        other => {
            let _ = writeln!(out, "{}", format_value(other));
        }
    }

    if let Some(envelope) = envelope {
        if let Some(Value::Array(warnings)) = envelope.get("warnings") {
            if !warnings.is_empty() {
                let _ = writeln!(out, "\nWarnings:");
                for w in warnings {
                    if let Value::String(s) = w {
                        let _ = writeln!(out, "  - {}", s);
                    }
                }
            }
        }
        if let Some(Value::String(meth)) = envelope.get("methodology") {
            let _ = writeln!(out, "\nMethodology: {}", meth);
        }
    }

    out
}

fn summary_table(res_map: &Map<String, Value>) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in res_map {
        if key == "payments" {
            continue;
        }
        builder.push_record([key.as_str(), &format_value(val)]);
    }
    Table::from(builder)
}

fn schedule_table(rows: &[Value]) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["Month", "Payment"]);
    for row in rows {
        builder.push_record([
            row.get("month").map(format_value).unwrap_or_default(),
            row.get("payment").map(format_value).unwrap_or_default(),
        ]);
    }
    Table::from(builder)
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

use serde_json::Value;

/// Key figure of each outcome, in order of priority. A differentiated
/// schedule has none of the first three and reports its overpayment.
const PRIORITY_KEYS: [&str; 4] = ["payment", "principal", "months", "overpayment"];

/// Print just the key answer of the loan outcome.
pub fn print_minimal(value: &Value) {
    println!("{}", select_minimal(value));
}

pub fn select_minimal(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(key) {
                if !val.is_null() {
                    return format_minimal(val);
                }
            }
        }
    }

    format_minimal(result_obj)
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

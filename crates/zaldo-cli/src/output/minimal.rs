use serde_json::Value;

/// Print just the key answer value from the output.
///
/// Heuristic: look for well-known result fields in order of priority,
/// then fall back to the first field in the result object.
pub fn print_minimal(value: &Value) {
    // Try to extract the "result" envelope
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    // Priority list of key output fields
    let priority_keys = [
        "wallet_balance",
        "balance",
        "words",
        "investor_share",
        "next_due_date",
        "late_loans",
        "net_profit",
        "title",
    ];

    if let Value::Object(map) = result_obj {
        // Try priority keys first (skip null values), then one level down
        // for reports that nest their headline figure.
        for key in &priority_keys {
            let found = map.get(*key).filter(|v| !v.is_null()).or_else(|| {
                map.values()
                    .filter_map(|v| v.as_object())
                    .find_map(|inner| inner.get(*key).filter(|v| !v.is_null()))
            });
            if let Some(val) = found {
                println!("{}", format_minimal(val));
                return;
            }
        }

        // Fall back to first field
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    // Not an object, just print directly
    println!("{}", format_minimal(result_obj));
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

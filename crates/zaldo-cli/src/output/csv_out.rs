use serde_json::Value;
use std::io;

use super::table::flatten_row;

/// Result fields that hold the rows of a report, in lookup order.
const ROW_KEYS: [&str; 5] = ["transactions", "steps", "loans", "audit", "investors"];

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => {
            let rows = map
                .get("result")
                .and_then(|r| ROW_KEYS.iter().find_map(|k| r.get(*k)))
                .and_then(Value::as_array);
            if let Some(rows) = rows {
                // Movement or row-list reports: one CSV row per entry
                write_array_csv(&mut wtr, rows);
            } else if let Some(Value::Object(result)) = map.get("result") {
                // Two-column CSV: field, value
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in result {
                    let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
                }
            } else {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in map {
                    let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
                }
            }
        }
        Value::Array(arr) => {
            write_array_csv(&mut wtr, arr);
        }
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_array_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    // Extract headers from first object
    if let Some(Value::Object(_)) = arr.first() {
        let flat: Vec<serde_json::Map<String, Value>> = arr.iter().map(flatten_row).collect();
        let headers: Vec<&str> = flat[0].keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for map in &flat {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
    }
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

use serde_json::Value;
use std::io;

use super::table::history_headers;

/// Write output as CSV to stdout.
///
/// A planner envelope becomes a `field,value` block; its `history` series
/// follows after a blank line as a second CSV block with its own header.
pub fn print_csv(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(Value::Object(result)) = map.get("result") {
                write_rows(
                    ["field", "value"],
                    result
                        .iter()
                        .filter(|(k, _)| k.as_str() != "history")
                        .map(|(k, v)| vec![k.clone(), format_csv_value(v)]),
                );
                if let Some(Value::Array(history)) = result.get("history") {
                    println!();
                    write_array_csv(history);
                }
            } else {
                write_rows(
                    ["field", "value"],
                    map.iter().map(|(k, v)| vec![k.clone(), format_csv_value(v)]),
                );
            }
        }
        Value::Array(arr) => write_array_csv(arr),
        _ => {
            let mut wtr = csv::Writer::from_writer(io::stdout().lock());
            let _ = wtr.write_record([&format_csv_value(value)]);
            let _ = wtr.flush();
        }
    }
}

fn write_rows<I>(header: [&str; 2], rows: I)
where
    I: Iterator<Item = Vec<String>>,
{
    let mut wtr = csv::Writer::from_writer(io::stdout().lock());
    let _ = wtr.write_record(header);
    for row in rows {
        let _ = wtr.write_record(&row);
    }
    let _ = wtr.flush();
}

fn write_array_csv(arr: &[Value]) {
    if arr.is_empty() {
        return;
    }
    let mut wtr = csv::Writer::from_writer(io::stdout().lock());

    if let Some(headers) = history_headers(arr) {
        let _ = wtr.write_record(&headers);
        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_csv_value).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
    }
    let _ = wtr.flush();
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

use serde_json::Value;

/// Print just the answer: the solved value of a plan, or both results and
/// their difference for a comparison.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    println!("{}", minimal_line(result));
}

fn minimal_line(result: &Value) -> String {
    let Value::Object(map) = result else {
        return scalar(result);
    };

    if let (Some(a), Some(b), Some(diff)) = (
        map.get("result_a"),
        map.get("result_b"),
        map.get("difference"),
    ) {
        return format!("{} {} {}", scalar(a), scalar(b), scalar(diff));
    }

    match (map.get("goal"), map.get("solved_value")) {
        (Some(Value::String(goal)), Some(solved)) => format!("{goal}: {}", scalar(solved)),
        (_, Some(solved)) => scalar(solved),
        _ => serde_json::to_string(result).unwrap_or_default(),
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

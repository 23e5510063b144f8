//! Human-readable summaries of changes between two JSON values
//!
//! Nested objects are walked with dotted paths, so a balance change reads
//! `balances.Buffert.final_balance: 100000 -> 105000`.

use serde_json::Value;

/// Summarize what changed between `before` and `after`
///
/// Returns `None` when the values are equal.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let changes = diff_paths(before, after, "");
    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

/// Every changed leaf as a `path: old -> new` line
pub fn diff_paths(before: &Value, after: &Value, prefix: &str) -> Vec<String> {
    let mut changes = Vec::new();

    match (before, after) {
        (Value::Object(before_obj), Value::Object(after_obj)) => {
            for (key, before_val) in before_obj {
                let path = join_path(prefix, key);
                match after_obj.get(key) {
                    Some(after_val) if before_val != after_val => {
                        changes.extend(diff_paths(before_val, after_val, &path));
                    }
                    Some(_) => {}
                    None => changes.push(format!(
                        "{}: {} -> (removed)",
                        path,
                        format_value(before_val)
                    )),
                }
            }

            for (key, after_val) in after_obj {
                if !before_obj.contains_key(key) {
                    changes.push(format!(
                        "{}: (added) -> {}",
                        join_path(prefix, key),
                        format_value(after_val)
                    ));
                }
            }
        }
        _ if before != after => {
            let change = format!("{} -> {}", format_value(before), format_value(after));
            if prefix.is_empty() {
                changes.push(change);
            } else {
                changes.push(format!("{}: {}", prefix, change));
            }
        }
        _ => {}
    }

    changes
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) if s.chars().count() > 50 => {
            let truncated: String = s.chars().take(47).collect();
            format!("\"{}...\"", truncated)
        }
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_balance_change() {
        let before =
            json!({"balances": {"Buffert": {"final_balance": 100000, "starting_balance": 0}}});
        let after =
            json!({"balances": {"Buffert": {"final_balance": 105000, "starting_balance": 0}}});

        let diff = generate_diff(&before, &after).unwrap();
        assert_eq!(diff, "balances.Buffert.final_balance: 100000 -> 105000");
    }

    #[test]
    fn test_added_and_removed_fields() {
        let before = json!({"name": "Mat", "account": "Gemensamt"});
        let after = json!({"name": "Mat", "financing": "one_off"});

        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("account: \"Gemensamt\" -> (removed)"));
        assert!(diff.contains("financing: (added) -> \"one_off\""));
        assert!(!diff.contains("name"));
    }

    #[test]
    fn test_no_changes() {
        let value = json!({"amount": 800000});
        assert!(generate_diff(&value, &value).is_none());
    }

    #[test]
    fn test_scalar_and_array_change() {
        assert_eq!(generate_diff(&json!(1), &json!(2)).unwrap(), "1 -> 2");

        let diff = generate_diff(&json!({"items": [1, 2]}), &json!({"items": [1, 2, 3]})).unwrap();
        assert_eq!(diff, "items: [2 items] -> [3 items]");
    }

    #[test]
    fn test_long_string_truncation() {
        let before = json!({"memo": "å".repeat(100)});
        let diff = generate_diff(&before, &json!({"memo": "kort"})).unwrap();
        assert!(diff.contains("...\""));
    }
}

use serde_json::Value;

/// Join the `text` of every utterance with single spaces, in order.
///
/// Accepts either `{"utterances": [...]}` or a bare array of utterances.
/// Anything else yields an empty string.
pub fn join_utterances(value: &Value) -> String {
    let utterances = match value {
        Value::Object(map) => map.get("utterances").and_then(Value::as_array),
        Value::Array(items) => Some(items),
        _ => None,
    };

    utterances
        .map(|items| {
            items
                .iter()
                .filter_map(|utterance| utterance.get("text").and_then(Value::as_str))
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .collect::<Vec<&str>>()
                .join(" ")
        })
        .unwrap_or_default()
}

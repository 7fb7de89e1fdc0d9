use crate::error::ExtractError;
use serde_json::{Map, Value};

/// Recover the recipe object from model output.
///
/// Clean JSON is parsed directly. Otherwise the first `{` and its matching
/// `}` are cut out, which strips code fences and surrounding commentary.
pub fn extract_object(raw: &str) -> Result<Map<String, Value>, ExtractError> {
    if let Ok(Value::Object(object)) = serde_json::from_str::<Value>(raw.trim()) {
        return Ok(object);
    }

    let start = raw
        .find('{')
        .ok_or_else(|| ExtractError::ParseError("no JSON object in model output".to_string()))?;
    let candidate = balanced_object(&raw[start..]).ok_or_else(|| {
        ExtractError::ParseError("unbalanced braces in model output".to_string())
    })?;

    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(ExtractError::ParseError(
            "model output is not a JSON object".to_string(),
        )),
        Err(e) => Err(ExtractError::ParseError(e.to_string())),
    }
}

/// The prefix of `s` up to the brace closing the one at index 0.
/// Braces inside string literals are ignored.
fn balanced_object(s: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape = false;

    for (i, c) in s.char_indices() {
        if escape {
            escape = false;
            continue;
        }
        match c {
            '\\' if in_string => escape = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&s[..=i]);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_json() {
        let object = extract_object(r#"  {"name": "Pasta"}  "#).unwrap();
        assert_eq!(object["name"], "Pasta");
    }

    #[test]
    fn test_fenced_block() {
        let raw = "```json\n{\"name\": \"Pasta\", \"tags\": [\"Easy\"]}\n```";
        let object = extract_object(raw).unwrap();
        assert_eq!(object["name"], "Pasta");
        assert_eq!(object["tags"][0], "Easy");
    }

    #[test]
    fn test_commentary_and_braces_in_strings() {
        let raw = r#"Here is the recipe you asked for:
{"name": "Curly {brace} soup", "description": "Uses a \"}\" char", "ingredients": [{"ingredient": "Water"}]}
Let me know if you need anything else {or not}."#;
        let object = extract_object(raw).unwrap();
        assert_eq!(object["name"], "Curly {brace} soup");
        assert_eq!(object["ingredients"][0]["ingredient"], "Water");
    }

    #[test]
    fn test_no_object_is_parse_error() {
        assert!(matches!(
            extract_object("I could not find a recipe in this transcript."),
            Err(ExtractError::ParseError(_))
        ));
        assert!(matches!(
            extract_object("[1, 2, 3]"),
            Err(ExtractError::ParseError(_))
        ));
    }

    #[test]
    fn test_truncated_object_is_parse_error() {
        let raw = "```json\n{\"name\": \"Pasta\", \"tags\": [\"Easy\"";
        assert!(matches!(extract_object(raw), Err(ExtractError::ParseError(_))));
    }

    #[test]
    fn test_invalid_inner_json_is_parse_error() {
        let raw = "```json\n{name: 'Pasta'}\n```";
        assert!(matches!(extract_object(raw), Err(ExtractError::ParseError(_))));
    }
}

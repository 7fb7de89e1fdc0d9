mod utterances;
mod webvtt;

use log::debug;
use serde_json::Value;
use std::fmt;

pub use self::utterances::join_utterances;
pub use self::webvtt::{is_webvtt, strip_cues};

/// A transcript exactly as the fetcher returned it, before classification
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptPayload {
    /// A string: WEBVTT captions, serialized JSON, or plain prose
    Text(String),
    /// An already-parsed JSON value
    Structured(Value),
}

impl TranscriptPayload {
    /// Pull the `transcript` field out of a fetcher response envelope.
    ///
    /// Returns `None` when the envelope has no transcript at all.
    pub fn from_envelope(envelope: &Value) -> Option<Self> {
        match envelope.get("transcript")? {
            Value::Null => None,
            Value::String(text) => Some(TranscriptPayload::Text(text.clone())),
            other => Some(TranscriptPayload::Structured(other.clone())),
        }
    }
}

impl From<String> for TranscriptPayload {
    fn from(text: String) -> Self {
        TranscriptPayload::Text(text)
    }
}

impl From<&str> for TranscriptPayload {
    fn from(text: &str) -> Self {
        TranscriptPayload::Text(text.to_string())
    }
}

impl From<Value> for TranscriptPayload {
    fn from(value: Value) -> Self {
        TranscriptPayload::Structured(value)
    }
}

/// The format a transcript was classified as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptFormat {
    WebVtt,
    UtteranceJson,
    PlainText,
}

impl fmt::Display for TranscriptFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TranscriptFormat::WebVtt => "webvtt",
            TranscriptFormat::UtteranceJson => "utterance_json",
            TranscriptFormat::PlainText => "plain_text",
        };
        f.write_str(name)
    }
}

/// A classified transcript. Classification happens once, in [`RawTranscript::classify`].
#[derive(Debug, Clone, PartialEq)]
pub enum RawTranscript {
    WebVtt(String),
    UtteranceJson(Value),
    PlainText(String),
}

impl RawTranscript {
    /// Decide which format a payload is in.
    ///
    /// Strings are probed for the WEBVTT marker first, then for JSON. A string
    /// that is not JSON is plain text; that fallback is silent.
    pub fn classify(payload: TranscriptPayload) -> Self {
        match payload {
            TranscriptPayload::Text(text) => classify_text(text),
            TranscriptPayload::Structured(Value::String(text)) => classify_text(text),
            TranscriptPayload::Structured(value) => RawTranscript::UtteranceJson(value),
        }
    }

    pub fn format(&self) -> TranscriptFormat {
        match self {
            RawTranscript::WebVtt(_) => TranscriptFormat::WebVtt,
            RawTranscript::UtteranceJson(_) => TranscriptFormat::UtteranceJson,
            RawTranscript::PlainText(_) => TranscriptFormat::PlainText,
        }
    }

    /// Flatten the transcript into a single line of dialogue
    pub fn normalize(&self) -> NormalizedTranscript {
        let text = match self {
            RawTranscript::WebVtt(captions) => strip_cues(captions),
            RawTranscript::UtteranceJson(value) => join_utterances(value),
            RawTranscript::PlainText(text) => text.trim().to_string(),
        };
        NormalizedTranscript(text)
    }
}

fn classify_text(text: String) -> RawTranscript {
    if is_webvtt(&text) {
        return RawTranscript::WebVtt(text);
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => RawTranscript::UtteranceJson(value),
        Ok(_) | Err(_) => {
            debug!("Transcript is not WEBVTT or utterance JSON, using it as plain text");
            RawTranscript::PlainText(text)
        }
    }
}

/// Classify and normalize in one step
pub fn normalize_payload(payload: impl Into<TranscriptPayload>) -> NormalizedTranscript {
    RawTranscript::classify(payload.into()).normalize()
}

/// Cleaned dialogue text with no timing information
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedTranscript(String);

impl NormalizedTranscript {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedTranscript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_webvtt_ignores_case_and_leading_whitespace() {
        let raw = RawTranscript::classify("  \n webvtt\n\nHello".into());
        assert_eq!(raw.format(), TranscriptFormat::WebVtt);
    }

    #[test]
    fn test_classify_json_string_as_utterances() {
        let raw = RawTranscript::classify(r#"{"utterances": [{"text": "hi"}]}"#.into());
        assert_eq!(raw.format(), TranscriptFormat::UtteranceJson);
    }

    #[test]
    fn test_classify_invalid_json_falls_back_to_plain_text() {
        let text = "{ this is not json, just a brace";
        let raw = RawTranscript::classify(text.into());
        assert_eq!(raw, RawTranscript::PlainText(text.to_string()));
    }

    #[test]
    fn test_classify_json_scalar_is_plain_text() {
        let raw = RawTranscript::classify("42".into());
        assert_eq!(raw.format(), TranscriptFormat::PlainText);
        assert_eq!(raw.normalize().as_str(), "42");
    }

    #[test]
    fn test_classify_structured_string_is_probed() {
        let raw = RawTranscript::classify(json!("WEBVTT\n\nHi").into());
        assert_eq!(raw.format(), TranscriptFormat::WebVtt);
    }

    #[test]
    fn test_utterance_json_joins_text() {
        let payload = json!({"utterances": [{"text": "a"}, {"text": "b"}, {"text": "c"}]});
        assert_eq!(normalize_payload(payload).as_str(), "a b c");

        let as_string = r#"{"utterances":[{"text":"a"},{"text":"b"},{"text":"c"}]}"#;
        assert_eq!(normalize_payload(as_string).as_str(), "a b c");
    }

    #[test]
    fn test_plain_text_is_trimmed_only() {
        let normalized = normalize_payload("  Boil   the pasta.\n");
        assert_eq!(normalized.as_str(), "Boil   the pasta.");
    }

    #[test]
    fn test_empty_payloads_give_empty_transcript() {
        assert!(normalize_payload("").is_empty());
        assert!(normalize_payload(json!({"utterances": []})).is_empty());
        assert!(normalize_payload(json!({"something": "else"})).is_empty());
        assert!(normalize_payload("WEBVTT\n\n").is_empty());
    }

    #[test]
    fn test_from_envelope() {
        let envelope = json!({"success": true, "transcript": "WEBVTT\n\nHi"});
        assert_eq!(
            TranscriptPayload::from_envelope(&envelope),
            Some(TranscriptPayload::Text("WEBVTT\n\nHi".to_string()))
        );

        let structured = json!({"transcript": {"utterances": []}});
        assert!(matches!(
            TranscriptPayload::from_envelope(&structured),
            Some(TranscriptPayload::Structured(_))
        ));

        assert_eq!(TranscriptPayload::from_envelope(&json!({"transcript": null})), None);
        assert_eq!(TranscriptPayload::from_envelope(&json!({})), None);
    }
}

use crate::transcript::NormalizedTranscript;
use std::fmt;

/// A fixed prompt prefix: role instruction, output schema and one worked example.
///
/// The wording directly shapes what the model returns, so every edit to a
/// template body ships as a new version rather than a change in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    pub version: &'static str,
    pub body: &'static str,
}

/// The recipe extraction template, loaded from `recipe_v1.txt` at compile time
pub const RECIPE_TEMPLATE_V1: PromptTemplate = PromptTemplate {
    version: "1",
    body: include_str!("recipe_v1.txt"),
};

/// The template used when none is chosen explicitly
pub const CURRENT_TEMPLATE: PromptTemplate = RECIPE_TEMPLATE_V1;

/// The complete text sent to the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt(String);

impl Prompt {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PromptBuilder {
    template: PromptTemplate,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        PromptBuilder::new(CURRENT_TEMPLATE)
    }
}

impl PromptBuilder {
    pub fn new(template: PromptTemplate) -> Self {
        PromptBuilder { template }
    }

    pub fn template_version(&self) -> &'static str {
        self.template.version
    }

    /// Append the transcript, untouched, to the template body
    pub fn build(&self, transcript: &NormalizedTranscript) -> Prompt {
        let mut prompt = String::with_capacity(self.template.body.len() + transcript.as_str().len());
        prompt.push_str(self.template.body);
        prompt.push_str(transcript.as_str());
        Prompt(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::normalize_payload;

    #[test]
    fn test_template_is_embedded() {
        let body = RECIPE_TEMPLATE_V1.body;
        assert!(!body.is_empty());
        assert!(body.contains("sole function"));
        assert!(body.contains("At most 3 tags"));
        assert!(body.contains("under 100 words"));
        assert!(body.contains("\"N/A\""));
        assert!(body.contains("\"ingredient\", \"amount\" and \"unit\""));
    }

    #[test]
    fn test_template_has_one_worked_example() {
        let body = RECIPE_TEMPLATE_V1.body;
        assert_eq!(body.matches("Example Input Transcript:").count(), 1);
        assert_eq!(body.matches("Expected JSON Output:").count(), 1);
        assert!(body.contains("\"name\": \"Creamy Tomato Pasta\""));
    }

    #[test]
    fn test_prompt_ends_with_transcript() {
        let transcript = normalize_payload("  Boil 200 grams of pasta.  Drain it. ");
        let prompt = PromptBuilder::default().build(&transcript);
        assert!(prompt.as_str().ends_with("Boil 200 grams of pasta.  Drain it."));
        assert!(prompt.as_str().starts_with(RECIPE_TEMPLATE_V1.body));
        assert_eq!(
            prompt.as_str().len(),
            RECIPE_TEMPLATE_V1.body.len() + transcript.as_str().len()
        );
    }

    #[test]
    fn test_prefix_is_stable_across_calls() {
        let builder = PromptBuilder::default();
        let first = builder.build(&normalize_payload("one"));
        let second = builder.build(&normalize_payload("two"));
        assert_eq!(
            first.as_str().strip_suffix("one"),
            second.as_str().strip_suffix("two")
        );
        assert_eq!(builder.template_version(), "1");
    }

    #[test]
    fn test_custom_template() {
        let template = PromptTemplate {
            version: "test",
            body: "Extract: ",
        };
        let prompt = PromptBuilder::new(template).build(&normalize_payload("soup"));
        assert_eq!(prompt.as_str(), "Extract: soup");
    }
}
